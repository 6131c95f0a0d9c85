//! Manifest parser
//!
//! Extracts the permission/feature surface of a manifest document. Only the
//! three recognized declaration shapes are read; everything else in the
//! document is ignored.

use crate::errors::{ParseCause, PermCheckError, Result};
use crate::logging_facility::elapsed_ms;
use crate::model::{EntryKind, EntrySet, PermissionEntry};
use crate::xml_util::{read_document, XmlElement};
use crate::{log_op_end, log_op_error, log_op_start};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Instant;

/// Namespace of the `android:` attributes in a manifest
pub const ANDROID_NAMESPACE: &str = "http://schemas.android.com/apk/res/android";

/// Parse the manifest at `path`
///
/// Attribute values are validated strictly: a `maxSdkVersion` that is not an
/// unsigned integer or a `required` that is not `true`/`false` fails the parse
/// instead of being dropped, unlike lenient manifest readers that ignore such
/// values and record the entry as unbounded.
///
/// # Errors
///
/// - `NotFound` — `path` does not exist
/// - `Parse` — the file cannot be read, is not well-formed XML, or a
///   recognized element carries an invalid attribute value
pub fn parse_manifest_file(path: &Path) -> Result<EntrySet> {
    let start = Instant::now();
    log_op_start!("parse_manifest", path = %path.display());

    match read_manifest_file(path) {
        Ok(entries) => {
            log_op_end!(
                "parse_manifest",
                duration_ms = elapsed_ms(start),
                entry_count = entries.len()
            );
            Ok(entries)
        }
        Err(err) => {
            log_op_error!("parse_manifest", err, duration_ms = elapsed_ms(start));
            Err(err)
        }
    }
}

/// Parse manifest text held in memory
///
/// # Errors
///
/// - `Parse` — not well-formed XML or an invalid attribute value
pub fn parse_manifest_str(text: &str) -> Result<EntrySet> {
    let location = "<inline>".to_string();
    let root = read_document(text.as_bytes()).map_err(|cause| PermCheckError::Parse {
        location: location.clone(),
        cause,
    })?;
    collect_entries(&root).map_err(|cause| PermCheckError::Parse { location, cause })
}

fn read_manifest_file(path: &Path) -> Result<EntrySet> {
    if !path.exists() {
        return Err(PermCheckError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let location = path.display().to_string();
    let file = File::open(path).map_err(|e| PermCheckError::Parse {
        location: location.clone(),
        cause: ParseCause::Io(e),
    })?;
    let root = read_document(BufReader::new(file)).map_err(|cause| PermCheckError::Parse {
        location: location.clone(),
        cause,
    })?;
    collect_entries(&root).map_err(|cause| PermCheckError::Parse { location, cause })
}

/// Collect every recognized declaration anywhere in the document
fn collect_entries(root: &XmlElement) -> std::result::Result<EntrySet, ParseCause> {
    let mut entries = EntrySet::new();
    for element in std::iter::once(root).chain(root.descendants()) {
        if element.name.prefix.is_some() {
            continue;
        }
        if let Some(kind) = EntryKind::from_tag(element.local_name()) {
            entries.insert(parse_entry(kind, element)?);
        }
    }
    Ok(entries)
}

fn android_attribute<'a>(element: &'a XmlElement, name: &str) -> Option<&'a str> {
    element
        .attribute_ns(ANDROID_NAMESPACE, name)
        .filter(|value| !value.is_empty())
}

fn parse_entry(kind: EntryKind, element: &XmlElement) -> std::result::Result<PermissionEntry, ParseCause> {
    let name = android_attribute(element, "name");

    match kind {
        EntryKind::Permission | EntryKind::RuntimePermission => {
            let name = name.ok_or_else(|| {
                ParseCause::Structure(format!("<{}> without android:name", kind.tag()))
            })?;
            let mut entry = PermissionEntry::new(kind, name);
            if let Some(raw) = android_attribute(element, "maxSdkVersion") {
                entry = entry.with_max_version(parse_max_version(kind, name, raw)?);
            }
            Ok(entry)
        }
        EntryKind::Feature => {
            let mut entry = PermissionEntry::feature(name.unwrap_or_default());
            if let Some(raw) = android_attribute(element, "required") {
                entry = entry.with_required(parse_required(name.unwrap_or_default(), raw)?);
            }
            if let Some(gl_version) = android_attribute(element, "glEsVersion") {
                entry = entry.with_gl_version(gl_version);
            }
            Ok(entry)
        }
    }
}

pub(crate) fn parse_max_version(
    kind: EntryKind,
    name: &str,
    raw: &str,
) -> std::result::Result<u32, ParseCause> {
    raw.trim().parse::<u32>().map_err(|_| {
        ParseCause::Structure(format!(
            "<{} name=\"{}\"> has non-numeric maxSdkVersion \"{}\"",
            kind.tag(),
            name,
            raw
        ))
    })
}

pub(crate) fn parse_required(name: &str, raw: &str) -> std::result::Result<bool, ParseCause> {
    match raw.trim() {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(ParseCause::Structure(format!(
            "<uses-feature name=\"{}\"> has invalid required value \"{}\"",
            name, other
        ))),
    }
}
