//! XML-backed baseline store
//!
//! Document layout:
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <baseline>
//!     <variant name="release">
//!         <uses-permission name="android.permission.CAMERA" maxSdkVersion="26" />
//!         <uses-feature name="android.hardware.camera" required="false" />
//!     </variant>
//! </baseline>
//! ```

use crate::errors::{ParseCause, PermCheckError, Result};
use crate::fs_util::atomic_write;
use crate::logging_facility::elapsed_ms;
use crate::manifest::parser::{parse_max_version, parse_required};
use crate::model::{EntryKind, EntrySet, PermissionEntry, VariantPermissionSet};
use crate::xml_util::{ensure_extension, read_document, XmlDocumentWriter, XmlElement};
use crate::{log_op_end, log_op_error, log_op_start};
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Instant;

const ROOT_ELEMENT: &str = "baseline";
const VARIANT_ELEMENT: &str = "variant";

/// Durable, mergeable persistence of per-variant permission sets
#[derive(Debug, Clone)]
pub struct BaselineStore {
    path: PathBuf,
}

impl BaselineStore {
    /// Create a store for `path`
    ///
    /// # Errors
    ///
    /// `Configuration` when `path` is not an `.xml` file. Nothing is read or
    /// written before this check.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        ensure_extension(&path, "xml", "permission baseline")?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True when the baseline file is present on disk
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Load the persisted baseline
    ///
    /// A missing file yields an empty set.
    ///
    /// # Errors
    ///
    /// `CorruptBaseline` when the file exists but is not a valid baseline
    /// document.
    pub fn load(&self) -> Result<VariantPermissionSet> {
        let start = Instant::now();
        log_op_start!("load_baseline", path = %self.path.display());

        match self.read() {
            Ok(baseline) => {
                log_op_end!(
                    "load_baseline",
                    duration_ms = elapsed_ms(start),
                    variant_count = baseline.len()
                );
                Ok(baseline)
            }
            Err(err) => {
                log_op_error!("load_baseline", err, duration_ms = elapsed_ms(start));
                Err(err)
            }
        }
    }

    /// Merge `update` into the persisted baseline
    ///
    /// Every variant named in `update` is replaced wholesale; all other
    /// variants are kept as they are. Saving the same content twice leaves
    /// the file byte-identical.
    ///
    /// # Errors
    ///
    /// `CorruptBaseline` when the existing file cannot be read back, `Io` or
    /// `Serialization` when writing fails.
    pub fn save(&self, update: VariantPermissionSet) -> Result<()> {
        let start = Instant::now();
        log_op_start!("save_baseline", path = %self.path.display(), variant_count = update.len());

        let result = self.read().and_then(|mut merged| {
            merged.merge_from(update);
            self.write(&merged)
        });
        match result {
            Ok(()) => {
                log_op_end!("save_baseline", duration_ms = elapsed_ms(start));
                Ok(())
            }
            Err(err) => {
                log_op_error!("save_baseline", err, duration_ms = elapsed_ms(start));
                Err(err)
            }
        }
    }

    /// Write `baseline` as the complete file content, discarding whatever
    /// the file held before (including an unreadable document)
    ///
    /// # Errors
    ///
    /// `Io` or `Serialization` when writing fails.
    pub fn overwrite(&self, baseline: &VariantPermissionSet) -> Result<()> {
        let start = Instant::now();
        log_op_start!("overwrite_baseline", path = %self.path.display());

        match self.write(baseline) {
            Ok(()) => {
                log_op_end!("overwrite_baseline", duration_ms = elapsed_ms(start));
                Ok(())
            }
            Err(err) => {
                log_op_error!("overwrite_baseline", err, duration_ms = elapsed_ms(start));
                Err(err)
            }
        }
    }

    fn read(&self) -> Result<VariantPermissionSet> {
        if !self.path.exists() {
            return Ok(VariantPermissionSet::new());
        }

        let corrupt = |cause: ParseCause| PermCheckError::CorruptBaseline {
            path: self.path.clone(),
            cause,
        };
        let file = File::open(&self.path).map_err(|e| corrupt(ParseCause::Io(e)))?;
        let root = read_document(BufReader::new(file)).map_err(corrupt)?;
        decode_baseline(&root).map_err(corrupt)
    }

    fn write(&self, baseline: &VariantPermissionSet) -> Result<()> {
        let content = encode_baseline(baseline, &self.path)?;

        // Unchanged content is not rewritten
        if let Ok(existing) = fs::read(&self.path) {
            if existing == content {
                return Ok(());
            }
        }
        atomic_write(&self.path, &content)
    }
}

fn decode_baseline(root: &XmlElement) -> std::result::Result<VariantPermissionSet, ParseCause> {
    if !root.is(ROOT_ELEMENT) {
        return Err(ParseCause::Structure(format!(
            "expected <{}> root element, found <{}>",
            ROOT_ELEMENT,
            root.local_name()
        )));
    }

    let mut baseline = VariantPermissionSet::new();
    for variant in root.children.iter().filter(|c| c.is(VARIANT_ELEMENT)) {
        let name = variant.attribute("name").ok_or_else(|| {
            ParseCause::Structure(format!("<{}> without name attribute", VARIANT_ELEMENT))
        })?;
        let mut entries = EntrySet::new();
        for element in &variant.children {
            if element.name.prefix.is_some() {
                continue;
            }
            if let Some(kind) = EntryKind::from_tag(element.local_name()) {
                entries.insert(decode_entry(kind, element)?);
            }
        }
        baseline.insert(name, entries);
    }
    Ok(baseline)
}

fn decode_entry(kind: EntryKind, element: &XmlElement) -> std::result::Result<PermissionEntry, ParseCause> {
    let name = element.attribute("name").unwrap_or_default();
    if name.is_empty() && kind != EntryKind::Feature {
        return Err(ParseCause::Structure(format!(
            "<{}> without name attribute",
            kind.tag()
        )));
    }

    let mut entry = PermissionEntry::new(kind, name);
    if let Some(raw) = element.attribute("maxSdkVersion") {
        entry = entry.with_max_version(parse_max_version(kind, name, raw)?);
    }
    if let Some(raw) = element.attribute("required") {
        entry = entry.with_required(parse_required(name, raw)?);
    }
    if let Some(gl_version) = element.attribute("glEsVersion").filter(|v| !v.is_empty()) {
        entry = entry.with_gl_version(gl_version);
    }
    Ok(entry)
}

fn encode_baseline(baseline: &VariantPermissionSet, path: &Path) -> Result<Vec<u8>> {
    let mut doc = XmlDocumentWriter::new(path.display().to_string(), true)?;
    doc.start(ROOT_ELEMENT, &[])?;
    for (variant, entries) in baseline.iter() {
        doc.start(VARIANT_ELEMENT, &[("name", variant)])?;
        for kind in EntryKind::ALL {
            for entry in entries.iter().filter(|e| e.kind() == kind) {
                let attributes = entry.attributes();
                let attributes: Vec<(&str, &str)> =
                    attributes.iter().map(|(k, v)| (*k, v.as_str())).collect();
                doc.empty(kind.tag(), &attributes)?;
            }
        }
        doc.end()?;
    }
    doc.end()?;
    Ok(doc.finish())
}
