//! Machine-readable XML report

use crate::errors::Result;
use crate::fs_util::atomic_write;
use crate::model::Violation;
use crate::report::{Reporter, ViolationReport};
use crate::xml_util::{ensure_extension, XmlDocumentWriter};
use std::path::{Path, PathBuf};

/// Writes `<violations>` with one `<variant>` per checked variant, clean ones
/// included
#[derive(Debug, Clone)]
pub struct XmlReporter {
    report_file: PathBuf,
}

impl XmlReporter {
    /// # Errors
    ///
    /// `Configuration` when `report_file` is not an `.xml` file.
    pub fn new(report_file: impl Into<PathBuf>) -> Result<Self> {
        let report_file = report_file.into();
        ensure_extension(&report_file, "xml", "XML report")?;
        Ok(Self { report_file })
    }

    pub fn report_file(&self) -> &Path {
        &self.report_file
    }
}

/// Serialize `report` to the XML report document
///
/// # Errors
///
/// `Serialization` when the emitter fails.
pub fn render(report: &ViolationReport, target: &str) -> Result<Vec<u8>> {
    let mut doc = XmlDocumentWriter::new(target, true)?;
    doc.start("violations", &[])?;
    for (variant, violations) in report.iter() {
        doc.start("variant", &[("name", variant)])?;
        for violation in violations {
            write_violation(&mut doc, violation)?;
        }
        doc.end()?;
    }
    doc.end()?;
    Ok(doc.finish())
}

fn write_violation(doc: &mut XmlDocumentWriter, violation: &Violation) -> Result<()> {
    let previous = violation.kind().previous_value();

    let mut attributes = vec![("type", violation.kind().slug())];
    if violation.strict() {
        attributes.push(("strict", "true"));
    }
    if let Some((name, value)) = &previous {
        attributes.push((*name, value.as_str()));
    }
    doc.start("violation", &attributes)?;

    let entry = violation.entry();
    let entry_attributes = entry.attributes();
    let entry_attributes: Vec<(&str, &str)> = entry_attributes
        .iter()
        .map(|(k, v)| (*k, v.as_str()))
        .collect();
    doc.empty(entry.kind().tag(), &entry_attributes)?;

    doc.end()
}

impl Reporter for XmlReporter {
    fn report(&self, report: &ViolationReport) -> Result<()> {
        let content = render(report, &self.report_file.display().to_string())?;
        atomic_write(&self.report_file, &content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PermissionEntry;

    #[test]
    fn test_rejects_non_xml_target() {
        assert!(XmlReporter::new("build/report.html").is_err());
        assert!(XmlReporter::new("build/REPORT.XML").is_ok());
    }

    #[test]
    fn test_previous_value_follows_strict() {
        let report: ViolationReport = [(
            "release",
            vec![Violation::max_version_decreased(
                PermissionEntry::permission("android.permission.INTERNET").with_max_version(25),
                Some(28),
            )],
        )]
        .into_iter()
        .collect();

        let xml = String::from_utf8(render(&report, "test").unwrap()).unwrap();
        assert!(xml.contains(
            r#"<violation type="max-sdk-decreased" strict="true" previousMaxSdkVersion="28">"#
        ));
        assert!(xml.contains(r#"name="android.permission.INTERNET" maxSdkVersion="25""#));
    }
}
