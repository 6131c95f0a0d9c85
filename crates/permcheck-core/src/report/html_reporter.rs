//! Static HTML report for humans
//!
//! One card per variant with a violation count badge. Each violation shows
//! its title, a description and a diff-style pair of `<pre>` blocks: the
//! baseline entry styled as removed and the manifest entry styled as added.

use crate::errors::Result;
use crate::fs_util::atomic_write;
use crate::model::Violation;
use crate::report::{Reporter, ViolationReport};
use crate::xml_util::{ensure_extension, XmlDocumentWriter};
use std::path::{Path, PathBuf};

const TITLE: &str = "PermissionCheck Report";

const STYLESHEET: &str = "\
body { font-family: system-ui, sans-serif; margin: 0; }
.bg-light { background-color: #f8f9fa; }
.bg-dark { background-color: #343a40; }
.text-light { color: #f8f9fa; }
.container { max-width: 960px; margin: 0 auto; padding: 0 15px; }
.mt-4 { margin-top: 1.5rem; }
.mb-4 { margin-bottom: 1.5rem; }
.m-0 { margin: 0; }
.card { border-radius: 0.25rem; overflow: hidden; }
.card-header { padding: 0.75rem 1.25rem; }
.d-flex { display: flex; }
.justify-content-between { justify-content: space-between; }
.align-items-center { align-items: center; }
.list-group { display: flex; flex-direction: column; }
.list-group-item { padding: 0.75rem 1.25rem; background-color: #fff; border-top: 1px solid #dee2e6; }
.list-group-item-danger { background-color: #f5c6cb; color: #721c24; }
.list-group-item-success { background-color: #c3e6cb; color: #155724; }
.badge { display: inline-block; padding: 0.25em 0.6em; font-size: 75%; font-weight: 700; border-radius: 10rem; }
.badge-light { background-color: #f8f9fa; color: #212529; }
.badge-danger { background-color: #dc3545; color: #fff; }
pre { white-space: pre-wrap; }
";

/// Writes the HTML report to a `.html` file
#[derive(Debug, Clone)]
pub struct HtmlReporter {
    report_file: PathBuf,
}

impl HtmlReporter {
    /// # Errors
    ///
    /// `Configuration` when `report_file` is not an `.html` file.
    pub fn new(report_file: impl Into<PathBuf>) -> Result<Self> {
        let report_file = report_file.into();
        ensure_extension(&report_file, "html", "HTML report")?;
        Ok(Self { report_file })
    }

    pub fn report_file(&self) -> &Path {
        &self.report_file
    }
}

/// Serialize `report` to the HTML document (no XML declaration)
///
/// # Errors
///
/// `Serialization` when the emitter fails.
pub fn render(report: &ViolationReport, target: &str) -> Result<Vec<u8>> {
    let mut doc = XmlDocumentWriter::new(target, false)?;
    doc.start("html", &[("lang", "en")])?;

    doc.start("head", &[])?;
    doc.text_element("title", &[], TITLE)?;
    doc.empty(
        "meta",
        &[
            ("name", "viewport"),
            ("content", "width=device-width, initial-scale=1, shrink-to-fit=no"),
        ],
    )?;
    doc.text_element("style", &[], STYLESHEET)?;
    doc.end()?;

    doc.start("body", &[("class", "bg-light")])?;
    doc.start("div", &[("class", "container")])?;
    doc.text_element("h1", &[("class", "mt-4 mb-4")], TITLE)?;
    for (variant, violations) in report.iter() {
        write_card(&mut doc, variant, violations)?;
    }
    doc.end()?;
    doc.end()?;

    doc.end()?;
    Ok(doc.finish())
}

fn write_card(doc: &mut XmlDocumentWriter, variant: &str, violations: &[Violation]) -> Result<()> {
    doc.start("div", &[("class", "card mt-4 mb-4 bg-dark")])?;

    doc.start(
        "div",
        &[(
            "class",
            "card-header d-flex justify-content-between align-items-center text-light",
        )],
    )?;
    doc.text_element("b", &[], variant)?;
    doc.text_element(
        "span",
        &[("class", "badge badge-pill badge-light")],
        &violations.len().to_string(),
    )?;
    doc.end()?;

    doc.start("div", &[("class", "list-group list-group-flush")])?;
    if violations.is_empty() {
        doc.start("div", &[("class", "list-group-item")])?;
        doc.text_element("h5", &[], "No violations found")?;
        doc.text_element("p", &[], "All permissions from the manifest match the baseline.")?;
        doc.end()?;
    } else {
        for violation in violations {
            write_violation(doc, violation)?;
        }
    }
    doc.end()?;

    doc.end()
}

fn write_violation(doc: &mut XmlDocumentWriter, violation: &Violation) -> Result<()> {
    let kind = violation.kind();
    doc.start("div", &[("class", "list-group-item")])?;

    doc.start("div", &[("class", "d-flex justify-content-between align-items-center")])?;
    doc.text_element("h5", &[], kind.title())?;
    if violation.strict() {
        doc.text_element("span", &[("class", "badge badge-danger badge-pill")], "strict")?;
    }
    doc.end()?;

    doc.text_element("p", &[], kind.description())?;

    doc.start("div", &[("class", "list-group list-group-flush")])?;
    if let Some(previous) = kind.previous_entry() {
        doc.text_element(
            "pre",
            &[("class", "list-group-item list-group-item-danger m-0")],
            &previous.to_string(),
        )?;
    }
    if let Some(current) = kind.current_entry() {
        doc.text_element(
            "pre",
            &[("class", "list-group-item list-group-item-success m-0")],
            &current.to_string(),
        )?;
    }
    doc.end()?;

    doc.end()
}

impl Reporter for HtmlReporter {
    fn report(&self, report: &ViolationReport) -> Result<()> {
        let content = render(report, &self.report_file.display().to_string())?;
        atomic_write(&self.report_file, &content)
    }
}
