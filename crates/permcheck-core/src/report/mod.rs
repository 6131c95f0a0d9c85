//! Violation reporters
//!
//! All reporters consume the same [`ViolationReport`] and produce
//! deterministic output for identical input.

pub mod html_reporter;
pub mod log_reporter;
pub mod xml_reporter;

pub use html_reporter::HtmlReporter;
pub use log_reporter::LogReporter;
pub use xml_reporter::XmlReporter;

use crate::errors::Result;
use crate::model::Violation;

/// Renders the violations of a check run
pub trait Reporter {
    /// # Errors
    ///
    /// `Io` or `Serialization` when the report cannot be written.
    fn report(&self, report: &ViolationReport) -> Result<()>;
}

/// Violations per variant, in the order the variants were checked
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViolationReport {
    variants: Vec<(String, Vec<Violation>)>,
}

impl ViolationReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the violations of `variant`, replacing earlier ones in place
    pub fn insert(&mut self, variant: impl Into<String>, violations: Vec<Violation>) {
        let variant = variant.into();
        match self.variants.iter_mut().find(|(name, _)| *name == variant) {
            Some((_, existing)) => *existing = violations,
            None => self.variants.push((variant, violations)),
        }
    }

    pub fn get(&self, variant: &str) -> Option<&[Violation]> {
        self.variants
            .iter()
            .find(|(name, _)| name == variant)
            .map(|(_, violations)| violations.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Violation])> {
        self.variants
            .iter()
            .map(|(name, violations)| (name.as_str(), violations.as_slice()))
    }

    /// Number of variants in the report, clean ones included
    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    /// Violations across all variants
    pub fn total(&self) -> usize {
        self.variants.iter().map(|(_, violations)| violations.len()).sum()
    }

    pub fn is_clean(&self) -> bool {
        self.total() == 0
    }
}

impl<N: Into<String>> FromIterator<(N, Vec<Violation>)> for ViolationReport {
    fn from_iter<I: IntoIterator<Item = (N, Vec<Violation>)>>(iter: I) -> Self {
        let mut report = ViolationReport::new();
        for (variant, violations) in iter {
            report.insert(variant, violations);
        }
        report
    }
}
