//! PermCheck Core - permission regression engine
//!
//! This crate provides the building blocks for detecting regressions in an
//! application's declared permission and feature surface, including:
//! - Permission/feature entry model with canonical ordering and textual form
//! - Namespace-aware manifest parsing
//! - A multi-variant XML baseline with per-variant replace-on-save semantics
//! - The merge-diff that classifies every difference into a typed violation
//! - Log, XML and HTML reporters with deterministic output

pub mod baseline;
pub mod diff;
pub mod errors;
pub mod fs_util;
pub mod logging_facility;
pub mod manifest;
pub mod model;
pub mod report;
pub mod xml_util;

// Re-export commonly used types
pub use baseline::BaselineStore;
pub use diff::{find_violations, StrictnessPolicy};
pub use errors::{ExError, ExErrorKind, PermCheckError, Result};
pub use manifest::{parse_manifest_file, parse_manifest_str};
pub use model::{EntryKind, PermissionEntry, VariantPermissionSet, Violation, ViolationKind};
pub use report::{HtmlReporter, LogReporter, Reporter, ViolationReport, XmlReporter};
