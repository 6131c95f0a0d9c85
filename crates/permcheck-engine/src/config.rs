//! Check configuration loaded from `permcheck.toml`
//!
//! ```toml
//! baseline = "permission-baseline.xml"
//! strict = false
//! xml_report = "build/reports/permcheck/report.xml"
//! html_report = "build/reports/permcheck/report.html"
//!
//! [policy]
//! required_changed_strict = false
//! capability_changed_strict = false
//!
//! [variants]
//! release = "app/build/intermediates/merged_manifests/release/AndroidManifest.xml"
//! ```
//!
//! Relative paths are resolved against the directory holding the file.
//! Unknown keys are rejected.

use permcheck_core::errors::{ExError, ExErrorKind};
use permcheck_core::StrictnessPolicy;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Looked up in the working directory when no config file is given
pub const DEFAULT_CONFIG_FILE: &str = "permcheck.toml";

pub const DEFAULT_BASELINE: &str = "permission-baseline.xml";
pub const DEFAULT_XML_REPORT: &str = "build/reports/permcheck/report.xml";
pub const DEFAULT_HTML_REPORT: &str = "build/reports/permcheck/report.html";

/// Complete check configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CheckConfig {
    pub baseline: PathBuf,
    pub strict: bool,
    pub xml_report: PathBuf,
    pub html_report: PathBuf,
    pub policy: PolicyConfig,
    /// Variant name → merged manifest path, checked in name order
    pub variants: BTreeMap<String, PathBuf>,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            baseline: PathBuf::from(DEFAULT_BASELINE),
            strict: false,
            xml_report: PathBuf::from(DEFAULT_XML_REPORT),
            html_report: PathBuf::from(DEFAULT_HTML_REPORT),
            policy: PolicyConfig::default(),
            variants: BTreeMap::new(),
        }
    }
}

/// Strictness of the feature change kinds
///
/// Removals and lowered bounds are always strict-only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PolicyConfig {
    pub required_changed_strict: bool,
    pub capability_changed_strict: bool,
}

impl PolicyConfig {
    pub fn to_policy(self) -> StrictnessPolicy {
        StrictnessPolicy {
            required_changed_strict: self.required_changed_strict,
            capability_changed_strict: self.capability_changed_strict,
            ..StrictnessPolicy::default()
        }
    }
}

impl CheckConfig {
    /// Parse configuration text; paths are taken as written
    ///
    /// # Errors
    ///
    /// `Configuration` for invalid TOML, wrong value types or unknown keys.
    pub fn from_toml_str(text: &str) -> Result<Self, ExError> {
        toml::from_str(text).map_err(|e| {
            ExError::new(ExErrorKind::Configuration)
                .with_op("load_config")
                .with_message("invalid check configuration")
                .with_cause(e.to_string())
        })
    }

    /// Read `path` and resolve relative paths against its directory
    ///
    /// # Errors
    ///
    /// - `NotFound` — `path` does not exist
    /// - `Io` — `path` cannot be read
    /// - `Configuration` — the content is not a valid configuration
    pub fn from_file(path: &Path) -> Result<Self, ExError> {
        if !path.exists() {
            return Err(ExError::new(ExErrorKind::NotFound)
                .with_op("load_config")
                .with_path(path)
                .with_message(format!("config file {} does not exist", path.display())));
        }

        let text = fs::read_to_string(path).map_err(|e| {
            ExError::new(ExErrorKind::Io)
                .with_op("load_config")
                .with_path(path)
                .with_message("failed to read config file")
                .with_cause(e.to_string())
        })?;
        let config = Self::from_toml_str(&text).map_err(|e| e.with_path(path))?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        Ok(config.resolve_relative_to(base))
    }

    /// Load `explicit` if given, else `permcheck.toml` when present, else defaults
    ///
    /// # Errors
    ///
    /// See [`CheckConfig::from_file`].
    pub fn load(explicit: Option<&Path>) -> Result<Self, ExError> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.is_file() {
                    Self::from_file(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Prefix every relative path with `base`
    pub fn resolve_relative_to(mut self, base: &Path) -> Self {
        let resolve = |path: PathBuf| {
            if path.is_absolute() {
                path
            } else {
                base.join(path)
            }
        };
        self.baseline = resolve(self.baseline);
        self.xml_report = resolve(self.xml_report);
        self.html_report = resolve(self.html_report);
        self.variants = self
            .variants
            .into_iter()
            .map(|(name, path)| (name, resolve(path)))
            .collect();
        self
    }
}
