//! PermCheck Engine - Orchestration layer
//!
//! Turns a set of (variant, manifest) pairs plus the recreate/strict flags
//! into a check outcome, coordinating the manifest parser, the baseline
//! store, the diff engine and the reporters.

pub mod commands;
pub mod config;

pub use commands::check::{run_check, run_check_with_log, CheckOutcome, CheckRequest};
pub use config::{CheckConfig, PolicyConfig, DEFAULT_BASELINE, DEFAULT_CONFIG_FILE};
