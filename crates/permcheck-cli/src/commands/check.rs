//! Permission check command

use clap::Args;
use permcheck_core::errors::{ExError, ExErrorKind};
use permcheck_engine::{run_check, CheckConfig, CheckRequest};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Configuration file (defaults to permcheck.toml when present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Baseline file, must end in .xml
    #[arg(long)]
    pub baseline: Option<PathBuf>,

    /// Variant to check as name=path-to-merged-manifest; replaces configured variants
    #[arg(long = "variant", value_name = "NAME=PATH", value_parser = parse_variant)]
    pub variants: Vec<(String, PathBuf)>,

    /// Also detect permission removals and lowered max SDK versions
    #[arg(long)]
    pub strict: bool,

    /// Recreate the baseline without failing
    #[arg(long)]
    pub recreate: bool,

    /// XML report file, must end in .xml
    #[arg(long)]
    pub xml_report: Option<PathBuf>,

    /// HTML report file, must end in .html
    #[arg(long)]
    pub html_report: Option<PathBuf>,
}

fn parse_variant(raw: &str) -> Result<(String, PathBuf), String> {
    match raw.split_once('=') {
        Some((name, path)) if !name.is_empty() && !path.is_empty() => {
            Ok((name.to_string(), PathBuf::from(path)))
        }
        _ => Err(format!("expected NAME=PATH, got '{}'", raw)),
    }
}

/// Merge the config file with the command-line overrides
fn build_request(args: CheckArgs) -> Result<CheckRequest, ExError> {
    let config = CheckConfig::load(args.config.as_deref())?;
    let mut request = CheckRequest::from_config(&config);

    if let Some(baseline) = args.baseline {
        request.baseline = baseline;
    }
    if let Some(xml_report) = args.xml_report {
        request.xml_report = xml_report;
    }
    if let Some(html_report) = args.html_report {
        request.html_report = html_report;
    }
    if !args.variants.is_empty() {
        request.variants = args.variants;
    }
    request.strict |= args.strict;
    request.recreate = args.recreate;

    if request.variants.is_empty() {
        return Err(ExError::new(ExErrorKind::InvalidInput)
            .with_op("check")
            .with_message("no variants configured, pass --variant NAME=PATH or add [variants] to the config file"));
    }
    Ok(request)
}

pub fn execute(args: CheckArgs) -> Result<(), Box<dyn std::error::Error>> {
    let request = build_request(args)?;
    let outcome = run_check(&request)?;

    match outcome.failure_reason() {
        Some(reason) => Err(reason.into()),
        None => Ok(()),
    }
}
