//! Permission check orchestration.
//!
//! ## Pipeline (in order):
//! 1. Validate the request and construct the baseline store and file
//!    reporters (file-type errors surface here, before any I/O)
//! 2. Parse every manifest, keeping the request's variant order
//! 3. Recreate or missing baseline: persist the current sets, report zero
//!    violations and stop
//! 4. Load the baseline; a variant missing from it is persisted, zero
//!    violations are reported and the run stops
//! 5. Diff every variant and run all reporters
//!
//! A freshly created baseline (unless explicitly requested) and any
//! violation both mark the outcome as requiring review.

use crate::config::CheckConfig;
use permcheck_core::errors::{ExError, ExErrorKind};
use permcheck_core::logging_facility::elapsed_ms;
use permcheck_core::{
    find_violations, log_op_end, log_op_error, log_op_start, parse_manifest_file, BaselineStore,
    HtmlReporter, LogReporter, PermCheckError, Reporter, StrictnessPolicy, VariantPermissionSet,
    ViolationReport, XmlReporter,
};
use std::collections::HashSet;
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

/// Inputs of one check run
#[derive(Debug, Clone)]
pub struct CheckRequest {
    /// (variant name, merged manifest path) pairs, checked in this order
    pub variants: Vec<(String, PathBuf)>,
    pub baseline: PathBuf,
    pub xml_report: PathBuf,
    pub html_report: PathBuf,
    /// Persist the current sets as the new baseline without checking
    pub recreate: bool,
    /// Also report strict-only violations
    pub strict: bool,
    pub policy: StrictnessPolicy,
}

impl CheckRequest {
    pub fn from_config(config: &CheckConfig) -> Self {
        Self {
            variants: config
                .variants
                .iter()
                .map(|(name, path)| (name.clone(), path.clone()))
                .collect(),
            baseline: config.baseline.clone(),
            xml_report: config.xml_report.clone(),
            html_report: config.html_report.clone(),
            recreate: false,
            strict: config.strict,
            policy: config.policy.to_policy(),
        }
    }
}

/// Result of a check run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutcome {
    /// The baseline file was written by this run instead of being checked
    pub baseline_created: bool,
    /// A human has to look at the baseline or the reports
    pub requires_review: bool,
    /// Violations per variant; all lists are empty when the baseline was created
    pub report: ViolationReport,
}

impl CheckOutcome {
    pub fn violation_count(&self) -> usize {
        self.report.total()
    }

    pub fn passed(&self) -> bool {
        !self.requires_review
    }

    /// Why the run failed, if it did
    pub fn failure_reason(&self) -> Option<String> {
        if !self.requires_review {
            None
        } else if self.baseline_created {
            Some("Aborting build since new baseline was created".to_string())
        } else {
            Some(format!(
                "Found {} violation(s) while checking permissions",
                self.violation_count()
            ))
        }
    }
}

/// Run the check, writing the log report to stdout
///
/// # Errors
///
/// See [`run_check_with_log`].
pub fn run_check(request: &CheckRequest) -> Result<CheckOutcome, ExError> {
    run_check_with_log(request, std::io::stdout())
}

/// Run the check, writing the log report and status lines to `log`
///
/// # Errors
///
/// - `InvalidInput` — no variants, or a variant named twice
/// - `Configuration` — baseline or report path with the wrong extension
/// - `NotFound` / `Parse` — a manifest is missing or malformed
/// - `CorruptBaseline` — the baseline cannot be read (and `recreate` is off)
/// - `Io` / `Serialization` — a baseline or report cannot be written
pub fn run_check_with_log<W: Write>(request: &CheckRequest, log: W) -> Result<CheckOutcome, ExError> {
    let start = Instant::now();
    log_op_start!(
        "run_check",
        variant_count = request.variants.len(),
        recreate = request.recreate,
        strict = request.strict
    );

    match execute(request, log) {
        Ok(outcome) => {
            log_op_end!(
                "run_check",
                duration_ms = elapsed_ms(start),
                baseline_created = outcome.baseline_created,
                violation_count = outcome.violation_count()
            );
            Ok(outcome)
        }
        Err(err) => {
            log_op_error!("run_check", err, duration_ms = elapsed_ms(start));
            Err(err)
        }
    }
}

fn execute<W: Write>(request: &CheckRequest, log: W) -> Result<CheckOutcome, ExError> {
    // 1. Validate and construct
    validate_variants(&request.variants)?;
    let store = BaselineStore::new(&request.baseline).map_err(ExError::from)?;
    let log_reporter = LogReporter::new(log);
    let xml_reporter = XmlReporter::new(&request.xml_report).map_err(ExError::from)?;
    let html_reporter = HtmlReporter::new(&request.html_report).map_err(ExError::from)?;

    // 2. Parse manifests
    let mut current = VariantPermissionSet::new();
    for (variant, manifest) in &request.variants {
        let entries = parse_manifest_file(manifest).map_err(ExError::from)?;
        tracing::debug!(variant = %variant, entry_count = entries.len(), "parsed manifest");
        current.insert(variant.clone(), entries);
    }

    let reporters: [&dyn Reporter; 3] = [&log_reporter, &xml_reporter, &html_reporter];

    // 3. Create (or recreate) the baseline
    if request.recreate || !store.exists() {
        let created = zero_report(&current);
        write_baseline(&store, current, request.recreate)?;
        return finish_creation(&log_reporter, &reporters, &store, created, !request.recreate);
    }

    // 4. Load; persist variants the baseline does not know yet
    let baseline = store.load().map_err(ExError::from)?;
    let missing = current
        .variant_names()
        .find(|name| !baseline.contains_variant(name))
        .map(str::to_string);
    if let Some(missing) = missing {
        tracing::info!(variant = %missing, "variant missing from baseline, updating it");
        let created = zero_report(&current);
        store.save(current).map_err(ExError::from)?;
        return finish_creation(&log_reporter, &reporters, &store, created, true);
    }

    // 5. Diff and report
    let mut report = ViolationReport::new();
    for (variant, entries) in current.iter() {
        let Some(recorded) = baseline.get(variant) else {
            continue;
        };
        let violations =
            find_violations(recorded, entries, request.strict, &request.policy).map_err(|e| {
                ExError::from(e).with_op("diff_variant")
            })?;
        tracing::info!(
            variant = %variant,
            violation_count = violations.len(),
            "checked variant"
        );
        report.insert(variant, violations);
    }

    run_reporters(&reporters, &report)?;

    let requires_review = !report.is_clean();
    Ok(CheckOutcome {
        baseline_created: false,
        requires_review,
        report,
    })
}

fn validate_variants(variants: &[(String, PathBuf)]) -> Result<(), ExError> {
    if variants.is_empty() {
        return Err(ExError::new(ExErrorKind::InvalidInput)
            .with_op("run_check")
            .with_message("no variants to check, configure at least one variant manifest"));
    }

    let mut seen = HashSet::new();
    for (name, _) in variants {
        if name.is_empty() {
            return Err(ExError::new(ExErrorKind::InvalidInput)
                .with_op("run_check")
                .with_message("variant names must not be empty"));
        }
        if !seen.insert(name.as_str()) {
            return Err(ExError::new(ExErrorKind::InvalidInput)
                .with_op("run_check")
                .with_message(format!("variant '{}' is configured more than once", name)));
        }
    }
    Ok(())
}

/// Persist `current`; an explicit recreate replaces an unreadable baseline
fn write_baseline(
    store: &BaselineStore,
    current: VariantPermissionSet,
    recreate: bool,
) -> Result<(), ExError> {
    match store.save(current.clone()) {
        Err(PermCheckError::CorruptBaseline { path, cause }) if recreate => {
            tracing::warn!(
                path = %path.display(),
                cause = %cause,
                "replacing unreadable baseline"
            );
            store.overwrite(&current).map_err(ExError::from)
        }
        other => other.map_err(ExError::from),
    }
}

/// One empty violation list per checked variant
fn zero_report(current: &VariantPermissionSet) -> ViolationReport {
    current
        .variant_names()
        .map(|name| (name, Vec::new()))
        .collect()
}

fn run_reporters(reporters: &[&dyn Reporter], report: &ViolationReport) -> Result<(), ExError> {
    for reporter in reporters {
        reporter.report(report).map_err(ExError::from)?;
    }
    Ok(())
}

/// Announce a written baseline, then replace any earlier reports with the
/// zero-violation report of this run
fn finish_creation<W: Write>(
    log_reporter: &LogReporter<W>,
    reporters: &[&dyn Reporter],
    store: &BaselineStore,
    report: ViolationReport,
    requires_review: bool,
) -> Result<CheckOutcome, ExError> {
    let outcome = CheckOutcome {
        baseline_created: true,
        requires_review,
        report,
    };
    announce_baseline(log_reporter, store, &outcome)?;
    run_reporters(reporters, &outcome.report)?;
    Ok(outcome)
}

fn announce_baseline<W: Write>(
    log_reporter: &LogReporter<W>,
    store: &BaselineStore,
    outcome: &CheckOutcome,
) -> Result<(), ExError> {
    let mut lines = vec![format!("Created baseline at {}", store.path().display())];
    if outcome.requires_review {
        lines.push(
            "Breaking build so that baselines are not created on accident, a rerun should succeed"
                .to_string(),
        );
        lines.push(
            "Use the --recreate flag to recreate baselines without failing the build".to_string(),
        );
    }
    for line in &lines {
        tracing::info!("{}", line);
    }
    log_reporter.write_lines(&lines).map_err(ExError::from)
}
