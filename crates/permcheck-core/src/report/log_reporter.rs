//! Plain-text reporter for terminals and build logs

use crate::errors::{PermCheckError, Result};
use crate::report::{Reporter, ViolationReport};
use std::io::Write;
use std::sync::Mutex;

const CLEAN_MESSAGE: &str = "Found no violations, all permissions match the baseline";

/// Writes one summary line per affected variant followed by one line per
/// violation; variant blocks are separated by a blank line
///
/// Every line is mirrored as a `tracing` event. [`Reporter::report`] takes
/// `&self`, so the sink sits behind a `Mutex` to be writable from it.
pub struct LogReporter<W: Write> {
    sink: Mutex<W>,
}

impl<W: Write> LogReporter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            sink: Mutex::new(sink),
        }
    }

    /// Write `lines` to the sink, one per line
    ///
    /// # Errors
    ///
    /// `Io` when the sink rejects the write.
    pub fn write_lines(&self, lines: &[String]) -> Result<()> {
        let mut sink = self.sink.lock().map_err(|_| PermCheckError::Internal {
            reason: "log reporter sink lock poisoned".to_string(),
        })?;
        let write_err = |e| PermCheckError::Io {
            op: "write_log_report".to_string(),
            path: "<log>".into(),
            source: e,
        };
        for line in lines {
            writeln!(sink, "{}", line).map_err(write_err)?;
        }
        sink.flush().map_err(write_err)
    }

    /// Give back the sink, e.g. to inspect a buffer in tests
    pub fn into_inner(self) -> W {
        match self.sink.into_inner() {
            Ok(sink) => sink,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

/// The lines a log report consists of, blank separators included
pub fn render_lines(report: &ViolationReport) -> Vec<String> {
    if report.is_clean() {
        return vec![CLEAN_MESSAGE.to_string()];
    }

    let mut lines = Vec::new();
    for (variant, violations) in report.iter().filter(|(_, v)| !v.is_empty()) {
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.push(format!(
            "Found {} violation(s) for variant {}",
            violations.len(),
            variant
        ));
        lines.extend(violations.iter().map(|violation| violation.message()));
    }
    lines
}

impl<W: Write> Reporter for LogReporter<W> {
    fn report(&self, report: &ViolationReport) -> Result<()> {
        let lines = render_lines(report);

        if report.is_clean() {
            tracing::info!(violation_count = 0, "{}", CLEAN_MESSAGE);
        } else {
            for line in lines.iter().filter(|l| !l.is_empty()) {
                tracing::warn!(violation_count = report.total(), "{}", line);
            }
        }

        self.write_lines(&lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PermissionEntry, Violation};

    fn output(report: &ViolationReport) -> String {
        let reporter = LogReporter::new(Vec::new());
        reporter.report(report).unwrap();
        String::from_utf8(reporter.into_inner()).unwrap()
    }

    #[test]
    fn test_clean_report_is_a_single_line() {
        let report: ViolationReport = [("debug", Vec::new()), ("release", Vec::new())]
            .into_iter()
            .collect();
        assert_eq!(
            output(&report),
            "Found no violations, all permissions match the baseline\n"
        );
    }

    #[test]
    fn test_clean_variants_are_skipped() {
        let report: ViolationReport = [
            (
                "debug",
                vec![Violation::added(PermissionEntry::permission(
                    "android.permission.CAMERA",
                ))],
            ),
            ("release", Vec::new()),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            output(&report),
            "Found 1 violation(s) for variant debug\n\
             New permission '<uses-permission android:name=\"android.permission.CAMERA\" />' was added\n"
        );
    }
}
