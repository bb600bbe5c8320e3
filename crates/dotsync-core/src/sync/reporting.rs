//! Sync run reporting

use std::fmt::Write;

use super::SyncReport;
use super::actions::EntryOutcome;

/// Sync run reporter
pub struct SyncReporter;

impl SyncReporter {
    /// Generate a summary report
    #[must_use]
    pub fn generate_summary(report: &SyncReport) -> String {
        let mut output = String::new();

        if report.is_dry_run() {
            let _ = writeln!(output, "\n=== {} Summary (dry run) ===", report.direction());
        } else {
            let _ = writeln!(output, "\n=== {} Summary ===", report.direction());
        }
        let _ = writeln!(output, "Copied:    {}", report.copied());
        let _ = writeln!(output, "Replaced:  {}", report.replaced());

        let skipped = report.skipped();
        let reasons = report.skip_reasons();
        if skipped > 0 && !reasons.is_empty() {
            let _ = write!(output, "Skipped:   {skipped}");
            for (reason, count) in reasons {
                let _ = write!(output, " ({reason}: {count})");
            }
            let _ = writeln!(output);
        } else {
            let _ = writeln!(output, "Skipped:   {skipped}");
        }

        let _ = writeln!(output, "Conflicts: {}", report.conflicts());
        let _ = writeln!(output, "Errors:    {}", report.errors());

        let problems: Vec<_> = report
            .outcomes()
            .iter()
            .filter_map(|(entry, outcome)| match outcome {
                EntryOutcome::Conflict { message } | EntryOutcome::Failed { message } => {
                    Some((entry, message))
                }
                _ => None,
            })
            .collect();
        if !problems.is_empty() {
            let _ = writeln!(output, "\nProblems ({}):", problems.len());
            for (entry, message) in problems {
                let _ = writeln!(output, "  - {entry}: {message}");
            }
        }

        let _ = writeln!(output, "\nTotal operations: {}", report.total_operations());

        if report.is_success() {
            output.push_str("Status: ✓ Success\n");
        } else {
            output.push_str("Status: ✗ Completed with conflicts or errors\n");
        }

        output
    }
}
