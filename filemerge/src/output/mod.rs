//! User-facing output: progress reporting and formatted messages.
//!
//! The pipeline only depends on [`ProgressReporter`]; the formatter and the
//! terminal [`ProgressBar`] are what the CLI plugs into it.

pub mod formatter;
pub mod progress;

pub use formatter::{MessageLevel, OutputFormatter};
pub use progress::{NoProgress, ProgressBar, ProgressEvent, ProgressReporter};

use crate::utils::format_file_size;
use crate::validation::ValidationSummary;

/// Create an output formatter from configuration.
pub fn create_formatter(config: &crate::config::Config) -> OutputFormatter {
    OutputFormatter::from_config(config)
}

/// Display a validation summary to the user.
pub fn display_validation_summary(formatter: &OutputFormatter, summary: &ValidationSummary) {
    for warning in &summary.warnings {
        formatter.warning(warning);
    }

    formatter.info(&format!(
        "Validated {} file(s) for {} merge: {} remote, {} local ({})",
        summary.files_validated,
        summary.mode,
        summary.remote_count,
        summary.local_count,
        format_file_size(summary.local_bytes)
    ));
}
