//! Input validation for filemerge.
//!
//! Checks a working set before a merge run is started. The pipeline itself
//! accepts any number of inputs; callers that want the "at least two files"
//! rule run a [`Validator`] first. It performs:
//! - Minimum file count checks
//! - Extension checks against the mode's accept list
//! - A summary of remote and local inputs
//!
//! # Examples
//!
//! ```
//! use filemerge::{FileSet, MergeMode};
//! use filemerge::validation::Validator;
//!
//! let mut files = FileSet::new();
//! files.add_local("a.csv", b"a,b\n1,2".to_vec());
//! files.add_local("b.csv", b"a,b\n3,4".to_vec());
//!
//! let summary = Validator::new()
//!     .validate(files.descriptors(), MergeMode::Csv)
//!     .unwrap();
//! assert_eq!(summary.files_validated, 2);
//! assert!(summary.warnings.is_empty());
//! ```

use serde::Serialize;

use crate::config::MIN_FILES;
use crate::descriptor::{FileDescriptor, Origin};
use crate::error::{FileMergeError, Result};
use crate::merge::MergeMode;
use crate::utils::format_file_size;

/// Summary of a validated working set.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationSummary {
    /// Mode the inputs were checked against.
    pub mode: MergeMode,

    /// Number of inputs checked.
    pub files_validated: usize,

    /// Inputs fetched at merge time.
    pub remote_count: usize,

    /// Inputs already in memory.
    pub local_count: usize,

    /// Total size of the in-memory inputs.
    pub local_bytes: u64,

    /// Non-fatal problems found.
    pub warnings: Vec<String>,
}

impl ValidationSummary {
    /// Format the local input size as a human-readable string.
    pub fn format_local_size(&self) -> String {
        format_file_size(self.local_bytes)
    }
}

/// Validator for a working set.
#[derive(Debug, Clone)]
pub struct Validator {
    strict: bool,
    min_files: usize,
}

impl Validator {
    /// Create a validator that reports extension mismatches as warnings.
    pub fn new() -> Self {
        Self {
            strict: false,
            min_files: MIN_FILES,
        }
    }

    /// Create a validator with strict mode enabled.
    ///
    /// In strict mode, warnings are treated as errors.
    pub fn strict() -> Self {
        Self {
            strict: true,
            ..Self::new()
        }
    }

    /// Validate `descriptors` for a merge in `mode`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - There are fewer than two inputs
    /// - An input's extension is not accepted by `mode` (strict mode only)
    pub fn validate(
        &self,
        descriptors: &[FileDescriptor],
        mode: MergeMode,
    ) -> Result<ValidationSummary> {
        if descriptors.len() < self.min_files {
            return Err(FileMergeError::TooFewFiles {
                required: self.min_files,
                actual: descriptors.len(),
            });
        }

        let warnings: Vec<String> = descriptors
            .iter()
            .filter(|d| !mode.accepts(d.name()))
            .map(|d| {
                format!(
                    "{} does not look like a {} file (expected {})",
                    d.name(),
                    mode,
                    mode.accepted_extensions().join(", ")
                )
            })
            .collect();

        if self.strict && !warnings.is_empty() {
            return Err(FileMergeError::invalid_config(warnings.join("; ")));
        }

        let mut summary = ValidationSummary {
            mode,
            files_validated: descriptors.len(),
            remote_count: 0,
            local_count: 0,
            local_bytes: 0,
            warnings,
        };

        for descriptor in descriptors {
            match descriptor.origin() {
                Origin::Remote(_) => summary.remote_count += 1,
                Origin::Local(bytes) => {
                    summary.local_count += 1;
                    summary.local_bytes += bytes.len() as u64;
                }
            }
        }

        tracing::debug!(
            files = summary.files_validated,
            warnings = summary.warnings.len(),
            "working set validated"
        );

        Ok(summary)
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local(name: &str, size: usize) -> FileDescriptor {
        FileDescriptor::local(name, name, vec![b'x'; size])
    }

    #[test]
    fn test_too_few_files() {
        let err = Validator::new()
            .validate(&[local("a.pdf", 1)], MergeMode::Pdf)
            .unwrap_err();

        assert!(matches!(
            err,
            FileMergeError::TooFewFiles {
                required: 2,
                actual: 1
            }
        ));

        let err = Validator::new().validate(&[], MergeMode::Zip).unwrap_err();
        assert!(err.to_string().starts_with("Please add at least 2 files"));
    }

    #[test]
    fn test_counts_remote_and_local() {
        let descriptors = vec![
            local("a.txt", 10),
            FileDescriptor::remote("r", "b.txt", "https://x.test/b.txt"),
            local("c.md", 5),
        ];

        let summary = Validator::new()
            .validate(&descriptors, MergeMode::Text)
            .unwrap();

        assert_eq!(summary.files_validated, 3);
        assert_eq!(summary.remote_count, 1);
        assert_eq!(summary.local_count, 2);
        assert_eq!(summary.local_bytes, 15);
        assert_eq!(summary.format_local_size(), "15 bytes");
        assert!(summary.warnings.is_empty());
    }

    #[test]
    fn test_extension_mismatch_is_a_warning() {
        let descriptors = vec![local("a.csv", 1), local("notes.txt", 1)];

        let summary = Validator::new()
            .validate(&descriptors, MergeMode::Csv)
            .unwrap();

        assert_eq!(summary.warnings.len(), 1);
        assert!(summary.warnings[0].starts_with("notes.txt does not look like a csv file"));
    }

    #[test]
    fn test_strict_rejects_mismatch() {
        let descriptors = vec![local("a.pdf", 1), local("b.docx", 1)];

        let err = Validator::strict()
            .validate(&descriptors, MergeMode::Pdf)
            .unwrap_err();

        assert!(matches!(err, FileMergeError::InvalidConfig { .. }));
        assert!(err.to_string().contains("b.docx"));
    }

    #[test]
    fn test_zip_accepts_archives() {
        let descriptors = vec![local("a.zip", 1), local("b.7z", 1), local("c.rar", 1)];
        let summary = Validator::strict()
            .validate(&descriptors, MergeMode::Zip)
            .unwrap();
        assert!(summary.warnings.is_empty());
    }
}
