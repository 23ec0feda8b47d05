//! Error types for filemerge.
//!
//! Every failure a merge run can hit is a variant of [`FileMergeError`].
//! The pipeline catches these once at its boundary and turns them into a
//! failed [`MergeOutcome`](crate::pipeline::MergeOutcome); the CLI maps
//! them to process exit codes.
//!
//! # Error Categories
//!
//! - **Acquisition Errors**: a remote download failed or timed out
//! - **Merge Errors**: a strategy rejected its input (e.g. invalid PDF)
//! - **Delivery Errors**: the merged output could not be saved
//! - **Validation Errors**: invalid arguments or configuration

use std::io;
use std::path::PathBuf;

/// Result type alias for filemerge operations.
pub type Result<T> = std::result::Result<T, FileMergeError>;

/// Main error type for filemerge operations.
#[derive(Debug, thiserror::Error)]
pub enum FileMergeError {
    /// Fetching a remote input failed (network error, timeout, non-2xx).
    #[error("Failed to download {name}: {reason}")]
    Acquisition {
        /// Name of the file being fetched.
        name: String,
        /// Underlying transport error text.
        reason: String,
    },

    /// HTTP transport error from the remote fetcher.
    #[error("{source}")]
    Http {
        /// URL that was requested.
        url: String,
        /// Underlying reqwest error.
        #[source]
        source: reqwest::Error,
    },

    /// An input is not a valid PDF document.
    #[error("Failed to load PDF: {name}\n  Reason: {reason}")]
    InvalidPdf {
        /// Name of the offending input.
        name: String,
        /// Parser error text.
        reason: String,
    },

    /// A merge strategy failed.
    #[error("Merge operation failed: {reason}")]
    MergeFailed {
        /// Description of what went wrong.
        reason: String,
    },

    /// The requested merge mode does not exist.
    #[error("Unsupported merge type: {0}")]
    UnsupportedMode(String),

    /// Fewer inputs than a merge needs.
    #[error("Please add at least {required} files to merge (got {actual})")]
    TooFewFiles {
        /// Minimum number of files.
        required: usize,
        /// Number of files supplied.
        actual: usize,
    },

    /// Output file already exists and overwrite is not allowed.
    #[error(
        "Output file already exists: {}\n  Use --force to overwrite or choose a different output directory",
        .path.display()
    )]
    OutputExists {
        /// Path to the existing output file.
        path: PathBuf,
    },

    /// Writing the merged output failed.
    #[error("Failed to write output file: {}\n  Reason: {source}", .path.display())]
    DeliveryFailed {
        /// Path being written to.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A local input or input list could not be read.
    #[error("Failed to read input: {}\n  Reason: {source}", .path.display())]
    FailedToReadInput {
        /// Path of the input.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of what's wrong with the configuration.
        message: String,
    },

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Generic error with a custom message.
    #[error("{0}")]
    Other(String),
}

impl From<lopdf::Error> for FileMergeError {
    fn from(err: lopdf::Error) -> Self {
        Self::merge_failed(err.to_string())
    }
}

impl From<zip::result::ZipError> for FileMergeError {
    fn from(err: zip::result::ZipError) -> Self {
        Self::merge_failed(err.to_string())
    }
}

impl From<anyhow::Error> for FileMergeError {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}

impl FileMergeError {
    /// Create an Acquisition error.
    pub fn acquisition(name: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::Acquisition {
            name: name.into(),
            reason: reason.to_string(),
        }
    }

    /// Create an InvalidPdf error.
    pub fn invalid_pdf(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPdf {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create a MergeFailed error.
    pub fn merge_failed(reason: impl Into<String>) -> Self {
        Self::MergeFailed {
            reason: reason.into(),
        }
    }

    /// Create an InvalidConfig error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an Other error with a custom message.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }

    /// Whether this error was raised while fetching inputs.
    pub fn is_acquisition(&self) -> bool {
        matches!(self, Self::Acquisition { .. } | Self::Http { .. })
    }

    /// Get the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Acquisition { .. } | Self::Http { .. } => 2,
            Self::FailedToReadInput { .. } => 2,
            Self::InvalidPdf { .. } => 3,
            Self::OutputExists { .. } => 4,
            Self::DeliveryFailed { .. } | Self::Io(_) => 5,
            Self::MergeFailed { .. } => 6,
            Self::UnsupportedMode(_)
            | Self::TooFewFiles { .. }
            | Self::InvalidConfig { .. }
            | Self::Other(_) => 1,
        }
    }
}
