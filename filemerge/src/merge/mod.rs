//! Merge strategies.
//!
//! Each [`MergeMode`] has one strategy that turns an ordered list of
//! [`ResolvedFile`]s into a single [`MergedOutput`]. Strategies are pure:
//! the same files and timestamp always give the same output, and an empty
//! input list gives a degenerate but valid output rather than an error.
//!
//! - [`pdf`]: append every page of every document, in order
//! - [`archive`]: pack each file as a ZIP entry
//! - [`csv`]: append rows under the first header
//! - [`text`]: concatenate with `=== name ===` banners

pub mod archive;
pub mod csv;
pub mod pdf;
pub mod text;

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::descriptor::ResolvedFile;
use crate::error::{FileMergeError, Result};
use crate::utils::extension_of;

/// Which strategy a merge run uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeMode {
    /// Concatenate PDF pages.
    Pdf,
    /// Bundle into a ZIP archive.
    Zip,
    /// Append CSV rows under one header.
    Csv,
    /// Concatenate text with file-name banners.
    Text,
}

impl MergeMode {
    /// Every mode, in display order.
    pub const ALL: [MergeMode; 4] = [Self::Pdf, Self::Zip, Self::Csv, Self::Text];

    /// Lowercase mode name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Zip => "zip",
            Self::Csv => "csv",
            Self::Text => "text",
        }
    }

    /// Media type of the produced output.
    pub fn media_type(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Zip => "application/zip",
            Self::Csv => "text/csv",
            Self::Text => "text/plain",
        }
    }

    /// Generated output file name for a given millisecond timestamp.
    pub fn output_file_name(&self, timestamp_ms: i64) -> String {
        match self {
            Self::Pdf => format!("merged-{timestamp_ms}.pdf"),
            Self::Zip => format!("merged-files-{timestamp_ms}.zip"),
            Self::Csv => format!("merged-data-{timestamp_ms}.csv"),
            Self::Text => format!("merged-text-{timestamp_ms}.txt"),
        }
    }

    /// File extensions expected as input for this mode.
    ///
    /// ZIP mode packs anything; its list names the archive formats users
    /// usually bundle and only drives validation warnings.
    pub fn accepted_extensions(&self) -> &'static [&'static str] {
        match self {
            Self::Pdf => &["pdf"],
            Self::Zip => &["zip", "rar", "7z"],
            Self::Csv => &["csv"],
            Self::Text => &["txt", "md", "text"],
        }
    }

    /// Whether a file name carries an extension this mode expects.
    pub fn accepts(&self, file_name: &str) -> bool {
        extension_of(file_name)
            .is_some_and(|ext| self.accepted_extensions().contains(&ext.as_str()))
    }
}

impl fmt::Display for MergeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MergeMode {
    type Err = FileMergeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "pdf" => Ok(Self::Pdf),
            "zip" => Ok(Self::Zip),
            "csv" => Ok(Self::Csv),
            "text" | "txt" => Ok(Self::Text),
            _ => Err(FileMergeError::UnsupportedMode(s.to_string())),
        }
    }
}

/// A merged blob ready for delivery.
#[derive(Clone, PartialEq, Eq)]
pub struct MergedOutput {
    /// Generated file name, e.g. `merged-data-1700000000000.csv`.
    pub file_name: String,
    /// Declared media type.
    pub media_type: &'static str,
    /// Output content.
    pub bytes: Vec<u8>,
}

impl MergedOutput {
    /// Build an output for `mode` stamped with `timestamp_ms`.
    pub fn new(mode: MergeMode, timestamp_ms: i64, bytes: Vec<u8>) -> Self {
        Self {
            file_name: mode.output_file_name(timestamp_ms),
            media_type: mode.media_type(),
            bytes,
        }
    }

    /// Output size in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the output is empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for MergedOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MergedOutput")
            .field("file_name", &self.file_name)
            .field("media_type", &self.media_type)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

/// Run the strategy selected by `mode`.
pub fn merge_files(
    mode: MergeMode,
    files: &[ResolvedFile],
    timestamp_ms: i64,
) -> Result<MergedOutput> {
    tracing::debug!(%mode, files = files.len(), "dispatching merge strategy");

    let bytes = match mode {
        MergeMode::Pdf => pdf::merge(files)?,
        MergeMode::Zip => archive::merge(files)?,
        MergeMode::Csv => csv::merge(files).into_bytes(),
        MergeMode::Text => text::merge(files).into_bytes(),
    };

    Ok(MergedOutput::new(mode, timestamp_ms, bytes))
}
