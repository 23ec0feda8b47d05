//! Turning command-line inputs into a working set.
//!
//! URLs become remote descriptors. Local paths and glob patterns are
//! expanded and read into memory before the merge starts.

use std::path::{Path, PathBuf};
use tokio::io::AsyncBufReadExt;

use filemerge::config::{Config, InputSpec};
use filemerge::error::{FileMergeError, Result};
use filemerge::utils::name_from_url;
use filemerge::FileSet;

/// Combine direct inputs with those read from an input list file.
///
/// Entries from the list are appended after the direct inputs.
///
/// # Errors
///
/// Returns an error if the input list cannot be read.
pub async fn collect_inputs(direct: &[String], input_list: Option<&Path>) -> Result<Vec<String>> {
    let mut inputs = direct.to_vec();

    if let Some(path) = input_list {
        inputs.extend(read_input_list(path).await?);
    }

    Ok(inputs)
}

/// Read one input per line. Lines starting with '#' and blank lines are
/// skipped.
async fn read_input_list(path: &Path) -> Result<Vec<String>> {
    let read_failed = |source| FileMergeError::FailedToReadInput {
        path: path.to_path_buf(),
        source,
    };

    let file = tokio::fs::File::open(path).await.map_err(read_failed)?;
    let mut lines = tokio::io::BufReader::new(file).lines();
    let mut inputs = Vec::new();

    while let Some(line) = lines.next_line().await.map_err(read_failed)? {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        inputs.push(line.to_string());
    }

    Ok(inputs)
}

/// Expand a local input into concrete paths.
///
/// Inputs without glob metacharacters are returned unchanged. Patterns
/// expand to their matching files in sorted order.
///
/// # Errors
///
/// Returns an error if the pattern is malformed or matches nothing.
pub fn expand_local(input: &str) -> Result<Vec<PathBuf>> {
    if !input.contains(['*', '?', '[']) {
        return Ok(vec![PathBuf::from(input)]);
    }

    let entries = glob::glob(input).map_err(|e| {
        FileMergeError::invalid_config(format!("Invalid glob pattern '{input}': {e}"))
    })?;

    let mut paths = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| FileMergeError::FailedToReadInput {
            path: e.path().to_path_buf(),
            source: e.into_error(),
        })?;
        if path.is_file() {
            paths.push(path);
        }
    }

    if paths.is_empty() {
        return Err(FileMergeError::invalid_config(format!(
            "No files match pattern: {input}"
        )));
    }

    paths.sort();
    Ok(paths)
}

/// Build the working set for `config`, reading local files into memory.
///
/// Remote inputs are named after their last URL path segment, or
/// `file-<n>` for the n-th input when the URL has none.
///
/// # Errors
///
/// Returns an error if a local input cannot be expanded or read.
pub async fn load_file_set(config: &Config) -> Result<FileSet> {
    let mut files = FileSet::new();

    for (index, spec) in config.input_specs().into_iter().enumerate() {
        match spec {
            InputSpec::Remote(url) => {
                let name = name_from_url(&url, index + 1);
                files.add_remote(name, url);
            }
            InputSpec::Local(input) => {
                for path in expand_local(&input)? {
                    let bytes = tokio::fs::read(&path).await.map_err(|source| {
                        FileMergeError::FailedToReadInput {
                            path: path.clone(),
                            source,
                        }
                    })?;
                    tracing::debug!(path = %path.display(), size = bytes.len(), "local input read");
                    files.add_local(display_name(&path), bytes);
                }
            }
        }
    }

    Ok(files)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
