//! Configuration module for filemerge.
//!
//! The CLI turns its arguments into a [`Config`]; the library builds its
//! HTTP fetcher and output sink from it. This module handles:
//! - Validation of argument combinations
//! - Defaults for the remote fetch
//! - Classification of inputs into remote URLs and local paths

use anyhow::{Result, bail};
use std::path::PathBuf;
use std::time::Duration;

use crate::merge::MergeMode;
use crate::utils::is_remote;

/// Timeout applied to each remote fetch.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Fewest inputs a merge is meaningful for.
pub const MIN_FILES: usize = 2;

/// User agent sent with remote fetches.
pub const DEFAULT_USER_AGENT: &str = concat!("filemerge/", env!("CARGO_PKG_VERSION"));

/// Settings for the HTTP fetcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchSettings {
    /// Per-request timeout, covering connect and body.
    pub timeout: Duration,
    /// Value of the `User-Agent` header.
    pub user_agent: String,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_FETCH_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Output file overwrite behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverwriteMode {
    /// Replace an existing file.
    Force,
    /// Fail if the file exists (default).
    #[default]
    NoClobber,
}

/// One input as given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSpec {
    /// An `http(s)://` URL, fetched during the run.
    Remote(String),
    /// A path or glob pattern, read before the run.
    Local(String),
}

impl InputSpec {
    /// Classify a raw input string.
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        if is_remote(input) {
            Self::Remote(input.to_string())
        } else {
            Self::Local(input.to_string())
        }
    }
}

/// Complete configuration for a merge operation.
#[derive(Debug, Clone)]
pub struct Config {
    /// Inputs in merge order: URLs, paths or glob patterns.
    pub inputs: Vec<String>,

    /// Merge strategy.
    pub mode: MergeMode,

    /// Directory the merged file is written to.
    pub output_dir: PathBuf,

    /// File overwrite behavior.
    pub overwrite_mode: OverwriteMode,

    /// Remote fetch settings.
    pub fetch: FetchSettings,

    /// Reject inputs whose extension does not match the mode.
    pub strict: bool,

    /// Quiet mode - suppress non-error output.
    pub quiet: bool,

    /// Verbose output mode.
    pub verbose: bool,

    /// Print the outcome as JSON.
    pub json: bool,
}

impl Config {
    /// Create a configuration with defaults for everything but inputs and mode.
    pub fn new(inputs: Vec<String>, mode: MergeMode) -> Self {
        Self {
            inputs,
            mode,
            output_dir: PathBuf::from("."),
            overwrite_mode: OverwriteMode::default(),
            fetch: FetchSettings::default(),
            strict: false,
            quiet: false,
            verbose: false,
            json: false,
        }
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No inputs are specified
    /// - Verbose and quiet modes are both enabled
    /// - The fetch timeout is zero
    pub fn validate(&self) -> Result<()> {
        if self.inputs.iter().all(|i| i.trim().is_empty()) {
            bail!("No input files specified");
        }

        if self.verbose && self.quiet {
            bail!("Cannot use both --verbose and --quiet");
        }

        if self.fetch.timeout.is_zero() {
            bail!("Fetch timeout must be at least 1 second");
        }

        if self.output_dir.is_file() {
            bail!(
                "Output directory is an existing file: {}",
                self.output_dir.display()
            );
        }

        Ok(())
    }

    /// Inputs classified as remote or local, blank entries dropped.
    pub fn input_specs(&self) -> Vec<InputSpec> {
        self.inputs
            .iter()
            .filter(|i| !i.trim().is_empty())
            .map(|i| InputSpec::parse(i))
            .collect()
    }

    /// Whether human-readable output should be printed.
    pub fn should_print(&self) -> bool {
        !self.quiet && !self.json
    }
}
