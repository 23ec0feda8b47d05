//! CLI argument parsing for filemerge.
//!
//! This module defines the command-line interface structure using `clap`.
//! It is also compiled by the build script to render the man page, so it
//! only depends on `clap` and the library.

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use filemerge::config::{Config, FetchSettings, OverwriteMode};
use filemerge::error::{FileMergeError, Result};
use filemerge::merge::MergeMode;

/// Merge PDF, ZIP, CSV or text files into a single file.
///
/// Inputs can be local files, glob patterns or http(s) URLs. They are
/// merged in the order given and the result is written to the output
/// directory under a generated, timestamped name.
#[derive(Parser, Debug)]
#[command(name = "filemerge")]
#[command(version)]
#[command(about = "Merge PDF, ZIP, CSV or text files into a single file", long_about = None)]
#[command(author)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Inputs to merge (in order)
    ///
    /// Local paths, glob patterns or http(s) URLs, freely mixed.
    ///
    /// Examples:
    ///   filemerge a.pdf https://example.com/b.pdf
    ///   filemerge --mode csv 'exports/*.csv'
    #[arg(value_name = "INPUT")]
    pub inputs: Vec<String>,

    /// Merge strategy
    ///
    /// - pdf: append the pages of every input into one document
    /// - zip: pack every input into one archive
    /// - csv: append data rows under the first input's header
    /// - text: concatenate contents under file-name banners
    #[arg(short, long, value_name = "MODE", default_value = "pdf")]
    #[arg(value_parser = ["pdf", "zip", "csv", "text", "txt"])]
    pub mode: String,

    /// Directory the merged file is written to
    #[arg(
        short,
        long,
        value_name = "DIR",
        default_value = ".",
        env = "FILEMERGE_OUTPUT_DIR"
    )]
    pub output_dir: PathBuf,

    /// Timeout for each remote download, in seconds
    #[arg(
        short,
        long,
        value_name = "SECONDS",
        default_value_t = 30,
        env = "FILEMERGE_TIMEOUT"
    )]
    pub timeout: u64,

    /// Overwrite an existing output file
    #[arg(short, long)]
    pub force: bool,

    /// Never overwrite an existing output file (default)
    #[arg(long, conflicts_with = "force")]
    pub no_clobber: bool,

    /// Reject inputs whose extension does not match the mode
    ///
    /// By default a mismatch is only a warning.
    #[arg(long)]
    pub strict: bool,

    /// Read inputs from a file (one per line)
    ///
    /// Lines starting with '#' and blank lines are skipped. Inputs from
    /// the file are merged after those given on the command line.
    #[arg(long, value_name = "FILE")]
    pub input_list: Option<PathBuf>,

    /// Print the outcome as JSON on stdout
    #[arg(long)]
    pub json: bool,

    /// Verbose output - show details about the inputs and the result
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress all non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Cli {
    /// Convert CLI arguments into a validated Config.
    ///
    /// `inputs` is the full input list, including entries read from
    /// `--input-list`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The mode is unknown
    /// - Configuration validation fails
    pub fn to_config(&self, inputs: Vec<String>) -> Result<Config> {
        let mode: MergeMode = self.mode.parse()?;

        let overwrite_mode = if self.force {
            OverwriteMode::Force
        } else {
            OverwriteMode::NoClobber
        };

        let config = Config {
            inputs,
            mode,
            output_dir: self.output_dir.clone(),
            overwrite_mode,
            fetch: FetchSettings {
                timeout: Duration::from_secs(self.timeout),
                ..FetchSettings::default()
            },
            strict: self.strict,
            quiet: self.quiet,
            verbose: self.verbose,
            json: self.json,
        };

        config.validate().map_err(|e| {
            FileMergeError::invalid_config(format!("Configuration validation failed: {e}"))
        })?;

        Ok(config)
    }

    /// Validate CLI arguments before processing.
    ///
    /// # Errors
    ///
    /// Returns an error if neither inputs nor an input list were given, or
    /// the timeout is zero.
    pub fn validate(&self) -> Result<()> {
        if self.inputs.is_empty() && self.input_list.is_none() {
            return Err(FileMergeError::invalid_config("No input files specified"));
        }

        if self.timeout == 0 {
            return Err(FileMergeError::invalid_config(
                "Timeout must be at least 1 second",
            ));
        }

        Ok(())
    }
}
