//! filemerge - Merge PDF, ZIP, CSV or text files into a single file.
//!
//! Command-line front end over the `filemerge` library.

mod cli;
mod inputs;

use clap::Parser;
use std::process;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use filemerge::config::Config;
use filemerge::error::{FileMergeError, Result};
use filemerge::io::writer::DirectorySink;
use filemerge::output::{OutputFormatter, ProgressBar, display_validation_summary};
use filemerge::utils::format_file_size;
use filemerge::validation::Validator;
use filemerge::{MergeOutcome, MergedOutput, Pipeline};

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    // Run the application and handle errors
    if let Err(err) = run(cli).await {
        OutputFormatter::new(false, false).error(&format!("Error: {err}"));
        process::exit(err.exit_code());
    }
}

/// Send library logs to stderr. `RUST_LOG` overrides the default level.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Main application logic.
async fn run(cli: Cli) -> Result<()> {
    // Validate CLI arguments
    cli.validate()?;

    // Get all inputs (including from input-list if specified)
    let all_inputs = inputs::collect_inputs(&cli.inputs, cli.input_list.as_deref()).await?;
    let config = cli.to_config(all_inputs)?;

    let formatter = OutputFormatter::from_config(&config);

    if formatter.should_print() {
        formatter.section(&format!("{} v{}", filemerge::NAME, filemerge::VERSION));
        formatter.blank_line();
    }

    // Read local inputs and validate the working set
    let mut files = inputs::load_file_set(&config).await?;

    let validator = if config.strict {
        Validator::strict()
    } else {
        Validator::new()
    };
    let summary = validator.validate(files.descriptors(), config.mode)?;

    if config.should_print() {
        display_validation_summary(&formatter, &summary);
        formatter.blank_line();
    }

    let pipeline = Pipeline::from_config(&config)?;
    let mut progress = if config.should_print() {
        ProgressBar::new()
    } else {
        ProgressBar::disabled()
    };

    let result = pipeline
        .try_merge(files.descriptors_mut(), config.mode, &mut progress)
        .await;

    match result {
        Ok(output) => {
            progress.finish();
            report_success(&config, &formatter, pipeline.sink(), &output)?;
            Ok(())
        }
        Err(err) => {
            progress.reset();
            if config.json {
                print_json(&MergeOutcome::Failure {
                    error: err.to_string(),
                })?;
            }
            Err(err)
        }
    }
}

fn report_success(
    config: &Config,
    formatter: &OutputFormatter,
    sink: &DirectorySink,
    output: &MergedOutput,
) -> Result<()> {
    let path = sink.path_for(output);

    if config.json {
        return print_json(&MergeOutcome::Success(output.clone()));
    }

    if formatter.should_print() {
        formatter.blank_line();
        formatter.success(&format!(
            "Successfully created {} ({})",
            path.display(),
            format_file_size(output.len() as u64)
        ));

        if formatter.is_verbose() {
            formatter.blank_line();
            formatter.section("Statistics");
            formatter.detail("Mode", config.mode.as_str());
            formatter.detail("Input files", &config.inputs.len().to_string());
            formatter.detail("Media type", output.media_type);
            formatter.detail("Output size", &format_file_size(output.len() as u64));
        }
    }

    Ok(())
}

fn print_json(outcome: &MergeOutcome) -> Result<()> {
    let json = outcome
        .report()
        .to_json()
        .map_err(|e| FileMergeError::other(format!("Failed to serialize outcome: {e}")))?;
    println!("{json}");
    Ok(())
}
