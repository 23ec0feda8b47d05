//! The merge run: acquire, merge, deliver.
//!
//! [`Pipeline::merge`] is the single failure boundary of a run. Errors from
//! any stage are caught there and turned into [`MergeOutcome::Failure`];
//! nothing is delivered unless every stage before delivery succeeded.
//!
//! # Examples
//!
//! ```no_run
//! use filemerge::{FileSet, MergeMode, Pipeline};
//! use filemerge::config::Config;
//! use filemerge::output::ProgressEvent;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut files = FileSet::new();
//! files.add_urls(["https://example.com/a.csv", "https://example.com/b.csv"]);
//!
//! let config = Config::new(vec![], MergeMode::Csv);
//! let pipeline = Pipeline::from_config(&config)?;
//! let outcome = pipeline
//!     .merge(files.descriptors_mut(), MergeMode::Csv, &mut |e: ProgressEvent| {
//!         println!("{:>3}% {}", e.percentage, e.message);
//!     })
//!     .await;
//!
//! println!("{}", outcome.report().to_json()?);
//! # Ok(())
//! # }
//! ```

use serde::Serialize;

use crate::config::Config;
use crate::descriptor::{FileDescriptor, FileStatus};
use crate::error::{FileMergeError, Result};
use crate::io::acquire::Acquirer;
use crate::io::fetch::{HttpFetcher, RemoteFetcher};
use crate::io::writer::{DirectorySink, OutputSink};
use crate::merge::{MergeMode, MergedOutput, merge_files};
use crate::output::progress::{ProgressEvent, ProgressReporter};
use crate::utils::timestamp_millis;

/// Result of one merge run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// The merged output was produced and delivered.
    Success(MergedOutput),
    /// The run failed; nothing was delivered.
    Failure {
        /// Human-readable error message.
        error: String,
    },
}

impl From<Result<MergedOutput>> for MergeOutcome {
    fn from(result: Result<MergedOutput>) -> Self {
        match result {
            Ok(output) => Self::Success(output),
            Err(err) => Self::Failure {
                error: err.to_string(),
            },
        }
    }
}

impl MergeOutcome {
    /// Whether the run succeeded.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// The delivered output, if the run succeeded.
    pub fn output(&self) -> Option<&MergedOutput> {
        match self {
            Self::Success(output) => Some(output),
            Self::Failure { .. } => None,
        }
    }

    /// The error message, if the run failed.
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Success(_) => None,
            Self::Failure { error } => Some(error),
        }
    }

    /// Serializable summary of the outcome.
    pub fn report(&self) -> OutcomeReport {
        match self {
            Self::Success(output) => OutcomeReport {
                success: true,
                file_name: Some(output.file_name.clone()),
                media_type: Some(output.media_type),
                size: Some(output.len()),
                error: None,
            },
            Self::Failure { error } => OutcomeReport {
                success: false,
                file_name: None,
                media_type: None,
                size: None,
                error: Some(error.clone()),
            },
        }
    }
}

/// JSON shape of a [`MergeOutcome`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutcomeReport {
    /// Whether the run succeeded.
    pub success: bool,
    /// Generated output file name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    /// Output media type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_type: Option<&'static str>,
    /// Output size in bytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<usize>,
    /// Error message of a failed run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl OutcomeReport {
    /// Render as pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Orchestrates merge runs over a fetcher and a sink.
pub struct Pipeline<F = HttpFetcher, S = DirectorySink> {
    fetcher: F,
    sink: S,
    clock: fn() -> i64,
}

impl Pipeline {
    /// Build the default HTTP + directory pipeline from a configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(
            HttpFetcher::with_settings(&config.fetch)?,
            DirectorySink::from_config(config),
        ))
    }
}

impl<F: RemoteFetcher, S: OutputSink> Pipeline<F, S> {
    /// Create a pipeline stamping outputs with the current time.
    pub fn new(fetcher: F, sink: S) -> Self {
        Self {
            fetcher,
            sink,
            clock: timestamp_millis,
        }
    }

    /// Replace the clock used for output file names.
    pub fn with_clock(mut self, clock: fn() -> i64) -> Self {
        self.clock = clock;
        self
    }

    /// The remote fetcher.
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// The output sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Run one merge over `descriptors`.
    ///
    /// Progress goes 0 (start), up to 40 (acquisition), 50 (merging),
    /// 90 (delivery), 100 (done). On success every descriptor is marked
    /// [`FileStatus::Completed`]. If a strategy or delivery fails, every
    /// descriptor is marked [`FileStatus::Error`]; if acquisition fails,
    /// only the input that could not be fetched is.
    ///
    /// Fewer than two descriptors is not rejected here; see
    /// [`Validator`](crate::validation::Validator).
    pub async fn merge(
        &self,
        descriptors: &mut [FileDescriptor],
        mode: MergeMode,
        progress: &mut dyn ProgressReporter,
    ) -> MergeOutcome {
        self.try_merge(descriptors, mode, progress).await.into()
    }

    /// Same run as [`merge`](Self::merge), keeping the typed error.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by acquisition, the strategy or
    /// delivery.
    pub async fn try_merge(
        &self,
        descriptors: &mut [FileDescriptor],
        mode: MergeMode,
        progress: &mut dyn ProgressReporter,
    ) -> Result<MergedOutput> {
        match self.run(descriptors, mode, progress).await {
            Ok(output) => {
                for descriptor in descriptors.iter_mut() {
                    descriptor.set_status(FileStatus::Completed);
                }
                Ok(output)
            }
            Err(err) => {
                tracing::error!(%mode, error = %err, "merge run failed");
                Err(err)
            }
        }
    }

    /// Like [`merge`](Self::merge), with the mode given by name.
    ///
    /// An unknown name fails the run before anything is fetched.
    pub async fn merge_named(
        &self,
        descriptors: &mut [FileDescriptor],
        mode_name: &str,
        progress: &mut dyn ProgressReporter,
    ) -> MergeOutcome {
        match mode_name.parse::<MergeMode>() {
            Ok(mode) => self.merge(descriptors, mode, progress).await,
            Err(err) => {
                tracing::error!(mode = mode_name, "unsupported merge mode");
                MergeOutcome::from(Err::<MergedOutput, _>(err))
            }
        }
    }

    async fn run(
        &self,
        descriptors: &mut [FileDescriptor],
        mode: MergeMode,
        progress: &mut dyn ProgressReporter,
    ) -> Result<MergedOutput> {
        progress.report(ProgressEvent::new(0, "Starting file processing..."));

        let resolved = Acquirer::new(&self.fetcher)
            .resolve(descriptors, progress)
            .await?;

        progress.report(ProgressEvent::new(50, "Merging files..."));
        let timestamp = (self.clock)();
        let merged = tokio::task::spawn_blocking(move || merge_files(mode, &resolved, timestamp))
            .await
            .map_err(|e| FileMergeError::other(format!("Merge task failed: {e}")))
            .and_then(|result| result);

        let delivered = match merged {
            Ok(output) => {
                progress.report(ProgressEvent::new(90, "Preparing output..."));
                self.sink.deliver(&output).await.map(|()| output)
            }
            Err(err) => Err(err),
        };

        match delivered {
            Ok(output) => {
                progress.report(ProgressEvent::new(100, "Done"));
                Ok(output)
            }
            Err(err) => {
                for descriptor in descriptors.iter_mut() {
                    descriptor.set_status(FileStatus::Error);
                }
                Err(err)
            }
        }
    }
}
