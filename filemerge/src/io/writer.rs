//! Output delivery.
//!
//! A merged blob is handed to an [`OutputSink`]. [`DirectorySink`] writes it
//! under its generated file name with:
//! - Atomic writes (write to a temp file, then rename)
//! - Overwrite protection
//! - Cleanup of the temp file on failure
//!
//! [`MemorySink`] keeps outputs in memory, for embedding and tests.
//!
//! # Examples
//!
//! ```no_run
//! use filemerge::io::writer::{DirectorySink, OutputSink};
//! use filemerge::config::OverwriteMode;
//! use filemerge::merge::{MergeMode, MergedOutput};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let sink = DirectorySink::new("out", OverwriteMode::NoClobber);
//! let output = MergedOutput::new(MergeMode::Text, 1_700_000_000_000, b"hello".to_vec());
//! sink.deliver(&output).await?;
//! # Ok(())
//! # }
//! ```

use futures::FutureExt;
use futures::future::BoxFuture;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use crate::config::{Config, OverwriteMode};
use crate::error::{FileMergeError, Result};
use crate::merge::MergedOutput;

/// Destination for a merged output.
pub trait OutputSink: Send + Sync {
    /// Deliver `output`. Called at most once per merge run.
    fn deliver<'a>(&'a self, output: &'a MergedOutput) -> BoxFuture<'a, Result<()>>;
}

/// Writes outputs into a directory.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
    overwrite_mode: OverwriteMode,
}

impl DirectorySink {
    /// Create a sink writing into `dir`, created on first delivery.
    pub fn new(dir: impl Into<PathBuf>, overwrite_mode: OverwriteMode) -> Self {
        Self {
            dir: dir.into(),
            overwrite_mode,
        }
    }

    /// Create a sink from the output settings of a configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.output_dir, config.overwrite_mode)
    }

    /// Target directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Final path of `output` inside the target directory.
    pub fn path_for(&self, output: &MergedOutput) -> PathBuf {
        self.dir.join(&output.file_name)
    }

    async fn write(&self, output: &MergedOutput) -> Result<()> {
        let path = self.path_for(output);
        let delivery_failed = |source| FileMergeError::DeliveryFailed {
            path: path.clone(),
            source,
        };

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(delivery_failed)?;

        if self.overwrite_mode == OverwriteMode::NoClobber
            && tokio::fs::try_exists(&path).await.unwrap_or(false)
        {
            return Err(FileMergeError::OutputExists { path: path.clone() });
        }

        let temp_path = self.dir.join(format!(".{}.tmp", output.file_name));
        if let Err(source) = tokio::fs::write(&temp_path, &output.bytes).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(delivery_failed(source));
        }

        if let Err(source) = tokio::fs::rename(&temp_path, &path).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(delivery_failed(source));
        }

        tracing::info!(path = %path.display(), size = output.len(), "output written");
        Ok(())
    }
}

impl OutputSink for DirectorySink {
    fn deliver<'a>(&'a self, output: &'a MergedOutput) -> BoxFuture<'a, Result<()>> {
        self.write(output).boxed()
    }
}

/// Keeps delivered outputs in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    outputs: Mutex<Vec<MergedOutput>>,
}

impl MemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies of everything delivered so far, oldest first.
    pub fn outputs(&self) -> Vec<MergedOutput> {
        self.outputs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Drain delivered outputs.
    pub fn take(&self) -> Vec<MergedOutput> {
        std::mem::take(&mut *self.outputs.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl OutputSink for MemorySink {
    fn deliver<'a>(&'a self, output: &'a MergedOutput) -> BoxFuture<'a, Result<()>> {
        self.outputs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(output.clone());
        futures::future::ready(Ok(())).boxed()
    }
}
