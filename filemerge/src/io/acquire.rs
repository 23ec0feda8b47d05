//! Acquisition stage: descriptors in, resolved files out.
//!
//! Inputs are resolved one at a time, in list order. The first failure
//! aborts the stage; nothing fetched so far is returned.

use std::error::Error as _;

use crate::descriptor::{FileDescriptor, FileStatus, Origin, ResolvedFile};
use crate::error::{FileMergeError, Result};
use crate::io::fetch::RemoteFetcher;
use crate::output::progress::{ProgressEvent, ProgressReporter, acquisition_percentage};

/// Resolves descriptors into in-memory files.
pub struct Acquirer<'f, F: ?Sized> {
    fetcher: &'f F,
}

impl<'f, F: RemoteFetcher + ?Sized> Acquirer<'f, F> {
    /// Create an acquirer that fetches remote inputs with `fetcher`.
    pub fn new(fetcher: &'f F) -> Self {
        Self { fetcher }
    }

    /// Resolve every descriptor, reporting progress in the 0-40% band.
    ///
    /// Each descriptor is marked [`FileStatus::Processing`] as its turn
    /// comes. When a fetch fails, that descriptor is marked
    /// [`FileStatus::Error`] and the ones already resolved get their
    /// previous status back.
    ///
    /// # Errors
    ///
    /// Returns [`FileMergeError::Acquisition`] naming the first input that
    /// could not be fetched, with the transport error as the reason.
    pub async fn resolve(
        &self,
        descriptors: &mut [FileDescriptor],
        progress: &mut dyn ProgressReporter,
    ) -> Result<Vec<ResolvedFile>> {
        let total = descriptors.len();
        let previous: Vec<FileStatus> = descriptors.iter().map(|d| d.status()).collect();
        let mut resolved = Vec::with_capacity(total);

        for index in 0..total {
            let descriptor = &mut descriptors[index];
            progress.report(ProgressEvent::new(
                acquisition_percentage(index, total),
                format!("Downloading {}...", descriptor.name()),
            ));
            descriptor.set_status(FileStatus::Processing);

            let bytes = match descriptor.origin() {
                Origin::Remote(url) => {
                    tracing::info!(name = descriptor.name(), url = %url, "fetching remote input");
                    let fetched = self.fetcher.fetch(url).await;
                    match fetched {
                        Ok(bytes) => bytes,
                        Err(err) => {
                            tracing::warn!(name = descriptor.name(), error = %err, "remote fetch failed");
                            descriptor.set_status(FileStatus::Error);
                            let err =
                                FileMergeError::acquisition(descriptor.name(), describe(&err));
                            let earlier = descriptors[..index].iter_mut().zip(&previous);
                            for (descriptor, status) in earlier {
                                descriptor.set_status(*status);
                            }
                            return Err(err);
                        }
                    }
                }
                Origin::Local(bytes) => bytes.clone(),
            };

            tracing::debug!(name = descriptor.name(), size = bytes.len(), "input resolved");
            resolved.push(ResolvedFile::new(descriptor.name(), bytes));
        }

        Ok(resolved)
    }
}

/// Error message followed by any underlying causes not already in it.
fn describe(err: &FileMergeError) -> String {
    let mut message = err.to_string();
    let mut source = err.source();

    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }

    message
}
