//! filemerge - Combine several files into one.
//!
//! This library gathers inputs from HTTP(S) URLs or memory and merges them
//! with one of four strategies:
//!
//! - **PDF**: pages of every input appended into one document
//! - **ZIP**: every input packed as an archive entry
//! - **CSV**: data rows appended under a single header
//! - **Text**: contents concatenated under file-name banners
//!
//! A merge run resolves every input, runs the selected strategy and hands
//! the result to an output sink, streaming progress as it goes. Any failure
//! ends the run without delivering anything.
//!
//! # Examples
//!
//! ## Merging in memory
//!
//! ```no_run
//! use filemerge::io::{HttpFetcher, MemorySink};
//! use filemerge::output::NoProgress;
//! use filemerge::{FileSet, MergeMode, MergeOutcome, Pipeline};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut files = FileSet::new();
//! files.add_local("a.txt", b"hello".to_vec());
//! files.add_urls(["https://example.com/b.txt"]);
//!
//! let pipeline = Pipeline::new(HttpFetcher::new()?, MemorySink::new());
//! match pipeline
//!     .merge(files.descriptors_mut(), MergeMode::Text, &mut NoProgress)
//!     .await
//! {
//!     MergeOutcome::Success(output) => println!("{} ({} bytes)", output.file_name, output.len()),
//!     MergeOutcome::Failure { error } => eprintln!("{error}"),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Using Individual Components
//!
//! ```
//! use filemerge::ResolvedFile;
//! use filemerge::merge::{MergeMode, merge_files};
//!
//! let files = vec![
//!     ResolvedFile::new("a.csv", "id,name\n1,ada"),
//!     ResolvedFile::new("b.csv", "id,name\n2,grace"),
//! ];
//! let output = merge_files(MergeMode::Csv, &files, 1_700_000_000_000).unwrap();
//! assert_eq!(output.file_name, "merged-data-1700000000000.csv");
//! assert_eq!(output.bytes, b"id,name\n1,ada\n2,grace");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod descriptor;
pub mod error;
pub mod io;
pub mod merge;
pub mod output;
pub mod pipeline;
pub mod utils;
pub mod validation;

// Re-export commonly used types
pub use config::Config;
pub use descriptor::{FileDescriptor, FileSet, FileStatus, Origin, ResolvedFile};
pub use error::{FileMergeError, Result};
pub use merge::{MergeMode, MergedOutput};
pub use pipeline::{MergeOutcome, OutcomeReport, Pipeline};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
