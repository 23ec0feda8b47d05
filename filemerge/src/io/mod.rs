//! I/O at the edges of a merge run.
//!
//! - [`fetch`]: downloading remote inputs
//! - [`acquire`]: turning descriptors into resolved files
//! - [`writer`]: delivering the merged output

pub mod acquire;
pub mod fetch;
pub mod writer;

pub use acquire::Acquirer;
pub use fetch::{HttpFetcher, RemoteFetcher};
pub use writer::{DirectorySink, MemorySink, OutputSink};
