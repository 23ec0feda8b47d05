//! Input descriptors and the caller-owned working set.
//!
//! A [`FileDescriptor`] references an input that has not been read yet:
//! either a remote URL or bytes already resident in memory. The acquisition
//! stage turns descriptors into [`ResolvedFile`]s.

use serde::Serialize;
use std::fmt;

use crate::utils::name_from_url;

/// Where an input's bytes come from.
#[derive(Clone, PartialEq, Eq)]
pub enum Origin {
    /// Fetched over HTTP(S) at merge time.
    Remote(String),
    /// Already resident in memory.
    Local(Vec<u8>),
}

impl Origin {
    /// Whether this origin requires a network fetch.
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }
}

impl fmt::Debug for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remote(url) => f.debug_tuple("Remote").field(url).finish(),
            Self::Local(bytes) => write!(f, "Local({} bytes)", bytes.len()),
        }
    }
}

/// Lifecycle status of a descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    /// Remote input not fetched yet.
    Pending,
    /// Local input, bytes available.
    Ready,
    /// Being acquired by a running merge.
    Processing,
    /// Part of a merge that succeeded.
    Completed,
    /// Part of a merge that failed.
    Error,
}

/// Reference to one input file.
#[derive(Debug, Clone)]
pub struct FileDescriptor {
    id: String,
    name: String,
    origin: Origin,
    status: FileStatus,
}

impl FileDescriptor {
    /// Create a descriptor for a remote URL. Starts as [`FileStatus::Pending`].
    pub fn remote(id: impl Into<String>, name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            origin: Origin::Remote(url.into()),
            status: FileStatus::Pending,
        }
    }

    /// Create a descriptor for resident bytes. Starts as [`FileStatus::Ready`].
    pub fn local(id: impl Into<String>, name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            origin: Origin::Local(bytes),
            status: FileStatus::Ready,
        }
    }

    /// Identifier, unique within its working set.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Display name, also used as the ZIP entry name and text banner.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Where the bytes come from.
    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    /// Current status.
    pub fn status(&self) -> FileStatus {
        self.status
    }

    pub(crate) fn set_status(&mut self, status: FileStatus) {
        self.status = status;
    }
}

/// A descriptor whose bytes have been obtained.
#[derive(Clone, PartialEq, Eq)]
pub struct ResolvedFile {
    /// Display name carried over from the descriptor.
    pub name: String,
    /// Raw content.
    pub bytes: Vec<u8>,
}

impl ResolvedFile {
    /// Create a resolved file.
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

impl fmt::Debug for ResolvedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedFile")
            .field("name", &self.name)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

/// Ordered working set of descriptors owned by the caller.
///
/// Ids come from a per-set counter that never rewinds, so they stay unique
/// after removals and [`clear`](Self::clear).
#[derive(Debug, Default)]
pub struct FileSet {
    files: Vec<FileDescriptor>,
    next_seq: u64,
}

impl FileSet {
    /// Create an empty working set.
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&mut self, prefix: &str) -> String {
        let id = format!("{prefix}-{}", self.next_seq);
        self.next_seq += 1;
        id
    }

    /// Add remote inputs. Blank entries are skipped; names come from the
    /// last URL path segment, or `file-<n>` for the n-th non-blank entry of the batch.
    ///
    /// Returns the ids of the added descriptors.
    pub fn add_urls<I, S>(&mut self, urls: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let urls: Vec<String> = urls
            .into_iter()
            .map(|url| url.as_ref().trim().to_string())
            .filter(|url| !url.is_empty())
            .collect();

        urls.iter()
            .enumerate()
            .map(|(index, url)| self.add_remote(name_from_url(url, index + 1), url.as_str()))
            .collect()
    }

    /// Add one remote input under an explicit name. Returns its id.
    pub fn add_remote(&mut self, name: impl Into<String>, url: impl Into<String>) -> String {
        let id = self.next_id("url");
        self.files.push(FileDescriptor::remote(id.clone(), name, url));
        id
    }

    /// Add a resident input. Returns its id.
    pub fn add_local(&mut self, name: impl Into<String>, bytes: Vec<u8>) -> String {
        let id = self.next_id("upload");
        self.files.push(FileDescriptor::local(id.clone(), name, bytes));
        id
    }

    /// Remove a descriptor by id. Returns whether one was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.files.len();
        self.files.retain(|f| f.id != id);
        self.files.len() != before
    }

    /// Remove every descriptor.
    pub fn clear(&mut self) {
        self.files.clear();
    }

    /// Look up a descriptor by id.
    pub fn get(&self, id: &str) -> Option<&FileDescriptor> {
        self.files.iter().find(|f| f.id == id)
    }

    /// Number of descriptors.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Iterate in merge order.
    pub fn iter(&self) -> impl Iterator<Item = &FileDescriptor> {
        self.files.iter()
    }

    /// Descriptors in merge order, as a slice.
    pub fn descriptors(&self) -> &[FileDescriptor] {
        &self.files
    }

    /// Mutable access for a merge run.
    pub fn descriptors_mut(&mut self) -> &mut [FileDescriptor] {
        &mut self.files
    }
}
