use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Content type a store reports for directory listings.
pub const DIRECTORY_CONTENT_TYPE: &str = "application/json";

/// Content type a store reports for raw blobs.
pub const BLOB_CONTENT_TYPE: &str = "application/octet-stream";

// ---------------------------------------------------------------------------
// Directory entries
// ---------------------------------------------------------------------------

/// Kind of a directory child, as reported by the backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntryKind {
    File,
    Directory,
    Symlink,
    BlockDevice,
    CharacterDevice,
    NamedPipe,
    Socket,
    Other,
}

impl EntryKind {
    /// Only directories expand during a walk; every other kind is a leaf.
    pub fn is_directory(&self) -> bool {
        matches!(self, Self::Directory)
    }
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::File => "file",
            Self::Directory => "directory",
            Self::Symlink => "symlink",
            Self::BlockDevice => "blockDevice",
            Self::CharacterDevice => "characterDevice",
            Self::NamedPipe => "namedPipe",
            Self::Socket => "socket",
            Self::Other => "other",
        };
        f.write_str(name)
    }
}

/// One child of a directory listing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    /// Entry name (a single path segment).
    pub name: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
}

impl DirectoryEntry {
    pub fn new(name: impl Into<String>, kind: EntryKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    pub fn file(name: impl Into<String>) -> Self {
        Self::new(name, EntryKind::File)
    }

    pub fn directory(name: impl Into<String>) -> Self {
        Self::new(name, EntryKind::Directory)
    }
}

// ---------------------------------------------------------------------------
// Fetch responses
// ---------------------------------------------------------------------------

/// Raw content returned for a leaf path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Blob {
    pub data: Bytes,
    pub content_type: String,
}

impl Blob {
    /// Create an `application/octet-stream` blob.
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self {
            data: data.into(),
            content_type: BLOB_CONTENT_TYPE.to_string(),
        }
    }
}

/// Result of fetching a path from a [`BlobStore`](crate::BlobStore).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BlobResponse {
    /// The path is a directory; entries are in backend order.
    Directory(Vec<DirectoryEntry>),
    /// The path is a leaf.
    Blob(Blob),
    /// Nothing exists at the path.
    NotFound,
}

impl BlobResponse {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }

    pub fn content_type(&self) -> Option<&str> {
        match self {
            Self::Directory(_) => Some(DIRECTORY_CONTENT_TYPE),
            Self::Blob(blob) => Some(&blob.content_type),
            Self::NotFound => None,
        }
    }
}
