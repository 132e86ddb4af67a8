use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::object::{Blob, BlobResponse, DirectoryEntry, EntryKind};
use crate::path::normalize_path;
use crate::traits::BlobStore;

/// Blob store backed by a directory on disk.
///
/// Fetching a directory lists its children with their file types (symlinks
/// are reported, not followed). Fetching a file returns its bytes as
/// `application/octet-stream`.
#[derive(Clone, Debug)]
pub struct FsBlobStore {
    root: PathBuf,
    writable: bool,
}

impl FsBlobStore {
    /// Open a read-only store rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            writable: false,
        }
    }

    /// Allow [`BlobStore::put`] to write into the root.
    pub fn writable(mut self, writable: bool) -> Self {
        self.writable = writable;
        self
    }

    fn resolve(&self, path: &str) -> StoreResult<PathBuf> {
        let normalized = normalize_path(path)?;
        if normalized.is_empty() {
            return Ok(self.root.clone());
        }
        Ok(normalized
            .split('/')
            .fold(self.root.clone(), |acc, segment| acc.join(segment)))
    }

    async fn read_directory(dir: &Path) -> StoreResult<Vec<DirectoryEntry>> {
        let mut reader = fs::read_dir(dir).await?;
        let mut entries = Vec::new();
        while let Some(entry) = reader.next_entry().await? {
            let Ok(name) = entry.file_name().into_string() else {
                debug!(path = ?entry.path(), "skipping entry with non-UTF-8 name");
                continue;
            };
            let kind = entry_kind(&entry.file_type().await?);
            entries.push(DirectoryEntry::new(name, kind));
        }
        Ok(entries)
    }
}

#[cfg(unix)]
fn entry_kind(file_type: &std::fs::FileType) -> EntryKind {
    use std::os::unix::fs::FileTypeExt;

    if file_type.is_dir() {
        EntryKind::Directory
    } else if file_type.is_file() {
        EntryKind::File
    } else if file_type.is_symlink() {
        EntryKind::Symlink
    } else if file_type.is_block_device() {
        EntryKind::BlockDevice
    } else if file_type.is_char_device() {
        EntryKind::CharacterDevice
    } else if file_type.is_fifo() {
        EntryKind::NamedPipe
    } else if file_type.is_socket() {
        EntryKind::Socket
    } else {
        EntryKind::Other
    }
}

#[cfg(not(unix))]
fn entry_kind(file_type: &std::fs::FileType) -> EntryKind {
    if file_type.is_dir() {
        EntryKind::Directory
    } else if file_type.is_file() {
        EntryKind::File
    } else if file_type.is_symlink() {
        EntryKind::Symlink
    } else {
        EntryKind::Other
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn fetch(&self, path: &str) -> StoreResult<BlobResponse> {
        let target = self.resolve(path)?;
        let metadata = match fs::metadata(&target).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BlobResponse::NotFound),
            Err(e) => return Err(e.into()),
        };
        if metadata.is_dir() {
            debug!(path, "listing directory");
            return Ok(BlobResponse::Directory(Self::read_directory(&target).await?));
        }
        match fs::read(&target).await {
            Ok(data) => Ok(BlobResponse::Blob(Blob::new(data))),
            // Removed between the metadata call and the read.
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BlobResponse::NotFound),
            Err(e) => Err(e.into()),
        }
    }

    async fn put(&self, path: &str, data: Bytes) -> StoreResult<()> {
        if !self.writable {
            return Err(StoreError::ReadOnly);
        }
        let target = self.resolve(path)?;
        if target == self.root {
            return Err(StoreError::invalid_path(path, "cannot store a blob at the root"));
        }
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&target, &data).await?;
        Ok(())
    }
}
