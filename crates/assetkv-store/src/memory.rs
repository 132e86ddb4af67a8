use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::{StoreError, StoreResult};
use crate::object::{Blob, BlobResponse, DirectoryEntry, EntryKind};
use crate::path::normalize_path;
use crate::traits::BlobStore;

/// In-memory, map-based blob store.
///
/// Intended for tests and embedding. Only leaves are stored; directories
/// exist implicitly wherever a stored path has further segments. Listings
/// come back in name order.
pub struct InMemoryBlobStore {
    blobs: RwLock<BTreeMap<String, Bytes>>,
}

impl InMemoryBlobStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            blobs: RwLock::new(BTreeMap::new()),
        }
    }

    /// Build a store holding `paths`, each with its own path as content.
    pub fn with_paths<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let store = Self::new();
        {
            let mut map = store.blobs.write().expect("lock poisoned");
            for path in paths {
                let path = path.as_ref();
                map.insert(path.to_string(), Bytes::copy_from_slice(path.as_bytes()));
            }
        }
        store
    }

    /// Insert a blob synchronously.
    pub fn insert(&self, path: &str, data: impl Into<Bytes>) -> StoreResult<()> {
        let path = normalize_path(path)?;
        if path.is_empty() {
            return Err(StoreError::invalid_path("", "cannot store a blob at the root"));
        }
        self.blobs
            .write()
            .expect("lock poisoned")
            .insert(path, data.into());
        Ok(())
    }

    /// Remove a blob. Returns `true` if it existed.
    pub fn remove(&self, path: &str) -> bool {
        self.blobs
            .write()
            .expect("lock poisoned")
            .remove(path)
            .is_some()
    }

    /// Number of blobs currently stored.
    pub fn len(&self) -> usize {
        self.blobs.read().expect("lock poisoned").len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.blobs.read().expect("lock poisoned").is_empty()
    }

    fn list(map: &BTreeMap<String, Bytes>, dir: &str) -> Option<Vec<DirectoryEntry>> {
        let prefix = if dir.is_empty() {
            String::new()
        } else {
            format!("{dir}/")
        };
        let mut children: BTreeMap<&str, EntryKind> = BTreeMap::new();
        for path in map.range(prefix.clone()..).map(|(k, _)| k) {
            let Some(rest) = path.strip_prefix(&prefix) else {
                break;
            };
            match rest.split_once('/') {
                Some((child, _)) => {
                    children.insert(child, EntryKind::Directory);
                }
                None => {
                    children.entry(rest).or_insert(EntryKind::File);
                }
            }
        }
        if children.is_empty() && !dir.is_empty() {
            return None;
        }
        Some(
            children
                .into_iter()
                .map(|(name, kind)| DirectoryEntry::new(name, kind))
                .collect(),
        )
    }
}

impl Default for InMemoryBlobStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn fetch(&self, path: &str) -> StoreResult<BlobResponse> {
        let path = normalize_path(path)?;
        let map = self.blobs.read().expect("lock poisoned");
        if let Some(data) = map.get(&path) {
            return Ok(BlobResponse::Blob(Blob::new(data.clone())));
        }
        Ok(match Self::list(&map, &path) {
            Some(entries) => BlobResponse::Directory(entries),
            None => BlobResponse::NotFound,
        })
    }

    async fn put(&self, path: &str, data: Bytes) -> StoreResult<()> {
        self.insert(path, data)
    }
}

impl std::fmt::Debug for InMemoryBlobStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryBlobStore")
            .field("blob_count", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(response: BlobResponse) -> Vec<(String, EntryKind)> {
        match response {
            BlobResponse::Directory(entries) => {
                entries.into_iter().map(|e| (e.name, e.kind)).collect()
            }
            other => panic!("expected directory, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_root_is_an_empty_directory() {
        let store = InMemoryBlobStore::new();
        assert_eq!(store.fetch("").await.unwrap(), BlobResponse::Directory(vec![]));
    }

    #[tokio::test]
    async fn root_listing_synthesizes_directories() {
        let store = InMemoryBlobStore::with_paths(["index.html", "css/site.css", "css/print.css"]);
        assert_eq!(
            names(store.fetch("").await.unwrap()),
            vec![
                ("css".to_string(), EntryKind::Directory),
                ("index.html".to_string(), EntryKind::File),
            ]
        );
        assert_eq!(
            names(store.fetch("css").await.unwrap()),
            vec![
                ("print.css".to_string(), EntryKind::File),
                ("site.css".to_string(), EntryKind::File),
            ]
        );
    }

    #[tokio::test]
    async fn sibling_with_shared_prefix_is_not_a_child() {
        let store = InMemoryBlobStore::with_paths(["a/x", "a-b", "ab/y"]);
        assert_eq!(
            names(store.fetch("a").await.unwrap()),
            vec![("x".to_string(), EntryKind::File)]
        );
    }

    #[tokio::test]
    async fn fetch_blob_and_missing() {
        let store = InMemoryBlobStore::new();
        store.put("/docs/readme.md", Bytes::from_static(b"# hi")).await.unwrap();
        match store.fetch("docs/readme.md").await.unwrap() {
            BlobResponse::Blob(blob) => assert_eq!(&blob.data[..], b"# hi"),
            other => panic!("expected blob, got {other:?}"),
        }
        assert!(store.fetch("docs/missing.md").await.unwrap().is_not_found());
        assert!(matches!(store.fetch("docs").await.unwrap(), BlobResponse::Directory(_)));
        assert!(store.fetch("nope").await.unwrap().is_not_found());
    }

    #[tokio::test]
    async fn remove_makes_path_vanish() {
        let store = InMemoryBlobStore::with_paths(["a", "b"]);
        assert!(store.remove("a"));
        assert!(!store.remove("a"));
        assert_eq!(store.len(), 1);
        assert!(store.fetch("a").await.unwrap().is_not_found());
    }

    #[tokio::test]
    async fn rejects_traversal() {
        let store = InMemoryBlobStore::new();
        assert!(matches!(
            store.fetch("../secret").await,
            Err(StoreError::InvalidPath { .. })
        ));
        assert!(store.insert("", Bytes::new()).is_err());
    }
}
