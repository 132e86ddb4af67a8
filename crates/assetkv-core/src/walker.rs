//! Depth-first enumeration of leaf paths over a [`BlobStore`].

use std::vec::IntoIter;

use assetkv_store::{join_path, BlobResponse, BlobStore, DirectoryEntry, StoreResult};
use tracing::{debug, warn};

/// Lazy depth-first walk over every leaf under a root.
///
/// One backend fetch per directory, issued only when the walk reaches it.
/// The walk holds no state outside itself; walking again means building a
/// new walker.
pub struct DirectoryWalker<'a, S: BlobStore + ?Sized> {
    store: &'a S,
    root: Option<String>,
    stack: Vec<Frame>,
}

/// A directory whose remaining children have not been visited yet.
struct Frame {
    dir: String,
    entries: IntoIter<DirectoryEntry>,
}

enum Expanded {
    Directory(Frame),
    Leaf(String),
    Missing,
}

impl<'a, S: BlobStore + ?Sized> DirectoryWalker<'a, S> {
    /// Walk everything under `root` (`""` for the whole store).
    pub fn new(store: &'a S, root: impl Into<String>) -> Self {
        Self {
            store,
            root: Some(root.into()),
            stack: Vec::new(),
        }
    }

    /// Next leaf path, or `None` once the walk is exhausted.
    pub async fn next(&mut self) -> StoreResult<Option<String>> {
        if let Some(root) = self.root.take() {
            match self.expand(root).await? {
                Expanded::Directory(frame) => self.stack.push(frame),
                Expanded::Leaf(path) => return Ok(Some(path)),
                Expanded::Missing => return Ok(None),
            }
        }

        while let Some(frame) = self.stack.last_mut() {
            let Some(entry) = frame.entries.next() else {
                self.stack.pop();
                continue;
            };
            let path = join_path(&frame.dir, &entry.name);
            if !entry.kind.is_directory() {
                return Ok(Some(path));
            }
            match self.expand(path).await? {
                Expanded::Directory(frame) => self.stack.push(frame),
                Expanded::Leaf(path) => return Ok(Some(path)),
                Expanded::Missing => {}
            }
        }
        Ok(None)
    }

    /// Drain the walk into a vector.
    pub async fn collect(mut self) -> StoreResult<Vec<String>> {
        let mut paths = Vec::new();
        while let Some(path) = self.next().await? {
            paths.push(path);
        }
        Ok(paths)
    }

    async fn expand(&self, path: String) -> StoreResult<Expanded> {
        debug!(path = %path, "fetching directory");
        match self.store.fetch(&path).await? {
            BlobResponse::Directory(entries) => Ok(Expanded::Directory(Frame {
                dir: path,
                entries: entries.into_iter(),
            })),
            // An empty store has no root to speak of.
            BlobResponse::NotFound if path.is_empty() => Ok(Expanded::Missing),
            // The path stopped being a directory after it was listed. Its
            // body is dropped here and the path itself becomes the leaf.
            other => {
                warn!(path = %path, found = ?other.content_type(), "directory changed during walk; treating as leaf");
                if path.is_empty() {
                    Ok(Expanded::Missing)
                } else {
                    Ok(Expanded::Leaf(path))
                }
            }
        }
    }
}

/// Walk every leaf under `root`.
pub fn walk<'a, S: BlobStore + ?Sized>(store: &'a S, root: &str) -> DirectoryWalker<'a, S> {
    DirectoryWalker::new(store, root)
}
