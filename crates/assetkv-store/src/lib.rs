//! Path-addressed blob storage for assetkv.
//!
//! A [`BlobStore`] answers one question: what lives at this path? The answer
//! is a directory listing, a blob, or nothing. Stores know nothing about
//! keys, ordering or pagination; everything above the raw tree is built by
//! `assetkv-core`.
//!
//! # Storage Backends
//!
//! - [`FsBlobStore`] -- a directory on disk
//! - [`InMemoryBlobStore`] -- `BTreeMap`-based store for tests and embedding
//!
//! # Design Rules
//!
//! 1. Paths are `/`-separated and relative to the store root.
//! 2. No path may escape the root (see [`normalize_path`]).
//! 3. Directory listings come back in backend order.
//! 4. All I/O errors are propagated, never silently ignored.

pub mod error;
pub mod fs;
pub mod memory;
pub mod object;
pub mod path;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use fs::FsBlobStore;
pub use memory::InMemoryBlobStore;
pub use object::{
    Blob, BlobResponse, DirectoryEntry, EntryKind, BLOB_CONTENT_TYPE, DIRECTORY_CONTENT_TYPE,
};
pub use path::{join_path, normalize_path};
pub use traits::BlobStore;
