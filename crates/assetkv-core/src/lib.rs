//! Key-value namespace emulation over directory-backed blob storage.
//!
//! A hosted key-value service lists keys in UTF-8 byte order with
//! prefix filtering and opaque resume cursors. This crate reproduces those
//! semantics on top of a [`BlobStore`](assetkv_store::BlobStore) that can
//! only list one directory at a time.
//!
//! # Modules
//!
//! - [`codec`] -- storage path to external key mapping ([`KeyCodec`])
//! - [`walker`] -- lazy depth-first leaf enumeration ([`DirectoryWalker`])
//! - [`options`] -- validated list parameters ([`ListOptions`])
//! - [`list`] -- sort and paginate ([`ListQueryProcessor`])
//! - [`manifest`] -- path to no-cache key map ([`build_manifest`])

pub mod codec;
pub mod error;
pub mod list;
pub mod manifest;
pub mod options;
pub mod walker;

pub use codec::{decode_key, KeyCodec, KeyEncoding, NO_CACHE_PREFIX};
pub use error::{KvError, KvResult};
pub use list::{decode_cursor, encode_cursor, paginate, KeyName, ListPage, ListQueryProcessor};
pub use manifest::{build_manifest, StaticContentManifest};
pub use options::{ListOptions, MAX_KEY_SIZE, MAX_LIST_KEYS};
pub use walker::{walk, DirectoryWalker};
