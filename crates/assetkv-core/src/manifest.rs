//! Static content manifest: every asset path mapped to the cache-bypassing
//! key clients should request it by.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use assetkv_store::BlobStore;

use crate::codec::KeyCodec;
use crate::error::KvResult;
use crate::walker::DirectoryWalker;

/// Asset path to external key, ordered by path.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StaticContentManifest {
    entries: BTreeMap<String, String>,
}

impl StaticContentManifest {
    pub fn get(&self, path: &str) -> Option<&str> {
        self.entries.get(path).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Walk the whole store and map each leaf to its no-cache key.
pub async fn build_manifest<S: BlobStore + ?Sized>(store: &S) -> KvResult<StaticContentManifest> {
    let codec = KeyCodec::no_cache();
    let mut walker = DirectoryWalker::new(store, "");
    let mut entries = BTreeMap::new();
    while let Some(path) = walker.next().await? {
        let key = codec.encode(&path);
        entries.insert(path, key);
    }
    Ok(StaticContentManifest { entries })
}
