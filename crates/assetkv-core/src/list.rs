//! Sorted, cursor-paginated key listing over a directory tree.
//!
//! The backend cannot answer range queries, so every call walks the whole
//! tree, filters by prefix, sorts by raw UTF-8 bytes and slices one page.
//! Cursors carry the last key of the previous page (base64); a cursor whose
//! key is no longer present ends the listing instead of failing it.

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use tracing::debug;

use assetkv_store::BlobStore;

use crate::codec::KeyCodec;
use crate::error::KvResult;
use crate::options::ListOptions;
use crate::walker::DirectoryWalker;

/// One key in a list response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyName {
    pub name: String,
}

/// One page of a key listing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListPage {
    pub keys: Vec<KeyName>,
    pub list_complete: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
}

impl ListPage {
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(|key| key.name.as_str())
    }
}

/// Encode the key a page ended on as a cursor.
pub fn encode_cursor(last_key: &str) -> String {
    STANDARD.encode(last_key.as_bytes())
}

/// Recover the key a cursor resumes after. `None` if the cursor is not
/// base64 of UTF-8 text.
pub fn decode_cursor(cursor: &str) -> Option<String> {
    let bytes = STANDARD.decode(cursor).ok()?;
    String::from_utf8(bytes).ok()
}

/// Sort `keys` by byte value and cut the page `options` asks for.
///
/// `keys` must already be prefix-filtered. Duplicates are collapsed.
/// Options outside their bounds are rejected.
pub fn paginate(mut keys: Vec<String>, options: &ListOptions) -> KvResult<ListPage> {
    options.validate()?;
    // `str::as_bytes` is a view of the stored UTF-8, so every comparison
    // works on the same byte representation without re-encoding.
    keys.sort_unstable_by(|a, b| a.as_bytes().cmp(b.as_bytes()));
    keys.dedup();

    let start = match options.cursor.as_deref() {
        None | Some("") => 0,
        Some(cursor) => match decode_cursor(cursor) {
            Some(after) => keys
                .binary_search_by(|key| key.as_bytes().cmp(after.as_bytes()))
                .map(|index| index + 1)
                .unwrap_or(keys.len()),
            None => keys.len(),
        },
    };

    let end = start.saturating_add(options.limit).min(keys.len());
    let cursor = if end < keys.len() {
        Some(encode_cursor(&keys[end - 1]))
    } else {
        None
    };
    let list_complete = cursor.is_none();
    let page: Vec<KeyName> = keys
        .drain(start..end)
        .map(|name| KeyName { name })
        .collect();

    Ok(ListPage {
        keys: page,
        list_complete,
        cursor,
    })
}

/// Serves list calls for one namespace.
#[derive(Clone)]
pub struct ListQueryProcessor {
    store: Arc<dyn BlobStore>,
    codec: KeyCodec,
}

impl ListQueryProcessor {
    pub fn new(store: Arc<dyn BlobStore>, codec: KeyCodec) -> Self {
        Self { store, codec }
    }

    pub fn codec(&self) -> KeyCodec {
        self.codec
    }

    /// Every external key in the namespace matching `prefix`, unsorted.
    pub async fn matching_keys(&self, prefix: Option<&str>) -> KvResult<Vec<String>> {
        let mut walker = DirectoryWalker::new(self.store.as_ref(), "");
        let mut keys = Vec::new();
        while let Some(path) = walker.next().await? {
            let key = self.codec.encode(&path);
            if prefix.is_some_and(|p| !key.as_bytes().starts_with(p.as_bytes())) {
                continue;
            }
            keys.push(key);
        }
        Ok(keys)
    }

    /// Produce the page `options` describes.
    pub async fn list(&self, options: &ListOptions) -> KvResult<ListPage> {
        options.validate()?;
        let keys = self.matching_keys(options.prefix.as_deref()).await?;
        let total = keys.len();
        let page = paginate(keys, options)?;
        debug!(
            prefix = ?options.prefix,
            limit = options.limit,
            matched = total,
            returned = page.keys.len(),
            list_complete = page.list_complete,
            "listed keys"
        );
        Ok(page)
    }
}

impl std::fmt::Debug for ListQueryProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListQueryProcessor")
            .field("codec", &self.codec)
            .finish_non_exhaustive()
    }
}
