//! Mapping between storage paths and external key names.
//!
//! External keys may carry [`NO_CACHE_PREFIX`]; caching layers in front of
//! the namespace treat such keys as uncacheable. The marker is always
//! stripped before a key addresses the backend, and the remainder is
//! percent-decoded.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};

/// Marker carried by keys that must bypass caches.
pub const NO_CACHE_PREFIX: &str = "$__ASSETKV_NO_CACHE__$/";

/// Everything except `A-Z a-z 0-9 - _ . ! ~ * ' ( )`.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// How storage paths are rendered as external keys.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KeyEncoding {
    /// Paths are keys as-is. Only a path that itself begins with the marker
    /// is escaped, so it survives [`KeyCodec::decode`].
    #[default]
    Escaped,
    /// Every key carries the no-cache marker.
    NoCache,
}

impl std::fmt::Display for KeyEncoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Escaped => f.write_str("escaped"),
            Self::NoCache => f.write_str("no-cache"),
        }
    }
}

impl std::str::FromStr for KeyEncoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "escaped" => Ok(Self::Escaped),
            "no-cache" => Ok(Self::NoCache),
            other => Err(format!("unknown key encoding: {other}")),
        }
    }
}

/// Encodes storage paths to external keys and back.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KeyCodec {
    encoding: KeyEncoding,
}

impl KeyCodec {
    pub const fn new(encoding: KeyEncoding) -> Self {
        Self { encoding }
    }

    pub const fn no_cache() -> Self {
        Self::new(KeyEncoding::NoCache)
    }

    pub fn encoding(&self) -> KeyEncoding {
        self.encoding
    }

    /// Render a storage path as an external key.
    pub fn encode(&self, raw: &str) -> String {
        match self.encoding {
            KeyEncoding::Escaped if !raw.starts_with(NO_CACHE_PREFIX) => raw.to_string(),
            _ => with_marker(raw),
        }
    }

    /// Turn an external key into the storage path it addresses.
    ///
    /// Never fails: a marked key whose remainder is not valid
    /// percent-encoded UTF-8 addresses the remainder literally.
    pub fn decode(&self, external: &str) -> String {
        decode_key(external)
    }
}

fn with_marker(raw: &str) -> String {
    let mut key = String::with_capacity(NO_CACHE_PREFIX.len() + raw.len());
    key.push_str(NO_CACHE_PREFIX);
    key.extend(utf8_percent_encode(raw, COMPONENT));
    key
}

/// Strip [`NO_CACHE_PREFIX`] and percent-decode what follows. Keys without
/// the marker are returned unchanged.
pub fn decode_key(external: &str) -> String {
    match external.strip_prefix(NO_CACHE_PREFIX) {
        Some(rest) => match percent_decode_str(rest).decode_utf8() {
            Ok(decoded) => decoded.into_owned(),
            Err(_) => rest.to_string(),
        },
        None => external.to_string(),
    }
}
