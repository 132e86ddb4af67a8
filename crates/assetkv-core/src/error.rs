use thiserror::Error;

use assetkv_store::StoreError;

/// Errors from key-value namespace operations.
#[derive(Debug, Error)]
pub enum KvError {
    /// `limit` was not a positive integer within bounds.
    #[error("Invalid key_count_limit of {value}. {reason}")]
    InvalidLimit { value: String, reason: String },

    /// A key or prefix is longer than the namespace allows.
    #[error("UTF-8 encoded length of {length} exceeds key length limit of {max}.")]
    KeyTooLong { length: usize, max: usize },

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

pub type KvResult<T> = Result<T, KvError>;
