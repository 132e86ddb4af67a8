use async_trait::async_trait;
use bytes::Bytes;

use crate::error::StoreResult;
use crate::object::BlobResponse;

/// Path-addressed blob backend.
///
/// All implementations must satisfy these invariants:
/// - `fetch` on a directory returns its children in backend order; callers
///   impose any ordering they need.
/// - `fetch` never follows a path outside the store root.
/// - Concurrent fetches are always safe.
/// - All I/O errors are propagated, never silently ignored.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Fetch whatever lives at `path`: a directory listing, a blob, or
    /// [`BlobResponse::NotFound`].
    ///
    /// The empty path addresses the root directory.
    async fn fetch(&self, path: &str) -> StoreResult<BlobResponse>;

    /// Store a single blob at `path`, replacing any existing one.
    ///
    /// Backends that are not writable return
    /// [`StoreError::ReadOnly`](crate::StoreError::ReadOnly).
    async fn put(&self, path: &str, data: Bytes) -> StoreResult<()>;
}
