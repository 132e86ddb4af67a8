use std::sync::Arc;

use axum::Router;
use tower_http::trace::TraceLayer;

use assetkv_core::{KeyCodec, ListQueryProcessor};
use assetkv_store::BlobStore;

use crate::handler;

/// Shared per-namespace state. Holds nothing mutable; each request builds
/// its own working set.
#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn BlobStore>,
    lister: ListQueryProcessor,
}

impl AppState {
    pub fn new(store: Arc<dyn BlobStore>, codec: KeyCodec) -> Self {
        let lister = ListQueryProcessor::new(store.clone(), codec);
        Self { store, lister }
    }

    pub fn store(&self) -> &dyn BlobStore {
        self.store.as_ref()
    }

    pub fn lister(&self) -> &ListQueryProcessor {
        &self.lister
    }

    pub fn codec(&self) -> KeyCodec {
        self.lister.codec()
    }
}

/// Build the axum router. Every path belongs to the namespace, so the
/// handler is mounted as the fallback.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .fallback(handler::kv_handler)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
