use std::sync::Arc;

use tokio::net::TcpListener;

use assetkv_core::KeyCodec;
use assetkv_store::{BlobStore, FsBlobStore};

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::router::{build_router, AppState};

/// Read-only key-value server over one asset directory.
pub struct AssetKvServer {
    config: ServerConfig,
    store: Arc<dyn BlobStore>,
}

impl AssetKvServer {
    /// Serve `config.root` from disk.
    pub fn new(config: ServerConfig) -> Self {
        let store = Arc::new(FsBlobStore::new(config.root.clone()));
        Self { config, store }
    }

    /// Serve an arbitrary backend instead of `config.root`.
    pub fn with_store(config: ServerConfig, store: Arc<dyn BlobStore>) -> Self {
        Self { config, store }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn state(&self) -> AppState {
        AppState::new(self.store.clone(), KeyCodec::new(self.config.key_encoding))
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        build_router(self.state())
    }

    /// Start serving requests until Ctrl-C.
    pub async fn serve(self) -> ServerResult<()> {
        let app = self.router();
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        tracing::info!(
            addr = %self.config.bind_addr,
            root = %self.config.root.display(),
            key_encoding = %self.config.key_encoding,
            "assetkv server listening"
        );
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

#[cfg(test)]
mod tests {
    use super::*;
    use assetkv_core::KeyEncoding;

    #[test]
    fn server_construction() {
        let server = AssetKvServer::new(ServerConfig::default());
        assert_eq!(server.config().bind_addr, "127.0.0.1:8787".parse().unwrap());
        assert_eq!(server.state().codec().encoding(), KeyEncoding::Escaped);
    }

    #[test]
    fn state_follows_configured_encoding() {
        let config = ServerConfig {
            key_encoding: KeyEncoding::NoCache,
            ..ServerConfig::default()
        };
        let server = AssetKvServer::new(config);
        assert_eq!(server.state().codec().encoding(), KeyEncoding::NoCache);
    }

    #[tokio::test]
    async fn router_builds() {
        let server = AssetKvServer::new(ServerConfig::default());
        let _router = server.router();
    }
}
