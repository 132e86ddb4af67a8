//! HTTP server for assetkv.
//!
//! Serves one directory of assets as a read-only key-value namespace:
//! `GET /<key>` returns the blob stored at that path and `GET /` lists keys
//! in byte order with prefix filtering and cursor pagination.

pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use router::{build_router, AppState};
pub use server::AssetKvServer;

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use assetkv_core::{KeyCodec, ListPage, NO_CACHE_PREFIX};
    use assetkv_store::{
        BlobResponse, BlobStore, FsBlobStore, InMemoryBlobStore, StoreError, StoreResult,
    };
    use async_trait::async_trait;
    use bytes::Bytes;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::response::Response;
    use tower::util::ServiceExt;

    use super::*;

    fn app_with(store: Arc<dyn BlobStore>, codec: KeyCodec) -> axum::Router {
        build_router(AppState::new(store, codec))
    }

    fn app(paths: &[&str]) -> axum::Router {
        app_with(
            Arc::new(InMemoryBlobStore::with_paths(paths.iter().copied())),
            KeyCodec::default(),
        )
    }

    async fn send(app: axum::Router, method: &str, uri: &str) -> Response {
        app.oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
    }

    async fn body(response: Response) -> Vec<u8> {
        axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec()
    }

    async fn page(response: Response) -> ListPage {
        assert_eq!(response.status(), StatusCode::OK);
        serde_json::from_slice(&body(response).await).unwrap()
    }

    fn names(page: &ListPage) -> Vec<&str> {
        page.names().collect()
    }

    #[tokio::test]
    async fn rejects_non_get_methods() {
        for method in ["PUT", "POST", "DELETE", "HEAD", "PATCH"] {
            let response = send(app(&["a"]), method, "/a").await;
            assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED, "{method}");
            if method != "HEAD" {
                let text = String::from_utf8(body(response).await).unwrap();
                assert_eq!(
                    text,
                    format!("Cannot {}() with assets namespace", method.to_lowercase())
                );
            }
        }
    }

    #[tokio::test]
    async fn lists_in_byte_order_across_pages() {
        let store = ["a", "b", "ab", "A"];
        let first = page(send(app(&store), "GET", "/?limit=2").await).await;
        assert_eq!(names(&first), vec!["A", "a"]);
        assert!(!first.list_complete);

        let cursor = first.cursor.unwrap();
        let uri = format!("/?limit=2&cursor={}", cursor.replace('=', "%3D"));
        let second = page(send(app(&store), "GET", &uri).await).await;
        assert_eq!(names(&second), vec!["ab", "b"]);
        assert!(second.list_complete);
        assert!(second.cursor.is_none());
    }

    #[tokio::test]
    async fn list_with_prefix() {
        let response = send(app(&["a", "b", "ab", "A"]), "GET", "/?prefix=a&limit=10").await;
        let listed = page(response).await;
        assert_eq!(names(&listed), vec!["a", "ab"]);
        assert!(listed.list_complete);
    }

    #[tokio::test]
    async fn complete_list_omits_cursor_field() {
        let response = send(app(&["a"]), "GET", "/").await;
        let json: serde_json::Value = serde_json::from_slice(&body(response).await).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "keys": [{ "name": "a" }], "list_complete": true })
        );
    }

    #[tokio::test]
    async fn stale_cursor_is_not_an_error() {
        // base64("gone")
        let response = send(app(&["a", "b"]), "GET", "/?cursor=Z29uZQ%3D%3D").await;
        let listed = page(response).await;
        assert!(listed.keys.is_empty());
        assert!(listed.list_complete);
    }

    #[tokio::test]
    async fn invalid_limits_are_bad_requests() {
        for limit in ["0", "-3", "1001", "many"] {
            let response = send(app(&["a"]), "GET", &format!("/?limit={limit}")).await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{limit}");
        }
        let response = send(app(&["a"]), "GET", "/?key_count_limit=0").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn long_prefix_is_rejected() {
        let uri = format!("/?prefix={}", "p".repeat(513));
        let response = send(app(&["a"]), "GET", &uri).await;
        assert_eq!(response.status(), StatusCode::URI_TOO_LONG);
    }

    #[tokio::test]
    async fn gets_blob_bytes() {
        let store = InMemoryBlobStore::new();
        store.insert("css/site.css", &b"body{}"[..]).unwrap();
        let app = app_with(Arc::new(store), KeyCodec::default());

        let response = send(app, "GET", "/css/site.css").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/octet-stream"
        );
        assert_eq!(body(response).await, b"body{}");
    }

    #[tokio::test]
    async fn missing_key_is_not_found() {
        let response = send(app(&["a"]), "GET", "/missing").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn url_encoded_keys_are_decoded() {
        let paths = ["dir/a b.txt"];
        let response = send(app(&paths), "GET", "/dir%2Fa%20b.txt?urlEncoded=true").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body(response).await, b"dir/a b.txt");

        // Without the flag the percent escapes are part of the key.
        let response = send(app(&paths), "GET", "/dir%2Fa%20b.txt").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn invalid_url_encoding_is_a_bad_request() {
        let response = send(app(&["a"]), "GET", "/%FF?urlEncoded=true").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn no_cache_marker_is_stripped() {
        let uri = format!(
            "/{}?urlEncoded=true",
            format!("{NO_CACHE_PREFIX}css/a b.css")
                .replace('$', "%24")
                .replace('/', "%2F")
                .replace(' ', "%2520")
        );
        let response = send(app(&["css/a b.css"]), "GET", &uri).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body(response).await, b"css/a b.css");
    }

    #[tokio::test]
    async fn marker_alone_lists() {
        let uri = format!("/{}?urlEncoded=true", "%24__ASSETKV_NO_CACHE__%24%2F");
        let listed = page(send(app(&["x"]), "GET", &uri).await).await;
        assert_eq!(names(&listed), vec!["x"]);
    }

    #[tokio::test]
    async fn no_cache_namespace_lists_marked_keys() {
        let app = app_with(
            Arc::new(InMemoryBlobStore::with_paths(["a"])),
            KeyCodec::no_cache(),
        );
        let listed = page(send(app, "GET", "/").await).await;
        assert_eq!(names(&listed), vec![format!("{NO_CACHE_PREFIX}a").as_str()]);
    }

    #[tokio::test]
    async fn serves_directory_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("img")).unwrap();
        std::fs::write(dir.path().join("img/logo.svg"), b"<svg/>").unwrap();
        std::fs::write(dir.path().join("Index.html"), b"<html/>").unwrap();
        std::fs::write(dir.path().join("about.html"), b"<p/>").unwrap();

        let config = ServerConfig {
            root: dir.path().to_path_buf(),
            ..ServerConfig::default()
        };
        let server = AssetKvServer::new(config);

        let listed = page(send(server.router(), "GET", "/").await).await;
        assert_eq!(names(&listed), vec!["Index.html", "about.html", "img/logo.svg"]);

        let response = send(server.router(), "GET", "/img/logo.svg").await;
        assert_eq!(body(response).await, b"<svg/>");

        let response = send(server.router(), "GET", "/img").await;
        assert_eq!(response.status(), StatusCode::OK);
        let entries: serde_json::Value = serde_json::from_slice(&body(response).await).unwrap();
        assert_eq!(entries, serde_json::json!([{ "name": "logo.svg", "type": "file" }]));
    }

    #[tokio::test]
    async fn traversal_is_a_bad_request() {
        let dir = tempfile::tempdir().unwrap();
        let app = app_with(
            Arc::new(FsBlobStore::new(dir.path().join("root"))),
            KeyCodec::default(),
        );
        let response = send(app, "GET", "/..%2Fsecret?urlEncoded=true").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    struct BrokenStore;

    #[async_trait]
    impl BlobStore for BrokenStore {
        async fn fetch(&self, _path: &str) -> StoreResult<BlobResponse> {
            Err(StoreError::Io(std::io::Error::other("disk gone")))
        }

        async fn put(&self, _path: &str, _data: Bytes) -> StoreResult<()> {
            Err(StoreError::ReadOnly)
        }
    }

    #[tokio::test]
    async fn backend_failures_are_server_errors() {
        let server = AssetKvServer::with_store(ServerConfig::default(), Arc::new(BrokenStore));

        let response = send(server.router(), "GET", "/").await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = send(server.router(), "GET", "/x").await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
