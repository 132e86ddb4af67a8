use axum::extract::{Query, State};
use axum::http::{header, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Json, Response};
use percent_encoding::percent_decode_str;

use assetkv_core::ListOptions;
use assetkv_store::BlobResponse;

use crate::error::{ServerError, ServerResult};
use crate::router::AppState;

/// Query parameters understood by the namespace. The first occurrence of a
/// repeated parameter wins.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KvParams {
    pub url_encoded: bool,
    pub prefix: Option<String>,
    pub cursor: Option<String>,
    pub limit: Option<String>,
}

impl KvParams {
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut params = Self::default();
        let mut url_encoded = None;
        for (name, value) in pairs {
            let slot = match name.as_str() {
                "urlEncoded" | "urlencoded" => &mut url_encoded,
                "prefix" => &mut params.prefix,
                "cursor" => &mut params.cursor,
                "limit" | "key_count_limit" => &mut params.limit,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        params.url_encoded = url_encoded.is_some_and(|v: String| v.eq_ignore_ascii_case("true"));
        params
    }
}

/// Single entry point for every request: `GET /` lists, `GET /<key>` reads.
pub async fn kv_handler(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    Query(pairs): Query<Vec<(String, String)>>,
) -> ServerResult<Response> {
    if method != Method::GET {
        return Err(ServerError::method_not_allowed(method.as_str()));
    }
    let params = KvParams::from_pairs(pairs);

    let raw = uri.path().strip_prefix('/').unwrap_or(uri.path());
    let key = if params.url_encoded {
        percent_decode_str(raw)
            .decode_utf8()
            .map_err(|_| ServerError::BadRequest(format!("invalid percent-encoded key: {raw}")))?
            .into_owned()
    } else {
        raw.to_string()
    };
    let key = state.codec().decode(&key);

    if key.is_empty() {
        list_keys(&state, params).await
    } else {
        get_key(&state, &key).await
    }
}

async fn list_keys(state: &AppState, params: KvParams) -> ServerResult<Response> {
    let options = ListOptions::parse(params.limit.as_deref(), params.prefix, params.cursor)?;
    let page = state.lister().list(&options).await?;
    Ok(Json(page).into_response())
}

async fn get_key(state: &AppState, key: &str) -> ServerResult<Response> {
    let response = match state.store().fetch(key).await? {
        BlobResponse::Blob(blob) => {
            ([(header::CONTENT_TYPE, blob.content_type)], blob.data).into_response()
        }
        BlobResponse::Directory(entries) => Json(entries).into_response(),
        BlobResponse::NotFound => (StatusCode::NOT_FOUND, "Not Found").into_response(),
    };
    Ok(response)
}
