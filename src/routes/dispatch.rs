use std::borrow::Cow;
use std::collections::BTreeMap;

use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderName, HeaderValue, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::models::{now_timestamp, Endpoint, LogEntry};
use crate::state::SharedState;
use crate::views;

/// Serve any request that isn't a management or static-asset call.
///
/// `/` renders the landing page. Otherwise the first endpoint whose path
/// matches exactly answers, and the request is appended to its log whether
/// or not the method matched.
pub async fn dispatch(
    State(state): State<SharedState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = decode_path(uri.path());
    let path = path.as_ref();

    if path == "/" {
        return views::landing().into_response();
    }

    let Some(endpoint) = state.store.find_by_path(path).await else {
        tracing::debug!("No endpoint for {method} {path}");
        return (StatusCode::NOT_FOUND, "404 page not found").into_response();
    };

    let entry = LogEntry {
        timestamp: now_timestamp(),
        method: method.to_string(),
        url: uri
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| uri.path().to_string()),
        headers: snapshot_headers(&headers),
        request_body: String::from_utf8_lossy(&body).into_owned(),
        status_code: StatusCode::OK.as_u16(),
        error: None,
    };

    if method.as_str() != endpoint.method {
        let message = format!(
            "Method not allowed. Expected {}, got {}",
            endpoint.method, method
        );
        tracing::warn!("{path}: {message}");

        let entry = LogEntry {
            status_code: StatusCode::METHOD_NOT_ALLOWED.as_u16(),
            error: Some(message.clone()),
            ..entry
        };
        state.store.append_log(&endpoint.id, entry).await;

        return (
            StatusCode::METHOD_NOT_ALLOWED,
            Json(json!({ "error": message })),
        )
            .into_response();
    }

    tracing::debug!("Matched endpoint {} for {method} {path}", endpoint.id);
    state.store.append_log(&endpoint.id, entry).await;

    mock_response(endpoint)
}

/// 200 with the endpoint's headers and body; JSON unless it says otherwise.
fn mock_response(endpoint: Endpoint) -> Response {
    let mut response = Response::new(Body::from(endpoint.response_body));
    let response_headers = response.headers_mut();

    for (name, value) in &endpoint.headers {
        match (
            HeaderName::try_from(name.as_str()),
            HeaderValue::try_from(value.as_str()),
        ) {
            (Ok(name), Ok(value)) => {
                response_headers.insert(name, value);
            }
            _ => tracing::warn!(
                "Skipping invalid header {name:?} on endpoint {}",
                endpoint.id
            ),
        }
    }

    if !response_headers.contains_key(header::CONTENT_TYPE) {
        response_headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
    }

    response
}

/// Percent-decoded request path, as endpoints store it.
fn decode_path(raw: &str) -> Cow<'_, str> {
    match urlencoding::decode_binary(raw.as_bytes()) {
        Cow::Borrowed(_) => Cow::Borrowed(raw),
        Cow::Owned(bytes) => Cow::Owned(String::from_utf8_lossy(&bytes).into_owned()),
    }
}

/// First value of each request header, keyed by canonical name.
fn snapshot_headers(headers: &HeaderMap) -> BTreeMap<String, String> {
    headers
        .keys()
        .filter_map(|name| {
            headers.get(name).map(|value| {
                (
                    canonical_header_name(name.as_str()),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
        })
        .collect()
}

/// `content-type` -> `Content-Type`
fn canonical_header_name(name: &str) -> String {
    name.split('-')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("-")
}
