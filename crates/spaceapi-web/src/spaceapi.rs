//! SpaceAPI Endpoint
//!
//! Intercepts every request before routing. Paths under `/spaceapi` are
//! answered here with the JSON document or a redirect to the site root; all
//! other requests continue to the regular routes.

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use percent_encoding::percent_decode_str;
use spaceapi_core::Dispatch;
use std::sync::Arc;

use crate::state::AppState;

/// First path segment claimed by the endpoint
pub const ENDPOINT: &str = "spaceapi";

/// Extract the fragment that follows `/spaceapi` from a request path.
///
/// Returns `None` for paths outside the endpoint. `/spaceapi` and
/// `/spaceapi/` give an empty fragment. One trailing `/` is dropped so that
/// `/spaceapi/v1/` addresses the same document as `/spaceapi/v1`.
pub fn endpoint_fragment(path: &str) -> Option<String> {
    let rest = path.strip_prefix('/')?.strip_prefix(ENDPOINT)?;
    if rest.is_empty() {
        return Some(String::new());
    }

    let rest = rest.strip_prefix('/')?;
    let rest = rest.strip_suffix('/').unwrap_or(rest);
    Some(percent_decode_str(rest).decode_utf8_lossy().into_owned())
}

/// `302 Found` pointing at `location`
pub fn redirect_to(location: &str) -> Response {
    let location =
        HeaderValue::from_str(location).unwrap_or_else(|_| HeaderValue::from_static("/"));
    (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
}

pub async fn spaceapi_middleware(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let fragment = endpoint_fragment(request.uri().path());

    match state.dispatcher.dispatch(fragment.as_deref()).await {
        Dispatch::PassThrough => next.run(request).await,
        Dispatch::Redirect => redirect_to(&state.config.home_url),
        Dispatch::Json(record) => Json(record).into_response(),
    }
}
