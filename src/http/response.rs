//! Gate-generated responses.
//!
//! # Design Decisions
//! - Redirects use 307 so the method and body survive the hop
//! - Redirects are never cached: they depend on per-caller session state

use axum::{
    body::Body,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

/// Build the redirect response for a denied request.
pub fn redirect(location: &str) -> Response {
    match HeaderValue::from_str(location) {
        Ok(value) => {
            let mut response = Response::new(Body::empty());
            *response.status_mut() = StatusCode::TEMPORARY_REDIRECT;
            let headers = response.headers_mut();
            headers.insert(header::LOCATION, value);
            headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
            response
        }
        Err(_) => {
            // Unreachable with a validated config: redirect paths are
            // printable ASCII and the return target is URL-encoded.
            tracing::error!(location = %location, "Redirect location is not a valid header value");
            (StatusCode::INTERNAL_SERVER_ERROR, "Access gate misconfigured").into_response()
        }
    }
}
