//! Response emission.
//!
//! # Responsibilities
//! - Mirror the upstream response back to the original caller: same
//!   status code, same Content-Type, body bytes unchanged
//! - Map transport failure to an explicit gateway error instead of a
//!   fabricated empty 200
//!
//! # Design Decisions
//! - Exactly one response per request; nothing is written after it
//! - Defaults when upstream metadata is absent: status 200, content
//!   type application/json

use axum::body::Body;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::transport::UpstreamResponse;

/// Build the caller-facing response from a buffered upstream response.
pub fn emit(upstream: UpstreamResponse) -> Response {
    let mut response = Response::new(Body::from(upstream.body));
    *response.status_mut() = upstream.status;

    let content_type = HeaderValue::from_str(&upstream.content_type)
        .unwrap_or_else(|_| HeaderValue::from_static("application/json"));
    response.headers_mut().insert(header::CONTENT_TYPE, content_type);

    response
}

/// Response for a request that never reached upstream.
pub fn bad_gateway() -> Response {
    (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response()
}
