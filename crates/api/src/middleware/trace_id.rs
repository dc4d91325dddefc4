//! Per-request correlation IDs.
//!
//! Every request gets an ID that shows up in its tracing span and is
//! echoed back to the caller, so a client-reported failure can be
//! matched to the server-side log lines for that exact request.

use axum::{
    body::Body,
    http::{header::HeaderName, HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

/// Callers may supply their own correlation ID in this header.
pub const REQUEST_ID_HEADER: &str = "X-Request-ID";

/// Wraps the request in a span carrying the correlation ID.
///
/// A caller-provided `X-Request-ID` is reused; otherwise a fresh UUID
/// is minted. The ID is attached to the span, logged with the final
/// status and duration, and returned in the response headers.
pub async fn trace_id(req: Request<Body>, next: Next) -> Response {
    let request_id = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let span = tracing::info_span!(
        "request",
        request_id = %request_id,
        method = %req.method(),
        path = %req.uri().path(),
    );
    let _guard = span.enter();

    let start = std::time::Instant::now();
    let mut response = next.run(req).await;

    tracing::info!(
        request_id = %request_id,
        status = response.status().as_u16(),
        duration_ms = start.elapsed().as_millis(),
        "Request completed"
    );

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response
            .headers_mut()
            .insert(HeaderName::from_static("x-request-id"), value);
    }

    response
}
