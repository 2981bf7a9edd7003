use axum::{
    body::Body,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

use crate::core::nicehash::RelayResponse;

/// Mirror an upstream answer onto the wire: same status, same content type,
/// same body bytes.
pub(crate) fn passthrough(relay: RelayResponse) -> Response {
    let status = StatusCode::from_u16(relay.status).unwrap_or(StatusCode::BAD_GATEWAY);
    let mut builder = Response::builder().status(status);
    if let Some(content_type) = relay.content_type {
        builder = builder.header(header::CONTENT_TYPE, content_type);
    }
    builder
        .body(Body::from(relay.body))
        .unwrap_or_else(|_| StatusCode::BAD_GATEWAY.into_response())
}

/// Wrap generated SVG markup in an `image/svg+xml` success response.
pub(crate) fn svg(markup: String) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "image/svg+xml")],
        markup,
    )
        .into_response()
}
