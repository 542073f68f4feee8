//! Content-Type override for SNS deliveries.
//!
//! SNS posts JSON bodies labelled `text/plain; charset=UTF-8`, and AWS keeps it
//! that way for existing integrations. Any request carrying the SNS message-type
//! header gets its content type rewritten before body extractors run.

use axum::{
    extract::Request,
    http::{header::CONTENT_TYPE, HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};

use crate::observability::metrics;
use crate::sns::{JSON_CONTENT_TYPE, MESSAGE_TYPE_HEADER};

/// True when the request identifies itself as an SNS delivery.
pub fn needs_json_override(headers: &HeaderMap) -> bool {
    headers
        .get(MESSAGE_TYPE_HEADER)
        .is_some_and(|value| !value.is_empty())
}

/// Middleware: force `application/json;charset=UTF-8` on SNS deliveries, then continue.
pub async fn override_content_type(mut request: Request, next: Next) -> Response {
    if needs_json_override(request.headers()) {
        request
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
        metrics::record_content_type_override();
    }

    next.run(request).await
}
