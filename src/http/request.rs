//! Request identification.
//!
//! # Design Decisions
//! - SNS stamps every delivery with `x-amz-sns-message-id`; reuse it as the request ID
//!   so logs line up with the SNS delivery logs
//! - Anything else gets a UUID v4

use axum::http::{HeaderValue, Request};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

pub const X_REQUEST_ID: &str = "x-request-id";

/// Message ID header SNS sends with each delivery.
pub const SNS_MESSAGE_ID_HEADER: &str = "x-amz-sns-message-id";

/// Request ID source for `SetRequestIdLayer`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeDeliveryId;

impl MakeRequestId for MakeDeliveryId {
    fn make_request_id<B>(&mut self, request: &Request<B>) -> Option<RequestId> {
        let id = request
            .headers()
            .get(SNS_MESSAGE_ID_HEADER)
            .filter(|value| !value.is_empty())
            .cloned()
            .or_else(|| HeaderValue::from_str(&Uuid::new_v4().to_string()).ok())?;

        Some(RequestId::new(id))
    }
}
