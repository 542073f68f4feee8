//! Confirmation failures and their HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::sns::xml::XmlError;

/// Errors that end a subscription confirmation.
///
/// Every variant is answered with `400 {"error": "<message>"}`.
#[derive(Debug, Error)]
pub enum ConfirmError {
    /// The confirmation body was unreadable or had no usable `SubscribeURL`.
    #[error("{0}")]
    InvalidMessage(String),

    /// Fetching the `SubscribeURL` failed at the network level.
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    /// The confirmation response was not well-formed XML.
    #[error("{0}")]
    Parse(#[from] XmlError),

    /// The response parsed but carried no subscription ARN.
    #[error("Cannot find SubscriptionArn")]
    Extraction,
}

impl ConfirmError {
    /// Stable label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ConfirmError::InvalidMessage(_) => "invalid_message",
            ConfirmError::Transport(_) => "transport_error",
            ConfirmError::Parse(_) => "parse_error",
            ConfirmError::Extraction => "extraction_error",
        }
    }
}

impl IntoResponse for ConfirmError {
    fn into_response(self) -> Response {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": self.to_string() })),
        )
            .into_response()
    }
}
