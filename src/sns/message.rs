//! SNS message envelope and message-type header.

use axum::http::HeaderMap;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::sns::error::ConfirmError;
use crate::sns::MESSAGE_TYPE_HEADER;

/// Value of the `x-amz-sns-message-type` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnsMessageType {
    SubscriptionConfirmation,
    Notification,
    UnsubscribeConfirmation,
    Other(String),
}

impl SnsMessageType {
    /// Read the message type from request headers.
    ///
    /// Returns `None` when the header is missing, empty or not visible ASCII.
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let value = headers.get(MESSAGE_TYPE_HEADER)?.to_str().ok()?;
        if value.is_empty() {
            return None;
        }
        Some(Self::from(value))
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::SubscriptionConfirmation => "SubscriptionConfirmation",
            Self::Notification => "Notification",
            Self::UnsubscribeConfirmation => "UnsubscribeConfirmation",
            Self::Other(other) => other,
        }
    }

    /// Bounded label for metrics; every unrecognised value collapses to `other`.
    pub fn metric_label(&self) -> &'static str {
        match self {
            Self::SubscriptionConfirmation => "SubscriptionConfirmation",
            Self::Notification => "Notification",
            Self::UnsubscribeConfirmation => "UnsubscribeConfirmation",
            Self::Other(_) => "other",
        }
    }
}

impl From<&str> for SnsMessageType {
    fn from(value: &str) -> Self {
        match value {
            "SubscriptionConfirmation" => Self::SubscriptionConfirmation,
            "Notification" => Self::Notification,
            "UnsubscribeConfirmation" => Self::UnsubscribeConfirmation,
            other => Self::Other(other.to_string()),
        }
    }
}

impl std::fmt::Display for SnsMessageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// JSON body of an SNS HTTP delivery.
///
/// Field names follow SNS's PascalCase. Signature fields are carried but not verified.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SnsMessage {
    #[serde(rename = "Type", skip_serializing_if = "Option::is_none")]
    pub message_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,

    /// Confirmation token (SubscriptionConfirmation / UnsubscribeConfirmation).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic_arn: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(rename = "SubscribeURL", skip_serializing_if = "Option::is_none")]
    pub subscribe_url: Option<String>,

    #[serde(rename = "UnsubscribeURL", skip_serializing_if = "Option::is_none")]
    pub unsubscribe_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature_version: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,

    #[serde(rename = "SigningCertURL", skip_serializing_if = "Option::is_none")]
    pub signing_cert_url: Option<String>,
}

impl SnsMessage {
    /// Decode a delivery body.
    pub fn from_slice(body: &[u8]) -> Result<Self, ConfirmError> {
        serde_json::from_slice(body)
            .map_err(|e| ConfirmError::InvalidMessage(format!("Invalid SNS message: {}", e)))
    }

    /// The confirmation URL as an absolute URL.
    pub fn subscribe_url(&self) -> Result<Url, ConfirmError> {
        let raw = self
            .subscribe_url
            .as_deref()
            .filter(|url| !url.is_empty())
            .ok_or_else(|| ConfirmError::InvalidMessage("Missing SubscribeURL".to_string()))?;

        Url::parse(raw)
            .map_err(|e| ConfirmError::InvalidMessage(format!("Invalid SubscribeURL: {}", e)))
    }
}
