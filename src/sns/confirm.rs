//! Subscription confirmation handshake.
//!
//! # Responsibilities
//! - Recognise `SubscriptionConfirmation` deliveries by header
//! - Fetch the `SubscribeURL` once and parse the XML it returns
//! - Answer 200 `Subscribed` with the subscription ARN attached, or 400 with the failure
//!
//! # Design Decisions
//! - Fetch, parse and extract run strictly in sequence; the first failure ends the request
//! - No retry and no timeout of its own; the reqwest client decides
//! - Once a confirmation is detected the rest of the chain is never run

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::config::ConfirmConfig;
use crate::observability::metrics;
use crate::sns::error::ConfirmError;
use crate::sns::logger::{ConfirmLogger, TracingLogger};
use crate::sns::message::{SnsMessage, SnsMessageType};
use crate::sns::xml;

/// Subscription ARN recorded on a successful confirmation response.
///
/// Stored in the response extensions; it is never written to the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionArn(pub String);

/// Default cap on a buffered confirmation body (SNS messages are at most 256 KiB).
pub const DEFAULT_MAX_BODY_BYTES: usize = 256 * 1024;

/// Confirms SNS subscriptions by visiting the URL SNS hands us.
#[derive(Clone)]
pub struct SnsConfirmHandler {
    client: reqwest::Client,
    logger: Arc<dyn ConfirmLogger>,
    max_body_bytes: usize,
}

impl SnsConfirmHandler {
    /// Create a handler around an existing HTTP client.
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            logger: Arc::new(TracingLogger),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }

    /// Build the HTTP client from configuration.
    pub fn from_config(config: &ConfirmConfig) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.fetch_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        if !config.use_system_proxy {
            builder = builder.no_proxy();
        }

        Ok(Self::new(builder.build()?).with_max_body_bytes(config.max_body_bytes))
    }

    pub fn with_logger(mut self, logger: Arc<dyn ConfirmLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn with_max_body_bytes(mut self, max_body_bytes: usize) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }

    /// Run the handshake and return the subscription ARN.
    pub async fn confirm(&self, request: Request) -> Result<String, ConfirmError> {
        let body = axum::body::to_bytes(request.into_body(), self.max_body_bytes)
            .await
            .map_err(|e| ConfirmError::InvalidMessage(format!("Cannot read request body: {}", e)))?;
        let message = SnsMessage::from_slice(&body)?;
        let subscribe_url = message.subscribe_url()?;

        self.logger.debug(&format!(
            "Received SubscriptionConfirmation request: {}",
            subscribe_url
        ));

        // 1. Fetch
        let response = self.client.get(subscribe_url).send().await?;
        let status = response.status();
        let body = response.text().await?;
        self.logger
            .debug(&format!("Confirmation endpoint answered {}", status));

        // 2. Parse
        let document = xml::parse_document(body).await?;

        // 3. Extract
        xml::subscription_arn(&document).ok_or(ConfirmError::Extraction)
    }

    /// Run the handshake and turn the outcome into the HTTP response.
    pub async fn respond(&self, request: Request) -> Response {
        match self.confirm(request).await {
            Ok(arn) => {
                self.logger.info(&format!("Subscription: {}", arn));
                metrics::record_confirmation("subscribed");

                let mut response = (StatusCode::OK, "Subscribed").into_response();
                response.extensions_mut().insert(SubscriptionArn(arn));
                response
            }
            Err(e) => {
                self.logger.info(&format!(
                    "Subscription confirmation failed ({}): {}",
                    e.kind(),
                    e
                ));
                metrics::record_confirmation(e.kind());
                e.into_response()
            }
        }
    }
}

/// Middleware: answer `SubscriptionConfirmation` deliveries, pass everything else on.
pub async fn sns_confirm_middleware(
    State(handler): State<Arc<SnsConfirmHandler>>,
    request: Request,
    next: Next,
) -> Response {
    match SnsMessageType::from_headers(request.headers()) {
        Some(SnsMessageType::SubscriptionConfirmation) => handler.respond(request).await,
        _ => next.run(request).await,
    }
}
