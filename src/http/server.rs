//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the SNS endpoint
//! - Wire up middleware (request ID, tracing, timeout, SNS content type, confirmation)
//! - Bind server to listener and stop on shutdown signal

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{HeaderMap, Request, StatusCode},
    middleware,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ReceiverConfig;
use crate::http::request::{MakeDeliveryId, X_REQUEST_ID};
use crate::lifecycle::ShutdownSignal;
use crate::observability::metrics;
use crate::sns::{
    override_content_type, sns_confirm_middleware, SnsConfirmHandler, SnsMessage, SnsMessageType,
};

/// Errors that stop the server from starting or serving.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// HTTP server receiving SNS deliveries.
pub struct HttpServer {
    router: Router,
    config: ReceiverConfig,
}

impl HttpServer {
    /// Create a server whose confirmation client is built from `config.confirm`.
    pub fn new(config: ReceiverConfig) -> Result<Self, ServerError> {
        let handler = SnsConfirmHandler::from_config(&config.confirm)?;
        Ok(Self::with_handler(config, handler))
    }

    /// Create a server around a prepared confirmation handler.
    pub fn with_handler(config: ReceiverConfig, handler: SnsConfirmHandler) -> Self {
        let router = Self::build_router(&config, Arc::new(handler));
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// Later layers wrap earlier ones, so requests pass through them bottom-up.
    #[allow(deprecated)]
    fn build_router(config: &ReceiverConfig, handler: Arc<SnsConfirmHandler>) -> Router {
        Router::new()
            .route(&config.endpoint.path, post(notification_handler))
            .layer(middleware::from_fn_with_state(handler, sns_confirm_middleware))
            .layer(middleware::from_fn(override_content_type))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(
                TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                    let request_id = request
                        .headers()
                        .get(X_REQUEST_ID)
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("unknown");
                    tracing::info_span!(
                        "request",
                        method = %request.method(),
                        path = %request.uri().path(),
                        request_id = %request_id,
                    )
                }),
            )
            .layer(SetRequestIdLayer::x_request_id(MakeDeliveryId))
    }

    /// Router for in-process use (tests, embedding).
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn config(&self) -> &ReceiverConfig {
        &self.config
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener, shutdown: ShutdownSignal) -> Result<(), ServerError> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            path = %self.config.endpoint.path,
            "SNS receiver listening"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown.recv())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Handles every delivery the confirmation middleware passes on.
async fn notification_handler(
    headers: HeaderMap,
    Json(message): Json<SnsMessage>,
) -> impl IntoResponse {
    let message_type = SnsMessageType::from_headers(&headers)
        .map(|t| t.to_string())
        .or_else(|| message.message_type.clone())
        .unwrap_or_else(|| "Unknown".to_string());

    tracing::info!(
        message_type = %message_type,
        message_id = message.message_id.as_deref().unwrap_or("-"),
        topic_arn = message.topic_arn.as_deref().unwrap_or("-"),
        subject = message.subject.as_deref().unwrap_or("-"),
        "SNS message received"
    );
    metrics::record_message(message_type_label(&headers, &message));

    (StatusCode::OK, "OK")
}

/// Metric label for a delivery: header first, then the body's `Type`, else `unknown`.
fn message_type_label(headers: &HeaderMap, message: &SnsMessage) -> &'static str {
    SnsMessageType::from_headers(headers)
        .or_else(|| message.message_type.as_deref().map(SnsMessageType::from))
        .map_or("unknown", |t| t.metric_label())
}
