//! AWS SNS HTTP endpoint middleware for axum.
//!
//! Two independent layers:
//! - [`sns::override_content_type`] relabels SNS deliveries as JSON
//! - [`sns::sns_confirm_middleware`] completes `SubscriptionConfirmation` handshakes

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod sns;

pub use config::ReceiverConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use sns::{override_content_type, sns_confirm_middleware, SnsConfirmHandler, SubscriptionArn};
