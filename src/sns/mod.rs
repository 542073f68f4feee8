//! SNS HTTP endpoint middleware.
//!
//! # Data Flow
//! ```text
//! POST from SNS (content-type: text/plain)
//!     → content_type.rs (rewrite content-type to JSON when x-amz-sns-message-type is set)
//!     → confirm.rs (SubscriptionConfirmation only)
//!         → GET SubscribeURL
//!         → xml.rs (parse response, find SubscriptionArn)
//!         → 200 "Subscribed" | 400 {"error": ...}
//!     → next handler (every other message type)
//! ```
//!
//! # Design Decisions
//! - Both middlewares are independent; neither reads state the other writes
//! - Confirmation is a single fetch, never retried
//! - Every confirmation failure is answered locally with a 400

pub mod confirm;
pub mod content_type;
pub mod error;
pub mod logger;
pub mod message;
pub mod xml;

pub use confirm::{sns_confirm_middleware, SnsConfirmHandler, SubscriptionArn};
pub use content_type::override_content_type;
pub use error::ConfirmError;
pub use logger::{ConfirmLogger, TracingLogger};
pub use message::{SnsMessage, SnsMessageType};

/// Header SNS sets on every HTTP delivery.
pub const MESSAGE_TYPE_HEADER: &str = "x-amz-sns-message-type";

/// Content type forced onto SNS deliveries.
pub const JSON_CONTENT_TYPE: &str = "application/json;charset=UTF-8";

/// Namespace of the SNS query API responses.
pub const SNS_NAMESPACE: &str = "http://sns.amazonaws.com/doc/2010-03-31/";
