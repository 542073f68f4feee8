//! HTTP server for the SNS receiver.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → request.rs (x-request-id from SNS message id or UUID)
//!     → TraceLayer, request timeout
//!     → sns::content_type (relabel SNS bodies as JSON)
//!     → sns::confirm (answer SubscriptionConfirmation)
//!     → server.rs notification_handler (everything else)
//! ```

pub mod request;
pub mod server;

pub use request::{MakeDeliveryId, SNS_MESSAGE_ID_HEADER, X_REQUEST_ID};
pub use server::{HttpServer, ServerError};
