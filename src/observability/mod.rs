//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! sns middleware, http server:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters)
//!
//! Consumers:
//!     → stdout (pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - RUST_LOG wins over the configured filter
//! - Metrics calls are no-ops until an exporter is installed

pub mod logging;
pub mod metrics;
