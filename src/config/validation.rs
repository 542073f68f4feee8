//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses, paths and value ranges
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ReceiverConfig → Result<(), Vec<ValidationError>>

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::ReceiverConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid listener.bind_address '{0}'")]
    BindAddress(String),

    #[error("invalid observability.metrics_address '{0}'")]
    MetricsAddress(String),

    #[error("endpoint.path '{0}' must start with '/'")]
    EndpointPath(String),

    #[error("confirm.max_body_bytes must be greater than 0")]
    ZeroBodyLimit,

    #[error("confirm.fetch_timeout_secs must be greater than 0")]
    ZeroFetchTimeout,

    #[error("confirm.fetch_timeout_secs ({fetch_secs}) must be less than timeouts.request_secs ({request_secs})")]
    FetchTimeoutNotBelowRequest { fetch_secs: u64, request_secs: u64 },

    #[error("timeouts.request_secs must be greater than 0")]
    ZeroRequestTimeout,
}

pub fn validate_config(config: &ReceiverConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if !config.endpoint.path.starts_with('/') {
        errors.push(ValidationError::EndpointPath(config.endpoint.path.clone()));
    }

    if config.confirm.max_body_bytes == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }

    if config.confirm.fetch_timeout_secs == Some(0) {
        errors.push(ValidationError::ZeroFetchTimeout);
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    } else if let Some(fetch_secs) = config.confirm.fetch_timeout_secs {
        if fetch_secs >= config.timeouts.request_secs {
            errors.push(ValidationError::FetchTimeoutNotBelowRequest {
                fetch_secs,
                request_secs: config.timeouts.request_secs,
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
