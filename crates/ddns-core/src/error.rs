//! Error types for the DDNS system
//!
//! This module defines all error types used throughout the crate.
//!
//! Nothing here is retried. A failed reconciliation is re-run by whatever
//! scheduler invoked it.

use crate::config::ValidationErrors;
use thiserror::Error;

/// Result type alias for DDNS operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the DDNS system
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration violated one or more constraints
    #[error("{0}")]
    InvalidConfig(ValidationErrors),

    /// Configuration input could not be parsed at all
    #[error("Malformed configuration: {0}")]
    ConfigFormat(#[from] serde_json::Error),

    /// IP lookup returned something that is not a dotted-quad address
    #[error("Malformed ip address, skipping => {0}")]
    MalformedAddress(String),

    /// Network or provider API failure
    #[error("Transport error ({provider}): {message}")]
    Transport {
        /// Which collaborator failed (e.g. "http", "route53")
        provider: &'static str,
        /// Error message
        message: String,
    },
}

impl Error {
    /// Create a malformed address error
    pub fn malformed_address(raw: impl Into<String>) -> Self {
        Self::MalformedAddress(raw.into())
    }

    /// Create a transport error
    pub fn transport(provider: &'static str, message: impl Into<String>) -> Self {
        Self::Transport {
            provider,
            message: message.into(),
        }
    }

    /// Whether the error was caused by the configuration rather than the network
    pub fn is_config(&self) -> bool {
        matches!(self, Self::InvalidConfig(_) | Self::ConfigFormat(_))
    }
}

impl From<ValidationErrors> for Error {
    fn from(errors: ValidationErrors) -> Self {
        Self::InvalidConfig(errors)
    }
}
