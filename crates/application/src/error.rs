//! Application error types

use reqcheck_domain::{AssertionFailure, DomainError, SerializationError};
use thiserror::Error;

use crate::ports::TransportError;

/// Everything a harness call can surface to a test case.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// No response was obtained.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The response did not satisfy its contract.
    #[error("{0}")]
    Assertion(#[from] AssertionFailure),

    /// A request payload could not be encoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] SerializationError),

    /// The harness configuration is invalid.
    #[error("configuration error: {0}")]
    Config(String),
}

impl HarnessError {
    /// The aggregated failure, if this is an assertion error.
    #[must_use]
    pub const fn as_assertion(&self) -> Option<&AssertionFailure> {
        match self {
            Self::Assertion(failure) => Some(failure),
            _ => None,
        }
    }

    /// The transport failure, if this is a transport error.
    #[must_use]
    pub const fn as_transport(&self) -> Option<&TransportError> {
        match self {
            Self::Transport(error) => Some(error),
            _ => None,
        }
    }
}

impl From<DomainError> for HarnessError {
    fn from(error: DomainError) -> Self {
        match error {
            DomainError::InvalidUrl(message) => Self::Transport(TransportError::invalid_url(message)),
        }
    }
}

/// Result type alias for harness operations.
pub type HarnessResult<T> = Result<T, HarnessError>;
