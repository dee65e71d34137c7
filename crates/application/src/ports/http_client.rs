//! HTTP Client port

use std::fmt;
use std::future::Future;
use std::time::Duration;

use reqcheck_domain::{CapturedResponse, OutgoingRequest};
use thiserror::Error;

/// Port for sending HTTP requests.
///
/// Implementations must return a response for every status code; only
/// failures to obtain a response at all are errors.
pub trait HttpClient: Send + Sync {
    /// Sends the request and captures the full response.
    ///
    /// # Errors
    ///
    /// Returns a `TransportError` if the request fails due to network issues,
    /// timeout, or an unreadable body.
    fn send(
        &self,
        request: &OutgoingRequest,
    ) -> impl Future<Output = Result<CapturedResponse, TransportError>> + Send;
}

/// Category of a transport failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportErrorKind {
    /// The per-call ceiling elapsed.
    Timeout,
    /// The server refused the connection.
    ConnectionRefused,
    /// The host name could not be resolved.
    Dns,
    /// Any other connection failure.
    Connect,
    /// The request URL is malformed.
    InvalidUrl,
    /// The response body could not be read.
    Body,
    /// Anything else.
    Other,
}

impl TransportErrorKind {
    /// Short title for display.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Timeout => "Request timed out",
            Self::ConnectionRefused => "Connection refused",
            Self::Dns => "DNS lookup failed",
            Self::Connect => "Connection failed",
            Self::InvalidUrl => "Invalid URL",
            Self::Body => "Unreadable response body",
            Self::Other => "Request failed",
        }
    }
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// No response could be obtained.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct TransportError {
    /// Failure category.
    pub kind: TransportErrorKind,
    /// Underlying cause, as reported by the client.
    pub message: String,
}

impl TransportError {
    /// Creates a transport error.
    #[must_use]
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// The per-call ceiling elapsed.
    #[must_use]
    pub fn timeout(after: Duration) -> Self {
        Self::new(
            TransportErrorKind::Timeout,
            format!("no response within {}ms", after.as_millis()),
        )
    }

    /// The request URL is malformed.
    #[must_use]
    pub fn invalid_url(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::InvalidUrl, message)
    }

    /// Returns true for timeouts.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        self.kind == TransportErrorKind::Timeout
    }
}
