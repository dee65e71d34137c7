//! Captured response type
//!
//! Contains types for representing HTTP responses including
//! status codes, headers, body, and timing information.

use std::collections::HashMap;
use std::sync::OnceLock;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

/// HTTP status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusCode(pub u16);

impl StatusCode {
    /// Creates a new `StatusCode`.
    #[must_use]
    pub const fn new(code: u16) -> Self {
        Self(code)
    }

    /// Returns the numeric status code.
    #[must_use]
    pub const fn as_u16(&self) -> u16 {
        self.0
    }
}

impl std::fmt::Display for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u16> for StatusCode {
    fn from(code: u16) -> Self {
        Self(code)
    }
}

/// The response body could not be parsed as JSON.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("body is not valid JSON: {0}")]
pub struct InvalidJsonBody(pub String);

/// An HTTP response as captured by the executor.
///
/// Immutable once built. The JSON tree is parsed from the raw body on the
/// first call to [`CapturedResponse::json`] and cached for every later call.
#[derive(Debug, Clone)]
pub struct CapturedResponse {
    request_id: Uuid,
    status: StatusCode,
    headers: HashMap<String, String>,
    body: Vec<u8>,
    elapsed: Duration,
    received_at: DateTime<Utc>,
    json: OnceLock<Result<Value, InvalidJsonBody>>,
}

impl CapturedResponse {
    /// Creates a new `CapturedResponse` from raw response data.
    #[must_use]
    pub fn new(
        status: u16,
        headers: HashMap<String, String>,
        body: Vec<u8>,
        elapsed: Duration,
    ) -> Self {
        Self {
            request_id: Uuid::nil(),
            status: StatusCode::new(status),
            headers,
            body,
            elapsed,
            received_at: Utc::now(),
            json: OnceLock::new(),
        }
    }

    /// Tags the response with the id of the request that produced it.
    #[must_use]
    pub fn with_request_id(mut self, request_id: Uuid) -> Self {
        self.request_id = request_id;
        self
    }

    /// Id of the originating request (nil when built by hand).
    #[must_use]
    pub const fn request_id(&self) -> Uuid {
        self.request_id
    }

    /// Returns the status code.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns all response headers.
    #[must_use]
    pub const fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Gets a header value by name (case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Raw body bytes.
    #[must_use]
    pub fn body_bytes(&self) -> &[u8] {
        &self.body
    }

    /// Returns the body as a lossy UTF-8 string.
    #[must_use]
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Parsed JSON body, computed on first access and cached.
    ///
    /// # Errors
    ///
    /// Returns the parse error when the body is not a JSON document.
    pub fn json(&self) -> Result<&Value, &InvalidJsonBody> {
        self.json
            .get_or_init(|| {
                serde_json::from_slice(&self.body).map_err(|e| InvalidJsonBody(e.to_string()))
            })
            .as_ref()
    }

    /// Wall-clock time of the whole round trip.
    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// When the response was captured.
    #[must_use]
    pub const fn received_at(&self) -> DateTime<Utc> {
        self.received_at
    }

    /// Response size in bytes.
    #[must_use]
    pub fn size(&self) -> usize {
        self.body.len()
    }

    /// Returns a human-readable size string (e.g., "1.2 KB").
    #[must_use]
    pub fn size_display(&self) -> String {
        format_bytes(self.body.len())
    }

    /// Returns a human-readable duration string (e.g., "124 ms").
    #[must_use]
    pub fn elapsed_display(&self) -> String {
        let millis = self.elapsed.as_millis();
        if millis < 1000 {
            format!("{millis} ms")
        } else {
            format!("{:.2} s", self.elapsed.as_secs_f64())
        }
    }
}

/// Formats bytes into a human-readable string.
fn format_bytes(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = KB * 1024;

    #[allow(clippy::cast_precision_loss)]
    if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} B")
    }
}
