//! Outgoing request type

use std::time::Duration;

use url::Url;
use uuid::Uuid;

use super::HttpMethod;
use crate::error::{DomainError, DomainResult};

/// Default per-call timeout applied when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// A fully resolved HTTP request, ready to hand to a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingRequest {
    /// Unique identifier used to correlate log lines for this call.
    pub id: Uuid,
    /// HTTP method
    pub method: HttpMethod,
    /// Absolute target URL.
    pub url: Url,
    /// HTTP headers, sent in order.
    pub headers: Vec<(String, String)>,
    /// Encoded request body, if any.
    pub body: Option<Vec<u8>>,
    /// Ceiling for the whole round trip.
    pub timeout: Duration,
}

impl OutgoingRequest {
    /// Creates a request with no headers and no body.
    #[must_use]
    pub fn new(method: HttpMethod, url: Url) -> Self {
        Self {
            id: Uuid::now_v7(),
            method,
            url,
            headers: Vec::new(),
            body: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Appends a header (builder pattern).
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Sets the encoded body (builder pattern).
    #[must_use]
    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }

    /// Sets the per-call timeout (builder pattern).
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Gets a header value by name (case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns the body as lossy UTF-8 text, empty when there is no body.
    #[must_use]
    pub fn body_text(&self) -> String {
        self.body
            .as_deref()
            .map(|b| String::from_utf8_lossy(b).into_owned())
            .unwrap_or_default()
    }
}

/// Resolves a relative request path against the base URL.
///
/// The base is treated as a directory even without a trailing slash, and a
/// leading slash on `path` is ignored so the base's own path prefix is kept.
/// Query parameters written inline in `path` are preserved.
///
/// # Errors
///
/// Returns `DomainError::InvalidUrl` if the base cannot carry a path or the
/// joined URL is malformed.
pub fn resolve_url(base: &Url, path: &str) -> DomainResult<Url> {
    if base.cannot_be_a_base() {
        return Err(DomainError::InvalidUrl(format!(
            "{base} cannot be used as a base URL"
        )));
    }

    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let dir = format!("{}/", base.path());
        base.set_path(&dir);
    }

    base.join(path.trim_start_matches('/'))
        .map_err(|e| DomainError::InvalidUrl(format!("{e}: {path}")))
}
