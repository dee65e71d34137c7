//! Harness configuration.

use std::collections::BTreeMap;
use std::time::Duration;

use http::{HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{HarnessError, HarnessResult};

/// Base URL used when none is configured.
pub const DEFAULT_BASE_URL: &str = "https://reqres.in/";

/// Process-wide harness settings. Read-only once the suite starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Every request path is resolved against this URL.
    pub base_url: String,
    /// Headers added to every request, after the JSON content headers.
    /// An entry with the same name replaces the built-in one.
    pub default_headers: BTreeMap<String, String>,
    /// Per-call ceiling in milliseconds.
    pub timeout_ms: u64,
    /// Log every request and response in full.
    pub log_exchanges: bool,
    /// Filter directive used when `RUST_LOG` is not set.
    pub log_level: String,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            default_headers: BTreeMap::new(),
            timeout_ms: 30_000,
            log_exchanges: true,
            log_level: "info".to_string(),
        }
    }
}

impl HarnessConfig {
    /// Default settings pointed at `base_url`.
    #[must_use]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Adds a default header (builder pattern).
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.insert(name.into(), value.into());
        self
    }

    /// Sets the per-call timeout (builder pattern).
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Parses the configured base URL.
    ///
    /// # Errors
    ///
    /// Returns `HarnessError::Config` if it is not an absolute http(s) URL.
    pub fn parsed_base_url(&self) -> HarnessResult<Url> {
        let url = Url::parse(&self.base_url)
            .map_err(|e| HarnessError::Config(format!("invalid base_url '{}': {e}", self.base_url)))?;

        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(HarnessError::Config(format!(
                "base_url must use http or https, got '{other}'"
            ))),
        }
    }

    /// Per-call timeout.
    #[must_use]
    pub const fn timeout_duration(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Checks every setting.
    ///
    /// # Errors
    ///
    /// Returns `HarnessError::Config` describing the first invalid setting.
    pub fn validate(&self) -> HarnessResult<()> {
        self.parsed_base_url()?;
        if self.timeout_ms == 0 {
            return Err(HarnessError::Config("timeout_ms must be positive".to_string()));
        }
        for (name, value) in &self.default_headers {
            if HeaderName::from_bytes(name.as_bytes()).is_err() {
                return Err(HarnessError::Config(format!("invalid header name {name:?}")));
            }
            if HeaderValue::from_str(value).is_err() {
                return Err(HarnessError::Config(format!("invalid value for header {name:?}")));
            }
        }
        Ok(())
    }
}
