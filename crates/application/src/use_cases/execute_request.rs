//! Execute Request Use Case
//!
//! Resolves a relative path against the configured base URL, attaches the
//! JSON content headers and the configured defaults, encodes the payload and
//! hands the request to the `HttpClient` port. Every call is tagged with a
//! fresh request id that ties its log lines together.

use std::sync::Arc;
use std::time::Duration;

use reqcheck_domain::request::resolve_url;
use reqcheck_domain::{CapturedResponse, HttpMethod, OutgoingRequest, SerializationError};
use serde::Serialize;
use tracing::{Instrument, debug, info, info_span, warn};
use url::Url;

use crate::config::HarnessConfig;
use crate::error::HarnessResult;
use crate::ports::HttpClient;

/// Use case for sending requests against one base URL.
///
/// Holds only read-only configuration and the shared client, so one
/// executor can serve concurrent test cases.
///
/// # Example
///
/// ```ignore
/// let executor = Executor::new(Arc::new(ReqwestHttpClient::new()), &config)?;
/// let response = executor.get("api/users?page=2").await?;
/// ```
#[derive(Debug)]
pub struct Executor<C: HttpClient> {
    client: Arc<C>,
    base_url: Url,
    headers: Vec<(String, String)>,
    timeout: Duration,
    log_exchanges: bool,
}

impl<C: HttpClient> Clone for Executor<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            base_url: self.base_url.clone(),
            headers: self.headers.clone(),
            timeout: self.timeout,
            log_exchanges: self.log_exchanges,
        }
    }
}

impl<C: HttpClient> Executor<C> {
    /// Creates an executor from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns `HarnessError::Config` if the configuration is invalid.
    pub fn new(client: Arc<C>, config: &HarnessConfig) -> HarnessResult<Self> {
        config.validate()?;

        let json = mime::APPLICATION_JSON.as_ref();
        let mut headers = vec![
            ("Content-Type".to_string(), json.to_string()),
            ("Accept".to_string(), json.to_string()),
        ];
        for (name, value) in &config.default_headers {
            headers.retain(|(existing, _)| !existing.eq_ignore_ascii_case(name));
            headers.push((name.clone(), value.clone()));
        }

        Ok(Self {
            client,
            base_url: config.parsed_base_url()?,
            headers,
            timeout: config.timeout_duration(),
            log_exchanges: config.log_exchanges,
        })
    }

    /// The URL every path is resolved against.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Headers attached to every request.
    #[must_use]
    pub fn default_headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Builds the outgoing request without sending it.
    ///
    /// # Errors
    ///
    /// Returns a transport error for an unresolvable path or a serialization
    /// error if the body cannot be encoded.
    pub fn prepare<B>(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&B>,
    ) -> HarnessResult<OutgoingRequest>
    where
        B: Serialize + ?Sized,
    {
        let url = resolve_url(&self.base_url, path)?;

        let mut request = OutgoingRequest::new(method, url).with_timeout(self.timeout);
        request.headers.clone_from(&self.headers);

        if let Some(body) = body {
            let bytes = serde_json::to_vec(body).map_err(SerializationError::from)?;
            request = request.with_body(bytes);
        }

        Ok(request)
    }

    /// Sends a request and captures the response.
    ///
    /// Any HTTP status, including 4xx and 5xx, is a successful capture.
    ///
    /// # Errors
    ///
    /// Returns `HarnessError::Transport` when no response was obtained and
    /// `HarnessError::Serialization` when the body cannot be encoded.
    pub async fn execute<B>(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&B>,
    ) -> HarnessResult<CapturedResponse>
    where
        B: Serialize + ?Sized,
    {
        let request = self.prepare(method, path, body)?;
        let span = info_span!(
            "exchange",
            request_id = %request.id,
            method = %request.method,
            path = path.trim_start_matches('/'),
        );

        self.send(request).instrument(span).await
    }

    async fn send(&self, request: OutgoingRequest) -> HarnessResult<CapturedResponse> {
        if self.log_exchanges {
            info!(url = %request.url, headers = ?request.headers, "sending request");
            if request.body.is_some() {
                info!(body = %request.body_text(), "request body");
            }
        }

        let response = match self.client.send(&request).await {
            Ok(response) => response,
            Err(error) => {
                warn!(kind = %error.kind, error = %error.message, "request failed");
                return Err(error.into());
            }
        };

        if self.log_exchanges {
            info!(
                status = %response.status(),
                elapsed = %response.elapsed_display(),
                size = %response.size_display(),
                headers = ?response.headers(),
                body = %response.body_text(),
                "response received"
            );
        } else {
            debug!(status = %response.status(), "response received");
        }

        Ok(response)
    }

    /// Sends a GET request.
    ///
    /// # Errors
    ///
    /// See [`Executor::execute`].
    pub async fn get(&self, path: &str) -> HarnessResult<CapturedResponse> {
        self.execute::<()>(HttpMethod::Get, path, None).await
    }

    /// Sends a POST request with a JSON body.
    ///
    /// # Errors
    ///
    /// See [`Executor::execute`].
    pub async fn post<B>(&self, path: &str, body: &B) -> HarnessResult<CapturedResponse>
    where
        B: Serialize + ?Sized,
    {
        self.execute(HttpMethod::Post, path, Some(body)).await
    }

    /// Sends a PUT request with a JSON body.
    ///
    /// # Errors
    ///
    /// See [`Executor::execute`].
    pub async fn put<B>(&self, path: &str, body: &B) -> HarnessResult<CapturedResponse>
    where
        B: Serialize + ?Sized,
    {
        self.execute(HttpMethod::Put, path, Some(body)).await
    }

    /// Sends a PATCH request with a JSON body.
    ///
    /// # Errors
    ///
    /// See [`Executor::execute`].
    pub async fn patch<B>(&self, path: &str, body: &B) -> HarnessResult<CapturedResponse>
    where
        B: Serialize + ?Sized,
    {
        self.execute(HttpMethod::Patch, path, Some(body)).await
    }

    /// Sends a DELETE request.
    ///
    /// # Errors
    ///
    /// See [`Executor::execute`].
    pub async fn delete(&self, path: &str) -> HarnessResult<CapturedResponse> {
        self.execute::<()>(HttpMethod::Delete, path, None).await
    }
}
