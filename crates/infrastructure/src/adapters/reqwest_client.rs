//! HTTP Client implementation using reqwest.
//!
//! This adapter implements the `HttpClient` port using the reqwest library.
//! It sends exactly what the executor prepared: no retries, no extra headers
//! beyond the user agent.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use reqcheck_application::ports::{HttpClient, TransportError, TransportErrorKind};
use reqcheck_domain::{CapturedResponse, HttpMethod, OutgoingRequest};
use reqwest::{Client, Method};

/// User agent sent with every request.
pub const USER_AGENT: &str = concat!("reqcheck/", env!("CARGO_PKG_VERSION"));

/// HTTP client implementation using reqwest.
///
/// Wraps a `reqwest::Client`, which is internally reference counted, so one
/// adapter can be shared by every test case.
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: Client,
}

impl ReqwestHttpClient {
    /// Creates a new HTTP client with default settings.
    ///
    /// Redirects are followed up to 10 hops. The timeout is applied per
    /// request from `OutgoingRequest::timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be created.
    pub fn new() -> Result<Self, TransportError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| TransportError::new(TransportErrorKind::Other, e.to_string()))?;

        Ok(Self { client })
    }

    /// Converts domain `HttpMethod` to reqwest `Method`.
    const fn to_reqwest_method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Patch => Method::PATCH,
            HttpMethod::Delete => Method::DELETE,
        }
    }

    /// Maps reqwest errors to a `TransportError`.
    fn map_error(error: &reqwest::Error, timeout: Duration) -> TransportError {
        if error.is_timeout() {
            return TransportError::timeout(timeout);
        }

        let message = error.to_string();
        if error.is_connect() {
            let detail = Self::error_chain(error).to_lowercase();
            let host = error
                .url()
                .and_then(|u| u.host_str().map(ToString::to_string))
                .unwrap_or_else(|| "unknown".to_string());

            if detail.contains("dns") || detail.contains("resolve") {
                return TransportError::new(
                    TransportErrorKind::Dns,
                    format!("could not resolve {host}: {message}"),
                );
            }
            if detail.contains("refused") {
                let port = error
                    .url()
                    .and_then(url::Url::port_or_known_default)
                    .unwrap_or(80);
                return TransportError::new(
                    TransportErrorKind::ConnectionRefused,
                    format!("connection refused by {host}:{port}"),
                );
            }
            return TransportError::new(TransportErrorKind::Connect, message);
        }

        if error.is_builder() {
            return TransportError::invalid_url(message);
        }
        if error.is_body() || error.is_decode() {
            return TransportError::new(TransportErrorKind::Body, message);
        }

        TransportError::new(TransportErrorKind::Other, message)
    }

    /// Concatenates the error and all of its sources.
    fn error_chain(error: &reqwest::Error) -> String {
        let mut chain = error.to_string();
        let mut source = std::error::Error::source(error);
        while let Some(cause) = source {
            chain.push_str(": ");
            chain.push_str(&cause.to_string());
            source = cause.source();
        }
        chain
    }
}

impl HttpClient for ReqwestHttpClient {
    async fn send(&self, request: &OutgoingRequest) -> Result<CapturedResponse, TransportError> {
        let start = Instant::now();

        let mut builder = self
            .client
            .request(Self::to_reqwest_method(request.method), request.url.clone())
            .timeout(request.timeout);

        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }

        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder
            .send()
            .await
            .map_err(|e| Self::map_error(&e, request.timeout))?;

        let status = response.status().as_u16();

        let headers: HashMap<String, String> = response
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("<binary>").to_string()))
            .collect();

        let body = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::timeout(request.timeout)
            } else {
                TransportError::new(
                    TransportErrorKind::Body,
                    format!("failed to read body: {e}"),
                )
            }
        })?;

        // Elapsed covers the body read as well as the headers.
        let elapsed = start.elapsed();

        Ok(CapturedResponse::new(status, headers, body.to_vec(), elapsed).with_request_id(request.id))
    }
}
