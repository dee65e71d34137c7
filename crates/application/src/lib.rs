//! Reqcheck Application - Harness orchestration
//!
//! This crate sits between the pure domain types and the I/O adapters:
//!
//! - **Ports**: the `HttpClient` trait that transport adapters implement
//! - **Use cases**: the request [`Executor`]
//! - **Configuration**: [`HarnessConfig`], shared by every test case
//! - **Errors**: the [`HarnessError`] taxonomy surfaced to test cases

pub mod config;
pub mod error;
pub mod ports;
pub mod use_cases;

pub use config::{DEFAULT_BASE_URL, HarnessConfig};
pub use error::{HarnessError, HarnessResult};
pub use ports::{HttpClient, TransportError, TransportErrorKind};
pub use use_cases::Executor;
