//! Per-case setup.

use std::sync::Arc;

use reqcheck_application::{Executor, HarnessConfig, HarnessResult};
use reqcheck_infrastructure::{ReqwestHttpClient, global_config, init_logging};

/// Prepares an executor for one test case from the process-wide
/// configuration.
///
/// Safe to call at the start of every case: configuration is loaded once
/// and logging is installed once.
///
/// # Errors
///
/// Returns `HarnessError::Config` if the configuration cannot be loaded and
/// `HarnessError::Transport` if the HTTP client cannot be built.
pub fn before_each() -> HarnessResult<Executor<ReqwestHttpClient>> {
    before_each_with(global_config()?)
}

/// Same as [`before_each`] with explicit configuration.
///
/// # Errors
///
/// See [`before_each`].
pub fn before_each_with(config: &HarnessConfig) -> HarnessResult<Executor<ReqwestHttpClient>> {
    init_logging(&config.log_level);
    let client = ReqwestHttpClient::new()?;
    Executor::new(Arc::new(client), config)
}
