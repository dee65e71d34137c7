//! Reqcheck Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer, plus the process-level plumbing
//! every test binary needs: configuration loading and logging.

pub mod adapters;
pub mod config;
pub mod logging;
pub mod testing;

pub use adapters::ReqwestHttpClient;
pub use self::config::{global_config, load_config};
pub use logging::init_logging;
pub use testing::ContractRunner;
