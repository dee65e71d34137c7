//! Application use cases.

mod execute_request;

pub use execute_request::Executor;
