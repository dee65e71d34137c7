//! Response types.

mod spec;

pub use spec::{CapturedResponse, InvalidJsonBody, StatusCode};
