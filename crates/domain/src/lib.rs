//! Reqcheck Domain - Core harness types
//!
//! This crate defines the domain model of the contract harness: requests,
//! captured responses, typed fixtures, path expressions and response
//! contracts. All types here are pure Rust with no I/O dependencies.

pub mod error;
pub mod fixture;
pub mod path;
pub mod request;
pub mod response;
pub mod testing;

pub use error::{DomainError, DomainResult};
pub use fixture::{Field, FieldSpec, Fixture, FixtureBuilder, FixtureSchema, SerializationError};
pub use path::{Extraction, PathError, PathExpr, extract, extract_key};
pub use request::{HttpMethod, OutgoingRequest};
pub use response::{CapturedResponse, StatusCode};
pub use testing::{
    Actual, AssertionFailure, Check, CheckResult, ContractReport, Expectation, Mismatch,
    Predicate, ResponseContract, StatusExpectation,
};
