//! Response contract evaluation.
//!
//! This module provides the runner that checks captured responses against
//! their contracts.

mod runner;

pub use runner::ContractRunner;
