//! Response contracts and their results.
//!
//! A [`ResponseContract`] declares everything a response must satisfy:
//! a status code, an ordered assertion set of [`Expectation`]s, header
//! values, a literal body and a time ceiling. Evaluating it yields a
//! [`ContractReport`] with one result per check, which converts into an
//! [`AssertionFailure`] carrying every mismatch.

mod compare;
mod report;

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::path::ROOT;

pub use compare::{compare_values, values_equal};
pub use report::{Actual, AssertionFailure, CheckResult, ContractReport, Mismatch};

/// Predicate applied to the value found at a path.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Predicate {
    /// Value equality, with numeric coercion.
    Equals(Value),
    /// The object at the path has this key; its value is ignored.
    HasKey(String),
    /// The value orders strictly before this one.
    LessThan(Value),
}

/// A single (path, predicate) check against a JSON body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Expectation {
    /// Path expression, see [`crate::path`].
    pub path: String,
    /// What must hold for the value at `path`.
    pub predicate: Predicate,
}

impl Expectation {
    /// `path` equals `expected`.
    #[must_use]
    pub fn equals(path: impl Into<String>, expected: impl Into<Value>) -> Self {
        Self {
            path: path.into(),
            predicate: Predicate::Equals(expected.into()),
        }
    }

    /// The document root has `key`.
    #[must_use]
    pub fn has_key(key: impl Into<String>) -> Self {
        Self::has_key_at(ROOT, key)
    }

    /// The object at `path` has `key`.
    #[must_use]
    pub fn has_key_at(path: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            predicate: Predicate::HasKey(key.into()),
        }
    }

    /// `path` is strictly less than `bound`.
    #[must_use]
    pub fn less_than(path: impl Into<String>, bound: impl Into<Value>) -> Self {
        Self {
            path: path.into(),
            predicate: Predicate::LessThan(bound.into()),
        }
    }

    /// Get a human-readable description of this expectation.
    #[must_use]
    pub fn description(&self) -> String {
        match &self.predicate {
            Predicate::Equals(v) => format!("{} == {}", self.path, v),
            Predicate::HasKey(key) => format!("{} has key '{}'", self.path, key),
            Predicate::LessThan(v) => format!("{} < {}", self.path, v),
        }
    }
}

/// Expected status code value or range.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum StatusExpectation {
    /// Exact status code.
    Exact(u16),
    /// Range of status codes (e.g., 200-299).
    Range {
        /// Minimum status code (inclusive).
        min: u16,
        /// Maximum status code (inclusive).
        max: u16,
    },
    /// One of multiple status codes.
    OneOf(Vec<u16>),
}

impl StatusExpectation {
    /// Check if a status code matches this expectation.
    #[must_use]
    pub fn matches(&self, status: u16) -> bool {
        match self {
            Self::Exact(expected) => status == *expected,
            Self::Range { min, max } => (*min..=*max).contains(&status),
            Self::OneOf(codes) => codes.contains(&status),
        }
    }

    /// Get description of the expectation.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::Exact(code) => code.to_string(),
            Self::Range { min, max } => format!("{min}-{max}"),
            Self::OneOf(codes) => {
                let codes_str: Vec<_> = codes.iter().map(ToString::to_string).collect();
                format!("one of [{}]", codes_str.join(", "))
            }
        }
    }
}

/// One check of a contract, in the form it is evaluated and reported.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Check {
    /// Response status code.
    Status {
        /// Expected status code or range.
        expected: StatusExpectation,
    },
    /// A path expectation against the JSON body.
    Json {
        /// The expectation.
        expectation: Expectation,
    },
    /// Header present with exactly this value.
    Header {
        /// Header name (case-insensitive).
        name: String,
        /// Expected value.
        value: String,
    },
    /// Raw body equals this text exactly.
    BodyEquals {
        /// Expected body content.
        expected: String,
    },
    /// Round trip finished in strictly less than this.
    MaxElapsed {
        /// Exclusive ceiling.
        max: Duration,
    },
}

impl Check {
    /// Get a human-readable description of this check.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::Status { expected } => format!("status == {}", expected.description()),
            Self::Json { expectation } => expectation.description(),
            Self::Header { name, value } => format!("header '{name}' == '{value}'"),
            Self::BodyEquals { expected } => format!("body == {expected:?}"),
            Self::MaxElapsed { max } => format!("elapsed < {}ms", max.as_millis()),
        }
    }
}

/// Everything one response must satisfy.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResponseContract {
    /// Name used in reports.
    #[serde(default)]
    pub name: String,
    /// Expected status.
    #[serde(default)]
    pub status: Option<StatusExpectation>,
    /// The assertion set, evaluated in order.
    #[serde(default)]
    pub expectations: Vec<Expectation>,
    /// Expected header values.
    #[serde(default)]
    pub headers: Vec<(String, String)>,
    /// Exact body text.
    #[serde(default)]
    pub body: Option<String>,
    /// Exclusive ceiling on the round trip.
    #[serde(default)]
    pub max_elapsed: Option<Duration>,
}

impl ResponseContract {
    /// Create a new empty contract.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Expect exactly this status code.
    #[must_use]
    pub fn status(self, code: u16) -> Self {
        self.status_matching(StatusExpectation::Exact(code))
    }

    /// Expect a status matching `expected`.
    #[must_use]
    pub fn status_matching(mut self, expected: StatusExpectation) -> Self {
        self.status = Some(expected);
        self
    }

    /// Append an expectation to the assertion set.
    #[must_use]
    pub fn expect(mut self, expectation: Expectation) -> Self {
        self.expectations.push(expectation);
        self
    }

    /// Append several expectations to the assertion set.
    #[must_use]
    pub fn expect_all(mut self, expectations: impl IntoIterator<Item = Expectation>) -> Self {
        self.expectations.extend(expectations);
        self
    }

    /// Expect a header value.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Expect the raw body to equal `expected` exactly.
    #[must_use]
    pub fn body(mut self, expected: impl Into<String>) -> Self {
        self.body = Some(expected.into());
        self
    }

    /// Expect the round trip to take strictly less than `max`.
    #[must_use]
    pub fn max_elapsed(mut self, max: Duration) -> Self {
        self.max_elapsed = Some(max);
        self
    }

    /// All configured checks, in evaluation order: status, assertion set,
    /// headers, body, timing.
    #[must_use]
    pub fn checks(&self) -> Vec<Check> {
        let status = self
            .status
            .iter()
            .map(|expected| Check::Status {
                expected: expected.clone(),
            });
        let json = self.expectations.iter().map(|expectation| Check::Json {
            expectation: expectation.clone(),
        });
        let headers = self.headers.iter().map(|(name, value)| Check::Header {
            name: name.clone(),
            value: value.clone(),
        });
        let body = self.body.iter().map(|expected| Check::BodyEquals {
            expected: expected.clone(),
        });
        let timing = self.max_elapsed.iter().map(|max| Check::MaxElapsed { max: *max });

        status.chain(json).chain(headers).chain(body).chain(timing).collect()
    }

    /// Check if the contract has no checks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.expectations.is_empty()
            && self.headers.is_empty()
            && self.body.is_none()
            && self.max_elapsed.is_none()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_status_expectation_exact() {
        let exp = StatusExpectation::Exact(200);
        assert!(exp.matches(200));
        assert!(!exp.matches(201));
    }

    #[test]
    fn test_status_expectation_range() {
        let exp = StatusExpectation::Range { min: 200, max: 299 };
        assert!(exp.matches(200));
        assert!(exp.matches(299));
        assert!(!exp.matches(300));
        assert!(!exp.matches(199));
    }

    #[test]
    fn test_status_expectation_one_of() {
        let exp = StatusExpectation::OneOf(vec![200, 201, 204]);
        assert!(exp.matches(204));
        assert!(!exp.matches(202));
        assert_eq!(exp.description(), "one of [200, 201, 204]");
    }

    #[test]
    fn test_expectation_descriptions() {
        assert_eq!(Expectation::equals("data.id", 2).description(), "data.id == 2");
        assert_eq!(
            Expectation::equals("error", "Missing password").description(),
            r#"error == "Missing password""#
        );
        assert_eq!(Expectation::has_key("id").description(), "$ has key 'id'");
        assert_eq!(Expectation::less_than("total", 13).description(), "total < 13");
    }

    #[test]
    fn test_checks_follow_evaluation_order() {
        let contract = ResponseContract::new("create user")
            .max_elapsed(Duration::from_secs(5))
            .body("{}")
            .header("Content-Type", "application/json")
            .expect(Expectation::has_key("id"))
            .status(201);

        let descriptions: Vec<_> = contract.checks().iter().map(Check::description).collect();
        assert_eq!(
            descriptions,
            vec![
                "status == 201",
                "$ has key 'id'",
                "header 'Content-Type' == 'application/json'",
                r#"body == "{}""#,
                "elapsed < 5000ms",
            ]
        );
    }

    #[test]
    fn test_empty_contract() {
        let contract = ResponseContract::new("nothing");
        assert!(contract.is_empty());
        assert!(contract.checks().is_empty());
        assert!(!contract.status(200).is_empty());
    }

    #[test]
    fn test_contract_is_declarable_as_json() {
        let contract: ResponseContract = serde_json::from_value(json!({
            "name": "single user",
            "status": 200,
            "expectations": [
                {"path": "data.id", "predicate": {"type": "equals", "value": 2}},
                {"path": "$", "predicate": {"type": "has_key", "value": "support"}}
            ]
        }))
        .unwrap();

        assert_eq!(
            contract,
            ResponseContract::new("single user")
                .status(200)
                .expect(Expectation::equals("data.id", 2))
                .expect(Expectation::has_key("support"))
        );
    }
}
