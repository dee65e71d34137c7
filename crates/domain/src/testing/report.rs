//! Check results and the aggregated failure report.

use std::fmt;

use serde::Serialize;

use super::{Check, Predicate};

/// What was actually observed for a check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Actual {
    /// An observed value, rendered for display.
    Value(String),
    /// The path did not resolve.
    NotFound,
    /// Nothing could be observed (e.g. the body is not JSON).
    Unavailable(String),
}

impl fmt::Display for Actual {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => f.write_str(v),
            Self::NotFound => f.write_str("NotFound"),
            Self::Unavailable(reason) => write!(f, "<unavailable: {reason}>"),
        }
    }
}

impl Check {
    /// The expected side of the check, rendered for display.
    #[must_use]
    pub fn expected(&self) -> String {
        match self {
            Self::Status { expected } => expected.description(),
            Self::Json { expectation } => match &expectation.predicate {
                Predicate::Equals(v) => v.to_string(),
                Predicate::HasKey(key) => format!("key '{key}' present"),
                Predicate::LessThan(v) => format!("< {v}"),
            },
            Self::Header { value, .. } => value.clone(),
            Self::BodyEquals { expected } => format!("{expected:?}"),
            Self::MaxElapsed { max } => format!("< {}ms", max.as_millis()),
        }
    }
}

/// Result of evaluating a single check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckResult {
    /// The check that was evaluated.
    pub check: Check,
    /// Whether the check held.
    pub passed: bool,
    /// What was observed.
    pub actual: Actual,
    /// Extra detail on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CheckResult {
    /// Create a passed result.
    #[must_use]
    pub fn pass(check: Check, actual: Actual) -> Self {
        Self {
            check,
            passed: true,
            actual,
            message: None,
        }
    }

    /// Create a failed result.
    #[must_use]
    pub fn fail(check: Check, actual: Actual) -> Self {
        Self {
            check,
            passed: false,
            actual,
            message: None,
        }
    }

    /// Create a failed result with an explanation.
    #[must_use]
    pub fn fail_with_message(check: Check, actual: Actual, message: impl Into<String>) -> Self {
        Self {
            check,
            passed: false,
            actual,
            message: Some(message.into()),
        }
    }

    /// Pass or fail depending on `passed`.
    #[must_use]
    pub fn from_outcome(check: Check, passed: bool, actual: Actual) -> Self {
        if passed {
            Self::pass(check, actual)
        } else {
            Self::fail(check, actual)
        }
    }
}

/// One failed check, as listed in an [`AssertionFailure`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mismatch {
    /// Description of the check (path and predicate).
    pub check: String,
    /// Expected value.
    pub expected: String,
    /// Observed value, or `NotFound`.
    pub actual: Actual,
    /// Extra detail, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<&CheckResult> for Mismatch {
    fn from(result: &CheckResult) -> Self {
        Self {
            check: result.check.description(),
            expected: result.check.expected(),
            actual: result.actual.clone(),
            message: result.message.clone(),
        }
    }
}

/// Results from evaluating a contract against one response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContractReport {
    /// Contract that was evaluated.
    pub contract: String,
    /// Individual check results, in evaluation order.
    pub results: Vec<CheckResult>,
    /// Total number of checks.
    pub total: usize,
    /// Number of passed checks.
    pub passed: usize,
    /// Number of failed checks.
    pub failed: usize,
}

impl ContractReport {
    /// Create a report from results.
    #[must_use]
    pub fn new(contract: impl Into<String>, results: Vec<CheckResult>) -> Self {
        let total = results.len();
        let passed = results.iter().filter(|r| r.passed).count();

        Self {
            contract: contract.into(),
            results,
            total,
            passed,
            failed: total - passed,
        }
    }

    /// Check if all checks passed.
    #[must_use]
    pub const fn all_passed(&self) -> bool {
        self.failed == 0
    }

    /// Every failed check, in evaluation order.
    #[must_use]
    pub fn mismatches(&self) -> Vec<Mismatch> {
        self.results
            .iter()
            .filter(|r| !r.passed)
            .map(Mismatch::from)
            .collect()
    }

    /// `Ok(self)` when every check passed.
    ///
    /// # Errors
    ///
    /// Returns an `AssertionFailure` listing every mismatch.
    pub fn into_result(self) -> Result<Self, AssertionFailure> {
        if self.all_passed() {
            Ok(self)
        } else {
            Err(AssertionFailure {
                mismatches: self.mismatches(),
                contract: self.contract,
                total: self.total,
            })
        }
    }
}

/// One or more checks of a contract did not hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssertionFailure {
    /// Contract name.
    pub contract: String,
    /// Number of checks evaluated.
    pub total: usize,
    /// Every failed check, in evaluation order.
    pub mismatches: Vec<Mismatch>,
}

impl fmt::Display for AssertionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "contract '{}' failed: {} of {} checks did not hold",
            self.contract,
            self.mismatches.len(),
            self.total
        )?;
        for (i, mismatch) in self.mismatches.iter().enumerate() {
            write!(
                f,
                "\n  {}. {}\n     expected: {}\n     actual:   {}",
                i + 1,
                mismatch.check,
                mismatch.expected,
                mismatch.actual
            )?;
            if let Some(message) = &mismatch.message {
                write!(f, "\n     note:     {message}")?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for AssertionFailure {}
