//! Contract runner implementation.
//!
//! Evaluates every check of a contract against a captured response. A
//! failing check never stops evaluation; all results are collected in
//! contract order.

use std::cmp::Ordering;

use reqcheck_domain::path::{PathExpr, extract, extract_key};
use reqcheck_domain::testing::{compare_values, values_equal};
use reqcheck_domain::{
    Actual, AssertionFailure, CapturedResponse, Check, CheckResult, ContractReport, Expectation,
    Extraction, Predicate, ResponseContract, StatusExpectation,
};
use serde_json::Value;
use tracing::debug;

/// Runs response contracts.
#[derive(Debug, Default, Clone, Copy)]
pub struct ContractRunner;

impl ContractRunner {
    /// Create a new contract runner.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Evaluate every check of `contract` against `response`.
    #[must_use]
    pub fn run(&self, contract: &ResponseContract, response: &CapturedResponse) -> ContractReport {
        let results: Vec<CheckResult> = contract
            .checks()
            .into_iter()
            .map(|check| self.run_check(check, response))
            .collect();

        let report = ContractReport::new(&contract.name, results);
        debug!(
            contract = %report.contract,
            request_id = %response.request_id(),
            passed = report.passed,
            failed = report.failed,
            "contract evaluated"
        );
        report
    }

    /// Evaluate `contract` and fail with every mismatch if any check did not hold.
    ///
    /// # Errors
    ///
    /// Returns an `AssertionFailure` listing each failed check in order.
    pub fn verify(
        &self,
        contract: &ResponseContract,
        response: &CapturedResponse,
    ) -> Result<ContractReport, AssertionFailure> {
        self.run(contract, response).into_result()
    }

    /// Evaluate a single check.
    #[must_use]
    pub fn run_check(&self, check: Check, response: &CapturedResponse) -> CheckResult {
        let outcome = match &check {
            Check::Status { expected } => Self::check_status(expected, response),
            Check::Json { expectation } => Self::check_json(expectation, response),
            Check::Header { name, value } => Self::check_header(name, value, response),
            Check::BodyEquals { expected } => Self::check_body_equals(expected, response),
            Check::MaxElapsed { max } => {
                let elapsed = response.elapsed();
                Outcome::new(elapsed < *max, Actual::Value(format!("{}ms", elapsed.as_millis())))
            }
        };

        match outcome {
            Outcome {
                passed: false,
                actual,
                message: Some(message),
            } => CheckResult::fail_with_message(check, actual, message),
            Outcome { passed, actual, .. } => CheckResult::from_outcome(check, passed, actual),
        }
    }

    fn check_status(expected: &StatusExpectation, response: &CapturedResponse) -> Outcome {
        let actual = response.status().as_u16();
        Outcome::new(expected.matches(actual), Actual::Value(actual.to_string()))
    }

    fn check_header(name: &str, expected: &str, response: &CapturedResponse) -> Outcome {
        response.header(name).map_or_else(
            || Outcome::new(false, Actual::NotFound),
            |actual| Outcome::new(actual == expected, Actual::Value(actual.to_string())),
        )
    }

    fn check_body_equals(expected: &str, response: &CapturedResponse) -> Outcome {
        let matches = response.body_bytes() == expected.as_bytes();
        Outcome::new(matches, Actual::Value(format!("{:?}", response.body_text())))
    }

    fn check_json(expectation: &Expectation, response: &CapturedResponse) -> Outcome {
        let path = match PathExpr::parse(&expectation.path) {
            Ok(path) => path,
            Err(e) => {
                return Outcome::failed(Actual::Unavailable("invalid path".to_string()), e.to_string());
            }
        };

        let tree = match response.json() {
            Ok(tree) => tree,
            Err(e) => {
                return Outcome::failed(
                    Actual::Unavailable("body is not valid JSON".to_string()),
                    e.to_string(),
                );
            }
        };

        match &expectation.predicate {
            Predicate::Equals(expected) => match extract(tree, &path) {
                Extraction::Value(actual) => Outcome::new(values_equal(expected, actual), render(actual)),
                _ => Outcome::new(false, Actual::NotFound),
            },
            Predicate::HasKey(key) => match extract_key(tree, &path, key) {
                Extraction::KeyExists(true) => {
                    Outcome::new(true, Actual::Value("key present".to_string()))
                }
                Extraction::KeyExists(false) => Outcome::failed(
                    Actual::NotFound,
                    format!("no key '{key}' at {}", path.as_str()),
                ),
                _ => Outcome::new(false, Actual::NotFound),
            },
            Predicate::LessThan(bound) => match extract(tree, &path) {
                Extraction::Value(actual) => match compare_values(actual, bound) {
                    Some(ordering) => Outcome::new(ordering == Ordering::Less, render(actual)),
                    None => Outcome::failed(
                        render(actual),
                        format!("cannot order {actual} against {bound}"),
                    ),
                },
                _ => Outcome::new(false, Actual::NotFound),
            },
        }
    }
}

/// Intermediate result of one check, before it is paired with the check.
struct Outcome {
    passed: bool,
    actual: Actual,
    message: Option<String>,
}

impl Outcome {
    const fn new(passed: bool, actual: Actual) -> Self {
        Self {
            passed,
            actual,
            message: None,
        }
    }

    const fn failed(actual: Actual, message: String) -> Self {
        Self {
            passed: false,
            actual,
            message: Some(message),
        }
    }
}

fn render(value: &Value) -> Actual {
    Actual::Value(value.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use reqcheck_domain::Mismatch;
    use std::collections::HashMap;
    use std::time::Duration;

    fn json_response(status: u16, body: &str) -> CapturedResponse {
        CapturedResponse::new(
            status,
            HashMap::from([(
                "Content-Type".to_string(),
                "application/json; charset=utf-8".to_string(),
            )]),
            body.as_bytes().to_vec(),
            Duration::from_millis(120),
        )
    }

    fn single_user() -> CapturedResponse {
        json_response(
            200,
            r#"{"data":{"id":2,"email":"janet.weaver@reqres.in","first_name":"Janet","last_name":"Weaver","avatar":null}}"#,
        )
    }

    #[test]
    fn test_all_checks_pass() {
        let contract = ResponseContract::new("single user")
            .status(200)
            .expect(Expectation::equals("data.id", 2))
            .expect(Expectation::equals("$.data.email", "janet.weaver@reqres.in"))
            .expect(Expectation::equals(r#"data["first_name"]"#, "Janet"))
            .expect(Expectation::has_key_at("data", "avatar"))
            .header("content-type", "application/json; charset=utf-8")
            .max_elapsed(Duration::from_secs(5));

        let report = ContractRunner::new().run(&contract, &single_user());
        assert_eq!(report.total, 7);
        assert!(report.all_passed(), "{:?}", report.mismatches());
    }

    #[test]
    fn test_numeric_coercion() {
        let response = json_response(200, r#"{"page":"2","total":12.0}"#);
        let contract = ResponseContract::new("coerced")
            .expect(Expectation::equals("page", 2))
            .expect(Expectation::equals("total", 12));

        assert!(ContractRunner::new().verify(&contract, &response).is_ok());
    }

    #[test]
    fn test_aggregates_every_failure_in_order() {
        let contract = ResponseContract::new("single user")
            .expect(Expectation::equals("data.id", 3))
            .expect(Expectation::equals("data.first_name", "Janet"))
            .expect(Expectation::equals("data.missing", "x"));

        let failure = ContractRunner::new()
            .verify(&contract, &single_user())
            .unwrap_err();

        assert_eq!(failure.total, 3);
        assert_eq!(
            failure.mismatches,
            vec![
                Mismatch {
                    check: "data.id == 3".to_string(),
                    expected: "3".to_string(),
                    actual: Actual::Value("2".to_string()),
                    message: None,
                },
                Mismatch {
                    check: r#"data.missing == "x""#.to_string(),
                    expected: r#""x""#.to_string(),
                    actual: Actual::NotFound,
                    message: None,
                },
            ]
        );
    }

    #[test]
    fn test_status_failure_does_not_stop_evaluation() {
        let contract = ResponseContract::new("wrong status")
            .status(404)
            .expect(Expectation::equals("data.id", 2))
            .body("{}");

        let report = ContractRunner::new().run(&contract, &single_user());
        assert_eq!(report.total, 3);
        assert_eq!(report.failed, 2);
        assert!(!report.results[0].passed);
        assert!(report.results[1].passed);
        assert!(!report.results[2].passed);
    }

    #[test]
    fn test_null_is_present_but_missing_is_not() {
        let response = json_response(200, r#"{"a":null}"#);
        let runner = ContractRunner::new();

        let present = ResponseContract::new("present")
            .expect(Expectation::has_key("a"))
            .expect(Expectation::equals("a", Value::Null));
        assert!(runner.verify(&present, &response).is_ok());

        let absent = ResponseContract::new("absent").expect(Expectation::has_key("b"));
        let failure = runner.verify(&absent, &response).unwrap_err();
        assert_eq!(failure.mismatches[0].actual, Actual::NotFound);
    }

    #[test]
    fn test_non_json_body_is_unavailable_but_other_checks_run() {
        let response = CapturedResponse::new(204, HashMap::new(), Vec::new(), Duration::from_millis(5));
        let contract = ResponseContract::new("delete")
            .status(204)
            .expect(Expectation::has_key("id"))
            .body("");

        let report = ContractRunner::new().run(&contract, &response);
        assert_eq!(report.passed, 2);
        assert_eq!(report.failed, 1);
        assert_eq!(
            report.results[1].actual,
            Actual::Unavailable("body is not valid JSON".to_string())
        );
    }

    #[test]
    fn test_body_equality_is_byte_exact() {
        let response = CapturedResponse::new(
            200,
            HashMap::new(),
            vec![b'{', 0xFF, b'}'],
            Duration::from_millis(5),
        );
        let runner = ContractRunner::new();

        let lossy = ResponseContract::new("lossy").body("{\u{FFFD}}");
        let failure = runner.verify(&lossy, &response).unwrap_err();
        assert_eq!(failure.mismatches.len(), 1);

        let exact = ResponseContract::new("exact").body("{}");
        assert!(runner.verify(&exact, &json_response(200, "{}")).is_ok());
    }

    #[test]
    fn test_invalid_path_is_a_mismatch() {
        let contract = ResponseContract::new("indexed")
            .expect(Expectation::equals("data[0].id", 1))
            .expect(Expectation::equals("data..id", 1));

        let failure = ContractRunner::new()
            .verify(&contract, &single_user())
            .unwrap_err();
        assert_eq!(failure.mismatches.len(), 2);
        assert!(failure.mismatches.iter().all(|m| m.message.is_some()));
    }

    #[test]
    fn test_less_than() {
        let response = json_response(200, r#"{"year":2001,"name":"cerulean","data":[]}"#);
        let runner = ContractRunner::new();

        let holds = ResponseContract::new("lt")
            .expect(Expectation::less_than("year", 2002))
            .expect(Expectation::less_than("name", "fuchsia rose"));
        assert!(runner.verify(&holds, &response).is_ok());

        let fails = ResponseContract::new("lt")
            .expect(Expectation::less_than("year", 2001))
            .expect(Expectation::less_than("data", 1));
        let failure = runner.verify(&fails, &response).unwrap_err();
        assert_eq!(failure.mismatches.len(), 2);
        assert!(failure.mismatches[1].message.is_some());
    }

    #[test]
    fn test_timing_bound_is_strict() {
        let response = json_response(200, "{}");
        let runner = ContractRunner::new();

        let exact = ResponseContract::new("exact").max_elapsed(Duration::from_millis(120));
        assert!(runner.verify(&exact, &response).is_err());

        let above = ResponseContract::new("above").max_elapsed(Duration::from_millis(121));
        assert!(runner.verify(&above, &response).is_ok());
    }

    #[test]
    fn test_missing_header() {
        let contract = ResponseContract::new("headers").header("x-request-id", "abc");
        let failure = ContractRunner::new()
            .verify(&contract, &single_user())
            .unwrap_err();
        assert_eq!(failure.mismatches[0].actual, Actual::NotFound);
    }

    #[test]
    fn test_empty_contract_passes() {
        let report = ContractRunner::new().run(&ResponseContract::new("empty"), &single_user());
        assert_eq!(report.total, 0);
        assert!(report.all_passed());
    }
}
