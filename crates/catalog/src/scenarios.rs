//! One scenario per reqres.in endpoint.
//!
//! A [`Scenario`] pairs a request (method, path, optional fixture payload)
//! with the contract its response must satisfy. Running it sends the request
//! through an [`Executor`] and verifies the whole contract, so a single
//! failure report lists every mismatch.

use std::fmt;
use std::time::Duration;

use reqcheck_application::{Executor, HarnessResult, HttpClient};
use reqcheck_domain::fixture::Fixture;
use reqcheck_domain::{ContractReport, Expectation, HttpMethod, ResponseContract};
use reqcheck_infrastructure::ContractRunner;
use serde_json::Value;
use tracing::info;

use crate::fixtures::{UserData, field_expectations, fuchsia_rose, janet_weaver};

/// Token reqres.in issues for `eve.holt@reqres.in`.
pub const LOGIN_TOKEN: &str = "QpwL5tke4Pnpja7X4";

/// Upper bound for the delayed endpoint, which waits three seconds.
pub const DELAYED_RESPONSE_CEILING: Duration = Duration::from_secs(5);

/// Every case in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scenario {
    /// `GET api/users?page=2`
    ListUsers,
    /// `GET api/users/2`
    SingleUser,
    /// `GET api/users/23`
    SingleUserNotFound,
    /// `GET api/unknown`
    ListResources,
    /// `GET api/unknown/2`
    SingleResource,
    /// `GET api/unknown/23`
    SingleResourceNotFound,
    /// `POST api/users`
    CreateUser,
    /// `PUT api/users/2`
    UpdateUser,
    /// `PATCH api/users/2`
    PatchUser,
    /// `DELETE api/users/2`
    DeleteUser,
    /// `POST api/register` with a password
    RegisterSuccessful,
    /// `POST api/register` without a password
    RegisterUnsuccessful,
    /// `POST api/login` with a password
    LoginSuccessful,
    /// `POST api/login` without a password
    LoginUnsuccessful,
    /// `GET api/users?delay=3`
    DelayedResponse,
}

impl Scenario {
    /// Returns all scenarios in catalog order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::ListUsers,
            Self::SingleUser,
            Self::SingleUserNotFound,
            Self::ListResources,
            Self::SingleResource,
            Self::SingleResourceNotFound,
            Self::CreateUser,
            Self::UpdateUser,
            Self::PatchUser,
            Self::DeleteUser,
            Self::RegisterSuccessful,
            Self::RegisterUnsuccessful,
            Self::LoginSuccessful,
            Self::LoginUnsuccessful,
            Self::DelayedResponse,
        ]
    }

    /// Name used in reports and logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::ListUsers => "list users",
            Self::SingleUser => "single user",
            Self::SingleUserNotFound => "single user not found",
            Self::ListResources => "list resources",
            Self::SingleResource => "single resource",
            Self::SingleResourceNotFound => "single resource not found",
            Self::CreateUser => "create user",
            Self::UpdateUser => "update user",
            Self::PatchUser => "patch user",
            Self::DeleteUser => "delete user",
            Self::RegisterSuccessful => "register successful",
            Self::RegisterUnsuccessful => "register unsuccessful",
            Self::LoginSuccessful => "login successful",
            Self::LoginUnsuccessful => "login unsuccessful",
            Self::DelayedResponse => "delayed response",
        }
    }

    /// HTTP method of the request.
    #[must_use]
    pub const fn method(self) -> HttpMethod {
        match self {
            Self::CreateUser
            | Self::RegisterSuccessful
            | Self::RegisterUnsuccessful
            | Self::LoginSuccessful
            | Self::LoginUnsuccessful => HttpMethod::Post,
            Self::UpdateUser => HttpMethod::Put,
            Self::PatchUser => HttpMethod::Patch,
            Self::DeleteUser => HttpMethod::Delete,
            _ => HttpMethod::Get,
        }
    }

    /// Request path relative to the base URL, query included.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::ListUsers => "api/users?page=2",
            Self::SingleUser => "api/users/2",
            Self::SingleUserNotFound => "api/users/23",
            Self::ListResources => "api/unknown",
            Self::SingleResource => "api/unknown/2",
            Self::SingleResourceNotFound => "api/unknown/23",
            Self::CreateUser => "api/users",
            Self::UpdateUser | Self::PatchUser | Self::DeleteUser => "api/users/2",
            Self::RegisterSuccessful | Self::RegisterUnsuccessful => "api/register",
            Self::LoginSuccessful | Self::LoginUnsuccessful => "api/login",
            Self::DelayedResponse => "api/users?delay=3",
        }
    }

    /// Request payload, if the scenario sends one.
    #[must_use]
    pub fn payload(self) -> Option<Fixture<UserData>> {
        let user = Fixture::<UserData>::builder();
        let payload = match self {
            Self::CreateUser => user
                .set(UserData::NAME, "morpheus")
                .set(UserData::JOB, "leader"),
            Self::UpdateUser | Self::PatchUser => user
                .set(UserData::NAME, "morpheus")
                .set(UserData::JOB, "zion resident"),
            Self::RegisterSuccessful => user
                .set(UserData::EMAIL, "eve.holt@reqres.in")
                .set(UserData::PASSWORD, "pistol"),
            Self::RegisterUnsuccessful => user.set(UserData::EMAIL, "eve.holt@reqres.in"),
            Self::LoginSuccessful => user
                .set(UserData::EMAIL, "eve.holt@reqres.in")
                .set(UserData::PASSWORD, "cityslicka"),
            Self::LoginUnsuccessful => user.set(UserData::EMAIL, "peter@klaven"),
            _ => return None,
        };
        Some(payload.build())
    }

    /// Contract the response must satisfy.
    ///
    /// # Errors
    ///
    /// Returns a serialization error if a fixture used for the expected
    /// values cannot be encoded.
    pub fn contract(self) -> HarnessResult<ResponseContract> {
        let contract = ResponseContract::new(self.name());

        let contract = match self {
            Self::ListUsers => contract
                .status(200)
                .expect(Expectation::equals("page", 2))
                .expect(Expectation::equals("total", 12)),
            Self::SingleUser => contract
                .status(200)
                .expect_all(field_expectations("data", &janet_weaver())?),
            Self::SingleUserNotFound | Self::SingleResourceNotFound => {
                contract.status(404).body("{}")
            }
            Self::ListResources => contract
                .status(200)
                .expect(Expectation::equals("total", 12)),
            Self::SingleResource => contract
                .status(200)
                .expect_all(field_expectations("data", &fuchsia_rose())?),
            Self::CreateUser => contract
                .status(201)
                .expect(Expectation::has_key("id"))
                .expect_all(self.echoed_fields()?)
                .expect(Expectation::has_key("createdAt")),
            Self::UpdateUser | Self::PatchUser => contract
                .status(200)
                .expect_all(self.echoed_fields()?)
                .expect(Expectation::has_key("updatedAt")),
            Self::DeleteUser => contract.status(204).body(""),
            Self::RegisterSuccessful => contract
                .status(200)
                .expect(Expectation::has_key("id"))
                .expect(Expectation::has_key("token")),
            Self::RegisterUnsuccessful | Self::LoginUnsuccessful => contract
                .status(400)
                .expect(Expectation::equals("error", "Missing password")),
            Self::LoginSuccessful => contract
                .status(200)
                .expect(Expectation::equals("token", LOGIN_TOKEN)),
            Self::DelayedResponse => contract
                .status(200)
                .max_elapsed(DELAYED_RESPONSE_CEILING),
        };

        Ok(contract)
    }

    /// `name` and `job` from the payload, expected back at the root.
    fn echoed_fields(self) -> HarnessResult<Vec<Expectation>> {
        let Some(payload) = self.payload() else {
            return Ok(Vec::new());
        };
        let echoed = Fixture::<UserData>::builder()
            .set_opt(UserData::JOB, payload.get(UserData::JOB).and_then(Value::as_str))
            .set_opt(UserData::NAME, payload.get(UserData::NAME).and_then(Value::as_str))
            .build();
        Ok(field_expectations("", &echoed)?)
    }

    /// Sends the request and evaluates the contract.
    ///
    /// # Errors
    ///
    /// Returns `HarnessError::Transport` if no response arrived and
    /// `HarnessError::Assertion` listing every mismatch otherwise.
    pub async fn run<C: HttpClient>(self, executor: &Executor<C>) -> HarnessResult<ContractReport> {
        let contract = self.contract()?;
        let payload = self.payload();

        let response = executor
            .execute(self.method(), self.path(), payload.as_ref())
            .await?;
        let report = ContractRunner::new().verify(&contract, &response)?;

        info!(scenario = self.name(), checks = report.total, "scenario passed");
        Ok(report)
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Lists users on page 2.
///
/// # Errors
///
/// See [`Scenario::run`].
pub async fn list_users<C: HttpClient>(executor: &Executor<C>) -> HarnessResult<()> {
    Scenario::ListUsers.run(executor).await.map(drop)
}

/// Fetches user 2 and checks every field.
///
/// # Errors
///
/// See [`Scenario::run`].
pub async fn single_user<C: HttpClient>(executor: &Executor<C>) -> HarnessResult<()> {
    Scenario::SingleUser.run(executor).await.map(drop)
}

/// Fetches a user that does not exist.
///
/// # Errors
///
/// See [`Scenario::run`].
pub async fn single_user_not_found<C: HttpClient>(executor: &Executor<C>) -> HarnessResult<()> {
    Scenario::SingleUserNotFound.run(executor).await.map(drop)
}

/// Lists resources.
///
/// # Errors
///
/// See [`Scenario::run`].
pub async fn list_resources<C: HttpClient>(executor: &Executor<C>) -> HarnessResult<()> {
    Scenario::ListResources.run(executor).await.map(drop)
}

/// Fetches resource 2 and checks every field.
///
/// # Errors
///
/// See [`Scenario::run`].
pub async fn single_resource<C: HttpClient>(executor: &Executor<C>) -> HarnessResult<()> {
    Scenario::SingleResource.run(executor).await.map(drop)
}

/// Fetches a resource that does not exist.
///
/// # Errors
///
/// See [`Scenario::run`].
pub async fn single_resource_not_found<C: HttpClient>(executor: &Executor<C>) -> HarnessResult<()> {
    Scenario::SingleResourceNotFound.run(executor).await.map(drop)
}

/// Creates a user.
///
/// # Errors
///
/// See [`Scenario::run`].
pub async fn create_user<C: HttpClient>(executor: &Executor<C>) -> HarnessResult<()> {
    Scenario::CreateUser.run(executor).await.map(drop)
}

/// Replaces user 2.
///
/// # Errors
///
/// See [`Scenario::run`].
pub async fn update_user<C: HttpClient>(executor: &Executor<C>) -> HarnessResult<()> {
    Scenario::UpdateUser.run(executor).await.map(drop)
}

/// Partially updates user 2.
///
/// # Errors
///
/// See [`Scenario::run`].
pub async fn patch_user<C: HttpClient>(executor: &Executor<C>) -> HarnessResult<()> {
    Scenario::PatchUser.run(executor).await.map(drop)
}

/// Deletes user 2.
///
/// # Errors
///
/// See [`Scenario::run`].
pub async fn delete_user<C: HttpClient>(executor: &Executor<C>) -> HarnessResult<()> {
    Scenario::DeleteUser.run(executor).await.map(drop)
}

/// Registers with email and password.
///
/// # Errors
///
/// See [`Scenario::run`].
pub async fn register_successful<C: HttpClient>(executor: &Executor<C>) -> HarnessResult<()> {
    Scenario::RegisterSuccessful.run(executor).await.map(drop)
}

/// Registers without a password.
///
/// # Errors
///
/// See [`Scenario::run`].
pub async fn register_unsuccessful<C: HttpClient>(executor: &Executor<C>) -> HarnessResult<()> {
    Scenario::RegisterUnsuccessful.run(executor).await.map(drop)
}

/// Logs in with email and password.
///
/// # Errors
///
/// See [`Scenario::run`].
pub async fn login_successful<C: HttpClient>(executor: &Executor<C>) -> HarnessResult<()> {
    Scenario::LoginSuccessful.run(executor).await.map(drop)
}

/// Logs in without a password.
///
/// # Errors
///
/// See [`Scenario::run`].
pub async fn login_unsuccessful<C: HttpClient>(executor: &Executor<C>) -> HarnessResult<()> {
    Scenario::LoginUnsuccessful.run(executor).await.map(drop)
}

/// Requests a response delayed by three seconds.
///
/// # Errors
///
/// See [`Scenario::run`].
pub async fn delayed_response<C: HttpClient>(executor: &Executor<C>) -> HarnessResult<()> {
    Scenario::DelayedResponse.run(executor).await.map(drop)
}
