//! Reqcheck Catalog - reqres.in contract scenarios
//!
//! Fixtures for the reqres.in payloads, the per-case setup hook and one
//! scenario per endpoint. Every scenario runs against any
//! [`HttpClient`](reqcheck_application::HttpClient), so the same catalog
//! drives both the live API and local stubs.

pub mod fixtures;
pub mod scenarios;
pub mod setup;

pub use fixtures::{ListResource, SingleUser, UserData, field_expectations};
pub use scenarios::{
    Scenario, create_user, delayed_response, delete_user, list_resources, list_users,
    login_successful, login_unsuccessful, patch_user, register_successful, register_unsuccessful,
    single_resource, single_resource_not_found, single_user, single_user_not_found, update_user,
};
pub use setup::{before_each, before_each_with};
