//! Payload and expectation fixtures for the reqres.in API.

use reqcheck_domain::fixture::{Field, FieldSpec, Fixture, FixtureSchema};
use reqcheck_domain::{Expectation, SerializationError};

/// User payload sent to the create, update, register and login endpoints.
#[derive(Debug)]
pub struct UserData;

impl UserData {
    /// Display name.
    pub const NAME: Field<Self, String> = Field::named("name");
    /// Job title.
    pub const JOB: Field<Self, String> = Field::named("job");
    /// Numeric id.
    pub const ID: Field<Self, i64> = Field::named("id");
    /// Login email.
    pub const EMAIL: Field<Self, String> = Field::named("email");
    /// Login password.
    pub const PASSWORD: Field<Self, String> = Field::named("password");
}

impl FixtureSchema for UserData {
    const TYPE_NAME: &'static str = "UserData";
    const FIELDS: &'static [FieldSpec] = &[
        Self::NAME.spec(),
        Self::JOB.spec(),
        Self::ID.spec(),
        Self::EMAIL.spec(),
        Self::PASSWORD.spec(),
    ];
}

/// A user record as returned under `data` by `api/users/{id}`.
#[derive(Debug)]
pub struct SingleUser;

impl SingleUser {
    /// Numeric id.
    pub const ID: Field<Self, i64> = Field::named("id");
    /// Email address.
    pub const EMAIL: Field<Self, String> = Field::named("email");
    /// Given name.
    pub const FIRST_NAME: Field<Self, String> = Field::new("firstName", "first_name");
    /// Family name.
    pub const LAST_NAME: Field<Self, String> = Field::new("lastName", "last_name");
    /// Avatar image URL.
    pub const AVATAR: Field<Self, String> = Field::named("avatar");
}

impl FixtureSchema for SingleUser {
    const TYPE_NAME: &'static str = "SingleUser";
    const FIELDS: &'static [FieldSpec] = &[
        Self::ID.spec(),
        Self::EMAIL.spec(),
        Self::FIRST_NAME.spec(),
        Self::LAST_NAME.spec(),
        Self::AVATAR.spec(),
    ];
}

/// A resource record as returned under `data` by `api/unknown/{id}`.
#[derive(Debug)]
pub struct ListResource;

impl ListResource {
    /// Numeric id.
    pub const ID: Field<Self, i64> = Field::named("id");
    /// Color name.
    pub const NAME: Field<Self, String> = Field::named("name");
    /// Year of introduction.
    pub const YEAR: Field<Self, i64> = Field::named("year");
    /// Hex color code.
    pub const COLOR: Field<Self, String> = Field::named("color");
    /// Pantone identifier.
    pub const PANTONE_VALUE: Field<Self, String> = Field::new("pantoneValue", "pantone_value");
}

impl FixtureSchema for ListResource {
    const TYPE_NAME: &'static str = "ListResource";
    const FIELDS: &'static [FieldSpec] = &[
        Self::ID.spec(),
        Self::NAME.spec(),
        Self::YEAR.spec(),
        Self::COLOR.spec(),
        Self::PANTONE_VALUE.spec(),
    ];
}

/// User 2, as served by `api/users/2`.
#[must_use]
pub fn janet_weaver() -> Fixture<SingleUser> {
    Fixture::builder()
        .set(SingleUser::ID, 2)
        .set(SingleUser::EMAIL, "janet.weaver@reqres.in")
        .set(SingleUser::FIRST_NAME, "Janet")
        .set(SingleUser::LAST_NAME, "Weaver")
        .set(SingleUser::AVATAR, "https://reqres.in/img/faces/2-image.jpg")
        .build()
}

/// Resource 2, as served by `api/unknown/2`.
#[must_use]
pub fn fuchsia_rose() -> Fixture<ListResource> {
    Fixture::builder()
        .set(ListResource::ID, 2)
        .set(ListResource::NAME, "fuchsia rose")
        .set(ListResource::YEAR, 2001)
        .set(ListResource::COLOR, "#C74375")
        .set(ListResource::PANTONE_VALUE, "17-2031")
        .build()
}

/// An equality expectation for every set field of `fixture`, addressed by
/// wire name under `prefix` (the root when `prefix` is empty).
///
/// # Errors
///
/// Returns a `SerializationError` if the fixture cannot be encoded.
pub fn field_expectations<S: FixtureSchema>(
    prefix: &str,
    fixture: &Fixture<S>,
) -> Result<Vec<Expectation>, SerializationError> {
    Ok(fixture
        .entries()?
        .into_iter()
        .map(|(wire, value)| Expectation::equals(field_path(prefix, wire), value.clone()))
        .collect())
}

fn field_path(prefix: &str, wire: &str) -> String {
    match (prefix.is_empty(), wire.contains('.')) {
        (true, false) => wire.to_string(),
        (true, true) => format!("$[{wire:?}]"),
        (false, false) => format!("{prefix}.{wire}"),
        (false, true) => format!("{prefix}[{wire:?}]"),
    }
}
