//! Typed request fixtures.
//!
//! A fixture is an immutable record whose fields are all optional. Each
//! fixture type declares a schema: the table of its fields and the wire name
//! each one is serialized under. Unset fields are left out of the payload
//! entirely, never sent as `null`.
//!
//! ```
//! use reqcheck_domain::fixture::{Field, FieldSpec, Fixture, FixtureSchema};
//!
//! struct Color;
//!
//! impl Color {
//!     const NAME: Field<Self, String> = Field::named("name");
//!     const PANTONE_VALUE: Field<Self, String> = Field::new("pantoneValue", "pantone_value");
//! }
//!
//! impl FixtureSchema for Color {
//!     const TYPE_NAME: &'static str = "Color";
//!     const FIELDS: &'static [FieldSpec] = &[Self::NAME.spec(), Self::PANTONE_VALUE.spec()];
//! }
//!
//! let color = Fixture::<Color>::builder()
//!     .set(Color::PANTONE_VALUE, "17-2031")
//!     .build();
//! assert_eq!(color.to_json_string().unwrap(), r#"{"pantone_value":"17-2031"}"#);
//! ```

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::marker::PhantomData;

use serde::ser::{Error as _, SerializeMap};
use serde::{Serialize, Serializer};
use serde_json::Value;
use thiserror::Error;

/// Errors raised while encoding a fixture.
#[derive(Debug, Error)]
pub enum SerializationError {
    /// A value was set through a field missing from the schema table.
    #[error("field '{field}' is not declared in the wire mapping of {fixture}")]
    UndeclaredField {
        /// Fixture type name.
        fixture: &'static str,
        /// Internal field name.
        field: &'static str,
    },

    /// The schema table itself is malformed.
    #[error("invalid schema for {fixture}: {reason}")]
    InvalidSchema {
        /// Fixture type name.
        fixture: &'static str,
        /// What is wrong with the table.
        reason: String,
    },

    /// JSON encoding failed.
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// One row of a fixture's wire mapping table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldSpec {
    /// Internal field name.
    pub name: &'static str,
    /// Name used on the wire.
    pub wire: &'static str,
}

impl FieldSpec {
    /// Maps `name` to a distinct wire name.
    #[must_use]
    pub const fn new(name: &'static str, wire: &'static str) -> Self {
        Self { name, wire }
    }

    /// Uses `name` unchanged on the wire.
    #[must_use]
    pub const fn same(name: &'static str) -> Self {
        Self { name, wire: name }
    }
}

/// Declares the fields of a fixture type and their wire names.
pub trait FixtureSchema: 'static {
    /// Human-readable type name used in diagnostics.
    const TYPE_NAME: &'static str;

    /// The wire mapping table, in serialization order.
    const FIELDS: &'static [FieldSpec];

    /// Looks up the wire name of an internal field name.
    #[must_use]
    fn wire_name(name: &str) -> Option<&'static str> {
        Self::FIELDS
            .iter()
            .find(|spec| spec.name == name)
            .map(|spec| spec.wire)
    }
}

/// Checks that a schema table has no empty or duplicate names.
///
/// # Errors
///
/// Returns `SerializationError::InvalidSchema` naming the first problem.
pub fn validate_schema<S: FixtureSchema>() -> Result<(), SerializationError> {
    let invalid = |reason: String| SerializationError::InvalidSchema {
        fixture: S::TYPE_NAME,
        reason,
    };

    let mut names = HashSet::new();
    let mut wires = HashSet::new();
    for spec in S::FIELDS {
        if spec.name.is_empty() || spec.wire.is_empty() {
            return Err(invalid(format!("empty name in {spec:?}")));
        }
        if !names.insert(spec.name) {
            return Err(invalid(format!("field '{}' declared twice", spec.name)));
        }
        if !wires.insert(spec.wire) {
            return Err(invalid(format!("wire name '{}' used twice", spec.wire)));
        }
    }
    Ok(())
}

/// A typed key for one field of fixture `S`, holding values of type `T`.
pub struct Field<S, T> {
    spec: FieldSpec,
    _marker: PhantomData<fn() -> (S, T)>,
}

impl<S, T> Field<S, T> {
    /// A field whose wire name differs from its internal name.
    #[must_use]
    pub const fn new(name: &'static str, wire: &'static str) -> Self {
        Self {
            spec: FieldSpec::new(name, wire),
            _marker: PhantomData,
        }
    }

    /// A field sent under its own name.
    #[must_use]
    pub const fn named(name: &'static str) -> Self {
        Self {
            spec: FieldSpec::same(name),
            _marker: PhantomData,
        }
    }

    /// The mapping row for this field, for use in `FixtureSchema::FIELDS`.
    #[must_use]
    pub const fn spec(&self) -> FieldSpec {
        self.spec
    }

    /// Internal field name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.spec.name
    }

    /// Wire field name.
    #[must_use]
    pub const fn wire(&self) -> &'static str {
        self.spec.wire
    }
}

impl<S, T> Clone for Field<S, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S, T> Copy for Field<S, T> {}

impl<S, T> fmt::Debug for Field<S, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Field").field(&self.spec).finish()
    }
}

/// An immutable fixture value.
pub struct Fixture<S> {
    values: BTreeMap<&'static str, Value>,
    _schema: PhantomData<fn() -> S>,
}

impl<S: FixtureSchema> Fixture<S> {
    /// Starts building a fixture with every field unset.
    #[must_use]
    pub fn builder() -> FixtureBuilder<S> {
        FixtureBuilder {
            values: BTreeMap::new(),
            _schema: PhantomData,
        }
    }

    /// The value of `field`, or `None` if it was never set.
    #[must_use]
    pub fn get<T>(&self, field: Field<S, T>) -> Option<&Value> {
        self.values.get(field.name())
    }

    /// Returns true if `field` was set.
    #[must_use]
    pub fn is_set<T>(&self, field: Field<S, T>) -> bool {
        self.values.contains_key(field.name())
    }

    /// Number of fields that were set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if no field was set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn undeclared_field(&self) -> Option<&'static str> {
        self.values
            .keys()
            .copied()
            .find(|name| S::wire_name(name).is_none())
    }

    fn check_declared(&self) -> Result<(), SerializationError> {
        match self.undeclared_field() {
            Some(field) => Err(SerializationError::UndeclaredField {
                fixture: S::TYPE_NAME,
                field,
            }),
            None => Ok(()),
        }
    }

    /// Set fields as `(wire name, value)` pairs, in table order.
    ///
    /// # Errors
    ///
    /// Returns an error if a value was set through an undeclared field.
    pub fn entries(&self) -> Result<Vec<(&'static str, &Value)>, SerializationError> {
        self.check_declared()?;
        Ok(S::FIELDS
            .iter()
            .filter_map(|spec| self.values.get(spec.name).map(|value| (spec.wire, value)))
            .collect())
    }

    /// The wire payload as a JSON value.
    ///
    /// # Errors
    ///
    /// Returns an error if a value was set through an undeclared field.
    pub fn to_json(&self) -> Result<Value, SerializationError> {
        let object = self
            .entries()?
            .into_iter()
            .map(|(wire, value)| (wire.to_string(), value.clone()))
            .collect();
        Ok(Value::Object(object))
    }

    /// The wire payload as compact JSON text, keys in table order.
    ///
    /// # Errors
    ///
    /// Returns an error if a value was set through an undeclared field.
    pub fn to_json_string(&self) -> Result<String, SerializationError> {
        self.check_declared()?;
        Ok(serde_json::to_string(self)?)
    }
}

impl<S: FixtureSchema> Serialize for Fixture<S> {
    fn serialize<Ser: Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
        let entries = self.entries().map_err(Ser::Error::custom)?;

        let mut map = serializer.serialize_map(Some(entries.len()))?;
        for (wire, value) in entries {
            map.serialize_entry(wire, value)?;
        }
        map.end()
    }
}

impl<S> Clone for Fixture<S> {
    fn clone(&self) -> Self {
        Self {
            values: self.values.clone(),
            _schema: PhantomData,
        }
    }
}

impl<S> PartialEq for Fixture<S> {
    fn eq(&self, other: &Self) -> bool {
        self.values == other.values
    }
}

impl<S> Eq for Fixture<S> {}

impl<S: FixtureSchema> fmt::Debug for Fixture<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fixture")
            .field("schema", &S::TYPE_NAME)
            .field("values", &self.values)
            .finish()
    }
}

/// Builder for [`Fixture`]. Consumed by [`FixtureBuilder::build`].
#[must_use]
pub struct FixtureBuilder<S> {
    values: BTreeMap<&'static str, Value>,
    _schema: PhantomData<fn() -> S>,
}

impl<S: FixtureSchema> FixtureBuilder<S> {
    /// Sets a field. Setting the same field again replaces the value.
    pub fn set<T: Into<Value>>(mut self, field: Field<S, T>, value: impl Into<T>) -> Self {
        self.values.insert(field.name(), value.into().into());
        self
    }

    /// Sets a field only when `value` is `Some`.
    pub fn set_opt<T: Into<Value>>(self, field: Field<S, T>, value: Option<impl Into<T>>) -> Self {
        match value {
            Some(value) => self.set(field, value),
            None => self,
        }
    }

    /// Finishes the fixture.
    pub fn build(self) -> Fixture<S> {
        Fixture {
            values: self.values,
            _schema: PhantomData,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    struct Login;

    impl Login {
        const EMAIL: Field<Self, String> = Field::named("email");
        const PASSWORD: Field<Self, String> = Field::named("password");
        const ATTEMPTS: Field<Self, i64> = Field::new("attemptCount", "attempt_count");
        const UNLISTED: Field<Self, String> = Field::named("unlisted");
    }

    impl FixtureSchema for Login {
        const TYPE_NAME: &'static str = "Login";
        const FIELDS: &'static [FieldSpec] = &[
            Self::EMAIL.spec(),
            Self::PASSWORD.spec(),
            Self::ATTEMPTS.spec(),
        ];
    }

    struct Broken;

    impl FixtureSchema for Broken {
        const TYPE_NAME: &'static str = "Broken";
        const FIELDS: &'static [FieldSpec] = &[FieldSpec::same("a"), FieldSpec::new("b", "a")];
    }

    #[test]
    fn test_unset_fields_are_omitted() {
        let login = Fixture::<Login>::builder()
            .set(Login::EMAIL, "peter@klaven")
            .build();

        let payload = login.to_json().unwrap();
        assert_eq!(payload, json!({"email": "peter@klaven"}));
        assert!(payload.get("password").is_none());
        assert!(!login.is_set(Login::PASSWORD));
    }

    #[test]
    fn test_wire_names_follow_mapping() {
        let login = Fixture::<Login>::builder().set(Login::ATTEMPTS, 3).build();
        assert_eq!(login.to_json_string().unwrap(), r#"{"attempt_count":3}"#);
    }

    #[test]
    fn test_serialization_uses_table_order() {
        let login = Fixture::<Login>::builder()
            .set(Login::ATTEMPTS, 1)
            .set(Login::PASSWORD, "pistol")
            .set(Login::EMAIL, "eve.holt@reqres.in")
            .build();

        assert_eq!(
            login.to_json_string().unwrap(),
            r#"{"email":"eve.holt@reqres.in","password":"pistol","attempt_count":1}"#
        );
    }

    #[test]
    fn test_last_write_wins() {
        let login = Fixture::<Login>::builder()
            .set(Login::EMAIL, "first@example.com")
            .set(Login::EMAIL, "second@example.com")
            .build();
        assert_eq!(login.get(Login::EMAIL), Some(&json!("second@example.com")));
        assert_eq!(login.len(), 1);
    }

    #[test]
    fn test_set_opt() {
        let login = Fixture::<Login>::builder()
            .set_opt(Login::EMAIL, Some("eve.holt@reqres.in"))
            .set_opt(Login::PASSWORD, None::<String>)
            .build();
        assert!(login.is_set(Login::EMAIL));
        assert!(!login.is_set(Login::PASSWORD));
    }

    #[test]
    fn test_value_equality() {
        let a = Fixture::<Login>::builder()
            .set(Login::EMAIL, "eve.holt@reqres.in")
            .set(Login::PASSWORD, "pistol")
            .build();
        let b = Fixture::<Login>::builder()
            .set(Login::PASSWORD, "pistol")
            .set(Login::EMAIL, "eve.holt@reqres.in")
            .build();
        assert_eq!(a, b);
        assert_ne!(a, Fixture::<Login>::builder().build());
    }

    #[test]
    fn test_empty_fixture_serializes_to_empty_object() {
        let login = Fixture::<Login>::builder().build();
        assert!(login.is_empty());
        assert_eq!(login.to_json_string().unwrap(), "{}");
    }

    #[test]
    fn test_undeclared_field_is_rejected() {
        let login = Fixture::<Login>::builder()
            .set(Login::UNLISTED, "x")
            .build();

        assert!(matches!(
            login.to_json(),
            Err(SerializationError::UndeclaredField {
                fixture: "Login",
                field: "unlisted"
            })
        ));
        assert!(serde_json::to_vec(&login).is_err());
    }

    #[test]
    fn test_validate_schema() {
        assert!(validate_schema::<Login>().is_ok());
        let err = validate_schema::<Broken>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid schema for Broken: wire name 'a' used twice"
        );
    }

    #[test]
    fn test_wire_name_lookup() {
        assert_eq!(Login::wire_name("attemptCount"), Some("attempt_count"));
        assert_eq!(Login::wire_name("email"), Some("email"));
        assert_eq!(Login::wire_name("unknown"), None);
    }
}
