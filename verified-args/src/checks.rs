//! # Predicate tests
//!
//! A [`Test`] decides whether a supplied value is acceptable for an option.
//! Any `Fn(&Value) -> bool` closure is a test, and [`Check`] provides the
//! common ones as plain data.
//!
//! Tests attached to one option run in declaration order against the raw
//! supplied value and stop at the first one that fails.
//!
//! ## Examples
//!
//! ### Built-in checks
//! ```rust
//! use verified_args::{Check, Test, TypeTag, Value};
//!
//! let short_string = [Check::IsType(TypeTag::String), Check::MaxLength(7)];
//!
//! assert!(Check::execute(&Value::from("Jaime"), &short_string).is_ok());
//! assert!(Check::execute(&Value::from("Jaimeson"), &short_string).is_err());
//! assert!(Check::IsBetween(1, 16).test(&Value::from(8)));
//! ```
//!
//! ### Closures
//! ```rust
//! use verified_args::{Test, Value};
//!
//! let over_100 = |value: &Value| value.as_i64().is_some_and(|n| n > 100);
//! assert!(over_100.test(&Value::from(200)));
//! assert!(!over_100.test(&Value::from(20)));
//! ```
use thiserror::Error;

use crate::types::TypeTag;
use crate::value::Value;

/// Capability to accept or reject a candidate value.
pub trait Test: Send + Sync {
    fn test(&self, value: &Value) -> bool;
}

impl<F> Test for F
where
    F: Fn(&Value) -> bool + Send + Sync,
{
    fn test(&self, value: &Value) -> bool {
        self(value)
    }
}

/// Represents a built-in validation filter.
///
/// - `IsType`: the value has the given [`TypeTag`].
/// - `MatchString`: the value is exactly the given string.
/// - `MatchStrings`: the value is one of the given strings.
/// - `IsBetween`: the value is an integer within `[min, max]`.
/// - `MinLength` / `MaxLength`: character count of a string, or element
///   count of an array, is at least / at most the bound.
/// - `GreaterThan` / `LessThan`: the value is a number strictly above /
///   below the bound.
///
/// A check that does not apply to the value's category rejects it.
#[derive(Debug, Clone, PartialEq)]
pub enum Check {
    IsType(TypeTag),
    MatchString(String),
    MatchStrings(Vec<String>),
    IsBetween(i64, i64),
    MinLength(usize),
    MaxLength(usize),
    GreaterThan(f64),
    LessThan(f64),
}

/// Why a [`Check`] rejected a value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CheckFailure {
    #[error("expected a value of type {expected}, found {found}")]
    Type { expected: TypeTag, found: &'static str },
    #[error("the value doesn't match with {0}")]
    MatchString(String),
    #[error("the value doesn't match with the options: {}", .0.join(", "))]
    MatchStrings(Vec<String>),
    #[error("the value is not between {0} and {1}")]
    Between(i64, i64),
    #[error("the value is shorter than {0}")]
    MinLength(usize),
    #[error("the value is longer than {0}")]
    MaxLength(usize),
    #[error("the value is not greater than {0}")]
    GreaterThan(f64),
    #[error("the value is not less than {0}")]
    LessThan(f64),
}

impl Check {
    /// Runs every check against `value`, stopping at the first failure.
    pub fn execute(value: &Value, checks: &[Check]) -> Result<(), CheckFailure> {
        for check in checks {
            check.validate(value)?;
        }
        Ok(())
    }

    /// Runs this check, describing the failure if the value is rejected.
    pub fn validate(&self, value: &Value) -> Result<(), CheckFailure> {
        let ok = match self {
            Check::IsType(tag) => tag.matches(value),
            Check::MatchString(s) => value.as_str() == Some(s.as_str()),
            Check::MatchStrings(options) => value
                .as_str()
                .is_some_and(|input| options.iter().any(|o| o == input)),
            Check::IsBetween(n1, n2) => value.as_i64().is_some_and(|n| n >= *n1 && n <= *n2),
            Check::MinLength(min) => length_of(value).is_some_and(|len| len >= *min),
            Check::MaxLength(max) => length_of(value).is_some_and(|len| len <= *max),
            Check::GreaterThan(bound) => value.as_f64().is_some_and(|n| n > *bound),
            Check::LessThan(bound) => value.as_f64().is_some_and(|n| n < *bound),
        };

        if ok { Ok(()) } else { Err(self.failure(value)) }
    }

    fn failure(&self, value: &Value) -> CheckFailure {
        match self {
            Check::IsType(tag) => CheckFailure::Type {
                expected: *tag,
                found: value.type_name(),
            },
            Check::MatchString(s) => CheckFailure::MatchString(s.clone()),
            Check::MatchStrings(v) => CheckFailure::MatchStrings(v.clone()),
            Check::IsBetween(n1, n2) => CheckFailure::Between(*n1, *n2),
            Check::MinLength(n) => CheckFailure::MinLength(*n),
            Check::MaxLength(n) => CheckFailure::MaxLength(*n),
            Check::GreaterThan(n) => CheckFailure::GreaterThan(*n),
            Check::LessThan(n) => CheckFailure::LessThan(*n),
        }
    }
}

fn length_of(value: &Value) -> Option<usize> {
    match value {
        Value::String(s) => Some(s.chars().count()),
        Value::Array(items) => Some(items.len()),
        _ => None,
    }
}

impl Test for Check {
    fn test(&self, value: &Value) -> bool {
        match self.validate(value) {
            Ok(()) => true,
            Err(e) => {
                log::debug!("check rejected value: {}", e);
                false
            }
        }
    }
}
