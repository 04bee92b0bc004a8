//! # Sanitizers
//!
//! A [`Sanitizer`] rewrites a value that already passed its option's type and
//! predicate checks. Sanitizers attached to one option form a pipeline: each
//! one receives the output of the previous one, in declaration order.
//!
//! Defaults are never sanitized.
//!
//! ## Examples
//! ```rust
//! use verified_args::{Sanitizer, Transform, Value};
//!
//! let pipeline = [
//!     Transform::Uppercase,
//!     Transform::Replace { from: "ME".to_string(), to: "THEY".to_string() },
//! ];
//!
//! let out = Transform::execute(Value::from("Jaimeson"), &pipeline).unwrap();
//! assert_eq!(out, Value::from("JAITHEYSON"));
//! ```
//!
//! Infallible closures are lifted with [`map`]:
//! ```rust
//! use verified_args::{sanitize, Sanitizer, Value};
//!
//! let double = sanitize::map(|value: Value| match value {
//!     Value::Integer(n) => Value::Integer(n * 2),
//!     other => other,
//! });
//! assert_eq!(double.sanitize(Value::from(20)).unwrap(), Value::from(40));
//! ```
use crate::error::ArgumentError;
use crate::value::Value;

/// Capability to transform an accepted value.
///
/// Returning an error aborts the whole resolution; see
/// [`ArgumentError::Sanitizer`].
pub trait Sanitizer: Send + Sync {
    fn sanitize(&self, value: Value) -> Result<Value, ArgumentError>;
}

impl<F> Sanitizer for F
where
    F: Fn(Value) -> Result<Value, ArgumentError> + Send + Sync,
{
    fn sanitize(&self, value: Value) -> Result<Value, ArgumentError> {
        self(value)
    }
}

/// Sanitizer built from an infallible closure, see [`map`].
#[derive(Debug, Clone, Copy)]
pub struct Map<F>(F);

/// Lifts an infallible `Fn(Value) -> Value` into a [`Sanitizer`].
pub fn map<F>(f: F) -> Map<F>
where
    F: Fn(Value) -> Value + Send + Sync,
{
    Map(f)
}

impl<F> Sanitizer for Map<F>
where
    F: Fn(Value) -> Value + Send + Sync,
{
    fn sanitize(&self, value: Value) -> Result<Value, ArgumentError> {
        Ok((self.0)(value))
    }
}

/// Represents a built-in sanitizer.
///
/// - `Trim`: strips leading and trailing whitespace from a string.
/// - `Uppercase` / `Lowercase`: changes the case of a string.
/// - `Replace`: replaces every occurrence of `from` with `to` in a string.
/// - `Multiply`: scales a number. Integers stay integers when the factor has
///   no fractional part and the product fits in an `i64`; otherwise the
///   result is a float.
///
/// Applying a string transform to a non-string (or `Multiply` to a
/// non-number) is a sanitizer failure.
#[derive(Debug, Clone, PartialEq)]
pub enum Transform {
    Trim,
    Uppercase,
    Lowercase,
    Replace { from: String, to: String },
    Multiply(f64),
}

impl Transform {
    /// Folds `value` through every transform, left to right.
    pub fn execute(value: Value, transforms: &[Transform]) -> Result<Value, ArgumentError> {
        transforms
            .iter()
            .try_fold(value, |value, transform| transform.sanitize(value))
    }

    fn apply_str(&self, s: &str) -> Option<String> {
        match self {
            Transform::Trim => Some(s.trim().to_string()),
            Transform::Uppercase => Some(s.to_uppercase()),
            Transform::Lowercase => Some(s.to_lowercase()),
            Transform::Replace { from, to } => Some(s.replace(from.as_str(), to)),
            Transform::Multiply(_) => None,
        }
    }
}

impl Sanitizer for Transform {
    fn sanitize(&self, value: Value) -> Result<Value, ArgumentError> {
        match (self, value) {
            (Transform::Multiply(factor), Value::Integer(n))
                if factor.fract() == 0.0 && factor.abs() < i64::MAX as f64 =>
            {
                // Overflowing products widen to a float instead of wrapping.
                Ok(n.checked_mul(*factor as i64)
                    .map_or(Value::Float(n as f64 * factor), Value::Integer))
            }
            (Transform::Multiply(factor), Value::Integer(n)) => Ok(Value::Float(n as f64 * factor)),
            (Transform::Multiply(factor), Value::Float(n)) => Ok(Value::Float(n * factor)),
            (transform, Value::String(s)) => transform.apply_str(&s).map(Value::String).ok_or_else(
                || ArgumentError::sanitizer(format!("{:?} expects a number, found string", transform)),
            ),
            (transform, other) => Err(ArgumentError::sanitizer(format!(
                "{:?} cannot be applied to a value of type {}",
                transform,
                other.type_name()
            ))),
        }
    }
}
