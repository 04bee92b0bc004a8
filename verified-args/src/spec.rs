//! # Option specs and schemas
//!
//! An [`OptionSpec`] bundles the rules for one option key: a default value,
//! accepted [`TypeTag`]s, predicate [`Test`]s and a [`Sanitizer`] pipeline.
//! A [`Schema`] maps option keys to their specs and keeps insertion order.
//!
//! ## Example
//! ```rust
//! use verified_args::{Check, OptionSpec, Schema, Transform, TypeTag};
//!
//! let schema = Schema::new()
//!     .option(
//!         "name",
//!         OptionSpec::new()
//!             .value("Anonymous")
//!             .of_type(TypeTag::String)
//!             .sanitizer(Transform::Uppercase),
//!     )
//!     .option("age", OptionSpec::new().of_type(TypeTag::Integer))
//!     .option("threads", OptionSpec::new().value(4).test(Check::IsBetween(1, 16)));
//!
//! assert_eq!(schema.len(), 3);
//! assert!(schema.get("age").is_some_and(|spec| spec.default_value().is_none()));
//! ```
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::checks::Test;
use crate::error::ArgumentError;
use crate::sanitize::{self, Sanitizer};
use crate::types::TypeTag;
use crate::value::Value;

/// Rules for a single option key.
///
/// Every part is optional. Without a type constraint any value type is
/// accepted, without tests every value passes, and without sanitizers the
/// accepted value is stored unchanged.
///
/// The default does not have to satisfy the type constraint or the tests.
#[derive(Clone, Default)]
pub struct OptionSpec {
    value: Option<Value>,
    types: Option<Vec<TypeTag>>,
    tests: Vec<Arc<dyn Test>>,
    sanitizers: Vec<Arc<dyn Sanitizer>>,
}

impl OptionSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the default value. `Value::Null` counts as a defined default.
    pub fn value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Adds an accepted type. Calling this repeatedly widens the accepted set.
    pub fn of_type(mut self, tag: TypeTag) -> Self {
        self.types.get_or_insert_with(Vec::new).push(tag);
        self
    }

    /// Adds several accepted types at once.
    ///
    /// Passing an empty list still installs a type constraint, one that no
    /// value can satisfy.
    pub fn of_types(mut self, tags: impl IntoIterator<Item = TypeTag>) -> Self {
        self.types.get_or_insert_with(Vec::new).extend(tags);
        self
    }

    /// Appends a predicate. Predicates run in the order they were added.
    pub fn test(mut self, test: impl Test + 'static) -> Self {
        self.tests.push(Arc::new(test));
        self
    }

    /// Appends a closure predicate.
    pub fn test_fn<F>(self, f: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.test(f)
    }

    /// Appends a sanitizer to the end of the pipeline.
    pub fn sanitizer(mut self, sanitizer: impl Sanitizer + 'static) -> Self {
        self.sanitizers.push(Arc::new(sanitizer));
        self
    }

    /// Appends an infallible closure sanitizer.
    pub fn sanitizer_fn<F>(self, f: F) -> Self
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        self.sanitizer(sanitize::map(f))
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    /// Accepted types, `None` when the option has no type constraint.
    pub fn types(&self) -> Option<&[TypeTag]> {
        self.types.as_deref()
    }

    pub fn matches_type(&self, value: &Value) -> bool {
        self.types
            .as_deref()
            .is_none_or(|tags| TypeTag::any_matches(tags, value))
    }

    /// Index of the first predicate rejecting `value`, if any.
    pub fn failing_test(&self, value: &Value) -> Option<usize> {
        self.tests.iter().position(|test| !test.test(value))
    }

    /// Type check followed by every predicate, in order.
    pub fn accepts(&self, value: &Value) -> bool {
        self.matches_type(value) && self.failing_test(value).is_none()
    }

    /// Runs the sanitizer pipeline over an accepted value.
    pub fn sanitize(&self, value: Value) -> Result<Value, ArgumentError> {
        self.sanitizers
            .iter()
            .try_fold(value, |value, sanitizer| sanitizer.sanitize(value))
    }
}

impl fmt::Debug for OptionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionSpec")
            .field("value", &self.value)
            .field("types", &self.types)
            .field("tests", &self.tests.len())
            .field("sanitizers", &self.sanitizers.len())
            .finish()
    }
}

/// Option keys mapped to their [`OptionSpec`], in insertion order.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    options: IndexMap<String, OptionSpec>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Schema::insert`].
    pub fn option(mut self, key: impl Into<String>, spec: OptionSpec) -> Self {
        self.insert(key, spec);
        self
    }

    /// Adds or replaces the spec for `key`. A replaced key keeps its position.
    pub fn insert(&mut self, key: impl Into<String>, spec: OptionSpec) -> Option<OptionSpec> {
        self.options.insert(key.into(), spec)
    }

    pub fn get(&self, key: &str) -> Option<&OptionSpec> {
        self.options.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.options.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionSpec)> {
        self.options.iter().map(|(key, spec)| (key.as_str(), spec))
    }
}

impl<K: Into<String>> FromIterator<(K, OptionSpec)> for Schema {
    fn from_iter<I: IntoIterator<Item = (K, OptionSpec)>>(iter: I) -> Self {
        Self {
            options: iter.into_iter().map(|(k, spec)| (k.into(), spec)).collect(),
        }
    }
}
