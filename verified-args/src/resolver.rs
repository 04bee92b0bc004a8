//! # Argument resolution
//!
//! [`VerifiedArguments`] merges caller-supplied values with a [`Schema`]:
//!
//! 1. Every option with a default starts out with that default, as is.
//! 2. Each supplied key is then processed in input order:
//!    - keys unknown to the schema are copied verbatim, or dropped under
//!      [`UnknownKeys::Reject`];
//!    - known keys must match one of the option's types and pass all of its
//!      tests. An accepted value goes through the sanitizer pipeline and
//!      replaces the default. A rejected value is discarded, leaving the
//!      default (or nothing) in place.
//!
//! The result never changes after construction.
//!
//! ## Example
//! ```rust
//! use verified_args::{OptionSpec, Schema, Transform, TypeTag, Value, VerifiedArguments};
//!
//! struct Birthday;
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
//!     .option("birthday", OptionSpec::new().of_type(TypeTag::class::<Birthday>()));
//!
//! let args = VerifiedArguments::new(
//!     [
//!         ("name", Value::from("Jaimeson")),
//!         ("age", Value::from("old")),
//!         ("city", Value::from("SeaTac")),
//!     ],
//!     &schema,
//! )
//! .unwrap();
//!
//! assert_eq!(args.get_str("name"), Some("JAIMESON"));
//! assert_eq!(args.get("age"), None);
//! assert_eq!(args.get_str("city"), Some("SeaTac"));
//! ```
use indexmap::IndexMap;

use crate::error::ArgumentError;
use crate::spec::Schema;
use crate::value::Value;

/// What to do with supplied keys the schema doesn't know about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownKeys {
    /// Copy them into the result unchanged.
    #[default]
    Allow,
    /// Leave them out of the result.
    Reject,
}

impl From<bool> for UnknownKeys {
    fn from(allow: bool) -> Self {
        if allow { Self::Allow } else { Self::Reject }
    }
}

/// Immutable map of resolved option values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VerifiedArguments {
    args: IndexMap<String, Value>,
}

impl VerifiedArguments {
    /// Resolves `raw` against `schema`, keeping unknown keys.
    pub fn new<I, K, V>(raw: I, schema: &Schema) -> Result<Self, ArgumentError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Self::with_policy(raw, schema, UnknownKeys::Allow)
    }

    /// Same as [`VerifiedArguments::with_policy`] with the policy given as
    /// "allow unknown keys".
    pub fn resolve<I, K, V>(
        raw: I,
        schema: &Schema,
        allow_unknown_keys: bool,
    ) -> Result<Self, ArgumentError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Self::with_policy(raw, schema, UnknownKeys::from(allow_unknown_keys))
    }

    /// Resolves `raw` against `schema`.
    ///
    /// Fails only if a sanitizer fails; the error carries the option key.
    pub fn with_policy<I, K, V>(
        raw: I,
        schema: &Schema,
        unknown_keys: UnknownKeys,
    ) -> Result<Self, ArgumentError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let mut args: IndexMap<String, Value> = schema
            .iter()
            .filter_map(|(key, spec)| {
                spec.default_value()
                    .map(|value| (key.to_string(), value.clone()))
            })
            .collect();

        for (key, value) in raw {
            let key: String = key.into();
            let value: Value = value.into();

            let Some(spec) = schema.get(&key) else {
                match unknown_keys {
                    UnknownKeys::Allow => {
                        log::trace!("passing through unknown option `{}`", key);
                        args.insert(key, value);
                    }
                    UnknownKeys::Reject => {
                        log::debug!("dropping unknown option `{}`", key);
                    }
                }
                continue;
            };

            if !spec.matches_type(&value) {
                log::debug!(
                    "option `{}`: {} is not one of [{}], keeping default",
                    key,
                    value.type_name(),
                    spec.types()
                        .unwrap_or_default()
                        .iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join(", ")
                );
                continue;
            }

            if let Some(index) = spec.failing_test(&value) {
                log::debug!(
                    "option `{}`: rejected by test #{}, keeping default",
                    key,
                    index
                );
                continue;
            }

            let sanitized = spec.sanitize(value).map_err(|e| e.with_key(&key))?;
            log::trace!("option `{}` accepted", key);
            args.insert(key, sanitized);
        }

        log::debug!("resolved {} option(s)", args.len());
        Ok(Self { args })
    }

    /// The resolved value for `key`, or `None` when the key is absent.
    ///
    /// A present `Value::Null` is returned as `Some(&Value::Null)`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.args.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(Value::as_i64)
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(Value::as_f64)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    /// Typed access to an object value.
    pub fn get_as<T: std::any::Any>(&self, key: &str) -> Option<&T> {
        self.get(key).and_then(Value::downcast_ref::<T>)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.args.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// Read-only view of every resolved entry.
    ///
    /// Defaults come first in schema order, followed by keys first seen in
    /// the supplied input, in input order.
    pub fn entries(&self) -> &IndexMap<String, Value> {
        &self.args
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Value> {
        self.args.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.args.keys().map(String::as_str)
    }

    /// Owned copy of the entries, for merging into other structures.
    pub fn to_map(&self) -> IndexMap<String, Value> {
        self.args.clone()
    }

    pub fn into_map(self) -> IndexMap<String, Value> {
        self.args
    }
}

impl<'a> IntoIterator for &'a VerifiedArguments {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.args.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::{Check, Test};
    use crate::sanitize::Transform;
    use crate::spec::OptionSpec;
    use crate::types::TypeTag;
    use crate::value::{Callable, Object};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, PartialEq)]
    struct DateTime(&'static str);

    #[allow(dead_code)]
    struct ImmutableDateTime(DateTime);

    fn person_defaults() -> Schema {
        Schema::new()
            .option("name", OptionSpec::new().value("Anonymous"))
            .option("age", OptionSpec::new().value(0))
    }

    fn no_raw() -> Vec<(String, Value)> {
        Vec::new()
    }

    fn is_string(value: &Value) -> bool {
        value.as_str().is_some()
    }

    #[test]
    fn test_custom_and_default() {
        let args = VerifiedArguments::new([("age", 27)], &person_defaults()).unwrap();
        assert_eq!(args.get_str("name"), Some("Anonymous"));
        assert_eq!(args.get_i64("age"), Some(27));
    }

    #[test]
    fn test_default_only() {
        let args = VerifiedArguments::new(no_raw(), &person_defaults()).unwrap();
        assert_eq!(args.get_i64("age"), Some(0));
    }

    #[test]
    fn test_missing_argument() {
        let args = VerifiedArguments::new(
            [("name", Value::from("Jaimeson")), ("age", Value::from(27))],
            &Schema::new(),
        )
        .unwrap();
        assert_eq!(args.get("expertise"), None);
    }

    #[test]
    fn test_missing_default() {
        let schema = Schema::new().option("age", OptionSpec::new().value(0));
        let raw = [("name", Value::from("Jaimeson")), ("age", Value::from(27))];

        let args = VerifiedArguments::resolve(raw.clone(), &schema, true).unwrap();
        assert_eq!(args.get_str("name"), Some("Jaimeson"));

        let args2 = VerifiedArguments::resolve(raw, &schema, false).unwrap();
        assert_eq!(args2.get("name"), None);
        assert_eq!(args2.get_i64("age"), Some(27));
    }

    #[test]
    fn test_argument_types() {
        let raw = || [("name", Value::from("Jaimeson")), ("age", Value::from(27))];

        let schema = Schema::new().option("name", OptionSpec::new().of_type(TypeTag::Integer));
        let args = VerifiedArguments::new(raw(), &schema).unwrap();
        assert_eq!(args.get("name"), None);

        let schema2 = Schema::new().option("name", OptionSpec::new().of_type(TypeTag::String));
        let args2 = VerifiedArguments::new(raw(), &schema2).unwrap();
        assert_eq!(args2.get_str("name"), Some("Jaimeson"));

        let schema3 = Schema::new().option(
            "name",
            OptionSpec::new().of_types([TypeTag::Integer, TypeTag::Callable, TypeTag::Object]),
        );
        let args3 = VerifiedArguments::new(raw(), &schema3).unwrap();
        assert_eq!(args3.get("name"), None);

        let schema4 = Schema::new().option(
            "name",
            OptionSpec::new().of_types([
                TypeTag::Integer,
                TypeTag::Callable,
                TypeTag::Object,
                TypeTag::String,
            ]),
        );
        let args4 = VerifiedArguments::new(raw(), &schema4).unwrap();
        assert_eq!(args4.get_str("name"), Some("Jaimeson"));
    }

    #[test]
    fn test_class_and_object_tags() {
        let date = Value::from(Object::new(DateTime("10/23/2018")));

        let schema = Schema::new().option("date", OptionSpec::new().of_type(TypeTag::class::<DateTime>()));
        let args = VerifiedArguments::new([("date", date.clone())], &schema).unwrap();
        assert_eq!(args.get("date"), Some(&date));
        assert_eq!(args.get_as::<DateTime>("date"), Some(&DateTime("10/23/2018")));

        let schema2 = Schema::new().option("date", OptionSpec::new().of_type(TypeTag::Object));
        let args2 = VerifiedArguments::new([("date", date.clone())], &schema2).unwrap();
        assert_eq!(args2.get("date"), Some(&date));
    }

    #[test]
    fn test_class_tag_rejects_wrapping_type() {
        let schema = Schema::new().option(
            "date",
            OptionSpec::new()
                .value("none")
                .of_type(TypeTag::class::<DateTime>()),
        );
        let wrapped = Object::new(ImmutableDateTime(DateTime("10/23/2018")));
        let args = VerifiedArguments::new([("date", wrapped)], &schema).unwrap();
        assert_eq!(args.get_str("date"), Some("none"));
    }

    #[test]
    fn test_callable_tag() {
        let schema = Schema::new().option("callback", OptionSpec::new().of_type(TypeTag::Callable));
        let callback = Callable::new(|_| Value::from(1));
        let args = VerifiedArguments::new([("callback", callback)], &schema).unwrap();
        let stored = args.get("callback").and_then(Value::as_callable).unwrap();
        assert_eq!(stored.call(&[]), Value::from(1));
    }

    #[test]
    fn test_wrong_argument_type_default_value() {
        let schema = Schema::new().option(
            "name",
            OptionSpec::new()
                .of_types([TypeTag::Integer, TypeTag::Callable])
                .value("nada"),
        );
        let args = VerifiedArguments::new(
            [("name", Value::from("Jaimeson")), ("age", Value::from(27))],
            &schema,
        )
        .unwrap();
        assert_eq!(args.get_str("name"), Some("nada"));
    }

    #[test]
    fn test_custom_tests() {
        let schema = Schema::new().option(
            "name",
            OptionSpec::new().value("Anonymous").test(is_string),
        );
        let args = VerifiedArguments::new([("name", 2)], &schema).unwrap();
        assert_eq!(args.get_str("name"), Some("Anonymous"));
        let args2 = VerifiedArguments::new([("name", "Jaimeson")], &schema).unwrap();
        assert_eq!(args2.get_str("name"), Some("Jaimeson"));

        let schema2 = Schema::new().option(
            "number",
            OptionSpec::new().test_fn(|value| value.as_i64().is_some_and(|n| n > 100)),
        );
        let args3 = VerifiedArguments::new([("number", 20)], &schema2).unwrap();
        assert_eq!(args3.get("number"), None);
        let args4 = VerifiedArguments::new([("number", 200)], &schema2).unwrap();
        assert_eq!(args4.get_i64("number"), Some(200));

        let schema3 = Schema::new().option(
            "name",
            OptionSpec::new()
                .test(is_string)
                .test_fn(|value| value.as_str().is_some_and(|s| s.chars().count() < 8)),
        );
        let args5 = VerifiedArguments::new([("name", "Jaimeson")], &schema3).unwrap();
        assert_eq!(args5.get("name"), None);
        let args6 = VerifiedArguments::new([("name", "Jaime")], &schema3).unwrap();
        assert_eq!(args6.get_str("name"), Some("Jaime"));
    }

    #[test]
    fn test_tests_short_circuit() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let schema = Schema::new().option(
            "name",
            OptionSpec::new()
                .test(Check::IsType(TypeTag::String))
                .test_fn(move |_| {
                    counter.fetch_add(1, Ordering::SeqCst);
                    true
                }),
        );

        VerifiedArguments::new([("name", 5)], &schema).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        VerifiedArguments::new([("name", "x")], &schema).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_tests_skipped_after_type_mismatch() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let schema = Schema::new().option(
            "age",
            OptionSpec::new().of_type(TypeTag::Integer).test_fn(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                true
            }),
        );
        VerifiedArguments::new([("age", "old")], &schema).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_sanitizer() {
        let schema = Schema::new().option(
            "name",
            OptionSpec::new()
                .value("Anonymous")
                .sanitizer(Transform::Uppercase),
        );
        let args = VerifiedArguments::new([("name", "Jaimeson")], &schema).unwrap();
        assert_eq!(args.get_str("name"), Some("JAIMESON"));
        let args2 = VerifiedArguments::new(no_raw(), &schema).unwrap();
        assert_eq!(args2.get_str("name"), Some("Anonymous"));

        let schema2 = Schema::new().option(
            "number",
            OptionSpec::new().value(10).sanitizer_fn(|value| match value {
                Value::Integer(n) => Value::Integer(n * 2),
                other => other,
            }),
        );
        let args3 = VerifiedArguments::new([("number", 20)], &schema2).unwrap();
        assert_eq!(args3.get_i64("number"), Some(40));
        let args4 = VerifiedArguments::new(no_raw(), &schema2).unwrap();
        assert_eq!(args4.get_i64("number"), Some(10));

        let schema3 = Schema::new().option(
            "name",
            OptionSpec::new()
                .sanitizer(Transform::Uppercase)
                .sanitizer(Transform::Replace {
                    from: "ME".to_string(),
                    to: "THEY".to_string(),
                }),
        );
        let args5 = VerifiedArguments::new([("name", "Jaimeson")], &schema3).unwrap();
        assert_eq!(args5.get_str("name"), Some("JAITHEYSON"));
    }

    #[test]
    fn test_rejected_value_is_not_sanitized() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let schema = Schema::new().option(
            "name",
            OptionSpec::new()
                .value("Anonymous")
                .of_type(TypeTag::String)
                .sanitizer_fn(move |value| {
                    counter.fetch_add(1, Ordering::SeqCst);
                    value
                }),
        );
        let args = VerifiedArguments::new([("name", 2)], &schema).unwrap();
        assert_eq!(args.get_str("name"), Some("Anonymous"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_sanitizer_error_propagates() {
        let schema = Schema::new().option("name", OptionSpec::new().sanitizer(Transform::Uppercase));
        let err = VerifiedArguments::new([("name", 5)], &schema).unwrap_err();
        assert!(matches!(err, ArgumentError::Sanitizer { ref key, .. } if key == "name"));
    }

    #[test]
    fn test_get_list() {
        let args = VerifiedArguments::new(no_raw(), &Schema::new()).unwrap();
        assert!(args.entries().is_empty());

        let raw = [("name", Value::from("Jaimeson")), ("age", Value::from(27))];
        let args2 = VerifiedArguments::resolve(raw.clone(), &Schema::new(), false).unwrap();
        assert!(args2.entries().is_empty());

        let args3 = VerifiedArguments::new(raw.clone(), &Schema::new()).unwrap();
        let expected: IndexMap<String, Value> =
            raw.into_iter().map(|(k, v)| (k.to_string(), v)).collect();
        assert_eq!(args3.entries(), &expected);
        assert_eq!(args3.to_map(), expected);
        assert_eq!(args3.keys().collect::<Vec<_>>(), vec!["name", "age"]);
    }

    #[test]
    fn test_entries_order() {
        let schema = Schema::new()
            .option("b", OptionSpec::new().value(1))
            .option("a", OptionSpec::new().value(2));
        let args = VerifiedArguments::new(
            [("z", Value::from(0)), ("a", Value::from(3))],
            &schema,
        )
        .unwrap();
        let keys: Vec<&String> = (&args).into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["b", "a", "z"]);
        assert_eq!(args.get_i64("a"), Some(3));
    }

    #[test]
    fn test_present_falsy_is_not_absent() {
        let schema = Schema::new()
            .option("flag", OptionSpec::new().value(false))
            .option("nothing", OptionSpec::new().value(Value::Null))
            .option("empty", OptionSpec::new().value(""));
        let args = VerifiedArguments::new(no_raw(), &schema).unwrap();

        assert_eq!(args.get("flag"), Some(&Value::Bool(false)));
        assert_eq!(args.get("nothing"), Some(&Value::Null));
        assert_eq!(args.get_str("empty"), Some(""));
        assert!(args.contains_key("nothing"));
        assert_eq!(args.get("missing"), None);
        assert_eq!(args.len(), 3);
    }

    #[test]
    fn test_reject_policy_keeps_defaults() {
        let schema = Schema::new().option("age", OptionSpec::new().value(0));
        let args = VerifiedArguments::with_policy(
            [("city", "SeaTac")],
            &schema,
            UnknownKeys::Reject,
        )
        .unwrap();
        assert_eq!(args.get_i64("age"), Some(0));
        assert_eq!(args.get("city"), None);
        assert_eq!(args.len(), 1);
    }

    #[test]
    fn test_failing_duplicate_keeps_earlier_value() {
        let schema = Schema::new().option("age", OptionSpec::new().value(0).of_type(TypeTag::Integer));
        let args = VerifiedArguments::new(
            vec![("age", Value::from(27)), ("age", Value::from("old"))],
            &schema,
        )
        .unwrap();
        assert_eq!(args.get_i64("age"), Some(27));
    }

    #[test]
    fn test_custom_test_object() {
        struct Even;

        impl Test for Even {
            fn test(&self, value: &Value) -> bool {
                value.as_i64().is_some_and(|n| n % 2 == 0)
            }
        }

        let schema = Schema::new().option("n", OptionSpec::new().value(0).test(Even));
        assert_eq!(
            VerifiedArguments::new([("n", 3)], &schema).unwrap().get_i64("n"),
            Some(0)
        );
        assert_eq!(
            VerifiedArguments::new([("n", 4)], &schema).unwrap().get_i64("n"),
            Some(4)
        );
    }

    #[test]
    fn test_readme() {
        let schema = Schema::new()
            .option(
                "name",
                OptionSpec::new()
                    .value("Anonymous")
                    .of_type(TypeTag::String)
                    .sanitizer(Transform::Uppercase),
            )
            .option("age", OptionSpec::new().of_type(TypeTag::Integer))
            .option("birthday", OptionSpec::new().of_type(TypeTag::class::<DateTime>()));
        let args = VerifiedArguments::new(
            [
                ("name", Value::from("Jaimeson")),
                ("age", Value::from("old")),
                ("city", Value::from("SeaTac")),
            ],
            &schema,
        )
        .unwrap();

        assert_eq!(args.get_str("name"), Some("JAIMESON"));
        assert_eq!(args.get("age"), None);
        assert_eq!(args.get_str("city"), Some("SeaTac"));
    }

    #[test]
    fn test_shared_across_threads() {
        let args = Arc::new(VerifiedArguments::new([("age", 27)], &person_defaults()).unwrap());
        let handle = {
            let args = Arc::clone(&args);
            std::thread::spawn(move || args.get_i64("age"))
        };
        assert_eq!(handle.join().unwrap(), Some(27));
    }
}
