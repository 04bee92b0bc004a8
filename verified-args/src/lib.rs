//! # Verified Args
//!
//! Resolve caller-supplied options against a schema of defaults, type
//! constraints, predicate tests and sanitizers, producing one immutable map
//! of option values.
//!
//! ## Features
//!
//! - **Defaults** - Options fall back to their default when missing or invalid
//! - **Type tags** - Primitive categories, any object, or one exact Rust type
//! - **Tests** - Ordered predicates, built-in [`Check`]s or plain closures
//! - **Sanitizers** - Ordered transforms applied only to accepted values
//! - **Unknown keys** - Passed through or dropped, see [`UnknownKeys`]
//!
//! ("serde" feature)
//! - **JSON interop** - Resolve a `serde_json::Map` and serialize the result
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! verified-args = "0.3"
//! verified-args = { version = "0.3", features = ["serde"] }
//! ```
//!
//! ## Usage Examples
//!
//! ### Defaults and overrides
//!
//! ```rust
//! use verified_args::{OptionSpec, Schema, VerifiedArguments};
//!
//! let schema = Schema::new()
//!     .option("name", OptionSpec::new().value("Anonymous"))
//!     .option("age", OptionSpec::new().value(0));
//!
//! let args = VerifiedArguments::new([("age", 27)], &schema).unwrap();
//!
//! assert_eq!(args.get_str("name"), Some("Anonymous"));
//! assert_eq!(args.get_i64("age"), Some(27));
//! ```
//!
//! ### Tests and sanitizers
//!
//! ```rust
//! use verified_args::{Check, OptionSpec, Schema, Transform, TypeTag, VerifiedArguments};
//!
//! let schema = Schema::new().option(
//!     "name",
//!     OptionSpec::new()
//!         .test(Check::IsType(TypeTag::String))
//!         .test(Check::MaxLength(7))
//!         .sanitizer(Transform::Uppercase),
//! );
//!
//! let short = VerifiedArguments::new([("name", "Jaime")], &schema).unwrap();
//! let long = VerifiedArguments::new([("name", "Jaimeson")], &schema).unwrap();
//!
//! assert_eq!(short.get_str("name"), Some("JAIME"));
//! assert_eq!(long.get("name"), None);
//! ```
//!
//! ### Rejecting unknown keys
//!
//! ```rust
//! use verified_args::{Schema, UnknownKeys, VerifiedArguments};
//!
//! let args = VerifiedArguments::with_policy(
//!     [("name", "x")],
//!     &Schema::new(),
//!     UnknownKeys::Reject,
//! )
//! .unwrap();
//!
//! assert!(args.is_empty());
//! ```
//!
//! ## Error Handling
//!
//! Values that fail validation are not errors; they are replaced by the
//! option's default or left out. Resolution only fails when a sanitizer
//! fails, in which case [`ArgumentError::Sanitizer`] names the option.

pub mod checks;
pub mod error;
pub mod resolver;
pub mod sanitize;
pub mod spec;
pub mod types;
pub mod value;

cfg_if::cfg_if! {
    if #[cfg(feature = "serde")] {
        mod json;
    }
}

pub use checks::{Check, CheckFailure, Test};
pub use error::ArgumentError;
pub use resolver::{UnknownKeys, VerifiedArguments};
pub use sanitize::{Sanitizer, Transform};
pub use spec::{OptionSpec, Schema};
pub use types::{ClassTag, TypeTag};
pub use value::{Callable, Object, Value};
