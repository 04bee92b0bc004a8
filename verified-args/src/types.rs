//! # Type tags
//!
//! A [`TypeTag`] names either a primitive category of [`Value`] or one exact
//! Rust type carried inside a [`Value::Object`].
//!
//! Class tags compare type identity exactly. A newtype that wraps or derefs
//! to `T` is a different type and does not satisfy `TypeTag::class::<T>()`;
//! there is no subtype-permissive matching. Use [`TypeTag::Object`] to accept
//! any object regardless of its concrete type.
//!
//! ## Example
//! ```rust
//! use verified_args::{Object, TypeTag, Value};
//!
//! struct Date;
//!
//! let tag: TypeTag = "integer".parse().unwrap();
//! assert!(tag.matches(&Value::from(27)));
//! assert!(!tag.matches(&Value::from("27")));
//!
//! let date = Value::from(Object::new(Date));
//! assert!(TypeTag::class::<Date>().matches(&date));
//! assert!(TypeTag::Object.matches(&date));
//! ```
use std::any::{Any, TypeId};
use std::fmt::Display;
use std::str::FromStr;

use crate::error::ArgumentError;
use crate::value::Value;

/// Represents the type a supplied value is expected to have.
///
/// Supports:
/// - `String`, `Integer`, `Float`, `Boolean`, `Array`, `Null`, `Callable`
/// - `Object` (any object)
/// - `Class` (one exact concrete type, see [`ClassTag`])
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    String,
    Integer,
    Float,
    Boolean,
    Array,
    Null,
    Callable,
    Object,
    Class(ClassTag),
}

impl TypeTag {
    /// Tag matching objects whose concrete type is exactly `T`.
    pub fn class<T: Any>() -> Self {
        Self::Class(ClassTag::of::<T>())
    }

    /// Whether `value` satisfies this tag.
    pub fn matches(&self, value: &Value) -> bool {
        match (self, value) {
            (Self::Class(class), Value::Object(obj)) => class.id == obj.concrete_type_id(),
            (Self::Class(_), _) => false,
            (tag, value) => *tag == value.type_tag(),
        }
    }

    /// True when at least one tag in `tags` matches `value`.
    ///
    /// An empty slice matches nothing.
    pub fn any_matches(tags: &[TypeTag], value: &Value) -> bool {
        tags.iter().any(|tag| tag.matches(value))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Float => "double",
            Self::Boolean => "boolean",
            Self::Array => "array",
            Self::Null => "NULL",
            Self::Callable => "callable",
            Self::Object => "object",
            Self::Class(class) => class.name,
        }
    }
}

impl Display for TypeTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Parses the primitive category names.
///
/// Class tags cannot be named by string; build them with [`TypeTag::class`].
impl FromStr for TypeTag {
    type Err = ArgumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" => Ok(Self::String),
            "integer" | "int" => Ok(Self::Integer),
            "double" | "float" => Ok(Self::Float),
            "boolean" | "bool" => Ok(Self::Boolean),
            "array" | "list" => Ok(Self::Array),
            "NULL" | "null" => Ok(Self::Null),
            "callable" | "function" => Ok(Self::Callable),
            "object" => Ok(Self::Object),
            other => Err(ArgumentError::UnknownTypeTag(other.to_string())),
        }
    }
}

/// Identity of one concrete Rust type.
#[derive(Debug, Clone, Copy)]
pub struct ClassTag {
    id: TypeId,
    name: &'static str,
}

impl ClassTag {
    pub fn of<T: Any>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for ClassTag {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ClassTag {}

impl std::hash::Hash for ClassTag {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
