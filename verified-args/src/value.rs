//! # Dynamic values
//!
//! Option values are untyped: a default may be a string while the supplied
//! value is an integer, and an option may accept any of several types. The
//! [`Value`] enum is the closed set of runtime categories a value can have.
//!
//! Values that are not primitives are carried as an [`Object`], which keeps
//! the concrete Rust type identity around so a [`crate::TypeTag::Class`] can
//! match against it exactly.
//!
//! ## Example
//! ```rust
//! use verified_args::{Object, Value};
//!
//! #[derive(Debug, PartialEq)]
//! struct Date(u16, u8, u8);
//!
//! let age = Value::from(27);
//! let date = Value::from(Object::new(Date(2018, 10, 23)));
//!
//! assert_eq!(age.as_i64(), Some(27));
//! assert_eq!(date.downcast_ref::<Date>(), Some(&Date(2018, 10, 23)));
//! ```
use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

use crate::types::TypeTag;

/// A runtime value of any category an option can hold.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Array(Vec<Value>),
    Callable(Callable),
    Object(Object),
}

impl Value {
    /// The primitive category of this value.
    ///
    /// Objects report [`TypeTag::Object`], never their class.
    pub fn type_tag(&self) -> TypeTag {
        match self {
            Self::Null => TypeTag::Null,
            Self::Bool(_) => TypeTag::Boolean,
            Self::Integer(_) => TypeTag::Integer,
            Self::Float(_) => TypeTag::Float,
            Self::String(_) => TypeTag::String,
            Self::Array(_) => TypeTag::Array,
            Self::Callable(_) => TypeTag::Callable,
            Self::Object(_) => TypeTag::Object,
        }
    }

    /// Name of the primitive category, e.g. `"string"` or `"integer"`.
    pub fn type_name(&self) -> &'static str {
        self.type_tag().name()
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Integers are widened, so `Value::Integer(2).as_f64() == Some(2.0)`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(n) => Some(*n),
            Self::Integer(n) => Some(*n as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Self::Object(obj) => Some(obj),
            _ => None,
        }
    }

    pub fn as_callable(&self) -> Option<&Callable> {
        match self {
            Self::Callable(f) => Some(f),
            _ => None,
        }
    }

    /// Typed access to the payload of an [`Object`] value.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.as_object().and_then(Object::downcast_ref)
    }
}

/// A non-primitive value together with its concrete type identity.
///
/// Cloning shares the payload. Two objects are equal only when they point at
/// the same payload.
#[derive(Clone)]
pub struct Object {
    inner: Arc<dyn Any + Send + Sync>,
    type_id: TypeId,
    type_name: &'static str,
}

impl Object {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            inner: Arc::new(value),
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
        }
    }

    /// The `TypeId` of the wrapped value's concrete type.
    pub fn concrete_type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn is<T: Any>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        (*self.inner).downcast_ref::<T>()
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Object<{}>", self.type_name)
    }
}

type CallableFn = dyn Fn(&[Value]) -> Value + Send + Sync;

/// A callable reference stored as a value.
///
/// Two callables are equal only when they share the same function allocation.
#[derive(Clone)]
pub struct Callable(Arc<CallableFn>);

impl Callable {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn call(&self, args: &[Value]) -> Value {
        (self.0)(args)
    }
}

impl PartialEq for Callable {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Callable")
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

macro_rules! from_integer {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(n: $t) -> Self {
                    Self::Integer(i64::from(n))
                }
            }
        )*
    };
}

from_integer!(i8, i16, i32, i64, u8, u16, u32);

// Out of range for i64 falls back to a float, as JSON numbers do.
macro_rules! from_wide_integer {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(n: $t) -> Self {
                    i64::try_from(n).map_or(Self::Float(n as f64), Self::Integer)
                }
            }
        )*
    };
}

from_wide_integer!(isize, usize, u64);

impl From<f32> for Value {
    fn from(n: f32) -> Self {
        Self::Float(f64::from(n))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Float(n)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::Array(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Self::Null, Into::into)
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Self::Null
    }
}

impl From<Object> for Value {
    fn from(obj: Object) -> Self {
        Self::Object(obj)
    }
}

impl From<Callable> for Value {
    fn from(f: Callable) -> Self {
        Self::Callable(f)
    }
}
