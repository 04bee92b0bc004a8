use thiserror::Error;

/// Errors surfaced while resolving arguments or building schema pieces.
///
/// Rejected input values are never reported here: a value that fails its
/// type or predicate checks is silently replaced by the option's default.
/// Only a misbehaving sanitizer aborts a resolution.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ArgumentError {
    /// A sanitizer could not transform an accepted value.
    ///
    /// `key` is empty while the sanitizer runs and is filled in by the
    /// resolver before the error reaches the caller.
    #[error("sanitizer failed for option `{key}`: {message}")]
    Sanitizer { key: String, message: String },

    #[error("unknown type tag `{0}`")]
    UnknownTypeTag(String),

    /// The value has no JSON representation (objects and callables).
    #[error("a value of type {0} cannot be represented as JSON")]
    NotSerializable(&'static str),
}

impl ArgumentError {
    /// Builds a sanitizer failure not yet bound to an option key.
    pub fn sanitizer(message: impl Into<String>) -> Self {
        Self::Sanitizer {
            key: String::new(),
            message: message.into(),
        }
    }

    pub(crate) fn with_key(self, option: &str) -> Self {
        match self {
            Self::Sanitizer { key, message } if key.is_empty() => Self::Sanitizer {
                key: option.to_string(),
                message,
            },
            other => other,
        }
    }
}
