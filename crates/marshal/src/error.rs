//! Marshaling errors

use attrdoc_core::ModelError;
use std::fmt::Display;
use thiserror::Error;

/// Errors raised while encoding, decoding or resolving keys
#[derive(Debug, Clone, Error, PartialEq)]
pub enum Error {
    /// Record declares no partition key and has no key retriever
    #[error("missing primary key: record declares no partition key field")]
    MissingPrimaryKey,

    /// Key field is named but absent from the encoded record
    #[error("key attribute not present in encoded record: {0}")]
    MissingKeyAttribute(String),

    /// Key value is not a string, number or binary scalar, or disagrees with
    /// its declared type
    #[error("invalid key type for {name}: found {found}")]
    InvalidKeyType {
        /// Key attribute name
        name: String,
        /// Attribute type actually produced
        found: String,
    },

    /// Value has no attribute representation
    ///
    /// Nested inside a struct, map or sequence this is recovered by leaving
    /// the slot out. Only a top-level value surfaces it.
    #[error("unsupported field shape: {0}")]
    UnsupportedFieldShape(String),

    /// Attribute type cannot be coerced into the requested Rust type
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        /// What the target type needed
        expected: String,
        /// What the attribute was
        found: String,
    },

    /// Decimal text does not parse into the exact target numeric type
    #[error("cannot parse number {text:?} as {target}")]
    NumericParseFailure {
        /// The decimal text
        text: String,
        /// Target numeric type
        target: &'static str,
    },

    /// Map key of a kind that has no text form
    #[error("unsupported map key type: {0}")]
    UnsupportedKeyType(&'static str),

    /// Binary sets cannot be decoded yet
    #[error("binary sets are not supported by the decoder")]
    UnsupportedBinarySet,

    /// Record descriptor failed validation
    #[error("invalid descriptor for {record}: {reason}")]
    InvalidDescriptor {
        /// Record name
        record: &'static str,
        /// What is wrong with it
        reason: String,
    },

    /// Model invariant violation
    #[error(transparent)]
    Model(#[from] ModelError),

    /// Message raised by a `Serialize` or `Deserialize` implementation
    #[error("{0}")]
    Custom(String),
}

/// Result type for marshaling operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Check if this is the recoverable "no representation" rejection
    pub fn is_unsupported_shape(&self) -> bool {
        matches!(self, Error::UnsupportedFieldShape(_))
    }

    /// Check if this is a key resolution error
    pub fn is_key_error(&self) -> bool {
        matches!(
            self,
            Error::MissingPrimaryKey | Error::MissingKeyAttribute(_) | Error::InvalidKeyType { .. }
        )
    }

    pub(crate) fn mismatch(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Error::TypeMismatch {
            expected: expected.into(),
            found: found.into(),
        }
    }
}

impl serde::ser::Error for Error {
    fn custom<T: Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    fn invalid_type(unexp: serde::de::Unexpected<'_>, exp: &dyn serde::de::Expected) -> Self {
        Error::mismatch(exp.to_string(), unexp.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::NumericParseFailure {
            text: "1.5".to_string(),
            target: "i32",
        };
        assert_eq!(err.to_string(), "cannot parse number \"1.5\" as i32");

        let err = Error::mismatch("bool", "Number");
        assert_eq!(err.to_string(), "type mismatch: expected bool, found Number");
    }

    #[test]
    fn test_classification() {
        assert!(Error::UnsupportedFieldShape("unit".into()).is_unsupported_shape());
        assert!(!Error::UnsupportedBinarySet.is_unsupported_shape());
        assert!(Error::MissingPrimaryKey.is_key_error());
        assert!(Error::MissingKeyAttribute("id".into()).is_key_error());
        assert!(!Error::Custom("x".into()).is_key_error());
    }

    #[test]
    fn test_model_error_is_transparent() {
        let err: Error = ModelError::EmptyKeyName.into();
        assert_eq!(err.to_string(), ModelError::EmptyKeyName.to_string());
    }
}
