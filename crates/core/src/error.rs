//! Model invariant errors

use thiserror::Error;

/// Errors raised when a model value would violate one of its invariants
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ModelError {
    /// Scalar type tag is not one of `S`, `N`, `B`
    #[error("unknown scalar type: {0}")]
    UnknownScalarType(String),

    /// Sort key reuses the primary key's attribute name
    #[error("sort key must differ from primary key: {0}")]
    DuplicateKeyName(String),

    /// Key attribute name is empty
    #[error("key attribute name must not be empty")]
    EmptyKeyName,
}
