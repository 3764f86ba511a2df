//! Unified error types for attrdoc.
//!
//! Marshaling errors from the core pass through unchanged; store failures are
//! mapped from [`ServiceError`] into the variants below.

use crate::table::ServiceError;
use attrdoc_core::ModelError;
use thiserror::Error;

/// All attrdoc errors.
#[derive(Debug, Error)]
pub enum Error {
    /// Encoding, decoding or key resolution failed
    #[error(transparent)]
    Marshal(#[from] attrdoc_marshal::Error),

    /// Wire JSON could not be decoded
    #[error("wire error: {0}")]
    Wire(#[from] attrdoc_wire::DecodeError),

    /// Key schema invariant violated
    #[error("model error: {0}")]
    Model(#[from] ModelError),

    /// No document under the requested key
    #[error("not found: {0}")]
    NotFound(String),

    /// A conditional write was rejected
    #[error("condition failed: {0}")]
    ConditionFailed(String),

    /// The table does not exist
    #[error("table not found: {0}")]
    TableNotFound(String),

    /// Key attributes do not match the table's key schema
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// Any other store failure
    #[error("service error: {0}")]
    Service(String),
}

/// Result type for attrdoc operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Check if this is a not-found error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_) | Error::TableNotFound(_))
    }

    /// Check if a conditional write was rejected.
    pub fn is_condition_failed(&self) -> bool {
        matches!(self, Error::ConditionFailed(_))
    }

    /// Check if this came from the marshaling core.
    pub fn is_marshal(&self) -> bool {
        matches!(self, Error::Marshal(_))
    }
}

impl From<ServiceError> for Error {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::TableNotFound(table) => Error::TableNotFound(table),
            ServiceError::ConditionalCheckFailed(msg) => Error::ConditionFailed(msg),
            ServiceError::InvalidKey(msg) => Error::InvalidKey(msg),
            other @ ServiceError::TableExists(_) => Error::Service(other.to_string()),
        }
    }
}
