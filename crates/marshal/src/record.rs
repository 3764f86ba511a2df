//! Record trait and capability hooks
//!
//! A record is any `Serialize` struct that implements [`Record`]. Its
//! descriptor supplies declarative metadata; the capability accessors let a
//! record take over individual steps:
//!
//! | Capability | Replaces |
//! |------------|----------|
//! | [`KeyRetriever`] | descriptor key roles and types |
//! | [`AttributeMarshaler`] | encoding the record to read a key value |
//! | [`CustomMarshaler`] | the whole encoding |
//! | [`CustomUnmarshaler`] | the whole decoding |
//!
//! Each accessor returns `None` unless the record overrides it, so a record
//! opts into a capability by implementing the trait and returning `Some`:
//!
//! ```
//! use attrdoc_marshal::{AttributeDefinition, KeyRetriever, Record, RecordDescriptor};
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Session {
//!     token: String,
//! }
//!
//! impl KeyRetriever for Session {
//!     fn partition_key(&self) -> Option<AttributeDefinition> {
//!         Some(AttributeDefinition::string("token"))
//!     }
//! }
//!
//! impl Record for Session {
//!     const DESCRIPTOR: RecordDescriptor = RecordDescriptor::plain("Session");
//!
//!     fn key_retriever(&self) -> Option<&dyn KeyRetriever> {
//!         Some(self)
//!     }
//! }
//! ```

use crate::descriptor::RecordDescriptor;
use crate::error::Result;
use attrdoc_core::{AttributeDefinition, AttributeValue, Item};
use serde::Serialize;

/// Supplies key definitions directly, bypassing the descriptor
pub trait KeyRetriever {
    /// Partition key definition
    fn partition_key(&self) -> Option<AttributeDefinition>;

    /// Sort key definition, if the record has one
    fn sort_key(&self) -> Option<AttributeDefinition> {
        None
    }
}

/// Produces single attribute values without encoding the whole record
pub trait AttributeMarshaler {
    /// Encoded value of the attribute stored under `name`
    fn attribute_value(&self, name: &str) -> Option<AttributeValue>;
}

/// Replaces the encoder for a record
pub trait CustomMarshaler {
    /// Encode the record into an item
    fn marshal(&self) -> Result<Item>;
}

/// Replaces the decoder for a record
pub trait CustomUnmarshaler: Sized {
    /// Decode the record from an item
    fn unmarshal(item: &Item) -> Result<Self>;
}

/// Decoding function returned by [`Record::unmarshaler`]
pub type UnmarshalFn<T> = fn(&Item) -> Result<T>;

/// A struct stored as one document
pub trait Record: Serialize {
    /// Field metadata of the record
    const DESCRIPTOR: RecordDescriptor;

    /// Key definitions supplied by the record itself
    fn key_retriever(&self) -> Option<&dyn KeyRetriever> {
        None
    }

    /// Per-attribute encoder used for key values
    fn attribute_marshaler(&self) -> Option<&dyn AttributeMarshaler> {
        None
    }

    /// Whole-record encoder
    fn custom_marshaler(&self) -> Option<&dyn CustomMarshaler> {
        None
    }

    /// Whole-record decoder
    ///
    /// Records implementing [`CustomUnmarshaler`] return
    /// `Some(<Self as CustomUnmarshaler>::unmarshal)`.
    fn unmarshaler() -> Option<UnmarshalFn<Self>>
    where
        Self: Sized,
    {
        None
    }
}
