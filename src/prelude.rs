//! Convenient imports for attrdoc.
//!
//! ```
//! use attrdoc::prelude::*;
//!
//! let store = DocumentStore::new(MemoryTable::new());
//! assert!(store.service().table_names().is_empty());
//! ```

// Document store
pub use crate::store::{DocumentStore, DocumentStoreBuilder};
pub use crate::table::{MemoryTable, PutCondition, TableService};

// Error handling
pub use crate::error::{Error, Result};

// Records and marshaling
pub use crate::types::{
    FieldDescriptor, KeyAttribute, Marshaler, Record, RecordDescriptor,
};

// Values and key schema
pub use crate::types::{AttributeDefinition, AttributeValue, Item, KeyDefinition, ScalarType, Value};
