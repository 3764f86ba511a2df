//! # attrdoc
//!
//! Document marshaling for key-value stores with typed attribute values.
//!
//! attrdoc converts serde-serializable Rust values into items made of
//! discriminated attribute values (strings, numbers, binary, sets, lists,
//! maps) and back, resolves primary and sort keys from record metadata, and
//! layers typed document CRUD on top of a pluggable table service.
//!
//! ## Quick Start
//!
//! ```
//! use attrdoc::prelude::*;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize)]
//! struct Product {
//!     #[serde(rename = "DocName")]
//!     name: String,
//!     #[serde(rename = "Value")]
//!     price: f64,
//! }
//!
//! impl Record for Product {
//!     const DESCRIPTOR: RecordDescriptor = RecordDescriptor::new(
//!         "Product",
//!         &[
//!             FieldDescriptor::primary("DocName"),
//!             FieldDescriptor::new("Value").alias("#item_price"),
//!         ],
//!     );
//! }
//!
//! let marshaler = Marshaler::new();
//! let item = marshaler.encode(&Product { name: "P".into(), price: 9.75 }).unwrap();
//! assert_eq!(item.get("#item_price"), Some(&AttributeValue::N("9.75".into())));
//! ```
//!
//! ## Crates
//!
//! - `attrdoc-core`: [`AttributeValue`], [`Item`] and key schema types
//! - `attrdoc-marshal`: encoder, decoder and key introspection
//! - `attrdoc-wire`: the JSON wire format
//!
//! This crate adds [`DocumentStore`] and the [`TableService`] it runs on.

#![warn(missing_docs)]

mod error;
mod store;
mod table;
mod types;

pub mod prelude;

pub use error::{Error, Result};
pub use store::{DocumentStore, DocumentStoreBuilder};
pub use table::{MemoryTable, PutCondition, ServiceError, TableService};

pub use types::*;
