//! Marshaling between Rust values and attribute documents
//!
//! This crate converts any `serde` value into the document store's
//! [`AttributeValue`] model and back, and discovers which fields of a record
//! form its table key.
//!
//! - [`Record`] and [`RecordDescriptor`]: per-type metadata (key roles,
//!   declared key types, aliases) and optional capability hooks
//! - [`Marshaler`]: a registry of descriptors plus configuration; the entry
//!   point for encoding, decoding and key resolution
//! - [`to_item`], [`from_item`], ...: descriptor-free conversions
//!
//! ## Encoding rules at a glance
//!
//! | Rust value | Attribute |
//! |------------|-----------|
//! | `String`, `&str`, `char` | `S` |
//! | integers, finite floats | `N` |
//! | `bool` | `BOOL` |
//! | `None` | `NULL` |
//! | `Vec<u8>`, byte buffers | `B` |
//! | sequence of strings | `SS` |
//! | sequence of numbers | `NS` |
//! | other sequences | `L` |
//! | structs, maps | `M` |
//! | unit enum variant | `S` (variant name) |
//! | other enum variants | `M` (`{variant: payload}`) |
//!
//! Empty sequences, maps and byte buffers encode to `NULL`. Values with no
//! representation (`()`, unit structs, NaN and infinities) are left out of
//! their parent.
//!
//! ## Example
//!
//! ```
//! use attrdoc_marshal::{FieldDescriptor, Marshaler, Record, RecordDescriptor};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize, Debug, PartialEq)]
//! struct Product {
//!     name: String,
//!     price: f64,
//! }
//!
//! impl Record for Product {
//!     const DESCRIPTOR: RecordDescriptor = RecordDescriptor::new(
//!         "Product",
//!         &[
//!             FieldDescriptor::primary("name"),
//!             FieldDescriptor::new("price").alias("#price"),
//!         ],
//!     );
//! }
//!
//! let marshaler = Marshaler::builder().register::<Product>().build().unwrap();
//! let product = Product { name: "lamp".into(), price: 9.75 };
//!
//! let item = marshaler.encode(&product).unwrap();
//! assert_eq!(item["#price"].as_n(), Some("9.75"));
//!
//! let key = marshaler.partition_key(&product).unwrap();
//! assert_eq!(key.name(), "name");
//!
//! let back: Product = marshaler.decode(&item).unwrap();
//! assert_eq!(back, product);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod de;
pub mod descriptor;
pub mod error;
pub mod keys;
pub mod marshaler;
pub mod record;
mod ser;

pub use attrdoc_core::{AttributeDefinition, AttributeValue, Item, KeyDefinition, ScalarType};
pub use de::{from_attribute_value, from_item};
pub use descriptor::{FieldDescriptor, KeyRole, RecordDescriptor};
pub use error::{Error, Result};
pub use keys::KeyAttribute;
pub use marshaler::{Marshaler, MarshalerBuilder, DEFAULT_ALIAS_SENTINEL};
pub use record::{
    AttributeMarshaler, CustomMarshaler, CustomUnmarshaler, KeyRetriever, Record, UnmarshalFn,
};
pub use ser::{to_attribute_value, to_item, ROOT_ATTRIBUTE};
