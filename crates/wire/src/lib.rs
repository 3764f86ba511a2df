//! JSON wire format for attribute values
//!
//! Attribute values travel as single-key objects tagged with their type,
//! and items as objects of attribute name to tagged value. Number text is
//! carried verbatim and binary data as base64.
//!
//! ## Examples
//!
//! ```
//! use attrdoc_core::{AttributeValue, Item};
//! use attrdoc_wire::{decode_item, encode_attribute_value, encode_item};
//!
//! let json = encode_attribute_value(&AttributeValue::N("9.75".into()));
//! assert_eq!(json, r#"{"N":"9.75"}"#);
//!
//! let mut item = Item::new();
//! item.insert("DocName".into(), AttributeValue::S("P".into()));
//! let json = encode_item(&item);
//! assert_eq!(json, r#"{"DocName":{"S":"P"}}"#);
//! assert_eq!(decode_item(&json).unwrap(), item);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod json;

pub use json::{
    decode_attribute_value, decode_item, encode_attribute_value, encode_item, encode_string,
    render_item, DecodeError,
};
