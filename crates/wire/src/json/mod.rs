//! JSON wire format for attribute values
//!
//! Each value is an object with a single type tag key, mirroring the shape
//! the key-value store accepts on the wire:
//!
//! - `{"S": "text"}`, `{"N": "12.5"}`, `{"B": "<base64>"}`
//! - `{"BOOL": true}`, `{"NULL": true}`
//! - `{"SS": [...]}`, `{"NS": [...]}`, `{"BS": [...]}`
//! - `{"L": [...]}`, `{"M": {...}}`

mod decode;
mod encode;
mod render;

pub use decode::{decode_attribute_value, decode_item, DecodeError};
pub use encode::{encode_attribute_value, encode_item, encode_string};
pub use render::render_item;
