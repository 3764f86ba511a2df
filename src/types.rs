//! Public types re-exported from the attrdoc crates.

// Wire value model
pub use attrdoc_core::{AttributeValue, Item, Value};

// Key schema
pub use attrdoc_core::{AttributeDefinition, KeyDefinition, ModelError, ScalarType};

// Marshaling
pub use attrdoc_marshal::{
    AttributeMarshaler, CustomMarshaler, CustomUnmarshaler, FieldDescriptor, KeyAttribute,
    KeyRetriever, KeyRole, Marshaler, MarshalerBuilder, Record, RecordDescriptor, UnmarshalFn,
    DEFAULT_ALIAS_SENTINEL,
};

// Free-standing codec entry points
pub use attrdoc_marshal::{from_attribute_value, from_item, to_attribute_value, to_item};

// Wire format
pub use attrdoc_wire::{
    decode_attribute_value, decode_item, encode_attribute_value, encode_item, render_item,
    DecodeError,
};
