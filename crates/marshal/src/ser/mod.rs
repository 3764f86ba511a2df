//! Encoder: Rust values to attribute values
//!
//! [`Serializer`] is a `serde::Serializer` whose output is an attribute
//! value. Structs consult the descriptor registry for field aliases, and
//! values with no attribute form are rejected with
//! [`Error::UnsupportedFieldShape`] so the enclosing struct, map or sequence
//! can leave them out.

mod compound;
mod key;

use crate::error::{Error, Result};
use crate::marshaler::Aliases;
use attrdoc_core::{AttributeValue, Item};
use compound::{MapSerializer, SeqSerializer, StructSerializer, VariantSerializer};
use serde::ser::{self, Serialize};
use std::fmt::Display;

/// Attribute name used when a top-level scalar is stored as an item
pub const ROOT_ATTRIBUTE: &str = "root";

/// Encode any value into an attribute value
///
/// Struct fields are stored under their declared names; use
/// [`Marshaler::to_attribute_value`](crate::Marshaler::to_attribute_value)
/// for alias-aware encoding.
pub fn to_attribute_value<T>(value: &T) -> Result<AttributeValue>
where
    T: ?Sized + Serialize,
{
    encode_value(value, Aliases::NONE)
}

/// Encode any value into an item
///
/// Maps and structs become the item itself, sequences become entries keyed
/// by decimal index, and any other value is stored under [`ROOT_ATTRIBUTE`].
pub fn to_item<T>(value: &T) -> Result<Item>
where
    T: ?Sized + Serialize,
{
    encode_item(value, Aliases::NONE)
}

pub(crate) fn encode_value<T>(value: &T, aliases: Aliases<'_>) -> Result<AttributeValue>
where
    T: ?Sized + Serialize,
{
    value.serialize(Serializer::new(aliases)).map(AttributeValue::from)
}

pub(crate) fn encode_item<T>(value: &T, aliases: Aliases<'_>) -> Result<Item>
where
    T: ?Sized + Serialize,
{
    encode_value(value, aliases).map(into_item)
}

/// Shape a top-level attribute value as an item
pub(crate) fn into_item(value: AttributeValue) -> Item {
    match value {
        AttributeValue::M(entries) => entries,
        AttributeValue::Null => Item::new(),
        AttributeValue::L(values) => indexed(values),
        AttributeValue::Ss(values) => indexed(values.into_iter().map(AttributeValue::S)),
        AttributeValue::Ns(values) => indexed(values.into_iter().map(AttributeValue::N)),
        AttributeValue::Bs(values) => indexed(values.into_iter().map(AttributeValue::B)),
        scalar => {
            let mut item = Item::with_capacity(1);
            item.insert(ROOT_ATTRIBUTE.to_string(), scalar);
            item
        }
    }
}

fn indexed<I>(values: I) -> Item
where
    I: IntoIterator<Item = AttributeValue>,
{
    values
        .into_iter()
        .enumerate()
        .map(|(index, value)| (index.to_string(), value))
        .collect()
}

/// Output of the serializer
///
/// A `u8` is kept apart from other numbers until its parent is known: a
/// sequence made only of bytes is stored as binary.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Encoded {
    Byte(u8),
    Value(AttributeValue),
}

impl From<Encoded> for AttributeValue {
    fn from(encoded: Encoded) -> Self {
        match encoded {
            Encoded::Byte(b) => AttributeValue::N(b.to_string()),
            Encoded::Value(value) => value,
        }
    }
}

fn number<T: Display>(n: T) -> Encoded {
    Encoded::Value(AttributeValue::N(n.to_string()))
}

fn unsupported(shape: impl Into<String>) -> Error {
    Error::UnsupportedFieldShape(shape.into())
}

/// `serde::Serializer` producing attribute values
#[derive(Clone, Copy)]
pub(crate) struct Serializer<'a> {
    aliases: Aliases<'a>,
}

impl<'a> Serializer<'a> {
    pub(crate) fn new(aliases: Aliases<'a>) -> Self {
        Self { aliases }
    }
}

macro_rules! serialize_numbers {
    ($($method:ident: $ty:ty),* $(,)?) => {
        $(
            fn $method(self, v: $ty) -> Result<Encoded> {
                Ok(number(v))
            }
        )*
    };
}

impl<'a> ser::Serializer for Serializer<'a> {
    type Ok = Encoded;
    type Error = Error;

    type SerializeSeq = SeqSerializer<'a>;
    type SerializeTuple = SeqSerializer<'a>;
    type SerializeTupleStruct = SeqSerializer<'a>;
    type SerializeTupleVariant = VariantSerializer<SeqSerializer<'a>>;
    type SerializeMap = MapSerializer<'a>;
    type SerializeStruct = StructSerializer<'a>;
    type SerializeStructVariant = VariantSerializer<StructSerializer<'a>>;

    fn serialize_bool(self, v: bool) -> Result<Encoded> {
        Ok(Encoded::Value(AttributeValue::Bool(v)))
    }

    serialize_numbers! {
        serialize_i8: i8,
        serialize_i16: i16,
        serialize_i32: i32,
        serialize_i64: i64,
        serialize_i128: i128,
        serialize_u16: u16,
        serialize_u32: u32,
        serialize_u64: u64,
        serialize_u128: u128,
    }

    fn serialize_u8(self, v: u8) -> Result<Encoded> {
        Ok(Encoded::Byte(v))
    }

    fn serialize_f32(self, v: f32) -> Result<Encoded> {
        if !v.is_finite() {
            return Err(unsupported(format!("non-finite float {v}")));
        }
        Ok(number(v))
    }

    fn serialize_f64(self, v: f64) -> Result<Encoded> {
        if !v.is_finite() {
            return Err(unsupported(format!("non-finite float {v}")));
        }
        Ok(number(v))
    }

    fn serialize_char(self, v: char) -> Result<Encoded> {
        Ok(Encoded::Value(AttributeValue::S(v.to_string())))
    }

    fn serialize_str(self, v: &str) -> Result<Encoded> {
        Ok(Encoded::Value(AttributeValue::S(v.to_owned())))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Encoded> {
        Ok(Encoded::Value(AttributeValue::binary(v)))
    }

    fn serialize_none(self) -> Result<Encoded> {
        Ok(Encoded::Value(AttributeValue::Null))
    }

    fn serialize_some<T>(self, value: &T) -> Result<Encoded>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Encoded> {
        Err(unsupported("unit"))
    }

    fn serialize_unit_struct(self, name: &'static str) -> Result<Encoded> {
        Err(unsupported(format!("unit struct {name}")))
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Encoded> {
        Ok(Encoded::Value(AttributeValue::S(variant.to_owned())))
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<Encoded>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Encoded>
    where
        T: ?Sized + Serialize,
    {
        let payload = AttributeValue::from(value.serialize(self)?);
        Ok(compound::tagged(variant, payload))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SeqSerializer<'a>> {
        Ok(SeqSerializer::new(self.aliases, len))
    }

    fn serialize_tuple(self, len: usize) -> Result<SeqSerializer<'a>> {
        Ok(SeqSerializer::new(self.aliases, Some(len)))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<SeqSerializer<'a>> {
        Ok(SeqSerializer::new(self.aliases, Some(len)))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<VariantSerializer<SeqSerializer<'a>>> {
        Ok(VariantSerializer::new(
            variant,
            SeqSerializer::new(self.aliases, Some(len)),
        ))
    }

    fn serialize_map(self, len: Option<usize>) -> Result<MapSerializer<'a>> {
        Ok(MapSerializer::new(self.aliases, len))
    }

    fn serialize_struct(self, name: &'static str, len: usize) -> Result<StructSerializer<'a>> {
        let descriptor = self.aliases.lookup(name);
        Ok(StructSerializer::new(self.aliases, descriptor, len))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<VariantSerializer<StructSerializer<'a>>> {
        Ok(VariantSerializer::new(
            variant,
            StructSerializer::new(self.aliases, None, len),
        ))
    }
}
