//! Decoder: attribute values to Rust values
//!
//! [`Deserializer`] walks a borrowed attribute value. Every typed request
//! checks the attribute variant first and fails with
//! [`Error::TypeMismatch`] when it cannot be coerced; numbers are parsed from
//! their decimal text into the exact requested type.
//!
//! Struct fields missing from the document decode to their zero value, so a
//! document written by an older version of a record still decodes.

mod access;
mod item;
mod key;

use crate::error::{Error, Result};
use crate::marshaler::Aliases;
use access::{EnumAccessor, MapAccessor, SeqAccessor, StructAccessor};
use attrdoc_core::{AttributeValue, Item};
use item::ItemDeserializer;
use serde::de::value::StrDeserializer;
use serde::de::{self, Deserialize, Deserializer as _, IntoDeserializer, Visitor};
use std::str::FromStr;

/// Decode a value from a single attribute value
pub fn from_attribute_value<'de, T>(value: &'de AttributeValue) -> Result<T>
where
    T: Deserialize<'de>,
{
    decode_value(value, Aliases::NONE)
}

/// Decode a value from an item
///
/// The inverse of [`to_item`](crate::to_item): structs and maps read the
/// item's entries, sequences read entries keyed by decimal index, and other
/// values read the [`ROOT_ATTRIBUTE`](crate::ROOT_ATTRIBUTE) entry.
pub fn from_item<'de, T>(item: &'de Item) -> Result<T>
where
    T: Deserialize<'de>,
{
    decode_item(item, Aliases::NONE)
}

pub(crate) fn decode_value<'de, T>(value: &'de AttributeValue, aliases: Aliases<'_>) -> Result<T>
where
    T: Deserialize<'de>,
{
    T::deserialize(Deserializer::new(Node::Value(value), aliases))
}

pub(crate) fn decode_item<'de, T>(item: &'de Item, aliases: Aliases<'_>) -> Result<T>
where
    T: Deserialize<'de>,
{
    T::deserialize(ItemDeserializer::new(item, aliases))
}

/// What a deserializer reads from
#[derive(Debug, Clone, Copy)]
pub(crate) enum Node<'de> {
    /// A full attribute value
    Value(&'de AttributeValue),
    /// One member of a string set
    Text(&'de str),
    /// One member of a number set
    Number(&'de str),
    /// One byte of a binary value read as a sequence
    Byte(u8),
    /// Struct field missing from the document
    Absent,
}

impl<'de> Node<'de> {
    fn type_name(&self) -> &'static str {
        match self {
            Node::Value(value) => value.type_name(),
            Node::Text(_) => "String",
            Node::Number(_) | Node::Byte(_) => "Number",
            Node::Absent => "absent attribute",
        }
    }

    fn is_empty(&self) -> bool {
        matches!(self, Node::Value(AttributeValue::Null) | Node::Absent)
    }
}

/// Numeric decode targets
trait Numeric: FromStr {
    /// Whether a parsed value lies within the target's range
    fn in_range(&self) -> bool {
        true
    }
}

macro_rules! integers {
    ($($ty:ty),*) => {
        $(impl Numeric for $ty {})*
    };
}

integers!(i8, i16, i32, i64, i128, u8, u16, u32, u64, u128);

// Out-of-range decimal text parses to an infinity.
impl Numeric for f32 {
    fn in_range(&self) -> bool {
        self.is_finite()
    }
}

impl Numeric for f64 {
    fn in_range(&self) -> bool {
        self.is_finite()
    }
}

fn parse_number<T: Numeric>(text: &str, target: &'static str) -> Result<T> {
    let failure = || Error::NumericParseFailure {
        text: text.to_owned(),
        target,
    };
    let value: T = text.parse().map_err(|_| failure())?;
    if value.in_range() {
        Ok(value)
    } else {
        Err(failure())
    }
}

/// `serde::Deserializer` over a borrowed attribute value
pub(crate) struct Deserializer<'de, 'a> {
    node: Node<'de>,
    aliases: Aliases<'a>,
}

impl<'de, 'a> Deserializer<'de, 'a> {
    pub(crate) fn new(node: Node<'de>, aliases: Aliases<'a>) -> Self {
        Self { node, aliases }
    }

    fn mismatch(&self, expected: &str) -> Error {
        Error::mismatch(expected, self.node.type_name())
    }

    fn text(&self, expected: &str) -> Result<&'de str> {
        match self.node {
            Node::Value(AttributeValue::S(s)) => Ok(s),
            Node::Text(s) => Ok(s),
            _ => Err(self.mismatch(expected)),
        }
    }

    fn seq<I>(&self, elements: I) -> SeqAccessor<'a, I>
    where
        I: Iterator<Item = Node<'de>>,
    {
        SeqAccessor::new(elements, self.aliases)
    }

    /// Visit the value as a sequence when it has a sequence form
    fn visit_sequence<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.node {
            Node::Value(AttributeValue::Ss(items)) => {
                visitor.visit_seq(self.seq(items.iter().map(|s| Node::Text(s.as_str()))))
            }
            Node::Value(AttributeValue::Ns(items)) => {
                visitor.visit_seq(self.seq(items.iter().map(|s| Node::Number(s.as_str()))))
            }
            Node::Value(AttributeValue::L(items)) => {
                visitor.visit_seq(self.seq(items.iter().map(Node::Value)))
            }
            Node::Value(AttributeValue::B(bytes)) => {
                visitor.visit_seq(self.seq(bytes.iter().map(|b| Node::Byte(*b))))
            }
            Node::Value(AttributeValue::Bs(_)) => Err(Error::UnsupportedBinarySet),
            node if node.is_empty() => visitor.visit_seq(self.seq(std::iter::empty())),
            _ => Err(self.mismatch("sequence")),
        }
    }

    /// Fixed-length sequences read as `len` zero values when empty
    fn visit_tuple<V>(self, len: usize, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        if self.node.is_empty() {
            visitor.visit_seq(self.seq(std::iter::repeat(Node::Absent).take(len)))
        } else {
            self.visit_sequence(visitor)
        }
    }
}

macro_rules! deserialize_numbers {
    ($($method:ident => $visit:ident: $ty:ty),* $(,)?) => {
        $(
            fn $method<V>(self, visitor: V) -> Result<V::Value>
            where
                V: Visitor<'de>,
            {
                let text = match self.node {
                    Node::Value(AttributeValue::N(text)) => text.as_str(),
                    Node::Number(text) => text,
                    Node::Byte(b) => {
                        return visitor.$visit(parse_number(&b.to_string(), stringify!($ty))?);
                    }
                    Node::Absent => return visitor.$visit(<$ty>::default()),
                    _ => return Err(self.mismatch(stringify!($ty))),
                };
                visitor.$visit(parse_number(text, stringify!($ty))?)
            }
        )*
    };
}

impl<'de, 'a> de::Deserializer<'de> for Deserializer<'de, 'a> {
    type Error = Error;

    /// Untyped decoding
    ///
    /// Numbers carry no integer/float distinction on the wire, so an untyped
    /// number is always visited as `f64`.
    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.node {
            Node::Value(value) => match value {
                AttributeValue::S(s) => visitor.visit_borrowed_str(s),
                AttributeValue::N(n) => visitor.visit_f64(parse_number(n, "f64")?),
                AttributeValue::B(b) => visitor.visit_borrowed_bytes(b),
                AttributeValue::Bool(b) => visitor.visit_bool(*b),
                AttributeValue::Null => visitor.visit_unit(),
                AttributeValue::M(entries) => {
                    visitor.visit_map(MapAccessor::new(Some(entries), self.aliases))
                }
                AttributeValue::Ss(_)
                | AttributeValue::Ns(_)
                | AttributeValue::Bs(_)
                | AttributeValue::L(_) => self.visit_sequence(visitor),
            },
            Node::Text(s) => visitor.visit_borrowed_str(s),
            Node::Number(n) => visitor.visit_f64(parse_number(n, "f64")?),
            Node::Byte(b) => visitor.visit_u8(b),
            Node::Absent => visitor.visit_unit(),
        }
    }

    fn deserialize_bool<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.node {
            Node::Value(AttributeValue::Bool(b)) => visitor.visit_bool(*b),
            Node::Absent => visitor.visit_bool(false),
            _ => Err(self.mismatch("bool")),
        }
    }

    deserialize_numbers! {
        deserialize_i8 => visit_i8: i8,
        deserialize_i16 => visit_i16: i16,
        deserialize_i32 => visit_i32: i32,
        deserialize_i64 => visit_i64: i64,
        deserialize_i128 => visit_i128: i128,
        deserialize_u8 => visit_u8: u8,
        deserialize_u16 => visit_u16: u16,
        deserialize_u32 => visit_u32: u32,
        deserialize_u64 => visit_u64: u64,
        deserialize_u128 => visit_u128: u128,
        deserialize_f32 => visit_f32: f32,
        deserialize_f64 => visit_f64: f64,
    }

    fn deserialize_char<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        if let Node::Absent = self.node {
            return visitor.visit_char('\0');
        }
        let text = self.text("char")?;
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => visitor.visit_char(c),
            _ => Err(Error::mismatch(
                "char",
                format!("String of {} characters", text.chars().count()),
            )),
        }
    }

    fn deserialize_str<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        if let Node::Absent = self.node {
            return visitor.visit_borrowed_str("");
        }
        visitor.visit_borrowed_str(self.text("string")?)
    }

    fn deserialize_string<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_str(visitor)
    }

    fn deserialize_bytes<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.node {
            Node::Value(AttributeValue::B(bytes)) => visitor.visit_borrowed_bytes(bytes),
            node if node.is_empty() => visitor.visit_borrowed_bytes(&[]),
            _ => Err(self.mismatch("bytes")),
        }
    }

    fn deserialize_byte_buf<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_bytes(visitor)
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        if self.node.is_empty() {
            visitor.visit_none()
        } else {
            visitor.visit_some(self)
        }
    }

    fn deserialize_unit<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        if self.node.is_empty() {
            visitor.visit_unit()
        } else {
            Err(self.mismatch("unit"))
        }
    }

    fn deserialize_unit_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_unit(visitor)
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.visit_sequence(visitor)
    }

    fn deserialize_tuple<V>(self, len: usize, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.visit_tuple(len, visitor)
    }

    fn deserialize_tuple_struct<V>(
        self,
        _name: &'static str,
        len: usize,
        visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.visit_tuple(len, visitor)
    }

    fn deserialize_map<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.node {
            Node::Value(AttributeValue::M(entries)) => {
                visitor.visit_map(MapAccessor::new(Some(entries), self.aliases))
            }
            node if node.is_empty() => visitor.visit_map(MapAccessor::new(None, self.aliases)),
            _ => Err(self.mismatch("map")),
        }
    }

    fn deserialize_struct<V>(
        self,
        name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let descriptor = self.aliases.lookup(name);
        match self.node {
            Node::Value(AttributeValue::M(entries)) => visitor.visit_map(StructAccessor::new(
                Some(entries),
                fields,
                descriptor,
                self.aliases,
            )),
            node if node.is_empty() => {
                visitor.visit_map(StructAccessor::new(None, fields, descriptor, self.aliases))
            }
            _ => Err(self.mismatch(name)),
        }
    }

    fn deserialize_enum<V>(
        self,
        name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.node {
            Node::Value(AttributeValue::S(_)) | Node::Text(_) => {
                let unit: StrDeserializer<'_, Error> = self.text(name)?.into_deserializer();
                visitor.visit_enum(unit)
            }
            Node::Value(AttributeValue::M(entries)) if entries.len() == 1 => {
                match entries.iter().next() {
                    Some((variant, payload)) => {
                        visitor.visit_enum(EnumAccessor::new(variant, payload, self.aliases))
                    }
                    None => Err(self.mismatch(name)),
                }
            }
            _ => Err(self.mismatch(name)),
        }
    }

    fn deserialize_identifier<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_str(visitor)
    }

    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_unit()
    }
}
