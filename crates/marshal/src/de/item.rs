//! Top-level item deserializer
//!
//! Reads an item the way the encoder shaped it: as a map or struct, as a
//! sequence keyed by decimal index, or as a single scalar stored under
//! [`ROOT_ATTRIBUTE`].

use super::access::{EnumAccessor, MapAccessor, SeqAccessor, StructAccessor};
use super::{Deserializer, Node};
use crate::error::{Error, Result};
use crate::marshaler::Aliases;
use crate::ser::ROOT_ATTRIBUTE;
use attrdoc_core::{AttributeValue, Item};
use serde::de::{self, Deserializer as _, Visitor};

pub(super) struct ItemDeserializer<'de, 'a> {
    item: &'de Item,
    aliases: Aliases<'a>,
}

impl<'de, 'a> ItemDeserializer<'de, 'a> {
    pub(super) fn new(item: &'de Item, aliases: Aliases<'a>) -> Self {
        Self { item, aliases }
    }

    /// The scalar stored under the root attribute
    fn root(&self, expected: &str) -> Result<Deserializer<'de, 'a>> {
        match self.item.get(ROOT_ATTRIBUTE) {
            Some(value) if self.item.len() == 1 => {
                Ok(Deserializer::new(Node::Value(value), self.aliases))
            }
            _ => Err(Error::mismatch(expected, "item without a root attribute")),
        }
    }

    /// Entries keyed `0..n`, in index order
    fn indexed(&self) -> Result<Vec<&'de AttributeValue>> {
        let mut slots: Vec<Option<&'de AttributeValue>> = vec![None; self.item.len()];
        for (key, value) in self.item {
            let slot = key
                .parse::<usize>()
                .ok()
                .and_then(|index| slots.get_mut(index))
                .ok_or_else(|| Error::mismatch("sequence", format!("item entry {key:?}")))?;
            *slot = Some(value);
        }
        slots
            .into_iter()
            .map(|slot| slot.ok_or_else(|| Error::mismatch("sequence", "item with index gaps")))
            .collect()
    }
}

macro_rules! forward_to_root {
    ($($method:ident),* $(,)?) => {
        $(
            fn $method<V>(self, visitor: V) -> Result<V::Value>
            where
                V: Visitor<'de>,
            {
                self.root("scalar")?.$method(visitor)
            }
        )*
    };
}

impl<'de, 'a> de::Deserializer<'de> for ItemDeserializer<'de, 'a> {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_map(visitor)
    }

    fn deserialize_map<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_map(MapAccessor::new(Some(self.item), self.aliases))
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
        visitor.visit_map(StructAccessor::new(
            Some(self.item),
            fields,
            descriptor,
            self.aliases,
        ))
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        if self.item.is_empty() {
            visitor.visit_none()
        } else {
            visitor.visit_some(self)
        }
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
        // Binary is stored whole under the root attribute
        if let Some(AttributeValue::B(_)) = self.item.get(ROOT_ATTRIBUTE) {
            if self.item.len() == 1 {
                return self.root("sequence")?.deserialize_seq(visitor);
            }
        }
        let elements = self.indexed()?;
        visitor.visit_seq(SeqAccessor::new(
            elements.into_iter().map(Node::Value),
            self.aliases,
        ))
    }

    fn deserialize_tuple<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_tuple_struct<V>(
        self,
        _name: &'static str,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_unit<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        if self.item.is_empty() {
            visitor.visit_unit()
        } else {
            Err(Error::mismatch("unit", "non-empty item"))
        }
    }

    fn deserialize_unit_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_unit(visitor)
    }

    fn deserialize_enum<V>(
        self,
        name: &'static str,
        variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        if let Some(AttributeValue::S(_)) = self.item.get(ROOT_ATTRIBUTE) {
            return self.root(name)?.deserialize_enum(name, variants, visitor);
        }
        match self.item.iter().next() {
            Some((variant, payload)) if self.item.len() == 1 => {
                visitor.visit_enum(EnumAccessor::new(variant, payload, self.aliases))
            }
            _ => Err(Error::mismatch(name, "item")),
        }
    }

    forward_to_root! {
        deserialize_bool,
        deserialize_i8,
        deserialize_i16,
        deserialize_i32,
        deserialize_i64,
        deserialize_i128,
        deserialize_u8,
        deserialize_u16,
        deserialize_u32,
        deserialize_u64,
        deserialize_u128,
        deserialize_f32,
        deserialize_f64,
        deserialize_char,
        deserialize_str,
        deserialize_string,
        deserialize_bytes,
        deserialize_byte_buf,
        deserialize_identifier,
    }

    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_unit()
    }
}
