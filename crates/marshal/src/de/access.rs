//! Sequence, map, struct and enum access for the decoder

use super::key::KeyDeserializer;
use super::{Deserializer, Node};
use crate::descriptor::RecordDescriptor;
use crate::error::{Error, Result};
use crate::marshaler::Aliases;
use attrdoc_core::AttributeValue;
use serde::de::value::BorrowedStrDeserializer;
use serde::de::{self, DeserializeSeed, Visitor};
use std::collections::hash_map;
use std::collections::HashMap;

pub(crate) struct SeqAccessor<'a, I> {
    elements: I,
    aliases: Aliases<'a>,
}

impl<'a, I> SeqAccessor<'a, I> {
    pub(super) fn new(elements: I, aliases: Aliases<'a>) -> Self {
        Self { elements, aliases }
    }
}

impl<'de, 'a, I> de::SeqAccess<'de> for SeqAccessor<'a, I>
where
    I: Iterator<Item = Node<'de>>,
{
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: DeserializeSeed<'de>,
    {
        match self.elements.next() {
            Some(node) => seed.deserialize(Deserializer::new(node, self.aliases)).map(Some),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        match self.elements.size_hint() {
            (lower, Some(upper)) if lower == upper => Some(upper),
            _ => None,
        }
    }
}

/// Entries of an `M` value read as a map with text-parsed keys
pub(crate) struct MapAccessor<'de, 'a> {
    entries: Option<hash_map::Iter<'de, String, AttributeValue>>,
    pending: Option<&'de AttributeValue>,
    aliases: Aliases<'a>,
}

impl<'de, 'a> MapAccessor<'de, 'a> {
    pub(super) fn new(
        entries: Option<&'de HashMap<String, AttributeValue>>,
        aliases: Aliases<'a>,
    ) -> Self {
        Self {
            entries: entries.map(|entries| entries.iter()),
            pending: None,
            aliases,
        }
    }
}

impl<'de, 'a> de::MapAccess<'de> for MapAccessor<'de, 'a> {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: DeserializeSeed<'de>,
    {
        let Some((key, value)) = self.entries.as_mut().and_then(Iterator::next) else {
            return Ok(None);
        };
        self.pending = Some(value);
        seed.deserialize(KeyDeserializer::new(key)).map(Some)
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: DeserializeSeed<'de>,
    {
        let value = self
            .pending
            .take()
            .ok_or_else(|| Error::Custom("map value requested before its key".to_string()))?;
        seed.deserialize(Deserializer::new(Node::Value(value), self.aliases))
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.entries.as_ref().map_or(0, ExactSizeIterator::len))
    }
}

/// Declared fields of a struct, each looked up under its attribute name
///
/// Every declared field is visited exactly once: present attributes decode
/// normally, missing ones decode through [`Node::Absent`] to their zero
/// value. Attributes that match no declared field are never visited.
pub(crate) struct StructAccessor<'de, 'a> {
    entries: Option<&'de HashMap<String, AttributeValue>>,
    fields: std::slice::Iter<'static, &'static str>,
    descriptor: Option<RecordDescriptor>,
    pending: Node<'de>,
    aliases: Aliases<'a>,
}

impl<'de, 'a> StructAccessor<'de, 'a> {
    pub(super) fn new(
        entries: Option<&'de HashMap<String, AttributeValue>>,
        fields: &'static [&'static str],
        descriptor: Option<RecordDescriptor>,
        aliases: Aliases<'a>,
    ) -> Self {
        Self {
            entries,
            fields: fields.iter(),
            descriptor,
            pending: Node::Absent,
            aliases,
        }
    }
}

impl<'de, 'a> de::MapAccess<'de> for StructAccessor<'de, 'a> {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: DeserializeSeed<'de>,
    {
        let Some(&field) = self.fields.next() else {
            return Ok(None);
        };
        let attribute = match &self.descriptor {
            Some(descriptor) => descriptor.wire_name(field),
            None => field,
        };
        self.pending = self
            .entries
            .and_then(|entries| entries.get(attribute))
            .map_or(Node::Absent, Node::Value);

        let key: BorrowedStrDeserializer<'de, Error> = BorrowedStrDeserializer::new(field);
        seed.deserialize(key).map(Some)
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: DeserializeSeed<'de>,
    {
        let node = std::mem::replace(&mut self.pending, Node::Absent);
        seed.deserialize(Deserializer::new(node, self.aliases))
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.fields.len())
    }
}

/// `{variant: payload}` read as an enum
pub(crate) struct EnumAccessor<'de, 'a> {
    variant: &'de str,
    payload: &'de AttributeValue,
    aliases: Aliases<'a>,
}

impl<'de, 'a> EnumAccessor<'de, 'a> {
    pub(super) fn new(variant: &'de str, payload: &'de AttributeValue, aliases: Aliases<'a>) -> Self {
        Self {
            variant,
            payload,
            aliases,
        }
    }
}

impl<'de, 'a> de::EnumAccess<'de> for EnumAccessor<'de, 'a> {
    type Error = Error;
    type Variant = Deserializer<'de, 'a>;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self::Variant)>
    where
        V: DeserializeSeed<'de>,
    {
        let key: BorrowedStrDeserializer<'de, Error> = BorrowedStrDeserializer::new(self.variant);
        let variant = seed.deserialize(key)?;
        Ok((
            variant,
            Deserializer::new(Node::Value(self.payload), self.aliases),
        ))
    }
}

impl<'de, 'a> de::VariantAccess<'de> for Deserializer<'de, 'a> {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        Ok(())
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value>
    where
        T: DeserializeSeed<'de>,
    {
        seed.deserialize(self)
    }

    fn tuple_variant<V>(self, len: usize, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        de::Deserializer::deserialize_tuple(self, len, visitor)
    }

    fn struct_variant<V>(self, fields: &'static [&'static str], visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        de::Deserializer::deserialize_struct(self, "", fields, visitor)
    }
}
