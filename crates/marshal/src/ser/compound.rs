//! Sequence, map, struct and enum-variant serializers

use super::key::MapKeySerializer;
use super::{Encoded, Serializer};
use crate::descriptor::RecordDescriptor;
use crate::error::{Error, Result};
use crate::marshaler::Aliases;
use attrdoc_core::AttributeValue;
use serde::ser::{self, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::trace;

/// Encode one child value, turning a shape rejection into "leave it out"
fn encode_slot<T>(value: &T, aliases: Aliases<'_>, slot: &str) -> Result<Option<Encoded>>
where
    T: ?Sized + Serialize,
{
    match value.serialize(Serializer::new(aliases)) {
        Ok(encoded) => Ok(Some(encoded)),
        Err(Error::UnsupportedFieldShape(shape)) => {
            trace!(slot, shape = %shape, "omitting value without attribute form");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// `{variant: payload}`
pub(super) fn tagged(variant: &str, payload: AttributeValue) -> Encoded {
    let mut entries = HashMap::with_capacity(1);
    entries.insert(variant.to_owned(), payload);
    Encoded::Value(AttributeValue::M(entries))
}

// ============================================================================
// Sequences
// ============================================================================

pub(crate) struct SeqSerializer<'a> {
    aliases: Aliases<'a>,
    elements: Vec<Encoded>,
}

impl<'a> SeqSerializer<'a> {
    pub(super) fn new(aliases: Aliases<'a>, len: Option<usize>) -> Self {
        Self {
            aliases,
            elements: Vec::with_capacity(len.unwrap_or(0)),
        }
    }

    fn push<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let slot = self.elements.len().to_string();
        if let Some(encoded) = encode_slot(value, self.aliases, &slot)? {
            self.elements.push(encoded);
        }
        Ok(())
    }

    fn finish(self) -> AttributeValue {
        classify(self.elements)
    }
}

/// Pick the attribute form of a sequence from the shape of its elements
///
/// Empty is `NULL`, all bytes is `B`, all distinct strings is `SS`, all
/// distinct numbers is `NS`, anything else is `L`.
fn classify(elements: Vec<Encoded>) -> AttributeValue {
    if elements.is_empty() {
        return AttributeValue::Null;
    }

    if elements.iter().all(|e| matches!(e, Encoded::Byte(_))) {
        let bytes = elements
            .into_iter()
            .filter_map(|e| match e {
                Encoded::Byte(b) => Some(b),
                Encoded::Value(_) => None,
            })
            .collect();
        return AttributeValue::B(bytes);
    }

    let values: Vec<AttributeValue> = elements.into_iter().map(AttributeValue::from).collect();
    if let Some(texts) = scalar_set(&values, AttributeValue::as_s) {
        return AttributeValue::Ss(texts);
    }
    if let Some(numbers) = scalar_set(&values, AttributeValue::as_n) {
        return AttributeValue::Ns(numbers);
    }
    AttributeValue::L(values)
}

/// Texts of `values` if every one has the scalar kind `pick` selects and no
/// two are equal
fn scalar_set(
    values: &[AttributeValue],
    pick: fn(&AttributeValue) -> Option<&str>,
) -> Option<Vec<String>> {
    let mut seen = HashSet::with_capacity(values.len());
    let mut texts = Vec::with_capacity(values.len());
    for value in values {
        let text = pick(value)?;
        if !seen.insert(text) {
            return None;
        }
        texts.push(text.to_owned());
    }
    Some(texts)
}

impl<'a> ser::SerializeSeq for SeqSerializer<'a> {
    type Ok = Encoded;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Encoded> {
        Ok(Encoded::Value(self.finish()))
    }
}

impl<'a> ser::SerializeTuple for SeqSerializer<'a> {
    type Ok = Encoded;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Encoded> {
        Ok(Encoded::Value(self.finish()))
    }
}

impl<'a> ser::SerializeTupleStruct for SeqSerializer<'a> {
    type Ok = Encoded;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Encoded> {
        Ok(Encoded::Value(self.finish()))
    }
}

// ============================================================================
// Maps
// ============================================================================

pub(crate) struct MapSerializer<'a> {
    aliases: Aliases<'a>,
    entries: HashMap<String, AttributeValue>,
    pending_key: Option<String>,
}

impl<'a> MapSerializer<'a> {
    pub(super) fn new(aliases: Aliases<'a>, len: Option<usize>) -> Self {
        Self {
            aliases,
            entries: HashMap::with_capacity(len.unwrap_or(0)),
            pending_key: None,
        }
    }
}

impl<'a> ser::SerializeMap for MapSerializer<'a> {
    type Ok = Encoded;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.pending_key = Some(key.serialize(MapKeySerializer)?);
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .pending_key
            .take()
            .ok_or_else(|| Error::Custom("map value serialized before its key".to_string()))?;
        if let Some(encoded) = encode_slot(value, self.aliases, &key)? {
            self.entries.insert(key, encoded.into());
        }
        Ok(())
    }

    fn end(self) -> Result<Encoded> {
        Ok(Encoded::Value(AttributeValue::map(self.entries)))
    }
}

// ============================================================================
// Structs
// ============================================================================

pub(crate) struct StructSerializer<'a> {
    aliases: Aliases<'a>,
    descriptor: Option<RecordDescriptor>,
    fields: HashMap<String, AttributeValue>,
}

impl<'a> StructSerializer<'a> {
    pub(super) fn new(
        aliases: Aliases<'a>,
        descriptor: Option<RecordDescriptor>,
        len: usize,
    ) -> Self {
        Self {
            aliases,
            descriptor,
            fields: HashMap::with_capacity(len),
        }
    }

    fn push<T>(&mut self, field: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        if let Some(encoded) = encode_slot(value, self.aliases, field)? {
            let name = match &self.descriptor {
                Some(descriptor) => descriptor.wire_name(field),
                None => field,
            };
            self.fields.insert(name.to_owned(), encoded.into());
        }
        Ok(())
    }

    fn finish(self) -> AttributeValue {
        AttributeValue::map(self.fields)
    }
}

impl<'a> ser::SerializeStruct for StructSerializer<'a> {
    type Ok = Encoded;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(key, value)
    }

    fn end(self) -> Result<Encoded> {
        Ok(Encoded::Value(self.finish()))
    }
}

// ============================================================================
// Enum variants with payload
// ============================================================================

pub(crate) struct VariantSerializer<S> {
    variant: &'static str,
    inner: S,
}

impl<S> VariantSerializer<S> {
    pub(super) fn new(variant: &'static str, inner: S) -> Self {
        Self { variant, inner }
    }
}

impl<'a> ser::SerializeTupleVariant for VariantSerializer<SeqSerializer<'a>> {
    type Ok = Encoded;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.inner.push(value)
    }

    fn end(self) -> Result<Encoded> {
        Ok(tagged(self.variant, self.inner.finish()))
    }
}

impl<'a> ser::SerializeStructVariant for VariantSerializer<StructSerializer<'a>> {
    type Ok = Encoded;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.inner.push(key, value)
    }

    fn end(self) -> Result<Encoded> {
        Ok(tagged(self.variant, self.inner.finish()))
    }
}
