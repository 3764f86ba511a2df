//! Key introspection
//!
//! Finds the partition and sort key of a record. The record's
//! [`KeyRetriever`](crate::KeyRetriever) wins when it has one; otherwise the
//! descriptor's first field with the matching [`KeyRole`] is used, named by
//! its attribute name (the alias when declared).
//!
//! The key type is the declared wire type, or else the scalar type of the
//! encoded value. Key values come from the record's
//! [`AttributeMarshaler`](crate::AttributeMarshaler) when it has one, and from
//! encoding the whole record otherwise.
//!
//! [`KeyRole`]: crate::KeyRole

use crate::error::{Error, Result};
use crate::marshaler::Marshaler;
use crate::record::Record;
use attrdoc_core::{AttributeDefinition, AttributeValue, Item, KeyDefinition, ScalarType};
use tracing::trace;

/// A resolved key attribute: its definition and the record's value for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyAttribute {
    /// Attribute name and scalar type
    pub definition: AttributeDefinition,
    /// The record's value
    pub value: AttributeValue,
}

impl KeyAttribute {
    /// Attribute name
    pub fn name(&self) -> &str {
        &self.definition.name
    }

    /// Scalar type
    pub fn scalar_type(&self) -> ScalarType {
        self.definition.scalar_type
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Partition,
    Sort,
}

/// Where key values come from: the record's attribute marshaler, or one
/// encoding of the whole record shared by every lookup
struct Source<'r, T> {
    marshaler: &'r Marshaler,
    record: &'r T,
    encoded: Option<Item>,
}

impl<'r, T: Record> Source<'r, T> {
    fn new(marshaler: &'r Marshaler, record: &'r T) -> Result<Self> {
        marshaler.check::<T>()?;
        Ok(Self {
            marshaler,
            record,
            encoded: None,
        })
    }

    fn value(&mut self, name: &str) -> Result<Option<AttributeValue>> {
        if let Some(attributes) = self.record.attribute_marshaler() {
            return Ok(attributes.attribute_value(name));
        }
        let item = match self.encoded.take() {
            Some(item) => item,
            None => self.marshaler.encode(self.record)?,
        };
        let wire = T::DESCRIPTOR.wire_name(name);
        let value = item.get(wire).or_else(|| item.get(name)).cloned();
        self.encoded = Some(item);
        Ok(value)
    }
}

pub(crate) fn partition_key<T: Record>(marshaler: &Marshaler, record: &T) -> Result<KeyAttribute> {
    let mut source = Source::new(marshaler, record)?;
    resolve(&mut source, Slot::Partition)?.ok_or(Error::MissingPrimaryKey)
}

pub(crate) fn sort_key<T: Record>(
    marshaler: &Marshaler,
    record: &T,
) -> Result<Option<KeyAttribute>> {
    resolve(&mut Source::new(marshaler, record)?, Slot::Sort)
}

fn both<T: Record>(
    marshaler: &Marshaler,
    record: &T,
) -> Result<(KeyAttribute, Option<KeyAttribute>)> {
    let mut source = Source::new(marshaler, record)?;
    let primary = resolve(&mut source, Slot::Partition)?.ok_or(Error::MissingPrimaryKey)?;
    let sort = resolve(&mut source, Slot::Sort)?;
    Ok((primary, sort))
}

pub(crate) fn key_attributes<T: Record>(marshaler: &Marshaler, record: &T) -> Result<Item> {
    let (primary, sort) = both(marshaler, record)?;

    let mut key = Item::with_capacity(2);
    key.insert(primary.definition.name, primary.value);
    if let Some(sort) = sort {
        key.insert(sort.definition.name, sort.value);
    }
    Ok(key)
}

pub(crate) fn key_definition<T: Record>(marshaler: &Marshaler, record: &T) -> Result<KeyDefinition> {
    let (primary, sort) = both(marshaler, record)?;
    Ok(KeyDefinition::new(
        primary.definition,
        sort.map(|sort| sort.definition),
    )?)
}

pub(crate) fn attribute_value<T: Record>(
    marshaler: &Marshaler,
    record: &T,
    name: &str,
) -> Result<Option<AttributeValue>> {
    Source::new(marshaler, record)?.value(name)
}

fn resolve<T: Record>(source: &mut Source<'_, T>, slot: Slot) -> Result<Option<KeyAttribute>> {
    let record_name = T::DESCRIPTOR.name;

    let (name, declared) = match source.record.key_retriever() {
        Some(retriever) => {
            let definition = match slot {
                Slot::Partition => retriever.partition_key(),
                Slot::Sort => retriever.sort_key(),
            };
            trace!(record = record_name, slot = ?slot, "key from retriever");
            match definition {
                Some(definition) => (definition.name, Some(definition.scalar_type)),
                None => return Ok(None),
            }
        }
        None => {
            let field = match slot {
                Slot::Partition => T::DESCRIPTOR.primary(),
                Slot::Sort => T::DESCRIPTOR.sort(),
            };
            trace!(record = record_name, slot = ?slot, "key from descriptor");
            match field {
                Some(field) => (field.wire_name().to_string(), field.wire_type),
                None => return Ok(None),
            }
        }
    };

    let value = source
        .value(&name)?
        .ok_or_else(|| Error::MissingKeyAttribute(name.clone()))?;

    let scalar_type = match (declared, ScalarType::of(&value)) {
        (Some(declared), Some(actual)) if declared == actual => declared,
        (None, Some(actual)) => actual,
        _ => {
            return Err(Error::InvalidKeyType {
                name,
                found: value.type_name().to_string(),
            })
        }
    };

    Ok(Some(KeyAttribute {
        definition: AttributeDefinition::new(name, scalar_type),
        value,
    }))
}
