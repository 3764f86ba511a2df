//! Marshaler: descriptor registry and entry point
//!
//! A [`Marshaler`] is built once, is immutable afterwards, and can be shared
//! across threads. It holds the descriptors of every record type that may
//! appear nested inside another record, so their field aliases apply at any
//! depth. The top-level record's own descriptor is always used, registered
//! or not.
//!
//! ## Example
//!
//! ```
//! use attrdoc_marshal::{FieldDescriptor, Marshaler, Record, RecordDescriptor};
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Tag {
//!     label: String,
//! }
//!
//! impl Record for Tag {
//!     const DESCRIPTOR: RecordDescriptor =
//!         RecordDescriptor::new("Tag", &[FieldDescriptor::new("label").alias("@label")]);
//! }
//!
//! let marshaler = Marshaler::builder()
//!     .alias_sentinel('@')
//!     .register::<Tag>()
//!     .build()
//!     .unwrap();
//! assert!(marshaler.descriptor("Tag").is_some());
//! ```

use crate::de;
use crate::descriptor::RecordDescriptor;
use crate::error::{Error, Result};
use crate::keys::{self, KeyAttribute};
use crate::record::Record;
use crate::ser;
use attrdoc_core::{AttributeValue, Item, KeyDefinition};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, trace};

/// Alias sentinel used unless configured otherwise
pub const DEFAULT_ALIAS_SENTINEL: char = '#';

/// Descriptors by serde container name
#[derive(Debug, Clone, Default)]
pub(crate) struct Registry {
    descriptors: HashMap<&'static str, RecordDescriptor>,
}

impl Registry {
    fn get(&self, name: &str) -> Option<RecordDescriptor> {
        self.descriptors.get(name).copied()
    }
}

/// Descriptor lookup used while walking a value
#[derive(Debug, Clone, Copy)]
pub(crate) struct Aliases<'a> {
    registry: Option<&'a Registry>,
    root: Option<RecordDescriptor>,
}

impl Aliases<'static> {
    /// No descriptors: fields keep their declared names
    pub(crate) const NONE: Self = Aliases {
        registry: None,
        root: None,
    };
}

impl<'a> Aliases<'a> {
    pub(crate) fn new(registry: &'a Registry, root: Option<RecordDescriptor>) -> Self {
        Self {
            registry: Some(registry),
            root,
        }
    }

    /// Descriptor of the struct serde calls `name`
    pub(crate) fn lookup(&self, name: &str) -> Option<RecordDescriptor> {
        match self.root {
            Some(root) if root.name == name => Some(root),
            _ => self.registry.and_then(|registry| registry.get(name)),
        }
    }
}

/// Encoder, decoder and key introspector over a set of record descriptors
#[derive(Debug, Clone)]
pub struct Marshaler {
    registry: Registry,
    sentinel: char,
}

impl Default for Marshaler {
    fn default() -> Self {
        Self::new()
    }
}

impl Marshaler {
    /// Marshaler with no registered descriptors and the default sentinel
    pub fn new() -> Self {
        Self {
            registry: Registry::default(),
            sentinel: DEFAULT_ALIAS_SENTINEL,
        }
    }

    /// Start configuring a marshaler
    pub fn builder() -> MarshalerBuilder {
        MarshalerBuilder::new()
    }

    /// Prefix every alias must start with
    pub fn alias_sentinel(&self) -> char {
        self.sentinel
    }

    /// Registered descriptor by record name
    pub fn descriptor(&self, record: &str) -> Option<RecordDescriptor> {
        self.registry.get(record)
    }

    /// Validate the record's own descriptor, registered or not
    pub(crate) fn check<T: Record>(&self) -> Result<()> {
        T::DESCRIPTOR.validate(self.sentinel)
    }

    fn aliases_for<T: Record>(&self) -> Result<Aliases<'_>> {
        self.check::<T>()?;
        Ok(Aliases::new(&self.registry, Some(T::DESCRIPTOR)))
    }

    fn aliases(&self) -> Aliases<'_> {
        Aliases::new(&self.registry, None)
    }

    /// Encode a record into an item
    ///
    /// Uses the record's [`CustomMarshaler`](crate::CustomMarshaler) when it
    /// provides one.
    pub fn encode<T: Record>(&self, record: &T) -> Result<Item> {
        let aliases = self.aliases_for::<T>()?;
        if let Some(custom) = record.custom_marshaler() {
            trace!(record = T::DESCRIPTOR.name, "encoding with custom marshaler");
            return custom.marshal();
        }
        ser::encode_item(record, aliases)
    }

    /// Encode any value into an item
    ///
    /// Maps and structs become the item itself, sequences become entries keyed
    /// by decimal index, and any other value is stored under
    /// [`ROOT_ATTRIBUTE`](crate::ROOT_ATTRIBUTE).
    pub fn encode_value<T>(&self, value: &T) -> Result<Item>
    where
        T: ?Sized + Serialize,
    {
        ser::encode_item(value, self.aliases())
    }

    /// Encode any value into a single attribute value
    pub fn to_attribute_value<T>(&self, value: &T) -> Result<AttributeValue>
    where
        T: ?Sized + Serialize,
    {
        ser::encode_value(value, self.aliases())
    }

    /// Decode a record from an item
    ///
    /// Uses the record's unmarshaler when it provides one.
    pub fn decode<T>(&self, item: &Item) -> Result<T>
    where
        T: Record + DeserializeOwned,
    {
        let aliases = self.aliases_for::<T>()?;
        if let Some(unmarshal) = T::unmarshaler() {
            trace!(record = T::DESCRIPTOR.name, "decoding with custom unmarshaler");
            return unmarshal(item);
        }
        de::decode_item(item, aliases)
    }

    /// Decode any value from an item
    pub fn decode_value<T: DeserializeOwned>(&self, item: &Item) -> Result<T> {
        de::decode_item(item, self.aliases())
    }

    /// Decode any value from a single attribute value
    pub fn from_attribute_value<T: DeserializeOwned>(&self, value: &AttributeValue) -> Result<T> {
        de::decode_value(value, self.aliases())
    }

    /// Resolve the partition key of a record
    pub fn partition_key<T: Record>(&self, record: &T) -> Result<KeyAttribute> {
        keys::partition_key(self, record)
    }

    /// Resolve the sort key of a record, `None` when it has none
    pub fn sort_key<T: Record>(&self, record: &T) -> Result<Option<KeyAttribute>> {
        keys::sort_key(self, record)
    }

    /// Key attributes of a record: partition key plus optional sort key
    pub fn key_attributes<T: Record>(&self, record: &T) -> Result<Item> {
        keys::key_attributes(self, record)
    }

    /// Key schema of a record
    pub fn key_definition<T: Record>(&self, record: &T) -> Result<KeyDefinition> {
        keys::key_definition(self, record)
    }

    /// Encoded value of one attribute of a record
    ///
    /// `name` is a field name or alias for structs, a key for maps, or a
    /// decimal index for sequences.
    pub fn attribute_value<T: Record>(&self, record: &T, name: &str) -> Result<Option<AttributeValue>> {
        keys::attribute_value(self, record, name)
    }
}

/// Builder for [`Marshaler`]
///
/// ```
/// use attrdoc_marshal::Marshaler;
///
/// let marshaler = Marshaler::builder().alias_sentinel('$').build().unwrap();
/// assert_eq!(marshaler.alias_sentinel(), '$');
/// ```
#[derive(Debug, Clone)]
pub struct MarshalerBuilder {
    sentinel: char,
    descriptors: Vec<RecordDescriptor>,
}

impl Default for MarshalerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MarshalerBuilder {
    /// Builder with the default sentinel and no descriptors
    pub fn new() -> Self {
        Self {
            sentinel: DEFAULT_ALIAS_SENTINEL,
            descriptors: Vec::new(),
        }
    }

    /// Prefix every alias must start with
    pub fn alias_sentinel(mut self, sentinel: char) -> Self {
        self.sentinel = sentinel;
        self
    }

    /// Register a record type's descriptor
    pub fn register<T: Record>(self) -> Self {
        self.descriptor(T::DESCRIPTOR)
    }

    /// Register a descriptor directly
    pub fn descriptor(mut self, descriptor: RecordDescriptor) -> Self {
        self.descriptors.push(descriptor);
        self
    }

    /// Validate every descriptor and build the marshaler
    ///
    /// Fails with [`Error::InvalidDescriptor`] on the first malformed
    /// descriptor, or when two different descriptors share a record name.
    pub fn build(self) -> Result<Marshaler> {
        let mut registry = Registry::default();
        for descriptor in self.descriptors {
            descriptor.validate(self.sentinel)?;
            match registry.descriptors.get(descriptor.name) {
                Some(existing) if *existing != descriptor => {
                    return Err(Error::InvalidDescriptor {
                        record: descriptor.name,
                        reason: "another descriptor is registered under the same name".to_string(),
                    });
                }
                Some(_) => {}
                None => {
                    registry.descriptors.insert(descriptor.name, descriptor);
                }
            }
        }
        debug!(
            records = registry.descriptors.len(),
            sentinel = %self.sentinel,
            "marshaler built"
        );
        Ok(Marshaler {
            registry,
            sentinel: self.sentinel,
        })
    }
}
