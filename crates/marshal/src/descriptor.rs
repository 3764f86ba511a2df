//! Compile-time record metadata
//!
//! A [`RecordDescriptor`] lists the fields of a record that carry metadata:
//! which field is the partition key, which is the sort key, the declared key
//! type and the wire alias. Fields without metadata need not be listed.
//!
//! Descriptors are `const` data built with `const fn` helpers:
//!
//! ```
//! use attrdoc_marshal::{FieldDescriptor, RecordDescriptor, ScalarType};
//!
//! const ORDER: RecordDescriptor = RecordDescriptor::new(
//!     "Order",
//!     &[
//!         FieldDescriptor::primary("customer"),
//!         FieldDescriptor::sort("placed_at").wire_type(ScalarType::Number),
//!         FieldDescriptor::new("status").alias("#status"),
//!     ],
//! );
//!
//! assert_eq!(ORDER.wire_name("status"), "#status");
//! assert_eq!(ORDER.field_name("#status"), "status");
//! ```

use crate::error::{Error, Result};
use attrdoc_core::ScalarType;
use std::collections::HashSet;

/// Key role of a record field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyRole {
    /// Ordinary attribute
    #[default]
    None,
    /// Partition (primary) key
    Primary,
    /// Sort (secondary) key
    Sort,
}

/// Metadata for one record field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Field name as the record's `Serialize` impl emits it
    pub name: &'static str,
    /// Key role
    pub role: KeyRole,
    /// Declared key type; inferred from the encoded value when absent
    pub wire_type: Option<ScalarType>,
    /// Name stored on the wire instead of `name`
    pub alias: Option<&'static str>,
}

impl FieldDescriptor {
    /// Ordinary field
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            role: KeyRole::None,
            wire_type: None,
            alias: None,
        }
    }

    /// Partition key field
    pub const fn primary(name: &'static str) -> Self {
        Self {
            role: KeyRole::Primary,
            ..Self::new(name)
        }
    }

    /// Sort key field
    pub const fn sort(name: &'static str) -> Self {
        Self {
            role: KeyRole::Sort,
            ..Self::new(name)
        }
    }

    /// Store the field under `alias`
    pub const fn alias(self, alias: &'static str) -> Self {
        Self {
            alias: Some(alias),
            ..self
        }
    }

    /// Declare the key type instead of inferring it
    pub const fn wire_type(self, wire_type: ScalarType) -> Self {
        Self {
            wire_type: Some(wire_type),
            ..self
        }
    }

    /// Name of the attribute this field is stored under
    pub fn wire_name(&self) -> &'static str {
        self.alias.unwrap_or(self.name)
    }
}

/// Metadata for one record type
///
/// `name` must be the serde container name of the record (the struct name
/// unless renamed with `#[serde(rename = "...")]`). Nested records are
/// matched to registered descriptors by that name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordDescriptor {
    /// Serde container name
    pub name: &'static str,
    /// Fields carrying metadata
    pub fields: &'static [FieldDescriptor],
}

impl RecordDescriptor {
    /// Create a descriptor
    pub const fn new(name: &'static str, fields: &'static [FieldDescriptor]) -> Self {
        Self { name, fields }
    }

    /// Descriptor of a record without field metadata
    pub const fn plain(name: &'static str) -> Self {
        Self { name, fields: &[] }
    }

    /// Look up a field by its declared name
    pub fn field(&self, name: &str) -> Option<&'static FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Attribute name for a declared field name: the alias if one is
    /// declared, the field name otherwise
    pub fn wire_name<'a>(&self, field: &'a str) -> &'a str {
        match self.field(field).and_then(|f| f.alias) {
            Some(alias) => alias,
            None => field,
        }
    }

    /// Declared field name for an attribute name; inverse of [`wire_name`]
    ///
    /// [`wire_name`]: RecordDescriptor::wire_name
    pub fn field_name<'a>(&self, wire: &'a str) -> &'a str {
        match self.fields.iter().find(|f| f.alias == Some(wire)) {
            Some(field) => field.name,
            None => wire,
        }
    }

    /// First field with the partition key role
    pub fn primary(&self) -> Option<&'static FieldDescriptor> {
        self.role(KeyRole::Primary)
    }

    /// First field with the sort key role
    pub fn sort(&self) -> Option<&'static FieldDescriptor> {
        self.role(KeyRole::Sort)
    }

    fn role(&self, role: KeyRole) -> Option<&'static FieldDescriptor> {
        self.fields.iter().find(|f| f.role == role)
    }

    /// Declared aliases as `(field, alias)` pairs
    pub fn aliases(&self) -> impl Iterator<Item = (&'static str, &'static str)> {
        self.fields
            .iter()
            .filter_map(|f| f.alias.map(|alias| (f.name, alias)))
    }

    /// Check the descriptor for inconsistencies
    ///
    /// Rejects aliases without the `sentinel` prefix, more than one field per
    /// key role, a sort key without a partition key, and two fields sharing
    /// an attribute name.
    pub fn validate(&self, sentinel: char) -> Result<()> {
        let invalid = |reason: String| Error::InvalidDescriptor {
            record: self.name,
            reason,
        };

        if self.name.is_empty() {
            return Err(invalid("record name is empty".to_string()));
        }

        let mut wire_names = HashSet::with_capacity(self.fields.len());
        let mut primaries = 0;
        let mut sorts = 0;

        for field in self.fields {
            if field.name.is_empty() {
                return Err(invalid("field name is empty".to_string()));
            }
            if let Some(alias) = field.alias {
                let body = alias.strip_prefix(sentinel).unwrap_or("");
                if body.is_empty() {
                    return Err(invalid(format!(
                        "alias {alias:?} of field {} must be {sentinel:?} followed by a name",
                        field.name
                    )));
                }
            }
            if !wire_names.insert(field.wire_name()) {
                return Err(invalid(format!(
                    "attribute name {:?} is used by more than one field",
                    field.wire_name()
                )));
            }
            match field.role {
                KeyRole::Primary => primaries += 1,
                KeyRole::Sort => sorts += 1,
                KeyRole::None => {}
            }
        }

        if primaries > 1 {
            return Err(invalid("more than one partition key field".to_string()));
        }
        if sorts > 1 {
            return Err(invalid("more than one sort key field".to_string()));
        }
        if sorts == 1 && primaries == 0 {
            return Err(invalid("sort key declared without a partition key".to_string()));
        }
        Ok(())
    }
}
