//! Key schema types
//!
//! A table is addressed by a mandatory primary (partition) attribute and an
//! optional sort attribute. Both must be scalar: string, number or binary.

use crate::attribute::AttributeValue;
use crate::error::ModelError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Scalar wire type allowed for key attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScalarType {
    /// `S`
    #[serde(rename = "S")]
    String,
    /// `N`
    #[serde(rename = "N")]
    Number,
    /// `B`
    #[serde(rename = "B")]
    Binary,
}

impl ScalarType {
    /// Wire tag of this type
    pub fn tag(&self) -> &'static str {
        match self {
            ScalarType::String => "S",
            ScalarType::Number => "N",
            ScalarType::Binary => "B",
        }
    }

    /// Scalar type of an attribute value, if it is a key-capable scalar
    pub fn of(value: &AttributeValue) -> Option<ScalarType> {
        match value {
            AttributeValue::S(_) => Some(ScalarType::String),
            AttributeValue::N(_) => Some(ScalarType::Number),
            AttributeValue::B(_) => Some(ScalarType::Binary),
            _ => None,
        }
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for ScalarType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "S" => Ok(ScalarType::String),
            "N" => Ok(ScalarType::Number),
            "B" => Ok(ScalarType::Binary),
            other => Err(ModelError::UnknownScalarType(other.to_string())),
        }
    }
}

/// Name and scalar type of one key attribute
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttributeDefinition {
    /// Attribute name as stored on the wire
    pub name: String,
    /// Scalar type of the attribute
    pub scalar_type: ScalarType,
}

impl AttributeDefinition {
    /// Create a new attribute definition
    pub fn new(name: impl Into<String>, scalar_type: ScalarType) -> Self {
        Self {
            name: name.into(),
            scalar_type,
        }
    }

    /// String-typed attribute definition
    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, ScalarType::String)
    }

    /// Number-typed attribute definition
    pub fn number(name: impl Into<String>) -> Self {
        Self::new(name, ScalarType::Number)
    }

    /// Binary-typed attribute definition
    pub fn binary(name: impl Into<String>) -> Self {
        Self::new(name, ScalarType::Binary)
    }
}

/// Primary key schema of a table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyDefinition {
    /// Partition attribute (required)
    pub primary: AttributeDefinition,
    /// Sort attribute (optional)
    pub sort: Option<AttributeDefinition>,
}

impl KeyDefinition {
    /// Create a key definition, validating attribute names
    pub fn new(
        primary: AttributeDefinition,
        sort: Option<AttributeDefinition>,
    ) -> Result<Self, ModelError> {
        if primary.name.is_empty() {
            return Err(ModelError::EmptyKeyName);
        }
        if let Some(sort) = &sort {
            if sort.name.is_empty() {
                return Err(ModelError::EmptyKeyName);
            }
            if sort.name == primary.name {
                return Err(ModelError::DuplicateKeyName(sort.name.clone()));
            }
        }
        Ok(Self { primary, sort })
    }

    /// Key definition with a partition attribute only
    pub fn partition(primary: AttributeDefinition) -> Result<Self, ModelError> {
        Self::new(primary, None)
    }

    /// Names of the key attributes, primary first
    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.primary.name.as_str())
            .chain(self.sort.iter().map(|s| s.name.as_str()))
    }
}
