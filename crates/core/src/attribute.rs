//! Attribute value model
//!
//! This module defines [`AttributeValue`], the discriminated union the document
//! store uses for every stored value, and [`Item`], a whole stored document.
//!
//! ## Invariants
//!
//! - Exactly one variant is populated (enforced by the enum)
//! - Numbers are carried as decimal text, never as native floats
//! - Empty collections are `Null`, never an empty `L`, `M` or set
//!
//! The normalizing constructors ([`AttributeValue::list`],
//! [`AttributeValue::map`], [`AttributeValue::string_set`], ...) uphold the
//! last invariant for callers building values by hand.

use std::collections::HashMap;

/// A stored document: attribute name to attribute value
pub type Item = HashMap<String, AttributeValue>;

/// One wire value of the document store
///
/// ## The Ten Variants
///
/// | Variant | Wire tag | Payload |
/// |---------|----------|---------|
/// | `S` | `S` | UTF-8 text |
/// | `N` | `N` | decimal text |
/// | `B` | `B` | bytes |
/// | `Bool` | `BOOL` | boolean |
/// | `Null` | `NULL` | none |
/// | `Ss` | `SS` | non-empty set of text |
/// | `Ns` | `NS` | non-empty set of decimal text |
/// | `Bs` | `BS` | non-empty set of byte strings |
/// | `L` | `L` | ordered list of values |
/// | `M` | `M` | text-keyed map of values |
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeValue {
    /// Text
    S(String),
    /// Number as decimal text
    N(String),
    /// Binary data
    B(Vec<u8>),
    /// Boolean
    Bool(bool),
    /// Null / empty
    Null,
    /// String set
    Ss(Vec<String>),
    /// Number set
    Ns(Vec<String>),
    /// Binary set
    Bs(Vec<Vec<u8>>),
    /// List
    L(Vec<AttributeValue>),
    /// Map
    M(HashMap<String, AttributeValue>),
}

impl AttributeValue {
    /// Wire tag of the populated variant
    pub fn tag(&self) -> &'static str {
        match self {
            AttributeValue::S(_) => "S",
            AttributeValue::N(_) => "N",
            AttributeValue::B(_) => "B",
            AttributeValue::Bool(_) => "BOOL",
            AttributeValue::Null => "NULL",
            AttributeValue::Ss(_) => "SS",
            AttributeValue::Ns(_) => "NS",
            AttributeValue::Bs(_) => "BS",
            AttributeValue::L(_) => "L",
            AttributeValue::M(_) => "M",
        }
    }

    /// Returns the type name as a string (for error messages)
    pub fn type_name(&self) -> &'static str {
        match self {
            AttributeValue::S(_) => "String",
            AttributeValue::N(_) => "Number",
            AttributeValue::B(_) => "Binary",
            AttributeValue::Bool(_) => "Boolean",
            AttributeValue::Null => "Null",
            AttributeValue::Ss(_) => "StringSet",
            AttributeValue::Ns(_) => "NumberSet",
            AttributeValue::Bs(_) => "BinarySet",
            AttributeValue::L(_) => "List",
            AttributeValue::M(_) => "Map",
        }
    }

    /// Binary value, `Null` when empty
    pub fn binary(bytes: impl Into<Vec<u8>>) -> Self {
        let bytes = bytes.into();
        if bytes.is_empty() {
            AttributeValue::Null
        } else {
            AttributeValue::B(bytes)
        }
    }

    /// String set, `Null` when empty
    pub fn string_set<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: Vec<String> = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            AttributeValue::Null
        } else {
            AttributeValue::Ss(values)
        }
    }

    /// Number set, `Null` when empty
    pub fn number_set<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: Vec<String> = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            AttributeValue::Null
        } else {
            AttributeValue::Ns(values)
        }
    }

    /// Binary set, `Null` when empty
    pub fn binary_set<I, B>(values: I) -> Self
    where
        I: IntoIterator<Item = B>,
        B: Into<Vec<u8>>,
    {
        let values: Vec<Vec<u8>> = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            AttributeValue::Null
        } else {
            AttributeValue::Bs(values)
        }
    }

    /// List, `Null` when empty
    pub fn list(values: Vec<AttributeValue>) -> Self {
        if values.is_empty() {
            AttributeValue::Null
        } else {
            AttributeValue::L(values)
        }
    }

    /// Map, `Null` when empty
    pub fn map(values: HashMap<String, AttributeValue>) -> Self {
        if values.is_empty() {
            AttributeValue::Null
        } else {
            AttributeValue::M(values)
        }
    }

    /// Check if this value is null
    pub fn is_null(&self) -> bool {
        matches!(self, AttributeValue::Null)
    }

    /// Check if this value is a key-capable scalar (`S`, `N` or `B`)
    pub fn is_key_scalar(&self) -> bool {
        matches!(
            self,
            AttributeValue::S(_) | AttributeValue::N(_) | AttributeValue::B(_)
        )
    }

    /// Try to get as text
    pub fn as_s(&self) -> Option<&str> {
        match self {
            AttributeValue::S(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get as decimal text
    pub fn as_n(&self) -> Option<&str> {
        match self {
            AttributeValue::N(n) => Some(n),
            _ => None,
        }
    }

    /// Try to get as bytes
    pub fn as_b(&self) -> Option<&[u8]> {
        match self {
            AttributeValue::B(b) => Some(b),
            _ => None,
        }
    }

    /// Try to get as bool
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttributeValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get as string set
    pub fn as_ss(&self) -> Option<&[String]> {
        match self {
            AttributeValue::Ss(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get as number set
    pub fn as_ns(&self) -> Option<&[String]> {
        match self {
            AttributeValue::Ns(n) => Some(n),
            _ => None,
        }
    }

    /// Try to get as binary set
    pub fn as_bs(&self) -> Option<&[Vec<u8>]> {
        match self {
            AttributeValue::Bs(b) => Some(b),
            _ => None,
        }
    }

    /// Try to get as list
    pub fn as_l(&self) -> Option<&[AttributeValue]> {
        match self {
            AttributeValue::L(l) => Some(l),
            _ => None,
        }
    }

    /// Try to get as map
    pub fn as_m(&self) -> Option<&HashMap<String, AttributeValue>> {
        match self {
            AttributeValue::M(m) => Some(m),
            _ => None,
        }
    }
}

impl From<String> for AttributeValue {
    fn from(s: String) -> Self {
        AttributeValue::S(s)
    }
}

impl From<&str> for AttributeValue {
    fn from(s: &str) -> Self {
        AttributeValue::S(s.to_string())
    }
}

impl From<bool> for AttributeValue {
    fn from(b: bool) -> Self {
        AttributeValue::Bool(b)
    }
}

macro_rules! number_from {
    ($($t:ty),*) => {
        $(
            impl From<$t> for AttributeValue {
                fn from(n: $t) -> Self {
                    AttributeValue::N(n.to_string())
                }
            }
        )*
    };
}

number_from!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_match_wire_names() {
        assert_eq!(AttributeValue::S("a".into()).tag(), "S");
        assert_eq!(AttributeValue::N("1".into()).tag(), "N");
        assert_eq!(AttributeValue::B(vec![1]).tag(), "B");
        assert_eq!(AttributeValue::Bool(true).tag(), "BOOL");
        assert_eq!(AttributeValue::Null.tag(), "NULL");
        assert_eq!(AttributeValue::Ss(vec!["a".into()]).tag(), "SS");
        assert_eq!(AttributeValue::Ns(vec!["1".into()]).tag(), "NS");
        assert_eq!(AttributeValue::Bs(vec![vec![1]]).tag(), "BS");
        assert_eq!(AttributeValue::L(vec![AttributeValue::Null]).tag(), "L");
        assert_eq!(AttributeValue::M(HashMap::new()).tag(), "M");
    }

    #[test]
    fn test_empty_collections_normalize_to_null() {
        assert_eq!(AttributeValue::list(vec![]), AttributeValue::Null);
        assert_eq!(AttributeValue::map(HashMap::new()), AttributeValue::Null);
        assert_eq!(
            AttributeValue::string_set(Vec::<String>::new()),
            AttributeValue::Null
        );
        assert_eq!(
            AttributeValue::number_set(Vec::<String>::new()),
            AttributeValue::Null
        );
        assert_eq!(
            AttributeValue::binary_set(Vec::<Vec<u8>>::new()),
            AttributeValue::Null
        );
        assert_eq!(AttributeValue::binary(Vec::new()), AttributeValue::Null);
    }

    #[test]
    fn test_non_empty_constructors_keep_variant() {
        assert_eq!(
            AttributeValue::string_set(["a", "b"]),
            AttributeValue::Ss(vec!["a".to_string(), "b".to_string()])
        );
        assert_eq!(
            AttributeValue::number_set(["1"]),
            AttributeValue::Ns(vec!["1".to_string()])
        );
        assert_eq!(AttributeValue::binary(vec![7]), AttributeValue::B(vec![7]));
    }

    #[test]
    fn test_accessors_are_variant_strict() {
        let n = AttributeValue::N("42".into());
        assert_eq!(n.as_n(), Some("42"));
        assert_eq!(n.as_s(), None);
        assert_eq!(n.as_bool(), None);

        let b = AttributeValue::Bool(false);
        assert_eq!(b.as_bool(), Some(false));
        assert!(b.as_n().is_none());
        assert!(!b.is_key_scalar());
        assert!(n.is_key_scalar());
    }

    #[test]
    fn test_numbers_from_integers() {
        assert_eq!(AttributeValue::from(-5i32), AttributeValue::N("-5".into()));
        assert_eq!(
            AttributeValue::from(u64::MAX),
            AttributeValue::N("18446744073709551615".into())
        );
    }
}
