//! Core types for attrdoc
//!
//! This crate defines the data model shared by every other attrdoc crate:
//!
//! - [`AttributeValue`] and [`Item`]: the discriminated wire-value model of the
//!   document store
//! - [`ScalarType`], [`AttributeDefinition`], [`KeyDefinition`]: key schema
//! - [`Value`]: the untyped host value, the target of "any" decoding
//! - [`ModelError`]: model invariant violations

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod attribute;
pub mod error;
pub mod key;
pub mod value;

pub use attribute::{AttributeValue, Item};
pub use error::ModelError;
pub use key::{AttributeDefinition, KeyDefinition, ScalarType};
pub use value::Value;
