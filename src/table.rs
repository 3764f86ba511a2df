//! Table service consumed by the document store.
//!
//! [`TableService`] is the narrow put/get/delete surface the CRUD layer
//! needs from a key-value store. [`MemoryTable`] implements it in process.

use attrdoc_core::{AttributeValue, Item, KeyDefinition, ScalarType};
use parking_lot::RwLock;
use std::collections::HashMap;
use thiserror::Error;
use tracing::trace;

/// Errors reported by a table service
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ServiceError {
    /// No table with this name
    #[error("table not found: {0}")]
    TableNotFound(String),

    /// A table with this name already exists
    #[error("table already exists: {0}")]
    TableExists(String),

    /// The put condition did not hold
    #[error("conditional check failed: {0}")]
    ConditionalCheckFailed(String),

    /// Missing or mistyped key attributes
    #[error("invalid key: {0}")]
    InvalidKey(String),
}

/// Guard evaluated against the stored item before a put
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PutCondition {
    /// Only write when no stored item carries this attribute
    AttributeNotExists(String),
}

/// Item-level operations of a key-value store
pub trait TableService: Send + Sync {
    /// Write an item, replacing any item under the same key
    fn put_item(
        &self,
        table: &str,
        item: Item,
        condition: Option<PutCondition>,
    ) -> Result<(), ServiceError>;

    /// Read the item under `key`, which holds exactly the key attributes
    fn get_item(&self, table: &str, key: &Item) -> Result<Option<Item>, ServiceError>;

    /// Remove the item under `key`; removing a missing item succeeds
    fn delete_item(&self, table: &str, key: &Item) -> Result<(), ServiceError>;
}

struct Table {
    key: KeyDefinition,
    /// Items by canonical key text
    items: HashMap<String, Item>,
}

impl Table {
    /// Canonical key text of an item: the wire JSON of its key attributes
    fn canonical_key(&self, table: &str, item: &Item) -> Result<String, ServiceError> {
        let mut key = Item::new();
        for definition in std::iter::once(&self.key.primary).chain(self.key.sort.as_ref()) {
            let value = item.get(&definition.name).ok_or_else(|| {
                ServiceError::InvalidKey(format!(
                    "{table}: missing key attribute {}",
                    definition.name
                ))
            })?;
            check_key_type(table, &definition.name, definition.scalar_type, value)?;
            key.insert(definition.name.clone(), value.clone());
        }
        Ok(attrdoc_wire::encode_item(&key))
    }
}

fn check_key_type(
    table: &str,
    name: &str,
    expected: ScalarType,
    value: &AttributeValue,
) -> Result<(), ServiceError> {
    match ScalarType::of(value) {
        Some(found) if found == expected => Ok(()),
        _ => Err(ServiceError::InvalidKey(format!(
            "{table}: key attribute {name} must be {}, found {}",
            expected.tag(),
            value.tag()
        ))),
    }
}

/// In-memory [`TableService`]
///
/// ```
/// use attrdoc::{AttributeDefinition, AttributeValue, Item, KeyDefinition, MemoryTable, TableService};
///
/// let tables = MemoryTable::new();
/// let key = KeyDefinition::partition(AttributeDefinition::string("id")).unwrap();
/// tables.create_table("docs", key).unwrap();
///
/// let mut item = Item::new();
/// item.insert("id".into(), AttributeValue::S("a".into()));
/// tables.put_item("docs", item.clone(), None).unwrap();
/// assert_eq!(tables.get_item("docs", &item).unwrap(), Some(item));
/// ```
#[derive(Default)]
pub struct MemoryTable {
    tables: RwLock<HashMap<String, Table>>,
}

impl MemoryTable {
    /// Create a service with no tables
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a table with its key schema
    pub fn create_table(&self, name: &str, key: KeyDefinition) -> Result<(), ServiceError> {
        let mut tables = self.tables.write();
        if tables.contains_key(name) {
            return Err(ServiceError::TableExists(name.to_string()));
        }
        tables.insert(
            name.to_string(),
            Table {
                key,
                items: HashMap::new(),
            },
        );
        Ok(())
    }

    /// Remove a table and all its items
    pub fn drop_table(&self, name: &str) -> Result<(), ServiceError> {
        self.tables
            .write()
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| ServiceError::TableNotFound(name.to_string()))
    }

    /// Names of all tables, sorted
    pub fn table_names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.tables.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Key schema of a table
    pub fn key_definition(&self, name: &str) -> Option<KeyDefinition> {
        self.tables.read().get(name).map(|t| t.key.clone())
    }

    /// Number of items stored in a table
    pub fn item_count(&self, name: &str) -> Result<usize, ServiceError> {
        self.tables
            .read()
            .get(name)
            .map(|t| t.items.len())
            .ok_or_else(|| ServiceError::TableNotFound(name.to_string()))
    }
}

impl TableService for MemoryTable {
    fn put_item(
        &self,
        table: &str,
        item: Item,
        condition: Option<PutCondition>,
    ) -> Result<(), ServiceError> {
        let mut tables = self.tables.write();
        let entry = tables
            .get_mut(table)
            .ok_or_else(|| ServiceError::TableNotFound(table.to_string()))?;
        let key = entry.canonical_key(table, &item)?;

        if let Some(PutCondition::AttributeNotExists(name)) = &condition {
            let exists = entry
                .items
                .get(&key)
                .is_some_and(|stored| stored.contains_key(name));
            if exists {
                return Err(ServiceError::ConditionalCheckFailed(format!(
                    "{table}: attribute {name} already exists for key {key}"
                )));
            }
        }

        trace!(table, key = %key, "put item");
        entry.items.insert(key, item);
        Ok(())
    }

    fn get_item(&self, table: &str, key: &Item) -> Result<Option<Item>, ServiceError> {
        let tables = self.tables.read();
        let entry = tables
            .get(table)
            .ok_or_else(|| ServiceError::TableNotFound(table.to_string()))?;
        let key = entry.canonical_key(table, key)?;
        Ok(entry.items.get(&key).cloned())
    }

    fn delete_item(&self, table: &str, key: &Item) -> Result<(), ServiceError> {
        let mut tables = self.tables.write();
        let entry = tables
            .get_mut(table)
            .ok_or_else(|| ServiceError::TableNotFound(table.to_string()))?;
        let key = entry.canonical_key(table, key)?;
        trace!(table, key = %key, "delete item");
        entry.items.remove(&key);
        Ok(())
    }
}
