//! Document CRUD on top of a [`TableService`].
//!
//! The store resolves keys and encodes records through a [`Marshaler`], then
//! hands plain items to the service.

use crate::error::{Error, Result};
use crate::table::{PutCondition, TableService};
use attrdoc_core::Item;
use attrdoc_marshal::{Marshaler, Record};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Typed document operations against one table service.
///
/// # Example
///
/// ```
/// use attrdoc::prelude::*;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize, Debug, PartialEq)]
/// struct Note {
///     id: String,
///     body: String,
/// }
///
/// impl Record for Note {
///     const DESCRIPTOR: RecordDescriptor =
///         RecordDescriptor::new("Note", &[FieldDescriptor::primary("id")]);
/// }
///
/// let tables = MemoryTable::new();
/// tables
///     .create_table("notes", KeyDefinition::partition(AttributeDefinition::string("id")).unwrap())
///     .unwrap();
///
/// let store = DocumentStore::new(tables);
/// let note = Note { id: "n1".into(), body: "hello".into() };
/// store.create_document("notes", &note).unwrap();
///
/// let probe = Note { id: "n1".into(), body: String::new() };
/// assert_eq!(store.get_document("notes", &probe).unwrap(), note);
/// ```
pub struct DocumentStore<S> {
    service: S,
    marshaler: Arc<Marshaler>,
    table_prefix: Option<String>,
}

impl<S: TableService> DocumentStore<S> {
    /// Store with an empty marshaler and no table prefix
    pub fn new(service: S) -> Self {
        Self::builder(service).build()
    }

    /// Create a builder for store configuration
    pub fn builder(service: S) -> DocumentStoreBuilder<S> {
        DocumentStoreBuilder::new(service)
    }

    /// The underlying table service
    pub fn service(&self) -> &S {
        &self.service
    }

    /// The marshaler used for every record
    pub fn marshaler(&self) -> &Marshaler {
        &self.marshaler
    }

    /// Physical name of a table, with the configured prefix applied
    pub fn table_name(&self, table: &str) -> String {
        match &self.table_prefix {
            Some(prefix) => format!("{prefix}{table}"),
            None => table.to_string(),
        }
    }

    /// Insert a new document; never overwrites an existing one.
    ///
    /// Fails with [`Error::ConditionFailed`] when a document with the same key
    /// is already stored.
    pub fn create_document<T: Record>(&self, table: &str, document: &T) -> Result<()> {
        let table = self.table_name(table);
        let key = self.marshaler.partition_key(document)?;
        let item = self.marshaler.encode(document)?;
        debug!(table = %table, record = T::DESCRIPTOR.name, key = key.name(), "create document");
        trace!(item = %attrdoc_wire::render_item(&item), "encoded document");

        let condition = PutCondition::AttributeNotExists(key.name().to_string());
        self.service
            .put_item(&table, item, Some(condition))
            .map_err(|e| self.failed("create", &table, e.into()))
    }

    /// Insert or replace a document
    pub fn update_document<T: Record>(&self, table: &str, document: &T) -> Result<()> {
        let table = self.table_name(table);
        self.marshaler.partition_key(document)?;
        let item = self.marshaler.encode(document)?;
        debug!(table = %table, record = T::DESCRIPTOR.name, "update document");
        trace!(item = %attrdoc_wire::render_item(&item), "encoded document");

        self.service
            .put_item(&table, item, None)
            .map_err(|e| self.failed("update", &table, e.into()))
    }

    /// Fetch the document whose key attributes match `probe`.
    ///
    /// Only the key fields of `probe` are read. Fails with
    /// [`Error::NotFound`] when nothing is stored under the key.
    pub fn get_document<T>(&self, table: &str, probe: &T) -> Result<T>
    where
        T: Record + DeserializeOwned,
    {
        let table = self.table_name(table);
        let key = self.marshaler.key_attributes(probe)?;
        debug!(table = %table, record = T::DESCRIPTOR.name, "get document");

        let item = self
            .service
            .get_item(&table, &key)
            .map_err(|e| self.failed("get", &table, e.into()))?
            .ok_or_else(|| Error::NotFound(format!("{table}: {}", attrdoc_wire::encode_item(&key))))?;
        Ok(self.marshaler.decode(&item)?)
    }

    /// Remove the document whose key attributes match `document`
    pub fn delete_document<T: Record>(&self, table: &str, document: &T) -> Result<()> {
        let table = self.table_name(table);
        let key = self.marshaler.key_attributes(document)?;
        debug!(table = %table, record = T::DESCRIPTOR.name, "delete document");

        self.service
            .delete_item(&table, &key)
            .map_err(|e| self.failed("delete", &table, e.into()))
    }

    /// Encode a document to its wire JSON
    pub fn to_json<T: Record>(&self, document: &T) -> Result<String> {
        let item = self.marshaler.encode(document)?;
        Ok(attrdoc_wire::encode_item(&item))
    }

    /// Decode a document from wire JSON
    pub fn from_json<T>(&self, json: &str) -> Result<T>
    where
        T: Record + DeserializeOwned,
    {
        let item: Item = attrdoc_wire::decode_item(json)?;
        Ok(self.marshaler.decode(&item)?)
    }

    fn failed(&self, operation: &'static str, table: &str, error: Error) -> Error {
        warn!(operation, table, error = %error, "document operation failed");
        error
    }
}

/// Builder for [`DocumentStore`].
///
/// ```
/// use attrdoc::{DocumentStore, Marshaler, MemoryTable};
///
/// let store = DocumentStore::builder(MemoryTable::new())
///     .marshaler(Marshaler::builder().alias_sentinel('$').build().unwrap())
///     .table_prefix("test_")
///     .build();
/// assert_eq!(store.table_name("docs"), "test_docs");
/// assert_eq!(store.marshaler().alias_sentinel(), '$');
/// ```
pub struct DocumentStoreBuilder<S> {
    service: S,
    marshaler: Option<Arc<Marshaler>>,
    table_prefix: Option<String>,
}

impl<S: TableService> DocumentStoreBuilder<S> {
    /// Create a builder around a table service
    pub fn new(service: S) -> Self {
        Self {
            service,
            marshaler: None,
            table_prefix: None,
        }
    }

    /// Use this marshaler for every record
    pub fn marshaler(mut self, marshaler: Marshaler) -> Self {
        self.marshaler = Some(Arc::new(marshaler));
        self
    }

    /// Share a marshaler with other stores
    pub fn shared_marshaler(mut self, marshaler: Arc<Marshaler>) -> Self {
        self.marshaler = Some(marshaler);
        self
    }

    /// Prefix prepended to every table name
    pub fn table_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.table_prefix = Some(prefix.into());
        self
    }

    /// Build the store
    pub fn build(self) -> DocumentStore<S> {
        DocumentStore {
            service: self.service,
            marshaler: self.marshaler.unwrap_or_default(),
            table_prefix: self.table_prefix,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::MemoryTable;
    use attrdoc_core::{AttributeDefinition, AttributeValue, KeyDefinition};
    use attrdoc_marshal::{FieldDescriptor, RecordDescriptor};
    use serde::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
    struct Entry {
        id: u32,
        text: String,
    }

    impl Record for Entry {
        const DESCRIPTOR: RecordDescriptor =
            RecordDescriptor::new("Entry", &[FieldDescriptor::primary("id")]);
    }

    fn store() -> DocumentStore<MemoryTable> {
        let tables = MemoryTable::new();
        tables
            .create_table(
                "entries",
                KeyDefinition::partition(AttributeDefinition::number("id")).unwrap(),
            )
            .unwrap();
        DocumentStore::new(tables)
    }

    #[test]
    fn test_create_is_insert_only() {
        let store = store();
        let entry = Entry { id: 1, text: "a".into() };
        store.create_document("entries", &entry).unwrap();

        let again = Entry { id: 1, text: "b".into() };
        let err = store.create_document("entries", &again).unwrap_err();
        assert!(err.is_condition_failed(), "{err}");

        let probe = Entry { id: 1, text: String::new() };
        assert_eq!(store.get_document("entries", &probe).unwrap(), entry);
    }

    #[test]
    fn test_update_overwrites() {
        let store = store();
        store
            .update_document("entries", &Entry { id: 2, text: "a".into() })
            .unwrap();
        store
            .update_document("entries", &Entry { id: 2, text: "b".into() })
            .unwrap();

        let probe = Entry { id: 2, text: String::new() };
        assert_eq!(store.get_document("entries", &probe).unwrap().text, "b");
        assert_eq!(store.service().item_count("entries").unwrap(), 1);
    }

    #[test]
    fn test_get_missing_is_not_found() {
        let store = store();
        let err = store
            .get_document("entries", &Entry { id: 9, text: String::new() })
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)), "{err}");
    }

    #[test]
    fn test_table_prefix_applies() {
        let tables = MemoryTable::new();
        tables
            .create_table(
                "dev_entries",
                KeyDefinition::partition(AttributeDefinition::number("id")).unwrap(),
            )
            .unwrap();
        let store = DocumentStore::builder(tables).table_prefix("dev_").build();
        let entry = Entry { id: 3, text: "x".into() };
        store.create_document("entries", &entry).unwrap();
        assert_eq!(store.service().item_count("dev_entries").unwrap(), 1);
    }

    #[test]
    fn test_json_round_trip() {
        let store = store();
        let entry = Entry { id: 4, text: "json".into() };
        let json = store.to_json(&entry).unwrap();
        assert_eq!(json, r#"{"id":{"N":"4"},"text":{"S":"json"}}"#);
        assert_eq!(store.from_json::<Entry>(&json).unwrap(), entry);

        assert!(matches!(
            store.from_json::<Entry>(r#"{"id":{"X":"4"}}"#),
            Err(Error::Wire(_))
        ));
        assert!(matches!(
            store.from_json::<Entry>(r#"{"id":{"S":"four"}}"#),
            Err(Error::Marshal(_))
        ));
    }

    #[test]
    fn test_delete_then_get() {
        let store = store();
        let entry = Entry { id: 5, text: "gone".into() };
        store.create_document("entries", &entry).unwrap();
        store.delete_document("entries", &entry).unwrap();
        assert!(store
            .get_document("entries", &entry)
            .unwrap_err()
            .is_not_found());

        let item = store.marshaler().key_attributes(&entry).unwrap();
        assert_eq!(item.get("id"), Some(&AttributeValue::N("5".into())));
    }
}
