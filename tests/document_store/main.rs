//! Document Store Integration Tests
//!
//! Exercises the full path: record metadata, encoding, key resolution,
//! table service and decoding.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test document_store
//!
//! # CRUD tests only
//! cargo test --test document_store crud::
//! ```

use std::sync::{Arc, Once};

use attrdoc::prelude::*;
use attrdoc::ServiceError;
use serde::{Deserialize, Serialize};

pub mod composite_keys;
pub mod crud;
pub mod hooks;
pub mod wire;

// =============================================================================
// SHARED TEST UTILITIES
// =============================================================================

static TRACING: Once = Once::new();

/// Route library logs to the test harness output
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::TRACE)
            .try_init();
    });
}

/// Product document keyed by `DocName`, with `Value` stored under an alias
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Product {
    #[serde(rename = "DocName")]
    pub name: String,
    #[serde(rename = "Value")]
    pub price: f64,
    #[serde(rename = "Tags")]
    pub tags: Vec<String>,
    #[serde(rename = "Counts")]
    pub counts: Vec<i64>,
}

impl Record for Product {
    const DESCRIPTOR: RecordDescriptor = RecordDescriptor::new(
        "Product",
        &[
            FieldDescriptor::primary("DocName"),
            FieldDescriptor::new("Value").alias("#item_price"),
        ],
    );
}

impl Product {
    pub fn sample(name: &str) -> Self {
        Self {
            name: name.to_string(),
            price: 9.75,
            tags: vec!["a".into(), "b".into()],
            counts: vec![1, 2, 3],
        }
    }

    /// A value carrying only the key
    pub fn probe(name: &str) -> Self {
        Self {
            name: name.to_string(),
            price: 0.0,
            tags: vec![],
            counts: vec![],
        }
    }
}

pub const PRODUCTS: &str = "products";

/// Tables created for one test; dropped again when the guard goes out of scope
pub struct ScopedTables {
    pub tables: Arc<MemoryTable>,
    names: Vec<String>,
}

impl ScopedTables {
    pub fn new(tables: Arc<MemoryTable>) -> Self {
        Self {
            tables,
            names: Vec::new(),
        }
    }

    pub fn create(&mut self, name: &str, key: KeyDefinition) {
        self.tables
            .create_table(name, key)
            .expect("Failed to create table");
        self.names.push(name.to_string());
    }
}

impl Drop for ScopedTables {
    fn drop(&mut self) {
        for name in &self.names {
            let _ = self.tables.drop_table(name);
        }
    }
}

/// Shared-table service, so stores and guards can point at the same tables
pub struct SharedTables(pub Arc<MemoryTable>);

impl TableService for SharedTables {
    fn put_item(
        &self,
        table: &str,
        item: Item,
        condition: Option<PutCondition>,
    ) -> std::result::Result<(), ServiceError> {
        self.0.put_item(table, item, condition)
    }

    fn get_item(
        &self,
        table: &str,
        key: &Item,
    ) -> std::result::Result<Option<Item>, ServiceError> {
        self.0.get_item(table, key)
    }

    fn delete_item(&self, table: &str, key: &Item) -> std::result::Result<(), ServiceError> {
        self.0.delete_item(table, key)
    }
}

/// Store over a fresh service with the products table registered
pub fn create_store() -> (DocumentStore<SharedTables>, ScopedTables) {
    init_tracing();
    let tables = Arc::new(MemoryTable::new());
    let mut scope = ScopedTables::new(Arc::clone(&tables));
    scope.create(
        PRODUCTS,
        KeyDefinition::partition(AttributeDefinition::string("DocName")).unwrap(),
    );
    let marshaler = Marshaler::builder()
        .register::<Product>()
        .build()
        .expect("Failed to build marshaler");
    let store = DocumentStore::builder(SharedTables(tables))
        .marshaler(marshaler)
        .build();
    (store, scope)
}
