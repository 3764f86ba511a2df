//! Sort keys, binary keys and records that supply their own key definitions

use crate::{init_tracing, ScopedTables, SharedTables};
use attrdoc::prelude::*;
use attrdoc::KeyRetriever;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
struct Reading {
    sensor: String,
    at: u64,
    celsius: f32,
}

impl Record for Reading {
    const DESCRIPTOR: RecordDescriptor = RecordDescriptor::new(
        "Reading",
        &[FieldDescriptor::primary("sensor"), FieldDescriptor::sort("at")],
    );
}

fn reading(sensor: &str, at: u64) -> Reading {
    Reading {
        sensor: sensor.to_string(),
        at,
        celsius: 21.5,
    }
}

#[test]
fn key_definition_follows_descriptor_and_values() {
    let marshaler = Marshaler::new();
    let definition = marshaler.key_definition(&reading("s1", 10)).unwrap();
    assert_eq!(definition.primary, AttributeDefinition::string("sensor"));
    assert_eq!(definition.sort, Some(AttributeDefinition::number("at")));
}

#[test]
fn sort_key_separates_documents() {
    init_tracing();
    let tables = Arc::new(MemoryTable::new());
    let mut scope = ScopedTables::new(Arc::clone(&tables));
    let store = DocumentStore::new(SharedTables(Arc::clone(&tables)));
    let definition = store.marshaler().key_definition(&reading("s1", 0)).unwrap();
    scope.create("readings", definition);

    for at in [1, 2, 3] {
        store.create_document("readings", &reading("s1", at)).unwrap();
    }
    store.create_document("readings", &reading("s2", 1)).unwrap();
    assert_eq!(scope.tables.item_count("readings").unwrap(), 4);

    let fetched = store.get_document("readings", &reading("s1", 2)).unwrap();
    assert_eq!(fetched, reading("s1", 2));

    store.delete_document("readings", &reading("s1", 2)).unwrap();
    assert!(store
        .get_document("readings", &reading("s1", 2))
        .unwrap_err()
        .is_not_found());
    assert!(store.get_document("readings", &reading("s1", 3)).is_ok());
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
struct Blob {
    digest: Vec<u8>,
    size: u32,
}

impl Record for Blob {
    const DESCRIPTOR: RecordDescriptor =
        RecordDescriptor::new("Blob", &[FieldDescriptor::primary("digest")]);
}

#[test]
fn binary_partition_key() {
    init_tracing();
    let tables = Arc::new(MemoryTable::new());
    let mut scope = ScopedTables::new(Arc::clone(&tables));
    scope.create(
        "blobs",
        KeyDefinition::partition(AttributeDefinition::binary("digest")).unwrap(),
    );
    let store = DocumentStore::new(SharedTables(tables));

    let blob = Blob {
        digest: vec![0xde, 0xad, 0xbe, 0xef],
        size: 4096,
    };
    let key = store.marshaler().partition_key(&blob).unwrap();
    assert_eq!(key.scalar_type(), ScalarType::Binary);
    assert_eq!(key.value, AttributeValue::B(vec![0xde, 0xad, 0xbe, 0xef]));

    store.create_document("blobs", &blob).unwrap();
    assert_eq!(store.get_document("blobs", &blob).unwrap(), blob);
}

#[test]
fn key_type_must_match_table_schema() {
    init_tracing();
    let tables = Arc::new(MemoryTable::new());
    let mut scope = ScopedTables::new(Arc::clone(&tables));
    scope.create(
        "readings",
        KeyDefinition::new(
            AttributeDefinition::string("sensor"),
            Some(AttributeDefinition::string("at")),
        )
        .unwrap(),
    );
    let store = DocumentStore::new(SharedTables(tables));

    let err = store
        .create_document("readings", &reading("s1", 1))
        .unwrap_err();
    assert!(matches!(err, Error::InvalidKey(_)), "{err}");
}

/// Keys named by the record itself rather than its descriptor
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
struct Session {
    token: String,
    user: String,
}

impl KeyRetriever for Session {
    fn partition_key(&self) -> Option<AttributeDefinition> {
        Some(AttributeDefinition::string("token"))
    }

    fn sort_key(&self) -> Option<AttributeDefinition> {
        Some(AttributeDefinition::string("user"))
    }
}

impl Record for Session {
    const DESCRIPTOR: RecordDescriptor = RecordDescriptor::plain("Session");

    fn key_retriever(&self) -> Option<&dyn KeyRetriever> {
        Some(self)
    }
}

#[test]
fn key_retriever_drives_storage_keys() {
    init_tracing();
    let tables = Arc::new(MemoryTable::new());
    let mut scope = ScopedTables::new(Arc::clone(&tables));
    let store = DocumentStore::new(SharedTables(Arc::clone(&tables)));
    let session = Session {
        token: "t-1".into(),
        user: "ada".into(),
    };
    scope.create("sessions", store.marshaler().key_definition(&session).unwrap());

    store.create_document("sessions", &session).unwrap();
    let key = store.marshaler().key_attributes(&session).unwrap();
    assert_eq!(key.len(), 2);
    assert_eq!(store.get_document("sessions", &session).unwrap(), session);
}

#[test]
fn scoped_tables_are_dropped() {
    let tables = Arc::new(MemoryTable::new());
    {
        let mut scope = ScopedTables::new(Arc::clone(&tables));
        scope.create(
            "temp",
            KeyDefinition::partition(AttributeDefinition::string("id")).unwrap(),
        );
        assert_eq!(tables.table_names(), vec!["temp"]);
    }
    assert!(tables.table_names().is_empty());
}
