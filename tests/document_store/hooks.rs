//! Records that take over encoding or decoding through the store

use crate::{init_tracing, ScopedTables, SharedTables};
use attrdoc::prelude::*;
use attrdoc::{AttributeMarshaler, CustomMarshaler, CustomUnmarshaler, KeyRetriever, UnmarshalFn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Stored as a version-stamped item with a packed payload
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
struct Counter {
    name: String,
    hits: u64,
}

impl CustomMarshaler for Counter {
    fn marshal(&self) -> attrdoc_marshal::Result<Item> {
        let mut item = Item::new();
        item.insert("name".into(), AttributeValue::S(self.name.clone()));
        item.insert("packed".into(), AttributeValue::S(format!("v1:{}", self.hits)));
        Ok(item)
    }
}

impl CustomUnmarshaler for Counter {
    fn unmarshal(item: &Item) -> attrdoc_marshal::Result<Self> {
        let name = item
            .get("name")
            .and_then(AttributeValue::as_s)
            .ok_or_else(|| attrdoc_marshal::Error::MissingKeyAttribute("name".into()))?;
        let packed = item
            .get("packed")
            .and_then(AttributeValue::as_s)
            .and_then(|p| p.strip_prefix("v1:"))
            .ok_or_else(|| attrdoc_marshal::Error::Custom("unreadable payload".into()))?;
        let hits = packed
            .parse()
            .map_err(|_| attrdoc_marshal::Error::Custom(format!("bad hit count {packed}")))?;
        Ok(Counter {
            name: name.to_string(),
            hits,
        })
    }
}

impl Record for Counter {
    const DESCRIPTOR: RecordDescriptor =
        RecordDescriptor::new("Counter", &[FieldDescriptor::primary("name")]);

    fn custom_marshaler(&self) -> Option<&dyn CustomMarshaler> {
        Some(self)
    }

    fn unmarshaler() -> Option<UnmarshalFn<Self>> {
        Some(<Self as CustomUnmarshaler>::unmarshal)
    }
}

fn store_with(table: &str, key: KeyDefinition) -> (DocumentStore<SharedTables>, ScopedTables) {
    init_tracing();
    let tables = Arc::new(MemoryTable::new());
    let mut scope = ScopedTables::new(Arc::clone(&tables));
    scope.create(table, key);
    (DocumentStore::new(SharedTables(tables)), scope)
}

#[test]
fn custom_codec_round_trips_through_store() {
    let (store, scope) = store_with(
        "counters",
        KeyDefinition::partition(AttributeDefinition::string("name")).unwrap(),
    );
    let counter = Counter {
        name: "home".into(),
        hits: 42,
    };
    store.create_document("counters", &counter).unwrap();

    let key = store.marshaler().key_attributes(&counter).unwrap();
    let item = scope.tables.get_item("counters", &key).unwrap().unwrap();
    assert_eq!(item.get("packed"), Some(&AttributeValue::S("v1:42".into())));
    assert!(!item.contains_key("hits"));

    assert_eq!(store.get_document("counters", &counter).unwrap(), counter);
}

/// Key attribute computed on demand instead of encoding the record
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
struct Slug {
    title: String,
}

impl AttributeMarshaler for Slug {
    fn attribute_value(&self, name: &str) -> Option<AttributeValue> {
        (name == "slug").then(|| AttributeValue::S(self.title.to_lowercase().replace(' ', "-")))
    }
}

impl KeyRetriever for Slug {
    fn partition_key(&self) -> Option<AttributeDefinition> {
        Some(AttributeDefinition::string("slug"))
    }
}

impl Record for Slug {
    const DESCRIPTOR: RecordDescriptor = RecordDescriptor::plain("Slug");

    fn key_retriever(&self) -> Option<&dyn KeyRetriever> {
        Some(self)
    }

    fn attribute_marshaler(&self) -> Option<&dyn AttributeMarshaler> {
        Some(self)
    }
}

#[test]
fn attribute_marshaler_supplies_key_value() {
    let marshaler = Marshaler::new();
    let slug = Slug {
        title: "Hello World".into(),
    };
    let key = marshaler.partition_key(&slug).unwrap();
    assert_eq!(key.name(), "slug");
    assert_eq!(key.value, AttributeValue::S("hello-world".into()));

    let value = marshaler.attribute_value(&slug, "slug").unwrap();
    assert_eq!(value, Some(AttributeValue::S("hello-world".into())));
}
