//! Create / update / get / delete through the store

use crate::{create_store, Product, PRODUCTS};
use attrdoc::prelude::*;
use serde::Serialize;
use std::sync::Arc;
use std::thread;

#[test]
fn create_then_get_round_trips() {
    let (store, _scope) = create_store();
    store.create_document(PRODUCTS, &Product::sample("P")).unwrap();

    let fetched: Product = store.get_document(PRODUCTS, &Product::probe("P")).unwrap();
    assert_eq!(fetched, Product::sample("P"));
}

#[test]
fn stored_item_uses_wire_names() {
    let (store, scope) = create_store();
    store.create_document(PRODUCTS, &Product::sample("P")).unwrap();

    let key = store.marshaler().key_attributes(&Product::probe("P")).unwrap();
    let item = scope.tables.get_item(PRODUCTS, &key).unwrap().unwrap();

    assert_eq!(item.get("DocName"), Some(&AttributeValue::S("P".into())));
    assert_eq!(item.get("#item_price"), Some(&AttributeValue::N("9.75".into())));
    assert_eq!(
        item.get("Tags"),
        Some(&AttributeValue::Ss(vec!["a".into(), "b".into()]))
    );
    assert_eq!(
        item.get("Counts"),
        Some(&AttributeValue::Ns(vec!["1".into(), "2".into(), "3".into()]))
    );
    assert!(!item.contains_key("Value"));
}

#[test]
fn create_never_overwrites() {
    let (store, _scope) = create_store();
    store.create_document(PRODUCTS, &Product::sample("P")).unwrap();

    let mut changed = Product::sample("P");
    changed.price = 1.0;
    let err = store.create_document(PRODUCTS, &changed).unwrap_err();
    assert!(err.is_condition_failed(), "{err}");

    let fetched: Product = store.get_document(PRODUCTS, &Product::probe("P")).unwrap();
    assert_eq!(fetched.price, 9.75);
}

#[test]
fn update_is_an_upsert() {
    let (store, scope) = create_store();
    store.update_document(PRODUCTS, &Product::sample("Q")).unwrap();

    let mut changed = Product::sample("Q");
    changed.tags = vec!["z".into()];
    store.update_document(PRODUCTS, &changed).unwrap();

    let fetched: Product = store.get_document(PRODUCTS, &Product::probe("Q")).unwrap();
    assert_eq!(fetched.tags, vec!["z"]);
    assert_eq!(scope.tables.item_count(PRODUCTS).unwrap(), 1);
}

#[test]
fn delete_removes_document() {
    let (store, scope) = create_store();
    store.create_document(PRODUCTS, &Product::sample("D")).unwrap();
    store.delete_document(PRODUCTS, &Product::probe("D")).unwrap();

    let err = store
        .get_document(PRODUCTS, &Product::probe("D"))
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)), "{err}");
    assert_eq!(scope.tables.item_count(PRODUCTS).unwrap(), 0);

    // Deleting again is not an error
    store.delete_document(PRODUCTS, &Product::probe("D")).unwrap();
}

#[test]
fn empty_collections_are_stored_as_null() {
    let (store, scope) = create_store();
    store.create_document(PRODUCTS, &Product::probe("E")).unwrap();

    let key = store.marshaler().key_attributes(&Product::probe("E")).unwrap();
    let item = scope.tables.get_item(PRODUCTS, &key).unwrap().unwrap();
    assert_eq!(item.get("Tags"), Some(&AttributeValue::Null));
    assert_eq!(item.get("Counts"), Some(&AttributeValue::Null));

    let fetched: Product = store.get_document(PRODUCTS, &Product::probe("E")).unwrap();
    assert!(fetched.tags.is_empty());
    assert!(fetched.counts.is_empty());
}

#[test]
fn unknown_table_is_reported() {
    let (store, _scope) = create_store();
    let err = store
        .create_document("missing", &Product::sample("P"))
        .unwrap_err();
    assert!(matches!(err, Error::TableNotFound(ref t) if t == "missing"), "{err}");
    assert!(err.is_not_found());
}

#[test]
fn record_without_primary_key_is_rejected() {
    #[derive(Serialize)]
    struct Loose {
        note: String,
    }

    impl Record for Loose {
        const DESCRIPTOR: RecordDescriptor = RecordDescriptor::plain("Loose");
    }

    let (store, scope) = create_store();
    let err = store
        .create_document(PRODUCTS, &Loose { note: "n".into() })
        .unwrap_err();
    assert!(
        matches!(err, Error::Marshal(attrdoc_marshal::Error::MissingPrimaryKey)),
        "{err}"
    );
    assert_eq!(scope.tables.item_count(PRODUCTS).unwrap(), 0);
}

#[test]
fn conflicting_aliases_are_rejected_before_writing() {
    #[derive(Serialize)]
    struct Doubled {
        #[serde(rename = "DocName")]
        name: String,
        price: f64,
        cost: f64,
    }

    impl Record for Doubled {
        const DESCRIPTOR: RecordDescriptor = RecordDescriptor::new(
            "Doubled",
            &[
                FieldDescriptor::primary("DocName"),
                FieldDescriptor::new("price").alias("#amount"),
                FieldDescriptor::new("cost").alias("#amount"),
            ],
        );
    }

    let (store, scope) = create_store();
    let doubled = Doubled {
        name: "D".into(),
        price: 1.5,
        cost: 2.5,
    };
    let err = store.create_document(PRODUCTS, &doubled).unwrap_err();
    assert!(
        matches!(
            err,
            Error::Marshal(attrdoc_marshal::Error::InvalidDescriptor { record: "Doubled", .. })
        ),
        "{err}"
    );
    assert!(store.to_json(&doubled).is_err());
    assert_eq!(scope.tables.item_count(PRODUCTS).unwrap(), 0);
}

#[test]
fn concurrent_creates_of_one_key_admit_a_single_writer() {
    let (store, scope) = create_store();
    let store = Arc::new(store);

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                let mut product = Product::sample("shared");
                product.price = i as f64;
                store.create_document(PRODUCTS, &product).is_ok()
            })
        })
        .collect();

    let winners = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|created| *created)
        .count();
    assert_eq!(winners, 1);
    assert_eq!(scope.tables.item_count(PRODUCTS).unwrap(), 1);
}

#[test]
fn concurrent_creates_of_distinct_keys_all_land() {
    let (store, scope) = create_store();
    let store = Arc::new(store);

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                store
                    .create_document(PRODUCTS, &Product::sample(&format!("p{i}")))
                    .unwrap();
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(scope.tables.item_count(PRODUCTS).unwrap(), 8);
    let fetched: Product = store.get_document(PRODUCTS, &Product::probe("p5")).unwrap();
    assert_eq!(fetched.name, "p5");
}
