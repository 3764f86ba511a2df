//! Wire JSON produced and consumed by the store

use crate::{create_store, Product};
use attrdoc::prelude::*;
use attrdoc::{decode_item, render_item};

#[test]
fn document_json_is_canonical() {
    let (store, _scope) = create_store();
    let json = store.to_json(&Product::sample("P")).unwrap();
    assert_eq!(
        json,
        concat!(
            r##"{"#item_price":{"N":"9.75"},"##,
            r#""Counts":{"NS":["1","2","3"]},"#,
            r#""DocName":{"S":"P"},"#,
            r#""Tags":{"SS":["a","b"]}}"#,
        )
    );
    assert_eq!(store.from_json::<Product>(&json).unwrap(), Product::sample("P"));
}

#[test]
fn wire_json_parses_with_serde_json() {
    let (store, _scope) = create_store();
    let json = store.to_json(&Product::sample("P")).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed["DocName"]["S"], "P");
    assert_eq!(parsed["#item_price"]["N"], "9.75");
    assert_eq!(parsed["Tags"]["SS"][1], "b");
}

#[test]
fn rendered_item_decodes_back() {
    let (store, _scope) = create_store();
    let item = store.marshaler().encode(&Product::sample("P")).unwrap();
    let rendered = render_item(&item);
    assert!(rendered.contains('\n'));
    assert_eq!(decode_item(&rendered).unwrap(), item);
}

#[test]
fn malformed_json_is_a_wire_error() {
    let (store, _scope) = create_store();
    for json in [
        r#"{"DocName":{"SS":[]}}"#,
        r#"{"DocName":{"NULL":false}}"#,
        r#"{"DocName":{"S":"P","N":"1"}}"#,
        r#"{"DocName":"P"}"#,
        r#"{"DocName":{"S":"P"}"#,
    ] {
        let err = store.from_json::<Product>(json).unwrap_err();
        assert!(matches!(err, Error::Wire(_)), "{json}: {err}");
    }
}

#[test]
fn bool_in_numeric_field_is_a_type_mismatch() {
    let (store, _scope) = create_store();
    let json = r##"{"DocName":{"S":"P"},"#item_price":{"BOOL":true}}"##;
    let err = store.from_json::<Product>(json).unwrap_err();
    assert!(
        matches!(err, Error::Marshal(attrdoc_marshal::Error::TypeMismatch { .. })),
        "{err}"
    );
}
