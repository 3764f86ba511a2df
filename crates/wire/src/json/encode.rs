//! JSON encoding of attribute values
//!
//! Every value is a single-key object whose key is the type tag:
//! `{"S":"text"}`, `{"N":"1.5"}`, `{"B":"<base64>"}`, `{"BOOL":true}`,
//! `{"NULL":true}`, `{"SS":[...]}`, `{"NS":[...]}`, `{"BS":[...]}`,
//! `{"L":[...]}`, `{"M":{...}}`. Numbers stay strings. Map keys are
//! emitted in sorted order so equal values always encode to equal text.

use attrdoc_core::{AttributeValue, Item};
use base64::Engine;
use std::collections::HashMap;

/// Encode an attribute value to JSON
pub fn encode_attribute_value(value: &AttributeValue) -> String {
    let mut out = String::new();
    write_value(&mut out, value);
    out
}

/// Encode an item to JSON: an object of attribute name to attribute value
pub fn encode_item(item: &Item) -> String {
    let mut out = String::new();
    write_object(&mut out, item);
    out
}

fn write_value(out: &mut String, value: &AttributeValue) {
    out.push('{');
    out.push_str(&encode_string(value.tag()));
    out.push(':');
    match value {
        AttributeValue::S(s) | AttributeValue::N(s) => out.push_str(&encode_string(s)),
        AttributeValue::B(b) => out.push_str(&encode_bytes(b)),
        AttributeValue::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        AttributeValue::Null => out.push_str("true"),
        AttributeValue::Ss(items) | AttributeValue::Ns(items) => {
            write_array(out, items, |out, s| out.push_str(&encode_string(s)))
        }
        AttributeValue::Bs(items) => write_array(out, items, |out, b| out.push_str(&encode_bytes(b))),
        AttributeValue::L(items) => write_array(out, items, write_value),
        AttributeValue::M(entries) => write_object(out, entries),
    }
    out.push('}');
}

fn write_array<T>(out: &mut String, items: &[T], mut write: impl FnMut(&mut String, &T)) {
    out.push('[');
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        write(out, item);
    }
    out.push(']');
}

/// Encode a map with deterministic key ordering
fn write_object(out: &mut String, entries: &HashMap<String, AttributeValue>) {
    let mut sorted: Vec<_> = entries.iter().collect();
    sorted.sort_by_key(|(k, _)| *k);

    out.push('{');
    for (i, (key, value)) in sorted.into_iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&encode_string(key));
        out.push(':');
        write_value(out, value);
    }
    out.push('}');
}

/// Encode a string with proper JSON escaping
pub fn encode_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 2);
    result.push('"');
    for c in s.chars() {
        match c {
            '"' => result.push_str("\\\""),
            '\\' => result.push_str("\\\\"),
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\t' => result.push_str("\\t"),
            c if c.is_control() => {
                result.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => result.push(c),
        }
    }
    result.push('"');
    result
}

/// Base64 text of binary data, quoted
fn encode_bytes(bytes: &[u8]) -> String {
    let b64 = base64::engine::general_purpose::STANDARD.encode(bytes);
    format!("\"{}\"", b64)
}
