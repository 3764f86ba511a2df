//! Indented rendering of items for logs and diagnostics
//!
//! Same tagged shape as the compact encoding, one entry per line with keys
//! sorted. The output decodes back to the same item.

use super::encode::{encode_attribute_value, encode_string};
use attrdoc_core::{AttributeValue, Item};
use std::collections::HashMap;

const INDENT: &str = "  ";

/// Render an item as indented JSON
pub fn render_item(item: &Item) -> String {
    let mut out = String::new();
    render_object(&mut out, item, 0);
    out
}

fn render_object(out: &mut String, entries: &HashMap<String, AttributeValue>, depth: usize) {
    if entries.is_empty() {
        out.push_str("{}");
        return;
    }

    let mut sorted: Vec<_> = entries.iter().collect();
    sorted.sort_by_key(|(k, _)| *k);

    out.push_str("{\n");
    for (i, (key, value)) in sorted.into_iter().enumerate() {
        if i > 0 {
            out.push_str(",\n");
        }
        push_indent(out, depth + 1);
        out.push_str(&encode_string(key));
        out.push_str(": ");
        render_value(out, value, depth + 1);
    }
    out.push('\n');
    push_indent(out, depth);
    out.push('}');
}

fn render_value(out: &mut String, value: &AttributeValue, depth: usize) {
    match value {
        AttributeValue::L(items) if !items.is_empty() => {
            out.push_str("{\"L\": [\n");
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(",\n");
                }
                push_indent(out, depth + 1);
                render_value(out, item, depth + 1);
            }
            out.push('\n');
            push_indent(out, depth);
            out.push_str("]}");
        }
        AttributeValue::M(entries) => {
            out.push_str("{\"M\": ");
            render_object(out, entries, depth);
            out.push('}');
        }
        // Scalars and sets stay on one line
        other => out.push_str(&encode_attribute_value(other)),
    }
}

fn push_indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}
