//! Textual serialization of values
//!
//! Produces the JSON-shaped dump dialect used both for dump files and for
//! command replies. [`crate::store::parse`] reads it back.

use std::fmt::Write;

use super::value::Value;

pub(crate) fn dump_value(value: &Value, out: &mut String) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Boolean(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => dump_number(*n, out),
        Value::String(s) => dump_string(s, out),
        Value::List(items) => dump_list(items, out),
        Value::Hash(fields) => dump_hash(fields, out),
    }
}

/// Non-finite numbers have no textual form and dump as `null`.
fn dump_number(value: f64, out: &mut String) {
    if value.is_finite() {
        let _ = write!(out, "{}", value);
    } else {
        out.push_str("null");
    }
}

fn dump_string(value: &str, out: &mut String) {
    out.push('"');
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\u{0008}' => out.push_str("\\b"),
            '\u{000c}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ if (ch as u32) <= 0x1f => {
                let _ = write!(out, "\\u{:04x}", ch as u32);
            }
            _ => out.push(ch),
        }
    }
    out.push('"');
}

fn dump_list(items: &[Value], out: &mut String) {
    out.push('[');
    let mut first = true;
    for item in items {
        if !first {
            out.push_str(", ");
        }
        dump_value(item, out);
        first = false;
    }
    out.push(']');
}

fn dump_hash(fields: &std::collections::BTreeMap<String, Value>, out: &mut String) {
    out.push('{');
    let mut first = true;
    for (field, value) in fields {
        if !first {
            out.push_str(", ");
        }
        dump_string(field, out);
        out.push_str(": ");
        dump_value(value, out);
        first = false;
    }
    out.push('}');
}
