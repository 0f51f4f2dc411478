//! Human-readable structural rendering of metadata values.
//!
//! Produces a compact, single-line form such as `{ a: 1, tags: [ 'x', 'y' ] }`.
//! Containers nested deeper than the depth bound collapse to `[Object]` or
//! `[Array]`.

use serde_json::Value;
use std::fmt::Write;

/// Nesting depth rendered before containers are collapsed.
pub const DEFAULT_DEPTH: usize = 5;

/// Renders `value` with the given depth bound.
pub fn inspect(value: &Value, depth: usize) -> String {
    let mut out = String::new();
    write_value(&mut out, value, 0, depth);
    out
}

fn write_value(out: &mut String, value: &Value, level: usize, depth: usize) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => {
            let _ = write!(out, "{}", b);
        }
        Value::Number(n) => {
            // Whole floats print like integers: `1`, not `1.0`.
            let _ = match n.as_f64() {
                Some(f) if n.is_f64() => write!(out, "{}", f),
                _ => write!(out, "{}", n),
            };
        }
        Value::String(s) => write_quoted(out, s),
        Value::Array(items) => {
            if items.is_empty() {
                out.push_str("[]");
            } else if level > depth {
                out.push_str("[Array]");
            } else {
                out.push_str("[ ");
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    write_value(out, item, level + 1, depth);
                }
                out.push_str(" ]");
            }
        }
        Value::Object(map) => {
            if map.is_empty() {
                out.push_str("{}");
            } else if level > depth {
                out.push_str("[Object]");
            } else {
                out.push_str("{ ");
                for (i, (key, item)) in map.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    if is_identifier(key) {
                        out.push_str(key);
                    } else {
                        write_quoted(out, key);
                    }
                    out.push_str(": ");
                    write_value(out, item, level + 1, depth);
                }
                out.push_str(" }");
            }
        }
    }
}

fn is_identifier(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

fn write_quoted(out: &mut String, s: &str) {
    out.push('\'');
    for c in s.chars() {
        match c {
            '\'' => out.push_str("\\'"),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('\'');
}
