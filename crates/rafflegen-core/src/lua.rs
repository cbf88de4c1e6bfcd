//! Table-literal renderer for addon saved variables.
//!
//! Output follows the layout the game itself writes: one `[key] = value,`
//! entry per line, four spaces per nesting level, sequences keyed from 1.

use std::fmt::Write as _;

use crate::value::{Key, Value};

const INDENT: &str = "    ";

/// Render a single top-level assignment `NAME =\n{...}\n`.
pub fn render_document(name: &str, value: &Value) -> String {
    let mut out = String::with_capacity(256);
    out.push_str(name);
    out.push_str(" =\n");
    write_value(&mut out, value, 0);
    out.push('\n');
    out
}

/// Render a value as a table literal expression.
pub fn render_value(value: &Value) -> String {
    let mut out = String::new();
    write_value(&mut out, value, 0);
    out
}

fn write_value(out: &mut String, value: &Value, depth: usize) {
    match value {
        Value::Table(table) if table.is_empty() => out.push_str("{}"),
        Value::Array(items) if items.is_empty() => out.push_str("{}"),
        Value::Table(table) => {
            out.push('{');
            for (key, item) in table.iter() {
                open_entry(out, depth);
                write_key(out, key);
                out.push_str(" = ");
                write_value(out, item, depth + 1);
                out.push(',');
            }
            close_block(out, depth);
        }
        Value::Array(items) => {
            out.push('{');
            for (index, item) in items.iter().enumerate() {
                open_entry(out, depth);
                let _ = write!(out, "[{}] = ", index + 1);
                write_value(out, item, depth + 1);
                out.push(',');
            }
            close_block(out, depth);
        }
        Value::Str(text) => write_string(out, text),
        Value::Int(number) => {
            let _ = write!(out, "{number}");
        }
        // Debug keeps a `.0` on whole floats so they read back as floats.
        Value::Float(number) => {
            let _ = write!(out, "{number:?}");
        }
        Value::Bool(flag) => out.push_str(if *flag { "true" } else { "false" }),
    }
}

fn write_key(out: &mut String, key: &Key) {
    out.push('[');
    match key {
        Key::Str(text) => write_string(out, text),
        Key::Int(number) => {
            let _ = write!(out, "{number}");
        }
    }
    out.push(']');
}

fn write_string(out: &mut String, text: &str) {
    out.push('"');
    for ch in text.chars() {
        if ch == '"' || ch == '\\' {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push('"');
}

fn open_entry(out: &mut String, depth: usize) {
    out.push('\n');
    for _ in 0..=depth {
        out.push_str(INDENT);
    }
}

fn close_block(out: &mut String, depth: usize) {
    out.push('\n');
    for _ in 0..depth {
        out.push_str(INDENT);
    }
    out.push('}');
}
