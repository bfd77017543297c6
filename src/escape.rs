// src/escape.rs
//! Markup escaping for data-derived text.
//!
//! Everything that comes out of `trends.json` goes through here before it is
//! interpolated into a fragment. Structural markup written by the renderer
//! does not.

use serde_json::{Number, Value};

/// Escape `&`, `<`, `>` and `"` so the result is safe as text content and
/// inside double-quoted attributes.
pub fn escape(s: &str) -> String {
    html_escape::encode_double_quoted_attribute(s).into_owned()
}

/// Escape an arbitrary JSON scalar the way it would be stringified for display.
pub fn escape_value(v: &Value) -> String {
    escape(&value_text(v))
}

/// Textual form of a JSON value: strings verbatim, null as "", numbers the
/// way a browser prints them (`350000.0` → `350000`), everything else as its
/// JSON text.
pub fn value_text(v: &Value) -> String {
    match v {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => number_text(n),
        other => other.to_string(),
    }
}

fn number_text(n: &Number) -> String {
    if n.is_i64() || n.is_u64() {
        return n.to_string();
    }
    match n.as_f64() {
        Some(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
            (f as i64).to_string()
        }
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}
