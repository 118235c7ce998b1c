//! JSON depth limiting
//!
//! Structural parse first: depth capped at 3, arrays truncated to 10
//! elements, objects to 20 keys (marker included in the cap, so the
//! re-serialized shape never exceeds 20 keys / 11 array slots). Parse
//! failure falls back to hard truncation, the one path allowed to produce
//! non-parseable output.

use frugal_core::CondenseMethod;
use serde_json::{Map, Value};

const MAX_DEPTH: usize = 3;
const MAX_ARRAY_ITEMS: usize = 10;
const MAX_OBJECT_KEYS: usize = 20;
const TRUNCATION_FLOOR: usize = 2_000;

/// Condense JSON text; returns the condensed text and the method used
pub fn condense_json(text: &str) -> (String, CondenseMethod) {
    match serde_json::from_str::<Value>(text) {
        Ok(value) => {
            let limited = limit_value(&value, 0);
            let serialized =
                serde_json::to_string_pretty(&limited).unwrap_or_else(|_| truncate_raw(text));
            (serialized, CondenseMethod::JsonDepthLimit)
        }
        Err(_) => (truncate_raw(text), CondenseMethod::JsonTruncation),
    }
}

fn limit_value(value: &Value, depth: usize) -> Value {
    match value {
        Value::Array(items) => {
            if depth >= MAX_DEPTH {
                return Value::String(format!("[...({} items)]", items.len()));
            }
            let mut out: Vec<Value> = items
                .iter()
                .take(MAX_ARRAY_ITEMS)
                .map(|v| limit_value(v, depth + 1))
                .collect();
            if items.len() > MAX_ARRAY_ITEMS {
                out.push(Value::String(format!(
                    "...({} more items)",
                    items.len() - MAX_ARRAY_ITEMS
                )));
            }
            Value::Array(out)
        }
        Value::Object(map) => {
            if depth >= MAX_DEPTH {
                return Value::String(format!("{{...({} keys)}}", map.len()));
            }
            let truncated = map.len() > MAX_OBJECT_KEYS;
            // The marker occupies the last slot within the cap
            let keep = if truncated {
                MAX_OBJECT_KEYS - 1
            } else {
                map.len()
            };
            let mut out = Map::new();
            for (key, val) in map.iter().take(keep) {
                out.insert(key.clone(), limit_value(val, depth + 1));
            }
            if truncated {
                out.insert(
                    "...(more keys)".to_string(),
                    Value::String(format!("{} omitted", map.len() - keep)),
                );
            }
            Value::Object(out)
        }
        scalar => scalar.clone(),
    }
}

fn truncate_raw(text: &str) -> String {
    let mut cut = TRUNCATION_FLOOR.min(text.len());
    while cut > 0 && !text.is_char_boundary(cut) {
        cut -= 1;
    }
    format!(
        "{}\n/* truncated: {} of {} chars kept */",
        &text[..cut],
        cut,
        text.len()
    )
}
