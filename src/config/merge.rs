//! Configuration layer merge
//!
//! - Objects: deep-merge by key
//! - Scalars and arrays: override (last wins)

use serde_json::Value;

/// Deep merge two JSON values, `overlay` taking precedence.
///
/// A `null` overlay leaves the base untouched, so a layer can mention a key
/// without setting it.
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut base_map), Value::Object(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                let merged = match base_map.remove(&key) {
                    Some(base_value) => deep_merge(base_value, overlay_value),
                    None if overlay_value.is_null() => continue,
                    None => overlay_value,
                };
                base_map.insert(key, merged);
            }
            Value::Object(base_map)
        }

        (base, Value::Null) => base,

        (_, overlay) => overlay,
    }
}

/// Merge config layers in order (first is base, last has highest precedence).
pub fn merge_layers(layers: Vec<Value>) -> Value {
    layers.into_iter().fold(Value::Null, deep_merge)
}
