//! Recursive merge of JSON fixture data.
//!
//! Objects are merged key by key. Every other value in the patch, arrays and
//! `null` included, replaces the base value whole. Keys keep the position they
//! had in the base; keys only present in the patch are appended in patch order.

use serde_json::{Map, Value};

#[cfg(test)]
#[path = "merge_tests.rs"]
mod tests;

/// Merges `patch` into `base` in place.
pub fn merge_into(base: &mut Value, patch: Value) {
    match (base, patch) {
        (Value::Object(base_map), Value::Object(patch_map)) => {
            for (key, value) in patch_map {
                match base_map.get_mut(&key) {
                    Some(existing) => merge_into(existing, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (base, patch) => *base = patch,
    }
}

/// Returns `base` with `patch` merged over it.
pub fn merge(mut base: Value, patch: Value) -> Value {
    merge_into(&mut base, patch);
    base
}

/// Merges every layer over the previous one, starting from an empty object.
///
/// Later layers win.
pub fn merge_all<I>(layers: I) -> Value
where
    I: IntoIterator<Item = Value>,
{
    layers
        .into_iter()
        .fold(Value::Object(Map::new()), merge)
}

/// Builds a nested object holding `value` at a dotted `path`.
///
/// `"billingAddress.countryId"` becomes `{"billingAddress": {"countryId": value}}`.
pub fn nested(path: &str, value: Value) -> Value {
    path.rsplit('.').fold(value, |inner, key| {
        let mut map = Map::new();
        map.insert(key.to_string(), inner);
        Value::Object(map)
    })
}
