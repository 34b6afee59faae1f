//! Single-result unwrapping of API response bodies.

use serde_json::Value;

#[cfg(test)]
#[path = "normalize_tests.rs"]
mod tests;

/// Unwraps the `data` member of an API response body.
///
/// * object with a `data` array of zero elements → `Null`
/// * object with a `data` array of one element → that element
/// * object with a `data` array of more elements → the array, unmodified
/// * object with any other `data` value → that value
/// * object without `data` → the object itself
/// * anything that is not an object → passed through as-is
pub fn normalize_body(body: &Value) -> Value {
    let Some(object) = body.as_object() else {
        return body.clone();
    };

    match object.get("data") {
        Some(Value::Array(items)) if items.len() <= 1 => {
            items.first().cloned().unwrap_or(Value::Null)
        }
        Some(data) => data.clone(),
        None => body.clone(),
    }
}
