use super::*;
use serde_json::json;

#[test]
fn test_single_element_data_array_is_unwrapped() {
    let body = json!({"total": 1, "data": [{"id": "a1", "name": "Standard rate"}]});

    assert_eq!(
        normalize_body(&body),
        json!({"id": "a1", "name": "Standard rate"})
    );
}

#[test]
fn test_empty_data_array_becomes_null() {
    let body = json!({"total": 0, "data": []});

    assert_eq!(normalize_body(&body), Value::Null);
}

#[test]
fn test_multi_element_data_array_passes_through() {
    let body = json!({"data": [{"id": "a"}, {"id": "b"}]});

    assert_eq!(normalize_body(&body), json!([{"id": "a"}, {"id": "b"}]));
}

#[test]
fn test_object_data_is_returned() {
    let body = json!({"data": {"id": "p1", "type": "product"}});

    assert_eq!(normalize_body(&body), json!({"id": "p1", "type": "product"}));
}

#[test]
fn test_object_without_data_passes_through() {
    let body = json!({"access_token": "abc", "expires_in": 600});

    assert_eq!(normalize_body(&body), body);
}

#[test]
fn test_non_object_bodies_pass_through() {
    assert_eq!(normalize_body(&Value::Null), Value::Null);
    assert_eq!(normalize_body(&json!("success")), json!("success"));
    assert_eq!(normalize_body(&json!([1, 2])), json!([1, 2]));
}
