#![cfg(feature = "serde")]

//! Integration tests for serde support in callkit.
//!
//! These tests verify that values serialize to their natural JSON shape.

use callkit::{Func, Value};
use rstest::rstest;
use serde_json::json;

// =============================================================================
// Scalars
// =============================================================================

#[rstest]
#[case(Value::None, json!(null))]
#[case(Value::from(true), json!(true))]
#[case(Value::from(42), json!(42))]
#[case(Value::from(1.5), json!(1.5))]
#[case(Value::from("text"), json!("text"))]
fn test_scalar_to_json(#[case] value: Value, #[case] expected: serde_json::Value) {
    assert_eq!(serde_json::to_value(&value).unwrap(), expected);
}

// =============================================================================
// Collections
// =============================================================================

#[rstest]
fn test_nested_collections_to_json() {
    let value = Value::dict([
        ("pair", Value::tuple([Value::from(1), Value::from("a")])),
        ("items", Value::list([Value::from(true), Value::None])),
    ]);

    assert_eq!(
        serde_json::to_value(&value).unwrap(),
        json!({ "items": [true, null], "pair": [1, "a"] })
    );
}

#[rstest]
fn test_function_fails_to_serialize() {
    let value = Value::list([Value::from(Func::nullary("f", || Ok(Value::None)))]);
    assert!(serde_json::to_string(&value).is_err());
}

#[rstest]
fn test_cyclic_list_fails_to_serialize() {
    let cyclic = Value::list([Value::from(1)]);
    cyclic.push(cyclic.clone()).unwrap();

    assert!(serde_json::to_string(&cyclic).is_err());
}

#[rstest]
fn test_shared_list_serializes_each_occurrence() {
    let shared = Value::list([Value::from(1)]);
    let outer = Value::list([shared.clone(), shared]);

    assert_eq!(serde_json::to_value(&outer).unwrap(), json!([[1], [1]]));
}
