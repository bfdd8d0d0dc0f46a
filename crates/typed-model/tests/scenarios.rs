// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![allow(clippy::uninlined_format_args)] // Test/bench code readability over pedantic
#![allow(clippy::float_cmp)] // Test assertions with constants
#![allow(clippy::unreadable_literal)] // Large test constants
#![allow(clippy::too_many_lines)] // Example/test code
#![allow(clippy::redundant_closure_for_method_calls)] // Test code clarity

//! End-to-end behaviour of wrap, construction, coercion and clean.
//!
//! Each test drives the public API the way an embedding application would.

use serde_json::json;
use typed_model::{
    unwrap, ArrayType, EnumType, Error, ModelType, Primitive, Value,
};

fn person() -> ModelType {
    ModelType::builder("Person")
        .property("name", Primitive::String)
        .property("age", Primitive::Integer)
        .build()
        .expect("build Person")
}

// ============================================================================
// Example scenarios
// ============================================================================

#[test]
fn test_wrap_coerces_without_errors() {
    let person = person();
    let mut errors = Vec::new();
    let john = person
        .wrap_with(json!({"name": "John", "age": "30"}), &mut errors)
        .expect("collecting")
        .and_then(Value::into_model)
        .expect("model");

    assert_eq!(john.get::<i64>("age").expect("age"), Some(30));
    assert_eq!(john.value("age").expect("age"), Some(Value::Int(30)));
    assert!(errors.is_empty());
}

#[test]
fn test_invalid_field_is_collected_and_absent() {
    let person = person();
    let mut errors = Vec::new();
    let instance = person
        .create_with(json!({"age": "not-a-number"}), &mut errors)
        .expect("collecting")
        .expect("model");

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].to_string(), "age: Invalid value: not-a-number");
    assert_eq!(instance.value("age").expect("age"), None);
}

#[test]
fn test_enum_coerce_and_reject() {
    let color = EnumType::builder("Color")
        .values(["red", "green", "blue"])
        .build()
        .expect("build Color");

    let red = color.coerce("red").expect("coerce").expect("red");
    assert!(red.is(&color.get("RED").expect("RED")));

    let mut errors = Vec::new();
    let purple = color.coerce_with("purple", &mut errors).expect("collecting");
    assert!(purple.is_none());
    assert_eq!(errors.len(), 1);
}

#[test]
fn test_nested_array_clean() {
    let person = person();
    let group = ModelType::builder("Group")
        .array_property("people", person)
        .build()
        .expect("build Group");

    let data = json!({"people": [{"name": "A", "age": 1}, {"name": "B", "age": 2}]});
    let g = group.create(data.clone()).expect("create");
    assert_eq!(g.clean().expect("clean"), data);
}

#[test]
fn test_date_survives_json_round_trip() {
    let event = ModelType::builder("Event")
        .property("at", Primitive::Date)
        .build()
        .expect("build Event");

    let e = event
        .create(json!({"at": "2016-04-13T18:00:00.000Z"}))
        .expect("create");
    let text = e.to_json_string().expect("json");
    assert_eq!(text, r#"{"at":"2016-04-13T18:00:00.000Z"}"#);

    let again = event.create(Value::parse_json(&text).expect("parse")).expect("create");
    let at = again
        .get::<chrono::DateTime<chrono::Utc>>("at")
        .expect("at")
        .expect("date");
    assert_eq!(at.timestamp_millis(), 1460570400000);
}

#[test]
fn test_additional_properties_kept_verbatim() {
    let bag = ModelType::builder("Bag")
        .additional_properties(true)
        .build()
        .expect("build Bag");

    let mut errors = Vec::new();
    let b = bag
        .create_with(json!({"a": 1, "b": 2}), &mut errors)
        .expect("collecting")
        .expect("model");
    assert!(errors.is_empty());
    assert_eq!(b.clean().expect("clean"), json!({"a": 1, "b": 2}));
}

// ============================================================================
// Wrap identity
// ============================================================================

#[test]
fn test_repeated_wraps_are_identical() {
    let person = person();
    let record = Value::from(json!({"name": "John"}));

    let first = person.wrap(record.clone()).expect("wrap");
    let second = person.wrap(record.clone()).expect("wrap");
    let third = person.wrap(first.clone()).expect("wrap");
    assert_eq!(first, second);
    assert_eq!(first, third);
}

#[test]
fn test_unwrap_round_trip_keeps_backing_record() {
    let person = person();
    let instance = person.create(json!({"name": "John"})).expect("create");

    let raw = unwrap(&Value::Model(instance.clone()));
    let rewrapped = person.wrap(raw.clone()).expect("wrap");
    let raw_again = unwrap(&rewrapped);

    let (a, b) = (raw.as_record().expect("record"), raw_again.as_record().expect("record"));
    assert!(a.ptr_eq(b));
    assert_eq!(person.unwrap(&rewrapped), raw);
}

// ============================================================================
// Error modes
// ============================================================================

#[test]
fn test_accumulator_counts_each_invalid_field() {
    let profile = ModelType::builder("Profile")
        .property("age", Primitive::Integer)
        .property("score", Primitive::Number)
        .property("born", Primitive::Date)
        .property("handler", Primitive::Function)
        .property("name", Primitive::String)
        .build()
        .expect("build Profile");

    let input = json!({
        "age": "x",
        "score": "y",
        "born": true,
        "handler": 3,
        "name": "ok",
        "extra": 1
    });

    let mut errors = Vec::new();
    let result = profile.create_with(input.clone(), &mut errors);
    assert!(result.is_ok());
    assert_eq!(errors.len(), 5);
    assert_eq!(errors[0].to_string(), "age: Invalid value: x");
    assert_eq!(errors[1].attribute(), Some("score"));
    assert!(errors[..4].iter().all(Error::is_coercion));
    assert_eq!(errors[4].to_string(), "Unrecognized attribute: extra");
}

#[test]
fn test_first_error_raises_without_accumulator() {
    let person = person();
    let err = person
        .create(json!({"age": "x", "name": "John"}))
        .unwrap_err();
    assert!(err.is_coercion());
    assert_eq!(err.to_string(), "age: Invalid value: x");
}

#[test]
fn test_unknown_keys_tolerated_without_accumulator() {
    let person = person();
    let p = person.create(json!({"name": "John", "nickname": "J"})).expect("create");
    assert_eq!(p.clean().expect("clean"), json!({"name": "John"}));
}

#[test]
fn test_top_level_coercion_has_no_prefix() {
    let err = Primitive::Integer.coerce("abc").unwrap_err();
    assert_eq!(err.to_string(), "Invalid value: abc");
    assert_eq!(err.attribute(), None);
}

// ============================================================================
// Adapters
// ============================================================================

#[test]
fn test_object_passthrough_clean_is_unchanged() {
    let holder = ModelType::builder("Holder")
        .property("payload", Primitive::Object)
        .build()
        .expect("build Holder");
    let payload = json!({"deep": {"list": [1, "two", null]}, "flag": false});
    let h = holder.create(json!({"payload": payload.clone()})).expect("create");
    assert_eq!(h.clean().expect("clean"), json!({"payload": payload}));
}

#[test]
fn test_array_order_preserved() {
    let numbers = ArrayType::of(Primitive::Number);
    let input: Vec<Value> = (0..50).rev().map(|n| Value::from(n.to_string())).collect();
    let out = numbers.coerce(input).expect("coerce").expect("array");
    let out = out.as_array().expect("array");
    for (i, item) in out.iter().enumerate() {
        assert_eq!(item, &Value::Int(49 - i as i64));
    }
}

#[test]
fn test_inherited_attribute_override() {
    let base = ModelType::builder("B")
        .property("p", Primitive::String)
        .build()
        .expect("build B");
    let derived = base
        .extend("D")
        .property("p", Primitive::Integer)
        .build()
        .expect("build D");

    let d = derived.create(json!({"p": "42"})).expect("create");
    assert_eq!(d.get::<i64>("p").expect("p"), Some(42));
    assert_eq!(d.clean().expect("clean"), json!({"p": 42}));
}
