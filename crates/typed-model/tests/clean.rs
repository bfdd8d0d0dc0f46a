// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![allow(clippy::uninlined_format_args)] // Test/bench code readability over pedantic
#![allow(clippy::unreadable_literal)] // Large test constants

//! Clean projections and their JSON round trips.

use chrono::{TimeZone, Utc};
use serde_json::json;
use typed_model::{clean, clean_with, ArrayType, Error, ModelType, Primitive, Property, Record, Value};

fn address() -> ModelType {
    ModelType::builder("Address")
        .property_with(Property::new("zipCode", Primitive::String).key("zip"))
        .property("city", Primitive::String)
        .build()
        .expect("build Address")
}

#[test]
fn test_models_inside_plain_containers_are_discovered() {
    let address = address();
    let home = address.create(json!({"zip": 1234, "city": "Bergen"})).expect("create");

    let record = Record::new();
    record.insert("label", "home");
    record.insert("places", vec![Value::Model(home.clone()), Value::Null]);

    let out = clean(&Value::Object(record)).expect("clean");
    assert_eq!(
        out,
        json!({"label": "home", "places": [{"zip": "1234", "city": "Bergen"}, null]})
    );
}

#[test]
fn test_clean_output_is_detached() {
    let address = address();
    let home = address.create(json!({"city": "Bergen"})).expect("create");
    let out = home.clean().expect("clean");
    home.set("city", "Oslo").expect("set");
    assert_eq!(out, json!({"city": "Bergen"}));
}

#[test]
fn test_persisted_order_then_extras() {
    let open = ModelType::builder("Open")
        .property("b", Primitive::Integer)
        .property("a", Primitive::Integer)
        .additional_properties(true)
        .build()
        .expect("build Open");

    let o = open.create(json!({"z": true, "a": "1", "b": "2"})).expect("create");
    let text = o.to_json_string().expect("json");
    assert_eq!(text, r#"{"b":2,"a":1,"z":true}"#);
}

#[test]
fn test_extra_keys_reported_only_when_collecting() {
    let closed = ModelType::builder("Closed")
        .property("a", Primitive::Integer)
        .build()
        .expect("build Closed");

    let c = closed.create(json!({"a": 1, "junk": 2})).expect("create");
    assert_eq!(c.clean().expect("clean"), json!({"a": 1}));

    let mut errors = Vec::new();
    let out = c.clean_with(&mut errors).expect("collecting");
    assert_eq!(out, json!({"a": 1}));
    assert_eq!(errors.len(), 1);
    assert!(matches!(&errors[0], Error::UnrecognizedAttribute { key } if key == "junk"));
}

#[test]
fn test_scalar_projections() {
    let date = Utc.with_ymd_and_hms(2020, 1, 2, 3, 4, 5).single().expect("date");
    let input = Value::Array(vec![
        Value::Date(date),
        Value::Float(f64::INFINITY),
        Value::Float(0.25),
        Value::Int(-3),
        Value::Bool(true),
    ]);
    assert_eq!(
        clean(&input).expect("clean"),
        json!(["2020-01-02T03:04:05.000Z", null, 0.25, -3, true])
    );
}

#[test]
fn test_lists_clean_through_item_type() {
    let address = address();
    let addresses = ArrayType::of(address);
    let list = addresses
        .wrap(json!([{"zip": "1"}, {"city": "X"}]))
        .expect("wrap")
        .expect("list");

    let mut errors = Vec::new();
    let out = clean_with(&Value::List(list), &mut errors).expect("clean");
    assert!(errors.is_empty());
    assert_eq!(out, json!([{"zip": "1"}, {"city": "X"}]));
}

#[test]
fn test_round_trip_restores_primitive_and_date_properties() {
    let reading = ModelType::builder("Reading")
        .property("sensor", Primitive::String)
        .property("value", Primitive::Number)
        .property("count", Primitive::Integer)
        .property("ok", Primitive::Boolean)
        .property("at", Primitive::Date)
        .array_property("samples", Primitive::Number)
        .build()
        .expect("build Reading");

    let original = reading
        .create(json!({
            "sensor": "t1",
            "value": "21.5",
            "count": 3,
            "ok": "true",
            "at": 1460570400123i64,
            "samples": [1, "2.5", 3]
        }))
        .expect("create");

    let text = original.to_json_string().expect("json");
    let restored = reading
        .create(Value::parse_json(&text).expect("parse"))
        .expect("create");

    assert_eq!(restored.clean().expect("clean"), original.clean().expect("clean"));
    for name in ["sensor", "value", "count", "ok", "at"] {
        assert_eq!(
            restored.value(name).expect("restored"),
            original.value(name).expect("original"),
            "{}",
            name
        );
    }
    let at = restored
        .get::<chrono::DateTime<Utc>>("at")
        .expect("at")
        .expect("date");
    assert_eq!(at.timestamp_millis(), 1460570400123);
}

#[test]
fn test_serde_serialize_uses_clean() {
    let address = address();
    let home = address.create(json!({"zip": "9"})).expect("create");
    let wrapped = Value::Model(home);
    assert_eq!(
        serde_json::to_string(&wrapped).expect("serialize"),
        r#"{"zip":"9"}"#
    );
}
