// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![allow(clippy::uninlined_format_args)] // Test/bench code readability over pedantic

//! Type registry resolution and schema metadata.

use serde_json::json;
use std::sync::Arc;
use std::thread;
use typed_model::{EnumType, ModelType, Primitive, Type, TypeRef, TypeRegistry};

fn registry_with_person() -> (TypeRegistry, ModelType) {
    let registry = TypeRegistry::new();
    let person = ModelType::builder("Person")
        .type_name("Person")
        .property("name", Primitive::String)
        .build()
        .expect("build Person");
    registry.register(person.clone()).expect("register");
    (registry, person)
}

#[test]
fn test_resolved_references_declare_properties() {
    let (registry, person) = registry_with_person();
    let team = ModelType::builder("Team")
        .type_name("Team")
        .property("lead", registry.resolve("Person").expect("resolve"))
        .property("members", registry.resolve("Person[]").expect("resolve"))
        .property("tags", registry.resolve("string[]").expect("resolve"))
        .build()
        .expect("build Team");

    let t = team
        .create(json!({"lead": {"name": "A"}, "members": [{"name": "B"}], "tags": "solo"}))
        .expect("create");
    assert!(t
        .value("lead")
        .expect("lead")
        .and_then(|v| v.into_model())
        .is_some_and(|m| m.is_instance_of(&person)));
    assert_eq!(t.items("members").expect("members").len(), 1);
    assert_eq!(t.clean().expect("clean")["tags"], json!(["solo"]));
}

#[test]
fn test_unknown_reference_fails() {
    let (registry, _) = registry_with_person();
    let err = registry.resolve("Robot[]").unwrap_err();
    assert_eq!(err.to_string(), "Unknown type: Robot");
}

#[test]
fn test_self_references_resolve_to_markers() {
    let registry = TypeRegistry::new();
    assert!(matches!(registry.resolve("self"), Ok(TypeRef::SelfType)));
    assert!(matches!(registry.resolve(" self[] "), Ok(TypeRef::SelfList)));
}

#[test]
fn test_describe_all_snapshot() {
    let (registry, person) = registry_with_person();
    let employee = person
        .extend("Employee")
        .type_name("Employee")
        .description("Someone on payroll")
        .property("manager", TypeRef::SelfType)
        .array_property("reports", TypeRef::SelfType)
        .build()
        .expect("build Employee");
    let status = EnumType::builder("Status")
        .type_name("Status")
        .values(["active", "retired"])
        .build()
        .expect("build Status");
    registry.register(employee).expect("register");
    registry.register(status).expect("register");

    assert_eq!(registry.type_names(), vec!["Employee", "Person", "Status"]);

    let infos: Vec<serde_json::Value> = registry
        .describe_all()
        .iter()
        .map(|info| info.to_json().expect("json"))
        .collect();
    assert_eq!(
        infos[0],
        json!({
            "kind": "model",
            "name": "Employee",
            "typeName": "Employee",
            "description": "Someone on payroll",
            "parent": "Person",
            "wrapped": true,
            "constructable": true,
            "additionalProperties": false,
            "attributes": [
                {"name": "name", "key": "name", "typeName": "string", "persisted": true},
                {"name": "manager", "key": "manager", "typeName": "self", "persisted": true},
                {"name": "reports", "key": "reports", "typeName": "self[]", "itemType": "self", "persisted": true}
            ]
        })
    );
    assert_eq!(infos[2]["values"], json!(["active", "retired"]));
}

#[test]
fn test_register_replaces_and_removes() {
    let (registry, person) = registry_with_person();
    let replacement = ModelType::builder("Person2")
        .type_name("Person")
        .build()
        .expect("build");
    registry.register(replacement.clone()).expect("register");
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.get("Person"), Some(Type::Model(replacement)));
    assert_ne!(registry.get("Person"), Some(Type::Model(person)));
    assert!(registry.remove("Person").is_some());
    assert!(registry.is_empty());
}

#[test]
fn test_concurrent_registration() {
    let registry = Arc::new(TypeRegistry::new());
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                let ty = ModelType::builder(format!("T{}", i))
                    .type_name(format!("T{}", i))
                    .property("n", Primitive::Integer)
                    .build()
                    .expect("build");
                registry.register(ty).expect("register");
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("join");
    }
    assert_eq!(registry.len(), 8);
    assert!(registry.contains("T7"));
}
