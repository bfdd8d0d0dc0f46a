// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Wrap / Clean Benchmark
//!
//! Measures the cost of the two hot paths of a model layer:
//! - wrapping fresh JSON into a nested model (coercion of every field)
//! - re-wrapping an already bound record (identity short-circuit)
//! - cleaning a nested model back to JSON

#![allow(clippy::uninlined_format_args)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::json;
use typed_model::{EnumType, ModelType, Primitive, Value};

fn order_type() -> ModelType {
    let status = EnumType::builder("Status")
        .values(["open", "shipped", "closed"])
        .auto_lower_case()
        .build()
        .expect("build Status");
    let line = ModelType::builder("Line")
        .property("sku", Primitive::String)
        .property("quantity", Primitive::Integer)
        .property("price", Primitive::Number)
        .build()
        .expect("build Line");
    ModelType::builder("Order")
        .property("id", Primitive::String)
        .property("placed", Primitive::Date)
        .property("status", status)
        .array_property("lines", line)
        .build()
        .expect("build Order")
}

fn order_json(lines: usize) -> serde_json::Value {
    let lines: Vec<serde_json::Value> = (0..lines)
        .map(|i| json!({"sku": format!("SKU-{}", i), "quantity": "2", "price": "9.95"}))
        .collect();
    json!({
        "id": 42,
        "placed": "2016-04-13T18:00:00.000Z",
        "status": "OPEN",
        "lines": lines
    })
}

fn bench_wrap_fresh(c: &mut Criterion) {
    let order = order_type();
    let mut group = c.benchmark_group("wrap_fresh");
    for lines in [1usize, 16, 128] {
        let data = order_json(lines);
        group.bench_with_input(BenchmarkId::from_parameter(lines), &data, |b, data| {
            b.iter(|| order.wrap(black_box(Value::from(data.clone()))).expect("wrap"));
        });
    }
    group.finish();
}

fn bench_rewrap_bound(c: &mut Criterion) {
    let order = order_type();
    let instance = order.create(order_json(16)).expect("create");
    let raw = instance.data().clone();
    c.bench_function("rewrap_bound", |b| {
        b.iter(|| order.wrap(black_box(raw.clone())).expect("wrap"));
    });
}

fn bench_clean(c: &mut Criterion) {
    let order = order_type();
    let mut group = c.benchmark_group("clean");
    for lines in [1usize, 16, 128] {
        let instance = order.create(order_json(lines)).expect("create");
        group.bench_with_input(BenchmarkId::from_parameter(lines), &instance, |b, instance| {
            b.iter(|| black_box(instance.clean().expect("clean")));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_wrap_fresh, bench_rewrap_bound, bench_clean);
criterion_main!(benches);
