// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Mapping Benchmarks
//!
//! Measures the hot paths once descriptors are cached:
//! - descriptor lookup (cache hit)
//! - map -> bean property copy, exact and case-insensitive
//! - method invocation through the winner cache

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dynbean::{Bean, CopyOptions, Registry, Value};

#[derive(Bean, Debug, Clone, Default)]
#[bean(default)]
struct Order {
    pub id: i64,
    pub customer: String,
    pub amount: f64,
    pub lines: Vec<String>,
}

fn order_row() -> Value {
    Value::map(vec![
        ("id", Value::I64(42)),
        ("customer", Value::text("acme")),
        ("amount", Value::text("19.5")),
        (
            "lines",
            Value::list((0..8).map(|i| Value::text(format!("sku-{}", i)))),
        ),
    ])
}

fn bench_describe_hit(c: &mut Criterion) {
    let registry = Registry::new();
    registry.describe_of::<Order>();

    c.bench_function("describe_hit", |b| {
        b.iter(|| black_box(registry.describe_of::<Order>()));
    });
}

fn bench_copy_properties(c: &mut Criterion) {
    let registry = Registry::new();
    let row = order_row();

    c.bench_function("copy_map_to_bean", |b| {
        b.iter(|| {
            let order = Value::object(Order::default());
            registry
                .copy_properties(black_box(&row), &order, false)
                .expect("copy");
            order
        });
    });

    c.bench_function("copy_map_to_bean_ci", |b| {
        b.iter(|| {
            let order = Value::object(Order::default());
            registry
                .copy_properties_with(black_box(&row), &order, CopyOptions::case_insensitive())
                .expect("copy");
            order
        });
    });
}

fn bench_invoke(c: &mut Criterion) {
    let registry = Registry::new();
    let order = Value::object(Order::default());

    c.bench_function("get_value", |b| {
        b.iter(|| registry.get_value(&order, black_box("customer")).expect("get"));
    });

    c.bench_function("set_value_coerced", |b| {
        b.iter(|| {
            registry
                .set_value(&order, "id", black_box(Value::text("7")), false)
                .expect("set")
        });
    });
}

criterion_group!(benches, bench_describe_hit, bench_copy_properties, bench_invoke);
criterion_main!(benches);
