//! Performance benchmarks for model validation and resolution
//!
//! Measures the global validation pass and resolved-view construction for
//! models with deep inheritance chains and scalar-typed properties.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use metamodel_introspect::prelude::*;
use serde_json::json;

/// Build a model of `depth` chained classes, each with a scalar-typed field
fn create_test_model(depth: usize) -> ModelManager {
    let mut declarations = vec![json!({
        "$class": "concerto.metamodel@1.0.0.StringScalar",
        "name": "Code",
        "validator": { "pattern": "^[A-Z]{3}$" }
    })];
    for level in 0..depth {
        let mut declaration = json!({
            "$class": "concerto.metamodel@1.0.0.ConceptDeclaration",
            "name": format!("Level{level}"),
            "properties": [
                {
                    "$class": "concerto.metamodel@1.0.0.ObjectProperty",
                    "name": format!("code{level}"),
                    "type": { "name": "Code" }
                },
                {
                    "$class": "concerto.metamodel@1.0.0.IntegerProperty",
                    "name": format!("count{level}"),
                    "validator": { "lower": 0, "upper": 100 }
                }
            ]
        });
        if level > 0 {
            declaration["superType"] = json!({ "name": format!("Level{}", level - 1) });
        }
        declarations.push(declaration);
    }

    let mut manager = ModelManager::new();
    manager
        .add_model_value(&json!({ "namespace": "org.bench", "declarations": declarations }))
        .expect("Failed to register benchmark model");
    manager
}

fn bench_validate(c: &mut Criterion) {
    let mut group = c.benchmark_group("validate");
    for depth in [10, 50, 200] {
        let manager = create_test_model(depth);
        group.bench_with_input(BenchmarkId::from_parameter(depth), &manager, |b, manager| {
            b.iter(|| black_box(manager.validate()).expect("valid model"));
        });
    }
    group.finish();
}

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve");
    for depth in [10, 50, 200] {
        let manager = create_test_model(depth);
        group.bench_with_input(BenchmarkId::from_parameter(depth), &manager, |b, manager| {
            b.iter(|| black_box(manager.resolve().expect("valid model").len()));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_validate, bench_resolve);
criterion_main!(benches);
