// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Schema Compilation Benchmark
//!
//! Measures the two costs that matter for this subsystem:
//! - one-time declaration compilation (field merge + offsets + node build)
//! - steady-state work the encoder repeats per call (dispatch + field access)

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use hschema::{
    Dispatch, FieldDef, LiteralValue, SchemaBuilder, SchemaRegistry, StructDecl, TypeExpr, Value,
};

fn wide_decl(name: &str) -> StructDecl {
    let mut fields = Vec::with_capacity(32);
    for i in 0..30 {
        fields.push(FieldDef::new(format!("field_{}", i), TypeExpr::Int));
    }
    fields.push(FieldDef::new("tags", TypeExpr::list_of(TypeExpr::Str)).with_default(Value::List(vec![])));
    fields.push(
        FieldDef::new("mode", TypeExpr::Union(vec![
            TypeExpr::Literal(vec![LiteralValue::Int(0), LiteralValue::Int(1)]),
            TypeExpr::Int,
        ]))
        .with_default(Value::Int(0)),
    );
    StructDecl::new(name, fields)
}

/// Benchmark: compile a 32-field declaration from scratch
fn bench_build_struct(c: &mut Criterion) {
    let mut counter = 0u64;
    c.bench_function("schema_build_wide_struct", |b| {
        b.iter(|| {
            // Fresh registry per iteration; names may not repeat within one.
            let registry = SchemaRegistry::new();
            let builder = SchemaBuilder::new(&registry);
            counter += 1;
            let ty = builder
                .build_struct(wide_decl(&format!("Wide{}", counter)))
                .expect("build");
            black_box(ty);
        });
    });
}

/// Benchmark: per-call encoder work against a compiled descriptor
fn bench_dispatch_and_access(c: &mut Criterion) {
    let registry = SchemaRegistry::new();
    let builder = SchemaBuilder::new(&registry);
    let ty = builder.build_struct(wide_decl("Steady")).expect("build");
    let descriptor = ty.descriptor().expect("descriptor").clone();
    let info = descriptor.as_struct().expect("struct variant");
    let args: Vec<Value> = (0..30i64).map(Value::Int).collect();
    let instance = ty.construct(&args, &[]).expect("construct");

    c.bench_function("schema_dispatch_and_access", |b| {
        b.iter(|| {
            let mode_node = &info.types()[31];
            assert_eq!(mode_node.dispatch_int(black_box(1)), Dispatch::Literal);
            assert_eq!(mode_node.dispatch_int(black_box(7)), Dispatch::Plain);
            for offset in ty.offsets() {
                black_box(instance.get_by_offset(*offset).expect("slot"));
            }
        });
    });
}

criterion_group!(benches, bench_build_struct, bench_dispatch_and_access);
criterion_main!(benches);
