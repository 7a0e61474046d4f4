// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Integration tests for the capability surface.

use super::*;
use crate::schema::{
    Callable, CallableValue, FieldDef, SchemaError, StructConfig, TypeExpr,
};
use std::sync::Arc;

fn table() -> &'static CapabilityTable {
    publish()
}

fn callable(value: Value) -> Value {
    let func: Callable = Arc::new(move || value.clone());
    Value::Callable(CallableValue(func))
}

#[test]
fn test_publish_and_import() {
    publish();
    let table = import(CAPI_NAME).expect("published table resolves");
    assert_eq!(table.version, CAPI_VERSION);

    let err = import("no.such.table").unwrap_err();
    assert_eq!(err, SchemaError::LookupFailure("no.such.table".to_string()));
}

#[test]
fn test_ext_roundtrip() {
    let t = table();
    let ext = (t.ext_new)(&[Value::Int(5), Value::Bytes(vec![1, 2, 3])]).expect("ext_new");
    assert_eq!((t.ext_get_code)(&ext).unwrap(), 5);
    assert_eq!((t.ext_get_data)(&ext).unwrap(), vec![1, 2, 3]);
    assert!((t.ext_check)(&ext));
    assert!((t.ext_check_exact)(&ext));
}

#[test]
fn test_ext_validation() {
    let t = table();
    // Code outside the signed 8-bit range.
    let err = (t.ext_new)(&[Value::Int(300), Value::Bytes(vec![])]).unwrap_err();
    assert!(matches!(err, SchemaError::TypeMismatch { .. }));
    // Payload must be bytes.
    let err = (t.ext_new)(&[Value::Int(1), Value::Str("nope".into())]).unwrap_err();
    assert!(matches!(err, SchemaError::TypeMismatch { .. }));
    // Getters verify the dynamic kind before touching the operand.
    let err = (t.ext_get_code)(&Value::Int(1)).unwrap_err();
    assert!(matches!(err, SchemaError::TypeMismatch { .. }));
}

#[test]
fn test_factory_operations() {
    let t = table();
    let factory = (t.factory_new)(&[callable(Value::List(Vec::new()))]).expect("factory_new");
    assert!((t.factory_check)(&factory));
    assert_eq!((t.factory_create)(&factory).unwrap(), Value::List(Vec::new()));

    let err = (t.factory_new)(&[Value::Str("NOT CALLABLE".into())]).unwrap_err();
    assert_eq!(err, SchemaError::InvalidDefaultFactory("str".to_string()));
}

#[test]
fn test_field_roundtrip() {
    let t = table();

    // Name, default and factory echo back exactly what was passed.
    let field = (t.field_new)(&[
        Value::Str("name".into()),
        Value::Str("default".into()),
        Value::Absent,
    ])
    .expect("field_new");
    assert_eq!(
        (t.field_get_name)(&field).unwrap(),
        Some("name".to_string())
    );
    assert_eq!(
        (t.field_get_default)(&field).unwrap(),
        Some(Value::Str("default".into()))
    );
    // Absent factory comes back as the none-marker, not an error.
    assert_eq!((t.field_get_factory)(&field).unwrap(), None);

    // A null default is a legitimate value, distinct from "no default".
    let with_null = (t.field_new)(&[Value::Str("n".into()), Value::Null, Value::Absent]).unwrap();
    assert_eq!((t.field_get_default)(&with_null).unwrap(), Some(Value::Null));

    let unset = (t.field_new)(&[Value::Absent, Value::Absent, Value::Absent]).unwrap();
    assert_eq!((t.field_get_name)(&unset).unwrap(), None);
    assert_eq!((t.field_get_default)(&unset).unwrap(), None);
}

#[test]
fn test_field_new_rejects_conflicts() {
    let t = table();
    let err = (t.field_new)(&[
        Value::Str("n".into()),
        Value::Int(0),
        callable(Value::Int(1)),
    ])
    .unwrap_err();
    assert!(matches!(err, SchemaError::ConfigConflict(_)));

    let err = (t.field_new)(&[Value::Str("n".into()), Value::Absent, Value::Int(0)]).unwrap_err();
    assert_eq!(err, SchemaError::InvalidDefaultFactory("int".to_string()));
}

#[test]
fn test_wrong_arity_has_no_side_effects() {
    let t = table();
    for args in [
        Vec::new(),
        vec![Value::Str("n".into())],
        vec![Value::Str("n".into()), Value::Absent],
        vec![
            Value::Str("n".into()),
            Value::Absent,
            Value::Absent,
            Value::Absent,
        ],
    ] {
        if args.len() == 3 {
            continue;
        }
        let err = (t.field_new)(&args).unwrap_err();
        assert_eq!(
            err,
            SchemaError::Arity {
                op: "field_new",
                expected: 3,
                got: args.len()
            }
        );
    }
    assert!(matches!(
        (t.ext_new)(&[Value::Int(1)]).unwrap_err(),
        SchemaError::Arity { expected: 2, .. }
    ));
    assert!(matches!(
        (t.factory_new)(&[]).unwrap_err(),
        SchemaError::Arity { expected: 1, .. }
    ));
}

#[test]
fn test_struct_new_and_field_name() {
    let t = table();
    let ty = (t.struct_new)(crate::schema::StructDecl::new(
        "CapiReading",
        vec![
            FieldDef::new("id", TypeExpr::Int),
            FieldDef::new("value", TypeExpr::Float),
        ],
    ))
    .expect("struct_new");

    let handle = Value::Type(ty.clone());
    assert_eq!((t.struct_get_field_name)(&handle, 0).unwrap(), "id");
    assert_eq!((t.struct_get_field_name)(&handle, 1).unwrap(), "value");
    let err = (t.struct_get_field_name)(&handle, 2).unwrap_err();
    assert_eq!(err, SchemaError::IndexOutOfBounds { index: 2, length: 2 });

    let err = (t.struct_get_field_name)(&Value::Int(0), 0).unwrap_err();
    assert!(matches!(err, SchemaError::TypeMismatch { .. }));
}

#[test]
fn test_struct_checks_walk_bases() {
    let t = table();
    let base = (t.struct_new)(crate::schema::StructDecl::new(
        "CapiBase",
        vec![FieldDef::new("a", TypeExpr::Int)],
    ))
    .expect("base");
    let derived = (t.struct_new)(
        crate::schema::StructDecl::new("CapiDerived", vec![FieldDef::new("b", TypeExpr::Int)])
            .bases(vec![base.clone()]),
    )
    .expect("derived");

    let instance = Value::Record(Arc::new(
        derived.construct(&[Value::Int(1), Value::Int(2)], &[]).unwrap(),
    ));

    // Exact: precise kind only. Inclusive: derived kinds accepted too.
    assert!((t.struct_check_exact)(&instance, &derived));
    assert!(!(t.struct_check_exact)(&instance, &base));
    assert!((t.struct_check)(&instance, &derived));
    assert!((t.struct_check)(&instance, &base));
    assert!(!(t.struct_check)(&Value::Int(0), &base));
}

/// Randomized sweep: wherever an exact kind check passes, the
/// subtype-inclusive form must pass as well.
#[test]
fn test_exact_check_implies_inclusive_check() {
    let t = table();
    let base = (t.struct_new)(
        crate::schema::StructDecl::new("PropBase", vec![FieldDef::new("a", TypeExpr::Int)])
            .config(StructConfig::new()),
    )
    .expect("base");
    let derived = (t.struct_new)(
        crate::schema::StructDecl::new("PropDerived", Vec::new()).bases(vec![base.clone()]),
    )
    .expect("derived");

    let mut rng = fastrand::Rng::with_seed(0x5eed);
    for _ in 0..500 {
        let value = match rng.usize(..8) {
            0 => Value::Null,
            1 => Value::Int(rng.i64(..)),
            2 => Value::Str("s".into()),
            3 => Value::Bytes(vec![rng.u8(..)]),
            4 => (t.ext_new)(&[Value::Int(i64::from(rng.i8(..))), Value::Bytes(vec![])])
                .unwrap(),
            5 => (t.factory_new)(&[callable(Value::Null)]).unwrap(),
            6 => (t.field_new)(&[Value::Absent, Value::Absent, Value::Absent]).unwrap(),
            _ => {
                let ty = if rng.bool() { &base } else { &derived };
                Value::Record(Arc::new(ty.construct(&[Value::Int(1)], &[]).unwrap()))
            }
        };

        for (exact, inclusive) in [
            (t.ext_check_exact, t.ext_check),
            (t.factory_check_exact, t.factory_check),
            (t.field_check_exact, t.field_check),
        ] {
            if exact(&value) {
                assert!(inclusive(&value), "exact implies inclusive for {:?}", value);
            }
        }
        for expected in [&base, &derived] {
            if (t.struct_check_exact)(&value, expected) {
                assert!(
                    (t.struct_check)(&value, expected),
                    "exact implies inclusive for {:?}",
                    value
                );
            }
        }
    }
}
