// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Capability-surface integration tests.
//!
//! A dependent module is only allowed to touch the subsystem through the
//! imported table, so everything here goes through `capi::import` and the
//! function pointers it hands out.

use hschema::capi;
use hschema::{FieldDef, SchemaError, StructDecl, TypeExpr, Value};
use std::sync::Arc;

#[test]
fn dependent_module_workflow() {
    capi::publish();
    let table = capi::import(capi::CAPI_NAME).expect("lookup succeeds after publish");
    assert_eq!(table.version, capi::CAPI_VERSION);

    // Compile a type through the table alone.
    let ty = (table.struct_new)(StructDecl::new(
        "XModuleConfig",
        vec![
            FieldDef::new("endpoint", TypeExpr::Str),
            FieldDef::new("retries", TypeExpr::Int).with_default(Value::Int(3)),
        ],
    ))
    .expect("struct_new through the table");

    let handle = Value::Type(ty.clone());
    assert_eq!((table.struct_get_field_name)(&handle, 0).unwrap(), "endpoint");

    let instance = ty
        .construct(&[Value::Str("udp://localhost".into())], &[])
        .expect("construct");
    let as_value = Value::Record(Arc::new(instance));
    assert!((table.struct_check)(&as_value, &ty));
    assert!((table.struct_check_exact)(&as_value, &ty));
}

#[test]
fn lookup_failure_is_a_hard_error() {
    capi::publish();
    let err = capi::import("hschema.capi.v999").unwrap_err();
    assert_eq!(
        err,
        SchemaError::LookupFailure("hschema.capi.v999".to_string())
    );
}

#[test]
fn getters_report_kind_errors_not_crashes() {
    capi::publish();
    let table = capi::import(capi::CAPI_NAME).unwrap();
    assert!((table.field_get_name)(&Value::Int(1)).is_err());
    assert!((table.field_get_default)(&Value::Null).is_err());
    assert!((table.field_get_factory)(&Value::Str("f".into())).is_err());
    assert!((table.factory_create)(&Value::Int(1)).is_err());
    assert!((table.ext_get_code)(&Value::Bytes(vec![])).is_err());
}
