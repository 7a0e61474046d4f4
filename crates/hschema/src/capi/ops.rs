// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Capability table operations.
//!
//! Every entry point here is reachable through function pointers handed to
//! dependent modules, so none may panic on bad input: wrong argument counts
//! and wrong dynamic kinds come back as errors.

use crate::schema::{Ext, Factory, FieldSpec, SchemaBuilder, StructDecl, StructType, Value};
use crate::schema::{Result, SchemaError};
use std::sync::Arc;

fn expect_arity(op: &'static str, expected: usize, args: &[Value]) -> Result<()> {
    if args.len() != expected {
        return Err(SchemaError::Arity {
            op,
            expected,
            got: args.len(),
        });
    }
    Ok(())
}

fn kind_error(expected: &str, got: &Value) -> SchemaError {
    SchemaError::TypeMismatch {
        expected: expected.to_string(),
        got: got.kind_name().to_string(),
    }
}

// ---------------------------------------------------------------------------
// Ext
// ---------------------------------------------------------------------------

/// `[code, data]` -> ext value. The code must fit [-128, 127]; the payload
/// must be a byte string.
pub(super) fn ext_new(args: &[Value]) -> Result<Value> {
    expect_arity("ext_new", 2, args)?;
    let code = args[0]
        .as_int()
        .ok_or_else(|| kind_error("int code", &args[0]))?;
    let data = args[1]
        .as_bytes()
        .ok_or_else(|| kind_error("bytes payload", &args[1]))?;
    Ok(Value::Ext(Arc::new(Ext::new(code, data.to_vec())?)))
}

pub(super) fn ext_get_code(value: &Value) -> Result<i8> {
    match value {
        Value::Ext(ext) => Ok(ext.code),
        other => Err(kind_error("ext", other)),
    }
}

pub(super) fn ext_get_data(value: &Value) -> Result<Vec<u8>> {
    match value {
        Value::Ext(ext) => Ok(ext.data.clone()),
        other => Err(kind_error("ext", other)),
    }
}

pub(super) fn ext_check_exact(value: &Value) -> bool {
    matches!(value, Value::Ext(_))
}

// Ext has no derived kinds; inclusive coincides with exact.
pub(super) fn ext_check(value: &Value) -> bool {
    ext_check_exact(value)
}

// ---------------------------------------------------------------------------
// Factory
// ---------------------------------------------------------------------------

/// `[callable]` -> factory.
pub(super) fn factory_new(args: &[Value]) -> Result<Value> {
    expect_arity("factory_new", 1, args)?;
    Ok(Value::Factory(Factory::from_value(&args[0])?))
}

pub(super) fn factory_create(value: &Value) -> Result<Value> {
    match value {
        Value::Factory(factory) => Ok(factory.create()),
        other => Err(kind_error("factory", other)),
    }
}

pub(super) fn factory_check_exact(value: &Value) -> bool {
    matches!(value, Value::Factory(_))
}

pub(super) fn factory_check(value: &Value) -> bool {
    factory_check_exact(value)
}

// ---------------------------------------------------------------------------
// Field
// ---------------------------------------------------------------------------

/// `[name, default, factory]` -> field spec. `Value::Absent` marks an unset
/// position; a null default is a legitimate value, not "unset".
pub(super) fn field_new(args: &[Value]) -> Result<Value> {
    expect_arity("field_new", 3, args)?;
    let name = match &args[0] {
        Value::Absent => None,
        Value::Str(s) => Some(s.clone()),
        other => return Err(kind_error("str name or absent", other)),
    };
    let default = match &args[1] {
        Value::Absent => None,
        other => Some(other.clone()),
    };
    let factory = match &args[2] {
        Value::Absent => None,
        other => Some(Factory::from_value(other)?),
    };
    Ok(Value::Field(Arc::new(FieldSpec::new(
        name, default, factory,
    )?)))
}

pub(super) fn field_get_name(value: &Value) -> Result<Option<String>> {
    match value {
        Value::Field(spec) => Ok(spec.name().map(str::to_string)),
        other => Err(kind_error("field", other)),
    }
}

pub(super) fn field_get_default(value: &Value) -> Result<Option<Value>> {
    match value {
        Value::Field(spec) => Ok(spec.default().cloned()),
        other => Err(kind_error("field", other)),
    }
}

pub(super) fn field_get_factory(value: &Value) -> Result<Option<Value>> {
    match value {
        Value::Field(spec) => Ok(spec.factory().cloned().map(Value::Factory)),
        other => Err(kind_error("field", other)),
    }
}

pub(super) fn field_check_exact(value: &Value) -> bool {
    matches!(value, Value::Field(_))
}

pub(super) fn field_check(value: &Value) -> bool {
    field_check_exact(value)
}

// ---------------------------------------------------------------------------
// Struct types
// ---------------------------------------------------------------------------

/// Compile a struct declaration against the process-wide registry.
pub(super) fn struct_new(decl: StructDecl) -> Result<Arc<StructType>> {
    SchemaBuilder::new(crate::schema::global()).build_struct(decl)
}

pub(super) fn struct_get_field_name(value: &Value, index: usize) -> Result<String> {
    match value {
        Value::Type(ty) => ty.field_name(index).map(str::to_string),
        other => Err(kind_error("record type", other)),
    }
}

fn instance_type(value: &Value) -> Option<&Arc<StructType>> {
    match value {
        Value::Record(instance) => Some(instance.ty()),
        Value::Type(ty) => Some(ty),
        _ => None,
    }
}

pub(super) fn struct_check_exact(value: &Value, expected: &Arc<StructType>) -> bool {
    instance_type(value).is_some_and(|ty| Arc::ptr_eq(ty, expected))
}

pub(super) fn struct_check(value: &Value, expected: &Arc<StructType>) -> bool {
    instance_type(value).is_some_and(|ty| ty.is_subtype_of(expected))
}
