// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Capability table.
//!
//! A versioned, read-only table of function pointers and kind handles through
//! which dependent modules construct and inspect schema entities without
//! linking against this crate's internals. The table is published exactly
//! once under a well-known name and retrieved by name-keyed lookup; lookup
//! failure is a hard error, not a retry condition. The table's field order is
//! append-only: new entries go at the end so existing consumers keep working
//! after a version bump.

mod ops;

use crate::schema::{Result, SchemaError, StructDecl, StructType, Value, ValueKind};
use dashmap::DashMap;
use std::sync::{Arc, OnceLock};

/// Capability table format version.
pub const CAPI_VERSION: u32 = 1;

/// Well-known publication name.
pub const CAPI_NAME: &str = "hschema.capi";

/// Exported construction/inspection surface.
///
/// Dynamic-arity constructors take a `&[Value]` argument slice and verify the
/// exact argument count; getters verify the dynamic kind of their operand
/// before touching it. `*_check_exact` matches the precise kind;
/// `*_check` additionally accepts derived record kinds — wherever the exact
/// form is true, the inclusive form is true as well.
#[derive(Debug)]
pub struct CapabilityTable {
    /// Table format version. Check before assuming newer fields exist.
    pub version: u32,

    // Kind handles for the exported entities.
    pub ext_kind: ValueKind,
    pub factory_kind: ValueKind,
    pub field_kind: ValueKind,
    pub record_kind: ValueKind,
    pub type_kind: ValueKind,

    /// Build an extension value from `[code, data]`.
    pub ext_new: fn(&[Value]) -> Result<Value>,
    /// Extension code of an ext value.
    pub ext_get_code: fn(&Value) -> Result<i8>,
    /// Payload of an ext value.
    pub ext_get_data: fn(&Value) -> Result<Vec<u8>>,
    pub ext_check: fn(&Value) -> bool,
    pub ext_check_exact: fn(&Value) -> bool,

    /// Build a default factory from `[callable]`.
    pub factory_new: fn(&[Value]) -> Result<Value>,
    /// Invoke a factory, producing a fresh default.
    pub factory_create: fn(&Value) -> Result<Value>,
    pub factory_check: fn(&Value) -> bool,
    pub factory_check_exact: fn(&Value) -> bool,

    /// Build a field specification from `[name, default, factory]`; pass
    /// `Value::Absent` for unset positions.
    pub field_new: fn(&[Value]) -> Result<Value>,
    /// Bound name of a field spec; `None` while unbound.
    pub field_get_name: fn(&Value) -> Result<Option<String>>,
    /// Declared default; `None` means "no default set", which is a valid,
    /// non-error outcome distinct from a null default.
    pub field_get_default: fn(&Value) -> Result<Option<Value>>,
    /// Declared factory; `None` means "no factory set".
    pub field_get_factory: fn(&Value) -> Result<Option<Value>>,
    pub field_check: fn(&Value) -> bool,
    pub field_check_exact: fn(&Value) -> bool,

    /// Compile a struct declaration against the process registry.
    pub struct_new: fn(StructDecl) -> Result<Arc<StructType>>,
    /// Field name by index, for debugging and introspection.
    pub struct_get_field_name: fn(&Value, usize) -> Result<String>,
    /// True for an instance (or type handle) of `expected` or any record
    /// kind derived from it.
    pub struct_check: fn(&Value, &Arc<StructType>) -> bool,
    /// True only for the precise record kind `expected`.
    pub struct_check_exact: fn(&Value, &Arc<StructType>) -> bool,
}

static TABLE: CapabilityTable = CapabilityTable {
    version: CAPI_VERSION,
    ext_kind: ValueKind::Ext,
    factory_kind: ValueKind::Factory,
    field_kind: ValueKind::Field,
    record_kind: ValueKind::Record,
    type_kind: ValueKind::Type,
    ext_new: ops::ext_new,
    ext_get_code: ops::ext_get_code,
    ext_get_data: ops::ext_get_data,
    ext_check: ops::ext_check,
    ext_check_exact: ops::ext_check_exact,
    factory_new: ops::factory_new,
    factory_create: ops::factory_create,
    factory_check: ops::factory_check,
    factory_check_exact: ops::factory_check_exact,
    field_new: ops::field_new,
    field_get_name: ops::field_get_name,
    field_get_default: ops::field_get_default,
    field_get_factory: ops::field_get_factory,
    field_check: ops::field_check,
    field_check_exact: ops::field_check_exact,
    struct_new: ops::struct_new,
    struct_get_field_name: ops::struct_get_field_name,
    struct_check: ops::struct_check,
    struct_check_exact: ops::struct_check_exact,
};

fn table_registry() -> &'static DashMap<String, &'static CapabilityTable> {
    static REGISTRY: OnceLock<DashMap<String, &'static CapabilityTable>> = OnceLock::new();
    REGISTRY.get_or_init(DashMap::new)
}

/// Publish the capability table under [`CAPI_NAME`]. Idempotent; the table
/// is written once and read-only for the rest of process life.
pub fn publish() -> &'static CapabilityTable {
    let fresh = table_registry()
        .entry(CAPI_NAME.to_string())
        .or_insert(&TABLE);
    drop(fresh);
    log::debug!("[CAPI] capability table v{} available", CAPI_VERSION);
    &TABLE
}

/// Name-keyed lookup of a published capability table.
pub fn import(name: &str) -> Result<&'static CapabilityTable> {
    table_registry()
        .get(name)
        .map(|entry| *entry)
        .ok_or_else(|| SchemaError::LookupFailure(name.to_string()))
}

#[cfg(test)]
mod tests;
