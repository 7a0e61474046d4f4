// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Record descriptors.
//!
//! One descriptor is the compiled schema for one record-like declaration.
//! Exactly one variant is active per descriptor; all variants share the
//! ordered-field-table-plus-required-count shape, differing in whether names
//! are addressable and which construction hooks apply.

use crate::schema::field::{DefaultSource, FieldTable};
use crate::schema::node::{TagValue, TypeNode};
use crate::schema::record::{Hook, StructType};
use crate::schema::value::Value;
use crate::schema::{Result, SchemaError};
use std::sync::{Arc, Weak};

/// Compiled schema for a struct declaration.
///
/// Field names, defaults and offsets live on the class; the info carries the
/// per-field type nodes the encoder walks, parallel to the class field order.
#[derive(Debug)]
pub struct StructInfo {
    class: Weak<StructType>,
    types: Vec<TypeNode>,
}

impl StructInfo {
    pub(crate) fn new(class: &Arc<StructType>, types: Vec<TypeNode>) -> Self {
        Self {
            class: Arc::downgrade(class),
            types,
        }
    }

    /// Owning record type. Fails only if the type was dropped, which cannot
    /// happen while it is registered.
    pub fn class(&self) -> Result<Arc<StructType>> {
        self.class
            .upgrade()
            .ok_or_else(|| SchemaError::UnresolvedType("<dropped struct type>".to_string()))
    }

    /// Per-field type nodes, parallel to the class field order.
    pub fn types(&self) -> &[TypeNode] {
        &self.types
    }
}

/// Compiled schema for a dict-like (typed-dict) declaration.
#[derive(Debug)]
pub struct TypedDictInfo {
    name: String,
    nrequired: usize,
    table: FieldTable,
}

impl TypedDictInfo {
    pub(crate) fn new(name: String, nrequired: usize, table: FieldTable) -> Self {
        Self {
            name,
            nrequired,
            table,
        }
    }

    /// Declared name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of required keys.
    pub const fn nrequired(&self) -> usize {
        self.nrequired
    }

    /// Field table, declaration order.
    pub fn table(&self) -> &FieldTable {
        &self.table
    }
}

/// Compiled schema for a dataclass-like declaration.
#[derive(Debug)]
pub struct DataclassInfo {
    name: String,
    pre_init: Option<Hook>,
    post_init: Option<Hook>,
    defaults: Vec<Option<DefaultSource>>,
    table: FieldTable,
}

impl DataclassInfo {
    pub(crate) fn new(
        name: String,
        pre_init: Option<Hook>,
        post_init: Option<Hook>,
        defaults: Vec<Option<DefaultSource>>,
        table: FieldTable,
    ) -> Self {
        debug_assert_eq!(defaults.len(), table.len());
        Self {
            name,
            pre_init,
            post_init,
            defaults,
            table,
        }
    }

    /// Declared name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Pre-construction hook, if declared.
    pub fn pre_init(&self) -> Option<&Hook> {
        self.pre_init.as_ref()
    }

    /// Post-construction hook, if declared.
    pub fn post_init(&self) -> Option<&Hook> {
        self.post_init.as_ref()
    }

    /// Per-field default sources, parallel to the field table.
    pub fn defaults(&self) -> &[Option<DefaultSource>] {
        &self.defaults
    }

    /// Field table, declaration order.
    pub fn table(&self) -> &FieldTable {
        &self.table
    }
}

/// Compiled schema for an ordered-record (named-tuple) declaration.
///
/// Position is identity: there are no addressable names, only an ordered
/// type sequence plus trailing defaults.
#[derive(Debug)]
pub struct NamedTupleInfo {
    name: String,
    defaults: Vec<Value>,
    types: Vec<TypeNode>,
}

impl NamedTupleInfo {
    pub(crate) fn new(name: String, defaults: Vec<Value>, types: Vec<TypeNode>) -> Self {
        debug_assert!(defaults.len() <= types.len());
        Self {
            name,
            defaults,
            types,
        }
    }

    /// Declared name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Trailing default values.
    pub fn defaults(&self) -> &[Value] {
        &self.defaults
    }

    /// Ordered element types.
    pub fn types(&self) -> &[TypeNode] {
        &self.types
    }
}

/// Compiled schema for one record-like declaration, one variant per
/// supported source construct.
#[derive(Debug)]
pub enum RecordDescriptor {
    Struct(StructInfo),
    TypedDict(TypedDictInfo),
    Dataclass(DataclassInfo),
    NamedTuple(NamedTupleInfo),
}

impl RecordDescriptor {
    /// Declared name of the underlying record.
    pub fn name(&self) -> String {
        match self {
            Self::Struct(info) => info
                .class()
                .map(|c| c.name().to_string())
                .unwrap_or_else(|_| "<dropped struct type>".to_string()),
            Self::TypedDict(info) => info.name().to_string(),
            Self::Dataclass(info) => info.name().to_string(),
            Self::NamedTuple(info) => info.name().to_string(),
        }
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        match self {
            Self::Struct(info) => info.types().len(),
            Self::TypedDict(info) => info.table().len(),
            Self::Dataclass(info) => info.table().len(),
            Self::NamedTuple(info) => info.types().len(),
        }
    }

    /// True for a field-less record.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Count of fields a decoder must see: fields without defaults, taken
    /// over the non-keyword-only span for keyword-constructible shapes.
    pub fn required_count(&self) -> usize {
        match self {
            Self::Struct(info) => match info.class() {
                Ok(class) => class
                    .defaults()
                    .iter()
                    .take(class.positional_count())
                    .filter(|d| d.is_none())
                    .count(),
                Err(_) => 0,
            },
            Self::TypedDict(info) => info.nrequired(),
            Self::Dataclass(info) => info.defaults().iter().filter(|d| d.is_none()).count(),
            Self::NamedTuple(info) => info.types().len() - info.defaults().len(),
        }
    }

    /// Tag value, present only for tagged struct declarations.
    pub fn tag_value(&self) -> Option<TagValue> {
        match self {
            Self::Struct(info) => info.class().ok()?.tag_value().cloned(),
            _ => None,
        }
    }

    /// Struct payload, if this is the struct variant.
    pub fn as_struct(&self) -> Option<&StructInfo> {
        match self {
            Self::Struct(info) => Some(info),
            _ => None,
        }
    }

    /// Typed-dict payload, if this is the typed-dict variant.
    pub fn as_typed_dict(&self) -> Option<&TypedDictInfo> {
        match self {
            Self::TypedDict(info) => Some(info),
            _ => None,
        }
    }

    /// Dataclass payload, if this is the dataclass variant.
    pub fn as_dataclass(&self) -> Option<&DataclassInfo> {
        match self {
            Self::Dataclass(info) => Some(info),
            _ => None,
        }
    }

    /// Named-tuple payload, if this is the named-tuple variant.
    pub fn as_named_tuple(&self) -> Option<&NamedTupleInfo> {
        match self {
            Self::NamedTuple(info) => Some(info),
            _ => None,
        }
    }
}
