// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Field specifications and field tables.
//!
//! [`FieldSpec`] is the user-declared default/default-factory input; it is
//! consumed during declaration and its contents copied into the compiled
//! tables — the spec object itself is not retained by any descriptor.

use crate::schema::node::{TypeExpr, TypeNode};
use crate::schema::value::{Callable, Value};
use crate::schema::{Result, SchemaError};
use std::fmt;
use std::sync::Arc;

/// Zero-argument default factory, invoked once per record construction to
/// produce a fresh default.
#[derive(Clone)]
pub struct Factory {
    func: Callable,
}

impl Factory {
    /// Wrap a callable as a factory.
    pub fn new(func: Callable) -> Self {
        Self { func }
    }

    /// Coerce a dynamic value into a factory. Accepts a bare callable or an
    /// existing factory handle; anything else is not a valid default factory.
    pub fn from_value(value: &Value) -> Result<Factory> {
        match value {
            Value::Callable(c) => Ok(Factory::new(c.0.clone())),
            Value::Factory(f) => Ok(f.clone()),
            other => Err(SchemaError::InvalidDefaultFactory(
                other.kind_name().to_string(),
            )),
        }
    }

    /// Produce a fresh default value.
    pub fn create(&self) -> Value {
        (self.func)()
    }
}

impl fmt::Debug for Factory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Factory")
    }
}

impl PartialEq for Factory {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.func, &other.func)
    }
}

/// Origin of one field's default.
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultSource {
    /// Plain value, cloned per construction.
    Value(Value),
    /// Factory, invoked per construction.
    Factory(Factory),
}

impl DefaultSource {
    /// Materialize the default for one construction.
    pub fn resolve(&self) -> Value {
        match self {
            Self::Value(v) => v.clone(),
            Self::Factory(f) => f.create(),
        }
    }
}

/// A declared field default specification.
///
/// At most one of default and factory may be set; setting both is a
/// configuration conflict. The name may stay unset until a declaration binds
/// the spec to a field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    name: Option<String>,
    default: Option<Value>,
    factory: Option<Factory>,
}

impl FieldSpec {
    /// Create a spec. `default` and `factory` are mutually exclusive.
    pub fn new(
        name: Option<String>,
        default: Option<Value>,
        factory: Option<Factory>,
    ) -> Result<Self> {
        if default.is_some() && factory.is_some() {
            return Err(SchemaError::ConfigConflict(
                "cannot set both `default` and `factory`".to_string(),
            ));
        }
        Ok(Self {
            name,
            default,
            factory,
        })
    }

    /// Spec with no default.
    pub fn required() -> Self {
        Self {
            name: None,
            default: None,
            factory: None,
        }
    }

    /// Spec with a plain default value.
    pub fn with_default(value: Value) -> Self {
        Self {
            name: None,
            default: Some(value),
            factory: None,
        }
    }

    /// Spec with a default factory.
    pub fn with_factory(factory: Factory) -> Self {
        Self {
            name: None,
            default: None,
            factory: Some(factory),
        }
    }

    /// Bound field name, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Declared default value, if any. `None` means "no default", never a
    /// null default — a null default is `Some(Value::Null)`.
    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// Declared default factory, if any.
    pub fn factory(&self) -> Option<&Factory> {
        self.factory.as_ref()
    }

    /// True if either a default or a factory is declared.
    pub fn has_default(&self) -> bool {
        self.default.is_some() || self.factory.is_some()
    }

    /// Consume the spec into its default source, if any.
    pub(crate) fn into_source(self) -> Option<DefaultSource> {
        match (self.default, self.factory) {
            (Some(v), None) => Some(DefaultSource::Value(v)),
            (None, Some(f)) => Some(DefaultSource::Factory(f)),
            _ => None,
        }
    }
}

/// One newly declared field in a record namespace.
#[derive(Debug, Clone)]
pub struct FieldDef {
    /// Field name, unique within the namespace.
    pub name: String,
    /// Declared annotation.
    pub ty: TypeExpr,
    /// Default specification.
    pub spec: FieldSpec,
}

impl FieldDef {
    /// Required field.
    pub fn new(name: impl Into<String>, ty: TypeExpr) -> Self {
        Self {
            name: name.into(),
            ty,
            spec: FieldSpec::required(),
        }
    }

    /// Attach a plain default.
    pub fn with_default(mut self, value: Value) -> Self {
        self.spec = FieldSpec::with_default(value);
        self
    }

    /// Attach a default factory.
    pub fn with_factory(mut self, factory: Factory) -> Self {
        self.spec = FieldSpec::with_factory(factory);
        self
    }
}

/// One compiled field-table entry.
#[derive(Debug)]
pub struct FieldEntry {
    key: String,
    node: TypeNode,
}

impl FieldEntry {
    pub(crate) fn new(key: String, node: TypeNode) -> Self {
        Self { key, node }
    }

    /// Field name.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Compiled type node. Owned by this entry alone.
    pub fn node(&self) -> &TypeNode {
        &self.node
    }
}

/// Ordered, name-addressable field table belonging to one record descriptor.
///
/// Ordering is declaration order and is semantically meaningful: it is encode
/// order for array-like output and positional-argument order for
/// construction.
#[derive(Debug, Default)]
pub struct FieldTable {
    entries: Vec<FieldEntry>,
}

impl FieldTable {
    /// Empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry. Duplicate keys are a construction error.
    pub fn push(&mut self, key: String, node: TypeNode) -> Result<()> {
        if self.index_of(&key).is_some() {
            return Err(SchemaError::DuplicateField(key));
        }
        self.entries.push(FieldEntry::new(key, node));
        Ok(())
    }

    /// Entries in declaration order.
    pub fn entries(&self) -> &[FieldEntry] {
        &self.entries
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the table has no fields.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Position of `key`, if present.
    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.key == key)
    }

    /// Entry by name.
    pub fn get(&self, key: &str) -> Option<&FieldEntry> {
        self.entries.iter().find(|e| e.key == key)
    }
}
