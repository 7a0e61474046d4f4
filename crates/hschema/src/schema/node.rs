// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Tagged-union type descriptors.
//!
//! [`TypeNode`] is the compiled form of one declared annotation: a kind
//! bitset plus the detail slots those kinds require. Compilation happens once
//! at declaration time; afterwards the encoder walks tag bits and detail
//! slots without ever revisiting the annotation.

use crate::schema::kind::Kinds;
use crate::schema::literal::{LiteralTable, LiteralValue};
use crate::schema::registry::{RecordRef, SchemaRegistry};
use crate::schema::{Result, SchemaError};
use std::collections::HashMap;
use std::sync::Arc;

/// A declared type annotation, before compilation.
///
/// This is the safe input model; [`TypeNode::compile`] turns it into the
/// runtime descriptor.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpr {
    /// Accept anything, no validation.
    Any,
    /// Null/none only.
    None,
    Bool,
    Int,
    Float,
    Str,
    Bytes,
    /// Extension value.
    Ext,
    /// Variable-length list with optional length bound.
    List {
        element: Box<TypeExpr>,
        bound: Option<usize>,
    },
    /// Homogeneous tuple with optional fixed length.
    Tuple {
        element: Box<TypeExpr>,
        len: Option<usize>,
    },
    /// Key/value map.
    Map {
        key: Box<TypeExpr>,
        value: Box<TypeExpr>,
    },
    /// Nested record, referenced by declared name.
    Record(String),
    /// Union of int/str/none literals.
    Literal(Vec<LiteralValue>),
    /// Union of alternatives.
    Union(Vec<TypeExpr>),
}

impl TypeExpr {
    /// Shorthand for `Union([inner, None])`.
    pub fn optional(inner: TypeExpr) -> TypeExpr {
        TypeExpr::Union(vec![inner, TypeExpr::None])
    }

    /// Shorthand for an unbounded list.
    pub fn list_of(element: TypeExpr) -> TypeExpr {
        TypeExpr::List {
            element: Box::new(element),
            bound: None,
        }
    }
}

/// Tag value discriminating one record inside a tagged union.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TagValue {
    Int(i64),
    Str(String),
}

impl TagValue {
    /// Tag as a dynamic value (what the encoder emits for the tag field).
    pub fn to_value(&self) -> crate::schema::Value {
        match self {
            Self::Int(v) => crate::schema::Value::Int(*v),
            Self::Str(v) => crate::schema::Value::Str(v.clone()),
        }
    }
}

/// Tag-keyed lookup for a union of record types.
#[derive(Debug)]
pub struct UnionLookup {
    by_tag: HashMap<TagValue, RecordRef>,
}

impl UnionLookup {
    /// Resolve the record for a decoded tag value.
    pub fn record_for_tag(&self, tag: &TagValue) -> Option<&RecordRef> {
        self.by_tag.get(tag)
    }

    /// Number of alternatives.
    pub fn len(&self) -> usize {
        self.by_tag.len()
    }

    /// Always false after construction; unions need two alternatives.
    pub fn is_empty(&self) -> bool {
        self.by_tag.is_empty()
    }
}

/// Kind-specific parameter slot attached to a node.
///
/// Slot presence is fully determined by the bits set on the owning node, in
/// this order: literal table, record ref, record-union lookup, list element,
/// list bound, tuple element, tuple length, map key, map value.
#[derive(Debug, Clone)]
pub enum TypeDetail {
    Literals(Arc<LiteralTable>),
    Record(RecordRef),
    RecordUnion(Arc<UnionLookup>),
    ListElement(Box<TypeNode>),
    ListBound(usize),
    TupleElement(Box<TypeNode>),
    TupleLen(usize),
    MapKey(Box<TypeNode>),
    MapValue(Box<TypeNode>),
}

/// Encode/decode dispatch outcome for a candidate scalar value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// Exact literal match; the more specific path wins.
    Literal,
    /// No literal match, broad kind accepts the value (decode fallback).
    Plain,
    /// Value not admissible for this node.
    Reject,
}

/// Compiled descriptor for one declared type.
///
/// Immutable after construction and owned by exactly one field-table entry or
/// descriptor slot. Nested records are stored as registry handles, never as
/// copies, so recursive declarations resolve once their own compilation
/// completes.
#[derive(Debug, Clone)]
pub struct TypeNode {
    kinds: Kinds,
    details: Vec<TypeDetail>,
}

impl TypeNode {
    /// Compile a declared annotation against `registry`.
    pub fn compile(expr: &TypeExpr, registry: &SchemaRegistry) -> Result<TypeNode> {
        let mut cx = CompileCx::default();
        cx.absorb(expr, registry, false)?;
        cx.finish(registry)
    }

    /// Kind bitset of this node.
    pub const fn kinds(&self) -> Kinds {
        self.kinds
    }

    /// Detail slots, in the documented order.
    pub fn details(&self) -> &[TypeDetail] {
        &self.details
    }

    /// Literal table, if the LITERAL bit is set.
    pub fn literals(&self) -> Option<&Arc<LiteralTable>> {
        self.details.iter().find_map(|d| match d {
            TypeDetail::Literals(t) => Some(t),
            _ => None,
        })
    }

    /// Nested record handle, if the RECORD bit is set.
    pub fn record(&self) -> Option<&RecordRef> {
        self.details.iter().find_map(|d| match d {
            TypeDetail::Record(r) => Some(r),
            _ => None,
        })
    }

    /// Tag lookup, if the RECORD_UNION bit is set.
    pub fn record_union(&self) -> Option<&Arc<UnionLookup>> {
        self.details.iter().find_map(|d| match d {
            TypeDetail::RecordUnion(u) => Some(u),
            _ => None,
        })
    }

    /// List element node, if the LIST bit is set.
    pub fn list_element(&self) -> Option<&TypeNode> {
        self.details.iter().find_map(|d| match d {
            TypeDetail::ListElement(n) => Some(n.as_ref()),
            _ => None,
        })
    }

    /// Declared list bound, if any.
    pub fn list_bound(&self) -> Option<usize> {
        self.details.iter().find_map(|d| match d {
            TypeDetail::ListBound(b) => Some(*b),
            _ => None,
        })
    }

    /// Tuple element node, if the TUPLE bit is set.
    pub fn tuple_element(&self) -> Option<&TypeNode> {
        self.details.iter().find_map(|d| match d {
            TypeDetail::TupleElement(n) => Some(n.as_ref()),
            _ => None,
        })
    }

    /// Declared tuple length, if any.
    pub fn tuple_len(&self) -> Option<usize> {
        self.details.iter().find_map(|d| match d {
            TypeDetail::TupleLen(l) => Some(*l),
            _ => None,
        })
    }

    /// Map key node, if the MAP bit is set.
    pub fn map_key(&self) -> Option<&TypeNode> {
        self.details.iter().find_map(|d| match d {
            TypeDetail::MapKey(n) => Some(n.as_ref()),
            _ => None,
        })
    }

    /// Map value node, if the MAP bit is set.
    pub fn map_value(&self) -> Option<&TypeNode> {
        self.details.iter().find_map(|d| match d {
            TypeDetail::MapValue(n) => Some(n.as_ref()),
            _ => None,
        })
    }

    /// True if a null value is admissible (NONE bit or a `None` literal).
    pub fn accepts_none(&self) -> bool {
        if self.kinds.contains(Kinds::NONE) || self.kinds.contains(Kinds::ANY) {
            return true;
        }
        self.literals().is_some_and(|t| t.allows_none())
    }

    /// Dispatch an int: an exact literal match beats the broad INT kind,
    /// which remains the decode-time fallback.
    pub fn dispatch_int(&self, value: i64) -> Dispatch {
        if let Some(table) = self.literals() {
            if table.contains_int(value) {
                return Dispatch::Literal;
            }
        }
        if self.kinds.intersects(Kinds::INT.union(Kinds::ANY)) {
            Dispatch::Plain
        } else {
            Dispatch::Reject
        }
    }

    /// Dispatch a str, with the same literal-first tie-break as ints.
    pub fn dispatch_str(&self, value: &str) -> Dispatch {
        if let Some(table) = self.literals() {
            if table.contains_str(value) {
                return Dispatch::Literal;
            }
        }
        if self.kinds.intersects(Kinds::STR.union(Kinds::ANY)) {
            Dispatch::Plain
        } else {
            Dispatch::Reject
        }
    }
}

/// Working state for one annotation compilation.
#[derive(Default)]
struct CompileCx {
    kinds: Kinds,
    literals: Vec<LiteralValue>,
    records: Vec<String>,
    list: Option<(TypeExpr, Option<usize>)>,
    tuple: Option<(TypeExpr, Option<usize>)>,
    map: Option<(TypeExpr, TypeExpr)>,
}

impl CompileCx {
    fn add_kind(&mut self, kind: Kinds, name: &str) -> Result<()> {
        if self.kinds.intersects(kind) {
            return Err(SchemaError::ConfigConflict(format!(
                "union may not contain more than one {} type",
                name
            )));
        }
        self.kinds |= kind;
        Ok(())
    }

    fn absorb(&mut self, expr: &TypeExpr, registry: &SchemaRegistry, in_union: bool) -> Result<()> {
        match expr {
            TypeExpr::Any => {
                if in_union {
                    return Err(SchemaError::ConfigConflict(
                        "union may not contain Any".to_string(),
                    ));
                }
                self.kinds |= Kinds::ANY;
            }
            TypeExpr::None => self.add_kind(Kinds::NONE, "none")?,
            TypeExpr::Bool => self.add_kind(Kinds::BOOL, "bool")?,
            TypeExpr::Int => self.add_kind(Kinds::INT, "int")?,
            TypeExpr::Float => self.add_kind(Kinds::FLOAT, "float")?,
            TypeExpr::Str => self.add_kind(Kinds::STR, "str")?,
            TypeExpr::Bytes => self.add_kind(Kinds::BYTES, "bytes")?,
            TypeExpr::Ext => self.add_kind(Kinds::EXT, "ext")?,
            TypeExpr::List { element, bound } => {
                self.add_kind(Kinds::LIST, "list")?;
                self.list = Some((element.as_ref().clone(), *bound));
            }
            TypeExpr::Tuple { element, len } => {
                self.add_kind(Kinds::TUPLE, "tuple")?;
                self.tuple = Some((element.as_ref().clone(), *len));
            }
            TypeExpr::Map { key, value } => {
                self.add_kind(Kinds::MAP, "map")?;
                self.map = Some((key.as_ref().clone(), value.as_ref().clone()));
            }
            TypeExpr::Record(name) => {
                self.records.push(name.clone());
            }
            TypeExpr::Literal(values) => {
                if values.is_empty() {
                    return Err(SchemaError::ConfigConflict(
                        "literal annotation needs at least one alternative".to_string(),
                    ));
                }
                self.kinds |= Kinds::LITERAL;
                self.literals.extend(values.iter().cloned());
            }
            TypeExpr::Union(alts) => {
                if alts.len() < 2 {
                    return Err(SchemaError::ConfigConflict(
                        "union needs at least two alternatives".to_string(),
                    ));
                }
                for alt in alts {
                    // Nested unions flatten into the same bitset.
                    match alt {
                        TypeExpr::Union(inner) => {
                            for e in inner {
                                self.absorb(e, registry, true)?;
                            }
                        }
                        other => self.absorb(other, registry, true)?,
                    }
                }
            }
        }
        Ok(())
    }

    fn finish(self, registry: &SchemaRegistry) -> Result<TypeNode> {
        let mut kinds = self.kinds;
        let mut details = Vec::new();

        if kinds.contains(Kinds::LITERAL) {
            let table = LiteralTable::build(&self.literals)?;
            details.push(TypeDetail::Literals(Arc::new(table)));
        }

        match self.records.len() {
            0 => {}
            1 => {
                kinds |= Kinds::RECORD;
                details.push(TypeDetail::Record(registry.declare(&self.records[0])));
            }
            _ => {
                kinds |= Kinds::RECORD_UNION;
                details.push(TypeDetail::RecordUnion(Arc::new(build_union_lookup(
                    &self.records,
                    registry,
                )?)));
            }
        }

        if let Some((element, bound)) = self.list {
            details.push(TypeDetail::ListElement(Box::new(TypeNode::compile(
                &element, registry,
            )?)));
            if let Some(bound) = bound {
                details.push(TypeDetail::ListBound(bound));
            }
        }
        if let Some((element, len)) = self.tuple {
            details.push(TypeDetail::TupleElement(Box::new(TypeNode::compile(
                &element, registry,
            )?)));
            if let Some(len) = len {
                details.push(TypeDetail::TupleLen(len));
            }
        }
        if let Some((key, value)) = self.map {
            details.push(TypeDetail::MapKey(Box::new(TypeNode::compile(
                &key, registry,
            )?)));
            details.push(TypeDetail::MapValue(Box::new(TypeNode::compile(
                &value, registry,
            )?)));
        }

        if kinds.is_empty() {
            return Err(SchemaError::ConfigConflict(
                "annotation accepts no kind".to_string(),
            ));
        }
        Ok(TypeNode { kinds, details })
    }
}

/// A union of two or more records dispatches by tag: every alternative must
/// already be a resolved, tagged struct declaration, and tag values must be
/// unique across the union.
fn build_union_lookup(names: &[String], registry: &SchemaRegistry) -> Result<UnionLookup> {
    let mut by_tag = HashMap::new();
    for name in names {
        let record = registry.declare(name);
        let descriptor = record.get()?;
        let tag = descriptor
            .tag_value()
            .ok_or_else(|| SchemaError::ConfigConflict(format!(
                "record '{}' in a union must declare a tag",
                name
            )))?;
        if by_tag.insert(tag.clone(), record).is_some() {
            return Err(SchemaError::TagConflict {
                name: format!("{:?}", tag),
                context: "duplicate tag value in record union",
            });
        }
    }
    Ok(UnionLookup { by_tag })
}
