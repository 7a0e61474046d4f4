// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error types for schema compilation and the capability surface.
//!
//! Declaration-time failures (`DuplicateField`, `DefaultOrder`, `TagConflict`,
//! `ConfigConflict`, `InvalidDefaultFactory`) abort the declaration before
//! anything is published. The remaining variants are per-call errors returned
//! to the immediate caller.

use std::fmt;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SchemaError>;

/// Failure modes for schema compilation, instance operations and the
/// capability surface.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaError {
    /// Wrong argument count for a dynamic-arity constructor.
    Arity {
        /// Operation that rejected the call (e.g. "field_new").
        op: &'static str,
        /// Exact argument count the operation requires.
        expected: usize,
        /// Argument count actually supplied.
        got: usize,
    },
    /// Operation applied to a value of the wrong dynamic kind.
    TypeMismatch {
        /// What the operation required.
        expected: String,
        /// What it received.
        got: String,
    },
    /// Field name declared twice, or an argument supplied twice.
    DuplicateField(String),
    /// A defaulted field precedes a non-defaulted one in positional order.
    DefaultOrder(String),
    /// Default factory is not a zero-argument callable.
    InvalidDefaultFactory(String),
    /// Tag field collides with a data field, or a tag value is not unique.
    TagConflict {
        /// Offending tag field or tag value.
        name: String,
        /// Context for the collision.
        context: &'static str,
    },
    /// Mutually exclusive configuration options were both set.
    ConfigConflict(String),
    /// A recursive-type placeholder was dereferenced before it resolved.
    UnresolvedType(String),
    /// Capability table lookup failed for the given name.
    LookupFailure(String),
    /// Required field missing during record construction.
    MissingField(String),
    /// Unknown field name supplied to record construction.
    UnknownField(String),
    /// Write attempted on an instance of a frozen record type.
    FrozenRecord(String),
    /// Positional index outside the field table.
    IndexOutOfBounds {
        /// Requested index.
        index: usize,
        /// Field count.
        length: usize,
    },
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Arity { op, expected, got } => {
                write!(f, "{} takes exactly {} arguments ({} given)", op, expected, got)
            }
            Self::TypeMismatch { expected, got } => {
                write!(f, "Type mismatch: expected {}, got {}", expected, got)
            }
            Self::DuplicateField(name) => write!(f, "Duplicate field: {}", name),
            Self::DefaultOrder(name) => write!(
                f,
                "Required field '{}' cannot follow a field with a default",
                name
            ),
            Self::InvalidDefaultFactory(got) => {
                write!(f, "Default factory must be callable, got {}", got)
            }
            Self::TagConflict { name, context } => write!(f, "Tag conflict: {}: {}", context, name),
            Self::ConfigConflict(reason) => write!(f, "Config conflict: {}", reason),
            Self::UnresolvedType(name) => write!(
                f,
                "Type '{}' referenced before its declaration resolved",
                name
            ),
            Self::LookupFailure(name) => write!(f, "Capability table '{}' not found", name),
            Self::MissingField(name) => write!(f, "Missing required field: {}", name),
            Self::UnknownField(name) => write!(f, "Unknown field: {}", name),
            Self::FrozenRecord(ty) => write!(f, "Cannot mutate frozen instance of '{}'", ty),
            Self::IndexOutOfBounds { index, length } => {
                write!(f, "Field index out of bounds: {} >= {}", index, length)
            }
        }
    }
}

impl std::error::Error for SchemaError {}
