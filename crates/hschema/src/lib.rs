// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # HSchema - High-performance schema compilation
//!
//! Compiles record-like type declarations (structs, typed dicts, dataclasses,
//! named tuples) into compact runtime descriptors that encoders and decoders
//! traverse with constant-time lookups instead of re-inspecting the
//! declaration on every call.
//!
//! ## Quick Start
//!
//! ```rust
//! use hschema::{FieldDef, SchemaBuilder, SchemaRegistry, StructDecl, TypeExpr, Value};
//!
//! fn main() -> hschema::Result<()> {
//!     let registry = SchemaRegistry::new();
//!     let builder = SchemaBuilder::new(&registry);
//!
//!     // Compile a declaration once, at class-creation time
//!     let reading = builder.build_struct(StructDecl::new(
//!         "SensorReading",
//!         vec![
//!             FieldDef::new("sensor_id", TypeExpr::Int),
//!             FieldDef::new("temperature", TypeExpr::Float),
//!             FieldDef::new("location", TypeExpr::Str).with_default(Value::Str("lab".into())),
//!         ],
//!     ))?;
//!
//!     // Construct instances through the compiled type
//!     let sample = reading.construct(&[Value::Int(42), Value::Float(23.5)], &[])?;
//!     assert_eq!(sample.get("location")?, &Value::Str("lab".into()));
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +--------------------------------------------------------------------+
//! |                        Declaration Layer                           |
//! |   StructDecl / FieldDef / FieldSpec / StructConfig                 |
//! +--------------------------------------------------------------------+
//! |                        Compilation Layer                           |
//! |   SchemaBuilder -> field merge | offsets | TypeNode compilation    |
//! +--------------------------------------------------------------------+
//! |                        Descriptor Layer                            |
//! |   StructType | RecordDescriptor | FieldTable | TypeNode            |
//! +--------------------------------------------------------------------+
//! |                        Capability Layer                            |
//! |   capi::publish / capi::import -> versioned fn-pointer table       |
//! +--------------------------------------------------------------------+
//! ```
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`StructDecl`] | One record declaration, ready for compilation |
//! | [`SchemaBuilder`] | Compiles declarations into published descriptors |
//! | [`StructType`] | Compiled record type with parallel field tables |
//! | [`TypeNode`] | Tagged-union descriptor for one declared annotation |
//! | [`RecordDescriptor`] | Compiled schema, one variant per record construct |
//! | [`SchemaRegistry`] | Two-phase registry resolving recursive declarations |
//!
//! Descriptors are built once, synchronously, before publication; afterwards
//! they are immutable and safe for unsynchronized concurrent reads. The only
//! late write is the per-instance cached hash, stored with a benign-race
//! atomic.

pub mod capi;
pub mod schema;

pub use schema::{
    DefaultSource, Dispatch, Ext, Factory, FieldDef, FieldSpec, FieldTable, Hook, Instance,
    Kinds, LiteralValue, RecordDescriptor, RecordRef, RenamePolicy, Result, SchemaBuilder,
    SchemaError, SchemaRegistry, StructConfig, StructDecl, StructType, TagMode, TagValue,
    TypeExpr, TypeNode, Value, ValueKind,
};

pub use capi::{CapabilityTable, CAPI_NAME, CAPI_VERSION};
