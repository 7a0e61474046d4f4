// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Schema compilation core.
//!
//! Turns record declarations into compact runtime descriptors an encoder can
//! traverse without re-inspecting the declaration on every call.
//!
//! # Pipeline
//!
//! - **TypeNode**: compiled annotation (kind bitset + detail slots)
//! - **FieldTable / FieldSpec**: declared members and their defaults
//! - **RecordDescriptor**: compiled schema, one variant per record construct
//! - **SchemaBuilder**: field collection, override merge, offset assignment
//! - **SchemaRegistry**: two-phase resolution for recursive declarations
//!
//! # Example
//!
//! ```rust
//! use hschema::schema::{
//!     FieldDef, SchemaBuilder, SchemaRegistry, StructDecl, TypeExpr, Value,
//! };
//!
//! let registry = SchemaRegistry::new();
//! let builder = SchemaBuilder::new(&registry);
//!
//! let point = builder
//!     .build_struct(StructDecl::new(
//!         "Point",
//!         vec![
//!             FieldDef::new("x", TypeExpr::Float),
//!             FieldDef::new("y", TypeExpr::Float),
//!             FieldDef::new("label", TypeExpr::Str).with_default(Value::Str("".into())),
//!         ],
//!     ))
//!     .expect("declaration compiles");
//!
//! let p = point
//!     .construct(&[Value::Float(1.0), Value::Float(2.0)], &[])
//!     .expect("construction succeeds");
//! assert_eq!(p.get("label").unwrap(), &Value::Str("".into()));
//! ```

mod builder;
mod config;
mod descriptor;
mod error;
mod field;
mod instance;
mod kind;
mod layout;
mod literal;
mod node;
mod record;
mod registry;
mod value;

pub use builder::{SchemaBuilder, StructDecl};
pub use config::{RenamePolicy, StructConfig, TagMode};
pub use descriptor::{
    DataclassInfo, NamedTupleInfo, RecordDescriptor, StructInfo, TypedDictInfo,
};
pub use error::{Result, SchemaError};
pub use field::{DefaultSource, Factory, FieldDef, FieldEntry, FieldSpec, FieldTable};
pub use instance::Instance;
pub use kind::Kinds;
pub use layout::{Layout, HEADER_SIZE, HEADER_SLOTS, SLOT_SIZE};
pub use literal::{LiteralTable, LiteralValue};
pub use node::{Dispatch, TagValue, TypeDetail, TypeExpr, TypeNode, UnionLookup};
pub use record::{Hook, StructType};
pub use registry::{global, DeclSlot, RecordRef, SchemaRegistry};
pub use value::{Callable, CallableValue, Ext, Value, ValueKind};
