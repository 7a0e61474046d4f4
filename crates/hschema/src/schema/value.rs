// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Dynamic value representation.
//!
//! `Value` is the currency of the capability surface and of default tables:
//! constructors take `&[Value]` argument slices, defaults and literal tags are
//! stored as `Value`, and record instances hold `Value` slots. `Absent` is the
//! out-of-band "no value" marker and is distinct from `Null`, so a legitimate
//! null default can never be confused with "no default set".

use crate::schema::field::{Factory, FieldSpec};
use crate::schema::instance::Instance;
use crate::schema::record::StructType;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Zero-argument callable producing a fresh value per call.
pub type Callable = Arc<dyn Fn() -> Value + Send + Sync>;

/// A dynamic value.
#[derive(Clone)]
pub enum Value {
    /// Out-of-band marker: no value present. Not a data value.
    Absent,
    /// Null/none data value.
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Bytes(Vec<u8>),
    List(Vec<Value>),
    Tuple(Vec<Value>),
    /// String-keyed map in declaration order.
    Map(Vec<(String, Value)>),
    /// Extension value (application-defined code + payload).
    Ext(Arc<Ext>),
    /// Default factory handle.
    Factory(Factory),
    /// Field specification handle.
    Field(Arc<FieldSpec>),
    /// Record instance.
    Record(Arc<Instance>),
    /// Compiled record type handle.
    Type(Arc<StructType>),
    /// Bare callable (input to `factory_new`).
    Callable(CallableValue),
}

/// Runtime kind of a [`Value`], used for dynamic kind checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Absent,
    Null,
    Bool,
    Int,
    Float,
    Str,
    Bytes,
    List,
    Tuple,
    Map,
    Ext,
    Factory,
    Field,
    Record,
    Type,
    Callable,
}

impl ValueKind {
    /// Kind name as used in error messages.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Absent => "absent",
            Self::Null => "null",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::Str => "str",
            Self::Bytes => "bytes",
            Self::List => "list",
            Self::Tuple => "tuple",
            Self::Map => "map",
            Self::Ext => "ext",
            Self::Factory => "factory",
            Self::Field => "field",
            Self::Record => "record",
            Self::Type => "type",
            Self::Callable => "callable",
        }
    }
}

impl Value {
    /// Runtime kind of this value.
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Absent => ValueKind::Absent,
            Self::Null => ValueKind::Null,
            Self::Bool(_) => ValueKind::Bool,
            Self::Int(_) => ValueKind::Int,
            Self::Float(_) => ValueKind::Float,
            Self::Str(_) => ValueKind::Str,
            Self::Bytes(_) => ValueKind::Bytes,
            Self::List(_) => ValueKind::List,
            Self::Tuple(_) => ValueKind::Tuple,
            Self::Map(_) => ValueKind::Map,
            Self::Ext(_) => ValueKind::Ext,
            Self::Factory(_) => ValueKind::Factory,
            Self::Field(_) => ValueKind::Field,
            Self::Record(_) => ValueKind::Record,
            Self::Type(_) => ValueKind::Type,
            Self::Callable(_) => ValueKind::Callable,
        }
    }

    /// Kind name shortcut for error construction.
    pub const fn kind_name(&self) -> &'static str {
        self.kind().name()
    }

    /// True for the out-of-band absent marker.
    pub const fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// True for the null data value.
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Try to get as bool.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as i64.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as f64.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as string slice.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(v) => Some(v),
            _ => None,
        }
    }

    /// Try to get as byte slice.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(v) => Some(v),
            _ => None,
        }
    }

    /// Try to get as record instance.
    pub fn as_record(&self) -> Option<&Arc<Instance>> {
        match self {
            Self::Record(v) => Some(v),
            _ => None,
        }
    }

    /// Try to get as record type handle.
    pub fn as_type(&self) -> Option<&Arc<StructType>> {
        match self {
            Self::Type(v) => Some(v),
            _ => None,
        }
    }

    /// Feed this value into a hasher. Fails for kinds without a stable
    /// hash (lists, maps, handles), mirroring unhashable-value semantics.
    pub fn try_hash<H: Hasher>(&self, state: &mut H) -> crate::schema::Result<()> {
        match self {
            Self::Absent => 0u8.hash(state),
            Self::Null => 1u8.hash(state),
            Self::Bool(v) => (2u8, v).hash(state),
            Self::Int(v) => (3u8, v).hash(state),
            Self::Float(v) => (4u8, v.to_bits()).hash(state),
            Self::Str(v) => (5u8, v).hash(state),
            Self::Bytes(v) => (6u8, v).hash(state),
            Self::Tuple(items) => {
                7u8.hash(state);
                for item in items {
                    item.try_hash(state)?;
                }
            }
            Self::Ext(ext) => (8u8, ext.code, &ext.data).hash(state),
            Self::Record(inst) => {
                (9u8, inst.try_hash()?).hash(state);
            }
            other => {
                return Err(crate::schema::SchemaError::TypeMismatch {
                    expected: "hashable value".to_string(),
                    got: other.kind_name().to_string(),
                })
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absent => write!(f, "Absent"),
            Self::Null => write!(f, "Null"),
            Self::Bool(v) => write!(f, "Bool({})", v),
            Self::Int(v) => write!(f, "Int({})", v),
            Self::Float(v) => write!(f, "Float({})", v),
            Self::Str(v) => write!(f, "Str({:?})", v),
            Self::Bytes(v) => write!(f, "Bytes({} bytes)", v.len()),
            Self::List(v) => f.debug_tuple("List").field(v).finish(),
            Self::Tuple(v) => f.debug_tuple("Tuple").field(v).finish(),
            Self::Map(v) => f.debug_tuple("Map").field(v).finish(),
            Self::Ext(v) => write!(f, "Ext(code={}, {} bytes)", v.code, v.data.len()),
            Self::Factory(_) => write!(f, "Factory(..)"),
            Self::Field(spec) => f.debug_tuple("Field").field(spec).finish(),
            Self::Record(inst) => write!(f, "Record({})", inst.type_name()),
            Self::Type(ty) => write!(f, "Type({})", ty.name()),
            Self::Callable(_) => write!(f, "Callable(..)"),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Absent, Self::Absent) => true,
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Bytes(a), Self::Bytes(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Tuple(a), Self::Tuple(b)) => a == b,
            (Self::Map(a), Self::Map(b)) => a == b,
            (Self::Ext(a), Self::Ext(b)) => a == b,
            (Self::Factory(a), Self::Factory(b)) => a == b,
            (Self::Field(a), Self::Field(b)) => Arc::ptr_eq(a, b),
            (Self::Record(a), Self::Record(b)) => Arc::ptr_eq(a, b) || a.value_eq(b),
            (Self::Type(a), Self::Type(b)) => Arc::ptr_eq(a, b),
            (Self::Callable(a), Self::Callable(b)) => a == b,
            _ => false,
        }
    }
}

/// Extension value: an application-defined code paired with a byte payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ext {
    /// Application-defined extension code, limited to [-128, 127].
    pub code: i8,
    /// Opaque payload.
    pub data: Vec<u8>,
}

impl Ext {
    /// Create a new extension value. The code must fit the signed 8-bit
    /// range; payload kind validation happens at the capability surface.
    pub fn new(code: i64, data: Vec<u8>) -> crate::schema::Result<Self> {
        let code = i8::try_from(code).map_err(|_| crate::schema::SchemaError::TypeMismatch {
            expected: "extension code in [-128, 127]".to_string(),
            got: code.to_string(),
        })?;
        Ok(Self { code, data })
    }
}

/// Shared callable wrapper with pointer identity.
#[derive(Clone)]
pub struct CallableValue(pub Callable);

impl CallableValue {
    /// Invoke the callable.
    pub fn call(&self) -> Value {
        (self.0)()
    }
}

impl PartialEq for CallableValue {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for CallableValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CallableValue")
    }
}
