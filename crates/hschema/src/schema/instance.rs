// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Record instances.
//!
//! An [`Instance`] is one constructed value of a compiled struct type: a slot
//! per field, addressed through the type's offset table. Construction honors
//! the positional span, keyword arguments, defaults and factories, and the
//! post-init hook. After construction an instance of a frozen type is
//! immutable; its hash may be computed lazily into the reserved slot.

use crate::schema::layout;
use crate::schema::record::StructType;
use crate::schema::value::Value;
use crate::schema::{Result, SchemaError};
use std::cmp::Ordering;
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;

/// One constructed record value.
pub struct Instance {
    ty: Arc<StructType>,
    slots: Vec<Value>,
    // 0 = not computed. Benign race: concurrent writers store the same hash.
    hash_cache: AtomicU64,
}

impl Instance {
    /// Construct an instance from positional and keyword arguments.
    ///
    /// Positional arguments address only the leading non-keyword-only span;
    /// keyword arguments may address any field. Defaults and factories fill
    /// the rest; a factory produces a fresh value per construction.
    pub fn construct(
        ty: &Arc<StructType>,
        args: &[Value],
        kwargs: &[(&str, Value)],
    ) -> Result<Instance> {
        let nfields = ty.len();
        let positional = ty.positional_count();
        if args.len() > positional {
            return Err(SchemaError::Arity {
                op: "construct",
                expected: positional,
                got: args.len(),
            });
        }

        let mut slots: Vec<Option<Value>> = vec![None; nfields];
        for (i, arg) in args.iter().enumerate() {
            slots[i] = Some(arg.clone());
        }
        for (name, value) in kwargs {
            let index = ty
                .field_index(name)
                .ok_or_else(|| SchemaError::UnknownField(name.to_string()))?;
            if slots[index].is_some() {
                return Err(SchemaError::DuplicateField(name.to_string()));
            }
            slots[index] = Some(value.clone());
        }

        let mut filled = Vec::with_capacity(nfields);
        for (index, slot) in slots.into_iter().enumerate() {
            match slot {
                Some(value) => filled.push(value),
                None => match &ty.defaults()[index] {
                    Some(source) => filled.push(source.resolve()),
                    None => {
                        return Err(SchemaError::MissingField(ty.fields()[index].clone()));
                    }
                },
            }
        }

        let mut instance = Instance {
            ty: ty.clone(),
            slots: filled,
            hash_cache: AtomicU64::new(0),
        };
        if let Some(hook) = ty.post_init() {
            hook.call(&mut instance)?;
        }
        Ok(instance)
    }

    /// Owning record type.
    pub fn ty(&self) -> &Arc<StructType> {
        &self.ty
    }

    /// Type name shortcut.
    pub fn type_name(&self) -> &str {
        self.ty.name()
    }

    /// Field count.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// True for a field-less record.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Field value by name.
    pub fn get(&self, name: &str) -> Result<&Value> {
        let index = self
            .ty
            .field_index(name)
            .ok_or_else(|| SchemaError::UnknownField(name.to_string()))?;
        Ok(&self.slots[index])
    }

    /// Field value by positional index.
    pub fn get_at(&self, index: usize) -> Result<&Value> {
        self.slots.get(index).ok_or(SchemaError::IndexOutOfBounds {
            index,
            length: self.slots.len(),
        })
    }

    /// Field value by storage offset, the access path an encoder uses.
    pub fn get_by_offset(&self, offset: usize) -> Result<&Value> {
        self.get_at(layout::slot_index(offset))
    }

    /// Replace a field value. Rejected for frozen types.
    pub fn set(&mut self, name: &str, value: Value) -> Result<()> {
        if self.ty.config().frozen {
            return Err(SchemaError::FrozenRecord(self.ty.name().to_string()));
        }
        let index = self
            .ty
            .field_index(name)
            .ok_or_else(|| SchemaError::UnknownField(name.to_string()))?;
        self.slots[index] = value;
        Ok(())
    }

    /// All slots in field order.
    pub fn slots(&self) -> &[Value] {
        &self.slots
    }

    /// Value equality honoring the type's `eq` flag. Distinct instances of a
    /// type declared with `eq = false` never compare equal; identity is the
    /// caller's concern.
    pub fn value_eq(&self, other: &Instance) -> bool {
        if !Arc::ptr_eq(&self.ty, &other.ty) || !self.ty.config().eq {
            return false;
        }
        self.slots == other.slots
    }

    /// Lexicographic comparison over slots, honoring the `order` flag.
    pub fn try_cmp(&self, other: &Instance) -> Result<Ordering> {
        if !Arc::ptr_eq(&self.ty, &other.ty) {
            return Err(SchemaError::TypeMismatch {
                expected: self.ty.name().to_string(),
                got: other.ty.name().to_string(),
            });
        }
        if !self.ty.config().order {
            return Err(SchemaError::TypeMismatch {
                expected: "orderable record type".to_string(),
                got: format!("'{}' declared without `order`", self.ty.name()),
            });
        }
        for (a, b) in self.slots.iter().zip(&other.slots) {
            match value_cmp(a, b)? {
                Ordering::Equal => continue,
                other => return Ok(other),
            }
        }
        Ok(Ordering::Equal)
    }

    /// Hash of the instance. Only frozen types are hashable. When the type
    /// reserved a hash slot, the value is computed once and cached with a
    /// benign-race atomic store (recomputing the same hash concurrently is
    /// acceptable).
    pub fn try_hash(&self) -> Result<u64> {
        if !self.ty.config().frozen {
            return Err(SchemaError::TypeMismatch {
                expected: "frozen record type".to_string(),
                got: format!("mutable '{}'", self.ty.name()),
            });
        }
        let cached = self.ty.hash_offset() != 0;
        if cached {
            let seen = self.hash_cache.load(AtomicOrdering::Relaxed);
            if seen != 0 {
                return Ok(seen);
            }
        }
        let mut hasher = DefaultHasher::new();
        self.ty.name().hash(&mut hasher);
        for slot in &self.slots {
            slot.try_hash(&mut hasher)?;
        }
        // Reserve 0 as the "not computed" state.
        let hash = match hasher.finish() {
            0 => 1,
            h => h,
        };
        if cached {
            self.hash_cache.store(hash, AtomicOrdering::Relaxed);
        }
        Ok(hash)
    }
}

impl Clone for Instance {
    fn clone(&self) -> Self {
        Self {
            ty: self.ty.clone(),
            slots: self.slots.clone(),
            hash_cache: AtomicU64::new(self.hash_cache.load(AtomicOrdering::Relaxed)),
        }
    }
}

impl PartialEq for Instance {
    fn eq(&self, other: &Self) -> bool {
        self.value_eq(other)
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.ty.name())?;
        let mut first = true;
        for (index, name) in self.ty.fields().iter().enumerate() {
            let value = &self.slots[index];
            if self.ty.config().repr_omit_defaults {
                if let Some(source) = &self.ty.defaults()[index] {
                    if let crate::schema::field::DefaultSource::Value(default) = source {
                        if default == value {
                            continue;
                        }
                    }
                }
            }
            if !first {
                write!(f, ", ")?;
            }
            first = false;
            write!(f, "{}={:?}", name, value)?;
        }
        write!(f, ")")
    }
}

/// Compare two values of the same admissible kind.
fn value_cmp(a: &Value, b: &Value) -> Result<Ordering> {
    let ordering = match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.partial_cmp(y),
        (Value::Int(x), Value::Int(y)) => x.partial_cmp(y),
        (Value::Float(x), Value::Float(y)) => x.partial_cmp(y),
        (Value::Str(x), Value::Str(y)) => x.partial_cmp(y),
        (Value::Bytes(x), Value::Bytes(y)) => x.partial_cmp(y),
        (Value::Null, Value::Null) => Some(Ordering::Equal),
        (Value::List(x), Value::List(y)) | (Value::Tuple(x), Value::Tuple(y)) => {
            for (xa, ya) in x.iter().zip(y) {
                match value_cmp(xa, ya)? {
                    Ordering::Equal => continue,
                    other => return Ok(other),
                }
            }
            x.len().partial_cmp(&y.len())
        }
        _ => None,
    };
    ordering.ok_or_else(|| SchemaError::TypeMismatch {
        expected: format!("value comparable with {}", a.kind_name()),
        got: b.kind_name().to_string(),
    })
}
