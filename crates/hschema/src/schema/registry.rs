// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Two-phase registration of record declarations.
//!
//! A record mentioned inside an annotation gets a placeholder slot first;
//! the slot is filled when the record's own declaration finishes compiling.
//! Dereferencing a slot before that fails with `UnresolvedType` rather than
//! observing a partially built descriptor. Mutually recursive declarations
//! resolve through the same mechanism.

use crate::schema::descriptor::RecordDescriptor;
use crate::schema::record::StructType;
use crate::schema::{Result, SchemaError};
use dashmap::DashMap;
use std::sync::{Arc, OnceLock, Weak};

/// Placeholder slot for one declared record name.
///
/// The cell holds a weak handle so a dropped record type cannot be revived
/// through stale type nodes; the registry keeps published descriptors alive.
#[derive(Debug)]
pub struct DeclSlot {
    name: String,
    cell: OnceLock<Weak<RecordDescriptor>>,
}

impl DeclSlot {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            cell: OnceLock::new(),
        }
    }

    /// Declared record name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// True once the declaration has resolved.
    pub fn is_resolved(&self) -> bool {
        matches!(self.cell.get(), Some(weak) if weak.upgrade().is_some())
    }

    fn resolve(&self, descriptor: &Arc<RecordDescriptor>) -> Result<()> {
        self.cell
            .set(Arc::downgrade(descriptor))
            .map_err(|_| SchemaError::ConfigConflict(format!("type '{}' already registered", self.name)))
    }

    fn get(&self) -> Result<Arc<RecordDescriptor>> {
        self.cell
            .get()
            .and_then(Weak::upgrade)
            .ok_or_else(|| SchemaError::UnresolvedType(self.name.clone()))
    }
}

/// Borrowed-style handle to a (possibly not yet resolved) record descriptor.
///
/// Stored in type-node detail slots instead of a descriptor copy, so that
/// recursive declarations reference their own descriptor once it exists.
#[derive(Debug, Clone)]
pub struct RecordRef {
    slot: Arc<DeclSlot>,
}

impl RecordRef {
    /// Referenced record name.
    pub fn name(&self) -> &str {
        self.slot.name()
    }

    /// True once the target declaration has resolved.
    pub fn is_resolved(&self) -> bool {
        self.slot.is_resolved()
    }

    /// Dereference the target descriptor. Fails fast with `UnresolvedType`
    /// while the target declaration is still being compiled.
    pub fn get(&self) -> Result<Arc<RecordDescriptor>> {
        self.slot.get()
    }
}

/// Name-keyed registry of record declarations.
///
/// Construction is synchronous and single-writer per declaration; after a
/// descriptor is published here it is immutable and safe for unsynchronized
/// concurrent reads.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    slots: DashMap<String, Arc<DeclSlot>>,
    descriptors: DashMap<String, Arc<RecordDescriptor>>,
    structs: DashMap<String, Arc<StructType>>,
}

impl SchemaRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or create the placeholder slot for `name`.
    pub fn declare(&self, name: &str) -> RecordRef {
        let slot = self
            .slots
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(DeclSlot::new(name)))
            .clone();
        RecordRef { slot }
    }

    /// Publish a finished descriptor under `name`, resolving its slot.
    /// Rejects double publication.
    pub fn publish(&self, name: &str, descriptor: Arc<RecordDescriptor>) -> Result<()> {
        let slot = self.declare(name);
        slot.slot.resolve(&descriptor)?;
        self.descriptors.insert(name.to_string(), descriptor);
        log::debug!("[SCHEMA] published record descriptor '{}'", name);
        Ok(())
    }

    /// Publish a compiled struct type together with its descriptor.
    pub fn publish_struct(&self, ty: Arc<StructType>) -> Result<()> {
        let descriptor = ty.descriptor()?.clone();
        self.publish(ty.name(), descriptor)?;
        self.structs.insert(ty.name().to_string(), ty);
        Ok(())
    }

    /// Look up a published descriptor.
    pub fn lookup(&self, name: &str) -> Option<Arc<RecordDescriptor>> {
        self.descriptors.get(name).map(|entry| entry.value().clone())
    }

    /// Look up a published struct type.
    pub fn lookup_struct(&self, name: &str) -> Option<Arc<StructType>> {
        self.structs.get(name).map(|entry| entry.value().clone())
    }

    /// Number of published declarations.
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// True if nothing has been published yet.
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

/// Process-wide registry used by the capability surface.
pub fn global() -> &'static SchemaRegistry {
    static REGISTRY: OnceLock<SchemaRegistry> = OnceLock::new();
    REGISTRY.get_or_init(SchemaRegistry::new)
}
