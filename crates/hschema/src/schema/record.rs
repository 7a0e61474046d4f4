// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Compiled struct types.
//!
//! A [`StructType`] is the runtime record type produced by one struct
//! declaration: parallel name/default/offset tables, the encode-field subset,
//! tag metadata, configuration flags and a link to the record descriptor.
//! It is built once at declaration time and immutable afterwards; the only
//! late write is the descriptor link, set before the type is published.

use crate::schema::config::StructConfig;
use crate::schema::descriptor::RecordDescriptor;
use crate::schema::field::DefaultSource;
use crate::schema::instance::Instance;
use crate::schema::node::TagValue;
use crate::schema::value::Value;
use crate::schema::{Result, SchemaError};
use std::fmt;
use std::sync::{Arc, OnceLock};

/// Construction hook invoked with the instance being built.
#[derive(Clone)]
pub struct Hook(pub Arc<dyn Fn(&mut Instance) -> Result<()> + Send + Sync>);

impl Hook {
    /// Run the hook.
    pub fn call(&self, instance: &mut Instance) -> Result<()> {
        (self.0)(instance)
    }
}

impl fmt::Debug for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hook")
    }
}

/// A compiled record type.
pub struct StructType {
    name: String,
    fields: Vec<String>,
    defaults: Vec<Option<DefaultSource>>,
    offsets: Vec<usize>,
    encode_fields: Vec<String>,
    descriptor: OnceLock<Arc<RecordDescriptor>>,
    nkwonly: usize,
    n_trailing_defaults: usize,
    tag_field: Option<String>,
    tag_value: Option<TagValue>,
    match_args: Vec<String>,
    post_init: Option<Hook>,
    hash_offset: usize,
    config: StructConfig,
    bases: Vec<Arc<StructType>>,
}

#[allow(clippy::too_many_arguments)]
impl StructType {
    pub(crate) fn new(
        name: String,
        fields: Vec<String>,
        defaults: Vec<Option<DefaultSource>>,
        offsets: Vec<usize>,
        encode_fields: Vec<String>,
        nkwonly: usize,
        n_trailing_defaults: usize,
        tag_field: Option<String>,
        tag_value: Option<TagValue>,
        match_args: Vec<String>,
        post_init: Option<Hook>,
        hash_offset: usize,
        config: StructConfig,
        bases: Vec<Arc<StructType>>,
    ) -> Self {
        debug_assert_eq!(fields.len(), defaults.len());
        debug_assert_eq!(fields.len(), offsets.len());
        debug_assert_eq!(fields.len(), encode_fields.len());
        Self {
            name,
            fields,
            defaults,
            offsets,
            encode_fields,
            descriptor: OnceLock::new(),
            nkwonly,
            n_trailing_defaults,
            tag_field,
            tag_value,
            match_args,
            post_init,
            hash_offset,
            config,
            bases,
        }
    }

    /// Declared type name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Field names in final order (keyword-only fields trail).
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Per-field default sources, parallel to `fields`.
    pub fn defaults(&self) -> &[Option<DefaultSource>] {
        &self.defaults
    }

    /// Per-field storage offsets, parallel to `fields`.
    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    /// Wire names of encoded fields, rename policy applied.
    pub fn encode_fields(&self) -> &[String] {
        &self.encode_fields
    }

    /// Number of trailing keyword-only fields.
    pub const fn nkwonly(&self) -> usize {
        self.nkwonly
    }

    /// Length of the trailing run of defaulted fields.
    pub const fn n_trailing_defaults(&self) -> usize {
        self.n_trailing_defaults
    }

    /// Number of leading fields addressable positionally.
    pub fn positional_count(&self) -> usize {
        self.fields.len() - self.nkwonly
    }

    /// Tag field name, if the declaration is tagged.
    pub fn tag_field(&self) -> Option<&str> {
        self.tag_field.as_deref()
    }

    /// Tag value, if the declaration is tagged.
    pub fn tag_value(&self) -> Option<&TagValue> {
        self.tag_value.as_ref()
    }

    /// Positional field names exposed for pattern matching.
    pub fn match_args(&self) -> &[String] {
        &self.match_args
    }

    /// Post-construction hook, if declared.
    pub fn post_init(&self) -> Option<&Hook> {
        self.post_init.as_ref()
    }

    /// Cached-hash slot offset; 0 when hash caching is disabled (offset 0 is
    /// inside the header and never a legal slot).
    pub const fn hash_offset(&self) -> usize {
        self.hash_offset
    }

    /// Declaration configuration.
    pub const fn config(&self) -> &StructConfig {
        &self.config
    }

    /// Direct base types, declaration order.
    pub fn bases(&self) -> &[Arc<StructType>] {
        &self.bases
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True for a field-less record.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field name by positional index.
    pub fn field_name(&self, index: usize) -> Result<&str> {
        self.fields
            .get(index)
            .map(String::as_str)
            .ok_or(SchemaError::IndexOutOfBounds {
                index,
                length: self.fields.len(),
            })
    }

    /// Position of a field by name.
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f == name)
    }

    /// Linked record descriptor. Unset only while the declaration is still
    /// being compiled.
    pub fn descriptor(&self) -> Result<&Arc<RecordDescriptor>> {
        self.descriptor
            .get()
            .ok_or_else(|| SchemaError::UnresolvedType(self.name.clone()))
    }

    pub(crate) fn attach_descriptor(&self, descriptor: Arc<RecordDescriptor>) -> Result<()> {
        self.descriptor.set(descriptor).map_err(|_| {
            SchemaError::ConfigConflict(format!("descriptor for '{}' already attached", self.name))
        })
    }

    /// True if `self` is `other` or derives from it through declared bases.
    pub fn is_subtype_of(self: &Arc<Self>, other: &Arc<StructType>) -> bool {
        if Arc::ptr_eq(self, other) {
            return true;
        }
        self.bases.iter().any(|base| base.is_subtype_of(other))
    }

    /// Construct an instance from positional and keyword arguments.
    pub fn construct(self: &Arc<Self>, args: &[Value], kwargs: &[(&str, Value)]) -> Result<Instance> {
        Instance::construct(self, args, kwargs)
    }
}

impl fmt::Debug for StructType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StructType")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .field("nkwonly", &self.nkwonly)
            .field("tag_value", &self.tag_value)
            .finish_non_exhaustive()
    }
}
