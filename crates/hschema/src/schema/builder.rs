// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Declaration compilation.
//!
//! [`SchemaBuilder`] is the construction protocol behind every record
//! declaration: it collects fields from bases and the new namespace, merges
//! them base-then-derived with in-place override, enforces the default-order
//! and tagging rules, assigns storage offsets and materializes exactly one
//! record descriptor. All failures abort the declaration synchronously;
//! nothing is published until the whole compilation succeeds.

use crate::schema::config::{StructConfig, TagMode};
use crate::schema::descriptor::{
    DataclassInfo, NamedTupleInfo, RecordDescriptor, StructInfo, TypedDictInfo,
};
use crate::schema::field::{DefaultSource, FieldDef, FieldTable};
use crate::schema::layout;
use crate::schema::node::{TagValue, TypeExpr, TypeNode};
use crate::schema::record::{Hook, StructType};
use crate::schema::registry::SchemaRegistry;
use crate::schema::value::Value;
use crate::schema::{Result, SchemaError};
use std::collections::HashSet;
use std::sync::Arc;

/// One struct declaration, ready for compilation.
#[derive(Debug)]
pub struct StructDecl {
    /// Declared type name.
    pub name: String,
    /// Base record types, declaration order. Each must already be compiled.
    pub bases: Vec<Arc<StructType>>,
    /// Newly declared fields.
    pub fields: Vec<FieldDef>,
    /// Configuration options.
    pub config: StructConfig,
    /// Post-construction hook.
    pub post_init: Option<Hook>,
}

impl StructDecl {
    /// Declaration with no bases and default configuration.
    pub fn new(name: impl Into<String>, fields: Vec<FieldDef>) -> Self {
        Self {
            name: name.into(),
            bases: Vec::new(),
            fields,
            config: StructConfig::default(),
            post_init: None,
        }
    }

    /// Set base record types.
    pub fn bases(mut self, bases: Vec<Arc<StructType>>) -> Self {
        self.bases = bases;
        self
    }

    /// Set configuration.
    pub fn config(mut self, config: StructConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the post-construction hook.
    pub fn post_init(mut self, hook: Hook) -> Self {
        self.post_init = Some(hook);
        self
    }
}

/// Working entry during field collection.
struct CollectedField {
    name: String,
    node: TypeNode,
    default: Option<DefaultSource>,
    kw_only: bool,
}

/// Compiles record declarations against one registry.
pub struct SchemaBuilder<'r> {
    registry: &'r SchemaRegistry,
}

impl<'r> SchemaBuilder<'r> {
    /// Builder over `registry`.
    pub fn new(registry: &'r SchemaRegistry) -> Self {
        Self { registry }
    }

    /// Compile a struct declaration into a published record type.
    pub fn build_struct(&self, decl: StructDecl) -> Result<Arc<StructType>> {
        decl.config.validate()?;

        let mut collected = self.collect_fields(&decl)?;

        // Keyword-only fields trail; positional construction addresses only
        // the leading span. Relative order inside each group is preserved.
        let (positional, kw_only): (Vec<_>, Vec<_>) =
            collected.drain(..).partition(|f| !f.kw_only);
        let nkwonly = kw_only.len();
        let mut fields = positional;
        fields.extend(kw_only);

        check_default_order(&fields, nkwonly)?;

        let (tag_field, tag_value) = resolve_tag(&decl, &fields)?;
        let encode_fields = encode_names(&decl.config, &fields)?;
        let match_args: Vec<String> = fields[..fields.len() - nkwonly]
            .iter()
            .map(|f| f.name.clone())
            .collect();

        let n_trailing_defaults = fields
            .iter()
            .rev()
            .take_while(|f| f.default.is_some())
            .count();

        let plan = layout::assign(fields.len(), decl.config.cache_hash);

        let mut names = Vec::with_capacity(fields.len());
        let mut defaults = Vec::with_capacity(fields.len());
        let mut types = Vec::with_capacity(fields.len());
        for field in fields {
            names.push(field.name);
            defaults.push(field.default);
            types.push(field.node);
        }

        let ty = Arc::new(StructType::new(
            decl.name.clone(),
            names,
            defaults,
            plan.offsets().to_vec(),
            encode_fields,
            nkwonly,
            n_trailing_defaults,
            tag_field,
            tag_value,
            match_args,
            decl.post_init,
            plan.hash_offset(),
            decl.config,
            decl.bases,
        ));
        let descriptor = Arc::new(RecordDescriptor::Struct(StructInfo::new(&ty, types)));
        ty.attach_descriptor(descriptor)?;
        self.registry.publish_struct(ty.clone())?;
        log::debug!(
            "[SCHEMA] compiled struct '{}' ({} fields, {} kw-only)",
            ty.name(),
            ty.len(),
            ty.nkwonly()
        );
        Ok(ty)
    }

    /// Compile a dict-like declaration into a published descriptor.
    pub fn build_typed_dict(
        &self,
        name: impl Into<String>,
        fields: Vec<FieldDef>,
    ) -> Result<Arc<RecordDescriptor>> {
        let name = name.into();
        let mut table = FieldTable::new();
        let mut nrequired = 0;
        for field in &fields {
            if !field.spec.has_default() {
                nrequired += 1;
            }
            table.push(field.name.clone(), TypeNode::compile(&field.ty, self.registry)?)?;
        }
        let descriptor = Arc::new(RecordDescriptor::TypedDict(TypedDictInfo::new(
            name.clone(),
            nrequired,
            table,
        )));
        self.registry.publish(&name, descriptor.clone())?;
        log::debug!(
            "[SCHEMA] compiled typed dict '{}' ({} required)",
            name,
            nrequired
        );
        Ok(descriptor)
    }

    /// Compile a dataclass-like declaration into a published descriptor.
    pub fn build_dataclass(
        &self,
        name: impl Into<String>,
        fields: Vec<FieldDef>,
        pre_init: Option<Hook>,
        post_init: Option<Hook>,
    ) -> Result<Arc<RecordDescriptor>> {
        let name = name.into();
        let mut table = FieldTable::new();
        let mut defaults = Vec::with_capacity(fields.len());
        let mut seen_default = None::<String>;
        for field in fields {
            if field.spec.has_default() {
                seen_default = Some(field.name.clone());
            } else if seen_default.is_some() {
                return Err(SchemaError::DefaultOrder(field.name));
            }
            table.push(field.name.clone(), TypeNode::compile(&field.ty, self.registry)?)?;
            defaults.push(field.spec.into_source());
        }
        let descriptor = Arc::new(RecordDescriptor::Dataclass(DataclassInfo::new(
            name.clone(),
            pre_init,
            post_init,
            defaults,
            table,
        )));
        self.registry.publish(&name, descriptor.clone())?;
        log::debug!("[SCHEMA] compiled dataclass '{}'", name);
        Ok(descriptor)
    }

    /// Compile an ordered-record declaration into a published descriptor.
    /// Defaults apply to the trailing elements.
    pub fn build_named_tuple(
        &self,
        name: impl Into<String>,
        elements: Vec<TypeExpr>,
        defaults: Vec<Value>,
    ) -> Result<Arc<RecordDescriptor>> {
        let name = name.into();
        if defaults.len() > elements.len() {
            return Err(SchemaError::ConfigConflict(format!(
                "'{}' declares more defaults than elements",
                name
            )));
        }
        let mut types = Vec::with_capacity(elements.len());
        for element in &elements {
            types.push(TypeNode::compile(element, self.registry)?);
        }
        let descriptor = Arc::new(RecordDescriptor::NamedTuple(NamedTupleInfo::new(
            name.clone(),
            defaults,
            types,
        )));
        self.registry.publish(&name, descriptor.clone())?;
        log::debug!("[SCHEMA] compiled named tuple '{}'", name);
        Ok(descriptor)
    }

    /// Merge base fields (base-then-derived) with the new namespace.
    /// Overriding a base field keeps its positional slot; the namespace may
    /// not declare the same name twice.
    fn collect_fields(&self, decl: &StructDecl) -> Result<Vec<CollectedField>> {
        let mut collected: Vec<CollectedField> = Vec::new();

        for base in &decl.bases {
            let descriptor = base.descriptor()?;
            let info = descriptor.as_struct().ok_or_else(|| {
                SchemaError::TypeMismatch {
                    expected: "struct base".to_string(),
                    got: descriptor.name(),
                }
            })?;
            let positional = base.positional_count();
            for (index, name) in base.fields().iter().enumerate() {
                let node = info.types()[index].clone();
                let default = base.defaults()[index].clone();
                let kw_only = index >= positional;
                match collected.iter_mut().find(|f| &f.name == name) {
                    Some(existing) => {
                        existing.node = node;
                        existing.default = default;
                        existing.kw_only = kw_only;
                    }
                    None => collected.push(CollectedField {
                        name: name.clone(),
                        node,
                        default,
                        kw_only,
                    }),
                }
            }
        }

        let mut namespace_seen = HashSet::new();
        for field in &decl.fields {
            if !namespace_seen.insert(field.name.clone()) {
                return Err(SchemaError::DuplicateField(field.name.clone()));
            }
            let node = TypeNode::compile(&field.ty, self.registry)?;
            let default = field.spec.clone().into_source();
            match collected.iter_mut().find(|f| f.name == field.name) {
                Some(existing) => {
                    // Override in place: the original positional slot stays.
                    existing.node = node;
                    existing.default = default;
                    existing.kw_only = decl.config.kw_only;
                }
                None => collected.push(CollectedField {
                    name: field.name.clone(),
                    node,
                    default,
                    kw_only: decl.config.kw_only,
                }),
            }
        }
        Ok(collected)
    }
}

/// A defaulted field may not be followed by a required one in positional
/// order; keyword-only fields are exempt.
fn check_default_order(fields: &[CollectedField], nkwonly: usize) -> Result<()> {
    let positional = &fields[..fields.len() - nkwonly];
    let mut seen_default = false;
    for field in positional {
        if field.default.is_some() {
            seen_default = true;
        } else if seen_default {
            return Err(SchemaError::DefaultOrder(field.name.clone()));
        }
    }
    Ok(())
}

/// Resolve tagging: the tag field defaults to "type" and may not collide
/// with a data field.
fn resolve_tag(
    decl: &StructDecl,
    fields: &[CollectedField],
) -> Result<(Option<String>, Option<TagValue>)> {
    if !decl.config.tag.is_set() {
        return Ok((None, None));
    }
    let tag_value = match &decl.config.tag {
        TagMode::Default => TagValue::Str(decl.name.clone()),
        TagMode::Str(s) => TagValue::Str(s.clone()),
        TagMode::Int(i) => TagValue::Int(*i),
        TagMode::Unset => unreachable!("checked by is_set"),
    };
    let tag_field = decl
        .config
        .tag_field
        .clone()
        .unwrap_or_else(|| "type".to_string());
    if fields.iter().any(|f| f.name == tag_field) {
        return Err(SchemaError::TagConflict {
            name: tag_field,
            context: "tag field collides with a data field",
        });
    }
    Ok((Some(tag_field), Some(tag_value)))
}

/// Wire names with the rename policy applied; collisions are declaration
/// errors.
fn encode_names(config: &StructConfig, fields: &[CollectedField]) -> Result<Vec<String>> {
    let mut names = Vec::with_capacity(fields.len());
    let mut seen = HashSet::new();
    for field in fields {
        let wire = match &config.rename {
            Some(policy) => policy.apply(&field.name),
            None => field.name.clone(),
        };
        if !seen.insert(wire.clone()) {
            return Err(SchemaError::DuplicateField(wire));
        }
        names.push(wire);
    }
    Ok(names)
}
