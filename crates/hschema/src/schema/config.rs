// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Declaration configuration surface.
//!
//! One [`StructConfig`] travels with every struct declaration. Validation
//! runs before field collection, so conflicting options abort the
//! declaration before anything is built.

use crate::schema::{Result, SchemaError};
use std::collections::HashMap;

/// Field rename policy applied to encode-field names.
#[derive(Debug, Clone, PartialEq)]
pub enum RenamePolicy {
    /// Lowercase the declared name.
    Lower,
    /// Uppercase the declared name.
    Upper,
    /// `snake_case` to `camelCase`.
    Camel,
    /// `snake_case` to `PascalCase`.
    Pascal,
    /// `snake_case` to `kebab-case`.
    Kebab,
    /// Explicit declared-name to wire-name mapping; unmapped names pass
    /// through unchanged.
    Map(HashMap<String, String>),
}

impl RenamePolicy {
    /// Wire name for one declared field name.
    pub fn apply(&self, name: &str) -> String {
        match self {
            Self::Lower => name.to_lowercase(),
            Self::Upper => name.to_uppercase(),
            Self::Camel => camel_case(name, false),
            Self::Pascal => camel_case(name, true),
            Self::Kebab => name.replace('_', "-"),
            Self::Map(map) => map.get(name).cloned().unwrap_or_else(|| name.to_string()),
        }
    }
}

fn camel_case(name: &str, capitalize_first: bool) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper_next = capitalize_first;
    for ch in name.chars() {
        if ch == '_' {
            upper_next = true;
        } else if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}

/// Tag configuration for a struct declaration.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum TagMode {
    /// No tagging.
    #[default]
    Unset,
    /// Tag with the (renamed) type name.
    Default,
    /// Explicit string tag.
    Str(String),
    /// Explicit integer tag.
    Int(i64),
}

impl TagMode {
    /// True unless tagging is unset.
    pub fn is_set(&self) -> bool {
        !matches!(self, Self::Unset)
    }
}

/// Configuration options accepted by a struct declaration.
///
/// Defaults match an untagged, mutable, equatable declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct StructConfig {
    /// Name of the tag field; defaults to "type" when tagging is enabled.
    pub tag_field: Option<String>,
    /// Tagging mode.
    pub tag: TagMode,
    /// Encode-name rename policy.
    pub rename: Option<RenamePolicy>,
    /// Skip defaulted fields when encoding.
    pub omit_defaults: bool,
    /// Reject unknown fields when decoding.
    pub forbid_unknown_fields: bool,
    /// Instances are immutable after construction.
    pub frozen: bool,
    /// Instances compare by field values.
    pub eq: bool,
    /// Instances are orderable (requires `eq`).
    pub order: bool,
    /// All declared fields are keyword-only.
    pub kw_only: bool,
    /// Skip defaulted fields in the debug representation.
    pub repr_omit_defaults: bool,
    /// Encode fields positionally instead of by name.
    pub array_like: bool,
    /// Participate in cyclic collection (advisory; opt out when the record
    /// provably cannot cycle).
    pub gc: bool,
    /// Support weak references to instances (advisory).
    pub weakref: bool,
    /// Allow dynamic extra attributes on instances (advisory).
    pub dict: bool,
    /// Reserve a trailing slot for a lazily computed hash (requires
    /// `frozen`).
    pub cache_hash: bool,
}

impl Default for StructConfig {
    fn default() -> Self {
        Self {
            tag_field: None,
            tag: TagMode::Unset,
            rename: None,
            omit_defaults: false,
            forbid_unknown_fields: false,
            frozen: false,
            eq: true,
            order: false,
            kw_only: false,
            repr_omit_defaults: false,
            array_like: false,
            gc: true,
            weakref: false,
            dict: false,
            cache_hash: false,
        }
    }
}

impl StructConfig {
    /// Default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the tag mode.
    pub fn tag(mut self, tag: TagMode) -> Self {
        self.tag = tag;
        self
    }

    /// Set the tag field name.
    pub fn tag_field(mut self, name: impl Into<String>) -> Self {
        self.tag_field = Some(name.into());
        self
    }

    /// Set the rename policy.
    pub fn rename(mut self, policy: RenamePolicy) -> Self {
        self.rename = Some(policy);
        self
    }

    /// Toggle frozen instances.
    pub fn frozen(mut self, on: bool) -> Self {
        self.frozen = on;
        self
    }

    /// Toggle value equality.
    pub fn eq(mut self, on: bool) -> Self {
        self.eq = on;
        self
    }

    /// Toggle ordering support.
    pub fn order(mut self, on: bool) -> Self {
        self.order = on;
        self
    }

    /// Toggle keyword-only fields.
    pub fn kw_only(mut self, on: bool) -> Self {
        self.kw_only = on;
        self
    }

    /// Toggle omitting defaulted fields on encode.
    pub fn omit_defaults(mut self, on: bool) -> Self {
        self.omit_defaults = on;
        self
    }

    /// Toggle rejecting unknown fields on decode.
    pub fn forbid_unknown_fields(mut self, on: bool) -> Self {
        self.forbid_unknown_fields = on;
        self
    }

    /// Toggle defaulted-field omission in the debug representation.
    pub fn repr_omit_defaults(mut self, on: bool) -> Self {
        self.repr_omit_defaults = on;
        self
    }

    /// Toggle positional (array-like) encoding.
    pub fn array_like(mut self, on: bool) -> Self {
        self.array_like = on;
        self
    }

    /// Toggle cyclic-collection participation.
    pub fn gc(mut self, on: bool) -> Self {
        self.gc = on;
        self
    }

    /// Toggle weak-reference support.
    pub fn weakref(mut self, on: bool) -> Self {
        self.weakref = on;
        self
    }

    /// Toggle dynamic extra attributes.
    pub fn dict(mut self, on: bool) -> Self {
        self.dict = on;
        self
    }

    /// Toggle hash caching.
    pub fn cache_hash(mut self, on: bool) -> Self {
        self.cache_hash = on;
        self
    }

    /// Reject mutually exclusive option combinations.
    pub fn validate(&self) -> Result<()> {
        if self.order && !self.eq {
            return Err(SchemaError::ConfigConflict(
                "`order` requires `eq`".to_string(),
            ));
        }
        if self.cache_hash && !self.frozen {
            return Err(SchemaError::ConfigConflict(
                "`cache_hash` requires `frozen`".to_string(),
            ));
        }
        if self.tag_field.is_some() && !self.tag.is_set() {
            return Err(SchemaError::ConfigConflict(
                "`tag_field` requires `tag`".to_string(),
            ));
        }
        if self.frozen && self.dict {
            return Err(SchemaError::ConfigConflict(
                "`dict` mandates mutable instances, conflicting with `frozen`".to_string(),
            ));
        }
        Ok(())
    }
}
