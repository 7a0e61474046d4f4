// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type-kind tag bitset for [`TypeNode`](crate::schema::TypeNode).
//!
//! Each bit marks one runtime kind a node accepts. A node compiled from a
//! union of primitive kinds carries several bits at once; the detail slots
//! attached to the node are fully determined by which bits are set.

/// Bitset of runtime kinds accepted by one type node.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Kinds(pub u64);

impl Kinds {
    /// Null/none value admissible
    pub const NONE: Self = Self(1 << 0);

    /// Boolean
    pub const BOOL: Self = Self(1 << 1);

    /// 64-bit signed integer
    pub const INT: Self = Self(1 << 2);

    /// 64-bit float
    pub const FLOAT: Self = Self(1 << 3);

    /// UTF-8 string
    pub const STR: Self = Self(1 << 4);

    /// Byte string
    pub const BYTES: Self = Self(1 << 5);

    /// Extension value (code + payload)
    pub const EXT: Self = Self(1 << 6);

    /// Literal set (int/str literals, carries a lookup table detail)
    pub const LITERAL: Self = Self(1 << 7);

    /// Variable-length list (carries an element detail, optional bound)
    pub const LIST: Self = Self(1 << 8);

    /// Tuple (carries an element detail, optional fixed length)
    pub const TUPLE: Self = Self(1 << 9);

    /// Key/value map (carries key and value details)
    pub const MAP: Self = Self(1 << 10);

    /// Nested record (carries a record-reference detail)
    pub const RECORD: Self = Self(1 << 11);

    /// Tagged union of records (carries a tag-lookup detail)
    pub const RECORD_UNION: Self = Self(1 << 12);

    /// Any value accepted, no validation
    pub const ANY: Self = Self(1 << 13);

    /// Empty set
    pub const fn empty() -> Self {
        Self(0)
    }

    /// True if no bit is set.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True if every bit of `other` is set in `self`.
    pub const fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    /// True if any bit of `other` is set in `self`.
    pub const fn intersects(self, other: Self) -> bool {
        (self.0 & other.0) != 0
    }

    /// Union of both sets.
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Number of bits set.
    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }

    /// Human-readable kind list, used in error messages.
    pub fn describe(self) -> String {
        const NAMES: &[(Kinds, &str)] = &[
            (Kinds::NONE, "none"),
            (Kinds::BOOL, "bool"),
            (Kinds::INT, "int"),
            (Kinds::FLOAT, "float"),
            (Kinds::STR, "str"),
            (Kinds::BYTES, "bytes"),
            (Kinds::EXT, "ext"),
            (Kinds::LITERAL, "literal"),
            (Kinds::LIST, "list"),
            (Kinds::TUPLE, "tuple"),
            (Kinds::MAP, "map"),
            (Kinds::RECORD, "record"),
            (Kinds::RECORD_UNION, "record union"),
            (Kinds::ANY, "any"),
        ];
        let mut parts = Vec::new();
        for (bit, name) in NAMES {
            if self.contains(*bit) {
                parts.push(*name);
            }
        }
        if parts.is_empty() {
            "nothing".to_string()
        } else {
            parts.join(" | ")
        }
    }
}

impl std::ops::BitOr for Kinds {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl std::ops::BitOrAssign for Kinds {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}
