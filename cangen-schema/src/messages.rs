//! Message definitions.
//!
//! This module contains the in-memory model of one message definition: its
//! identity, its ordered fields (primitives and bitfield groups) and the
//! optional repeat metadata of a message family template.

use crate::types::PrimitiveType;
use cangen_core::MAX_STANDARD_ID;
use serde::Serialize;
use std::collections::BTreeMap;

/// Message definition.
///
/// While `repeat` is present, `name` and `identifier` are the family
/// template's base values rather than the identity of a concrete frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageDefinition {
    /// Message name.
    pub name: String,
    /// Frame identifier (range-checked by the layout compiler).
    pub identifier: i64,
    /// Description.
    pub description: String,
    /// Fields in declaration order.
    pub fields: Vec<Field>,
    /// Repeat metadata for message families.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repeat: Option<Repeat>,
}

impl MessageDefinition {
    /// Creates a new message definition with no fields.
    #[must_use]
    pub fn new(name: impl Into<String>, identifier: i64) -> Self {
        Self {
            name: name.into(),
            identifier,
            description: String::new(),
            fields: Vec::new(),
            repeat: None,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Appends a field.
    #[must_use]
    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Marks the definition as a family template.
    #[must_use]
    pub fn with_repeat(mut self, repeat: Repeat) -> Self {
        self.repeat = Some(repeat);
        self
    }

    /// Adds a field to the message.
    pub fn add_field(&mut self, field: Field) {
        self.fields.push(field);
    }

    /// Returns true if this definition is a family template.
    #[must_use]
    pub fn is_template(&self) -> bool {
        self.repeat.is_some()
    }

    /// Looks up a field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name() == name)
    }
}

/// Repeat metadata of a message family template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Repeat {
    /// Number of concrete messages to generate.
    pub count: u32,
    /// Identifier step between consecutive members.
    pub offset: i64,
}

impl Repeat {
    /// Identifier step used when a schema does not declare one.
    pub const DEFAULT_OFFSET: i64 = 1;

    /// Largest family that can fit the standard identifier space.
    pub const MAX_COUNT: u32 = MAX_STANDARD_ID as u32 + 1;

    /// Creates repeat metadata with the default identifier step.
    #[must_use]
    pub const fn new(count: u32) -> Self {
        Self {
            count,
            offset: Self::DEFAULT_OFFSET,
        }
    }

    /// Sets the identifier step.
    #[must_use]
    pub const fn with_offset(mut self, offset: i64) -> Self {
        self.offset = offset;
        self
    }
}

/// A message field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Field {
    /// A fixed-width primitive value.
    Primitive(PrimitiveField),
    /// A single byte split into named sub-values.
    Bitfield(BitfieldGroup),
}

impl Field {
    /// Creates a primitive field.
    #[must_use]
    pub fn primitive(name: impl Into<String>, ty: PrimitiveType) -> Self {
        Self::Primitive(PrimitiveField::new(name, ty))
    }

    /// Creates a bitfield group.
    #[must_use]
    pub fn bitfield(name: impl Into<String>, subfields: Vec<Subfield>) -> Self {
        Self::Bitfield(BitfieldGroup::new(name, subfields))
    }

    /// Returns the field name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Primitive(p) => &p.name,
            Self::Bitfield(b) => &b.name,
        }
    }

    /// Returns the number of payload bytes this field occupies.
    #[must_use]
    pub fn byte_width(&self) -> usize {
        match self {
            Self::Primitive(p) => p.byte_width(),
            Self::Bitfield(_) => 1,
        }
    }
}

/// Primitive field definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrimitiveField {
    /// Field name.
    pub name: String,
    /// Primitive type.
    #[serde(rename = "type")]
    pub ty: PrimitiveType,
}

impl PrimitiveField {
    /// Creates a new primitive field.
    #[must_use]
    pub fn new(name: impl Into<String>, ty: PrimitiveType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }

    /// Returns the encoded width in bytes.
    #[must_use]
    pub const fn byte_width(&self) -> usize {
        self.ty.size()
    }
}

/// Bitfield group definition: sub-values packed into one byte.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BitfieldGroup {
    /// Group name.
    pub name: String,
    /// Subfields, packed LSB-first in this order.
    pub subfields: Vec<Subfield>,
}

impl BitfieldGroup {
    /// Creates a new bitfield group.
    #[must_use]
    pub fn new(name: impl Into<String>, subfields: Vec<Subfield>) -> Self {
        Self {
            name: name.into(),
            subfields,
        }
    }

    /// Returns the sum of all subfield widths, saturating at `u32::MAX`.
    #[must_use]
    pub fn total_bits(&self) -> u32 {
        self.subfields
            .iter()
            .fold(0u32, |acc, s| acc.saturating_add(s.bit_width))
    }

    /// Looks up a subfield by name.
    #[must_use]
    pub fn subfield(&self, name: &str) -> Option<&Subfield> {
        self.subfields.iter().find(|s| s.name == name)
    }
}

/// Subfield of a bitfield group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Subfield {
    /// Subfield name.
    pub name: String,
    /// Width in bits.
    pub bit_width: u32,
    /// Documentation labels for individual values.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub value_labels: BTreeMap<i64, String>,
}

impl Subfield {
    /// Width used when a schema does not declare one.
    pub const DEFAULT_BIT_WIDTH: u32 = 1;

    /// Creates a one-bit subfield.
    #[must_use]
    pub fn flag(name: impl Into<String>) -> Self {
        Self::new(name, Self::DEFAULT_BIT_WIDTH)
    }

    /// Creates a subfield with the given width.
    #[must_use]
    pub fn new(name: impl Into<String>, bit_width: u32) -> Self {
        Self {
            name: name.into(),
            bit_width,
            value_labels: BTreeMap::new(),
        }
    }

    /// Adds a documentation label for a value.
    #[must_use]
    pub fn with_label(mut self, value: i64, label: impl Into<String>) -> Self {
        self.value_labels.insert(value, label.into());
        self
    }

    /// Returns the mask covering this subfield's width, saturating at one byte.
    #[must_use]
    pub fn mask(&self) -> u8 {
        if self.bit_width >= 8 {
            u8::MAX
        } else {
            ((1u16 << self.bit_width) - 1) as u8
        }
    }
}
