//! Frame layout compilation.
//!
//! This module assigns every field of a concrete message a byte position in
//! the frame payload (and every bitfield subfield a bit position within its
//! byte), then enforces the framing limits of the transport:
//!
//! - a bitfield group fits in one byte (at most 8 bits),
//! - the payload fits in one frame (at most 8 bytes),
//! - the identifier fits the 11-bit standard identifier space.

use crate::error::LayoutError;
use crate::messages::{BitfieldGroup, Field, MessageDefinition, PrimitiveField};
use cangen_core::{MAX_DLC, MAX_STANDARD_ID};
use serde::Serialize;

/// Number of bits available to one bitfield group.
pub const BITS_PER_GROUP: u32 = 8;

/// Compiled byte layout of one concrete message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Layout {
    /// The concrete message this layout belongs to.
    pub message: MessageDefinition,
    /// One slot per occupied payload byte, in byte order.
    pub slots: Vec<ByteSlot>,
    /// Payload length in bytes.
    pub total_length: usize,
}

impl Layout {
    /// Returns the slot at a payload byte index.
    #[must_use]
    pub fn slot(&self, index: usize) -> Option<&ByteSlot> {
        self.slots.get(index)
    }

    /// Returns the first byte index occupied by a field.
    #[must_use]
    pub fn byte_offset_of(&self, field: &str) -> Option<usize> {
        self.slots.iter().position(|slot| slot.field_name() == field)
    }
}

/// Content of one payload byte.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ByteSlot {
    /// Byte `byte_index` (least significant first) of a primitive field.
    WholeField {
        /// The primitive field.
        field: PrimitiveField,
        /// Index of this byte within the field's encoding.
        byte_index: usize,
    },
    /// All subfields of one bitfield group.
    PackedBits {
        /// The bitfield group.
        group: BitfieldGroup,
        /// Bit position of every subfield, in declaration order.
        placements: Vec<BitPlacement>,
    },
}

impl ByteSlot {
    /// Returns the name of the field occupying this byte.
    #[must_use]
    pub fn field_name(&self) -> &str {
        match self {
            Self::WholeField { field, .. } => &field.name,
            Self::PackedBits { group, .. } => &group.name,
        }
    }
}

/// Bit position of one subfield within its byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BitPlacement {
    /// Index of the subfield in its group.
    pub subfield: usize,
    /// Bit offset from the least significant bit.
    pub offset: u32,
    /// Width in bits.
    pub width: u32,
}

impl BitPlacement {
    /// Returns the mask for the subfield value before shifting.
    #[must_use]
    pub const fn mask(&self) -> u8 {
        if self.width >= 8 {
            u8::MAX
        } else {
            ((1u16 << self.width) - 1) as u8
        }
    }
}

/// Compiles the byte layout of a concrete message.
///
/// Fields are laid out in declaration order from byte 0. A primitive of
/// width `w` takes `w` consecutive bytes; a bitfield group takes exactly one
/// byte with its subfields packed LSB-first.
///
/// # Errors
/// Returns the first framing violation found, checked in this order:
/// [`LayoutError::BitOverflow`], [`LayoutError::FrameTooLarge`],
/// [`LayoutError::IdentifierOutOfRange`]. A definition that still carries
/// `repeat` fails with [`LayoutError::UnexpandedFamily`].
pub fn compile(def: &MessageDefinition) -> Result<Layout, LayoutError> {
    if def.repeat.is_some() {
        return Err(LayoutError::UnexpandedFamily {
            message: def.name.clone(),
        });
    }

    let mut slots = Vec::with_capacity(MAX_DLC);
    let mut cursor = 0usize;

    for field in &def.fields {
        match field {
            Field::Primitive(primitive) => {
                for byte_index in 0..primitive.byte_width() {
                    slots.push(ByteSlot::WholeField {
                        field: primitive.clone(),
                        byte_index,
                    });
                }
                cursor += primitive.byte_width();
            }
            Field::Bitfield(group) => {
                let placements = place_bits(&def.name, group)?;
                slots.push(ByteSlot::PackedBits {
                    group: group.clone(),
                    placements,
                });
                cursor += 1;
            }
        }
    }

    if cursor > MAX_DLC {
        return Err(LayoutError::FrameTooLarge {
            message: def.name.clone(),
            length: cursor,
        });
    }

    if !(0..=i64::from(MAX_STANDARD_ID)).contains(&def.identifier) {
        return Err(LayoutError::IdentifierOutOfRange {
            message: def.name.clone(),
            identifier: def.identifier,
        });
    }

    tracing::trace!("laid out '{}' in {} byte(s)", def.name, cursor);

    Ok(Layout {
        message: def.clone(),
        slots,
        total_length: cursor,
    })
}

/// Assigns running bit offsets to the subfields of a group.
fn place_bits(message: &str, group: &BitfieldGroup) -> Result<Vec<BitPlacement>, LayoutError> {
    let mut placements = Vec::with_capacity(group.subfields.len());
    let mut offset = 0u32;

    for (index, subfield) in group.subfields.iter().enumerate() {
        placements.push(BitPlacement {
            subfield: index,
            offset,
            width: subfield.bit_width,
        });
        offset = offset.saturating_add(subfield.bit_width);
    }

    let bits = group.total_bits();
    if bits > BITS_PER_GROUP {
        return Err(LayoutError::BitOverflow {
            message: message.to_string(),
            group: group.name.clone(),
            bits,
        });
    }

    Ok(placements)
}
