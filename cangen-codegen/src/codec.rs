//! Codec derivation: from a compiled [`Layout`] to a target-agnostic codec.
//!
//! A [`CodecSpec`] is everything an emitter needs to render a message:
//! its identity, its DLC, the typed record layout and one [`PackStep`] per
//! payload byte. It can also pack and unpack [`Record`]s directly.

use crate::error::{CodegenError, PackError};
use crate::record::{Record, Value};
use cangen_core::{CanFrame, Error as FrameError, MAX_DLC, StandardId};
use cangen_schema::layout::{ByteSlot, Layout};
use cangen_schema::messages::Field;
use cangen_schema::types::{ByteOrder, PrimitiveType};
use serde::Serialize;
use std::collections::BTreeMap;

/// Target-agnostic codec description of one concrete message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodecSpec {
    /// Message name.
    pub name: String,
    /// Message description.
    pub description: String,
    /// Standard frame identifier.
    pub identifier: u16,
    /// Payload length.
    pub dlc: u8,
    /// Byte order of `float32` payload bytes.
    pub float_order: ByteOrder,
    /// Record layout: the message fields in declaration order.
    pub fields: Vec<Field>,
    /// One slot per payload byte.
    pub slots: Vec<ByteSlot>,
}

/// How to produce one payload byte.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum PackStep {
    /// `byte = (field >> shift) as u8` on an integer or bool field.
    TakeByte {
        /// Field name.
        field: String,
        /// Field type.
        ty: PrimitiveType,
        /// Right shift in bits.
        shift: u32,
    },
    /// `byte = (field.to_bits() >> shift) as u8` on a `float32` field.
    TakeFloatByte {
        /// Field name.
        field: String,
        /// Right shift in bits, already adjusted for the float byte order.
        shift: u32,
    },
    /// `byte = OR of (subfield & mask) << shift` over a bitfield group.
    OrBits {
        /// Bitfield group name.
        group: String,
        /// One term per subfield.
        terms: Vec<BitTerm>,
    },
}

/// One subfield term of a packed bitfield byte.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BitTerm {
    /// Subfield name.
    pub subfield: String,
    /// Mask applied before shifting.
    pub mask: u8,
    /// Left shift in bits.
    pub shift: u32,
}

impl CodecSpec {
    /// Derives the codec of a compiled layout.
    ///
    /// This is a projection; all schema validation happened while compiling
    /// the layout.
    ///
    /// # Errors
    /// Returns [`CodegenError::LayoutInvariant`] if the layout's length does
    /// not match its slots, or its identifier or length do not fit a frame.
    pub fn derive(layout: &Layout, float_order: ByteOrder) -> Result<Self, CodegenError> {
        let name = &layout.message.name;

        if layout.total_length != layout.slots.len() {
            return Err(CodegenError::layout_invariant(
                name,
                format!(
                    "total length {} does not match {} slot(s)",
                    layout.total_length,
                    layout.slots.len()
                ),
            ));
        }

        let dlc = u8::try_from(layout.total_length)
            .ok()
            .filter(|dlc| usize::from(*dlc) <= MAX_DLC)
            .ok_or_else(|| {
                CodegenError::layout_invariant(
                    name,
                    format!("length {} exceeds a frame", layout.total_length),
                )
            })?;

        let identifier = u16::try_from(layout.message.identifier)
            .ok()
            .and_then(StandardId::new)
            .ok_or_else(|| {
                CodegenError::layout_invariant(
                    name,
                    format!(
                        "identifier {} is not a standard identifier",
                        layout.message.identifier
                    ),
                )
            })?;

        Ok(Self {
            name: name.clone(),
            description: layout.message.description.clone(),
            identifier: identifier.as_raw(),
            dlc,
            float_order,
            fields: layout.message.fields.clone(),
            slots: layout.slots.clone(),
        })
    }

    /// Returns the pack procedure, one step per payload byte.
    #[must_use]
    pub fn pack_steps(&self) -> Vec<PackStep> {
        self.slots
            .iter()
            .map(|slot| match slot {
                ByteSlot::WholeField { field, byte_index } if field.ty.is_float() => {
                    PackStep::TakeFloatByte {
                        field: field.name.clone(),
                        shift: float_shift(*byte_index, self.float_order),
                    }
                }
                ByteSlot::WholeField { field, byte_index } => PackStep::TakeByte {
                    field: field.name.clone(),
                    ty: field.ty,
                    shift: (*byte_index as u32) * 8,
                },
                ByteSlot::PackedBits { group, placements } => PackStep::OrBits {
                    group: group.name.clone(),
                    terms: placements
                        .iter()
                        .map(|p| BitTerm {
                            subfield: group.subfields[p.subfield].name.clone(),
                            mask: p.mask(),
                            shift: p.offset,
                        })
                        .collect(),
                },
            })
            .collect()
    }

    /// Returns the standard identifier of this message.
    #[must_use]
    pub fn standard_id(&self) -> StandardId {
        StandardId::new(self.identifier).unwrap_or(StandardId::MAX)
    }

    /// Packs a record into a frame.
    ///
    /// Subfield values wider than their declared width are masked.
    ///
    /// # Errors
    /// Returns [`PackError::MissingField`] or [`PackError::TypeMismatch`]
    /// if the record does not match the message fields.
    pub fn pack(&self, record: &Record) -> Result<CanFrame, PackError> {
        let mut data = [0u8; MAX_DLC];

        for (byte, step) in data.iter_mut().zip(self.pack_steps()) {
            *byte = match step {
                PackStep::TakeByte { field, ty, shift } => {
                    (self.field_value(record, &field, ty)?.to_bits() >> shift) as u8
                }
                PackStep::TakeFloatByte { field, shift } => {
                    let value = self.field_value(record, &field, PrimitiveType::Float32)?;
                    (value.to_bits() >> shift) as u8
                }
                PackStep::OrBits { group, terms } => {
                    let mut packed = 0u8;
                    for term in &terms {
                        let value = record.get_bits(&group, &term.subfield).ok_or_else(|| {
                            PackError::MissingField {
                                message: self.name.clone(),
                                field: format!("{group}.{}", term.subfield),
                            }
                        })?;
                        packed |= (value & term.mask) << term.shift;
                    }
                    packed
                }
            };
        }

        Ok(CanFrame::new(
            self.standard_id(),
            &data[..usize::from(self.dlc)],
        )?)
    }

    /// Unpacks a frame into a record.
    ///
    /// # Errors
    /// Returns [`PackError::Frame`] if the frame identifier or DLC do not
    /// match this message.
    pub fn unpack(&self, frame: &CanFrame) -> Result<Record, PackError> {
        if frame.id().as_raw() != self.identifier {
            return Err(FrameError::IdentifierMismatch {
                expected: self.identifier,
                actual: frame.id().as_raw(),
            }
            .into());
        }
        if frame.dlc() != self.dlc {
            return Err(FrameError::LengthMismatch {
                expected: self.dlc,
                actual: frame.dlc(),
            }
            .into());
        }

        let mut record = Record::new();
        let mut accumulated: BTreeMap<String, (PrimitiveType, u32)> = BTreeMap::new();

        for (byte, step) in frame.data().iter().zip(self.pack_steps()) {
            match step {
                PackStep::TakeByte { field, ty, shift } => {
                    accumulated.entry(field).or_insert((ty, 0)).1 |= u32::from(*byte) << shift;
                }
                PackStep::TakeFloatByte { field, shift } => {
                    accumulated
                        .entry(field)
                        .or_insert((PrimitiveType::Float32, 0))
                        .1 |= u32::from(*byte) << shift;
                }
                PackStep::OrBits { group, terms } => {
                    for term in terms {
                        record.set_bits(
                            group.as_str(),
                            term.subfield,
                            (*byte >> term.shift) & term.mask,
                        );
                    }
                }
            }
        }

        for (name, (ty, bits)) in accumulated {
            record.set(name, Value::from_bits(ty, bits));
        }

        Ok(record)
    }

    /// Fetches a primitive value from a record and checks its type.
    fn field_value(
        &self,
        record: &Record,
        field: &str,
        expected: PrimitiveType,
    ) -> Result<Value, PackError> {
        let value = record.get(field).ok_or_else(|| PackError::MissingField {
            message: self.name.clone(),
            field: field.to_string(),
        })?;

        if value.ty() != expected {
            return Err(PackError::TypeMismatch {
                message: self.name.clone(),
                field: field.to_string(),
                expected,
                actual: value.ty(),
            });
        }

        Ok(value)
    }
}

/// Right shift selecting byte `index` of a float's bit pattern.
fn float_shift(index: usize, order: ByteOrder) -> u32 {
    let index = index as u32;
    match order {
        ByteOrder::LittleEndian => index * 8,
        ByteOrder::BigEndian => (3 - index) * 8,
    }
}
