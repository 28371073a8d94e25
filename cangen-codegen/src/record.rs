//! Dynamically typed message records for the runtime codec.

use cangen_schema::types::PrimitiveType;
use std::collections::BTreeMap;

/// A primitive field value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    /// Unsigned 8-bit integer.
    U8(u8),
    /// Signed 8-bit integer.
    I8(i8),
    /// Unsigned 16-bit integer.
    U16(u16),
    /// Signed 16-bit integer.
    I16(i16),
    /// Unsigned 32-bit integer.
    U32(u32),
    /// Signed 32-bit integer.
    I32(i32),
    /// Single precision float.
    F32(f32),
    /// Boolean.
    Bool(bool),
}

impl Value {
    /// Returns the primitive type of this value.
    #[must_use]
    pub const fn ty(&self) -> PrimitiveType {
        match self {
            Self::U8(_) => PrimitiveType::U8,
            Self::I8(_) => PrimitiveType::I8,
            Self::U16(_) => PrimitiveType::U16,
            Self::I16(_) => PrimitiveType::I16,
            Self::U32(_) => PrimitiveType::U32,
            Self::I32(_) => PrimitiveType::I32,
            Self::F32(_) => PrimitiveType::Float32,
            Self::Bool(_) => PrimitiveType::Bool,
        }
    }

    /// Returns the value's wire bit pattern, zero-extended to 32 bits.
    #[must_use]
    pub const fn to_bits(&self) -> u32 {
        match *self {
            Self::U8(v) => v as u32,
            Self::I8(v) => v as u8 as u32,
            Self::U16(v) => v as u32,
            Self::I16(v) => v as u16 as u32,
            Self::U32(v) => v,
            Self::I32(v) => v as u32,
            Self::F32(v) => v.to_bits(),
            Self::Bool(v) => v as u32,
        }
    }

    /// Rebuilds a value of type `ty` from its wire bit pattern.
    #[must_use]
    pub const fn from_bits(ty: PrimitiveType, bits: u32) -> Self {
        match ty {
            PrimitiveType::U8 => Self::U8(bits as u8),
            PrimitiveType::I8 => Self::I8(bits as u8 as i8),
            PrimitiveType::U16 => Self::U16(bits as u16),
            PrimitiveType::I16 => Self::I16(bits as u16 as i16),
            PrimitiveType::U32 => Self::U32(bits),
            PrimitiveType::I32 => Self::I32(bits as i32),
            PrimitiveType::Float32 => Self::F32(f32::from_bits(bits)),
            PrimitiveType::Bool => Self::Bool(bits != 0),
        }
    }
}

macro_rules! impl_from_value {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Self::$variant(v)
                }
            }
        )*
    };
}

impl_from_value! {
    u8 => U8,
    i8 => I8,
    u16 => U16,
    i16 => I16,
    u32 => U32,
    i32 => I32,
    f32 => F32,
    bool => Bool,
}

/// Field values of one message instance.
///
/// Primitive fields are keyed by field name; bitfield subfields are keyed
/// by group name, then subfield name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    values: BTreeMap<String, Value>,
    bits: BTreeMap<String, BTreeMap<String, u8>>,
}

impl Record {
    /// Creates an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a primitive field value.
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(field, value);
        self
    }

    /// Sets a bitfield subfield value.
    #[must_use]
    pub fn with_bits(
        mut self,
        group: impl Into<String>,
        subfield: impl Into<String>,
        value: u8,
    ) -> Self {
        self.set_bits(group, subfield, value);
        self
    }

    /// Sets a primitive field value in place.
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(field.into(), value.into());
    }

    /// Sets a bitfield subfield value in place.
    pub fn set_bits(&mut self, group: impl Into<String>, subfield: impl Into<String>, value: u8) {
        self.bits
            .entry(group.into())
            .or_default()
            .insert(subfield.into(), value);
    }

    /// Returns a primitive field value.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<Value> {
        self.values.get(field).copied()
    }

    /// Returns a bitfield subfield value.
    #[must_use]
    pub fn get_bits(&self, group: &str, subfield: &str) -> Option<u8> {
        self.bits.get(group)?.get(subfield).copied()
    }
}
