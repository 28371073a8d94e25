//! Primitive field types and byte order.
//!
//! This module contains the closed set of primitive types a message field can
//! declare, together with the byte-order setting used for `float32` payloads.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Byte order for multi-byte values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ByteOrder {
    /// Little-endian byte order (default).
    #[default]
    LittleEndian,
    /// Big-endian byte order.
    BigEndian,
}

impl ByteOrder {
    /// Parses byte order from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "littleendian" | "little-endian" | "little" | "le" => Some(Self::LittleEndian),
            "bigendian" | "big-endian" | "big" | "be" => Some(Self::BigEndian),
            _ => None,
        }
    }
}

/// Primitive field types supported on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimitiveType {
    /// Unsigned 8-bit integer.
    U8,
    /// Signed 8-bit integer.
    I8,
    /// Unsigned 16-bit integer.
    U16,
    /// Signed 16-bit integer.
    I16,
    /// Unsigned 32-bit integer.
    U32,
    /// Signed 32-bit integer.
    I32,
    /// IEEE-754 single precision float.
    Float32,
    /// Boolean stored in one byte.
    Bool,
}

impl PrimitiveType {
    /// All supported primitive types.
    pub const ALL: [Self; 8] = [
        Self::U8,
        Self::I8,
        Self::U16,
        Self::I16,
        Self::U32,
        Self::I32,
        Self::Float32,
        Self::Bool,
    ];

    /// Returns the size of the primitive type in bytes.
    #[must_use]
    pub const fn size(&self) -> usize {
        match self {
            Self::U8 | Self::I8 | Self::Bool => 1,
            Self::U16 | Self::I16 => 2,
            Self::U32 | Self::I32 | Self::Float32 => 4,
        }
    }

    /// Returns the Rust type name for this primitive.
    #[must_use]
    pub const fn rust_type(&self) -> &'static str {
        match self {
            Self::U8 => "u8",
            Self::I8 => "i8",
            Self::U16 => "u16",
            Self::I16 => "i16",
            Self::U32 => "u32",
            Self::I32 => "i32",
            Self::Float32 => "f32",
            Self::Bool => "bool",
        }
    }

    /// Returns the C type name used in schema documents.
    #[must_use]
    pub const fn c_type(&self) -> &'static str {
        match self {
            Self::U8 => "uint8_t",
            Self::I8 => "int8_t",
            Self::U16 => "uint16_t",
            Self::I16 => "int16_t",
            Self::U32 => "uint32_t",
            Self::I32 => "int32_t",
            Self::Float32 => "float",
            Self::Bool => "bool",
        }
    }

    /// Parses a schema type token.
    ///
    /// Accepts the C spellings (`uint8_t`, `float`, ...) and the short
    /// Rust-like spellings (`u8`, `f32`, ...).
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "uint8_t" | "u8" | "uint8" => Some(Self::U8),
            "int8_t" | "i8" | "int8" => Some(Self::I8),
            "uint16_t" | "u16" | "uint16" => Some(Self::U16),
            "int16_t" | "i16" | "int16" => Some(Self::I16),
            "uint32_t" | "u32" | "uint32" => Some(Self::U32),
            "int32_t" | "i32" | "int32" => Some(Self::I32),
            "float" | "f32" | "float32" => Some(Self::Float32),
            "bool" => Some(Self::Bool),
            _ => None,
        }
    }

    /// Returns true for signed integer types.
    #[must_use]
    pub const fn is_signed(&self) -> bool {
        matches!(self, Self::I8 | Self::I16 | Self::I32)
    }

    /// Returns true for the floating point type.
    #[must_use]
    pub const fn is_float(&self) -> bool {
        matches!(self, Self::Float32)
    }
}

impl FromStr for PrimitiveType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_token(s).ok_or_else(|| s.to_string())
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.c_type())
    }
}
