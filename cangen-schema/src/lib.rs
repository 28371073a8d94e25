//! # cangen Schema
//!
//! Message schema model and frame layout compiler.
//!
//! This crate provides:
//! - The in-memory schema model (messages, primitives, bitfield groups)
//! - JSON schema document parsing with strict validation
//! - Expansion of repeating message families into concrete messages
//! - Layout compilation onto 8-byte, 11-bit identifier frames

pub mod error;
pub mod expand;
pub mod layout;
pub mod messages;
pub mod parser;
pub mod set;
pub mod types;
pub mod validation;

pub use error::{LayoutError, ParseError, SchemaError};
pub use expand::{expand, expand_all};
pub use layout::{BitPlacement, ByteSlot, Layout, compile};
pub use messages::{BitfieldGroup, Field, MessageDefinition, PrimitiveField, Repeat, Subfield};
pub use parser::{SchemaDocument, parse_schema, parse_schema_partial};
pub use set::SchemaSet;
pub use types::{ByteOrder, PrimitiveType};
pub use validation::validate_definition;
