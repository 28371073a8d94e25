//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types and traits.
//!
//! ```ignore
//! use cangen::prelude::*;
//! ```

// Core types
pub use cangen_core::error::{Error as CoreError, Result as CoreResult};
pub use cangen_core::{CanFrame, CanMessage, MAX_DLC, MAX_STANDARD_ID, StandardId};

// Schema types
pub use cangen_schema::{
    ByteOrder, Field, Layout, LayoutError, MessageDefinition, ParseError, PrimitiveType, Repeat,
    SchemaError, SchemaSet, Subfield, parse_schema, parse_schema_partial,
};

// Compiler and generator types
pub use cangen_codegen::{
    CodecSpec, CodegenError, CompileError, CompileReport, CompiledSet, Compiler, CompilerBuilder,
    Generator, IdentifierEnum, PackError, Record, Target, Value,
};
