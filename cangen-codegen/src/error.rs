//! Error types for codec derivation, compilation and code generation.

use cangen_schema::types::PrimitiveType;
use cangen_schema::{LayoutError, ParseError, SchemaError};
use thiserror::Error;

/// Error type for code generation operations.
#[derive(Debug, Error)]
pub enum CodegenError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A layout handed to the codec generator breaks its own invariants.
    ///
    /// This is a bug in the compiler, never a schema defect.
    #[error("internal layout error in message '{message}': {reason}")]
    LayoutInvariant {
        /// Message name.
        message: String,
        /// Broken invariant.
        reason: String,
    },

    /// Compilation produced errors, so nothing was generated.
    #[error("compilation failed with {} error(s)", .0.len())]
    Compile(Vec<CompileError>),

    /// Code generation error.
    #[error("generation error: {message}")]
    Generation {
        /// Error message.
        message: String,
    },
}

impl CodegenError {
    /// Creates a generation error with the given message.
    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation {
            message: message.into(),
        }
    }

    /// Creates a layout invariant error.
    pub fn layout_invariant(message: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::LayoutInvariant {
            message: message.into(),
            reason: reason.into(),
        }
    }
}

/// One entry of a batch compilation report.
#[derive(Debug, Error)]
pub enum CompileError {
    /// A schema document could not be read.
    #[error("{origin}: {source}")]
    Parse {
        /// Where the document came from (usually a path).
        origin: String,
        /// Underlying parse error.
        #[source]
        source: ParseError,
    },

    /// Malformed message definition.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// Framing limit violated by a concrete message.
    #[error(transparent)]
    Layout(#[from] LayoutError),

    /// Internal codec generation failure.
    #[error(transparent)]
    Codegen(#[from] CodegenError),

    /// Two concrete messages share an identifier.
    #[error("duplicate identifier {identifier:#05x}: '{first}' and '{second}'")]
    DuplicateIdentifier {
        /// Shared identifier.
        identifier: u16,
        /// Message that claimed the identifier first.
        first: String,
        /// Message that repeated it.
        second: String,
    },

    /// Two concrete messages share a name.
    #[error("duplicate message name '{name}'")]
    DuplicateName {
        /// Repeated name.
        name: String,
    },
}

/// Error type for runtime record packing and unpacking.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PackError {
    /// The record has no value for a field or subfield.
    #[error("message '{message}': missing value for '{field}'")]
    MissingField {
        /// Message name.
        message: String,
        /// Field (or `group.subfield`) name.
        field: String,
    },

    /// The record value has a different type than the field.
    #[error("message '{message}': field '{field}' expects {expected}, got {actual}")]
    TypeMismatch {
        /// Message name.
        message: String,
        /// Field name.
        field: String,
        /// Declared type.
        expected: PrimitiveType,
        /// Type of the supplied value.
        actual: PrimitiveType,
    },

    /// The frame does not belong to this message.
    #[error("frame error: {0}")]
    Frame(#[from] cangen_core::Error),
}
