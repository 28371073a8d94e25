//! Error types for schema parsing, validation and layout compilation.

use thiserror::Error;

/// Error type for schema document parsing.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The document is not well-formed JSON or does not match the document shape.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// One or more packets failed validation.
    #[error("{} schema error(s), first: {}", .0.len(), first_error(.0))]
    Invalid(Vec<SchemaError>),
}

fn first_error(errors: &[SchemaError]) -> String {
    errors
        .first()
        .map_or_else(String::new, ToString::to_string)
}

/// Error type for malformed message definitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// Field declares a type outside the supported primitive set.
    #[error("unsupported type '{type_name}' for field '{field}' in message '{message}'")]
    UnsupportedType {
        /// Message name.
        message: String,
        /// Field name.
        field: String,
        /// Declared type token.
        type_name: String,
    },

    /// Subfield declares a width of zero or less.
    #[error(
        "invalid bit width {width} for subfield '{subfield}' of group '{group}' in message '{message}'"
    )]
    InvalidBitWidth {
        /// Message name.
        message: String,
        /// Bitfield group name.
        group: String,
        /// Subfield name.
        subfield: String,
        /// Declared width.
        width: i64,
    },

    /// Two subfields of one group share a name.
    #[error("duplicate subfield '{subfield}' in group '{group}' of message '{message}'")]
    DuplicateSubfield {
        /// Message name.
        message: String,
        /// Bitfield group name.
        group: String,
        /// Repeated subfield name.
        subfield: String,
    },

    /// Two fields of one message share a name.
    #[error("duplicate field '{field}' in message '{message}'")]
    DuplicateField {
        /// Message name.
        message: String,
        /// Repeated field name.
        field: String,
    },

    /// Bitfield group without subfields.
    #[error("bitfield group '{group}' in message '{message}' has no subfields")]
    EmptyBitfield {
        /// Message name.
        message: String,
        /// Bitfield group name.
        group: String,
    },

    /// Repeat count that produces no concrete message.
    #[error("invalid repeat count {count} for message '{message}'")]
    InvalidRepeat {
        /// Message name.
        message: String,
        /// Declared count.
        count: i64,
    },

    /// Value label key that is not an integer.
    #[error("invalid value label key '{key}' for subfield '{subfield}' in message '{message}'")]
    InvalidValueLabel {
        /// Message name.
        message: String,
        /// Subfield name.
        subfield: String,
        /// Offending key.
        key: String,
    },

    /// Bitfield declared without a `bits` list, or a primitive carrying one.
    #[error("field '{field}' in message '{message}': {reason}")]
    MalformedField {
        /// Message name.
        message: String,
        /// Field name.
        field: String,
        /// What is wrong with the declaration.
        reason: String,
    },
}

impl SchemaError {
    /// Returns the name of the message the error belongs to.
    #[must_use]
    pub fn message_name(&self) -> &str {
        match self {
            Self::UnsupportedType { message, .. }
            | Self::InvalidBitWidth { message, .. }
            | Self::DuplicateSubfield { message, .. }
            | Self::DuplicateField { message, .. }
            | Self::EmptyBitfield { message, .. }
            | Self::InvalidRepeat { message, .. }
            | Self::InvalidValueLabel { message, .. }
            | Self::MalformedField { message, .. } => message,
        }
    }

    /// Creates a malformed field error.
    pub fn malformed(
        message: impl Into<String>,
        field: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::MalformedField {
            message: message.into(),
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Error type for layout compilation.
///
/// These are the framing limits of the transport and are not configurable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// Subfields of one bitfield group need more than one byte.
    #[error("bitfield group '{group}' in message '{message}' needs {bits} bits (max 8)")]
    BitOverflow {
        /// Message name.
        message: String,
        /// Bitfield group name.
        group: String,
        /// Total declared bits.
        bits: u32,
    },

    /// Message payload exceeds the frame limit.
    #[error("message '{message}' needs {length} bytes (max 8)")]
    FrameTooLarge {
        /// Message name.
        message: String,
        /// Computed payload length.
        length: usize,
    },

    /// Identifier outside the 11-bit standard identifier space.
    #[error("message '{message}' has identifier {identifier} outside 0..=2047 (0x7ff)")]
    IdentifierOutOfRange {
        /// Message name.
        message: String,
        /// Offending identifier.
        identifier: i64,
    },

    /// A family template reached the compiler without being expanded.
    #[error("message '{message}' is a repeating template and must be expanded first")]
    UnexpandedFamily {
        /// Message name.
        message: String,
    },
}

impl LayoutError {
    /// Returns the name of the message the error belongs to.
    #[must_use]
    pub fn message_name(&self) -> &str {
        match self {
            Self::BitOverflow { message, .. }
            | Self::FrameTooLarge { message, .. }
            | Self::IdentifierOutOfRange { message, .. }
            | Self::UnexpandedFamily { message } => message,
        }
    }
}
