//! Error types for cangen core frame operations.

use thiserror::Error;

/// Core error type for frame construction and decoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Identifier does not fit the 11-bit standard identifier space.
    #[error("identifier {id:#x} exceeds the standard identifier space (max {max:#x})")]
    InvalidIdentifier {
        /// Offending identifier.
        id: u32,
        /// Largest valid standard identifier.
        max: u16,
    },

    /// Payload is longer than a frame can carry.
    #[error("payload of {length} bytes exceeds the frame limit of {max} bytes")]
    PayloadTooLong {
        /// Payload length in bytes.
        length: usize,
        /// Maximum payload length.
        max: usize,
    },

    /// Frame identifier does not match the message being decoded.
    #[error("identifier mismatch: expected {expected:#x}, actual {actual:#x}")]
    IdentifierMismatch {
        /// Expected identifier.
        expected: u16,
        /// Identifier found on the frame.
        actual: u16,
    },

    /// Frame DLC does not match the message being decoded.
    #[error("length mismatch: expected {expected} bytes, actual {actual} bytes")]
    LengthMismatch {
        /// Expected DLC.
        expected: u8,
        /// DLC found on the frame.
        actual: u8,
    },

    /// No message of the schema uses this identifier.
    #[error("unknown message identifier {0:#x}")]
    UnknownIdentifier(u16),
}

/// Result type alias for cangen core operations.
pub type Result<T> = std::result::Result<T, Error>;
