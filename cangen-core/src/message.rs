//! The [`CanMessage`] trait implemented by generated message structs.

use crate::error::{Error, Result};
use crate::frame::CanFrame;

/// Trait for typed messages that map onto a single frame.
///
/// Implementations are normally produced by the cangen Rust emitter; the
/// identifier and length constants were validated when the schema was
/// compiled.
///
/// # Example
/// ```ignore
/// let heartbeat = Heartbeat { status: 3, armed: true };
/// let frame = heartbeat.encode();
/// assert_eq!(frame.dlc(), Heartbeat::DLC);
/// let back = Heartbeat::decode(&frame)?;
/// ```
pub trait CanMessage: Sized {
    /// Message name as declared in the schema.
    const NAME: &'static str;

    /// Standard frame identifier of this message.
    const ID: u16;

    /// Payload length (DLC) of this message.
    const DLC: u8;

    /// Packs the message into a frame.
    fn encode(&self) -> CanFrame;

    /// Unpacks a message from a frame.
    ///
    /// # Errors
    /// Returns an error if the frame identifier or length do not match.
    fn decode(frame: &CanFrame) -> Result<Self>;

    /// Checks that a frame carries this message's identifier and length.
    ///
    /// # Errors
    /// Returns [`Error::IdentifierMismatch`] or [`Error::LengthMismatch`].
    fn check_frame(frame: &CanFrame) -> Result<()> {
        if frame.id().as_raw() != Self::ID {
            return Err(Error::IdentifierMismatch {
                expected: Self::ID,
                actual: frame.id().as_raw(),
            });
        }
        if frame.dlc() != Self::DLC {
            return Err(Error::LengthMismatch {
                expected: Self::DLC,
                actual: frame.dlc(),
            });
        }
        Ok(())
    }
}
