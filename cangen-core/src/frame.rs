//! Standard-identifier frames with up to eight payload bytes.
//!
//! This module provides:
//! - [`StandardId`], an identifier checked against the 11-bit space
//! - [`CanFrame`], an identifier plus a DLC-sized payload

use crate::error::{Error, Result};
use std::fmt;

/// Maximum payload length of a frame in bytes.
pub const MAX_DLC: usize = 8;

/// Largest identifier in the standard (non-extended) identifier space.
pub const MAX_STANDARD_ID: u16 = 0x7FF;

/// An 11-bit standard frame identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StandardId(u16);

impl StandardId {
    /// The lowest identifier, which wins arbitration.
    pub const ZERO: Self = Self(0);

    /// The highest standard identifier.
    pub const MAX: Self = Self(MAX_STANDARD_ID);

    /// Creates an identifier, returning `None` if it exceeds `0x7FF`.
    #[must_use]
    pub const fn new(raw: u16) -> Option<Self> {
        if raw <= MAX_STANDARD_ID {
            Some(Self(raw))
        } else {
            None
        }
    }

    /// Returns the raw identifier value.
    #[must_use]
    pub const fn as_raw(&self) -> u16 {
        self.0
    }
}

impl TryFrom<u32> for StandardId {
    type Error = Error;

    fn try_from(raw: u32) -> Result<Self> {
        u16::try_from(raw)
            .ok()
            .and_then(Self::new)
            .ok_or(Error::InvalidIdentifier {
                id: raw,
                max: MAX_STANDARD_ID,
            })
    }
}

impl From<StandardId> for u16 {
    fn from(id: StandardId) -> Self {
        id.0
    }
}

impl fmt::Display for StandardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#05x}", self.0)
    }
}

/// A data frame: identifier, declared length and payload.
///
/// Bytes past the DLC are always zero, so two frames carrying the same
/// payload compare equal regardless of how they were built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CanFrame {
    id: StandardId,
    dlc: u8,
    data: [u8; MAX_DLC],
}

impl CanFrame {
    /// Creates a frame from an identifier and a payload slice.
    ///
    /// # Errors
    /// Returns [`Error::PayloadTooLong`] if `payload` exceeds eight bytes.
    pub fn new(id: StandardId, payload: &[u8]) -> Result<Self> {
        if payload.len() > MAX_DLC {
            return Err(Error::PayloadTooLong {
                length: payload.len(),
                max: MAX_DLC,
            });
        }

        let mut data = [0u8; MAX_DLC];
        data[..payload.len()].copy_from_slice(payload);

        Ok(Self {
            id,
            dlc: payload.len() as u8,
            data,
        })
    }

    /// Creates a frame from raw parts produced by generated code.
    ///
    /// Generated messages carry identifiers and lengths that were checked at
    /// compile time; this constructor only masks them back into range.
    #[must_use]
    pub const fn from_parts(id: u16, dlc: u8, data: [u8; MAX_DLC]) -> Self {
        let dlc = if dlc as usize > MAX_DLC {
            MAX_DLC as u8
        } else {
            dlc
        };

        let mut data = data;
        let mut i = dlc as usize;
        while i < MAX_DLC {
            data[i] = 0;
            i += 1;
        }

        Self {
            id: StandardId(id & MAX_STANDARD_ID),
            dlc,
            data,
        }
    }

    /// Returns the frame identifier.
    #[must_use]
    pub const fn id(&self) -> StandardId {
        self.id
    }

    /// Returns the declared payload length.
    #[must_use]
    pub const fn dlc(&self) -> u8 {
        self.dlc
    }

    /// Returns the payload bytes (exactly `dlc` of them).
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data[..self.dlc as usize]
    }

    /// Returns the full eight-byte payload buffer.
    #[must_use]
    pub const fn raw_data(&self) -> &[u8; MAX_DLC] {
        &self.data
    }
}

impl fmt::Display for CanFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.id, self.dlc)?;
        for byte in self.data() {
            write!(f, " {byte:02X}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_id_bounds() {
        assert_eq!(StandardId::new(0x7FF), Some(StandardId::MAX));
        assert!(StandardId::new(0x800).is_none());
        assert_eq!(StandardId::new(0).map(|id| id.as_raw()), Some(0));
    }

    #[test]
    fn test_standard_id_try_from_u32() {
        assert!(StandardId::try_from(0x10u32).is_ok());
        let err = StandardId::try_from(0x1_0000u32).unwrap_err();
        assert_eq!(
            err,
            Error::InvalidIdentifier {
                id: 0x1_0000,
                max: MAX_STANDARD_ID
            }
        );
    }

    #[test]
    fn test_frame_new() {
        let id = StandardId::new(0x10).unwrap();
        let frame = CanFrame::new(id, &[0xAB, 0xCD]).unwrap();

        assert_eq!(frame.id(), id);
        assert_eq!(frame.dlc(), 2);
        assert_eq!(frame.data(), &[0xAB, 0xCD]);
        assert_eq!(frame.raw_data(), &[0xAB, 0xCD, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_frame_payload_too_long() {
        let err = CanFrame::new(StandardId::ZERO, &[0u8; 9]).unwrap_err();
        assert_eq!(err, Error::PayloadTooLong { length: 9, max: 8 });
    }

    #[test]
    fn test_frame_from_parts_clears_tail() {
        let frame = CanFrame::from_parts(0x20, 2, [1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(frame.data(), &[1, 2]);
        assert_eq!(frame, CanFrame::new(StandardId::new(0x20).unwrap(), &[1, 2]).unwrap());
    }

    #[test]
    fn test_frame_display() {
        let frame = CanFrame::new(StandardId::new(0x10).unwrap(), &[0x0F, 0xA0]).unwrap();
        assert_eq!(frame.to_string(), "0x010 [2] 0F A0");
    }
}
