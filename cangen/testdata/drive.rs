// Generated by cangen. Do not edit.

use cangen_core::{CanFrame, CanMessage};

/// Frame identifiers of every message in the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum MessageId {
    /// emergency stop
    Kill = 0x000,
    /// motor command
    Drive = 0x020,
    Temp0 = 0x040,
    Temp1 = 0x050,
}

impl MessageId {
    /// Every identifier, in schema order.
    pub const ALL: [Self; 4] = [
        Self::Kill,
        Self::Drive,
        Self::Temp0,
        Self::Temp1,
    ];

    /// Returns the raw identifier.
    #[must_use]
    pub const fn raw(self) -> u16 {
        match self {
            Self::Kill => 0x000,
            Self::Drive => 0x020,
            Self::Temp0 => 0x040,
            Self::Temp1 => 0x050,
        }
    }

    /// Returns the message name as declared in the schema.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Kill => "kill",
            Self::Drive => "drive",
            Self::Temp0 => "temp__0",
            Self::Temp1 => "temp__1",
        }
    }
}

impl From<MessageId> for u16 {
    fn from(id: MessageId) -> Self {
        id.raw()
    }
}

impl TryFrom<u16> for MessageId {
    type Error = cangen_core::Error;

    fn try_from(raw: u16) -> Result<Self, Self::Error> {
        match raw {
            0x000 => Ok(Self::Kill),
            0x020 => Ok(Self::Drive),
            0x040 => Ok(Self::Temp0),
            0x050 => Ok(Self::Temp1),
            _ => Err(cangen_core::Error::UnknownIdentifier(raw)),
        }
    }
}

/// emergency stop
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Kill {
    pub board_id: u8,
}

impl CanMessage for Kill {
    const NAME: &'static str = "kill";
    const ID: u16 = 0x000;
    const DLC: u8 = 1;

    fn encode(&self) -> CanFrame {
        let mut data = [0u8; 8];
        data[0] = self.board_id;
        CanFrame::from_parts(Self::ID, Self::DLC, data)
    }

    fn decode(frame: &CanFrame) -> cangen_core::Result<Self> {
        Self::check_frame(frame)?;
        let data = frame.raw_data();
        Ok(Self {
            board_id: data[0],
        })
    }
}

/// motor command
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Drive {
    /// `flags.tracker_disable`, 1 bit(s).
    pub flags_tracker_disable: u8,
    /// `flags.direction`, 2 bit(s) (1 = forward, 2 = reverse).
    pub flags_direction: u8,
    pub torque: i16,
}

impl Drive {
    /// `flags.direction` = forward.
    pub const FLAGS_DIRECTION_FORWARD: u8 = 1;
    /// `flags.direction` = reverse.
    pub const FLAGS_DIRECTION_REVERSE: u8 = 2;
}

impl CanMessage for Drive {
    const NAME: &'static str = "drive";
    const ID: u16 = 0x020;
    const DLC: u8 = 3;

    fn encode(&self) -> CanFrame {
        let mut data = [0u8; 8];
        data[0] = (self.flags_tracker_disable & 0x01) | ((self.flags_direction & 0x03) << 1);
        data[1] = (self.torque as u16) as u8;
        data[2] = ((self.torque as u16) >> 8) as u8;
        CanFrame::from_parts(Self::ID, Self::DLC, data)
    }

    fn decode(frame: &CanFrame) -> cangen_core::Result<Self> {
        Self::check_frame(frame)?;
        let data = frame.raw_data();
        Ok(Self {
            flags_tracker_disable: data[0] & 0x01,
            flags_direction: (data[0] >> 1) & 0x03,
            torque: i16::from_le_bytes([data[1], data[2]]),
        })
    }
}

/// temp__0 message.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Temp0 {
    pub celsius: f32,
}

impl CanMessage for Temp0 {
    const NAME: &'static str = "temp__0";
    const ID: u16 = 0x040;
    const DLC: u8 = 4;

    fn encode(&self) -> CanFrame {
        let mut data = [0u8; 8];
        data[0] = self.celsius.to_bits() as u8;
        data[1] = (self.celsius.to_bits() >> 8) as u8;
        data[2] = (self.celsius.to_bits() >> 16) as u8;
        data[3] = (self.celsius.to_bits() >> 24) as u8;
        CanFrame::from_parts(Self::ID, Self::DLC, data)
    }

    fn decode(frame: &CanFrame) -> cangen_core::Result<Self> {
        Self::check_frame(frame)?;
        let data = frame.raw_data();
        Ok(Self {
            celsius: f32::from_le_bytes([data[0], data[1], data[2], data[3]]),
        })
    }
}

/// temp__1 message.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Temp1 {
    pub celsius: f32,
}

impl CanMessage for Temp1 {
    const NAME: &'static str = "temp__1";
    const ID: u16 = 0x050;
    const DLC: u8 = 4;

    fn encode(&self) -> CanFrame {
        let mut data = [0u8; 8];
        data[0] = self.celsius.to_bits() as u8;
        data[1] = (self.celsius.to_bits() >> 8) as u8;
        data[2] = (self.celsius.to_bits() >> 16) as u8;
        data[3] = (self.celsius.to_bits() >> 24) as u8;
        CanFrame::from_parts(Self::ID, Self::DLC, data)
    }

    fn decode(frame: &CanFrame) -> cangen_core::Result<Self> {
        Self::check_frame(frame)?;
        let data = frame.raw_data();
        Ok(Self {
            celsius: f32::from_le_bytes([data[0], data[1], data[2], data[3]]),
        })
    }
}

/// Any message of the schema.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Message {
    Kill(Kill),
    Drive(Drive),
    Temp0(Temp0),
    Temp1(Temp1),
}

impl Message {
    /// Decodes a frame into whichever message owns its identifier.
    ///
    /// # Errors
    /// Returns an error for unknown identifiers or mismatched lengths.
    pub fn decode(frame: &CanFrame) -> cangen_core::Result<Self> {
        match MessageId::try_from(frame.id().as_raw())? {
            MessageId::Kill => Kill::decode(frame).map(Self::Kill),
            MessageId::Drive => Drive::decode(frame).map(Self::Drive),
            MessageId::Temp0 => Temp0::decode(frame).map(Self::Temp0),
            MessageId::Temp1 => Temp1::decode(frame).map(Self::Temp1),
        }
    }

    /// Encodes the wrapped message.
    #[must_use]
    pub fn encode(&self) -> CanFrame {
        match self {
            Self::Kill(m) => m.encode(),
            Self::Drive(m) => m.encode(),
            Self::Temp0(m) => m.encode(),
            Self::Temp1(m) => m.encode(),
        }
    }
}

