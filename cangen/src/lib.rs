//! # cangen
//!
//! Compiles declarative CAN message schemas into byte-exact frame layouts,
//! codecs and Rust or C source.
//!
//! Each message maps onto one standard frame: an 11-bit identifier and at
//! most 8 payload bytes. Schemas describe messages as ordered primitive
//! fields and bitfield groups; repeating families expand into one concrete
//! message per member.
//!
//! ## Quick Start
//!
//! ```ignore
//! use cangen::prelude::*;
//!
//! let report = Compiler::builder()
//!     .workers(4)
//!     .build()
//!     .compile_sources([("drive.json", json)]);
//!
//! let set = report.into_result()?;
//! let rust = Generator::new(&set).generate_rust()?;
//! ```
//!
//! ## Crate Organization
//!
//! - [`core`] - Standard identifiers, frames and the message trait
//! - [`schema`] - Schema model, parsing, family expansion and layout
//! - [`codegen`] - Codecs, batch compilation and code generation

pub mod prelude;

/// Frame types and the trait implemented by generated messages.
pub mod core {
    pub use cangen_core::*;
}

/// Schema model, parsing and layout compilation.
pub mod schema {
    pub use cangen_schema::*;
}

/// Codec derivation, batch compilation and code generation.
pub mod codegen {
    pub use cangen_codegen::*;
}

pub use cangen_codegen::{CodecSpec, CompileReport, CompiledSet, Compiler, Generator};
pub use cangen_core::{CanFrame, CanMessage, StandardId};
pub use cangen_schema::{MessageDefinition, SchemaSet, parse_schema};

#[cfg(test)]
mod tests {
    use super::prelude::*;

    const SCHEMA: &str = include_str!("../testdata/drive.json");
    const GENERATED: &str = include_str!("../testdata/drive.rs");

    mod generated {
        include!("../testdata/drive.rs");
    }

    use generated::{Drive, Kill, Message, MessageId, Temp1};

    #[test]
    fn test_generated_code_is_current() {
        let code = cangen_codegen::generate_from_json(SCHEMA).expect("should generate");
        assert_eq!(code, GENERATED);
    }

    #[test]
    fn test_generated_encode_matches_runtime_codec() {
        let set = Compiler::default()
            .compile_sources([("drive.json", SCHEMA)])
            .into_result()
            .expect("should compile");

        let drive = Drive {
            flags_tracker_disable: 1,
            flags_direction: Drive::FLAGS_DIRECTION_REVERSE,
            torque: -1234,
        };
        let record = Record::new()
            .with_bits("flags", "tracker_disable", 1)
            .with_bits("flags", "direction", 2)
            .with("torque", -1234i16);

        let codec = set.codecs.iter().find(|c| c.name == "drive").expect("drive codec");
        assert_eq!(drive.encode(), codec.pack(&record).expect("should pack"));
    }

    #[test]
    fn test_generated_roundtrip_and_dispatch() {
        let temp = Temp1 { celsius: 21.5 };
        let frame = temp.encode();
        assert_eq!(frame.id().as_raw(), 0x050);
        assert_eq!(frame.dlc(), 4);
        assert_eq!(Temp1::decode(&frame).expect("should decode"), temp);

        assert_eq!(
            Message::decode(&frame).expect("should dispatch"),
            Message::Temp1(temp)
        );
        assert_eq!(MessageId::try_from(0x050).expect("known id").name(), "temp__1");
        assert_eq!(u16::from(MessageId::Drive), 0x020);
    }

    #[test]
    fn test_generated_decode_rejects_foreign_frames() {
        let kill = Kill { board_id: 3 }.encode();
        assert!(matches!(
            Drive::decode(&kill),
            Err(CoreError::IdentifierMismatch { expected: 0x020, actual: 0x000 })
        ));

        let unknown = CanFrame::new(StandardId::new(0x123).expect("valid id"), &[]).expect("frame");
        assert_eq!(
            Message::decode(&unknown).unwrap_err(),
            CoreError::UnknownIdentifier(0x123)
        );
    }
}
