//! # cangen Codegen
//!
//! Codec derivation, batch compilation and code generation from message
//! schemas.
//!
//! This crate provides:
//! - Codec derivation from compiled layouts, with runtime pack/unpack
//! - A parallel batch compiler that collects every error in a batch
//! - The identifier enumeration of a compiled batch
//! - Rust and C code generation

pub mod c;
pub mod codec;
pub mod compiler;
pub mod error;
pub mod generator;
pub mod identifiers;
pub mod naming;
pub mod record;
pub mod rust;

pub use c::CEmitter;
pub use codec::{BitTerm, CodecSpec, PackStep};
pub use compiler::{CompileReport, CompiledSet, Compiler, CompilerBuilder};
pub use error::{CodegenError, CompileError, PackError};
pub use generator::{Generator, Target};
pub use identifiers::{IdentifierEntry, IdentifierEnum};
pub use record::{Record, Value};
pub use rust::RustEmitter;

use std::path::Path;

/// Compiles one JSON schema document with default settings.
///
/// # Errors
/// Returns [`CodegenError::Compile`] with every error of the document.
pub fn compile_json(json: &str) -> Result<CompiledSet, CodegenError> {
    Compiler::default()
        .compile_sources([("<input>", json)])
        .try_into()
}

/// Generates Rust code from a JSON schema string.
///
/// # Arguments
/// * `json` - Schema document content
///
/// # Returns
/// Generated Rust code as a string.
///
/// # Errors
/// Returns `CodegenError` if compilation or generation fails.
pub fn generate_from_json(json: &str) -> Result<String, CodegenError> {
    let set = compile_json(json)?;
    Generator::new(&set).generate_rust()
}

/// Generates Rust code from a JSON schema file.
///
/// # Arguments
/// * `path` - Path to the schema document
///
/// # Returns
/// Generated Rust code as a string.
///
/// # Errors
/// Returns `CodegenError` if reading, compilation, or generation fails.
pub fn generate_from_file(path: &Path) -> Result<String, CodegenError> {
    let json = std::fs::read_to_string(path)?;
    generate_from_json(&json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SCHEMA: &str = r#"{
        "packets": [
            { "name": "kill", "id": 0, "description": "emergency stop",
              "data": [ { "type": "uint8_t", "name": "board_id" } ] },
            { "name": "temp", "id": 64, "repeat": 4, "offset": 2,
              "data": [ { "type": "float", "name": "celsius" } ] }
        ]
    }"#;

    #[test]
    fn test_generate_from_json() {
        let code = generate_from_json(SCHEMA).expect("should generate");
        assert!(code.contains("Kill = 0x000,"));
        assert!(code.contains("Temp3 = 0x046,"));
        assert!(code.contains("pub struct Temp2 {"));
    }

    #[test]
    fn test_generate_from_json_reports_errors() {
        let json = r#"{ "packets": [
            { "name": "wide", "id": 1, "data": [
                { "type": "bitfield", "name": "g",
                  "bits": [ { "name": "a", "bitnum": 5 }, { "name": "b", "bitnum": 4 } ] }
            ] }
        ] }"#;

        let err = generate_from_json(json).unwrap_err();
        assert!(matches!(err, CodegenError::Compile(ref errors) if errors.len() == 1));
    }

    #[test]
    fn test_generate_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(SCHEMA.as_bytes()).expect("write schema");

        let code = generate_from_file(file.path()).expect("should generate");
        assert!(code.contains("impl CanMessage for Kill {"));
    }

    #[test]
    fn test_generate_from_missing_file() {
        let err = generate_from_file(Path::new("/nonexistent/schema.json")).unwrap_err();
        assert!(matches!(err, CodegenError::Io(_)));
    }
}
