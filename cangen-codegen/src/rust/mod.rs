//! Rust code generation modules.

pub mod enums;
pub mod messages;

pub use enums::EnumGenerator;
pub use messages::MessageGenerator;

use crate::compiler::CompiledSet;
use crate::error::CodegenError;
use crate::naming::to_pascal_case;

/// Emits a Rust module from a compiled message set.
///
/// The generated code depends only on `cangen-core`.
pub struct RustEmitter<'a> {
    set: &'a CompiledSet,
}

impl<'a> RustEmitter<'a> {
    /// Creates a new Rust emitter.
    #[must_use]
    pub fn new(set: &'a CompiledSet) -> Self {
        Self { set }
    }

    /// Emits the complete module source.
    ///
    /// # Errors
    /// Returns [`CodegenError::Generation`] if names do not map to Rust
    /// identifiers.
    pub fn emit(&self) -> Result<String, CodegenError> {
        let mut output = String::new();

        output.push_str("// Generated by cangen. Do not edit.\n\n");

        if self.set.codecs.is_empty() {
            return Ok(output);
        }

        output.push_str("use cangen_core::{CanFrame, CanMessage};\n\n");
        output.push_str(&EnumGenerator::new(&self.set.identifiers).generate());
        output.push_str(&MessageGenerator::new(&self.set.codecs).generate()?);
        output.push_str(&self.generate_dispatch());

        Ok(output)
    }

    /// Generates the `Message` sum type and frame dispatch.
    fn generate_dispatch(&self) -> String {
        let mut output = String::new();
        let variants: Vec<_> = self
            .set
            .identifiers
            .iter()
            .map(|entry| to_pascal_case(&entry.name))
            .collect();

        output.push_str("/// Any message of the schema.\n");
        output.push_str("#[derive(Debug, Clone, Copy, PartialEq)]\n");
        output.push_str("pub enum Message {\n");
        for variant in &variants {
            output.push_str(&format!("    {variant}({variant}),\n"));
        }
        output.push_str("}\n\n");

        output.push_str("impl Message {\n");
        output.push_str("    /// Decodes a frame into whichever message owns its identifier.\n");
        output.push_str("    ///\n");
        output.push_str("    /// # Errors\n");
        output.push_str(
            "    /// Returns an error for unknown identifiers or mismatched lengths.\n",
        );
        output.push_str("    pub fn decode(frame: &CanFrame) -> cangen_core::Result<Self> {\n");
        output.push_str("        match MessageId::try_from(frame.id().as_raw())? {\n");
        for variant in &variants {
            output.push_str(&format!(
                "            MessageId::{variant} => {variant}::decode(frame).map(Self::{variant}),\n"
            ));
        }
        output.push_str("        }\n");
        output.push_str("    }\n\n");

        output.push_str("    /// Encodes the wrapped message.\n");
        output.push_str("    #[must_use]\n");
        output.push_str("    pub fn encode(&self) -> CanFrame {\n");
        output.push_str("        match self {\n");
        for variant in &variants {
            output.push_str(&format!("            Self::{variant}(m) => m.encode(),\n"));
        }
        output.push_str("        }\n");
        output.push_str("    }\n");
        output.push_str("}\n\n");

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::Compiler;
    use cangen_schema::messages::{Field, MessageDefinition, Repeat, Subfield};
    use cangen_schema::types::PrimitiveType;

    fn compiled() -> CompiledSet {
        Compiler::builder()
            .workers(1)
            .build()
            .compile(vec![
                MessageDefinition::new("heartbeat", 0x10)
                    .with_field(Field::primitive("status", PrimitiveType::U8))
                    .with_field(Field::bitfield(
                        "flags",
                        vec![Subfield::flag("armed"), Subfield::new("mode", 3)],
                    )),
                MessageDefinition::new("sensor", 0x20)
                    .with_field(Field::primitive("reading", PrimitiveType::I16))
                    .with_repeat(Repeat::new(2).with_offset(0x10)),
            ])
            .into_result()
            .expect("should compile")
    }

    #[test]
    fn test_emit_module() {
        let set = compiled();
        let code = RustEmitter::new(&set).emit().unwrap();

        assert!(code.starts_with("// Generated by cangen. Do not edit.\n"));
        assert!(code.contains("use cangen_core::{CanFrame, CanMessage};"));
        assert!(code.contains("pub enum MessageId {"));
        assert!(code.contains("pub struct Heartbeat {"));
        assert!(code.contains("pub struct Sensor0 {"));
        assert!(code.contains("impl CanMessage for Sensor1 {"));
        assert!(code.contains("const ID: u16 = 0x030;"));
    }

    #[test]
    fn test_emit_dispatch() {
        let set = compiled();
        let code = RustEmitter::new(&set).emit().unwrap();

        assert!(code.contains("pub enum Message {"));
        assert!(code.contains("    Heartbeat(Heartbeat),"));
        assert!(code.contains(
            "MessageId::Sensor1 => Sensor1::decode(frame).map(Self::Sensor1),"
        ));
        assert!(code.contains("Self::Sensor0(m) => m.encode(),"));
    }

    #[test]
    fn test_emit_empty_set() {
        let set = CompiledSet::default();
        let code = RustEmitter::new(&set).emit().unwrap();
        assert_eq!(code, "// Generated by cangen. Do not edit.\n\n");
    }

    #[test]
    fn test_emit_rejects_names_the_module_declares() {
        let set = Compiler::builder()
            .workers(1)
            .build()
            .compile(vec![
                MessageDefinition::new("message", 0x10)
                    .with_field(Field::primitive("status", PrimitiveType::U8)),
            ])
            .into_result()
            .expect("should compile");
        let err = RustEmitter::new(&set).emit().unwrap_err();
        assert!(err.to_string().contains("'message'"));

        let set = Compiler::builder()
            .workers(1)
            .build()
            .compile(vec![
                MessageDefinition::new("telemetry", 0x11)
                    .with_field(Field::primitive("self", PrimitiveType::U8)),
            ])
            .into_result()
            .expect("should compile");
        let err = RustEmitter::new(&set).emit().unwrap_err();
        assert!(matches!(err, CodegenError::Generation { .. }));
    }
}
