//! Identifier enum code generation.

use crate::identifiers::{IdentifierEntry, IdentifierEnum};
use crate::naming::{comment_text, to_pascal_case};

/// Generator for the `MessageId` enum.
pub struct EnumGenerator<'a> {
    identifiers: &'a IdentifierEnum,
}

impl<'a> EnumGenerator<'a> {
    /// Creates a new enum generator.
    #[must_use]
    pub fn new(identifiers: &'a IdentifierEnum) -> Self {
        Self { identifiers }
    }

    /// Generates the identifier enum and its conversions.
    #[must_use]
    pub fn generate(&self) -> String {
        let mut output = String::new();

        output.push_str("/// Frame identifiers of every message in the schema.\n");
        output.push_str("#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]\n");
        output.push_str("#[repr(u16)]\n");
        output.push_str("pub enum MessageId {\n");
        for entry in self.identifiers {
            if !entry.description.is_empty() {
                output.push_str(&format!("    /// {}\n", comment_text(&entry.description)));
            }
            output.push_str(&format!(
                "    {} = {:#05x},\n",
                to_pascal_case(&entry.name),
                entry.identifier
            ));
        }
        output.push_str("}\n\n");

        output.push_str("impl MessageId {\n");
        output.push_str("    /// Every identifier, in schema order.\n");
        output.push_str(&format!(
            "    pub const ALL: [Self; {}] = [\n",
            self.identifiers.len()
        ));
        for entry in self.identifiers {
            output.push_str(&format!("        Self::{},\n", to_pascal_case(&entry.name)));
        }
        output.push_str("    ];\n\n");

        output.push_str("    /// Returns the raw identifier.\n");
        output.push_str("    #[must_use]\n");
        output.push_str("    pub const fn raw(self) -> u16 {\n");
        output.push_str(&self.generate_match("self", |entry| {
            format!("{:#05x}", entry.identifier)
        }));
        output.push_str("    }\n\n");

        output.push_str("    /// Returns the message name as declared in the schema.\n");
        output.push_str("    #[must_use]\n");
        output.push_str("    pub const fn name(self) -> &'static str {\n");
        output.push_str(&self.generate_match("self", |entry| format!("{:?}", entry.name)));
        output.push_str("    }\n");
        output.push_str("}\n\n");

        output.push_str("impl From<MessageId> for u16 {\n");
        output.push_str("    fn from(id: MessageId) -> Self {\n");
        output.push_str("        id.raw()\n");
        output.push_str("    }\n");
        output.push_str("}\n\n");

        output.push_str("impl TryFrom<u16> for MessageId {\n");
        output.push_str("    type Error = cangen_core::Error;\n\n");
        output.push_str("    fn try_from(raw: u16) -> Result<Self, Self::Error> {\n");
        output.push_str("        match raw {\n");
        for entry in self.identifiers {
            output.push_str(&format!(
                "            {:#05x} => Ok(Self::{}),\n",
                entry.identifier,
                to_pascal_case(&entry.name)
            ));
        }
        output.push_str("            _ => Err(cangen_core::Error::UnknownIdentifier(raw)),\n");
        output.push_str("        }\n");
        output.push_str("    }\n");
        output.push_str("}\n\n");

        output
    }

    /// Generates a `match` over every variant.
    fn generate_match(
        &self,
        scrutinee: &str,
        arm: impl Fn(&IdentifierEntry) -> String,
    ) -> String {
        let mut output = format!("        match {scrutinee} {{\n");
        for entry in self.identifiers {
            output.push_str(&format!(
                "            Self::{} => {},\n",
                to_pascal_case(&entry.name),
                arm(entry)
            ));
        }
        output.push_str("        }\n");
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::CodecSpec;
    use cangen_schema::types::ByteOrder;

    fn codec(name: &str, identifier: u16, description: &str) -> CodecSpec {
        CodecSpec {
            name: name.to_string(),
            description: description.to_string(),
            identifier,
            dlc: 0,
            float_order: ByteOrder::LittleEndian,
            fields: Vec::new(),
            slots: Vec::new(),
        }
    }

    #[test]
    fn test_generate_message_id_enum() {
        let codecs = [codec("kill", 0x001, "emergency stop"), codec("sensor__1", 0x030, "")];
        let (identifiers, _) = IdentifierEnum::build(&codecs);
        let code = EnumGenerator::new(&identifiers).generate();

        assert!(code.contains("#[repr(u16)]"));
        assert!(code.contains("    /// emergency stop\n    Kill = 0x001,"));
        assert!(code.contains("    Sensor1 = 0x030,"));
        assert!(code.contains("pub const ALL: [Self; 2]"));
        assert!(code.contains("Self::Sensor1 => \"sensor__1\","));
        assert!(code.contains("0x030 => Ok(Self::Sensor1),"));
        assert!(code.contains("Err(cangen_core::Error::UnknownIdentifier(raw))"));
    }
}
