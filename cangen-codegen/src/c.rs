//! C header generation.
//!
//! The header carries the identifier enum and, per message, a packed record
//! typedef with its `CAN_LENGTH_*` and `CAN_INIT_*` defines. A `CANPacket`
//! struct overlays every record on the raw payload. Each message also gets a
//! `static inline` sender that fills a `can_frame_t` byte by byte, exactly as
//! the codec's pack steps describe.
//!
//! Record bitfields rely on the compiler allocating bits LSB-first, as GCC
//! and Clang do on little-endian targets. The senders do not.

use crate::codec::{CodecSpec, PackStep};
use crate::compiler::CompiledSet;
use crate::error::CodegenError;
use crate::naming::{comment_text, is_identifier, subfield_name, to_upper_snake};
use cangen_schema::messages::Field;
use cangen_schema::types::PrimitiveType;
use std::collections::HashSet;

/// Prefix of identifier enum members.
pub const PACKET_ENUM_PREFIX: &str = "CAN_PACKET_";

/// Name of the identifier enum type.
pub const PACKET_ENUM_NAME: &str = "CANPacketId";

/// Prefix of sender functions.
pub const SEND_PREFIX: &str = "orbit_";

/// Prefix of per-message record typedefs.
pub const RECORD_PREFIX: &str = "can_packet_";

/// Name of the struct overlaying every record on the payload.
pub const PACKET_UNION_NAME: &str = "CANPacket";

/// Keywords plus every name the header itself declares or calls.
const C_RESERVED: &[&str] = &[
    "auto", "break", "case", "char", "const", "continue", "default", "do", "double", "else",
    "enum", "extern", "float", "for", "goto", "if", "inline", "int", "long", "register",
    "restrict", "return", "short", "signed", "sizeof", "static", "struct", "switch", "typedef",
    "union", "unsigned", "void", "volatile", "while", "bool", "true", "false", "frame", "memset",
    "uint8_t", "int8_t", "uint16_t", "int16_t", "uint32_t", "int32_t", "can_frame_t",
    "can_float_union_t", "CANPacket", "CANPacketId",
];

/// Macro prefixes the header defines; a name using one would be expanded.
const C_RESERVED_PREFIXES: &[&str] = &["CAN_PACKET_", "CAN_LENGTH_", "CAN_INIT_"];

/// Returns true if `name` can be declared in the generated header.
fn is_c_name(name: &str) -> bool {
    is_identifier(name)
        && !C_RESERVED.contains(&name)
        && !C_RESERVED_PREFIXES.iter().any(|p| name.starts_with(p))
}

/// Emits a C header from a compiled message set.
pub struct CEmitter<'a> {
    set: &'a CompiledSet,
    guard: String,
}

impl<'a> CEmitter<'a> {
    /// Creates a new C emitter with the default include guard.
    #[must_use]
    pub fn new(set: &'a CompiledSet) -> Self {
        Self {
            set,
            guard: "CANGEN_MESSAGES_H".to_string(),
        }
    }

    /// Sets the include guard macro.
    #[must_use]
    pub fn with_guard(mut self, guard: impl Into<String>) -> Self {
        self.guard = guard.into();
        self
    }

    /// Emits the complete header.
    ///
    /// # Errors
    /// Returns [`CodegenError::Generation`] if a message or field name is
    /// not a valid, unique C identifier.
    pub fn emit(&self) -> Result<String, CodegenError> {
        self.check_names()?;

        let mut output = String::new();
        output.push_str("/// @file\n");
        output.push_str("/// Generated by cangen. Do not edit.\n\n");
        output.push_str(&format!("#ifndef {}\n", self.guard));
        output.push_str(&format!("#define {}\n\n", self.guard));
        output.push_str("#include <stdbool.h>\n");
        output.push_str("#include <stdint.h>\n");
        output.push_str("#include <string.h>\n\n");

        output.push_str("/// @brief a standard frame ready for transmission\n");
        output.push_str("typedef struct {\n");
        output.push_str("    uint16_t id;\n");
        output.push_str("    uint8_t dlc;\n");
        output.push_str("    uint8_t data[8];\n");
        output.push_str("} can_frame_t;\n\n");

        output.push_str("typedef union {\n");
        output.push_str("    uint8_t b[4];\n");
        output.push_str("    uint32_t i;\n");
        output.push_str("    float f;\n");
        output.push_str("} can_float_union_t;\n\n");

        output.push_str(&self.generate_enum());

        for codec in &self.set.codecs {
            output.push_str(&self.generate_record(codec));
        }
        output.push_str(&self.generate_packet());

        for codec in &self.set.codecs {
            output.push_str(&self.generate_sender(codec));
        }

        output.push_str(&format!("#endif // {}\n", self.guard));
        Ok(output)
    }

    /// Rejects names that would not compile or would collide in C.
    fn check_names(&self) -> Result<(), CodegenError> {
        let mut symbols = HashSet::new();

        for codec in &self.set.codecs {
            if !is_c_name(&codec.name) || !symbols.insert(to_upper_snake(&codec.name)) {
                return Err(CodegenError::generation(format!(
                    "message '{}' does not map to a unique C identifier",
                    codec.name
                )));
            }

            for field in &codec.fields {
                let members: Vec<&str> = match field {
                    Field::Primitive(_) => Vec::new(),
                    Field::Bitfield(group) => std::iter::once(group.name.as_str())
                        .chain(group.subfields.iter().map(|sub| sub.name.as_str()))
                        .collect(),
                };
                if let Some(member) = members.into_iter().find(|m| !is_c_name(m)) {
                    return Err(CodegenError::generation(format!(
                        "member '{member}' of message '{}' is not a valid C identifier",
                        codec.name
                    )));
                }
            }

            let mut params = HashSet::new();
            for param in parameters(codec) {
                if !is_c_name(&param.0) || !params.insert(param.0.clone()) {
                    return Err(CodegenError::generation(format!(
                        "field '{}' of message '{}' does not map to a unique C parameter",
                        param.0, codec.name
                    )));
                }
            }
        }

        Ok(())
    }

    /// Generates the identifier enum.
    fn generate_enum(&self) -> String {
        let mut output = String::new();

        output.push_str("/// @brief enumeration for CAN packet IDs\n");
        output.push_str("typedef enum {\n");
        for entry in &self.set.identifiers {
            if !entry.description.is_empty() {
                output.push_str(&format!("    /// {}\n", comment_text(&entry.description)));
            }
            output.push_str(&format!(
                "    {PACKET_ENUM_PREFIX}{} = {:#05x},\n",
                entry.symbol, entry.identifier
            ));
        }
        output.push_str(&format!("}} {PACKET_ENUM_NAME};\n\n"));

        output
    }

    /// Generates a message's record typedef and its length and init defines.
    ///
    /// Messages without payload get only the defines; ISO C has no empty
    /// structs.
    fn generate_record(&self, codec: &CodecSpec) -> String {
        let mut output = String::new();
        let symbol = to_upper_snake(&codec.name);

        if !codec.fields.is_empty() {
            if !codec.description.is_empty() {
                output.push_str(&format!("/// @brief {}\n", comment_text(&codec.description)));
            }
            output.push_str(&format!(
                "typedef struct __attribute__((packed)) {RECORD_PREFIX}{}_struct {{\n",
                codec.name
            ));
            for field in &codec.fields {
                match field {
                    Field::Primitive(p) => {
                        output.push_str(&format!("    {} {};\n", p.ty.c_type(), p.name));
                    }
                    Field::Bitfield(group) => {
                        output.push_str("    struct {\n");
                        for sub in &group.subfields {
                            for (value, label) in &sub.value_labels {
                                output.push_str(&format!(
                                    "        /// {value:#x}: {}\n",
                                    comment_text(label)
                                ));
                            }
                            output.push_str(&format!(
                                "        uint8_t {} : {};\n",
                                sub.name, sub.bit_width
                            ));
                        }
                        output.push_str(&format!("    }} {};\n", group.name));
                    }
                }
            }
            output.push_str(&format!("}} {RECORD_PREFIX}{};\n\n", codec.name));
        }

        output.push_str(&format!(
            "/// the length of the {} packet\n#define CAN_LENGTH_{symbol} {}\n\n",
            codec.name, codec.dlc
        ));
        output.push_str(&format!(
            "/// initial values for the {} packet\n\
             #define CAN_INIT_{symbol} {{.id = {PACKET_ENUM_PREFIX}{symbol}, .length = CAN_LENGTH_{symbol}}}\n\n",
            codec.name
        ));

        output
    }

    /// Generates the `CANPacket` struct overlaying every record on the payload.
    fn generate_packet(&self) -> String {
        let mut output = String::new();

        output.push_str("/// @brief a CAN packet with typed access to its payload\n");
        output.push_str(&format!("typedef struct {PACKET_UNION_NAME}_struct {{\n"));
        output.push_str("    /// @brief number of bytes in the data of this packet\n");
        output.push_str("    uint8_t length;\n");
        output.push_str("    bool rtr;\n");
        output.push_str("    /// @brief the id for this packet\n");
        output.push_str(&format!("    {PACKET_ENUM_NAME} id;\n"));
        output.push_str("    union {\n");
        output.push_str("        /// @brief the data without any structure\n");
        output.push_str("        uint8_t data[8];\n");
        for codec in self.set.codecs.iter().filter(|c| !c.fields.is_empty()) {
            output.push_str(&format!("        {RECORD_PREFIX}{0} {0};\n", codec.name));
        }
        output.push_str("    };\n");
        output.push_str(&format!("}} {PACKET_UNION_NAME};\n\n"));

        output
    }

    /// Generates one sender function.
    fn generate_sender(&self, codec: &CodecSpec) -> String {
        let mut output = String::new();
        let symbol = to_upper_snake(&codec.name);

        let mut args = vec!["can_frame_t *frame".to_string()];
        args.extend(
            parameters(codec)
                .into_iter()
                .map(|(name, c_type)| format!("{c_type} {name}")),
        );

        if !codec.description.is_empty() {
            output.push_str(&format!("/// @brief {}\n", comment_text(&codec.description)));
        }
        output.push_str(&format!(
            "static inline void {SEND_PREFIX}{}({}) {{\n",
            codec.name,
            args.join(", ")
        ));
        output.push_str("    memset(frame, 0, sizeof(*frame));\n");
        output.push_str(&format!("    frame->id = {PACKET_ENUM_PREFIX}{symbol};\n"));
        output.push_str(&format!("    frame->dlc = CAN_LENGTH_{symbol};\n"));
        for (index, step) in codec.pack_steps().iter().enumerate() {
            output.push_str(&format!("    frame->data[{index}] = {};\n", c_byte_expr(step)));
        }
        output.push_str("}\n\n");

        output
    }
}

/// Sender parameters of a message: `(name, C type)` in declaration order.
fn parameters(codec: &CodecSpec) -> Vec<(String, &'static str)> {
    let mut params = Vec::new();
    for field in &codec.fields {
        match field {
            Field::Primitive(p) => params.push((p.name.clone(), p.ty.c_type())),
            Field::Bitfield(group) => params.extend(
                group
                    .subfields
                    .iter()
                    .map(|sub| (subfield_name(&group.name, &sub.name), "uint8_t")),
            ),
        }
    }
    params
}

/// Renders the C expression that produces one payload byte.
fn c_byte_expr(step: &PackStep) -> String {
    match step {
        PackStep::TakeByte { field, ty, shift } => {
            let value = match ty {
                PrimitiveType::I16 => format!("(uint16_t){field}"),
                PrimitiveType::I32 => format!("(uint32_t){field}"),
                _ => field.clone(),
            };
            if *shift == 0 {
                format!("(uint8_t){value}")
            } else {
                format!("(uint8_t)({value} >> {shift})")
            }
        }
        PackStep::TakeFloatByte { field, shift } => {
            let bits = format!("((can_float_union_t){{.f = {field}}}).i");
            if *shift == 0 {
                format!("(uint8_t){bits}")
            } else {
                format!("(uint8_t)({bits} >> {shift})")
            }
        }
        PackStep::OrBits { group, terms } => {
            let terms: Vec<_> = terms
                .iter()
                .map(|term| {
                    let name = subfield_name(group, &term.subfield);
                    format!("(({name} & {:#04x}) << {})", term.mask, term.shift)
                })
                .collect();
            format!("(uint8_t)({})", terms.join(" | "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::Compiler;
    use cangen_schema::messages::{MessageDefinition, Subfield};
    use cangen_schema::types::ByteOrder;

    fn compiled(defs: Vec<MessageDefinition>, order: ByteOrder) -> CompiledSet {
        Compiler::builder()
            .workers(1)
            .float_order(order)
            .build()
            .compile(defs)
            .into_result()
            .expect("should compile")
    }

    fn drive() -> MessageDefinition {
        MessageDefinition::new("drive", 0x20)
            .with_description("motor command")
            .with_field(Field::bitfield(
                "flags",
                vec![Subfield::flag("tracker_disable"), Subfield::new("direction", 2)],
            ))
            .with_field(Field::primitive("accelerator", PrimitiveType::U8))
            .with_field(Field::primitive("speed", PrimitiveType::I16))
    }

    #[test]
    fn test_emit_header_skeleton() {
        let set = compiled(vec![drive()], ByteOrder::LittleEndian);
        let header = CEmitter::new(&set).with_guard("DRIVE_H").emit().unwrap();

        assert!(header.contains("#ifndef DRIVE_H\n#define DRIVE_H\n"));
        assert!(header.contains("    /// motor command\n    CAN_PACKET_DRIVE = 0x020,\n"));
        assert!(header.contains("} CANPacketId;"));
        assert!(header.contains("#define CAN_LENGTH_DRIVE 4\n"));
        assert!(header.ends_with("#endif // DRIVE_H\n"));
    }

    #[test]
    fn test_emit_sender() {
        let set = compiled(vec![drive()], ByteOrder::LittleEndian);
        let header = CEmitter::new(&set).emit().unwrap();

        assert!(header.contains(
            "static inline void orbit_drive(can_frame_t *frame, uint8_t flags_tracker_disable, \
             uint8_t flags_direction, uint8_t accelerator, int16_t speed) {"
        ));
        assert!(header.contains(
            "frame->data[0] = (uint8_t)(((flags_tracker_disable & 0x01) << 0) | \
             ((flags_direction & 0x03) << 1));"
        ));
        assert!(header.contains("frame->data[1] = (uint8_t)accelerator;"));
        assert!(header.contains("frame->data[2] = (uint8_t)(uint16_t)speed;"));
        assert!(header.contains("frame->data[3] = (uint8_t)((uint16_t)speed >> 8);"));
    }

    #[test]
    fn test_emit_float_bytes() {
        let def = MessageDefinition::new("gauge", 0x41)
            .with_field(Field::primitive("level", PrimitiveType::Float32));

        let le = CEmitter::new(&compiled(vec![def.clone()], ByteOrder::LittleEndian))
            .emit()
            .unwrap();
        assert!(le.contains("frame->data[0] = (uint8_t)((can_float_union_t){.f = level}).i;"));

        let be = CEmitter::new(&compiled(vec![def], ByteOrder::BigEndian))
            .emit()
            .unwrap();
        assert!(
            be.contains("frame->data[0] = (uint8_t)(((can_float_union_t){.f = level}).i >> 24);")
        );
    }

    #[test]
    fn test_emit_records() {
        let def = MessageDefinition::new("gear", 0x21)
            .with_description("gear selection")
            .with_field(Field::bitfield(
                "shift",
                vec![
                    Subfield::flag("locked"),
                    Subfield::new("mode", 2).with_label(1, "forward"),
                ],
            ))
            .with_field(Field::primitive("rpm", PrimitiveType::U16));
        let ping = MessageDefinition::new("ping", 0x22);
        let set = compiled(vec![def, ping], ByteOrder::LittleEndian);
        let header = CEmitter::new(&set).emit().unwrap();

        assert!(header.contains(
            "/// @brief gear selection\n\
             typedef struct __attribute__((packed)) can_packet_gear_struct {\n\
             \x20   struct {\n\
             \x20       uint8_t locked : 1;\n\
             \x20       /// 0x1: forward\n\
             \x20       uint8_t mode : 2;\n\
             \x20   } shift;\n\
             \x20   uint16_t rpm;\n\
             } can_packet_gear;\n"
        ));
        assert!(header.contains("#define CAN_LENGTH_GEAR 3\n"));
        assert!(header.contains(
            "#define CAN_INIT_GEAR {.id = CAN_PACKET_GEAR, .length = CAN_LENGTH_GEAR}\n"
        ));
        assert!(header.contains("#define CAN_INIT_PING {.id = CAN_PACKET_PING"));
        assert!(!header.contains("can_packet_ping"));
        assert!(header.contains("        uint8_t data[8];\n        can_packet_gear gear;\n    };\n} CANPacket;"));

        let record = header.find("} can_packet_gear;").unwrap();
        let packet = header.find("} CANPacket;").unwrap();
        let sender = header.find("static inline void orbit_gear(").unwrap();
        assert!(record < packet && packet < sender);
    }

    #[test]
    fn test_emit_rejects_names_the_header_uses() {
        for name in ["memset", "uint8_t", "can_frame_t", "CAN_LENGTH_X"] {
            let def = MessageDefinition::new("bad", 0x1)
                .with_field(Field::primitive(name, PrimitiveType::U8));
            let set = compiled(vec![def], ByteOrder::LittleEndian);
            assert!(CEmitter::new(&set).emit().is_err(), "{name}");
        }

        let def = MessageDefinition::new("bad", 0x1)
            .with_field(Field::bitfield("g", vec![Subfield::flag("int")]));
        let err = CEmitter::new(&compiled(vec![def], ByteOrder::LittleEndian))
            .emit()
            .unwrap_err();
        assert!(err.to_string().contains("member 'int'"));
    }

    #[test]
    fn test_emit_rejects_keyword_parameter() {
        let def = MessageDefinition::new("bad", 0x1)
            .with_field(Field::primitive("int", PrimitiveType::U8));
        let set = compiled(vec![def], ByteOrder::LittleEndian);

        let err = CEmitter::new(&set).emit().unwrap_err();
        assert!(matches!(err, CodegenError::Generation { .. }));
    }
}
