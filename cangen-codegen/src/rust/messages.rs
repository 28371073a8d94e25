//! Message struct and `CanMessage` impl generation.

use crate::codec::{CodecSpec, PackStep};
use crate::error::CodegenError;
use crate::naming::{
    comment_text, is_identifier, is_rust_field_name, is_rust_type_name, rust_field_name,
    subfield_name, to_pascal_case, to_upper_snake,
};
use cangen_schema::layout::ByteSlot;
use cangen_schema::messages::{Field, Subfield};
use cangen_schema::types::{ByteOrder, PrimitiveType};
use std::collections::HashSet;

/// Generator for message structs.
pub struct MessageGenerator<'a> {
    codecs: &'a [CodecSpec],
}

impl<'a> MessageGenerator<'a> {
    /// Creates a new message generator.
    #[must_use]
    pub fn new(codecs: &'a [CodecSpec]) -> Self {
        Self { codecs }
    }

    /// Generates one struct and `CanMessage` impl per message.
    ///
    /// # Errors
    /// Returns [`CodegenError::Generation`] if a message or field name
    /// cannot be turned into a unique Rust identifier.
    pub fn generate(&self) -> Result<String, CodegenError> {
        let mut output = String::new();
        let mut struct_names = HashSet::new();

        for codec in self.codecs {
            let struct_name = to_pascal_case(&codec.name);
            if !is_identifier(&codec.name)
                || !is_rust_type_name(&struct_name)
                || !struct_names.insert(struct_name.clone())
            {
                return Err(CodegenError::generation(format!(
                    "message '{}' does not map to a unique Rust type name",
                    codec.name
                )));
            }

            output.push_str(&self.generate_struct(codec, &struct_name)?);
            output.push_str(&self.generate_labels(codec, &struct_name));
            output.push_str(&self.generate_impl(codec, &struct_name));
        }

        Ok(output)
    }

    /// Generates the struct declaration.
    fn generate_struct(&self, codec: &CodecSpec, struct_name: &str) -> Result<String, CodegenError> {
        let mut output = String::new();
        let mut field_names = HashSet::new();
        let mut check = |name: &str| {
            if is_rust_field_name(name) && field_names.insert(rust_field_name(name)) {
                Ok(rust_field_name(name))
            } else {
                Err(CodegenError::generation(format!(
                    "field '{name}' of message '{}' does not map to a unique Rust field name",
                    codec.name
                )))
            }
        };

        if codec.description.is_empty() {
            output.push_str(&format!("/// {} message.\n", codec.name));
        } else {
            output.push_str(&format!("/// {}\n", comment_text(&codec.description)));
        }
        output.push_str("#[derive(Debug, Clone, Copy, Default, PartialEq)]\n");
        output.push_str(&format!("pub struct {struct_name} {{\n"));

        for field in &codec.fields {
            match field {
                Field::Primitive(p) => {
                    let name = check(&p.name)?;
                    output.push_str(&format!("    pub {}: {},\n", name, p.ty.rust_type()));
                }
                Field::Bitfield(group) => {
                    for sub in &group.subfields {
                        let name = check(&subfield_name(&group.name, &sub.name))?;
                        output.push_str(&format!(
                            "    /// `{}.{}`, {} bit(s){}.\n",
                            group.name,
                            sub.name,
                            sub.bit_width,
                            label_summary(sub)
                        ));
                        output.push_str(&format!("    pub {name}: u8,\n"));
                    }
                }
            }
        }

        output.push_str("}\n\n");
        Ok(output)
    }

    /// Generates value label constants for labelled subfields.
    fn generate_labels(&self, codec: &CodecSpec, struct_name: &str) -> String {
        let mut consts = String::new();
        let mut seen = HashSet::new();

        for field in &codec.fields {
            let Field::Bitfield(group) = field else {
                continue;
            };
            for sub in &group.subfields {
                for (value, label) in &sub.value_labels {
                    let Some(value) = u8::try_from(*value).ok().filter(|v| *v <= sub.mask())
                    else {
                        tracing::warn!(
                            "label '{label}' of '{}.{}' in '{}' does not fit the subfield; skipped",
                            group.name,
                            sub.name,
                            codec.name
                        );
                        continue;
                    };
                    let const_name = to_upper_snake(&format!(
                        "{}_{}",
                        subfield_name(&group.name, &sub.name),
                        label
                    ));
                    if !seen.insert(const_name.clone()) {
                        continue;
                    }
                    consts.push_str(&format!(
                        "    /// `{}.{}` = {}.\n",
                        group.name,
                        sub.name,
                        comment_text(label)
                    ));
                    consts.push_str(&format!("    pub const {const_name}: u8 = {value};\n"));
                }
            }
        }

        if consts.is_empty() {
            return consts;
        }
        format!("impl {struct_name} {{\n{consts}}}\n\n")
    }

    /// Generates the `CanMessage` impl.
    fn generate_impl(&self, codec: &CodecSpec, struct_name: &str) -> String {
        let mut output = String::new();

        output.push_str(&format!("impl CanMessage for {struct_name} {{\n"));
        output.push_str(&format!("    const NAME: &'static str = {:?};\n", codec.name));
        output.push_str(&format!("    const ID: u16 = {:#05x};\n", codec.identifier));
        output.push_str(&format!("    const DLC: u8 = {};\n\n", codec.dlc));

        output.push_str("    fn encode(&self) -> CanFrame {\n");
        if codec.slots.is_empty() {
            output.push_str("        CanFrame::from_parts(Self::ID, Self::DLC, [0; 8])\n");
        } else {
            output.push_str("        let mut data = [0u8; 8];\n");
            for (index, step) in codec.pack_steps().iter().enumerate() {
                output.push_str(&format!("        data[{index}] = {};\n", encode_expr(step)));
            }
            output.push_str("        CanFrame::from_parts(Self::ID, Self::DLC, data)\n");
        }
        output.push_str("    }\n\n");

        output.push_str("    fn decode(frame: &CanFrame) -> cangen_core::Result<Self> {\n");
        output.push_str("        Self::check_frame(frame)?;\n");
        if codec.slots.is_empty() {
            output.push_str("        Ok(Self {})\n");
        } else {
            output.push_str("        let data = frame.raw_data();\n");
            output.push_str("        Ok(Self {\n");
            for (index, slot) in codec.slots.iter().enumerate() {
                output.push_str(&decode_slot(index, slot, codec.float_order));
            }
            output.push_str("        })\n");
        }
        output.push_str("    }\n");
        output.push_str("}\n\n");

        output
    }
}

/// Renders the right-hand side that produces one payload byte.
fn encode_expr(step: &PackStep) -> String {
    match step {
        PackStep::TakeByte { field, ty, shift } => {
            let value = format!("self.{}", rust_field_name(field));
            match ty {
                PrimitiveType::U8 => value,
                PrimitiveType::Bool => format!("u8::from({value})"),
                PrimitiveType::I8 => format!("{value} as u8"),
                _ => {
                    let unsigned = if ty.is_signed() {
                        format!("({value} as u{})", ty.size() * 8)
                    } else {
                        value
                    };
                    if *shift == 0 {
                        format!("{unsigned} as u8")
                    } else {
                        format!("({unsigned} >> {shift}) as u8")
                    }
                }
            }
        }
        PackStep::TakeFloatByte { field, shift } => {
            let bits = format!("self.{}.to_bits()", rust_field_name(field));
            if *shift == 0 {
                format!("{bits} as u8")
            } else {
                format!("({bits} >> {shift}) as u8")
            }
        }
        PackStep::OrBits { group, terms } => terms
            .iter()
            .map(|term| {
                let name = rust_field_name(&subfield_name(group, &term.subfield));
                if term.shift == 0 {
                    format!("(self.{name} & {:#04x})", term.mask)
                } else {
                    format!("((self.{name} & {:#04x}) << {})", term.mask, term.shift)
                }
            })
            .collect::<Vec<_>>()
            .join(" | "),
    }
}

/// Renders the struct field initializers read from one payload byte.
fn decode_slot(index: usize, slot: &ByteSlot, float_order: ByteOrder) -> String {
    match slot {
        ByteSlot::WholeField { byte_index, .. } if *byte_index > 0 => String::new(),
        ByteSlot::WholeField { field, .. } => {
            let name = rust_field_name(&field.name);
            let value = match field.ty {
                PrimitiveType::U8 => format!("data[{index}]"),
                PrimitiveType::I8 => format!("data[{index}] as i8"),
                PrimitiveType::Bool => format!("data[{index}] != 0"),
                ty => {
                    let bytes = (index..index + ty.size())
                        .map(|i| format!("data[{i}]"))
                        .collect::<Vec<_>>()
                        .join(", ");
                    let from = match float_order {
                        ByteOrder::BigEndian if ty.is_float() => "from_be_bytes",
                        _ => "from_le_bytes",
                    };
                    format!("{}::{from}([{bytes}])", ty.rust_type())
                }
            };
            format!("            {name}: {value},\n")
        }
        ByteSlot::PackedBits { group, placements } => placements
            .iter()
            .map(|p| {
                let name = rust_field_name(&subfield_name(
                    &group.name,
                    &group.subfields[p.subfield].name,
                ));
                if p.offset == 0 {
                    format!("            {name}: data[{index}] & {:#04x},\n", p.mask())
                } else {
                    format!(
                        "            {name}: (data[{index}] >> {}) & {:#04x},\n",
                        p.offset,
                        p.mask()
                    )
                }
            })
            .collect(),
    }
}

/// Lists a subfield's value labels for its doc comment.
fn label_summary(sub: &Subfield) -> String {
    if sub.value_labels.is_empty() {
        return String::new();
    }
    let labels = sub
        .value_labels
        .iter()
        .map(|(value, label)| format!("{value} = {}", comment_text(label)))
        .collect::<Vec<_>>()
        .join(", ");
    format!(" ({labels})")
}
