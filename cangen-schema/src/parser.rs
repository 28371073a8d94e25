//! JSON schema document parser.
//!
//! This module turns a schema document into validated
//! [`MessageDefinition`]s. The document shape is:
//!
//! ```json
//! { "packets": [
//!     { "name": "drive", "id": 32, "description": "motor command",
//!       "data": [
//!         { "type": "bitfield", "name": "flags",
//!           "bits": [ { "name": "direction", "bitnum": 2,
//!                       "values": { "0": "neutral", "0x1": "forward" } } ] },
//!         { "type": "uint8_t", "name": "accelerator" } ] },
//!     { "name": "sensor", "id": 32, "repeat": 3, "offset": 16, "data": [] }
//! ] }
//! ```
//!
//! `repeat` may also be written as `{ "count": 3, "offset": 16 }`. Defaults
//! (one-bit subfields, identifier step of one) are applied here so later
//! stages only ever see explicit values.

use crate::error::{ParseError, SchemaError};
use crate::messages::{BitfieldGroup, Field, MessageDefinition, PrimitiveField, Repeat, Subfield};
use crate::types::PrimitiveType;
use crate::validation::validate_definition;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Type token that introduces a bitfield group.
const BITFIELD_TOKEN: &str = "bitfield";

/// A parsed and validated schema document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaDocument {
    /// Message definitions in document order.
    pub messages: Vec<MessageDefinition>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawDocument {
    packets: Vec<RawPacket>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawPacket {
    name: String,
    id: i64,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    data: Vec<RawField>,
    #[serde(default)]
    repeat: Option<RawRepeat>,
    #[serde(default)]
    offset: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawRepeat {
    Count(i64),
    Spec {
        count: i64,
        #[serde(default)]
        offset: Option<i64>,
    },
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawField {
    name: String,
    #[serde(rename = "type")]
    type_name: String,
    #[serde(default)]
    bits: Option<Vec<RawSubfield>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSubfield {
    name: String,
    #[serde(default)]
    bitnum: Option<i64>,
    #[serde(default)]
    values: BTreeMap<String, serde_json::Value>,
}

/// Parses a schema document from a JSON string.
///
/// Every packet is normalized and validated; all schema errors in the
/// document are reported together.
///
/// # Errors
/// Returns [`ParseError::Json`] if the text is not a schema document, or
/// [`ParseError::Invalid`] with every `SchemaError` found.
pub fn parse_schema(json: &str) -> Result<SchemaDocument, ParseError> {
    let (document, errors) = parse_schema_partial(json)?;
    if errors.is_empty() {
        Ok(document)
    } else {
        Err(ParseError::Invalid(errors))
    }
}

/// Parses a schema document, keeping every packet that validates.
///
/// Packets with schema errors are left out of the document and their errors
/// are returned alongside it, so one bad packet does not hide the rest.
///
/// # Errors
/// Returns [`ParseError::Json`] if the text is not a schema document.
pub fn parse_schema_partial(json: &str) -> Result<(SchemaDocument, Vec<SchemaError>), ParseError> {
    let raw: RawDocument = serde_json::from_str(json)?;

    let mut messages = Vec::with_capacity(raw.packets.len());
    let mut errors = Vec::new();

    for packet in raw.packets {
        match normalize_packet(packet) {
            Ok(def) => messages.push(def),
            Err(mut packet_errors) => errors.append(&mut packet_errors),
        }
    }

    tracing::debug!(
        "parsed schema document with {} valid packet(s), {} error(s)",
        messages.len(),
        errors.len()
    );
    Ok((SchemaDocument { messages }, errors))
}

/// Converts one raw packet into a validated definition.
fn normalize_packet(packet: RawPacket) -> Result<MessageDefinition, Vec<SchemaError>> {
    let mut errors = Vec::new();

    let repeat = match packet.repeat {
        None => {
            if packet.offset.is_some() {
                tracing::warn!(
                    "packet '{}' declares an offset without repeat; ignoring it",
                    packet.name
                );
            }
            None
        }
        Some(raw) => {
            let (count, offset) = match raw {
                RawRepeat::Count(count) => (count, packet.offset),
                RawRepeat::Spec { count, offset } => (count, offset.or(packet.offset)),
            };
            match u32::try_from(count) {
                Ok(count) if count > 0 => Some(
                    Repeat::new(count).with_offset(offset.unwrap_or(Repeat::DEFAULT_OFFSET)),
                ),
                _ => {
                    errors.push(SchemaError::InvalidRepeat {
                        message: packet.name.clone(),
                        count,
                    });
                    None
                }
            }
        }
    };

    let mut fields = Vec::with_capacity(packet.data.len());
    for raw in packet.data {
        match normalize_field(&packet.name, raw) {
            Ok(field) => fields.push(field),
            Err(mut field_errors) => errors.append(&mut field_errors),
        }
    }

    let def = MessageDefinition {
        name: packet.name,
        identifier: packet.id,
        description: packet.description.unwrap_or_default(),
        fields,
        repeat,
    };

    if let Err(mut structural) = validate_definition(&def) {
        errors.append(&mut structural);
    }

    if errors.is_empty() {
        Ok(def)
    } else {
        Err(errors)
    }
}

/// Converts one raw field declaration.
fn normalize_field(message: &str, raw: RawField) -> Result<Field, Vec<SchemaError>> {
    if raw.type_name == BITFIELD_TOKEN {
        let Some(bits) = raw.bits else {
            return Err(vec![SchemaError::malformed(
                message,
                raw.name,
                "bitfield declared without a 'bits' list",
            )]);
        };

        let mut errors = Vec::new();
        let mut subfields = Vec::with_capacity(bits.len());
        for sub in bits {
            match normalize_subfield(message, &raw.name, sub) {
                Ok(subfield) => subfields.push(subfield),
                Err(mut sub_errors) => errors.append(&mut sub_errors),
            }
        }

        return if errors.is_empty() {
            Ok(Field::Bitfield(BitfieldGroup::new(raw.name, subfields)))
        } else {
            Err(errors)
        };
    }

    if raw.bits.is_some() {
        return Err(vec![SchemaError::malformed(
            message,
            raw.name,
            format!("'bits' is only valid on a bitfield, not on '{}'", raw.type_name),
        )]);
    }

    match PrimitiveType::from_token(&raw.type_name) {
        Some(ty) => Ok(Field::Primitive(PrimitiveField::new(raw.name, ty))),
        None => Err(vec![SchemaError::UnsupportedType {
            message: message.to_string(),
            field: raw.name,
            type_name: raw.type_name,
        }]),
    }
}

/// Converts one raw subfield, applying the one-bit default width.
fn normalize_subfield(
    message: &str,
    group: &str,
    raw: RawSubfield,
) -> Result<Subfield, Vec<SchemaError>> {
    let mut errors = Vec::new();

    let declared = raw.bitnum.unwrap_or(i64::from(Subfield::DEFAULT_BIT_WIDTH));
    let bit_width = match u32::try_from(declared) {
        Ok(width) if width > 0 => width,
        _ => {
            errors.push(SchemaError::InvalidBitWidth {
                message: message.to_string(),
                group: group.to_string(),
                subfield: raw.name.clone(),
                width: declared,
            });
            0
        }
    };

    let mut value_labels = BTreeMap::new();
    for (key, label) in raw.values {
        match parse_label_key(&key) {
            Some(value) => {
                let label = match label {
                    serde_json::Value::String(s) => s,
                    other => other.to_string(),
                };
                value_labels.insert(value, label);
            }
            None => errors.push(SchemaError::InvalidValueLabel {
                message: message.to_string(),
                subfield: raw.name.clone(),
                key,
            }),
        }
    }

    if errors.is_empty() {
        Ok(Subfield {
            name: raw.name,
            bit_width,
            value_labels,
        })
    } else {
        Err(errors)
    }
}

/// Parses a decimal or `0x`-prefixed hexadecimal label key.
fn parse_label_key(key: &str) -> Option<i64> {
    let key = key.trim();
    match key.strip_prefix("0x").or_else(|| key.strip_prefix("0X")) {
        Some(hex) => i64::from_str_radix(hex, 16).ok(),
        None => key.parse().ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DRIVE_SCHEMA: &str = r#"{
        "packets": [
            {
                "name": "kill",
                "id": 1,
                "description": "emergency stop",
                "data": [
                    { "type": "uint8_t", "name": "board_id" },
                    { "type": "uint8_t", "name": "error_code" }
                ]
            },
            {
                "name": "drive",
                "id": 32,
                "description": "motor command",
                "data": [
                    {
                        "type": "bitfield",
                        "name": "flags",
                        "bits": [
                            { "name": "tracker_disable" },
                            { "name": "direction", "bitnum": 2,
                              "values": { "0": "neutral", "0x1": "forward", "2": "reverse" } }
                        ]
                    },
                    { "type": "uint8_t", "name": "accelerator" },
                    { "type": "uint8_t", "name": "regen" }
                ]
            }
        ]
    }"#;

    #[test]
    fn test_parse_simple_schema() {
        let doc = parse_schema(DRIVE_SCHEMA).expect("Failed to parse schema");

        assert_eq!(doc.messages.len(), 2);
        assert_eq!(doc.messages[0].name, "kill");
        assert_eq!(doc.messages[0].identifier, 1);
        assert_eq!(doc.messages[0].description, "emergency stop");
        assert_eq!(doc.messages[1].fields.len(), 3);
    }

    #[test]
    fn test_parse_bitfield_defaults_and_labels() {
        let doc = parse_schema(DRIVE_SCHEMA).expect("Failed to parse schema");

        let Some(Field::Bitfield(group)) = doc.messages[1].field("flags") else {
            panic!("flags should be a bitfield");
        };
        assert_eq!(group.subfields[0].bit_width, 1);
        assert_eq!(group.subfields[1].bit_width, 2);
        assert_eq!(
            group.subfields[1].value_labels.get(&1).map(String::as_str),
            Some("forward")
        );
        assert_eq!(group.subfields[1].value_labels.len(), 3);
    }

    #[test]
    fn test_parse_repeat_bare_count() {
        let json = r#"{ "packets": [
            { "name": "sensor", "id": 32, "repeat": 3, "offset": 16,
              "data": [ { "type": "int16_t", "name": "reading" } ] }
        ] }"#;

        let doc = parse_schema(json).expect("Failed to parse schema");
        assert_eq!(doc.messages[0].repeat, Some(Repeat::new(3).with_offset(16)));
    }

    #[test]
    fn test_parse_repeat_object_default_offset() {
        let json = r#"{ "packets": [
            { "name": "cell", "id": 256, "repeat": { "count": 4 }, "data": [] }
        ] }"#;

        let doc = parse_schema(json).expect("Failed to parse schema");
        assert_eq!(doc.messages[0].repeat, Some(Repeat::new(4)));
    }

    #[test]
    fn test_parse_unsupported_type() {
        let json = r#"{ "packets": [
            { "name": "m", "id": 1, "data": [ { "type": "uint64_t", "name": "big" } ] }
        ] }"#;

        let Err(ParseError::Invalid(errors)) = parse_schema(json) else {
            panic!("expected schema errors");
        };
        assert_eq!(
            errors,
            vec![SchemaError::UnsupportedType {
                message: "m".to_string(),
                field: "big".to_string(),
                type_name: "uint64_t".to_string(),
            }]
        );
    }

    #[test]
    fn test_parse_collects_errors_across_packets() {
        let json = r#"{ "packets": [
            { "name": "a", "id": 1, "data": [ { "type": "double", "name": "x" } ] },
            { "name": "b", "id": 2, "data": [
                { "type": "bitfield", "name": "g", "bits": [ { "name": "s", "bitnum": -1 } ] }
            ] },
            { "name": "c", "id": 3, "repeat": 0, "data": [] }
        ] }"#;

        let Err(ParseError::Invalid(errors)) = parse_schema(json) else {
            panic!("expected schema errors");
        };
        assert_eq!(errors.len(), 3);
        assert_eq!(errors[0].message_name(), "a");
        assert!(matches!(errors[1], SchemaError::InvalidBitWidth { width: -1, .. }));
        assert!(matches!(errors[2], SchemaError::InvalidRepeat { count: 0, .. }));
    }

    #[test]
    fn test_parse_partial_keeps_valid_packets() {
        let json = r#"{ "packets": [
            { "name": "a", "id": 1, "data": [ { "type": "double", "name": "x" } ] },
            { "name": "b", "id": 2, "data": [ { "type": "uint8_t", "name": "y" } ] }
        ] }"#;

        let (doc, errors) = parse_schema_partial(json).expect("document should parse");
        assert_eq!(doc.messages.len(), 1);
        assert_eq!(doc.messages[0].name, "b");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message_name(), "a");
    }

    #[test]
    fn test_parse_rejects_oversized_family() {
        let json = r#"{ "packets": [
            { "name": "flood", "id": 0, "repeat": 4000000000, "data": [] }
        ] }"#;

        let Err(ParseError::Invalid(errors)) = parse_schema(json) else {
            panic!("expected schema errors");
        };
        assert!(matches!(
            errors[0],
            SchemaError::InvalidRepeat { count: 4_000_000_000, .. }
        ));
    }

    #[test]
    fn test_parse_bitfield_without_bits() {
        let json = r#"{ "packets": [
            { "name": "m", "id": 1, "data": [ { "type": "bitfield", "name": "g" } ] }
        ] }"#;

        let Err(ParseError::Invalid(errors)) = parse_schema(json) else {
            panic!("expected schema errors");
        };
        assert!(matches!(errors[0], SchemaError::MalformedField { .. }));
    }

    #[test]
    fn test_parse_rejects_unknown_keys() {
        let json = r#"{ "packets": [ { "name": "m", "id": 1, "colour": "red" } ] }"#;
        assert!(matches!(parse_schema(json), Err(ParseError::Json(_))));
    }

    #[test]
    fn test_parse_label_key() {
        assert_eq!(parse_label_key("0x1F"), Some(31));
        assert_eq!(parse_label_key("12"), Some(12));
        assert_eq!(parse_label_key("-3"), Some(-3));
        assert_eq!(parse_label_key("on"), None);
    }
}
