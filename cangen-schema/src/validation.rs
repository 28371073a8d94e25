//! Schema validation utilities.
//!
//! Structural checks on a single message definition that do not depend on
//! the frame layout. Layout limits (bit budget, frame size, identifier
//! range) are enforced by [`crate::layout`].

use crate::error::SchemaError;
use crate::messages::{BitfieldGroup, Field, MessageDefinition, Repeat};
use std::collections::HashSet;

/// Validates a message definition for well-formedness.
///
/// Every problem found is returned, not just the first.
///
/// # Errors
/// Returns the list of `SchemaError`s describing each defect.
pub fn validate_definition(def: &MessageDefinition) -> Result<(), Vec<SchemaError>> {
    let mut errors = Vec::new();

    if let Some(repeat) = &def.repeat
        && (repeat.count == 0 || repeat.count > Repeat::MAX_COUNT)
    {
        errors.push(SchemaError::InvalidRepeat {
            message: def.name.clone(),
            count: i64::from(repeat.count),
        });
    }

    let mut seen_fields = HashSet::new();
    for field in &def.fields {
        if !seen_fields.insert(field.name()) {
            errors.push(SchemaError::DuplicateField {
                message: def.name.clone(),
                field: field.name().to_string(),
            });
        }

        if let Field::Bitfield(group) = field {
            validate_group(&def.name, group, &mut errors);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates the subfields of one bitfield group.
fn validate_group(message: &str, group: &BitfieldGroup, errors: &mut Vec<SchemaError>) {
    if group.subfields.is_empty() {
        errors.push(SchemaError::EmptyBitfield {
            message: message.to_string(),
            group: group.name.clone(),
        });
    }

    let mut seen = HashSet::new();
    for subfield in &group.subfields {
        if subfield.bit_width == 0 {
            errors.push(SchemaError::InvalidBitWidth {
                message: message.to_string(),
                group: group.name.clone(),
                subfield: subfield.name.clone(),
                width: 0,
            });
        }

        if !seen.insert(subfield.name.as_str()) {
            errors.push(SchemaError::DuplicateSubfield {
                message: message.to_string(),
                group: group.name.clone(),
                subfield: subfield.name.clone(),
            });
        }
    }
}
