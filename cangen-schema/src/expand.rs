//! Message family expansion.
//!
//! A definition carrying `repeat` is a template for `count` concrete
//! messages. Member `i` gets identifier `base + i * offset` and name
//! `base__i`; its field list is an exact copy of the template's.

use crate::messages::MessageDefinition;

/// Separator between a family's base name and the member index.
pub const FAMILY_SEPARATOR: &str = "__";

/// Expands a definition into its concrete messages.
///
/// A definition without `repeat` is returned unchanged as the only element.
#[must_use]
pub fn expand(def: MessageDefinition) -> Vec<MessageDefinition> {
    let Some(repeat) = def.repeat else {
        return vec![def];
    };

    tracing::trace!(
        "expanding family '{}' into {} member(s), step {}",
        def.name,
        repeat.count,
        repeat.offset
    );

    (0..repeat.count)
        .map(|i| MessageDefinition {
            name: member_name(&def.name, i),
            identifier: def
                .identifier
                .saturating_add(i64::from(i).saturating_mul(repeat.offset)),
            description: def.description.clone(),
            fields: def.fields.clone(),
            repeat: None,
        })
        .collect()
}

/// Expands every definition, keeping declaration order.
#[must_use]
pub fn expand_all(defs: impl IntoIterator<Item = MessageDefinition>) -> Vec<MessageDefinition> {
    defs.into_iter().flat_map(expand).collect()
}

/// Returns the concrete name of family member `index`.
#[must_use]
pub fn member_name(base: &str, index: u32) -> String {
    format!("{base}{FAMILY_SEPARATOR}{index}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::{Field, Repeat, Subfield};
    use crate::types::PrimitiveType;

    fn sensor_template() -> MessageDefinition {
        MessageDefinition::new("sensor", 0x20)
            .with_description("temperature sensor")
            .with_field(Field::primitive("reading", PrimitiveType::I16))
            .with_field(Field::bitfield(
                "status",
                vec![Subfield::flag("valid"), Subfield::new("range", 3)],
            ))
            .with_repeat(Repeat::new(3).with_offset(0x10))
    }

    #[test]
    fn test_expand_non_repeating_is_identity() {
        let def = MessageDefinition::new("heartbeat", 0x10)
            .with_field(Field::primitive("status", PrimitiveType::U8));
        assert_eq!(expand(def.clone()), vec![def]);
    }

    #[test]
    fn test_expand_family_identifiers_and_names() {
        let members = expand(sensor_template());

        let ids: Vec<i64> = members.iter().map(|m| m.identifier).collect();
        let names: Vec<&str> = members.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(ids, vec![0x20, 0x30, 0x40]);
        assert_eq!(names, vec!["sensor__0", "sensor__1", "sensor__2"]);
    }

    #[test]
    fn test_expand_family_is_structurally_identical() {
        let template = sensor_template();
        let members = expand(template.clone());

        for member in &members {
            assert_eq!(member.fields, template.fields);
            assert_eq!(member.description, template.description);
            assert!(member.repeat.is_none());
        }
    }

    #[test]
    fn test_expand_default_offset() {
        let def = MessageDefinition::new("cell", 0x100).with_repeat(Repeat::new(4));
        let ids: Vec<i64> = expand(def).iter().map(|m| m.identifier).collect();
        assert_eq!(ids, vec![0x100, 0x101, 0x102, 0x103]);
    }

    #[test]
    fn test_expand_all_keeps_order() {
        let defs = vec![
            MessageDefinition::new("first", 1),
            sensor_template(),
            MessageDefinition::new("last", 2),
        ];
        let names: Vec<String> = expand_all(defs).into_iter().map(|m| m.name).collect();
        assert_eq!(
            names,
            vec!["first", "sensor__0", "sensor__1", "sensor__2", "last"]
        );
    }
}
