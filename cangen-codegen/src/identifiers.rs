//! Aggregation of message identifiers across a compiled batch.

use crate::codec::CodecSpec;
use crate::error::CompileError;
use crate::naming::to_upper_snake;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// One symbolic identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdentifierEntry {
    /// Message name.
    pub name: String,
    /// Upper snake case symbol derived from the name.
    pub symbol: String,
    /// Standard frame identifier.
    pub identifier: u16,
    /// Message description.
    pub description: String,
}

/// Symbolic enumeration of every identifier in a batch, in batch order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IdentifierEnum {
    entries: Vec<IdentifierEntry>,
}

impl IdentifierEnum {
    /// Reduces a batch of codecs to one identifier enumeration.
    ///
    /// The first message to claim an identifier or a name keeps it; later
    /// claimants are left out and reported as errors.
    #[must_use]
    pub fn build<'a>(codecs: impl IntoIterator<Item = &'a CodecSpec>) -> (Self, Vec<CompileError>) {
        let mut entries = Vec::new();
        let mut errors = Vec::new();
        let mut by_id: HashMap<u16, &str> = HashMap::new();
        let mut names: HashSet<&str> = HashSet::new();

        for codec in codecs {
            if !names.insert(&codec.name) {
                errors.push(CompileError::DuplicateName {
                    name: codec.name.clone(),
                });
                continue;
            }
            if let Some(first) = by_id.get(&codec.identifier) {
                errors.push(CompileError::DuplicateIdentifier {
                    identifier: codec.identifier,
                    first: (*first).to_string(),
                    second: codec.name.clone(),
                });
                continue;
            }
            by_id.insert(codec.identifier, &codec.name);

            entries.push(IdentifierEntry {
                name: codec.name.clone(),
                symbol: to_upper_snake(&codec.name),
                identifier: codec.identifier,
                description: codec.description.clone(),
            });
        }

        (Self { entries }, errors)
    }

    /// Returns the entries in batch order.
    #[must_use]
    pub fn entries(&self) -> &[IdentifierEntry] {
        &self.entries
    }

    /// Returns an iterator over the entries.
    pub fn iter(&self) -> impl Iterator<Item = &IdentifierEntry> {
        self.entries.iter()
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks up an entry by message name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&IdentifierEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Returns the message name bound to an identifier.
    #[must_use]
    pub fn name_of(&self, identifier: u16) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.identifier == identifier)
            .map(|e| e.name.as_str())
    }
}

impl<'a> IntoIterator for &'a IdentifierEnum {
    type Item = &'a IdentifierEntry;
    type IntoIter = std::slice::Iter<'a, IdentifierEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cangen_schema::types::ByteOrder;

    fn codec(name: &str, identifier: u16) -> CodecSpec {
        CodecSpec {
            name: name.to_string(),
            description: format!("{name} packet"),
            identifier,
            dlc: 0,
            float_order: ByteOrder::LittleEndian,
            fields: Vec::new(),
            slots: Vec::new(),
        }
    }

    #[test]
    fn test_build_keeps_batch_order() {
        let codecs = [codec("kill", 0x00), codec("drive", 0x20), codec("sensor__0", 0x10)];
        let (ids, errors) = IdentifierEnum::build(&codecs);

        assert!(errors.is_empty());
        let names: Vec<_> = ids.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["kill", "drive", "sensor__0"]);
        assert_eq!(ids.get("sensor__0").unwrap().symbol, "SENSOR__0");
        assert_eq!(ids.name_of(0x20), Some("drive"));
    }

    #[test]
    fn test_build_reports_duplicate_identifier() {
        let codecs = [codec("a", 0x100), codec("b", 0x100)];
        let (ids, errors) = IdentifierEnum::build(&codecs);

        assert_eq!(ids.len(), 1);
        assert_eq!(ids.name_of(0x100), Some("a"));
        assert!(matches!(
            &errors[..],
            [CompileError::DuplicateIdentifier { identifier: 0x100, first, second }]
                if first == "a" && second == "b"
        ));
    }

    #[test]
    fn test_build_reports_duplicate_name() {
        let codecs = [codec("a", 0x1), codec("a", 0x2)];
        let (ids, errors) = IdentifierEnum::build(&codecs);

        assert_eq!(ids.len(), 1);
        assert!(matches!(&errors[..], [CompileError::DuplicateName { name }] if name == "a"));
    }

    #[test]
    fn test_empty() {
        let (ids, errors) = IdentifierEnum::build(std::iter::empty());
        assert!(ids.is_empty());
        assert!(errors.is_empty());
    }
}
