//! Ordered collection of message definitions compiled together.

use crate::messages::MessageDefinition;
use crate::parser::SchemaDocument;

/// The set of message definitions that make up one compilation.
///
/// Documents are appended in the order given; definitions keep their
/// document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaSet {
    definitions: Vec<MessageDefinition>,
}

impl SchemaSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a set from parsed documents.
    #[must_use]
    pub fn from_documents(documents: impl IntoIterator<Item = SchemaDocument>) -> Self {
        let mut set = Self::new();
        for doc in documents {
            set.push_document(doc);
        }
        set
    }

    /// Appends every definition of a document.
    pub fn push_document(&mut self, document: SchemaDocument) {
        self.definitions.extend(document.messages);
    }

    /// Appends one definition.
    pub fn push(&mut self, definition: MessageDefinition) {
        self.definitions.push(definition);
    }

    /// Returns the number of (unexpanded) definitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Returns true if the set holds no definitions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Iterates over the definitions in order.
    pub fn iter(&self) -> impl Iterator<Item = &MessageDefinition> {
        self.definitions.iter()
    }

    /// Consumes the set, returning its definitions.
    #[must_use]
    pub fn into_definitions(self) -> Vec<MessageDefinition> {
        self.definitions
    }
}

impl From<Vec<MessageDefinition>> for SchemaSet {
    fn from(definitions: Vec<MessageDefinition>) -> Self {
        Self { definitions }
    }
}

impl FromIterator<MessageDefinition> for SchemaSet {
    fn from_iter<I: IntoIterator<Item = MessageDefinition>>(iter: I) -> Self {
        Self {
            definitions: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_documents_keeps_order() {
        let first = SchemaDocument {
            messages: vec![MessageDefinition::new("a", 1), MessageDefinition::new("b", 2)],
        };
        let second = SchemaDocument {
            messages: vec![MessageDefinition::new("c", 3)],
        };

        let set = SchemaSet::from_documents([first, second]);
        let names: Vec<&str> = set.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_empty_set() {
        let set = SchemaSet::new();
        assert!(set.is_empty());
        assert!(set.into_definitions().is_empty());
    }
}
