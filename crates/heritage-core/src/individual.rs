//! Individuals and the identifier registry
//!
//! An individual is one extracted entity bound to exactly one ontology class.
//! Identifiers are derived from the surface text, so two different mentions
//! can normalize to the same identifier. The registry keeps the last writer
//! and records every such collision.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::ontology::{DataProperty, ObjectProperty, OntologyClass};

/// Characters removed from a mention to form its identifier
pub const STRIPPED_CHARS: [char; 4] = [' ', '_', ',', '.'];

/// Normalize a mention into an identifier (case is preserved)
pub fn normalize_identifier(name: &str) -> String {
    name.chars().filter(|c| !STRIPPED_CHARS.contains(c)).collect()
}

// ============================================================================
// Individual records
// ============================================================================

/// One extracted individual with its proposed properties.
///
/// Property maps are not filtered against the class schema here; the triple
/// assembler drops anything the schema does not declare.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndividualRecord {
    pub identifier: String,
    pub class: OntologyClass,
    pub data_properties: BTreeMap<DataProperty, String>,
    /// Raw label of the referenced individual, normalized at assembly time
    pub object_properties: BTreeMap<ObjectProperty, String>,
}

impl IndividualRecord {
    pub fn new(identifier: impl Into<String>, class: OntologyClass) -> Self {
        Self {
            identifier: identifier.into(),
            class,
            data_properties: BTreeMap::new(),
            object_properties: BTreeMap::new(),
        }
    }

    /// Set a data property
    pub fn with_data(mut self, property: DataProperty, value: impl Into<String>) -> Self {
        self.data_properties.insert(property, value.into());
        self
    }

    /// Set an object property
    pub fn with_object(mut self, property: ObjectProperty, label: impl Into<String>) -> Self {
        self.object_properties.insert(property, label.into());
        self
    }

    pub fn data(&self, property: DataProperty) -> Option<&str> {
        self.data_properties.get(&property).map(String::as_str)
    }

    pub fn object(&self, property: ObjectProperty) -> Option<&str> {
        self.object_properties.get(&property).map(String::as_str)
    }
}

// ============================================================================
// Identifier registry
// ============================================================================

/// Two different surface texts that normalized to the same identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifierCollision {
    pub identifier: String,
    pub previous_text: String,
    pub previous_class: OntologyClass,
    pub text: String,
    pub class: OntologyClass,
}

#[derive(Debug, Clone)]
struct RegistryEntry {
    class: OntologyClass,
    surface: String,
}

/// Identifier to class mapping for a single extraction run
#[derive(Debug, Clone, Default)]
pub struct IdentifierRegistry {
    entries: HashMap<String, RegistryEntry>,
    collisions: Vec<IdentifierCollision>,
}

impl IdentifierRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize `name`, bind the identifier to `class` and return it.
    ///
    /// The last writer wins when a different surface text already owns the
    /// identifier.
    pub fn create_individual(&mut self, name: &str, class: OntologyClass) -> String {
        let identifier = normalize_identifier(name);

        let previous = self.entries.insert(
            identifier.clone(),
            RegistryEntry {
                class,
                surface: name.to_string(),
            },
        );

        if let Some(previous) = previous {
            if previous.surface != name {
                warn!(
                    identifier = %identifier,
                    previous = %previous.surface,
                    current = %name,
                    "identifier collision, class mapping overwritten"
                );
                self.collisions.push(IdentifierCollision {
                    identifier: identifier.clone(),
                    previous_text: previous.surface,
                    previous_class: previous.class,
                    text: name.to_string(),
                    class,
                });
            }
        }

        identifier
    }

    /// Class currently bound to an identifier
    pub fn class_of(&self, identifier: &str) -> Option<OntologyClass> {
        self.entries.get(identifier).map(|e| e.class)
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.entries.contains_key(identifier)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn collisions(&self) -> &[IdentifierCollision] {
        &self.collisions
    }

    /// Forget every identifier, for reuse across documents
    pub fn reset(&mut self) {
        self.entries.clear();
        self.collisions.clear();
    }
}
