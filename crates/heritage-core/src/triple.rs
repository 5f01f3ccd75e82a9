//! Triple model
//!
//! Assembled output is a flat list of (subject, predicate, object) facts,
//! grouped per subject in the order the records were produced.

use serde::{Deserialize, Serialize};

use crate::ontology::{DataProperty, ObjectProperty, OntologyClass};

/// Predicate of a triple
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum Predicate {
    /// `rdf:type`
    Type,
    Data(DataProperty),
    Object(ObjectProperty),
}

impl Predicate {
    /// Prefixed name as written in Turtle
    pub fn prefixed(&self) -> String {
        match self {
            Self::Type => "rdf:type".to_string(),
            Self::Data(p) => format!(":{}", p.as_str()),
            Self::Object(p) => format!(":{}", p.as_str()),
        }
    }
}

/// Object position of a triple
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Term {
    Class(OntologyClass),
    Literal(String),
    /// Identifier of another individual
    Individual(String),
}

/// A single fact about an individual
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Triple {
    pub subject: String,
    pub predicate: Predicate,
    pub object: Term,
}

impl Triple {
    pub fn new(subject: impl Into<String>, predicate: Predicate, object: Term) -> Self {
        Self {
            subject: subject.into(),
            predicate,
            object,
        }
    }

    pub fn type_of(subject: impl Into<String>, class: OntologyClass) -> Self {
        Self::new(subject, Predicate::Type, Term::Class(class))
    }

    pub fn literal(subject: impl Into<String>, property: DataProperty, value: impl Into<String>) -> Self {
        Self::new(subject, Predicate::Data(property), Term::Literal(value.into()))
    }

    pub fn link(subject: impl Into<String>, property: ObjectProperty, target: impl Into<String>) -> Self {
        Self::new(subject, Predicate::Object(property), Term::Individual(target.into()))
    }
}
