//! Heritage Core - Domain models, traits, and shared types
//!
//! This crate defines the core abstractions used by the heritage
//! extraction pipeline:
//! - Ontology schema (classes, data and object properties)
//! - Individual records and the identifier registry
//! - Annotation types supplied by an external NLP engine
//! - Triple model
//! - Common error types
//! - Configuration management

pub mod annotation;
pub mod config;
pub mod individual;
pub mod ontology;
pub mod triple;

pub use annotation::{AnnotatedDocument, EntityLabel, EntitySpan, NlpEngine, Sentence, Span};
pub use config::{AppConfig, ConfigError, LoggingConfig, OutputConfig, OutputFormat};
pub use individual::{
    normalize_identifier, IdentifierCollision, IdentifierRegistry, IndividualRecord,
};
pub use ontology::{properties_for, ClassSchema, DataProperty, ObjectProperty, OntologyClass};
pub use triple::{Predicate, Term, Triple};

use chrono::NaiveDate;
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Core error types for heritage extraction
#[derive(Error, Debug)]
pub enum HeritageError {
    #[error("Annotation failed: {0}")]
    Annotation(String),

    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    #[error("Unknown ontology class: {0}")]
    UnknownClass(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, HeritageError>;

/// Failure of a strict calendar-date parse
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateParseError {
    #[error("empty date string")]
    Empty,

    #[error("unrecognized date: {0}")]
    Unrecognized(String),
}

// ============================================================================
// Traits
// ============================================================================

/// Calendar-date parser used for Date individuals
pub trait DateParser: Send + Sync {
    /// Parse without fuzzy inference; extra words make the parse fail
    fn parse_strict(&self, text: &str) -> std::result::Result<NaiveDate, DateParseError>;
}
