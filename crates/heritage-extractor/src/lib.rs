//! Heritage Extractor - Knowledge extraction pipeline
//!
//! Turns annotated narrative text about heritage sites into ontology
//! individuals and schema-conformant triples:
//! classification, attribute enrichment, relation linking, a two-pass
//! orchestrator and the triple assembler.

use heritage_core::{EntityLabel, OntologyClass};

/// Trait for span classifiers
pub trait SpanClassifier: Send + Sync {
    /// Ontology class for a span, or `None` to drop it
    fn classify(&self, text: &str, label: Option<&EntityLabel>) -> Option<OntologyClass>;
}

pub mod annotator;
pub mod assembler;
pub mod classifier;
pub mod date;
pub mod enricher;
pub mod pipeline;
pub mod relation;

pub use annotator::RuleBasedAnnotator;
pub use assembler::{TripleAssembler, TurtleWriter};
pub use classifier::EntityClassifier;
pub use date::StrictDateParser;
pub use enricher::AttributeEnricher;
pub use pipeline::{ExtractionPipeline, ExtractionRun, ExtractionSummary};
pub use relation::RelationLinker;
