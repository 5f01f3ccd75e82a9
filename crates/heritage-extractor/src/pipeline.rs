//! Extraction orchestrator
//!
//! Drives two passes over an annotated document:
//! 1. Noun-phrase pass: every classified noun chunk becomes an individual,
//!    enriched from its sentence and linked to the sentence's places/events.
//! 2. Named-entity pass: GPE, DATE and EVENT spans not already seen as noun
//!    chunks become City/Region, Date and HistoricEvent individuals.
//!
//! Each run owns a fresh [`IdentifierRegistry`], so identifiers never leak
//! between documents.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;
use tracing::{debug, info, info_span};
use uuid::Uuid;

use heritage_core::{
    normalize_identifier, AnnotatedDocument, DataProperty, DateParser, EntityLabel, EntitySpan,
    IdentifierRegistry, IndividualRecord, NlpEngine, OntologyClass, Result, Sentence,
};

use crate::classifier::{place_class, EntityClassifier};
use crate::date::StrictDateParser;
use crate::enricher::AttributeEnricher;
use crate::relation::RelationLinker;
use crate::SpanClassifier;

// ============================================================================
// Run results
// ============================================================================

/// Counts reported at the end of a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractionSummary {
    pub sentences: usize,
    pub noun_phrase_records: usize,
    pub named_entity_records: usize,
    pub skipped_seen: usize,
    pub unclassified: usize,
    pub collisions: usize,
    pub per_class: BTreeMap<OntologyClass, usize>,
}

impl ExtractionSummary {
    pub fn total(&self) -> usize {
        self.noun_phrase_records + self.named_entity_records
    }
}

/// Output of one orchestrator run
#[derive(Debug, Clone)]
pub struct ExtractionRun {
    pub run_id: Uuid,
    /// Records in production order
    pub records: Vec<IndividualRecord>,
    /// Identifier registry scoped to this run
    pub registry: IdentifierRegistry,
    pub summary: ExtractionSummary,
}

// ============================================================================
// Pipeline
// ============================================================================

/// Two-pass extraction orchestrator
pub struct ExtractionPipeline {
    classifier: Box<dyn SpanClassifier>,
    enricher: AttributeEnricher,
    linker: RelationLinker,
    date_parser: Box<dyn DateParser>,
}

impl ExtractionPipeline {
    /// Create a pipeline with the heritage rules and the strict date parser
    pub fn new() -> Self {
        Self {
            classifier: Box::new(EntityClassifier::new()),
            enricher: AttributeEnricher::new(),
            linker: RelationLinker::new(),
            date_parser: Box::new(StrictDateParser::new()),
        }
    }

    /// Replace the span classifier
    pub fn with_classifier(mut self, classifier: impl SpanClassifier + 'static) -> Self {
        self.classifier = Box::new(classifier);
        self
    }

    /// Replace the calendar-date parser
    pub fn with_date_parser(mut self, parser: impl DateParser + 'static) -> Self {
        self.date_parser = Box::new(parser);
        self
    }

    /// Annotate raw text with `engine`, then extract
    pub fn extract_text(&self, engine: &dyn NlpEngine, text: &str) -> Result<ExtractionRun> {
        let document = engine.annotate(text)?;
        document.validate()?;
        debug!(
            engine = engine.name(),
            sentences = document.sentences.len(),
            entities = document.entities.len(),
            "document annotated"
        );
        Ok(self.run(&document))
    }

    /// Extract individuals from an annotated document
    pub fn run(&self, document: &AnnotatedDocument) -> ExtractionRun {
        let run_id = Uuid::new_v4();
        let span = info_span!("extraction", %run_id);
        let _guard = span.enter();

        let mut state = RunState::default();
        state.summary.sentences = document.sentences.len();

        for sentence in &document.sentences {
            self.noun_phrase_pass(sentence, &mut state);
        }
        for entity in &document.entities {
            self.named_entity_pass(entity, &mut state);
        }

        let RunState {
            registry,
            records,
            mut summary,
            ..
        } = state;

        summary.collisions = registry.collisions().len();
        for record in &records {
            *summary.per_class.entry(record.class).or_insert(0) += 1;
        }

        info!(
            records = summary.total(),
            noun_phrase = summary.noun_phrase_records,
            named_entity = summary.named_entity_records,
            collisions = summary.collisions,
            "extraction finished"
        );

        ExtractionRun {
            run_id,
            records,
            registry,
            summary,
        }
    }

    fn noun_phrase_pass(&self, sentence: &Sentence, state: &mut RunState) {
        let mut sentence_ids: HashSet<String> = HashSet::new();

        for chunk in &sentence.noun_chunks {
            let text = chunk.text.trim();
            if text.is_empty() {
                continue;
            }
            if state.seen.contains(text) {
                debug!(mention = text, "mention already extracted");
                state.summary.skipped_seen += 1;
                continue;
            }

            let Some(class) = self.classifier.classify(text, None) else {
                state.summary.unclassified += 1;
                continue;
            };

            let identifier = normalize_identifier(text);
            if !sentence_ids.insert(identifier.clone()) {
                debug!(mention = text, %identifier, "identifier repeated within sentence");
                continue;
            }

            let identifier = state.registry.create_individual(text, class);
            let mut record = IndividualRecord::new(identifier, class)
                .with_data(DataProperty::HasName, text);
            record
                .data_properties
                .extend(self.enricher.enrich(&sentence.text, class));
            self.linker
                .apply(&sentence.entities, &mut record.object_properties);

            debug!(
                identifier = %record.identifier,
                class = %class,
                properties = record.data_properties.len(),
                "noun phrase individual"
            );

            state.seen.insert(text.to_string());
            state.records.push(record);
            state.summary.noun_phrase_records += 1;
        }
    }

    fn named_entity_pass(&self, entity: &EntitySpan, state: &mut RunState) {
        let text = entity.text.trim();
        if text.is_empty() {
            return;
        }
        if state.seen.contains(text) {
            state.summary.skipped_seen += 1;
            return;
        }

        let record = match entity.label {
            EntityLabel::Gpe => {
                let class = place_class(&text.to_lowercase());
                let identifier = state.registry.create_individual(text, class);
                IndividualRecord::new(identifier, class)
                    .with_data(DataProperty::HasName, text)
                    .with_data(DataProperty::HasLocationType, class.as_str())
            }
            EntityLabel::Date => {
                let identifier = state.registry.create_individual(text, OntologyClass::Date);
                let mut record = IndividualRecord::new(identifier, OntologyClass::Date)
                    .with_data(DataProperty::HasLabelDate, text);
                match self.date_parser.parse_strict(text) {
                    Ok(date) => {
                        record = record.with_data(
                            DataProperty::HasExactDate,
                            date.format("%Y-%m-%d").to_string(),
                        );
                    }
                    Err(e) => debug!(label = text, error = %e, "date kept as label only"),
                }
                record
            }
            EntityLabel::Event => {
                let identifier = state
                    .registry
                    .create_individual(text, OntologyClass::HistoricEvent);
                IndividualRecord::new(identifier, OntologyClass::HistoricEvent)
                    .with_data(DataProperty::HasName, text)
            }
            EntityLabel::Other(_) => return,
        };

        debug!(
            identifier = %record.identifier,
            class = %record.class,
            "named entity individual"
        );

        state.seen.insert(text.to_string());
        state.records.push(record);
        state.summary.named_entity_records += 1;
    }
}

impl Default for ExtractionPipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Default)]
struct RunState {
    registry: IdentifierRegistry,
    records: Vec<IndividualRecord>,
    seen: HashSet<String>,
    summary: ExtractionSummary,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use heritage_core::{DateParseError, HeritageError, ObjectProperty};

    fn run(sentences: Vec<Sentence>) -> ExtractionRun {
        ExtractionPipeline::new().run(&AnnotatedDocument::from_sentences(sentences))
    }

    #[test]
    fn test_noun_phrase_individual() {
        let result = run(vec![Sentence::new(
            "The Et'hem Bey Mosque, located in Tirana, is known for its Ottoman style.",
        )
        .with_chunk("The Et'hem Bey Mosque")
        .with_chunk("Tirana")
        .with_chunk("its Ottoman style")
        .with_entity(EntitySpan::gpe("Tirana"))]);

        let mosque = &result.records[0];
        assert_eq!(mosque.identifier, "TheEt'hemBeyMosque");
        assert_eq!(mosque.class, OntologyClass::Mosque);
        assert_eq!(mosque.data(DataProperty::HasName), Some("The Et'hem Bey Mosque"));
        assert_eq!(mosque.data(DataProperty::HasArchitecturalStyle), Some("Islamic"));
        assert_eq!(mosque.data(DataProperty::HasCulturalContext), Some("Ottoman Period"));
        assert_eq!(mosque.object(ObjectProperty::LocatedIn), Some("Tirana"));

        // Tirana was not a classified noun chunk, so pass 2 picks it up
        let tirana = &result.records[1];
        assert_eq!(tirana.class, OntologyClass::City);
        assert_eq!(result.records.len(), 2);
    }

    #[test]
    fn test_first_sentence_wins() {
        let result = run(vec![
            Sentence::new("The ruins of a Roman theatre.").with_chunk("The ruins"),
            Sentence::new("The ruins were listed as national heritage.").with_chunk("The ruins"),
        ]);

        assert_eq!(result.records.len(), 1);
        let ruins = &result.records[0];
        assert_eq!(ruins.data(DataProperty::HasCulturalContext), Some("Roman Period"));
        assert_eq!(ruins.data(DataProperty::HasCulturalHeritageStatus), None);
        assert_eq!(result.summary.skipped_seen, 1);
    }

    #[test]
    fn test_same_identifier_within_sentence_keeps_first() {
        let result = run(vec![Sentence::new("The castle, the castle.")
            .with_chunk("The castle")
            .with_chunk("The  castle")]);

        assert_eq!(result.records.len(), 1);
        assert_eq!(result.records[0].data(DataProperty::HasName), Some("The castle"));
    }

    #[test]
    fn test_named_entity_pass_skips_seen_text() {
        let result = run(vec![Sentence::new("The city of Berat.")
            .with_chunk("The city")
            .with_chunk("Berat")
            .with_entity(EntitySpan::gpe("The city"))
            .with_entity(EntitySpan::gpe("Berat"))]);

        let classes: Vec<OntologyClass> = result.records.iter().map(|r| r.class).collect();
        assert_eq!(classes, vec![OntologyClass::AncientCity, OntologyClass::City]);
        assert_eq!(result.records[1].identifier, "Berat");
    }

    #[test]
    fn test_region_and_event_entities() {
        let result = run(vec![Sentence::new("Unrest spread in the Korçë Region.")
            .with_entity(EntitySpan::gpe("the Korçë Region"))
            .with_entity(EntitySpan::event("the Albanian National Awakening"))]);

        let region = &result.records[0];
        assert_eq!(region.class, OntologyClass::Region);
        assert_eq!(region.data(DataProperty::HasLocationType), Some("Region"));

        let event = &result.records[1];
        assert_eq!(event.class, OntologyClass::HistoricEvent);
        assert_eq!(event.identifier, "theAlbanianNationalAwakening");
        assert_eq!(event.data_properties.len(), 1);
    }

    #[test]
    fn test_date_entities() {
        let result = run(vec![Sentence::new("Declared in 1992 after the 1920s.")
            .with_entity(EntitySpan::date("1992"))
            .with_entity(EntitySpan::date("the 1920s"))]);

        let year = &result.records[0];
        assert_eq!(year.data(DataProperty::HasLabelDate), Some("1992"));
        assert_eq!(year.data(DataProperty::HasExactDate), Some("1992-01-01"));

        let decade = &result.records[1];
        assert_eq!(decade.data(DataProperty::HasLabelDate), Some("the 1920s"));
        assert_eq!(decade.data(DataProperty::HasExactDate), None);
    }

    struct RejectAll;

    impl DateParser for RejectAll {
        fn parse_strict(&self, text: &str) -> std::result::Result<chrono::NaiveDate, DateParseError> {
            Err(DateParseError::Unrecognized(text.to_string()))
        }
    }

    #[test]
    fn test_custom_date_parser() {
        let pipeline = ExtractionPipeline::new().with_date_parser(RejectAll);
        let doc = AnnotatedDocument::from_sentences(vec![
            Sentence::new("In 1992.").with_entity(EntitySpan::date("1992"))
        ]);

        let result = pipeline.run(&doc);
        assert_eq!(result.records[0].data(DataProperty::HasExactDate), None);
        assert_eq!(result.records[0].data(DataProperty::HasLabelDate), Some("1992"));
    }

    /// Treats every noun chunk as a monastery and ignores places
    struct MonasteriesOnly;

    impl SpanClassifier for MonasteriesOnly {
        fn classify(&self, _text: &str, label: Option<&EntityLabel>) -> Option<OntologyClass> {
            label.is_none().then_some(OntologyClass::Monastery)
        }
    }

    #[test]
    fn test_custom_classifier() {
        let pipeline = ExtractionPipeline::new().with_classifier(MonasteriesOnly);
        let doc = AnnotatedDocument::from_sentences(vec![Sentence::new(
            "Stone walls surround Ardenica.",
        )
        .with_chunk("Stone walls")
        .with_chunk("Ardenica")]);

        let result = pipeline.run(&doc);
        let classes: Vec<OntologyClass> = result.records.iter().map(|r| r.class).collect();
        assert_eq!(classes, vec![OntologyClass::Monastery, OntologyClass::Monastery]);
        assert_eq!(result.summary.unclassified, 0);
    }

    struct FailingEngine;

    impl NlpEngine for FailingEngine {
        fn annotate(&self, _text: &str) -> Result<AnnotatedDocument> {
            Err(HeritageError::Annotation("model not loaded".to_string()))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    #[test]
    fn test_annotation_failure_propagates() {
        let err = ExtractionPipeline::new()
            .extract_text(&FailingEngine, "The castle of Berat.")
            .unwrap_err();

        assert!(matches!(err, HeritageError::Annotation(ref msg) if msg == "model not loaded"));
        assert_eq!(err.to_string(), "Annotation failed: model not loaded");
    }

    struct OffsetPastEnd;

    impl NlpEngine for OffsetPastEnd {
        fn annotate(&self, text: &str) -> Result<AnnotatedDocument> {
            Ok(AnnotatedDocument {
                text: text.to_string(),
                sentences: vec![Sentence::new(text)],
                entities: vec![EntitySpan::new("Berat", EntityLabel::Gpe, 0, text.len() + 5)],
            })
        }

        fn name(&self) -> &str {
            "offset-past-end"
        }
    }

    #[test]
    fn test_engine_output_is_validated() {
        let result = ExtractionPipeline::new().extract_text(&OffsetPastEnd, "Berat");
        assert!(matches!(result, Err(HeritageError::InvalidDocument(_))));
    }

    #[test]
    fn test_repeated_entity_creates_one_individual() {
        let result = run(vec![
            Sentence::new("Albania is small.").with_entity(EntitySpan::gpe("Albania")),
            Sentence::new("Berat is in Albania.")
                .with_entity(EntitySpan::gpe("Berat"))
                .with_entity(EntitySpan::gpe("Albania")),
        ]);

        let names: Vec<&str> = result.records.iter().map(|r| r.identifier.as_str()).collect();
        assert_eq!(names, vec!["Albania", "Berat"]);
        assert_eq!(result.summary.skipped_seen, 1);
    }

    #[test]
    fn test_other_labels_are_ignored() {
        let result = run(vec![Sentence::new("Ali Pasha expanded it.")
            .with_entity(EntitySpan::new("Ali Pasha", "PERSON", 0, 9))]);
        assert!(result.records.is_empty());
    }

    #[test]
    fn test_collision_is_reported() {
        let result = run(vec![
            Sentence::new("St. Nicholas shrine.").with_chunk("St. Nicholas shrine"),
            Sentence::new("St Nicholas shrine again.").with_chunk("St Nicholas shrine"),
        ]);

        assert_eq!(result.records.len(), 2);
        assert_eq!(result.summary.collisions, 1);
        assert_eq!(result.registry.collisions()[0].identifier, "StNicholasshrine");
    }

    #[test]
    fn test_summary_counts() {
        let result = run(vec![Sentence::new("The mosque and stone walls in Berat.")
            .with_chunk("The mosque")
            .with_chunk("stone walls")
            .with_entity(EntitySpan::gpe("Berat"))]);

        assert_eq!(result.summary.sentences, 1);
        assert_eq!(result.summary.noun_phrase_records, 1);
        assert_eq!(result.summary.named_entity_records, 1);
        assert_eq!(result.summary.unclassified, 1);
        assert_eq!(result.summary.per_class[&OntologyClass::Mosque], 1);
        assert_eq!(result.summary.total(), 2);
    }

    #[test]
    fn test_runs_do_not_share_registry() {
        let pipeline = ExtractionPipeline::new();
        let doc = AnnotatedDocument::from_sentences(vec![
            Sentence::new("Butrint.").with_entity(EntitySpan::gpe("Butrint"))
        ]);

        let first = pipeline.run(&doc);
        let second = pipeline.run(&doc);
        assert_eq!(first.registry.len(), 1);
        assert_eq!(second.registry.len(), 1);
        assert!(second.registry.collisions().is_empty());
        assert_ne!(first.run_id, second.run_id);
    }
}
