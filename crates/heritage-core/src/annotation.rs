//! Linguistic annotations supplied by an NLP engine
//!
//! The extraction pipeline does not segment or tag text itself. It consumes
//! an [`AnnotatedDocument`]: sentences, noun-phrase spans and named-entity
//! spans with coarse labels. Annotations can come from any [`NlpEngine`]
//! implementation or be deserialized from JSON produced elsewhere.

use serde::{Deserialize, Serialize};

use crate::{HeritageError, Result};

/// Coarse named-entity label
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EntityLabel {
    /// Geo-political entity (country, city, region)
    Gpe,
    Date,
    Event,
    /// Any other label; ignored by extraction rules
    Other(String),
}

impl EntityLabel {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Gpe => "GPE",
            Self::Date => "DATE",
            Self::Event => "EVENT",
            Self::Other(label) => label,
        }
    }
}

impl From<String> for EntityLabel {
    fn from(label: String) -> Self {
        match label.as_str() {
            "GPE" => Self::Gpe,
            "DATE" => Self::Date,
            "EVENT" => Self::Event,
            _ => Self::Other(label),
        }
    }
}

impl From<&str> for EntityLabel {
    fn from(label: &str) -> Self {
        Self::from(label.to_string())
    }
}

impl From<EntityLabel> for String {
    fn from(label: EntityLabel) -> Self {
        label.as_str().to_string()
    }
}

impl std::fmt::Display for EntityLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A span of the document text (byte offsets)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub text: String,
    #[serde(default)]
    pub start: usize,
    #[serde(default)]
    pub end: usize,
}

impl Span {
    pub fn new(text: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            text: text.into(),
            start,
            end,
        }
    }

    /// Span without offsets, for hand-built annotations
    pub fn text(text: impl Into<String>) -> Self {
        Self::new(text, 0, 0)
    }
}

/// A labelled named-entity span
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySpan {
    pub text: String,
    pub label: EntityLabel,
    #[serde(default)]
    pub start: usize,
    #[serde(default)]
    pub end: usize,
}

impl EntitySpan {
    pub fn new(text: impl Into<String>, label: impl Into<EntityLabel>, start: usize, end: usize) -> Self {
        Self {
            text: text.into(),
            label: label.into(),
            start,
            end,
        }
    }

    pub fn gpe(text: impl Into<String>) -> Self {
        Self::new(text, EntityLabel::Gpe, 0, 0)
    }

    pub fn date(text: impl Into<String>) -> Self {
        Self::new(text, EntityLabel::Date, 0, 0)
    }

    pub fn event(text: impl Into<String>) -> Self {
        Self::new(text, EntityLabel::Event, 0, 0)
    }
}

/// One sentence with its noun phrases and named entities
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sentence {
    pub text: String,
    #[serde(default)]
    pub start: usize,
    #[serde(default)]
    pub end: usize,
    #[serde(default)]
    pub noun_chunks: Vec<Span>,
    #[serde(default)]
    pub entities: Vec<EntitySpan>,
}

impl Sentence {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn with_chunk(mut self, chunk: impl Into<String>) -> Self {
        self.noun_chunks.push(Span::text(chunk));
        self
    }

    pub fn with_entity(mut self, entity: EntitySpan) -> Self {
        self.entities.push(entity);
        self
    }
}

/// A fully annotated document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotatedDocument {
    #[serde(default)]
    pub text: String,
    pub sentences: Vec<Sentence>,
    /// Document-level entities in document order
    #[serde(default)]
    pub entities: Vec<EntitySpan>,
}

impl AnnotatedDocument {
    /// Build a document whose entity list is the concatenation of the
    /// sentence entities
    pub fn from_sentences(sentences: Vec<Sentence>) -> Self {
        let entities = sentences
            .iter()
            .flat_map(|s| s.entities.iter().cloned())
            .collect();
        let text = sentences
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        Self {
            text,
            sentences,
            entities,
        }
    }

    /// Parse annotations from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let document: Self = serde_json::from_str(json)
            .map_err(|e| HeritageError::Serialization(e.to_string()))?;
        document.validate()?;
        Ok(document)
    }

    /// Check span offsets against the text when offsets are present.
    ///
    /// Every sentence, noun chunk and entity must lie inside the text and
    /// start and end on character boundaries.
    pub fn validate(&self) -> Result<()> {
        if self.text.is_empty() {
            return Ok(());
        }

        let sentence_spans = self.sentences.iter().flat_map(|s| {
            std::iter::once((s.start, s.end))
                .chain(s.noun_chunks.iter().map(|c| (c.start, c.end)))
                .chain(s.entities.iter().map(|e| (e.start, e.end)))
        });
        let spans = sentence_spans.chain(self.entities.iter().map(|e| (e.start, e.end)));

        for (start, end) in spans {
            if start > end || end > self.text.len() {
                return Err(HeritageError::InvalidDocument(format!(
                    "span {start}..{end} outside text of length {}",
                    self.text.len()
                )));
            }
            if !self.text.is_char_boundary(start) || !self.text.is_char_boundary(end) {
                return Err(HeritageError::InvalidDocument(format!(
                    "span {start}..{end} splits a character"
                )));
            }
        }

        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty() && self.entities.is_empty()
    }
}

/// Natural-language engine producing annotations for raw text
pub trait NlpEngine: Send + Sync {
    /// Segment and tag `text`
    fn annotate(&self, text: &str) -> Result<AnnotatedDocument>;

    /// Engine name for logging
    fn name(&self) -> &str;
}
