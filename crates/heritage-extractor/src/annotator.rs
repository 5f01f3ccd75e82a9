//! Rule-based annotator
//!
//! A lightweight [`NlpEngine`] for running the pipeline on raw text without
//! an external language model:
//! - Sentences: split on terminal punctuation, guarding abbreviations and initials
//! - Noun chunks: runs of content words between function words and punctuation
//! - Entities: regex patterns (dates, events, regions) + a place gazetteer
//!
//! It trades recall for predictability. Feed annotations from a real engine
//! through [`AnnotatedDocument::from_json`] when quality matters.

use regex::Regex;

use heritage_core::config::AnnotatorConfig;
use heritage_core::{AnnotatedDocument, EntityLabel, EntitySpan, NlpEngine, Result, Sentence, Span};

const MONTHS: &str =
    "January|February|March|April|May|June|July|August|September|October|November|December";

/// Words that end a sentence only in appearance
const ABBREVIATIONS: &[&str] = &[
    "st", "mt", "mr", "mrs", "ms", "dr", "prof", "rev", "fr", "ca", "c", "no", "vol", "etc",
    "e.g", "i.e", "approx", "jr", "sr",
];

/// Words that start a new noun chunk
const DETERMINERS: &[&str] = &[
    "the", "a", "an", "this", "these", "those", "its", "their", "his", "her", "our", "each",
    "every", "some", "many", "several",
];

/// Function words and common verbs that separate noun chunks
const BOUNDARY_WORDS: &[&str] = &[
    // Prepositions
    "of", "in", "on", "at", "by", "for", "with", "near", "during", "under", "into", "from", "to",
    "as", "after", "before", "since", "until", "over", "between", "through", "within", "without",
    "about", "against", "among", "around", "across", "toward", "towards", "upon", "due",
    // Conjunctions and relatives
    "and", "or", "but", "nor", "yet", "so", "while", "whereas", "because", "although", "though",
    "if", "when", "where", "which", "who", "whom", "whose", "that",
    // Pronouns
    "it", "he", "she", "they", "we", "i", "you", "them", "him", "us", "itself",
    // Auxiliaries and frequent verbs
    "is", "are", "was", "were", "be", "been", "being", "am", "has", "have", "had", "do", "does",
    "did", "can", "could", "will", "would", "shall", "should", "may", "might", "must", "built",
    "became", "become", "becomes", "remains", "remain", "features", "feature", "includes",
    "include", "dominates", "serves", "plays", "represents", "represent", "reflects", "date",
    "dates", "stands", "lies", "known", "made", "began", "begun", "grew", "holds", "held",
    "contains", "houses",
    // Adverbs
    "also", "later", "still", "then", "now", "back", "not", "only", "very", "more", "most",
    "initially", "originally", "often",
];

/// Regex and dictionary driven annotator
pub struct RuleBasedAnnotator {
    /// Entity patterns (regex -> label)
    patterns: Vec<(Regex, EntityLabel)>,
    /// Whole-word place names
    gazetteer: Option<Regex>,
    sentence_end: Regex,
    token: Regex,
}

impl RuleBasedAnnotator {
    /// Create an annotator with the default gazetteer
    pub fn new() -> Self {
        Self::with_config(&AnnotatorConfig::default())
    }

    pub fn with_config(config: &AnnotatorConfig) -> Self {
        let mut annotator = Self {
            patterns: Vec::new(),
            gazetteer: None,
            sentence_end: Regex::new(r#"[.!?]+["'”’)\]]*"#).expect("valid sentence regex"),
            token: Regex::new(r"[\p{L}\p{N}][\p{L}\p{N}'’\-]*|[^\s\p{L}\p{N}]")
                .expect("valid token regex"),
        };

        annotator.init_patterns();
        annotator.set_places(&config.places);
        annotator
    }

    /// Initialize entity patterns
    fn init_patterns(&mut self) {
        // Dates
        self.add_pattern(
            r"(?:\b(?i:the)\s+)?(?:(?:early|late|mid)[\s-]+)?\d{1,2}(?:st|nd|rd|th)[\s-]centur(?:y|ies)(?:\s+(?:BC|AD|BCE|CE)\b)?",
            EntityLabel::Date,
        );
        self.add_pattern(r"(?:\b(?i:the)\s+)?\b\d{3,4}s\b", EntityLabel::Date);
        self.add_pattern(
            &format!(r"\b(?:{MONTHS})\s+\d{{1,2}},?\s+\d{{4}}\b"),
            EntityLabel::Date,
        );
        self.add_pattern(
            &format!(r"\b\d{{1,2}}\s+(?:{MONTHS}),?\s+\d{{4}}\b"),
            EntityLabel::Date,
        );
        self.add_pattern(&format!(r"\b(?:{MONTHS})\s+\d{{4}}\b"), EntityLabel::Date);
        self.add_pattern(r"\b\d{4}[-/]\d{2}[-/]\d{2}\b", EntityLabel::Date);
        self.add_pattern(r"\b\d{1,2}/\d{1,2}/\d{4}\b", EntityLabel::Date);
        self.add_pattern(r"\b(?:1\d|20)\d{2}\b", EntityLabel::Date);

        // Events
        self.add_pattern(
            r"(?:\b(?i:the)\s+)?(?:\p{Lu}[\p{L}'’]*\s+)+(?:War|Wars|Awakening|Uprising|Revolution|Rebellion|Revolt)\b",
            EntityLabel::Event,
        );
        self.add_pattern(
            r"(?:\b(?i:the)\s+)?Battle\s+of\s+\p{Lu}\p{L}*",
            EntityLabel::Event,
        );

        // Regions
        self.add_pattern(
            r"(?:\b(?i:the)\s+)?(?:\p{Lu}\p{L}*\s+)+Region\b",
            EntityLabel::Gpe,
        );
    }

    /// Add a regex pattern
    fn add_pattern(&mut self, pattern: &str, label: EntityLabel) {
        if let Ok(regex) = Regex::new(pattern) {
            self.patterns.push((regex, label));
        }
    }

    /// Replace the place gazetteer
    pub fn set_places(&mut self, places: &[String]) {
        let mut names: Vec<&str> = places
            .iter()
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .collect();
        if names.is_empty() {
            self.gazetteer = None;
            return;
        }

        // Alternation is leftmost-first, so longer names go first
        names.sort_by(|a, b| b.len().cmp(&a.len()));
        let alternation = names
            .iter()
            .map(|n| regex::escape(n))
            .collect::<Vec<_>>()
            .join("|");
        self.gazetteer = Regex::new(&format!(r"\b(?:{alternation})\b")).ok();
    }

    // ========================================================================
    // Sentences
    // ========================================================================

    /// Byte ranges of sentences, trimmed of surrounding whitespace
    pub fn segment(&self, text: &str) -> Vec<(usize, usize)> {
        let mut sentences = Vec::new();
        let mut start = 0;

        for mat in self.sentence_end.find_iter(text) {
            let end = mat.end();
            if !self.is_sentence_boundary(text, start, mat.start(), end) {
                continue;
            }
            if let Some(range) = trim_range(text, start, end) {
                sentences.push(range);
            }
            start = end;
        }

        if let Some(range) = trim_range(text, start, text.len()) {
            sentences.push(range);
        }

        sentences
    }

    fn is_sentence_boundary(&self, text: &str, start: usize, punct: usize, end: usize) -> bool {
        let rest = &text[end..];

        // Must be followed by whitespace or the end of the text
        match rest.chars().next() {
            None => return true,
            Some(c) if !c.is_whitespace() => return false,
            _ => {}
        }

        // The next sentence does not start in lower case
        if let Some(next) = rest.trim_start().chars().next() {
            if next.is_lowercase() {
                return false;
            }
        }

        let before = text[start..punct]
            .rsplit(char::is_whitespace)
            .next()
            .unwrap_or("")
            .trim_start_matches(|c: char| !c.is_alphanumeric());

        let is_initial = before.chars().count() == 1
            && before.chars().all(|c| c.is_uppercase());
        let is_abbreviation = ABBREVIATIONS.contains(&before.to_lowercase().as_str());

        !(is_initial || is_abbreviation)
    }

    // ========================================================================
    // Noun chunks
    // ========================================================================

    /// Noun chunks of a sentence; `offset` is the sentence start in the document
    pub fn noun_chunks(&self, sentence: &str, offset: usize) -> Vec<Span> {
        let mut chunks = Vec::new();
        // (start, end, has a content word)
        let mut current: Option<(usize, usize, bool)> = None;

        for mat in self.token.find_iter(sentence) {
            let token = mat.as_str();
            let lower = token.to_lowercase();
            let is_word = token.chars().next().is_some_and(char::is_alphanumeric);

            if !is_word || is_boundary_word(token, &lower) {
                flush_chunk(&mut current, &mut chunks, sentence, offset);
                continue;
            }

            if DETERMINERS.contains(&lower.as_str()) {
                flush_chunk(&mut current, &mut chunks, sentence, offset);
                current = Some((mat.start(), mat.end(), false));
                continue;
            }

            match current.as_mut() {
                Some(chunk) => {
                    chunk.1 = mat.end();
                    chunk.2 = true;
                }
                None => current = Some((mat.start(), mat.end(), true)),
            }
        }

        flush_chunk(&mut current, &mut chunks, sentence, offset);
        chunks
    }

    // ========================================================================
    // Entities
    // ========================================================================

    /// Extract entities using pattern matching and the gazetteer
    pub fn entities(&self, text: &str) -> Vec<EntitySpan> {
        let mut entities = Vec::new();

        for (regex, label) in &self.patterns {
            for mat in regex.find_iter(text) {
                entities.push(EntitySpan::new(mat.as_str(), label.clone(), mat.start(), mat.end()));
            }
        }

        if let Some(gazetteer) = &self.gazetteer {
            for mat in gazetteer.find_iter(text) {
                entities.push(EntitySpan::new(mat.as_str(), EntityLabel::Gpe, mat.start(), mat.end()));
            }
        }

        self.deduplicate(entities)
    }

    /// Remove overlapping entities, keeping the longest span at each start
    fn deduplicate(&self, mut entities: Vec<EntitySpan>) -> Vec<EntitySpan> {
        // Sort by start position, then by length (descending)
        entities.sort_by(|a, b| {
            a.start
                .cmp(&b.start)
                .then((b.end - b.start).cmp(&(a.end - a.start)))
        });

        let mut result: Vec<EntitySpan> = Vec::new();
        let mut covered_until = 0;

        for entity in entities {
            if result.is_empty() || entity.start >= covered_until {
                covered_until = entity.end;
                result.push(entity);
            }
        }

        result
    }
}

impl Default for RuleBasedAnnotator {
    fn default() -> Self {
        Self::new()
    }
}

impl NlpEngine for RuleBasedAnnotator {
    fn annotate(&self, text: &str) -> Result<AnnotatedDocument> {
        let entities = self.entities(text);

        let sentences = self
            .segment(text)
            .into_iter()
            .map(|(start, end)| {
                let sentence_text = &text[start..end];
                Sentence {
                    text: sentence_text.to_string(),
                    start,
                    end,
                    noun_chunks: self.noun_chunks(sentence_text, start),
                    entities: entities
                        .iter()
                        .filter(|e| e.start >= start && e.end <= end)
                        .cloned()
                        .collect(),
                }
            })
            .collect();

        Ok(AnnotatedDocument {
            text: text.to_string(),
            sentences,
            entities,
        })
    }

    fn name(&self) -> &str {
        "rule-based"
    }
}

fn is_boundary_word(token: &str, lower: &str) -> bool {
    if BOUNDARY_WORDS.contains(&lower) {
        return true;
    }
    // Lower-case past participles ("located", "dedicated") separate chunks
    let starts_lower = token.chars().next().is_some_and(char::is_lowercase);
    starts_lower && lower.len() > 4 && lower.ends_with("ed")
}

fn flush_chunk(
    current: &mut Option<(usize, usize, bool)>,
    chunks: &mut Vec<Span>,
    sentence: &str,
    offset: usize,
) {
    if let Some((start, end, has_content)) = current.take() {
        if has_content {
            chunks.push(Span::new(&sentence[start..end], offset + start, offset + end));
        }
    }
}

fn trim_range(text: &str, start: usize, end: usize) -> Option<(usize, usize)> {
    let slice = &text[start..end];
    let trimmed_start = start + (slice.len() - slice.trim_start().len());
    let trimmed_end = end - (slice.len() - slice.trim_end().len());

    (trimmed_start < trimmed_end).then_some((trimmed_start, trimmed_end))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk_texts(annotator: &RuleBasedAnnotator, sentence: &str) -> Vec<String> {
        annotator
            .noun_chunks(sentence, 0)
            .into_iter()
            .map(|s| s.text)
            .collect()
    }

    #[test]
    fn test_segment_sentences() {
        let annotator = RuleBasedAnnotator::new();
        let text = "The castle stands on a hill. It was restored in 1960!  Visitors come daily.";
        let sentences: Vec<&str> = annotator
            .segment(text)
            .into_iter()
            .map(|(s, e)| &text[s..e])
            .collect();

        assert_eq!(
            sentences,
            vec![
                "The castle stands on a hill.",
                "It was restored in 1960!",
                "Visitors come daily."
            ]
        );
    }

    #[test]
    fn test_segment_guards_abbreviations() {
        let annotator = RuleBasedAnnotator::new();
        let text = "The Church of St. Nicholas was painted by David Selenica. Luigi M. Ugolini excavated Butrint.";
        let sentences = annotator.segment(text);

        assert_eq!(sentences.len(), 2);
        assert_eq!(
            &text[sentences[0].0..sentences[0].1],
            "The Church of St. Nicholas was painted by David Selenica."
        );
    }

    #[test]
    fn test_segment_without_final_period() {
        let annotator = RuleBasedAnnotator::new();
        assert_eq!(annotator.segment("  Berat  ").len(), 1);
        assert!(annotator.segment("   ").is_empty());
    }

    #[test]
    fn test_noun_chunks() {
        let annotator = RuleBasedAnnotator::new();
        let chunks = chunk_texts(
            &annotator,
            "The Orthodox Church of Saint Nicholas, located in the city of Voskopoja, was built in the 18th century.",
        );

        assert_eq!(
            chunks,
            vec![
                "The Orthodox Church",
                "Saint Nicholas",
                "the city",
                "Voskopoja",
                "the 18th century"
            ]
        );
    }

    #[test]
    fn test_noun_chunks_keep_possessives() {
        let annotator = RuleBasedAnnotator::new();
        let chunks = chunk_texts(
            &annotator,
            "It is a symbol of Albania's Christian cultural identity.",
        );

        assert_eq!(
            chunks,
            vec!["a symbol", "Albania's Christian cultural identity"]
        );
    }

    #[test]
    fn test_chunk_offsets_are_document_relative() {
        let annotator = RuleBasedAnnotator::new();
        let chunks = annotator.noun_chunks("The mosque.", 100);
        assert_eq!(chunks[0].start, 100);
        assert_eq!(chunks[0].end, 110);
    }

    #[test]
    fn test_entities() {
        let annotator = RuleBasedAnnotator::new();
        let text = "Butrint, in southern Albania, was declared a UNESCO site in 1992. \
                    It was rediscovered in the 1920s, long after the 7th century BC.";
        let entities = annotator.entities(text);

        let found: Vec<(&str, &EntityLabel)> =
            entities.iter().map(|e| (e.text.as_str(), &e.label)).collect();
        assert_eq!(
            found,
            vec![
                ("Butrint", &EntityLabel::Gpe),
                ("Albania", &EntityLabel::Gpe),
                ("1992", &EntityLabel::Date),
                ("the 1920s", &EntityLabel::Date),
                ("the 7th century BC", &EntityLabel::Date),
            ]
        );
    }

    #[test]
    fn test_events_and_regions() {
        let annotator = RuleBasedAnnotator::new();
        let text = "It played a role during the Albanian National Awakening in the Korçë Region.";
        let entities = annotator.entities(text);

        assert_eq!(entities[0].text, "the Albanian National Awakening");
        assert_eq!(entities[0].label, EntityLabel::Event);
        assert_eq!(entities[1].text, "the Korçë Region");
        assert_eq!(entities[1].label, EntityLabel::Gpe);
        assert_eq!(entities.len(), 2);
    }

    #[test]
    fn test_longest_overlap_wins() {
        let annotator = RuleBasedAnnotator::new();
        let entities = annotator.entities("Independence was declared on November 28, 1912.");

        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].text, "November 28, 1912");
    }

    #[test]
    fn test_numeric_dates() {
        let annotator = RuleBasedAnnotator::new();
        let entities = annotator.entities("Repaired on 11/28/1912 and again on 1960/05/02.");

        let found: Vec<&str> = entities.iter().map(|e| e.text.as_str()).collect();
        assert_eq!(found, vec!["11/28/1912", "1960/05/02"]);
        assert!(entities.iter().all(|e| e.label == EntityLabel::Date));
    }

    #[test]
    fn test_custom_gazetteer() {
        let config = AnnotatorConfig {
            places: vec!["Ohrid".to_string()],
        };
        let annotator = RuleBasedAnnotator::with_config(&config);
        let entities = annotator.entities("Ohrid and Tirana.");

        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].text, "Ohrid");
    }

    #[test]
    fn test_annotate_assigns_entities_to_sentences() {
        let annotator = RuleBasedAnnotator::new();
        let doc = annotator
            .annotate("The Et'hem Bey Mosque is in Tirana. Berat lies in Albania.")
            .unwrap();

        assert_eq!(doc.sentences.len(), 2);
        assert_eq!(doc.sentences[0].entities.len(), 1);
        assert_eq!(doc.sentences[0].entities[0].text, "Tirana");
        assert_eq!(doc.sentences[1].entities.len(), 2);
        assert_eq!(doc.entities.len(), 3);
        assert!(doc.validate().is_ok());
    }
}
