//! Attribute enrichment
//!
//! Extracts data-property values from the sentence an entity was found in.
//! Each rule group looks at the whole lower-cased sentence and yields at
//! most one value. Groups are independent: "roman" feeds both the
//! architectural style and the cultural context.

use std::collections::BTreeMap;

use heritage_core::{DataProperty, OntologyClass};

/// Fixed value for the cultural significance group
pub const CULTURAL_SIGNIFICANCE: &str = "Important cultural monument";

/// Keyword alternatives mapped to a value; first entry that matches wins
type KeywordTable = &'static [(&'static [&'static str], &'static str)];

const RELIGION: KeywordTable = &[
    (&["orthodox"], "Orthodox Christianity"),
    (&["catholic"], "Catholicism"),
    (&["islamic", "muslim"], "Islam"),
];

const ARCHITECTURAL_STYLE: KeywordTable = &[
    (&["byzantine"], "Byzantine"),
    (&["islamic architecture", "ottoman"], "Islamic"),
    (&["roman"], "Roman"),
];

const CULTURAL_CONTEXT: KeywordTable = &[
    (&["medieval"], "Medieval Period"),
    (&["byzantine era", "byzantine rule"], "Byzantine Period"),
    (&["roman"], "Roman Period"),
    (&["ottoman"], "Ottoman Period"),
];

const SIGNIFICANCE_KEYWORDS: &[&str] = &["symbol", "represents", "important"];

const HERITAGE_STATUS: KeywordTable = &[
    (&["unesco"], "UNESCO World Heritage Site"),
    (&["national heritage"], "National Heritage"),
];

const CREATOR_TRIGGERS: &[&str] = &["commissioned by", "built by"];

fn first_match(text: &str, table: KeywordTable) -> Option<String> {
    table
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| text.contains(k)))
        .map(|(_, value)| value.to_string())
}

// ============================================================================
// Rule groups
// ============================================================================

/// Religion, only meaningful for religious buildings
pub fn religion(text: &str, class: OntologyClass) -> Option<String> {
    if !class.is_religious_building() {
        return None;
    }
    first_match(text, RELIGION)
}

pub fn architectural_style(text: &str) -> Option<String> {
    first_match(text, ARCHITECTURAL_STYLE)
}

pub fn cultural_context(text: &str) -> Option<String> {
    first_match(text, CULTURAL_CONTEXT)
}

pub fn cultural_significance(text: &str) -> Option<String> {
    SIGNIFICANCE_KEYWORDS
        .iter()
        .any(|k| text.contains(k))
        .then(|| CULTURAL_SIGNIFICANCE.to_string())
}

pub fn heritage_status(text: &str) -> Option<String> {
    first_match(text, HERITAGE_STATUS)
}

/// Creator named after "commissioned by", or else after "built by".
///
/// Only the first trigger present is tried. The name runs up to the next
/// period; without one, or with nothing before it, there is no creator.
pub fn creator(text: &str) -> Option<String> {
    let trigger = CREATOR_TRIGGERS.iter().find(|t| text.contains(*t))?;
    let (_, after) = text.split_once(trigger)?;
    let (name, _) = after.split_once('.')?;
    let name = name.trim();

    if name.is_empty() {
        None
    } else {
        Some(title_case(name))
    }
}

/// Year of rediscovery: the token after the first "in" following
/// "rediscovered", kept only when it is all digits
pub fn date_of_discovery(text: &str) -> Option<String> {
    let (_, after) = text.split_once("rediscovered")?;
    let mut tokens = after.split_whitespace().skip_while(|t| *t != "in");
    tokens.next()?;
    let year = tokens.next()?;

    if year.chars().all(|c| c.is_ascii_digit()) {
        Some(year.to_string())
    } else {
        None
    }
}

/// Upper-case letters that follow a non-letter, lower-case the rest
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut previous_is_letter = false;

    for c in text.chars() {
        if c.is_alphabetic() {
            if previous_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            previous_is_letter = true;
        } else {
            out.push(c);
            previous_is_letter = false;
        }
    }

    out
}

// ============================================================================
// Enricher
// ============================================================================

/// Runs every rule group against a sentence
#[derive(Debug, Clone, Default)]
pub struct AttributeEnricher;

impl AttributeEnricher {
    pub fn new() -> Self {
        Self
    }

    /// Data properties suggested by `sentence` for an entity of `class`
    pub fn enrich(&self, sentence: &str, class: OntologyClass) -> BTreeMap<DataProperty, String> {
        let text = sentence.to_lowercase();

        let groups = [
            (DataProperty::HasReligion, religion(&text, class)),
            (DataProperty::HasArchitecturalStyle, architectural_style(&text)),
            (DataProperty::HasCreator, creator(&text)),
            (DataProperty::HasCulturalContext, cultural_context(&text)),
            (DataProperty::HasCulturalSignificance, cultural_significance(&text)),
            (DataProperty::HasCulturalHeritageStatus, heritage_status(&text)),
            (DataProperty::HasDateOfDiscovery, date_of_discovery(&text)),
        ];

        groups
            .into_iter()
            .filter_map(|(property, value)| value.map(|v| (property, v)))
            .collect()
    }
}

// ============================================================================
// Tests
// ============================================================================
