//! Triple assembly
//!
//! Converts individual records into triples, emitting only the properties
//! the class schema declares, in schema order. Records may carry more than
//! that; the surplus is dropped here.

use heritage_core::{normalize_identifier, IndividualRecord, Predicate, Term, Triple};
use tracing::trace;

/// Schema-driven record to triple conversion
#[derive(Debug, Clone, Default)]
pub struct TripleAssembler;

impl TripleAssembler {
    pub fn new() -> Self {
        Self
    }

    /// Triples for one record: the type triple first, then data properties,
    /// then object properties
    pub fn assemble_record(&self, record: &IndividualRecord) -> Vec<Triple> {
        let schema = record.class.schema();
        let mut triples = vec![Triple::type_of(&record.identifier, record.class)];

        for &property in schema.data_properties {
            if let Some(value) = record.data(property).filter(|v| !v.is_empty()) {
                triples.push(Triple::literal(&record.identifier, property, value));
            }
        }

        for &property in schema.object_properties {
            if let Some(label) = record.object(property).filter(|v| !v.is_empty()) {
                triples.push(Triple::link(
                    &record.identifier,
                    property,
                    normalize_identifier(label),
                ));
            }
        }

        let dropped = record
            .data_properties
            .keys()
            .filter(|p| !schema.allows_data(**p))
            .count()
            + record
                .object_properties
                .keys()
                .filter(|p| !schema.allows_object(**p))
                .count();
        if dropped > 0 {
            trace!(identifier = %record.identifier, dropped, "properties outside schema dropped");
        }

        triples
    }

    /// Triples for all records, in record order
    pub fn assemble(&self, records: &[IndividualRecord]) -> Vec<Triple> {
        records
            .iter()
            .flat_map(|record| self.assemble_record(record))
            .collect()
    }
}

// ============================================================================
// Turtle
// ============================================================================

/// Default IRI bound to the empty prefix
pub const DEFAULT_BASE_IRI: &str = "http://www.semanticweb.org/ana/ontologies/2025/4/albania/";

const RDF_IRI: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";

/// Renders assembled records as Turtle blocks
#[derive(Debug, Clone)]
pub struct TurtleWriter {
    base_iri: String,
    assembler: TripleAssembler,
}

impl TurtleWriter {
    pub fn new(base_iri: impl Into<String>) -> Self {
        Self {
            base_iri: base_iri.into(),
            assembler: TripleAssembler::new(),
        }
    }

    /// Prefix declarations followed by a blank line
    pub fn header(&self) -> String {
        format!(
            "@prefix : <{}>  .\n@prefix rdf: <{}> .\n\n",
            self.base_iri, RDF_IRI
        )
    }

    /// One `:subject rdf:type :Class ; ... .` block
    pub fn block(&self, record: &IndividualRecord) -> String {
        let triples = self.assembler.assemble_record(record);
        let type_line = format!(
            "{} rdf:type :{}",
            self.individual(&record.identifier),
            record.class
        );

        let properties: Vec<String> = triples
            .iter()
            .filter(|t| t.predicate != Predicate::Type)
            .map(|t| format!("    {} {}", t.predicate.prefixed(), self.render_term(&t.object)))
            .collect();

        if properties.is_empty() {
            format!("{type_line} .")
        } else {
            format!("{type_line} ;\n{} .", properties.join(" ;\n"))
        }
    }

    /// Full document: header then one block per record
    pub fn document(&self, records: &[IndividualRecord]) -> String {
        let mut out = self.header();
        for record in records {
            out.push_str(&self.block(record));
            out.push_str("\n\n");
        }
        out
    }

    fn render_term(&self, term: &Term) -> String {
        match term {
            Term::Class(class) => format!(":{class}"),
            Term::Literal(value) => turtle_string(value),
            Term::Individual(identifier) => self.individual(identifier),
        }
    }

    /// `:local` name when the identifier can be written as one, a full IRI
    /// otherwise
    fn individual(&self, identifier: &str) -> String {
        match local_name(identifier) {
            Some(local) => format!(":{local}"),
            None => format!("<{}{}>", self.base_iri, iri_escape(identifier)),
        }
    }
}

impl Default for TurtleWriter {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_IRI)
    }
}

/// Characters a local name may carry behind a backslash
const LOCAL_ESCAPES: &[char] = &[
    '_', '~', '.', '-', '!', '$', '&', '\'', '(', ')', '*', '+', ',', ';', '=', '/', '?', '#',
    '@', '%',
];

fn is_name_start_char(c: char) -> bool {
    c.is_ascii_alphabetic()
        || c == '_'
        || matches!(c as u32,
            0xC0..=0xD6
            | 0xD8..=0xF6
            | 0xF8..=0x2FF
            | 0x370..=0x37D
            | 0x37F..=0x1FFF
            | 0x200C..=0x200D
            | 0x2070..=0x218F
            | 0x2C00..=0x2FEF
            | 0x3001..=0xD7FF
            | 0xF900..=0xFDCF
            | 0xFDF0..=0xFFFD
            | 0x10000..=0xEFFFF)
}

fn is_name_char(c: char) -> bool {
    is_name_start_char(c)
        || c.is_ascii_digit()
        || c == '-'
        || matches!(c as u32, 0xB7 | 0x300..=0x36F | 0x203F..=0x2040)
}

/// Turtle local name for an identifier, escaping reserved characters
fn local_name(identifier: &str) -> Option<String> {
    let mut out = String::with_capacity(identifier.len());

    for (i, c) in identifier.chars().enumerate() {
        let plain = if i == 0 {
            is_name_start_char(c) || c.is_ascii_digit() || c == ':'
        } else {
            is_name_char(c) || c == ':'
        };

        if plain {
            out.push(c);
        } else if LOCAL_ESCAPES.contains(&c) {
            out.push('\\');
            out.push(c);
        } else {
            return None;
        }
    }

    Some(out)
}

/// Percent-encode what an IRI reference cannot hold
fn iri_escape(identifier: &str) -> String {
    let mut out = String::with_capacity(identifier.len());
    for c in identifier.chars() {
        if c <= ' ' || "<>\"{}|^`\\".contains(c) {
            let mut buf = [0u8; 4];
            for byte in c.encode_utf8(&mut buf).bytes() {
                out.push_str(&format!("%{byte:02X}"));
            }
        } else {
            out.push(c);
        }
    }
    out
}

fn turtle_string(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len() + 2);
    escaped.push('"');
    for c in s.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            '\u{8}' => escaped.push_str("\\b"),
            '\u{c}' => escaped.push_str("\\f"),
            _ => escaped.push(c),
        }
    }
    escaped.push('"');
    escaped
}

// ============================================================================
// Tests
// ============================================================================
