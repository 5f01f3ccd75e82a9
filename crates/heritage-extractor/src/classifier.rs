//! Entity classification
//!
//! Maps a text span, and optionally its coarse NER label, to an ontology
//! class with an ordered keyword cascade. The first matching rule wins, so
//! "Orthodox Catholic church" is an OrthodoxChurch.

use heritage_core::{EntityLabel, OntologyClass};

use crate::SpanClassifier;

// ============================================================================
// Rules
// ============================================================================

/// Condition tested against the lower-cased span
#[derive(Debug, Clone, Copy)]
pub enum Condition {
    /// Every keyword must occur
    AllOf(&'static [&'static str]),
    /// At least one keyword must occur
    AnyOf(&'static [&'static str]),
    /// The span carries the GPE label
    GpeLabel,
}

impl Condition {
    fn matches(&self, text: &str, label: Option<&EntityLabel>) -> bool {
        match self {
            Self::AllOf(keywords) => keywords.iter().all(|k| text.contains(k)),
            Self::AnyOf(keywords) => keywords.iter().any(|k| text.contains(k)),
            Self::GpeLabel => label == Some(&EntityLabel::Gpe),
        }
    }
}

/// What a matching rule assigns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleTarget {
    Class(OntologyClass),
    /// Region or City, decided by [`place_class`]
    Place,
}

impl From<OntologyClass> for RuleTarget {
    fn from(class: OntologyClass) -> Self {
        Self::Class(class)
    }
}

/// One step of the cascade
#[derive(Debug, Clone, Copy)]
pub struct ClassRule {
    pub condition: Condition,
    pub target: RuleTarget,
}

/// Ordered first-match-wins keyword classifier
pub struct EntityClassifier {
    rules: Vec<ClassRule>,
}

impl EntityClassifier {
    /// Create a classifier with the heritage keyword cascade
    pub fn new() -> Self {
        let mut classifier = Self { rules: Vec::new() };
        classifier.init_heritage_rules();
        classifier
    }

    fn init_heritage_rules(&mut self) {
        // Religious buildings
        self.add_rule(
            Condition::AllOf(&["orthodox", "church"]),
            OntologyClass::OrthodoxChurch,
        );
        self.add_rule(
            Condition::AllOf(&["catholic", "church"]),
            OntologyClass::CatholicChurch,
        );
        self.add_rule(Condition::AnyOf(&["mosque"]), OntologyClass::Mosque);
        self.add_rule(Condition::AnyOf(&["monastery"]), OntologyClass::Monastery);
        self.add_rule(
            Condition::AnyOf(&["pilgrimage", "shrine"]),
            OntologyClass::PilgrimageSite,
        );

        // Sites and monuments
        self.add_rule(
            Condition::AnyOf(&["castle", "fortress"]),
            OntologyClass::CastleOrFortress,
        );
        self.add_rule(
            Condition::AnyOf(&["tomb", "burial"]),
            OntologyClass::TombOrBurialMound,
        );
        self.add_rule(
            Condition::AnyOf(&["rock art", "inscription"]),
            OntologyClass::RockArtOrInscription,
        );
        self.add_rule(
            Condition::AnyOf(&["ancient city", "ruins", "city"]),
            OntologyClass::AncientCity,
        );

        self.add_rule(Condition::GpeLabel, RuleTarget::Place);

        self.add_rule(
            Condition::AnyOf(&["war", "battle", "uprising", "awakening"]),
            OntologyClass::HistoricEvent,
        );
    }

    /// Append a rule at the end of the cascade
    pub fn add_rule(&mut self, condition: Condition, target: impl Into<RuleTarget>) {
        self.rules.push(ClassRule {
            condition,
            target: target.into(),
        });
    }

    pub fn rules(&self) -> &[ClassRule] {
        &self.rules
    }

    /// Classify a span, returning `None` when no rule matches
    pub fn classify(&self, text: &str, label: Option<&EntityLabel>) -> Option<OntologyClass> {
        let lowered = text.to_lowercase();

        self.rules
            .iter()
            .find(|rule| rule.condition.matches(&lowered, label))
            .map(|rule| match rule.target {
                RuleTarget::Class(class) => class,
                RuleTarget::Place => place_class(&lowered),
            })
    }
}

impl Default for EntityClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl SpanClassifier for EntityClassifier {
    fn classify(&self, text: &str, label: Option<&EntityLabel>) -> Option<OntologyClass> {
        EntityClassifier::classify(self, text, label)
    }
}

/// Region when the (lower-cased) place name says so, City otherwise
pub fn place_class(lowered: &str) -> OntologyClass {
    if lowered.contains("region") {
        OntologyClass::Region
    } else {
        OntologyClass::City
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn classify(text: &str) -> Option<OntologyClass> {
        EntityClassifier::new().classify(text, None)
    }

    #[test]
    fn test_religious_buildings() {
        assert_eq!(
            classify("The Orthodox Church"),
            Some(OntologyClass::OrthodoxChurch)
        );
        assert_eq!(
            classify("the Catholic Church of Shkodër"),
            Some(OntologyClass::CatholicChurch)
        );
        assert_eq!(
            classify("The Et'hem Bey Mosque"),
            Some(OntologyClass::Mosque)
        );
        assert_eq!(
            classify("Ardenica Monastery"),
            Some(OntologyClass::Monastery)
        );
        assert_eq!(
            classify("a Bektashi shrine"),
            Some(OntologyClass::PilgrimageSite)
        );
    }

    #[test]
    fn test_orthodox_precedes_catholic() {
        assert_eq!(
            classify("Orthodox church later claimed by the Catholic diocese"),
            Some(OntologyClass::OrthodoxChurch)
        );
    }

    #[test]
    fn test_earlier_rule_preempts_later() {
        // "mosque" beats "city", "castle" beats "ruins"
        assert_eq!(classify("the city mosque"), Some(OntologyClass::Mosque));
        assert_eq!(
            classify("the castle ruins"),
            Some(OntologyClass::CastleOrFortress)
        );
        assert_eq!(
            classify("burial inscription"),
            Some(OntologyClass::TombOrBurialMound)
        );
    }

    #[test]
    fn test_church_without_denomination_is_unclassified() {
        assert_eq!(classify("This church"), None);
    }

    #[test]
    fn test_city_keyword_yields_ancient_city() {
        assert_eq!(classify("the city"), Some(OntologyClass::AncientCity));
        assert_eq!(
            classify("The ruins"),
            Some(OntologyClass::AncientCity)
        );
    }

    #[test]
    fn test_gpe_label() {
        let classifier = EntityClassifier::new();
        assert_eq!(
            classifier.classify("Butrint", Some(&EntityLabel::Gpe)),
            Some(OntologyClass::City)
        );
        assert_eq!(
            classifier.classify("Korçë Region", Some(&EntityLabel::Gpe)),
            Some(OntologyClass::Region)
        );
        // Keyword rules run before the label rule
        assert_eq!(
            classifier.classify("Vatican City", Some(&EntityLabel::Gpe)),
            Some(OntologyClass::AncientCity)
        );
        assert_eq!(classifier.classify("Butrint", None), None);
    }

    #[test]
    fn test_historic_event() {
        assert_eq!(
            classify("the Albanian National Awakening"),
            Some(OntologyClass::HistoricEvent)
        );
        assert_eq!(
            classify("Battle of Torvioll"),
            Some(OntologyClass::HistoricEvent)
        );
    }

    #[test]
    fn test_no_match() {
        assert_eq!(classify("stone walls"), None);
        assert_eq!(classify(""), None);
    }

    #[test]
    fn test_rule_order() {
        let classifier = EntityClassifier::new();
        let rules = classifier.rules();

        assert_eq!(rules.len(), 11);
        assert_eq!(rules[0].target, RuleTarget::Class(OntologyClass::OrthodoxChurch));
        assert!(matches!(rules[9].condition, Condition::GpeLabel));
        assert_eq!(rules[9].target, RuleTarget::Place);
        assert_eq!(rules[10].target, RuleTarget::Class(OntologyClass::HistoricEvent));
    }

    #[test]
    fn test_added_rule_runs_last() {
        let mut classifier = EntityClassifier::new();
        classifier.add_rule(Condition::AnyOf(&["bridge"]), OntologyClass::Monastery);
        classifier.add_rule(Condition::AnyOf(&["valley"]), RuleTarget::Place);

        assert_eq!(
            classifier.classify("the Ottoman bridge", None),
            Some(OntologyClass::Monastery)
        );
        assert_eq!(
            classifier.classify("the castle bridge", None),
            Some(OntologyClass::CastleOrFortress)
        );
        assert_eq!(
            classifier.classify("Drino valley region", None),
            Some(OntologyClass::Region)
        );
    }

    proptest! {
        #[test]
        fn prop_classification_ignores_case(s in "[a-zA-Z ]{0,40}") {
            prop_assert_eq!(classify(&s.to_uppercase()), classify(&s));
        }

        #[test]
        fn prop_orthodox_church_wins_in_any_order(
            words in Just(vec!["orthodox", "church", "catholic"]).prop_shuffle(),
            fillers in prop::collection::vec("[a-z ]{0,8}", 4),
            upper in any::<bool>(),
        ) {
            let mut text = fillers[0].clone();
            for (word, filler) in words.iter().zip(&fillers[1..]) {
                text.push_str(word);
                text.push_str(filler);
            }
            if upper {
                text = text.to_uppercase();
            }

            prop_assert_eq!(classify(&text), Some(OntologyClass::OrthodoxChurch));
        }
    }
}
