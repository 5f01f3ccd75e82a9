//! Relation linking
//!
//! Links individuals found in a sentence to the places and events named in
//! the same sentence. Object properties are single-valued: the last GPE and
//! the last EVENT span of the sentence win.

use std::collections::BTreeMap;

use heritage_core::{EntityLabel, EntitySpan, ObjectProperty};

/// Object property populated by a span label, if any
pub fn property_for_label(label: &EntityLabel) -> Option<ObjectProperty> {
    match label {
        EntityLabel::Gpe => Some(ObjectProperty::LocatedIn),
        EntityLabel::Event => Some(ObjectProperty::AssociatedWithEvent),
        _ => None,
    }
}

/// Co-occurrence linker for sentence-level relations
#[derive(Debug, Clone, Default)]
pub struct RelationLinker;

impl RelationLinker {
    pub fn new() -> Self {
        Self
    }

    /// Object properties implied by the named entities of one sentence
    pub fn links(&self, entities: &[EntitySpan]) -> BTreeMap<ObjectProperty, String> {
        let mut links = BTreeMap::new();

        for entity in entities {
            if let Some(property) = property_for_label(&entity.label) {
                links.insert(property, entity.text.trim().to_string());
            }
        }

        links
    }

    /// Apply sentence links to an individual's object properties
    pub fn apply(&self, entities: &[EntitySpan], target: &mut BTreeMap<ObjectProperty, String>) {
        target.extend(self.links(entities));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gpe_and_event_links() {
        let linker = RelationLinker::new();
        let links = linker.links(&[
            EntitySpan::gpe("Gjirokastër"),
            EntitySpan::date("the 12th century"),
            EntitySpan::event("the Albanian National Awakening"),
        ]);

        assert_eq!(links.len(), 2);
        assert_eq!(
            links.get(&ObjectProperty::LocatedIn).map(String::as_str),
            Some("Gjirokastër")
        );
        assert_eq!(
            links.get(&ObjectProperty::AssociatedWithEvent).map(String::as_str),
            Some("the Albanian National Awakening")
        );
    }

    #[test]
    fn test_last_span_wins() {
        let linker = RelationLinker::new();
        let links = linker.links(&[EntitySpan::gpe("Tirana"), EntitySpan::gpe("Albania")]);

        assert_eq!(
            links.get(&ObjectProperty::LocatedIn).map(String::as_str),
            Some("Albania")
        );
    }

    #[test]
    fn test_other_labels_ignored() {
        let linker = RelationLinker::new();
        let links = linker.links(&[EntitySpan::new("Ali Pasha", "PERSON", 0, 9)]);
        assert!(links.is_empty());
    }

    #[test]
    fn test_apply_overwrites_existing() {
        let linker = RelationLinker::new();
        let mut target = BTreeMap::new();
        target.insert(ObjectProperty::LocatedIn, "Berat".to_string());

        linker.apply(&[EntitySpan::gpe("Korçë")], &mut target);
        assert_eq!(target[&ObjectProperty::LocatedIn], "Korçë");
    }
}
