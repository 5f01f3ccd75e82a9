//! Ontology schema registry
//!
//! The cultural-heritage ontology is closed: every class is a variant of
//! [`OntologyClass`] and carries a static [`ClassSchema`] listing the data and
//! object properties its individuals may expose.

use serde::{Deserialize, Serialize};

use crate::HeritageError;

// ============================================================================
// Properties
// ============================================================================

/// Literal-valued properties
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DataProperty {
    HasName,
    HasReligion,
    HasCulturalContext,
    HasCulturalSignificance,
    HasCulturalHeritageStatus,
    HasCreator,
    HasArchitecturalStyle,
    HasDateOfDiscovery,
    HasType,
    HasLocationType,
    HasExactDate,
    HasLabelDate,
    HasStartDate,
    HasEventDuration,
}

impl DataProperty {
    /// Local name used in the ontology namespace
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HasName => "hasName",
            Self::HasReligion => "hasReligion",
            Self::HasCulturalContext => "hasCulturalContext",
            Self::HasCulturalSignificance => "hasCulturalSignificance",
            Self::HasCulturalHeritageStatus => "hasCulturalHeritageStatus",
            Self::HasCreator => "hasCreator",
            Self::HasArchitecturalStyle => "hasArchitecturalStyle",
            Self::HasDateOfDiscovery => "hasDateOfDiscovery",
            Self::HasType => "hasType",
            Self::HasLocationType => "hasLocationType",
            Self::HasExactDate => "hasExactDate",
            Self::HasLabelDate => "hasLabelDate",
            Self::HasStartDate => "hasStartDate",
            Self::HasEventDuration => "hasEventDuration",
        }
    }
}

impl std::fmt::Display for DataProperty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Properties that reference another individual
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ObjectProperty {
    LocatedIn,
    AssociatedWithEvent,
    IsPartOf,
    DatedFrom,
    OriginatedFrom,
    HasHistoricalPeriod,
    #[serde(rename = "OccurredIn")]
    OccurredIn,
    #[serde(rename = "OccurredOn")]
    OccurredOn,
}

impl ObjectProperty {
    /// Local name used in the ontology namespace
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LocatedIn => "locatedIn",
            Self::AssociatedWithEvent => "associatedWithEvent",
            Self::IsPartOf => "isPartOf",
            Self::DatedFrom => "datedFrom",
            Self::OriginatedFrom => "originatedFrom",
            Self::HasHistoricalPeriod => "hasHistoricalPeriod",
            Self::OccurredIn => "OccurredIn",
            Self::OccurredOn => "OccurredOn",
        }
    }
}

impl std::fmt::Display for ObjectProperty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Class schemas
// ============================================================================

/// Properties an individual of a class is allowed to carry, in emission order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassSchema {
    pub data_properties: &'static [DataProperty],
    pub object_properties: &'static [ObjectProperty],
}

impl ClassSchema {
    pub fn allows_data(&self, property: DataProperty) -> bool {
        self.data_properties.contains(&property)
    }

    pub fn allows_object(&self, property: ObjectProperty) -> bool {
        self.object_properties.contains(&property)
    }
}

const RELIGIOUS_BUILDING: ClassSchema = ClassSchema {
    data_properties: &[
        DataProperty::HasName,
        DataProperty::HasReligion,
        DataProperty::HasCulturalContext,
        DataProperty::HasCulturalSignificance,
        DataProperty::HasCulturalHeritageStatus,
        DataProperty::HasCreator,
        DataProperty::HasArchitecturalStyle,
    ],
    object_properties: &[ObjectProperty::LocatedIn, ObjectProperty::AssociatedWithEvent],
};

const HERITAGE_SITE_DATA: &[DataProperty] = &[
    DataProperty::HasName,
    DataProperty::HasCreator,
    DataProperty::HasCulturalContext,
    DataProperty::HasCulturalSignificance,
    DataProperty::HasCulturalHeritageStatus,
    DataProperty::HasDateOfDiscovery,
];

// Settlements and fortifications list datedFrom before originatedFrom,
// tombs and rock art the other way round.
const SETTLEMENT: ClassSchema = ClassSchema {
    data_properties: HERITAGE_SITE_DATA,
    object_properties: &[
        ObjectProperty::IsPartOf,
        ObjectProperty::LocatedIn,
        ObjectProperty::DatedFrom,
        ObjectProperty::OriginatedFrom,
        ObjectProperty::AssociatedWithEvent,
    ],
};

const MONUMENT: ClassSchema = ClassSchema {
    data_properties: HERITAGE_SITE_DATA,
    object_properties: &[
        ObjectProperty::IsPartOf,
        ObjectProperty::LocatedIn,
        ObjectProperty::OriginatedFrom,
        ObjectProperty::DatedFrom,
        ObjectProperty::AssociatedWithEvent,
    ],
};

const PLACE: ClassSchema = ClassSchema {
    data_properties: &[
        DataProperty::HasName,
        DataProperty::HasType,
        DataProperty::HasLocationType,
    ],
    object_properties: &[ObjectProperty::HasHistoricalPeriod],
};

const DATE: ClassSchema = ClassSchema {
    data_properties: &[DataProperty::HasExactDate, DataProperty::HasLabelDate],
    object_properties: &[],
};

const HISTORIC_EVENT: ClassSchema = ClassSchema {
    data_properties: &[
        DataProperty::HasName,
        DataProperty::HasStartDate,
        DataProperty::HasEventDuration,
    ],
    object_properties: &[ObjectProperty::OccurredIn, ObjectProperty::OccurredOn],
};

/// Classes of the cultural-heritage ontology
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OntologyClass {
    OrthodoxChurch,
    CatholicChurch,
    Mosque,
    Monastery,
    PilgrimageSite,
    AncientCity,
    CastleOrFortress,
    TombOrBurialMound,
    RockArtOrInscription,
    Region,
    City,
    Date,
    HistoricEvent,
}

impl OntologyClass {
    /// Every class, in schema declaration order
    pub const ALL: [OntologyClass; 13] = [
        Self::OrthodoxChurch,
        Self::CatholicChurch,
        Self::Mosque,
        Self::Monastery,
        Self::PilgrimageSite,
        Self::AncientCity,
        Self::CastleOrFortress,
        Self::TombOrBurialMound,
        Self::RockArtOrInscription,
        Self::Region,
        Self::City,
        Self::Date,
        Self::HistoricEvent,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OrthodoxChurch => "OrthodoxChurch",
            Self::CatholicChurch => "CatholicChurch",
            Self::Mosque => "Mosque",
            Self::Monastery => "Monastery",
            Self::PilgrimageSite => "PilgrimageSite",
            Self::AncientCity => "AncientCity",
            Self::CastleOrFortress => "CastleOrFortress",
            Self::TombOrBurialMound => "TombOrBurialMound",
            Self::RockArtOrInscription => "RockArtOrInscription",
            Self::Region => "Region",
            Self::City => "City",
            Self::Date => "Date",
            Self::HistoricEvent => "HistoricEvent",
        }
    }

    /// Schema descriptor for this class
    pub fn schema(&self) -> &'static ClassSchema {
        match self {
            Self::OrthodoxChurch
            | Self::CatholicChurch
            | Self::Mosque
            | Self::Monastery
            | Self::PilgrimageSite => &RELIGIOUS_BUILDING,
            Self::AncientCity | Self::CastleOrFortress => &SETTLEMENT,
            Self::TombOrBurialMound | Self::RockArtOrInscription => &MONUMENT,
            Self::Region | Self::City => &PLACE,
            Self::Date => &DATE,
            Self::HistoricEvent => &HISTORIC_EVENT,
        }
    }

    /// Religious buildings receive the religion rule group
    pub fn is_religious_building(&self) -> bool {
        matches!(
            self,
            Self::OrthodoxChurch
                | Self::CatholicChurch
                | Self::Mosque
                | Self::Monastery
                | Self::PilgrimageSite
        )
    }
}

impl std::fmt::Display for OntologyClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for OntologyClass {
    type Err = HeritageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|class| class.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| HeritageError::UnknownClass(s.to_string()))
    }
}

/// Schema lookup by class
pub fn properties_for(class: OntologyClass) -> &'static ClassSchema {
    class.schema()
}
