//! Character attributes.
//!
//! The sheet has a closed set of fourteen attributes. Each one stores three
//! independent contributions (race, class, bonus); the total also depends on
//! the character level and is never stored.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;

/// One of the fourteen named character attributes.
///
/// Declaration order is the canonical sheet order; maps keyed by `Attribute`
/// iterate in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Attribute {
    #[serde(rename = "agilidade")]
    Agility,
    #[serde(rename = "carisma")]
    Charisma,
    #[serde(rename = "coragem")]
    Courage,
    #[serde(rename = "destreza")]
    Dexterity,
    #[serde(rename = "esquiva")]
    Dodge,
    #[serde(rename = "forca", alias = "força")]
    Strength,
    #[serde(rename = "inteligencia")]
    Intelligence,
    #[serde(rename = "iniciativa")]
    Initiative,
    #[serde(rename = "intimidar")]
    Intimidation,
    #[serde(rename = "manobra")]
    Maneuver,
    #[serde(rename = "reflexos")]
    Reflexes,
    #[serde(rename = "sabedoria")]
    Wisdom,
    #[serde(rename = "vigor")]
    Vigor,
    #[serde(rename = "vontade")]
    Willpower,
}

impl Attribute {
    /// Every attribute, in sheet order.
    pub const ALL: [Attribute; 14] = [
        Self::Agility,
        Self::Charisma,
        Self::Courage,
        Self::Dexterity,
        Self::Dodge,
        Self::Strength,
        Self::Intelligence,
        Self::Initiative,
        Self::Intimidation,
        Self::Maneuver,
        Self::Reflexes,
        Self::Wisdom,
        Self::Vigor,
        Self::Willpower,
    ];

    /// Returns the stored record key (e.g., "agilidade", "forca").
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Agility => "agilidade",
            Self::Charisma => "carisma",
            Self::Courage => "coragem",
            Self::Dexterity => "destreza",
            Self::Dodge => "esquiva",
            Self::Strength => "forca",
            Self::Intelligence => "inteligencia",
            Self::Initiative => "iniciativa",
            Self::Intimidation => "intimidar",
            Self::Maneuver => "manobra",
            Self::Reflexes => "reflexos",
            Self::Wisdom => "sabedoria",
            Self::Vigor => "vigor",
            Self::Willpower => "vontade",
        }
    }

    /// Returns the label shown on the sheet.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Agility => "Agilidade",
            Self::Charisma => "Carisma",
            Self::Courage => "Coragem",
            Self::Dexterity => "Destreza",
            Self::Dodge => "Esquiva",
            Self::Strength => "Força",
            Self::Intelligence => "Inteligência",
            Self::Initiative => "Iniciativa",
            Self::Intimidation => "Intimidar",
            Self::Maneuver => "Manobra",
            Self::Reflexes => "Reflexos",
            Self::Wisdom => "Sabedoria",
            Self::Vigor => "Vigor",
            Self::Willpower => "Vontade",
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Attribute {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        if key == "força" {
            return Ok(Self::Strength);
        }
        Self::ALL
            .into_iter()
            .find(|attribute| attribute.as_str() == key)
            .ok_or_else(|| DomainError::parse(format!("Unknown attribute: {}", s)))
    }
}

/// Stored contributions for a single attribute.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeValue {
    pub race: i32,
    pub class: i32,
    pub bonus: i32,
}

impl AttributeValue {
    pub fn new(race: i32, class: i32, bonus: i32) -> Self {
        Self { race, class, bonus }
    }
}

/// Attribute contributions keyed by attribute.
pub type AttributeMap = BTreeMap<Attribute, AttributeValue>;

/// A zeroed entry for every attribute, as stored on a fresh character.
pub fn zeroed_attributes() -> AttributeMap {
    Attribute::ALL
        .into_iter()
        .map(|attribute| (attribute, AttributeValue::default()))
        .collect()
}
