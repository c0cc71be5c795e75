//! Character aggregate: the full character sheet.
//!
//! # Rustic DDD Design
//!
//! - **Private fields**: everything goes through accessors and named mutations
//! - **Newtypes**: `CharacterName` and `Level` are valid by construction
//! - **Derived values are never stored**: attribute, skill, vitality and Berkana
//!   maxima are computed from the stored inputs on demand. Only the remaining
//!   pools (current vitality, current Berkana) are kept alongside them.
//!
//! Equipment, languages, spells and the like are opaque JSON documents; the
//! rules never look inside them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{json, Value};

use crate::error::DomainError;
use crate::ids::CharacterId;
use crate::rules::{
    level_up, max_berkana, recalculate_all, vitality_levels, LevelUpError, LevelUpInput,
    LevelUpOutcome, Recalculation, RecalculationInput,
};
use crate::value_objects::{
    zeroed_attributes, zeroed_skills, AttributeMap, BerkanaQuickAction, CharacterName,
    CurrentVitality, DamageReport, Level, SkillMap, VitalityBase, VitalityLevels, BERKANA_BASE,
};

/// Items every new character carries.
const DEFAULT_ADVENTURE_KIT: [&str; 23] = [
    "Cantil 3 Litros",
    "Cera 1 frasco",
    "Chifre-polvora 400g",
    "Espelho",
    "Faca multiuso",
    "Frasco 12 unidades",
    "Frasco de anula faro 4 unidades",
    "Frasco de oleo 3 litros",
    "Lente de aumento",
    "Corda 15 metros",
    "Saco de linhagem",
    "Saco de dormir",
    "Martelo multiuso",
    "Kit de acampamento para 4 pessoas",
    "Kit de banho",
    "Kit de costura",
    "Kit escalada",
    "Kit panelas",
    "Kit primeiros-socorros",
    "Kit provisoes",
    "Kit iluminação",
    "Kit dissimulados",
    "Kit reparo de forja",
];

const STANDARD_LANGUAGES: [&str; 6] = ["comum", "errante", "elfico", "sombrio", "anao", "sigilico"];

const CURRENCIES: [&str; 5] = ["ouro", "prata", "cobre", "imperano", "joias"];

/// Free-text descriptive fields of a sheet. All optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterProfile {
    pub player_name: Option<String>,
    pub class: Option<String>,
    pub race: Option<String>,
    pub deity: Option<String>,
    pub homeland: Option<String>,
    pub alignment: Option<String>,
    pub gender: Option<String>,
    pub age: Option<String>,
    pub weight: Option<String>,
    pub height: Option<String>,
    pub virtue_points: Option<String>,
}

/// Schema-light sheet sections the rules never inspect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetDocuments {
    pub weapons: Value,
    pub armor: Value,
    pub adventure_kit: Value,
    pub finances: Value,
    pub languages: Value,
    pub spells: Value,
    pub talents: Value,
}

impl Default for SheetDocuments {
    fn default() -> Self {
        let adventure_kit: Vec<Value> = DEFAULT_ADVENTURE_KIT
            .iter()
            .map(|name| json!({ "name": name, "quantity": 1, "isDefault": true }))
            .collect();
        let finances: serde_json::Map<String, Value> = CURRENCIES
            .iter()
            .map(|currency| (currency.to_string(), json!(0)))
            .collect();
        let standard: serde_json::Map<String, Value> = STANDARD_LANGUAGES
            .iter()
            .map(|language| (language.to_string(), json!(false)))
            .collect();

        Self {
            weapons: json!([]),
            armor: json!({
                "name": "",
                "description": "",
                "totalVitality": 0,
                "currentVitality": 0
            }),
            adventure_kit: Value::Array(adventure_kit),
            finances: Value::Object(finances),
            languages: json!({ "standard": standard, "custom": [] }),
            spells: json!([]),
            talents: json!([]),
        }
    }
}

/// A partial edit of a sheet. `None` leaves the field as it is.
///
/// Profile strings replace the stored value; an empty string clears it.
/// Attribute and skill maps are merged entry by entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CharacterUpdate {
    pub character_name: Option<CharacterName>,
    pub player_name: Option<String>,
    pub class: Option<String>,
    pub race: Option<String>,
    pub deity: Option<String>,
    pub homeland: Option<String>,
    pub alignment: Option<String>,
    pub gender: Option<String>,
    pub age: Option<String>,
    pub weight: Option<String>,
    pub height: Option<String>,
    pub virtue_points: Option<String>,
    pub level: Option<Level>,
    pub current_xp: Option<u32>,
    pub max_berkana: Option<i32>,
    pub current_berkana: Option<i32>,
    pub berkana_bonus: Option<i32>,
    pub attributes: Option<AttributeMap>,
    pub vitality: Option<VitalityBase>,
    pub current_vitality: Option<CurrentVitality>,
    pub skills: Option<SkillMap>,
    pub weapons: Option<Value>,
    pub armor: Option<Value>,
    pub adventure_kit: Option<Value>,
    pub finances: Option<Value>,
    pub languages: Option<Value>,
    pub spells: Option<Value>,
    pub talents: Option<Value>,
    pub notes: Option<String>,
}

/// A character sheet.
///
/// # Invariants
///
/// - `name` is non-empty and at most 200 characters (`CharacterName`)
/// - `level` is within `[0, 99]` (`Level`)
/// - `updated_at >= created_at` when mutations pass a monotonic clock
#[derive(Debug, Clone, PartialEq)]
pub struct Character {
    id: CharacterId,
    name: CharacterName,
    profile: CharacterProfile,

    level: Level,
    current_xp: u32,

    attributes: AttributeMap,
    vitality: VitalityBase,
    current_vitality: CurrentVitality,

    max_berkana: i32,
    current_berkana: i32,
    berkana_bonus: i32,

    skills: SkillMap,

    documents: SheetDocuments,
    notes: Option<String>,

    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Character {
    // =========================================================================
    // Constructor
    // =========================================================================

    /// Create a fresh level-0 sheet with zeroed stats and the default kit.
    pub fn new(name: CharacterName, now: DateTime<Utc>) -> Self {
        Self {
            id: CharacterId::new(),
            name,
            profile: CharacterProfile::default(),
            level: Level::ZERO,
            current_xp: 0,
            attributes: zeroed_attributes(),
            vitality: VitalityBase::default(),
            current_vitality: CurrentVitality::new(),
            max_berkana: BERKANA_BASE,
            current_berkana: BERKANA_BASE,
            berkana_bonus: 0,
            skills: zeroed_skills(),
            documents: SheetDocuments::default(),
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_id(mut self, id: CharacterId) -> Self {
        self.id = id;
        self
    }

    pub fn with_profile(mut self, profile: CharacterProfile) -> Self {
        self.profile = profile;
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub fn id(&self) -> CharacterId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &CharacterName {
        &self.name
    }

    #[inline]
    pub fn profile(&self) -> &CharacterProfile {
        &self.profile
    }

    #[inline]
    pub fn level(&self) -> Level {
        self.level
    }

    #[inline]
    pub fn current_xp(&self) -> u32 {
        self.current_xp
    }

    #[inline]
    pub fn attributes(&self) -> &AttributeMap {
        &self.attributes
    }

    #[inline]
    pub fn vitality(&self) -> VitalityBase {
        self.vitality
    }

    /// Persisted remaining vitality. Use [`Character::current_vitality_levels`]
    /// for resolved values.
    #[inline]
    pub fn current_vitality(&self) -> &CurrentVitality {
        &self.current_vitality
    }

    /// Stored Berkana maximum. Kept for the sheet; the rules recompute it.
    #[inline]
    pub fn max_berkana(&self) -> i32 {
        self.max_berkana
    }

    #[inline]
    pub fn current_berkana(&self) -> i32 {
        self.current_berkana
    }

    #[inline]
    pub fn berkana_bonus(&self) -> i32 {
        self.berkana_bonus
    }

    #[inline]
    pub fn skills(&self) -> &SkillMap {
        &self.skills
    }

    #[inline]
    pub fn documents(&self) -> &SheetDocuments {
        &self.documents
    }

    #[inline]
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    #[inline]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[inline]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    // =========================================================================
    // Derived values
    // =========================================================================

    /// Vitality tier maxima at the current level.
    pub fn max_vitality_levels(&self) -> VitalityLevels {
        vitality_levels(&self.vitality, self.level)
    }

    /// Remaining vitality per tier; tiers never damaged resolve to their max.
    pub fn current_vitality_levels(&self) -> VitalityLevels {
        self.current_vitality.resolve(&self.max_vitality_levels())
    }

    /// Berkana maximum computed from the fixed base, level and bonus.
    pub fn computed_max_berkana(&self) -> i32 {
        max_berkana(self.level, BERKANA_BASE, self.berkana_bonus)
    }

    pub fn level_up_input(&self) -> LevelUpInput {
        LevelUpInput {
            level: self.level,
            current_xp: self.current_xp,
            vitality_base: self.vitality,
            berkana_bonus: self.berkana_bonus,
        }
    }

    pub fn recalculate(&self) -> Recalculation {
        recalculate_all(&RecalculationInput {
            level: self.level,
            attributes: &self.attributes,
            vitality_base: self.vitality,
            berkana_bonus: self.berkana_bonus,
            skills: &self.skills,
        })
    }

    pub fn summary(&self) -> CharacterSummary {
        CharacterSummary {
            id: self.id,
            player_name: self.profile.player_name.clone(),
            character_name: self.name.as_str().to_string(),
            class: self.profile.class.clone(),
            race: self.profile.race.clone(),
            level: self.level,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Advance one level and store the new level, XP and Berkana maximum.
    ///
    /// Current vitality is left as it is; only the maxima move. On failure the
    /// sheet is untouched.
    pub fn level_up(&mut self, now: DateTime<Utc>) -> Result<LevelUpOutcome, LevelUpError> {
        let outcome = level_up(&self.level_up_input())?;
        self.apply_level_up(&outcome, now);
        Ok(outcome)
    }

    pub fn apply_level_up(&mut self, outcome: &LevelUpOutcome, now: DateTime<Utc>) {
        self.level = outcome.new_level;
        self.current_xp = outcome.new_current_xp;
        self.max_berkana = outcome.new_max_berkana;
        self.touch(now);
    }

    /// Absorb `amount` damage into the vitality tiers, healthiest first, and
    /// store the resulting value for every tier.
    pub fn take_damage(&mut self, amount: i32, now: DateTime<Utc>) -> DamageReport {
        let report = self.current_vitality_levels().absorb_damage(amount);
        self.current_vitality.set_all(&report.vitality);
        self.touch(now);
        report
    }

    /// Reset every tier to its maximum.
    pub fn heal_fully(&mut self, now: DateTime<Utc>) -> VitalityLevels {
        let max = self.max_vitality_levels();
        self.current_vitality.set_all(&max);
        self.touch(now);
        max
    }

    /// Apply a quick Berkana action and return the new current value.
    pub fn apply_berkana_action(&mut self, action: BerkanaQuickAction, now: DateTime<Utc>) -> i32 {
        self.current_berkana = action.apply(self.current_berkana, self.computed_max_berkana());
        self.touch(now);
        self.current_berkana
    }

    /// Apply a partial edit. Validation runs before anything is changed.
    pub fn apply_update(
        &mut self,
        update: CharacterUpdate,
        now: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        for (field, value) in [
            ("maxBerkana", update.max_berkana),
            ("currentBerkana", update.current_berkana),
        ] {
            if value.is_some_and(|v| v < 0) {
                return Err(DomainError::validation(format!(
                    "{} must be non-negative",
                    field
                )));
            }
        }

        if let Some(name) = update.character_name {
            self.name = name;
        }

        let profile = &mut self.profile;
        for (slot, value) in [
            (&mut profile.player_name, update.player_name),
            (&mut profile.class, update.class),
            (&mut profile.race, update.race),
            (&mut profile.deity, update.deity),
            (&mut profile.homeland, update.homeland),
            (&mut profile.alignment, update.alignment),
            (&mut profile.gender, update.gender),
            (&mut profile.age, update.age),
            (&mut profile.weight, update.weight),
            (&mut profile.height, update.height),
            (&mut profile.virtue_points, update.virtue_points),
            (&mut self.notes, update.notes),
        ] {
            if let Some(value) = value {
                *slot = non_empty(value);
            }
        }

        if let Some(level) = update.level {
            self.level = level;
        }
        if let Some(xp) = update.current_xp {
            self.current_xp = xp;
        }
        if let Some(max) = update.max_berkana {
            self.max_berkana = max;
        }
        if let Some(current) = update.current_berkana {
            self.current_berkana = current;
        }
        if let Some(bonus) = update.berkana_bonus {
            self.berkana_bonus = bonus;
        }
        if let Some(attributes) = update.attributes {
            self.attributes.extend(attributes);
        }
        if let Some(vitality) = update.vitality {
            self.vitality = vitality;
        }
        if let Some(current) = update.current_vitality {
            self.current_vitality = current;
        }
        if let Some(skills) = update.skills {
            self.skills.extend(skills);
        }

        let documents = &mut self.documents;
        for (slot, value) in [
            (&mut documents.weapons, update.weapons),
            (&mut documents.armor, update.armor),
            (&mut documents.adventure_kit, update.adventure_kit),
            (&mut documents.finances, update.finances),
            (&mut documents.languages, update.languages),
            (&mut documents.spells, update.spells),
            (&mut documents.talents, update.talents),
        ] {
            if let Some(value) = value {
                *slot = value;
            }
        }

        self.touch(now);
        Ok(())
    }

    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Listing view of a character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterSummary {
    pub id: CharacterId,
    pub player_name: Option<String>,
    pub character_name: String,
    pub class: Option<String>,
    pub race: Option<String>,
    pub level: Level,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ============================================================================
// Serde Implementation
// ============================================================================

/// Stored and wire form of a sheet.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CharacterWireFormat {
    id: CharacterId,
    character_name: CharacterName,
    #[serde(flatten)]
    profile: CharacterProfile,
    level: Level,
    #[serde(rename = "currentXP")]
    current_xp: u32,
    attributes: AttributeMap,
    vitality: VitalityBase,
    #[serde(default)]
    current_vitality: CurrentVitality,
    max_berkana: i32,
    current_berkana: i32,
    berkana_bonus: i32,
    skills: SkillMap,
    #[serde(flatten)]
    documents: SheetDocuments,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Serialize for Character {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let wire = CharacterWireFormat {
            id: self.id,
            character_name: self.name.clone(),
            profile: self.profile.clone(),
            level: self.level,
            current_xp: self.current_xp,
            attributes: self.attributes.clone(),
            vitality: self.vitality,
            current_vitality: self.current_vitality.clone(),
            max_berkana: self.max_berkana,
            current_berkana: self.current_berkana,
            berkana_bonus: self.berkana_bonus,
            skills: self.skills.clone(),
            documents: self.documents.clone(),
            notes: self.notes.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        };
        wire.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Character {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let wire = CharacterWireFormat::deserialize(deserializer)?;

        let mut attributes = zeroed_attributes();
        attributes.extend(wire.attributes);
        let mut skills = zeroed_skills();
        skills.extend(wire.skills);

        Ok(Character {
            id: wire.id,
            name: wire.character_name,
            profile: wire.profile,
            level: wire.level,
            current_xp: wire.current_xp,
            attributes,
            vitality: wire.vitality,
            current_vitality: wire.current_vitality,
            max_berkana: wire.max_berkana,
            current_berkana: wire.current_berkana,
            berkana_bonus: wire.berkana_bonus,
            skills,
            documents: wire.documents,
            notes: wire.notes,
            created_at: wire.created_at,
            updated_at: wire.updated_at,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
