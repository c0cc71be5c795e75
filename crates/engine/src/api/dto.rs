//! Request and response bodies for the HTTP API.

use berkana_domain::{
    AttributeMap, BerkanaQuickAction, Character, CharacterName, CharacterProfile,
    CharacterSummary, CharacterUpdate, CurrentVitality, Level, SkillMap, VitalityBase,
    VitalityLevels, VitalityTier,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::{Validate, ValidationError};

use super::http::ApiError;
use crate::infrastructure::ports::{CharacterListQuery, DEFAULT_PAGE_LIMIT};
use crate::use_cases::NewCharacter;

/// Largest magnitude accepted for any stat component, bonus or Berkana value.
pub const MAX_SHEET_VALUE: i32 = 100_000;

fn in_sheet_range(value: i32) -> bool {
    (-MAX_SHEET_VALUE..=MAX_SHEET_VALUE).contains(&value)
}

fn out_of_range(code: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(
        format!("valores devem estar entre -{MAX_SHEET_VALUE} e {MAX_SHEET_VALUE}").into(),
    )
}

fn validate_vitality_base(base: &VitalityBase) -> Result<(), ValidationError> {
    if in_sheet_range(base.race) && in_sheet_range(base.class) {
        Ok(())
    } else {
        Err(out_of_range("vitality_range"))
    }
}

fn validate_attributes(attributes: &AttributeMap) -> Result<(), ValidationError> {
    let valid = attributes
        .values()
        .all(|value| [value.race, value.class, value.bonus].into_iter().all(in_sheet_range));
    if valid {
        Ok(())
    } else {
        Err(out_of_range("attribute_range"))
    }
}

fn validate_skills(skills: &SkillMap) -> Result<(), ValidationError> {
    for value in skills.values() {
        if value.distributed < 0 {
            return Err(ValidationError::new("skill_negative")
                .with_message("pontos distribuídos não podem ser negativos".into()));
        }
        if !in_sheet_range(value.distributed) || !in_sheet_range(value.bonus) {
            return Err(out_of_range("skill_range"));
        }
    }
    Ok(())
}

fn validate_current_vitality(current: &CurrentVitality) -> Result<(), ValidationError> {
    let valid = VitalityTier::ALL
        .into_iter()
        .filter_map(|tier| current.get(tier))
        .all(in_sheet_range);
    if valid {
        Ok(())
    } else {
        Err(out_of_range("current_vitality_range"))
    }
}

pub(super) fn parse_level(value: u8) -> Result<Level, ApiError> {
    Level::new(value).map_err(|e| ApiError::BadRequest(e.to_string()))
}

fn parse_name(value: String) -> Result<CharacterName, ApiError> {
    CharacterName::new(value).map_err(|e| ApiError::BadRequest(e.to_string()))
}

// =============================================================================
// Envelopes
// =============================================================================

/// `{ success, message, data }` wrapper used by the calculation endpoints.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub message: String,
    pub data: T,
}

impl<T> Envelope<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CharacterResponse {
    pub character: Character,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CharacterListResponse {
    pub characters: Vec<CharacterSummary>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

// =============================================================================
// Character management
// =============================================================================

#[derive(Debug, Deserialize, Validate)]
pub struct ListCharactersQuery {
    #[validate(range(min = 1))]
    pub page: Option<u32>,
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<u32>,
    pub search: Option<String>,
}

impl From<ListCharactersQuery> for CharacterListQuery {
    fn from(query: ListCharactersQuery) -> Self {
        Self {
            search: query.search,
            page: query.page.unwrap_or(1),
            limit: query.limit.unwrap_or(DEFAULT_PAGE_LIMIT),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCharacterRequest {
    #[validate(length(min = 1, max = 200))]
    pub character_name: String,
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
    pub notes: Option<String>,
}

impl TryFrom<CreateCharacterRequest> for NewCharacter {
    type Error = ApiError;

    fn try_from(request: CreateCharacterRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            name: parse_name(request.character_name)?,
            profile: CharacterProfile {
                player_name: request.player_name,
                class: request.class,
                race: request.race,
                deity: request.deity,
                homeland: request.homeland,
                alignment: request.alignment,
                gender: request.gender,
                age: request.age,
                weight: request.weight,
                height: request.height,
                virtue_points: request.virtue_points,
            },
            notes: request.notes,
        })
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCharacterRequest {
    #[validate(length(min = 1, max = 200))]
    pub character_name: Option<String>,
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
    #[validate(range(max = 99))]
    pub level: Option<u8>,
    #[serde(rename = "currentXP")]
    pub current_xp: Option<u32>,
    #[validate(range(min = 0, max = MAX_SHEET_VALUE))]
    pub max_berkana: Option<i32>,
    #[validate(range(min = 0, max = MAX_SHEET_VALUE))]
    pub current_berkana: Option<i32>,
    #[validate(range(min = -MAX_SHEET_VALUE, max = MAX_SHEET_VALUE))]
    pub berkana_bonus: Option<i32>,
    #[validate(custom(function = "validate_attributes"))]
    pub attributes: Option<AttributeMap>,
    #[validate(custom(function = "validate_vitality_base"))]
    pub vitality: Option<VitalityBase>,
    #[validate(custom(function = "validate_current_vitality"))]
    pub current_vitality: Option<CurrentVitality>,
    #[validate(custom(function = "validate_skills"))]
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

impl TryFrom<UpdateCharacterRequest> for CharacterUpdate {
    type Error = ApiError;

    fn try_from(request: UpdateCharacterRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            character_name: request.character_name.map(parse_name).transpose()?,
            player_name: request.player_name,
            class: request.class,
            race: request.race,
            deity: request.deity,
            homeland: request.homeland,
            alignment: request.alignment,
            gender: request.gender,
            age: request.age,
            weight: request.weight,
            height: request.height,
            virtue_points: request.virtue_points,
            level: request.level.map(parse_level).transpose()?,
            current_xp: request.current_xp,
            max_berkana: request.max_berkana,
            current_berkana: request.current_berkana,
            berkana_bonus: request.berkana_bonus,
            attributes: request.attributes,
            vitality: request.vitality,
            current_vitality: request.current_vitality,
            skills: request.skills,
            weapons: request.weapons,
            armor: request.armor,
            adventure_kit: request.adventure_kit,
            finances: request.finances,
            languages: request.languages,
            spells: request.spells,
            talents: request.talents,
            notes: request.notes,
        })
    }
}

// =============================================================================
// Calculations
// =============================================================================

#[derive(Debug, Deserialize, Validate)]
pub struct CalculateVitalityRequest {
    #[validate(custom(function = "validate_vitality_base"))]
    pub vitality: VitalityBase,
    #[validate(range(max = 99))]
    pub level: u8,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CalculateBerkanaRequest {
    #[validate(range(max = 99))]
    pub level: u8,
    #[validate(range(min = 0, max = MAX_SHEET_VALUE))]
    pub base_value: i32,
    #[validate(range(min = -MAX_SHEET_VALUE, max = MAX_SHEET_VALUE))]
    pub bonus: i32,
}

/// Body shared by skill validation and skill-point calculation.
#[derive(Debug, Deserialize, Validate)]
pub struct SkillsRequest {
    #[validate(custom(function = "validate_skills"))]
    pub skills: SkillMap,
    #[validate(range(max = 99))]
    pub level: u8,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CalculateAttributesRequest {
    #[validate(custom(function = "validate_attributes"))]
    pub attributes: AttributeMap,
    #[validate(range(max = 99))]
    pub level: u8,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CalculateXpRequest {
    #[validate(range(max = 98))]
    pub current_level: u8,
}

#[derive(Debug, Deserialize, Validate)]
pub struct DamageRequest {
    #[validate(range(min = 1))]
    pub amount: i32,
}

#[derive(Debug, Deserialize, Validate)]
pub struct BerkanaActionRequest {
    pub action: BerkanaQuickAction,
}

#[derive(Debug, Serialize)]
pub struct HealResponse {
    pub vitality: VitalityLevels,
}
