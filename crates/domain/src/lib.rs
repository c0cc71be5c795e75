//! Berkana domain: character sheet types and the pure rules behind them.
//!
//! No I/O and no async here. Persistence and transport live in the engine.

pub mod aggregates;
pub mod error;
pub mod ids;
pub mod rules;
pub mod value_objects;

pub use aggregates::{Character, CharacterProfile, CharacterSummary, CharacterUpdate, SheetDocuments};
pub use error::DomainError;
pub use ids::CharacterId;

pub use rules::{
    all_attribute_totals, all_skill_totals, attribute_total, available_skill_points,
    can_level_up, level_bonus, level_up, max_berkana, max_points_per_skill, recalculate_all,
    skill_points_per_level, skill_total, total_skill_points, total_xp_for_level,
    used_skill_points, validate_skill_distribution, vitality_levels, vitality_multiplier,
    xp_required_for_next_level, LevelUpError, LevelUpInput, LevelUpOutcome, Recalculation,
    RecalculationInput, SkillIssue, SkillValidation, SkillValidationSummary, ValidationReport,
};

pub use value_objects::{
    zeroed_attributes, zeroed_skills, Attribute, AttributeMap, AttributeValue,
    BerkanaQuickAction, CharacterName, CurrentVitality, DamageReport, Level, Skill, SkillMap,
    SkillValue, VitalityBase, VitalityLevels, VitalityTier, BERKANA_BASE,
};
