//! Level progression.
//!
//! A level-up advances exactly one level per call. Failing preconditions are
//! returned as a typed error and nothing changes.

use serde::Serialize;
use thiserror::Error;

use super::formulas::{
    max_berkana, vitality_levels, xp_required_for_next_level, SKILL_POINTS_PER_LEVEL,
};
use crate::value_objects::{Level, VitalityBase, VitalityLevels, BERKANA_BASE};

/// Everything a level-up reads from the character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelUpInput {
    pub level: Level,
    pub current_xp: u32,
    pub vitality_base: VitalityBase,
    pub berkana_bonus: i32,
}

/// New field set produced by a successful level-up.
///
/// Persisting it is the caller's job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelUpOutcome {
    pub old_level: Level,
    pub new_level: Level,
    #[serde(rename = "oldCurrentXP")]
    pub old_xp: u32,
    #[serde(rename = "newCurrentXP")]
    pub new_current_xp: u32,
    #[serde(rename = "xpUsedForLevelUp")]
    pub xp_used_for_level_up: u32,
    pub new_vitality_levels: VitalityLevels,
    pub new_max_berkana: i32,
    pub new_skill_points_available: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LevelUpError {
    #[error("Nível máximo ({max}) já alcançado", max = Level::MAX)]
    MaxLevelReached,

    #[error("XP insuficiente: {current_xp}/{required}")]
    InsufficientXp { current_xp: u32, required: u32 },
}

/// Whether `level_up` would succeed for `input`.
pub fn can_level_up(input: &LevelUpInput) -> bool {
    level_up(input).is_ok()
}

/// Advance one level, spending the XP cost of the level being completed.
pub fn level_up(input: &LevelUpInput) -> Result<LevelUpOutcome, LevelUpError> {
    let new_level = input.level.next().ok_or(LevelUpError::MaxLevelReached)?;

    let required = xp_required_for_next_level(input.level);
    if input.current_xp < required {
        return Err(LevelUpError::InsufficientXp {
            current_xp: input.current_xp,
            required,
        });
    }

    Ok(LevelUpOutcome {
        old_level: input.level,
        new_level,
        old_xp: input.current_xp,
        new_current_xp: input.current_xp - required,
        xp_used_for_level_up: required,
        new_vitality_levels: vitality_levels(&input.vitality_base, new_level),
        new_max_berkana: max_berkana(new_level, BERKANA_BASE, input.berkana_bonus),
        new_skill_points_available: SKILL_POINTS_PER_LEVEL,
    })
}
