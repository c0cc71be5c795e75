//! Sheet rules: derived-stat formulas, skill validation, level progression
//! and full recalculation.
//!
//! Everything in this module is synchronous and pure.

pub mod formulas;
pub mod progression;
pub mod recalculation;
pub mod validation;

pub use formulas::{
    all_attribute_totals, all_skill_totals, attribute_total, level_bonus, max_berkana,
    skill_points_per_level, skill_total, total_skill_points, total_xp_for_level,
    vitality_levels, vitality_multiplier, xp_required_for_next_level, BERKANA_PER_LEVEL,
    SKILL_POINTS_PER_LEVEL,
};
pub use progression::{can_level_up, level_up, LevelUpError, LevelUpInput, LevelUpOutcome};
pub use recalculation::{recalculate_all, Recalculation, RecalculationInput, SkillValidationSummary};
pub use validation::{
    available_skill_points, max_points_per_skill, used_skill_points, validate_skill_distribution,
    SkillIssue, SkillValidation, ValidationReport, MAX_POINTS_PER_SKILL_PER_LEVEL,
};
