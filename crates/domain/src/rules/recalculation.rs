//! Full recalculation of every derived value on a sheet.

use serde::Serialize;
use std::collections::BTreeMap;

use super::formulas::{all_attribute_totals, all_skill_totals, max_berkana, vitality_levels};
use super::validation::{available_skill_points, validate_skill_distribution, ValidationReport};
use crate::value_objects::{
    Attribute, AttributeMap, Level, Skill, SkillMap, VitalityBase, VitalityLevels, BERKANA_BASE,
};

/// Stored inputs the derived values are computed from.
#[derive(Debug, Clone, Copy)]
pub struct RecalculationInput<'a> {
    pub level: Level,
    pub attributes: &'a AttributeMap,
    pub vitality_base: VitalityBase,
    pub berkana_bonus: i32,
    pub skills: &'a SkillMap,
}

/// Every derived value, bundled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recalculation {
    pub level: Level,
    pub calculated_attributes: BTreeMap<Attribute, i32>,
    pub calculated_vitality: VitalityLevels,
    pub calculated_berkana: i32,
    pub calculated_skills: BTreeMap<Skill, i32>,
    pub skill_validation: SkillValidationSummary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillValidationSummary {
    #[serde(flatten)]
    pub report: ValidationReport,
    pub points_remaining: i32,
}

/// Recompute everything derived from `input`. Pure; calling it twice on the
/// same input gives the same bundle.
pub fn recalculate_all(input: &RecalculationInput<'_>) -> Recalculation {
    let level = input.level;
    Recalculation {
        level,
        calculated_attributes: all_attribute_totals(input.attributes, level),
        calculated_vitality: vitality_levels(&input.vitality_base, level),
        calculated_berkana: max_berkana(level, BERKANA_BASE, input.berkana_bonus),
        calculated_skills: all_skill_totals(input.skills, level),
        skill_validation: SkillValidationSummary {
            report: validate_skill_distribution(input.skills, level).report(),
            points_remaining: available_skill_points(input.skills, level),
        },
    }
}
