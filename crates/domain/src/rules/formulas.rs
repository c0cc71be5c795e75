//! Derived-stat formulas.
//!
//! Every function here is pure and total over its integer inputs: no clamping,
//! no I/O. Sums and products saturate at the `i32` bounds instead of
//! overflowing. `Level` already rules out levels outside `[0, 99]`.

use std::collections::BTreeMap;

use crate::value_objects::{
    Attribute, AttributeMap, AttributeValue, Level, Skill, SkillMap, SkillValue, VitalityBase,
    VitalityLevels,
};

/// Attributes and skills gain +1 every this many levels.
pub const LEVEL_BONUS_INTERVAL: u8 = 5;

/// Fixed base every skill total starts from.
pub const SKILL_BASE: i32 = 1;

/// Skill points granted per level.
pub const SKILL_POINTS_PER_LEVEL: i32 = 10;

/// Maximum Berkana gained per level.
pub const BERKANA_PER_LEVEL: i32 = 10;

/// XP cost step: completing level `n` costs `(n + 1) * XP_PER_LEVEL_STEP`.
pub const XP_PER_LEVEL_STEP: u32 = 10;

/// Flat bonus granted every five levels: `floor(level / 5)`.
pub fn level_bonus(level: Level) -> i32 {
    i32::from(level.value() / LEVEL_BONUS_INTERVAL)
}

// =============================================================================
// Attributes
// =============================================================================

/// `race + class + bonus + floor(level / 5)`
pub fn attribute_total(attribute: &AttributeValue, level: Level) -> i32 {
    attribute
        .race
        .saturating_add(attribute.class)
        .saturating_add(attribute.bonus)
        .saturating_add(level_bonus(level))
}

/// Totals for every attribute. Attributes missing from `attributes` count as zeroed.
pub fn all_attribute_totals(attributes: &AttributeMap, level: Level) -> BTreeMap<Attribute, i32> {
    Attribute::ALL
        .into_iter()
        .map(|attribute| {
            let value = attributes.get(&attribute).copied().unwrap_or_default();
            (attribute, attribute_total(&value, level))
        })
        .collect()
}

// =============================================================================
// Vitality
// =============================================================================

/// Every tier maximum is scaled by `level + 1`.
pub fn vitality_multiplier(level: Level) -> i32 {
    level.as_i32() + 1
}

/// Maximum value per vitality tier: `(race + class - offset) * (level + 1)`.
///
/// Small bases make the lower tiers negative; those values are returned as-is.
pub fn vitality_levels(base: &VitalityBase, level: Level) -> VitalityLevels {
    let base_total = base.total();
    let multiplier = vitality_multiplier(level);
    VitalityLevels::from_fn(|tier| {
        base_total
            .saturating_sub(tier.offset())
            .saturating_mul(multiplier)
    })
}

// =============================================================================
// Berkana
// =============================================================================

/// `base_value + level * 10 + bonus`
pub fn max_berkana(level: Level, base_value: i32, bonus: i32) -> i32 {
    base_value
        .saturating_add(level.as_i32() * BERKANA_PER_LEVEL)
        .saturating_add(bonus)
}

// =============================================================================
// Skills
// =============================================================================

/// `1 + distributed + bonus + floor(level / 5)`
pub fn skill_total(skill: &SkillValue, level: Level) -> i32 {
    SKILL_BASE
        .saturating_add(skill.distributed)
        .saturating_add(skill.bonus)
        .saturating_add(level_bonus(level))
}

/// Totals for every skill. Skills missing from `skills` count as zeroed.
pub fn all_skill_totals(skills: &SkillMap, level: Level) -> BTreeMap<Skill, i32> {
    Skill::ALL
        .into_iter()
        .map(|skill| {
            let value = skills.get(&skill).copied().unwrap_or_default();
            (skill, skill_total(&value, level))
        })
        .collect()
}

pub fn skill_points_per_level() -> i32 {
    SKILL_POINTS_PER_LEVEL
}

/// Skill points available in total at `level`.
pub fn total_skill_points(level: Level) -> i32 {
    level.as_i32() * SKILL_POINTS_PER_LEVEL
}

// =============================================================================
// Experience
// =============================================================================

/// XP needed to complete `current_level`: `(current_level + 1) * 10`.
pub fn xp_required_for_next_level(current_level: Level) -> u32 {
    (current_level.as_u32() + 1) * XP_PER_LEVEL_STEP
}

/// Cumulative XP needed to reach `target_level` from level 0.
///
/// Closed form of summing `xp_required_for_next_level` over `0..target_level`.
pub fn total_xp_for_level(target_level: Level) -> u32 {
    let target = target_level.as_u32();
    XP_PER_LEVEL_STEP * target * (target + 1) / 2
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level(value: u8) -> Level {
        Level::new(value).unwrap()
    }

    #[test]
    fn level_bonus_steps_every_five_levels() {
        assert_eq!(level_bonus(level(0)), 0);
        assert_eq!(level_bonus(level(4)), 0);
        assert_eq!(level_bonus(level(5)), 1);
        assert_eq!(level_bonus(level(9)), 1);
        assert_eq!(level_bonus(level(10)), 2);
        assert_eq!(level_bonus(Level::MAX), 19);
    }

    #[test]
    fn attribute_total_adds_contributions_and_level_bonus() {
        let value = AttributeValue::new(3, 2, 1);
        assert_eq!(attribute_total(&value, level(4)), 6);
        assert_eq!(attribute_total(&value, level(15)), 9);
    }

    #[test]
    fn attribute_total_is_non_decreasing_in_level() {
        let value = AttributeValue::new(-2, 5, 1);
        let totals: Vec<_> = (0..=99).map(|l| attribute_total(&value, level(l))).collect();
        assert!(totals.windows(2).all(|pair| pair[0] <= pair[1]));
    }

    #[test]
    fn all_attribute_totals_cover_missing_entries() {
        let mut attributes = AttributeMap::new();
        attributes.insert(Attribute::Vigor, AttributeValue::new(4, 0, 0));

        let totals = all_attribute_totals(&attributes, level(5));
        assert_eq!(totals.len(), Attribute::ALL.len());
        assert_eq!(totals[&Attribute::Vigor], 5);
        assert_eq!(totals[&Attribute::Agility], 1);
    }

    #[test]
    fn vitality_levels_scale_with_level() {
        let base = VitalityBase::new(70, 50);
        let levels = vitality_levels(&base, level(2));

        assert_eq!(levels.notable, 360);
        assert_eq!(levels.wounded, 300);
        assert_eq!(levels.gravely_wounded, 240);
        assert_eq!(levels.condemned, 180);
        assert_eq!(levels.incapacitated, 120);
        assert_eq!(levels.coma, 60);
    }

    #[test]
    fn vitality_tiers_are_ordered() {
        for base_total in [-30, 0, 45, 100, 250] {
            for l in [0, 1, 17, 99] {
                let levels = vitality_levels(&VitalityBase::new(base_total, 0), level(l));
                let values: Vec<_> = levels.iter().map(|(_, v)| v).collect();
                assert!(values.windows(2).all(|pair| pair[0] >= pair[1]));
            }
        }
    }

    #[test]
    fn vitality_levels_keep_negative_tiers() {
        let levels = vitality_levels(&VitalityBase::new(30, 10), level(0));
        assert_eq!(levels.notable, 40);
        assert_eq!(levels.gravely_wounded, 0);
        assert_eq!(levels.coma, -60);
    }

    #[test]
    fn max_berkana_concrete_case() {
        assert_eq!(max_berkana(level(5), 100, 3), 153);
        assert_eq!(max_berkana(level(0), 100, 0), 100);
    }

    #[test]
    fn skill_total_concrete_cases() {
        assert_eq!(skill_total(&SkillValue::new(0, 0), level(0)), 1);
        assert_eq!(skill_total(&SkillValue::new(5, 2), level(10)), 10);
    }

    #[test]
    fn all_skill_totals_cover_every_skill() {
        let totals = all_skill_totals(&SkillMap::new(), level(5));
        assert_eq!(totals.len(), Skill::ALL.len());
        assert!(totals.values().all(|total| *total == 2));
    }

    #[test]
    fn xp_thresholds() {
        assert_eq!(xp_required_for_next_level(level(0)), 10);
        assert_eq!(xp_required_for_next_level(level(9)), 100);
        assert_eq!(total_xp_for_level(level(0)), 0);
        assert_eq!(total_xp_for_level(level(3)), 60);
    }

    #[test]
    fn total_xp_matches_cumulative_sum() {
        for target in 0..=99u8 {
            let summed: u32 = (0..target).map(|l| xp_required_for_next_level(level(l))).sum();
            assert_eq!(total_xp_for_level(level(target)), summed);
        }
    }

    #[test]
    fn extreme_inputs_saturate() {
        let levels = vitality_levels(&VitalityBase::new(30_000_000, 0), Level::MAX);
        assert_eq!(levels.notable, i32::MAX);
        assert_eq!(levels.coma, i32::MAX);

        let levels = vitality_levels(&VitalityBase::new(i32::MIN, -1), Level::MAX);
        assert_eq!(levels.notable, i32::MIN);

        assert_eq!(attribute_total(&AttributeValue::new(i32::MAX, 1, 0), Level::ZERO), i32::MAX);
        assert_eq!(attribute_total(&AttributeValue::new(i32::MIN, -1, 0), Level::ZERO), i32::MIN);
        assert_eq!(skill_total(&SkillValue::new(i32::MAX, i32::MAX), level(50)), i32::MAX);
        assert_eq!(max_berkana(Level::MAX, i32::MAX, 1), i32::MAX);
        assert_eq!(max_berkana(Level::ZERO, 0, i32::MIN), i32::MIN);
    }

    #[test]
    fn skill_points_scale_with_level() {
        assert_eq!(skill_points_per_level(), 10);
        assert_eq!(total_skill_points(level(0)), 0);
        assert_eq!(total_skill_points(level(7)), 70);
    }
}
