//! Skill distribution validation.
//!
//! Invalid distributions are reported, never corrected: the validator does not
//! mutate its input and has no failure mode of its own.

use serde::Serialize;
use std::fmt;

use super::formulas::total_skill_points;
use crate::value_objects::{Level, Skill, SkillMap};

/// Points a single skill may hold per character level.
pub const MAX_POINTS_PER_SKILL_PER_LEVEL: i32 = 3;

/// Per-skill cap at `level`: `level * 3`.
pub fn max_points_per_skill(level: Level) -> i32 {
    level.as_i32() * MAX_POINTS_PER_SKILL_PER_LEVEL
}

/// Sum of distributed points across all skills.
pub fn used_skill_points(skills: &SkillMap) -> i32 {
    skills
        .values()
        .fold(0, |used: i32, skill| used.saturating_add(skill.distributed))
}

/// Points still free to distribute at `level`, never below zero.
pub fn available_skill_points(skills: &SkillMap, level: Level) -> i32 {
    total_skill_points(level)
        .saturating_sub(used_skill_points(skills))
        .max(0)
}

/// A single problem found in a skill distribution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkillIssue {
    /// The global sum is over the level allowance.
    TotalExceeded { used: i32, available: i32 },
    /// One skill holds more than the per-skill cap.
    AboveCap { skill: Skill, distributed: i32, max: i32 },
    /// One skill holds a negative amount.
    Negative { skill: Skill },
}

impl SkillIssue {
    /// The skill this issue is about, if it is skill-specific.
    pub fn skill(&self) -> Option<Skill> {
        match self {
            Self::TotalExceeded { .. } => None,
            Self::AboveCap { skill, .. } | Self::Negative { skill } => Some(*skill),
        }
    }
}

impl fmt::Display for SkillIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TotalExceeded { used, available } => write!(
                f,
                "Total de pontos usado ({}) excede o disponível ({})",
                used, available
            ),
            Self::AboveCap {
                skill,
                distributed,
                max,
            } => write!(
                f,
                "{}: {} pontos excedem o máximo de {}",
                skill, distributed, max
            ),
            Self::Negative { skill } => {
                write!(f, "{}: pontos distribuídos não podem ser negativos", skill)
            }
        }
    }
}

/// Result of validating a skill distribution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkillValidation {
    issues: Vec<SkillIssue>,
}

impl SkillValidation {
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn issues(&self) -> &[SkillIssue] {
        &self.issues
    }

    /// Human-readable messages, in check order.
    pub fn errors(&self) -> Vec<String> {
        self.issues.iter().map(ToString::to_string).collect()
    }

    /// Distinct skills with at least one issue, in sheet order.
    pub fn skills_with_issues(&self) -> Vec<Skill> {
        let mut skills: Vec<Skill> = self.issues.iter().filter_map(SkillIssue::skill).collect();
        skills.dedup();
        skills
    }

    /// Wire form: `{ isValid, errors }`.
    pub fn report(&self) -> ValidationReport {
        ValidationReport {
            is_valid: self.is_valid(),
            errors: self.errors(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

/// Check `skills` against the level allowances.
///
/// The global total is checked first, then each skill in sheet order: the
/// per-skill cap, then the sign. A skill can report both.
pub fn validate_skill_distribution(skills: &SkillMap, level: Level) -> SkillValidation {
    let mut issues = Vec::new();

    let used = used_skill_points(skills);
    let available = total_skill_points(level);
    if used > available {
        issues.push(SkillIssue::TotalExceeded { used, available });
    }

    let max = max_points_per_skill(level);
    for skill in Skill::ALL {
        let Some(value) = skills.get(&skill) else {
            continue;
        };
        if value.distributed > max {
            issues.push(SkillIssue::AboveCap {
                skill,
                distributed: value.distributed,
                max,
            });
        }
        if value.distributed < 0 {
            issues.push(SkillIssue::Negative { skill });
        }
    }

    SkillValidation { issues }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::{zeroed_skills, SkillValue};

    fn level(value: u8) -> Level {
        Level::new(value).unwrap()
    }

    fn skills(entries: &[(Skill, i32)]) -> SkillMap {
        let mut map = zeroed_skills();
        for (skill, distributed) in entries {
            map.insert(*skill, SkillValue::new(*distributed, 0));
        }
        map
    }

    #[test]
    fn skill_above_cap_is_reported() {
        let result = validate_skill_distribution(&skills(&[(Skill::Stealth, 7)]), level(2));

        assert!(!result.is_valid());
        assert_eq!(result.skills_with_issues(), vec![Skill::Stealth]);
        assert_eq!(
            result.errors(),
            vec!["furtividade: 7 pontos excedem o máximo de 6".to_string()]
        );
    }

    #[test]
    fn skill_at_cap_is_valid() {
        let result = validate_skill_distribution(&skills(&[(Skill::Stealth, 6)]), level(2));
        assert!(result.is_valid());
        assert!(result.errors().is_empty());
    }

    #[test]
    fn global_total_is_checked_first() {
        let map = skills(&[
            (Skill::Speed, 9),
            (Skill::Acrobatics, 3),
            (Skill::Healing, 3),
        ]);
        let result = validate_skill_distribution(&map, level(1));

        assert_eq!(
            result.issues()[0],
            SkillIssue::TotalExceeded {
                used: 15,
                available: 10
            }
        );
        assert_eq!(
            result.skills_with_issues(),
            vec![Skill::Speed],
            "only speed exceeds the per-skill cap of 3"
        );
    }

    #[test]
    fn per_skill_issues_follow_sheet_order() {
        let map = skills(&[(Skill::Speed, 4), (Skill::Acrobatics, 4)]);
        let result = validate_skill_distribution(&map, level(1));

        assert_eq!(
            result.skills_with_issues(),
            vec![Skill::Acrobatics, Skill::Speed]
        );
    }

    #[test]
    fn negative_distribution_is_always_invalid() {
        let result = validate_skill_distribution(&skills(&[(Skill::Bluff, -1)]), Level::MAX);

        assert_eq!(result.issues(), &[SkillIssue::Negative { skill: Skill::Bluff }]);
        assert_eq!(
            result.errors()[0],
            "blefar: pontos distribuídos não podem ser negativos"
        );
    }

    #[test]
    fn level_zero_allows_nothing() {
        let result = validate_skill_distribution(&skills(&[(Skill::Swimming, 1)]), level(0));
        assert_eq!(result.issues().len(), 2);
        assert!(validate_skill_distribution(&zeroed_skills(), level(0)).is_valid());
    }

    #[test]
    fn point_accounting() {
        let map = skills(&[(Skill::Healing, 4), (Skill::Riding, 3)]);
        assert_eq!(used_skill_points(&map), 7);
        assert_eq!(available_skill_points(&map, level(1)), 3);
        assert_eq!(available_skill_points(&map, level(0)), 0);
    }

    #[test]
    fn extreme_distributions_do_not_overflow() {
        let map = skills(&[(Skill::Healing, 2_000_000_000), (Skill::Riding, 2_000_000_000)]);

        assert_eq!(used_skill_points(&map), i32::MAX);
        assert_eq!(available_skill_points(&map, Level::MAX), 0);

        let result = validate_skill_distribution(&map, Level::MAX);
        assert_eq!(
            result.issues()[0],
            SkillIssue::TotalExceeded {
                used: i32::MAX,
                available: 990
            }
        );
        assert_eq!(
            result.skills_with_issues(),
            vec![Skill::Healing, Skill::Riding]
        );
    }

    #[test]
    fn issues_follow_sheet_order_not_input_order() {
        let map: SkillMap = serde_json::from_str(
            r#"{
                "velocidade": {"distributed": 4, "bonus": 0},
                "cura": {"distributed": 4, "bonus": 0},
                "acrobacia": {"distributed": 4, "bonus": 0}
            }"#,
        )
        .unwrap();

        let result = validate_skill_distribution(&map, level(1));

        assert_eq!(
            result.errors(),
            vec![
                "Total de pontos usado (12) excede o disponível (10)".to_string(),
                "acrobacia: 4 pontos excedem o máximo de 3".to_string(),
                "cura: 4 pontos excedem o máximo de 3".to_string(),
                "velocidade: 4 pontos excedem o máximo de 3".to_string(),
            ]
        );
    }

    #[test]
    fn report_serializes_camel_case() {
        let report = validate_skill_distribution(&zeroed_skills(), level(3)).report();
        let json = serde_json::to_value(report).unwrap();
        assert_eq!(json["isValid"], true);
        assert_eq!(json["errors"], serde_json::json!([]));
    }
}
