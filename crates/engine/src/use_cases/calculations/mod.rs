//! Calculation use cases scoped to a stored character.
//!
//! Every operation first checks the character exists. The ad-hoc calculators
//! (vitality, Berkana, skills, attributes, XP, skill points) compute from the
//! request values and never write. Level-up, damage, heal and Berkana actions
//! persist the updated sheet.

use std::collections::BTreeMap;
use std::sync::Arc;

use berkana_domain::rules::{
    all_attribute_totals, all_skill_totals, available_skill_points, level_bonus, max_berkana,
    skill_points_per_level, total_skill_points, total_xp_for_level, used_skill_points,
    validate_skill_distribution, vitality_levels, vitality_multiplier,
    xp_required_for_next_level, BERKANA_PER_LEVEL,
};
use berkana_domain::{
    Attribute, AttributeMap, BerkanaQuickAction, Character, CharacterId, DamageReport, Level,
    LevelUpError, LevelUpOutcome, Recalculation, Skill, SkillMap, VitalityBase, VitalityLevels,
};
use serde::Serialize;

use crate::infrastructure::ports::{CharacterRepo, ClockPort, RepoError};

#[derive(Debug, thiserror::Error)]
pub enum CalculationError {
    #[error("Character not found: {0}")]
    NotFound(CharacterId),
    #[error(transparent)]
    LevelUp(#[from] LevelUpError),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

// =============================================================================
// Results
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VitalityCalculation {
    pub level: Level,
    pub vitality_base: VitalityBase,
    pub vitality_levels: VitalityLevels,
    pub calculations: VitalityBreakdown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VitalityBreakdown {
    pub base_total: i32,
    pub multiplier: i32,
    pub formula: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BerkanaCalculation {
    pub level: Level,
    pub base_value: i32,
    pub bonus: i32,
    pub max_berkana: i32,
    pub calculations: BerkanaBreakdown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BerkanaBreakdown {
    pub level_bonus: i32,
    pub formula: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub summary: SkillPointSummary,
    pub skill_totals: BTreeMap<Skill, i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillPointSummary {
    pub total_available: i32,
    pub total_used: i32,
    /// Can go negative when the distribution is over budget.
    pub total_remaining: i32,
    pub skills_with_issues: Vec<Skill>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeCalculation {
    pub level: Level,
    pub attribute_totals: BTreeMap<Attribute, i32>,
    pub calculations: AttributeBreakdown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeBreakdown {
    pub level_bonus: i32,
    pub formula: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct XpCalculation {
    pub current_level: Level,
    pub xp_required_for_next: u32,
    #[serde(rename = "totalXPForCurrentLevel")]
    pub total_xp_for_current_level: u32,
    #[serde(rename = "totalXPForNextLevel")]
    pub total_xp_for_next_level: u32,
    pub max_level: Level,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillPointsCalculation {
    pub level: Level,
    pub points_per_level: i32,
    pub total_available: i32,
    pub total_used: i32,
    /// Never below zero.
    pub total_remaining: i32,
    pub breakdown: SkillPointsBreakdown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillPointsBreakdown {
    pub distributed: BTreeMap<Skill, i32>,
    pub totals: BTreeMap<Skill, i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BerkanaActionResult {
    pub current_berkana: i32,
    pub max_berkana: i32,
}

// =============================================================================
// Use cases
// =============================================================================

pub struct CharacterCalculations {
    repo: Arc<dyn CharacterRepo>,
    clock: Arc<dyn ClockPort>,
}

impl CharacterCalculations {
    pub fn new(repo: Arc<dyn CharacterRepo>, clock: Arc<dyn ClockPort>) -> Self {
        Self { repo, clock }
    }

    async fn load(&self, character_id: CharacterId) -> Result<Character, CalculationError> {
        self.repo
            .get(character_id)
            .await?
            .ok_or(CalculationError::NotFound(character_id))
    }

    /// Advance the character one level and persist level, XP and Berkana max.
    ///
    /// A failed precondition writes nothing.
    pub async fn level_up(
        &self,
        character_id: CharacterId,
    ) -> Result<LevelUpOutcome, CalculationError> {
        let mut character = self.load(character_id).await?;

        let outcome = match character.level_up(self.clock.now()) {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!(
                    character_id = %character_id,
                    level = %character.level(),
                    current_xp = character.current_xp(),
                    error = %e,
                    "Level up rejected"
                );
                return Err(e.into());
            }
        };

        self.repo.save(&character).await?;

        tracing::info!(
            character_id = %character_id,
            old_level = %outcome.old_level,
            new_level = %outcome.new_level,
            xp_used = outcome.xp_used_for_level_up,
            "Character leveled up"
        );
        Ok(outcome)
    }

    pub async fn calculate_vitality(
        &self,
        character_id: CharacterId,
        vitality_base: VitalityBase,
        level: Level,
    ) -> Result<VitalityCalculation, CalculationError> {
        self.load(character_id).await?;

        let multiplier = vitality_multiplier(level);
        Ok(VitalityCalculation {
            level,
            vitality_base,
            vitality_levels: vitality_levels(&vitality_base, level),
            calculations: VitalityBreakdown {
                base_total: vitality_base.total(),
                multiplier,
                formula: format!(
                    "({} + {}) * {}",
                    vitality_base.race, vitality_base.class, multiplier
                ),
            },
        })
    }

    pub async fn calculate_berkana(
        &self,
        character_id: CharacterId,
        level: Level,
        base_value: i32,
        bonus: i32,
    ) -> Result<BerkanaCalculation, CalculationError> {
        if base_value < 0 {
            return Err(CalculationError::InvalidInput(
                "baseValue must be non-negative".to_string(),
            ));
        }
        self.load(character_id).await?;

        let max = max_berkana(level, base_value, bonus);
        Ok(BerkanaCalculation {
            level,
            base_value,
            bonus,
            max_berkana: max,
            calculations: BerkanaBreakdown {
                level_bonus: level.as_i32() * BERKANA_PER_LEVEL,
                formula: format!(
                    "{} + ({} * {}) + {} = {}",
                    base_value, level, BERKANA_PER_LEVEL, bonus, max
                ),
            },
        })
    }

    pub async fn validate_skills(
        &self,
        character_id: CharacterId,
        skills: SkillMap,
        level: Level,
    ) -> Result<SkillValidationResult, CalculationError> {
        self.load(character_id).await?;

        let validation = validate_skill_distribution(&skills, level);
        let total_available = total_skill_points(level);
        let total_used = used_skill_points(&skills);

        Ok(SkillValidationResult {
            is_valid: validation.is_valid(),
            errors: validation.errors(),
            summary: SkillPointSummary {
                total_available,
                total_used,
                total_remaining: total_available.saturating_sub(total_used),
                skills_with_issues: validation.skills_with_issues(),
            },
            skill_totals: all_skill_totals(&skills, level),
        })
    }

    pub async fn calculate_attributes(
        &self,
        character_id: CharacterId,
        attributes: AttributeMap,
        level: Level,
    ) -> Result<AttributeCalculation, CalculationError> {
        self.load(character_id).await?;

        let bonus = level_bonus(level);
        Ok(AttributeCalculation {
            level,
            attribute_totals: all_attribute_totals(&attributes, level),
            calculations: AttributeBreakdown {
                level_bonus: bonus,
                formula: format!("race + class + bonus + {}", bonus),
            },
        })
    }

    /// XP thresholds around `current_level`. Level 99 has no next level and is
    /// rejected.
    pub async fn calculate_xp(
        &self,
        character_id: CharacterId,
        current_level: Level,
    ) -> Result<XpCalculation, CalculationError> {
        let next_level = current_level.next().ok_or_else(|| {
            CalculationError::InvalidInput(format!(
                "currentLevel must be below {}",
                Level::MAX
            ))
        })?;
        self.load(character_id).await?;

        Ok(XpCalculation {
            current_level,
            xp_required_for_next: xp_required_for_next_level(current_level),
            total_xp_for_current_level: total_xp_for_level(current_level),
            total_xp_for_next_level: total_xp_for_level(next_level),
            max_level: Level::MAX,
        })
    }

    pub async fn calculate_skill_points(
        &self,
        character_id: CharacterId,
        skills: SkillMap,
        level: Level,
    ) -> Result<SkillPointsCalculation, CalculationError> {
        self.load(character_id).await?;

        let distributed = skills
            .iter()
            .map(|(skill, value)| (*skill, value.distributed))
            .collect();

        Ok(SkillPointsCalculation {
            level,
            points_per_level: skill_points_per_level(),
            total_available: total_skill_points(level),
            total_used: used_skill_points(&skills),
            total_remaining: available_skill_points(&skills, level),
            breakdown: SkillPointsBreakdown {
                distributed,
                totals: all_skill_totals(&skills, level),
            },
        })
    }

    /// Every derived value of the stored sheet. Writes nothing.
    pub async fn recalculate(
        &self,
        character_id: CharacterId,
    ) -> Result<Recalculation, CalculationError> {
        Ok(self.load(character_id).await?.recalculate())
    }

    pub async fn apply_damage(
        &self,
        character_id: CharacterId,
        amount: i32,
    ) -> Result<DamageReport, CalculationError> {
        if amount < 1 {
            return Err(CalculationError::InvalidInput(
                "damage amount must be at least 1".to_string(),
            ));
        }
        let mut character = self.load(character_id).await?;

        let report = character.take_damage(amount, self.clock.now());
        self.repo.save(&character).await?;

        tracing::info!(
            character_id = %character_id,
            amount,
            absorbed = report.absorbed,
            unabsorbed = report.unabsorbed,
            "Damage applied"
        );
        Ok(report)
    }

    pub async fn heal(&self, character_id: CharacterId) -> Result<VitalityLevels, CalculationError> {
        let mut character = self.load(character_id).await?;

        let healed = character.heal_fully(self.clock.now());
        self.repo.save(&character).await?;

        tracing::info!(character_id = %character_id, "Character fully healed");
        Ok(healed)
    }

    pub async fn berkana_action(
        &self,
        character_id: CharacterId,
        action: BerkanaQuickAction,
    ) -> Result<BerkanaActionResult, CalculationError> {
        let mut character = self.load(character_id).await?;

        let current = character.apply_berkana_action(action, self.clock.now());
        self.repo.save(&character).await?;

        tracing::info!(
            character_id = %character_id,
            action = ?action,
            current_berkana = current,
            "Berkana adjusted"
        );
        Ok(BerkanaActionResult {
            current_berkana: current,
            max_berkana: character.computed_max_berkana(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::{MockCharacterRepo, MockClockPort};
    use berkana_domain::{
        AttributeValue, CharacterName, CharacterUpdate, SkillValue, VitalityTier,
    };
    use chrono::{DateTime, TimeZone, Utc};
    use mockall::predicate::*;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 10, 30, 0).unwrap()
    }

    fn clock() -> MockClockPort {
        let mut clock = MockClockPort::new();
        clock.expect_now().returning(fixed_now);
        clock
    }

    fn level(value: u8) -> Level {
        Level::new(value).unwrap()
    }

    fn sheet(update: CharacterUpdate) -> Character {
        let created = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let mut character = Character::new(CharacterName::new("Ayla").unwrap(), created);
        character.apply_update(update, created).unwrap();
        character
    }

    fn repo_with(character: Character) -> MockCharacterRepo {
        let id = character.id();
        let mut repo = MockCharacterRepo::new();
        repo.expect_get()
            .with(eq(id))
            .returning(move |_| Ok(Some(character.clone())));
        repo
    }

    fn missing_repo() -> MockCharacterRepo {
        let mut repo = MockCharacterRepo::new();
        repo.expect_get().returning(|_| Ok(None));
        repo.expect_save().never();
        repo
    }

    mod level_up {
        use super::*;

        #[tokio::test]
        async fn persists_new_level_xp_and_berkana() {
            let character = sheet(CharacterUpdate {
                level: Some(level(2)),
                current_xp: Some(35),
                vitality: Some(VitalityBase::new(60, 40)),
                ..Default::default()
            });
            let id = character.id();
            let mut repo = repo_with(character);
            repo.expect_save()
                .withf(|saved| {
                    saved.level().value() == 3
                        && saved.current_xp() == 5
                        && saved.max_berkana() == 130
                        && saved.updated_at() == fixed_now()
                })
                .times(1)
                .returning(|_| Ok(()));

            let use_case = CharacterCalculations::new(Arc::new(repo), Arc::new(clock()));
            let outcome = use_case.level_up(id).await.unwrap();

            assert_eq!(outcome.new_level.value(), 3);
            assert_eq!(outcome.xp_used_for_level_up, 30);
            assert_eq!(outcome.new_vitality_levels.notable, 400);
        }

        #[tokio::test]
        async fn insufficient_xp_writes_nothing() {
            let character = sheet(CharacterUpdate {
                level: Some(level(2)),
                current_xp: Some(29),
                ..Default::default()
            });
            let id = character.id();
            let mut repo = repo_with(character);
            repo.expect_save().never();

            let use_case = CharacterCalculations::new(Arc::new(repo), Arc::new(clock()));
            let result = use_case.level_up(id).await;

            assert!(matches!(
                result,
                Err(CalculationError::LevelUp(LevelUpError::InsufficientXp {
                    current_xp: 29,
                    required: 30
                }))
            ));
        }

        #[tokio::test]
        async fn max_level_writes_nothing() {
            let character = sheet(CharacterUpdate {
                level: Some(Level::MAX),
                current_xp: Some(1_000_000),
                ..Default::default()
            });
            let id = character.id();
            let mut repo = repo_with(character);
            repo.expect_save().never();

            let use_case = CharacterCalculations::new(Arc::new(repo), Arc::new(clock()));
            let result = use_case.level_up(id).await;

            assert!(matches!(
                result,
                Err(CalculationError::LevelUp(LevelUpError::MaxLevelReached))
            ));
        }

        #[tokio::test]
        async fn missing_character_is_not_found() {
            let use_case =
                CharacterCalculations::new(Arc::new(missing_repo()), Arc::new(clock()));
            let result = use_case.level_up(CharacterId::new()).await;
            assert!(matches!(result, Err(CalculationError::NotFound(_))));
        }
    }

    mod calculators {
        use super::*;

        fn use_case() -> (CharacterCalculations, CharacterId) {
            let character = sheet(CharacterUpdate::default());
            let id = character.id();
            let use_case =
                CharacterCalculations::new(Arc::new(repo_with(character)), Arc::new(clock()));
            (use_case, id)
        }

        #[tokio::test]
        async fn vitality_reports_breakdown() {
            let (use_case, id) = use_case();
            let result = use_case
                .calculate_vitality(id, VitalityBase::new(70, 50), level(2))
                .await
                .unwrap();

            assert_eq!(result.vitality_levels.notable, 360);
            assert_eq!(result.calculations.base_total, 120);
            assert_eq!(result.calculations.multiplier, 3);
            assert_eq!(result.calculations.formula, "(70 + 50) * 3");
        }

        #[tokio::test]
        async fn berkana_reports_level_bonus() {
            let (use_case, id) = use_case();
            let result = use_case.calculate_berkana(id, level(5), 100, 3).await.unwrap();

            assert_eq!(result.max_berkana, 153);
            assert_eq!(result.calculations.level_bonus, 50);
            assert_eq!(result.calculations.formula, "100 + (5 * 10) + 3 = 153");
        }

        #[tokio::test]
        async fn negative_berkana_base_is_rejected() {
            let (use_case, id) = use_case();
            let result = use_case.calculate_berkana(id, level(5), -1, 0).await;
            assert!(matches!(result, Err(CalculationError::InvalidInput(_))));
        }

        #[tokio::test]
        async fn skill_validation_summary_can_go_negative() {
            let (use_case, id) = use_case();
            let mut skills = SkillMap::new();
            skills.insert(Skill::Stealth, SkillValue::new(7, 0));
            skills.insert(Skill::Healing, SkillValue::new(6, 0));
            skills.insert(Skill::Riding, SkillValue::new(6, 0));
            skills.insert(Skill::Swimming, SkillValue::new(6, 0));

            let result = use_case.validate_skills(id, skills, level(2)).await.unwrap();

            assert!(!result.is_valid);
            assert_eq!(result.summary.total_available, 20);
            assert_eq!(result.summary.total_used, 25);
            assert_eq!(result.summary.total_remaining, -5);
            assert_eq!(result.summary.skills_with_issues, vec![Skill::Stealth]);
            assert_eq!(result.errors.len(), 2);
            assert_eq!(result.skill_totals.len(), Skill::ALL.len());
        }

        #[tokio::test]
        async fn attributes_include_level_bonus() {
            let (use_case, id) = use_case();
            let mut attributes = AttributeMap::new();
            attributes.insert(Attribute::Courage, AttributeValue::new(2, 1, 0));

            let result = use_case
                .calculate_attributes(id, attributes, level(10))
                .await
                .unwrap();

            assert_eq!(result.calculations.level_bonus, 2);
            assert_eq!(result.attribute_totals[&Attribute::Courage], 5);
            assert_eq!(result.attribute_totals[&Attribute::Vigor], 2);
        }

        #[tokio::test]
        async fn xp_thresholds_around_level() {
            let (use_case, id) = use_case();
            let result = use_case.calculate_xp(id, level(3)).await.unwrap();

            assert_eq!(result.xp_required_for_next, 40);
            assert_eq!(result.total_xp_for_current_level, 60);
            assert_eq!(result.total_xp_for_next_level, 100);
            assert!(result.max_level.is_max());
        }

        #[tokio::test]
        async fn xp_at_max_level_is_rejected() {
            let (use_case, id) = use_case();
            let result = use_case.calculate_xp(id, Level::MAX).await;
            assert!(matches!(result, Err(CalculationError::InvalidInput(_))));
        }

        #[tokio::test]
        async fn skill_points_remaining_is_clamped() {
            let (use_case, id) = use_case();
            let mut skills = SkillMap::new();
            skills.insert(Skill::Dueling, SkillValue::new(15, 0));

            let result = use_case
                .calculate_skill_points(id, skills, level(1))
                .await
                .unwrap();

            assert_eq!(result.points_per_level, 10);
            assert_eq!(result.total_used, 15);
            assert_eq!(result.total_remaining, 0);
            assert_eq!(result.breakdown.distributed[&Skill::Dueling], 15);
            assert_eq!(result.breakdown.distributed.len(), 1);
            assert_eq!(result.breakdown.totals[&Skill::Dueling], 16);
        }

        #[tokio::test]
        async fn calculators_require_existing_character() {
            let use_case =
                CharacterCalculations::new(Arc::new(missing_repo()), Arc::new(clock()));
            let result = use_case
                .calculate_vitality(CharacterId::new(), VitalityBase::default(), level(1))
                .await;
            assert!(matches!(result, Err(CalculationError::NotFound(_))));
        }
    }

    mod resources {
        use super::*;

        fn wounded_sheet() -> Character {
            sheet(CharacterUpdate {
                vitality: Some(VitalityBase::new(40, 20)),
                ..Default::default()
            })
        }

        #[tokio::test]
        async fn recalculate_writes_nothing() {
            let character = wounded_sheet();
            let id = character.id();
            let expected = character.recalculate();
            let mut repo = repo_with(character);
            repo.expect_save().never();

            let use_case = CharacterCalculations::new(Arc::new(repo), Arc::new(clock()));
            let result = use_case.recalculate(id).await.unwrap();

            assert_eq!(result, expected);
            assert_eq!(result.calculated_vitality.notable, 60);
        }

        #[tokio::test]
        async fn damage_is_persisted() {
            let character = wounded_sheet();
            let id = character.id();
            let mut repo = repo_with(character);
            repo.expect_save()
                .withf(|saved| {
                    saved.current_vitality().get(VitalityTier::Notable) == Some(0)
                        && saved.current_vitality().get(VitalityTier::Wounded) == Some(30)
                })
                .times(1)
                .returning(|_| Ok(()));

            let use_case = CharacterCalculations::new(Arc::new(repo), Arc::new(clock()));
            let report = use_case.apply_damage(id, 70).await.unwrap();

            assert_eq!(report.absorbed, 70);
            assert_eq!(report.unabsorbed, 0);
        }

        #[tokio::test]
        async fn zero_damage_is_rejected() {
            let use_case =
                CharacterCalculations::new(Arc::new(missing_repo()), Arc::new(clock()));
            let result = use_case.apply_damage(CharacterId::new(), 0).await;
            assert!(matches!(result, Err(CalculationError::InvalidInput(_))));
        }

        #[tokio::test]
        async fn heal_stores_every_tier_at_max() {
            let character = wounded_sheet();
            let id = character.id();
            let mut repo = repo_with(character);
            repo.expect_save()
                .withf(|saved| saved.current_vitality_levels() == saved.max_vitality_levels())
                .times(1)
                .returning(|_| Ok(()));

            let use_case = CharacterCalculations::new(Arc::new(repo), Arc::new(clock()));
            let healed = use_case.heal(id).await.unwrap();

            assert_eq!(healed.notable, 60);
            assert_eq!(healed.coma, -40);
        }

        #[tokio::test]
        async fn berkana_action_is_persisted() {
            let character = sheet(CharacterUpdate {
                current_berkana: Some(40),
                ..Default::default()
            });
            let id = character.id();
            let mut repo = repo_with(character);
            repo.expect_save()
                .withf(|saved| saved.current_berkana() == 10)
                .times(1)
                .returning(|_| Ok(()));

            let use_case = CharacterCalculations::new(Arc::new(repo), Arc::new(clock()));
            let result = use_case
                .berkana_action(id, BerkanaQuickAction::Minus30)
                .await
                .unwrap();

            assert_eq!(
                result,
                BerkanaActionResult {
                    current_berkana: 10,
                    max_berkana: 100
                }
            );
        }
    }
}
