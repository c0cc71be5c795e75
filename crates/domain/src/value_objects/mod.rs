//! Value objects for the character sheet.

mod attribute;
mod berkana;
mod level;
mod names;
mod skill;
mod vitality;

pub use attribute::{zeroed_attributes, Attribute, AttributeMap, AttributeValue};
pub use berkana::{BerkanaQuickAction, BERKANA_BASE};
pub use level::Level;
pub use names::CharacterName;
pub use skill::{zeroed_skills, Skill, SkillMap, SkillValue};
pub use vitality::{
    CurrentVitality, DamageReport, VitalityBase, VitalityLevels, VitalityTier, VITALITY_TIER_STEP,
};
