//! Character skills.
//!
//! A closed set of thirty-six skills. Players distribute points into skills
//! (bounded by the skill validator); bonuses come from equipment, talents and
//! the like.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;

/// One of the named character skills.
///
/// Declaration order is the canonical sheet order: validation diagnostics and
/// maps keyed by `Skill` follow it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Skill {
    #[serde(rename = "acrobacia")]
    Acrobatics,
    #[serde(rename = "atuacao", alias = "atuação")]
    Performance,
    #[serde(rename = "avaliar")]
    Appraise,
    #[serde(rename = "ataqueSurpresa", alias = "ataqueSupresa")]
    SneakAttack,
    #[serde(rename = "blefar")]
    Bluff,
    #[serde(rename = "concentracao", alias = "concentração")]
    Concentration,
    #[serde(rename = "controleArcano")]
    ArcaneControl,
    #[serde(rename = "controleEmocional")]
    EmotionalControl,
    #[serde(rename = "combateDesarmado")]
    UnarmedCombat,
    #[serde(rename = "conhecimentoArcano")]
    ArcaneLore,
    #[serde(rename = "conhecimentoPolitico")]
    PoliticalLore,
    #[serde(rename = "conhecimentoHistorico")]
    HistoricalLore,
    #[serde(rename = "conhecimentoReligioso")]
    ReligiousLore,
    #[serde(rename = "conhecimentoNatureza")]
    NatureLore,
    #[serde(rename = "conhecimentoMilitar")]
    MilitaryLore,
    #[serde(rename = "cura")]
    Healing,
    #[serde(rename = "cavalgar")]
    Riding,
    #[serde(rename = "duelo")]
    Dueling,
    #[serde(rename = "dissuadir")]
    Dissuade,
    #[serde(rename = "diplomacia")]
    Diplomacy,
    #[serde(rename = "discernir")]
    Discern,
    #[serde(rename = "dissimulacao", alias = "dissimulação")]
    Disguise,
    #[serde(rename = "empatia")]
    Empathy,
    #[serde(rename = "escalar")]
    Climbing,
    #[serde(rename = "equilibrio")]
    Balance,
    #[serde(rename = "furtar")]
    Pickpocket,
    #[serde(rename = "furtividade")]
    Stealth,
    #[serde(rename = "nadar")]
    Swimming,
    #[serde(rename = "oficios")]
    Crafts,
    #[serde(rename = "percepcao", alias = "percepção")]
    Perception,
    #[serde(rename = "prontidao", alias = "prontidão")]
    Alertness,
    #[serde(rename = "persuadir")]
    Persuasion,
    #[serde(rename = "sobrevivencia", alias = "sobrevivência")]
    Survival,
    #[serde(rename = "suportar")]
    Endurance,
    #[serde(rename = "salvar")]
    Rescue,
    #[serde(rename = "velocidade")]
    Speed,
}

impl Skill {
    /// Every skill, in sheet order.
    pub const ALL: [Skill; 36] = [
        Self::Acrobatics,
        Self::Performance,
        Self::Appraise,
        Self::SneakAttack,
        Self::Bluff,
        Self::Concentration,
        Self::ArcaneControl,
        Self::EmotionalControl,
        Self::UnarmedCombat,
        Self::ArcaneLore,
        Self::PoliticalLore,
        Self::HistoricalLore,
        Self::ReligiousLore,
        Self::NatureLore,
        Self::MilitaryLore,
        Self::Healing,
        Self::Riding,
        Self::Dueling,
        Self::Dissuade,
        Self::Diplomacy,
        Self::Discern,
        Self::Disguise,
        Self::Empathy,
        Self::Climbing,
        Self::Balance,
        Self::Pickpocket,
        Self::Stealth,
        Self::Swimming,
        Self::Crafts,
        Self::Perception,
        Self::Alertness,
        Self::Persuasion,
        Self::Survival,
        Self::Endurance,
        Self::Rescue,
        Self::Speed,
    ];

    /// Returns the stored record key (e.g., "acrobacia", "ataqueSurpresa").
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Acrobatics => "acrobacia",
            Self::Performance => "atuacao",
            Self::Appraise => "avaliar",
            Self::SneakAttack => "ataqueSurpresa",
            Self::Bluff => "blefar",
            Self::Concentration => "concentracao",
            Self::ArcaneControl => "controleArcano",
            Self::EmotionalControl => "controleEmocional",
            Self::UnarmedCombat => "combateDesarmado",
            Self::ArcaneLore => "conhecimentoArcano",
            Self::PoliticalLore => "conhecimentoPolitico",
            Self::HistoricalLore => "conhecimentoHistorico",
            Self::ReligiousLore => "conhecimentoReligioso",
            Self::NatureLore => "conhecimentoNatureza",
            Self::MilitaryLore => "conhecimentoMilitar",
            Self::Healing => "cura",
            Self::Riding => "cavalgar",
            Self::Dueling => "duelo",
            Self::Dissuade => "dissuadir",
            Self::Diplomacy => "diplomacia",
            Self::Discern => "discernir",
            Self::Disguise => "dissimulacao",
            Self::Empathy => "empatia",
            Self::Climbing => "escalar",
            Self::Balance => "equilibrio",
            Self::Pickpocket => "furtar",
            Self::Stealth => "furtividade",
            Self::Swimming => "nadar",
            Self::Crafts => "oficios",
            Self::Perception => "percepcao",
            Self::Alertness => "prontidao",
            Self::Persuasion => "persuadir",
            Self::Survival => "sobrevivencia",
            Self::Endurance => "suportar",
            Self::Rescue => "salvar",
            Self::Speed => "velocidade",
        }
    }

    /// Returns the label shown on the sheet.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Acrobatics => "Acrobacia",
            Self::Performance => "Atuação",
            Self::Appraise => "Avaliar",
            Self::SneakAttack => "Ataque Surpresa",
            Self::Bluff => "Blefar",
            Self::Concentration => "Concentração",
            Self::ArcaneControl => "Controle Arcano",
            Self::EmotionalControl => "Controle Emocional",
            Self::UnarmedCombat => "Combate (Desarmado)",
            Self::ArcaneLore => "Conhecimento Arcano",
            Self::PoliticalLore => "Conhecimento Político",
            Self::HistoricalLore => "Conhecimento Histórico",
            Self::ReligiousLore => "Conhecimento Religioso",
            Self::NatureLore => "Conhecimento da Natureza",
            Self::MilitaryLore => "Conhecimento Militar",
            Self::Healing => "Cura",
            Self::Riding => "Cavalgar",
            Self::Dueling => "Duelo",
            Self::Dissuade => "Dissuadir",
            Self::Diplomacy => "Diplomacia",
            Self::Discern => "Discernir",
            Self::Disguise => "Dissimulação",
            Self::Empathy => "Empatia",
            Self::Climbing => "Escalar",
            Self::Balance => "Equilíbrio",
            Self::Pickpocket => "Furtar",
            Self::Stealth => "Furtividade",
            Self::Swimming => "Nadar",
            Self::Crafts => "Ofícios",
            Self::Perception => "Percepção",
            Self::Alertness => "Prontidão",
            Self::Persuasion => "Persuadir",
            Self::Survival => "Sobrevivência",
            Self::Endurance => "Suportar",
            Self::Rescue => "Salvar",
            Self::Speed => "Velocidade",
        }
    }

    /// Accented or misspelled keys found in older records.
    fn from_legacy_key(key: &str) -> Option<Self> {
        match key {
            "atuação" => Some(Self::Performance),
            "ataqueSupresa" => Some(Self::SneakAttack),
            "concentração" => Some(Self::Concentration),
            "dissimulação" => Some(Self::Disguise),
            "percepção" => Some(Self::Perception),
            "prontidão" => Some(Self::Alertness),
            "sobrevivência" => Some(Self::Survival),
            _ => None,
        }
    }
}

impl fmt::Display for Skill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Skill {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        Self::ALL
            .into_iter()
            .find(|skill| skill.as_str() == key)
            .or_else(|| Self::from_legacy_key(key))
            .ok_or_else(|| DomainError::parse(format!("Unknown skill: {}", s)))
    }
}

/// Stored state for a single skill.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillValue {
    /// Player-allocated points. Bounded by the skill validator, not here.
    pub distributed: i32,
    pub bonus: i32,
}

impl SkillValue {
    pub fn new(distributed: i32, bonus: i32) -> Self {
        Self { distributed, bonus }
    }
}

/// Skill state keyed by skill.
pub type SkillMap = BTreeMap<Skill, SkillValue>;

/// A zeroed entry for every skill, as stored on a fresh character.
pub fn zeroed_skills() -> SkillMap {
    Skill::ALL
        .into_iter()
        .map(|skill| (skill, SkillValue::default()))
        .collect()
}
