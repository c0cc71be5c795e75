//! Vitality (health) value objects.
//!
//! Health is split into six ordered wound tiers, from `notavel` (fine) down to
//! `coma`. Each tier has a maximum derived from the vitality base and level,
//! and a remaining value that damage eats into, healthiest tier first.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Tier offsets step down by this amount from one tier to the next.
pub const VITALITY_TIER_STEP: i32 = 20;

/// A vitality (wound) tier. Declaration order is healthiest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum VitalityTier {
    #[serde(rename = "notavel")]
    Notable,
    #[serde(rename = "ferido")]
    Wounded,
    #[serde(rename = "gravementeFerido")]
    GravelyWounded,
    #[serde(rename = "condenado")]
    Condemned,
    #[serde(rename = "incapacitado")]
    Incapacitated,
    #[serde(rename = "coma")]
    Coma,
}

impl VitalityTier {
    /// Every tier, healthiest first. Damage is absorbed in this order.
    pub const ALL: [VitalityTier; 6] = [
        Self::Notable,
        Self::Wounded,
        Self::GravelyWounded,
        Self::Condemned,
        Self::Incapacitated,
        Self::Coma,
    ];

    /// Amount subtracted from the vitality base for this tier
    /// (0 for `notavel`, 100 for `coma`).
    pub fn offset(&self) -> i32 {
        let index = match self {
            Self::Notable => 0,
            Self::Wounded => 1,
            Self::GravelyWounded => 2,
            Self::Condemned => 3,
            Self::Incapacitated => 4,
            Self::Coma => 5,
        };
        index * VITALITY_TIER_STEP
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Notable => "notavel",
            Self::Wounded => "ferido",
            Self::GravelyWounded => "gravementeFerido",
            Self::Condemned => "condenado",
            Self::Incapacitated => "incapacitado",
            Self::Coma => "coma",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Notable => "Notável",
            Self::Wounded => "Ferido",
            Self::GravelyWounded => "Gravemente Ferido",
            Self::Condemned => "Condenado",
            Self::Incapacitated => "Incapacitado",
            Self::Coma => "Coma",
        }
    }
}

impl fmt::Display for VitalityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Race and class contributions to the health pool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VitalityBase {
    pub race: i32,
    pub class: i32,
}

impl VitalityBase {
    pub fn new(race: i32, class: i32) -> Self {
        Self { race, class }
    }

    pub fn total(&self) -> i32 {
        self.race.saturating_add(self.class)
    }
}

/// One value per vitality tier.
///
/// Used both for computed maxima and for resolved remaining values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VitalityLevels {
    #[serde(rename = "notavel")]
    pub notable: i32,
    #[serde(rename = "ferido")]
    pub wounded: i32,
    #[serde(rename = "gravementeFerido")]
    pub gravely_wounded: i32,
    #[serde(rename = "condenado")]
    pub condemned: i32,
    #[serde(rename = "incapacitado")]
    pub incapacitated: i32,
    #[serde(rename = "coma")]
    pub coma: i32,
}

impl VitalityLevels {
    /// Build a value set by evaluating `f` for every tier.
    pub fn from_fn(mut f: impl FnMut(VitalityTier) -> i32) -> Self {
        Self {
            notable: f(VitalityTier::Notable),
            wounded: f(VitalityTier::Wounded),
            gravely_wounded: f(VitalityTier::GravelyWounded),
            condemned: f(VitalityTier::Condemned),
            incapacitated: f(VitalityTier::Incapacitated),
            coma: f(VitalityTier::Coma),
        }
    }

    pub fn get(&self, tier: VitalityTier) -> i32 {
        match tier {
            VitalityTier::Notable => self.notable,
            VitalityTier::Wounded => self.wounded,
            VitalityTier::GravelyWounded => self.gravely_wounded,
            VitalityTier::Condemned => self.condemned,
            VitalityTier::Incapacitated => self.incapacitated,
            VitalityTier::Coma => self.coma,
        }
    }

    pub fn set(&mut self, tier: VitalityTier, value: i32) {
        match tier {
            VitalityTier::Notable => self.notable = value,
            VitalityTier::Wounded => self.wounded = value,
            VitalityTier::GravelyWounded => self.gravely_wounded = value,
            VitalityTier::Condemned => self.condemned = value,
            VitalityTier::Incapacitated => self.incapacitated = value,
            VitalityTier::Coma => self.coma = value,
        }
    }

    /// Tier values, healthiest first.
    pub fn iter(&self) -> impl Iterator<Item = (VitalityTier, i32)> + '_ {
        VitalityTier::ALL.into_iter().map(|tier| (tier, self.get(tier)))
    }

    /// Sum across all tiers.
    pub fn total(&self) -> i32 {
        self.iter().map(|(_, value)| value).sum()
    }

    /// Absorb `damage` tier by tier, healthiest first.
    ///
    /// Each tier gives up at most its positive remaining value before the rest
    /// spills into the next tier. Tiers already at or below zero absorb
    /// nothing and are left untouched. Non-positive damage is a no-op.
    pub fn absorb_damage(&self, damage: i32) -> DamageReport {
        let mut remaining = *self;
        let mut left = damage.max(0);

        for tier in VitalityTier::ALL {
            if left == 0 {
                break;
            }
            let available = remaining.get(tier).max(0);
            let absorbed = available.min(left);
            remaining.set(tier, remaining.get(tier) - absorbed);
            left -= absorbed;
        }

        DamageReport {
            vitality: remaining,
            absorbed: damage.max(0) - left,
            unabsorbed: left,
        }
    }
}

/// Outcome of applying damage to a set of tier values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DamageReport {
    /// Remaining value per tier after the damage.
    pub vitality: VitalityLevels,
    /// Damage actually taken out of the tiers.
    pub absorbed: i32,
    /// Damage left over once every tier was exhausted.
    pub unabsorbed: i32,
}

/// Persisted remaining vitality per tier.
///
/// A tier without an entry is at full health, i.e. resolves to its computed
/// maximum. A persisted entry is authoritative even when it is zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrentVitality(BTreeMap<VitalityTier, i32>);

impl CurrentVitality {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, tier: VitalityTier) -> Option<i32> {
        self.0.get(&tier).copied()
    }

    pub fn set(&mut self, tier: VitalityTier, value: i32) {
        self.0.insert(tier, value);
    }

    /// Persist an explicit value for every tier.
    pub fn set_all(&mut self, levels: &VitalityLevels) {
        for (tier, value) in levels.iter() {
            self.0.insert(tier, value);
        }
    }

    /// Remaining value per tier, falling back to `max` where nothing is persisted.
    pub fn resolve(&self, max: &VitalityLevels) -> VitalityLevels {
        VitalityLevels::from_fn(|tier| self.get(tier).unwrap_or_else(|| max.get(tier)))
    }
}

impl From<VitalityLevels> for CurrentVitality {
    fn from(levels: VitalityLevels) -> Self {
        let mut current = Self::new();
        current.set_all(&levels);
        current
    }
}
