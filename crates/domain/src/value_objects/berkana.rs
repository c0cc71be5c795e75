//! Berkana resource pool.

use serde::{Deserialize, Serialize};

/// Base value every character's maximum Berkana starts from.
pub const BERKANA_BASE: i32 = 100;

/// Quick adjustments to current Berkana offered on the sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BerkanaQuickAction {
    /// Refill to the computed maximum.
    Fill,
    /// Spend 30 points, never going below zero.
    Minus30,
    /// Spend 50 points, never going below zero.
    Minus50,
}

impl BerkanaQuickAction {
    /// Current Berkana after applying this action.
    pub fn apply(self, current: i32, max: i32) -> i32 {
        match self {
            Self::Fill => max,
            Self::Minus30 => current.saturating_sub(30).max(0),
            Self::Minus50 => current.saturating_sub(50).max(0),
        }
    }
}
