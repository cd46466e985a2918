//! Component definitions for stalkers.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::ItemId;
use crate::mechanics::{AnomalyKind, StatusEffectKind, StatusEffectDef};

/// Artifact belt capacity.
pub const MAX_ARTIFACT_SLOTS: usize = 3;

/// Gear currently equipped by a stalker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Equipment {
    pub weapon: Option<ItemId>,
    pub armor: Option<ItemId>,
    #[serde(default)]
    pub artifacts: Vec<ItemId>,
}

/// Flat bonuses granted by artifacts and training.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct Bonuses {
    /// Percentage points added to hit chance.
    pub combat_bonus: i32,
    /// Flat damage added to the equipped weapon.
    pub weapon_bonus: i32,
    /// Percentage of emission and radiation damage shrugged off.
    pub radiation_resistance: u32,
}

/// An active status effect with its countdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEffectInstance {
    pub kind: StatusEffectKind,
    pub remaining_rounds: u32,
}

impl StatusEffectInstance {
    /// Create a fresh instance running for the effect's full duration.
    pub fn new(kind: StatusEffectKind) -> Self {
        Self {
            kind,
            remaining_rounds: kind.definition().duration,
        }
    }

    pub fn definition(&self) -> StatusEffectDef {
        self.kind.definition()
    }

    /// Count down one round. Returns true once the effect has run out.
    pub fn tick(&mut self) -> bool {
        self.remaining_rounds = self.remaining_rounds.saturating_sub(1);
        self.remaining_rounds == 0
    }
}

/// Actions gated by a cooldown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActionKind {
    Hunt,
    Explore,
    Travel,
    Scout,
    Camp,
    Detect,
    AnomalyScan,
    AnomalyEnter,
}

impl ActionKind {
    pub const ALL: [ActionKind; 8] = [
        ActionKind::Hunt,
        ActionKind::Explore,
        ActionKind::Travel,
        ActionKind::Scout,
        ActionKind::Camp,
        ActionKind::Detect,
        ActionKind::AnomalyScan,
        ActionKind::AnomalyEnter,
    ];
}

/// Action -> epoch millisecond timestamp when the action is next allowed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Cooldowns(BTreeMap<ActionKind, i64>);

impl Cooldowns {
    /// When `action` is next allowed, if it has ever been gated.
    pub fn ready_at(&self, action: ActionKind) -> Option<i64> {
        self.0.get(&action).copied()
    }

    pub fn set_ready_at(&mut self, action: ActionKind, at: i64) {
        self.0.insert(action, at);
    }

    pub fn clear(&mut self, action: ActionKind) {
        self.0.remove(&action);
    }
}

/// An anomaly field the stalker has located and may step into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveAnomaly {
    pub kind: AnomalyKind,
    pub detected_at: i64,
    pub expires_at: i64,
}

impl ActiveAnomaly {
    pub fn is_expired(&self, now: i64) -> bool {
        now > self.expires_at
    }
}
