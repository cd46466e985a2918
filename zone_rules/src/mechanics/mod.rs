//! Game mechanics: damage kinds, status effects, weapon classes, mutant abilities and anomalies.

mod ability;
mod anomaly;
mod weapon;

pub use ability::*;
pub use anomaly::*;
pub use weapon::*;

use serde::{Deserialize, Serialize};

/// Highest radiation level a stalker can accumulate.
pub const MAX_RADIATION: u32 = 100;

/// Damage kinds that armor protection and resistances are keyed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageKind {
    // Conventional
    Physical,

    // Zone hazards
    Radiation,
    Thermal,
    Electric,
    Gravitational,
    Chemical,
    Psychic,
}

/// Status effects that can be applied during a fight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusEffectKind {
    // Damage over time
    Bleeding,
    Radiation,

    // Control
    Stunned,

    // Buffs
    Enraged,
}

/// Static description of a status effect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatusEffectDef {
    pub name: &'static str,
    pub icon: &'static str,
    /// Rounds the effect lasts once applied.
    pub duration: u32,
    pub damage_per_round: u32,
    pub radiation_per_round: u32,
    /// Subtracted from the afflicted side's hit chance.
    pub accuracy_penalty: f64,
    /// Added to the afflicted side's outgoing damage multiplier.
    pub damage_bonus: f64,
    pub description: &'static str,
}

impl StatusEffectKind {
    pub const ALL: [StatusEffectKind; 4] = [
        StatusEffectKind::Bleeding,
        StatusEffectKind::Radiation,
        StatusEffectKind::Stunned,
        StatusEffectKind::Enraged,
    ];

    /// Get the static definition of this effect.
    pub const fn definition(self) -> StatusEffectDef {
        match self {
            StatusEffectKind::Bleeding => StatusEffectDef {
                name: "Bleeding",
                icon: "🩸",
                duration: 3,
                damage_per_round: 3,
                radiation_per_round: 0,
                accuracy_penalty: 0.0,
                damage_bonus: 0.0,
                description: "Losing blood over time",
            },
            StatusEffectKind::Radiation => StatusEffectDef {
                name: "Radiation Poisoning",
                icon: "☢️",
                duration: 5,
                damage_per_round: 0,
                radiation_per_round: 2,
                accuracy_penalty: 0.0,
                damage_bonus: 0.0,
                description: "Radiation building up in the body",
            },
            StatusEffectKind::Stunned => StatusEffectDef {
                name: "Stunned",
                icon: "💫",
                duration: 1,
                damage_per_round: 0,
                radiation_per_round: 0,
                accuracy_penalty: 0.5,
                damage_bonus: 0.0,
                description: "Dazed and struggling to aim",
            },
            StatusEffectKind::Enraged => StatusEffectDef {
                name: "Enraged",
                icon: "😡",
                duration: 2,
                damage_per_round: 0,
                radiation_per_round: 0,
                accuracy_penalty: 0.1,
                damage_bonus: 0.3,
                description: "Hitting harder but aiming worse",
            },
        }
    }

    /// Get the display name of this effect.
    pub fn name(self) -> &'static str {
        self.definition().name
    }
}

/// Equipment slots a stalker can fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentSlot {
    Weapon,
    Armor,
    /// Artifact belt, up to [`crate::MAX_ARTIFACT_SLOTS`] entries.
    Artifact,
}
