//! Anomaly field kinds.

use serde::{Deserialize, Serialize};

use super::DamageKind;

/// Kinds of anomaly fields found in the Zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyKind {
    Thermal,
    Electric,
    Gravitational,
    Chemical,
    Psychic,
}

/// Static description of an anomaly kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnomalyProfile {
    pub name: &'static str,
    pub description: &'static str,
    /// Inclusive damage range taken when walking into the field.
    pub damage: (u32, u32),
    /// Base chance of coming out with an artifact.
    pub artifact_chance: f64,
    pub warning: &'static str,
}

const ALL_KINDS: [AnomalyKind; 5] = [
    AnomalyKind::Thermal,
    AnomalyKind::Electric,
    AnomalyKind::Gravitational,
    AnomalyKind::Chemical,
    AnomalyKind::Psychic,
];

impl AnomalyKind {
    pub const ALL: [AnomalyKind; 5] = ALL_KINDS;

    pub const fn profile(self) -> AnomalyProfile {
        match self {
            AnomalyKind::Thermal => AnomalyProfile {
                name: "Thermal Anomaly",
                description: "A shimmering field of intense heat",
                damage: (15, 30),
                artifact_chance: 0.4,
                warning: "The air ripples with heat. Your skin prickles.",
            },
            AnomalyKind::Electric => AnomalyProfile {
                name: "Electric Anomaly",
                description: "Arcs of lightning dance between invisible points",
                damage: (20, 35),
                artifact_chance: 0.35,
                warning: "Your hair stands on end. The detector crackles.",
            },
            AnomalyKind::Gravitational => AnomalyProfile {
                name: "Gravitational Anomaly",
                description: "Debris floats and twists in distorted space",
                damage: (25, 40),
                artifact_chance: 0.3,
                warning: "Leaves spiral upward. The ground feels wrong.",
            },
            AnomalyKind::Chemical => AnomalyProfile {
                name: "Chemical Anomaly",
                description: "A haze of toxic, corrosive vapour",
                damage: (10, 25),
                artifact_chance: 0.45,
                warning: "A sharp chemical smell burns your nose.",
            },
            AnomalyKind::Psychic => AnomalyProfile {
                name: "Psychic Anomaly",
                description: "Whispers echo from nowhere",
                damage: (15, 30),
                artifact_chance: 0.25,
                warning: "A headache blooms behind your eyes. Something whispers.",
            },
        }
    }

    pub fn name(self) -> &'static str {
        self.profile().name
    }

    /// Damage kind armor is checked against when entering the field.
    pub const fn damage_kind(self) -> DamageKind {
        match self {
            AnomalyKind::Thermal => DamageKind::Thermal,
            AnomalyKind::Electric => DamageKind::Electric,
            AnomalyKind::Gravitational => DamageKind::Gravitational,
            AnomalyKind::Chemical => DamageKind::Chemical,
            AnomalyKind::Psychic => DamageKind::Psychic,
        }
    }

    /// Weighted pool of anomaly kinds for a zone type. Duplicates raise a kind's odds.
    pub fn for_zone_type(zone_type: &str) -> &'static [AnomalyKind] {
        use AnomalyKind::*;
        match zone_type.to_lowercase().as_str() {
            "forest" => &[Gravitational, Gravitational, Thermal, Electric],
            "urban" => &[Electric, Electric, Gravitational, Psychic],
            "marshland" => &[Chemical, Chemical, Psychic, Thermal],
            "industrial" => &[Electric, Thermal, Thermal, Chemical],
            "center" => &[Psychic, Psychic, Gravitational, Electric, Thermal],
            _ => &ALL_KINDS,
        }
    }
}

impl std::fmt::Display for AnomalyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
