//! Tunable game configuration, loaded from TOML.
//!
//! Every field has a default, so an empty document (or no file at all) gives
//! the stock game. Cooldowns are configured per action, in minutes, with
//! optional per-outcome overrides:
//!
//! ```toml
//! starting_rubles = 1000
//!
//! [cooldowns.hunt]
//! base = 10
//! success = 7.5
//! fled = 2
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::entities::ActionKind;
use crate::error::ConfigError;

/// How an action ended, for picking its cooldown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionOutcome {
    /// Ran to completion with no notable result.
    Completed,
    Success,
    Failure,
    /// Nothing was found.
    Nothing,
    Fled,
}

/// Cooldown for one action, in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CooldownRule {
    pub base: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nothing: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fled: Option<f64>,
}

impl CooldownRule {
    /// A rule with the same cooldown for every outcome.
    pub const fn flat(base: f64) -> Self {
        Self {
            base,
            success: None,
            failure: None,
            nothing: None,
            fled: None,
        }
    }

    /// Minutes to wait after `outcome`.
    pub fn minutes(&self, outcome: ActionOutcome) -> f64 {
        let specific = match outcome {
            ActionOutcome::Completed => None,
            ActionOutcome::Success => self.success,
            ActionOutcome::Failure => self.failure,
            ActionOutcome::Nothing => self.nothing,
            ActionOutcome::Fled => self.fled,
        };
        specific.unwrap_or(self.base)
    }

    /// Milliseconds to wait after `outcome`.
    pub fn millis(&self, outcome: ActionOutcome) -> i64 {
        (self.minutes(outcome) * 60_000.0).round() as i64
    }
}

/// Per-action cooldown rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CooldownTable {
    pub hunt: CooldownRule,
    pub explore: CooldownRule,
    pub travel: CooldownRule,
    pub scout: CooldownRule,
    pub camp: CooldownRule,
    pub detect: CooldownRule,
    pub anomaly_scan: CooldownRule,
    pub anomaly_enter: CooldownRule,
}

impl Default for CooldownTable {
    fn default() -> Self {
        Self {
            hunt: CooldownRule {
                base: 10.0,
                success: Some(7.5),
                failure: Some(10.0),
                nothing: Some(5.0),
                fled: Some(2.0),
            },
            explore: CooldownRule {
                base: 10.0,
                success: Some(8.0),
                failure: Some(10.0),
                nothing: Some(5.0),
                fled: Some(3.0),
            },
            travel: CooldownRule::flat(5.0),
            scout: CooldownRule::flat(15.0),
            camp: CooldownRule::flat(30.0),
            detect: CooldownRule {
                nothing: Some(3.0),
                ..CooldownRule::flat(10.0)
            },
            anomaly_scan: CooldownRule {
                nothing: Some(2.0),
                ..CooldownRule::flat(5.0)
            },
            anomaly_enter: CooldownRule::flat(15.0),
        }
    }
}

impl CooldownTable {
    pub fn rule(&self, action: ActionKind) -> &CooldownRule {
        match action {
            ActionKind::Hunt => &self.hunt,
            ActionKind::Explore => &self.explore,
            ActionKind::Travel => &self.travel,
            ActionKind::Scout => &self.scout,
            ActionKind::Camp => &self.camp,
            ActionKind::Detect => &self.detect,
            ActionKind::AnomalyScan => &self.anomaly_scan,
            ActionKind::AnomalyEnter => &self.anomaly_enter,
        }
    }
}

/// Game-wide tunables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub max_health: u32,
    pub max_inventory_weight: f64,
    pub starting_health: u32,
    pub starting_rubles: u32,
    /// Zone id new stalkers spawn in.
    pub start_zone: String,
    /// Emission damage before radiation resistance.
    pub emission_damage: u32,
    pub duel_expiry_secs: u64,
    /// How long an encounter waits for a fight/flee reply.
    pub response_window_secs: u64,
    pub weather_interval_hours: u64,
    pub cooldowns: CooldownTable,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            max_health: 100,
            max_inventory_weight: 50.0,
            starting_health: 100,
            starting_rubles: 500,
            start_zone: "rookie_village".to_string(),
            emission_damage: 40,
            duel_expiry_secs: 60,
            response_window_secs: 20,
            weather_interval_hours: 3,
            cooldowns: CooldownTable::default(),
        }
    }
}

impl GameConfig {
    /// Parse a TOML document and validate it.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Check cross-field constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_health == 0 {
            return Err(ConfigError::Invalid {
                field: "max_health",
                reason: "must be positive".to_string(),
            });
        }
        if self.starting_health == 0 || self.starting_health > self.max_health {
            return Err(ConfigError::Invalid {
                field: "starting_health",
                reason: format!("must be between 1 and max_health ({})", self.max_health),
            });
        }
        if self.max_inventory_weight.is_nan() || self.max_inventory_weight <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "max_inventory_weight",
                reason: "must be positive".to_string(),
            });
        }
        for action in ActionKind::ALL {
            let rule = self.cooldowns.rule(action);
            let outcomes = [rule.base]
                .into_iter()
                .chain([rule.success, rule.failure, rule.nothing, rule.fled].into_iter().flatten());
            for minutes in outcomes {
                if minutes.is_nan() || minutes < 0.0 {
                    return Err(ConfigError::Invalid {
                        field: "cooldowns",
                        reason: format!("{action:?} cooldown must not be negative"),
                    });
                }
            }
        }
        Ok(())
    }
}
