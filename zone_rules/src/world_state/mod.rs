//! World state: wall-clock time and the weather tables.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicI64, Ordering};

/// Source of the current time in epoch milliseconds.
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> i64;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock(AtomicI64);

impl ManualClock {
    pub fn new(start_millis: i64) -> Self {
        Self(AtomicI64::new(start_millis))
    }

    pub fn set(&self, millis: i64) {
        self.0.store(millis, Ordering::SeqCst);
    }

    /// Move the clock forward and return the new time.
    pub fn advance(&self, millis: i64) -> i64 {
        self.0.fetch_add(millis, Ordering::SeqCst) + millis
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        self.0.load(Ordering::SeqCst)
    }
}

/// Weather conditions in the Zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WeatherKind {
    #[default]
    Clear,
    Cloudy,
    Foggy,
    Rainy,
    Stormy,
    /// Psi-storm sweeping across the Zone.
    Emission,
}

/// Aspects of the game weather modifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherEffect {
    Travel,
    Combat,
    Detection,
    AnomalyDamage,
    Radiation,
}

/// Static description of a weather kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeatherProfile {
    pub name: &'static str,
    pub description: &'static str,
    /// Relative odds of rolling this weather.
    pub chance: f64,
    pub travel: f64,
    pub combat: f64,
    pub detection: f64,
    pub anomaly_damage: f64,
    pub radiation: f64,
    /// Broadcast when this weather starts.
    pub warning: Option<&'static str>,
}

impl WeatherKind {
    pub const ALL: [WeatherKind; 6] = [
        WeatherKind::Clear,
        WeatherKind::Cloudy,
        WeatherKind::Foggy,
        WeatherKind::Rainy,
        WeatherKind::Stormy,
        WeatherKind::Emission,
    ];

    pub const fn profile(self) -> WeatherProfile {
        match self {
            WeatherKind::Clear => WeatherProfile {
                name: "Clear",
                description: "Clear skies over the Zone",
                chance: 0.25,
                travel: 0.8,
                combat: 1.0,
                detection: 1.1,
                anomaly_damage: 0.9,
                radiation: 1.0,
                warning: None,
            },
            WeatherKind::Cloudy => WeatherProfile {
                name: "Cloudy",
                description: "Grey clouds hang low",
                chance: 0.3,
                travel: 1.0,
                combat: 1.0,
                detection: 1.0,
                anomaly_damage: 1.0,
                radiation: 1.0,
                warning: None,
            },
            WeatherKind::Foggy => WeatherProfile {
                name: "Foggy",
                description: "Thick fog limits visibility",
                chance: 0.15,
                travel: 1.2,
                combat: 0.9,
                detection: 0.7,
                anomaly_damage: 1.2,
                radiation: 1.0,
                warning: None,
            },
            WeatherKind::Rainy => WeatherProfile {
                name: "Rainy",
                description: "Radioactive rain falls steadily",
                chance: 0.15,
                travel: 1.3,
                combat: 1.0,
                detection: 0.9,
                anomaly_damage: 0.8,
                radiation: 1.5,
                warning: None,
            },
            WeatherKind::Stormy => WeatherProfile {
                name: "Stormy",
                description: "Lightning splits the sky",
                chance: 0.1,
                travel: 1.5,
                combat: 1.2,
                detection: 1.3,
                anomaly_damage: 1.4,
                radiation: 1.2,
                warning: None,
            },
            WeatherKind::Emission => WeatherProfile {
                name: "Emission",
                description: "The sky turns blood red",
                chance: 0.05,
                travel: 0.7,
                combat: 1.5,
                detection: 1.5,
                anomaly_damage: 2.0,
                radiation: 3.0,
                warning: Some("EMISSION INCOMING! Find shelter immediately!"),
            },
        }
    }

    pub fn name(self) -> &'static str {
        self.profile().name
    }

    /// Multiplier this weather applies to `effect`.
    pub fn modifier(self, effect: WeatherEffect) -> f64 {
        let profile = self.profile();
        match effect {
            WeatherEffect::Travel => profile.travel,
            WeatherEffect::Combat => profile.combat,
            WeatherEffect::Detection => profile.detection,
            WeatherEffect::AnomalyDamage => profile.anomaly_damage,
            WeatherEffect::Radiation => profile.radiation,
        }
    }
}

impl std::fmt::Display for WeatherKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// The weather in force and when it next changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherState {
    pub current: WeatherKind,
    pub last_change: i64,
    pub next_change: i64,
}

impl WeatherState {
    pub fn new(current: WeatherKind, now: i64, interval_millis: i64) -> Self {
        Self {
            current,
            last_change: now,
            next_change: now + interval_millis,
        }
    }

    pub fn is_due(&self, now: i64) -> bool {
        now >= self.next_change
    }
}
