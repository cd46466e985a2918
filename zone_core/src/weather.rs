//! The Zone's weather, shared by every stalker.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use zone_rules::{GameConfig, RandomSource, WeatherEffect, WeatherKind, WeatherState};

use crate::encounter::select_weather;

/// Process-wide weather, recomputed lazily on read.
///
/// Reads before the next change is due return the stored weather without
/// drawing from the random source.
#[derive(Debug)]
pub struct WeatherService {
    interval_millis: i64,
    state: Mutex<WeatherState>,
}

impl WeatherService {
    /// Start with clear skies at `now`.
    pub fn new(interval: Duration, now: i64) -> Self {
        let interval_millis = i64::try_from(interval.as_millis()).unwrap_or(i64::MAX);
        Self {
            interval_millis,
            state: Mutex::new(WeatherState::new(WeatherKind::Clear, now, interval_millis)),
        }
    }

    pub fn from_config(config: &GameConfig, now: i64) -> Self {
        Self::new(Duration::from_secs(config.weather_interval_hours * 3600), now)
    }

    /// Weather in force at `now`, rolling new weather if a change is due.
    pub fn current(&self, now: i64, rng: &mut dyn RandomSource) -> WeatherKind {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.is_due(now) {
            let previous = state.current;
            *state = WeatherState::new(select_weather(rng), now, self.interval_millis);
            tracing::info!(from = %previous, to = %state.current, "weather changed");
        }
        state.current
    }

    /// Current multiplier for `effect`.
    pub fn modifier(&self, effect: WeatherEffect, now: i64, rng: &mut dyn RandomSource) -> f64 {
        self.current(now, rng).modifier(effect)
    }

    pub fn state(&self) -> WeatherState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
