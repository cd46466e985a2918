//! Emissions: Zone-wide psi-storms that hit anyone caught in the open.

use serde::{Deserialize, Serialize};

use zone_rules::{Catalog, DamageKind, Player, RandomSource, MAX_RADIATION};

use crate::events::{Actor, CombatEvent, EventKind, Narrator};

/// Chance a sheltered stalker still picks up a little radiation.
pub const SHELTER_LEAK_CHANCE: f64 = 0.1;
pub const SHELTER_LEAK_RANGE: (u32, u32) = (1, 5);
pub const EXPOSED_RADIATION_RANGE: (u32, u32) = (20, 50);

/// What an emission did to one stalker. Emissions are never fatal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmissionResult {
    pub survived: bool,
    pub damage_taken: u32,
    pub radiation_gained: u32,
    pub final_health: u32,
    pub final_radiation: u32,
    pub events: Vec<CombatEvent>,
    pub transcript: Vec<String>,
}

impl EmissionResult {
    pub fn apply_to(&self, player: &mut Player) {
        player.health = self.final_health;
        player.radiation = self.final_radiation;
    }
}

/// Ride out an emission.
///
/// In shelter there is no damage and only a small chance of stray
/// radiation. In the open, `base_damage` is cut by the stalker's radiation
/// resistance, health floors at 1 and radiation is capped at
/// [`MAX_RADIATION`].
pub fn simulate_emission(
    player: &Player,
    catalog: &Catalog,
    has_shelter: bool,
    base_damage: u32,
    rng: &mut dyn RandomSource,
) -> EmissionResult {
    let mut events = Vec::new();
    let mut damage_taken = 0;
    let mut radiation = 0;

    if has_shelter {
        events.push(CombatEvent::new(0, Actor::Zone, EventKind::EmissionSheltered));
        if rng.chance(SHELTER_LEAK_CHANCE) {
            radiation = rng.roll_inclusive(SHELTER_LEAK_RANGE.0, SHELTER_LEAK_RANGE.1);
        }
    } else {
        let resistance = player.resistance(catalog, DamageKind::Radiation);
        let damage = (f64::from(base_damage) * (1.0 - f64::from(resistance) / 100.0)).floor() as u32;
        damage_taken = damage.min(player.health.saturating_sub(1));
        events.push(CombatEvent::new(0, Actor::Zone, EventKind::EmissionExposed { damage }));
        radiation = rng.roll_inclusive(EXPOSED_RADIATION_RANGE.0, EXPOSED_RADIATION_RANGE.1);
    }

    let final_radiation = (player.radiation + radiation).min(MAX_RADIATION);
    let radiation_gained = radiation;
    if radiation > 0 {
        events.push(CombatEvent::new(0, Actor::Zone, EventKind::RadiationExposure { amount: radiation }));
    }

    tracing::info!(
        player = %player.id,
        sheltered = has_shelter,
        damage_taken,
        radiation_gained,
        "emission passed"
    );

    let transcript = Narrator::pve("").render_all(&events);
    EmissionResult {
        survived: true,
        damage_taken,
        radiation_gained,
        final_health: player.health - damage_taken,
        final_radiation,
        events,
        transcript,
    }
}
