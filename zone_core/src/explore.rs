//! The explore command: wander the current zone and see what turns up.
//!
//! Unlike a hunt, an expedition may find nothing at all: the chance of an
//! encounter grows with the zone's danger level, and any mutant roaming
//! there is equally likely to show. Encounters are settled through the same
//! fight-or-flee path as hunts, under the explore cooldowns.

use std::time::Duration;

use zone_rules::{ActionKind, ActionOutcome, Catalog, GameConfig, Player, RandomSource, Zone};

use crate::cooldown::{check_ready, start_cooldown};
use crate::encounter::select_mutant_uniform;
use crate::error::Rejection;
use crate::hunt::{equipped_weapon, settle_encounter, Encounter, EncounterChoice, HuntOutcome, HuntStart};

/// Encounter chance in a zone of danger level 10.
pub const EXPLORE_ENCOUNTER_SCALE: f64 = 0.7;
/// How long an explorer has to answer an encounter.
pub const EXPLORE_RESPONSE_WINDOW: Duration = Duration::from_secs(30);

/// Chance that exploring `zone` runs into a mutant.
pub fn explore_encounter_chance(zone: &Zone) -> f64 {
    (EXPLORE_ENCOUNTER_SCALE * f64::from(zone.danger_level) / 10.0).clamp(0.0, 1.0)
}

/// Set out into the stalker's current zone.
///
/// Rejections leave the player untouched. A quiet expedition sets the
/// `nothing` explore cooldown; an encounter sets none until
/// [`resolve_explore`] settles it.
pub fn begin_explore(
    player: &mut Player,
    catalog: &Catalog,
    config: &GameConfig,
    now: i64,
    rng: &mut dyn RandomSource,
) -> Result<HuntStart, Rejection> {
    check_ready(player, ActionKind::Explore, now)?;
    equipped_weapon(player, catalog)?;
    let zone = catalog
        .zone(player.current_zone.as_str())
        .ok_or_else(|| Rejection::UnknownZone {
            id: player.current_zone.clone(),
        })?;

    let found = if rng.chance(explore_encounter_chance(zone)) {
        select_mutant_uniform(catalog, zone, rng)
    } else {
        None
    };

    match found {
        None => {
            tracing::info!(player = %player.id, zone = %zone.id, "expedition was quiet");
            start_cooldown(player, ActionKind::Explore, ActionOutcome::Nothing, now, config);
            Ok(HuntStart::Quiet)
        }
        Some(mutant) => {
            tracing::info!(player = %player.id, zone = %zone.id, mutant = %mutant.name, "expedition encounter");
            Ok(HuntStart::Encounter(Encounter {
                mutant: mutant.clone(),
                zone: zone.id.clone(),
                stalking: false,
            }))
        }
    }
}

/// Settle an expedition's encounter with the stalker's choice.
pub fn resolve_explore(
    player: &mut Player,
    encounter: &Encounter,
    choice: EncounterChoice,
    catalog: &Catalog,
    config: &GameConfig,
    now: i64,
    rng: &mut dyn RandomSource,
) -> Result<HuntOutcome, Rejection> {
    settle_encounter(player, encounter, choice, ActionKind::Explore, catalog, config, now, rng)
}
