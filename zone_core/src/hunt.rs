//! The hunt command: find a mutant, then fight or flee.
//!
//! A hunt runs in two steps. [`begin_hunt`] checks preconditions and rolls
//! the encounter without touching anything but the cooldown of a quiet hunt.
//! The caller then asks the stalker what to do (see
//! [`crate::response::await_encounter_choice`]) and hands the answer to
//! [`resolve_encounter`], which runs combat and applies it once.

use serde::{Deserialize, Serialize};

use zone_rules::{ActionKind, ActionOutcome, Catalog, GameConfig, MutantDef, Player, RandomSource, ZoneId};

use crate::combat::{simulate_combat, AppliedCombat, MutantProfile, PlayerSnapshot, WeaponProfile};
use crate::cooldown::{check_ready, start_cooldown};
use crate::encounter::select_mutant;
use crate::error::Rejection;

/// Stalking makes a mutant this much easier to slip away from.
pub const STALK_ESCAPE_BONUS: f64 = 0.2;
pub const MAX_ESCAPE_CHANCE: f64 = 0.9;

/// The stalker's answer to an encounter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncounterChoice {
    Fight,
    Flee,
    /// No answer in time. The mutant gets the jump on the stalker.
    Timeout,
}

/// A mutant waiting for the stalker's move.
#[derive(Debug, Clone, PartialEq)]
pub struct Encounter {
    pub mutant: MutantDef,
    pub zone: ZoneId,
    pub stalking: bool,
}

impl Encounter {
    /// Chance a flee attempt succeeds.
    pub fn escape_chance(&self) -> f64 {
        let bonus = if self.stalking { STALK_ESCAPE_BONUS } else { 0.0 };
        (self.mutant.effective_escape_chance() + bonus).min(MAX_ESCAPE_CHANCE)
    }

    /// The prompt shown while waiting for a choice.
    pub fn prompt(&self) -> String {
        format!(
            "You spot a {} nearby. Do you fight or flee?",
            self.mutant.name
        )
    }
}

/// How a hunt started.
#[derive(Debug, Clone, PartialEq)]
pub enum HuntStart {
    /// Nothing roams here.
    Quiet,
    Encounter(Encounter),
}

/// How an encounter ended.
#[derive(Debug, Clone, PartialEq)]
pub enum HuntOutcome {
    Escaped,
    Fought {
        applied: AppliedCombat,
        /// The fight started on the back foot, after a failed flee or no answer.
        surprised: bool,
    },
}

pub(crate) fn equipped_weapon(player: &Player, catalog: &Catalog) -> Result<WeaponProfile, Rejection> {
    let id = player.equipped.weapon.as_ref().ok_or(Rejection::NoWeapon)?;
    WeaponProfile::lookup(catalog, id)
}

/// Start a hunt in the stalker's current zone.
///
/// Rejections leave the player untouched. A quiet hunt sets the `nothing`
/// cooldown; an encounter sets none until it is resolved.
pub fn begin_hunt(
    player: &mut Player,
    catalog: &Catalog,
    config: &GameConfig,
    now: i64,
    stalking: bool,
    rng: &mut dyn RandomSource,
) -> Result<HuntStart, Rejection> {
    check_ready(player, ActionKind::Hunt, now)?;
    equipped_weapon(player, catalog)?;
    let zone = catalog
        .zone(player.current_zone.as_str())
        .ok_or_else(|| Rejection::UnknownZone {
            id: player.current_zone.clone(),
        })?;

    match select_mutant(catalog, zone, stalking, rng) {
        None => {
            tracing::info!(player = %player.id, zone = %zone.id, "hunt found nothing");
            start_cooldown(player, ActionKind::Hunt, ActionOutcome::Nothing, now, config);
            Ok(HuntStart::Quiet)
        }
        Some(mutant) => {
            tracing::info!(player = %player.id, zone = %zone.id, mutant = %mutant.name, stalking, "encounter");
            Ok(HuntStart::Encounter(Encounter {
                mutant: mutant.clone(),
                zone: zone.id.clone(),
                stalking,
            }))
        }
    }
}

/// Settle an encounter with the stalker's choice.
pub fn resolve_encounter(
    player: &mut Player,
    encounter: &Encounter,
    choice: EncounterChoice,
    catalog: &Catalog,
    config: &GameConfig,
    now: i64,
    rng: &mut dyn RandomSource,
) -> Result<HuntOutcome, Rejection> {
    settle_encounter(player, encounter, choice, ActionKind::Hunt, catalog, config, now, rng)
}

/// Flee or fight `encounter`, then start the cooldown of `action` for the outcome.
#[allow(clippy::too_many_arguments)]
pub(crate) fn settle_encounter(
    player: &mut Player,
    encounter: &Encounter,
    choice: EncounterChoice,
    action: ActionKind,
    catalog: &Catalog,
    config: &GameConfig,
    now: i64,
    rng: &mut dyn RandomSource,
) -> Result<HuntOutcome, Rejection> {
    let weapon = equipped_weapon(player, catalog)?;

    let surprised = match choice {
        EncounterChoice::Fight => false,
        EncounterChoice::Timeout => true,
        EncounterChoice::Flee => {
            if rng.chance(encounter.escape_chance()) {
                tracing::info!(player = %player.id, mutant = %encounter.mutant.name, ?action, "fled");
                start_cooldown(player, action, ActionOutcome::Fled, now, config);
                return Ok(HuntOutcome::Escaped);
            }
            true
        }
    };
    let weapon = if surprised { weapon.surprised() } else { weapon };

    let snapshot = PlayerSnapshot::capture(player, catalog, config);
    let mutant = MutantProfile::from_def(&encounter.mutant, catalog);
    let result = simulate_combat(&snapshot, &mutant, Some(&weapon), rng);
    let outcome = if result.victory {
        ActionOutcome::Success
    } else {
        ActionOutcome::Failure
    };

    let applied = result.apply_to(player, catalog);
    start_cooldown(player, action, outcome, now, config);
    tracing::info!(
        player = %player.id,
        mutant = %encounter.mutant.name,
        ?action,
        victory = applied.result.victory,
        rounds = applied.result.rounds,
        surprised,
        "encounter resolved"
    );
    Ok(HuntOutcome::Fought { applied, surprised })
}
