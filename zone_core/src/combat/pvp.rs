//! Stalker versus stalker duels.

use serde::{Deserialize, Serialize};

use zone_rules::{Catalog, DamageKind, Player, RandomSource, SpecialProc, StatusEffectInstance, StatusEffectKind};

use super::{mitigate, WeaponProfile};
use crate::events::{Actor, CombatEvent, DuelDecision, EventKind, Narrator};

pub const PVP_MAX_ROUNDS: u32 = 10;

/// One side of a duel. Health is updated in place as the duel runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Duelist {
    pub name: String,
    pub health: u32,
    /// Physical protection of the worn armor, in percent.
    pub armor_protection: u32,
}

impl Duelist {
    pub fn new(name: impl Into<String>, health: u32) -> Self {
        Self {
            name: name.into(),
            health,
            armor_protection: 0,
        }
    }

    pub fn with_armor(mut self, protection: u32) -> Self {
        self.armor_protection = protection;
        self
    }

    /// Capture a stalker's duel state.
    pub fn from_player(player: &Player, catalog: &Catalog) -> Self {
        Self {
            name: player.name.clone(),
            health: player.health,
            armor_protection: player.armor_protection(catalog, DamageKind::Physical),
        }
    }
}

/// Outcome of a duel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PvpResult {
    /// True when the challenger won.
    pub victory: bool,
    pub rounds: u32,
    pub decision: DuelDecision,
    pub challenger_damage_taken: u32,
    pub target_damage_taken: u32,
    pub events: Vec<CombatEvent>,
    pub transcript: Vec<String>,
}

struct Side<'a> {
    actor: Actor,
    duelist: &'a mut Duelist,
    weapon: WeaponProfile,
    bleeding: Vec<StatusEffectInstance>,
    damage_taken: u32,
}

impl Side<'_> {
    fn lose_health(&mut self, amount: u32) {
        let next = self.duelist.health.saturating_sub(amount).max(1);
        self.damage_taken += self.duelist.health - next;
        self.duelist.health = next;
    }

    fn tick_bleeding(&mut self, round: u32, events: &mut Vec<CombatEvent>) {
        let mut remaining = Vec::with_capacity(self.bleeding.len());
        for mut effect in std::mem::take(&mut self.bleeding) {
            let amount = effect.definition().damage_per_round;
            self.lose_health(amount);
            events.push(CombatEvent::new(
                round,
                self.actor,
                EventKind::StatusDamage {
                    effect: effect.kind,
                    amount,
                },
            ));
            if effect.tick() {
                events.push(CombatEvent::new(
                    round,
                    self.actor,
                    EventKind::StatusExpired { effect: effect.kind },
                ));
            } else {
                remaining.push(effect);
            }
        }
        self.bleeding = remaining;
    }
}

/// One attack. Returns true when the defender is forced to yield.
fn strike(
    attacker: &Side<'_>,
    defender: &mut Side<'_>,
    round: u32,
    events: &mut Vec<CombatEvent>,
    rng: &mut dyn RandomSource,
) -> bool {
    let weapon = &attacker.weapon;
    let hit_chance = (f64::from(weapon.accuracy) / 100.0).clamp(0.3, 0.9);
    if !rng.chance(hit_chance) {
        events.push(CombatEvent::new(round, attacker.actor, EventKind::Miss { obscured: false }));
        return false;
    }

    let critical = rng.chance(weapon.class.critical_chance());
    let multiplier = if critical { weapon.class.critical_multiplier() } else { 1.0 };
    let factor = rng.between(0.8, 1.2);
    let damage = (f64::from(weapon.damage) * factor * multiplier).floor() as u32;

    // Stuns are not modelled between stalkers; the draw is still taken.
    let (damage, proc) = weapon.class.roll_special(damage, rng);
    match proc {
        Some(SpecialProc::Bleed) => {
            defender
                .bleeding
                .push(StatusEffectInstance::new(StatusEffectKind::Bleeding));
            events.push(CombatEvent::new(
                round,
                attacker.actor,
                EventKind::Special {
                    proc: SpecialProc::Bleed,
                },
            ));
        }
        Some(proc @ (SpecialProc::FollowUp { .. } | SpecialProc::Burst { .. })) => {
            events.push(CombatEvent::new(round, attacker.actor, EventKind::Special { proc }));
        }
        Some(SpecialProc::Stagger) | None => {}
    }

    let damage = mitigate(damage, defender.duelist.armor_protection);
    events.push(CombatEvent::new(
        round,
        attacker.actor,
        EventKind::Hit {
            damage,
            critical,
            armored: defender.duelist.armor_protection > 0,
        },
    ));

    if damage >= defender.duelist.health {
        defender.lose_health(damage);
        return true;
    }
    defender.lose_health(damage);
    false
}

/// Run a duel between two stalkers.
///
/// The side with the lighter weapon acts first every round; equal weights are
/// settled by one coin flip before the first round. Both duelists' health is
/// updated in place and never drops below 1.
pub fn simulate_pvp_combat(
    challenger: &mut Duelist,
    target: &mut Duelist,
    challenger_weapon: Option<&WeaponProfile>,
    target_weapon: Option<&WeaponProfile>,
    rng: &mut dyn RandomSource,
) -> PvpResult {
    let narrator = Narrator::pvp(&challenger.name, &target.name);
    let mut sides = [
        Side {
            actor: Actor::Challenger,
            duelist: challenger,
            weapon: challenger_weapon.cloned().unwrap_or_else(WeaponProfile::unarmed),
            bleeding: Vec::new(),
            damage_taken: 0,
        },
        Side {
            actor: Actor::Target,
            duelist: target,
            weapon: target_weapon.cloned().unwrap_or_else(WeaponProfile::unarmed),
            bleeding: Vec::new(),
            damage_taken: 0,
        },
    ];
    let mut events = Vec::new();

    for side in &sides {
        events.push(CombatEvent::new(
            0,
            side.actor,
            EventKind::Armed {
                weapon: side.weapon.name.clone(),
            },
        ));
    }

    let (challenger_weight, target_weight) = (sides[0].weapon.weight, sides[1].weapon.weight);
    let challenger_first = if challenger_weight == target_weight {
        rng.chance(0.5)
    } else {
        challenger_weight < target_weight
    };
    let first = if challenger_first { 0 } else { 1 };
    events.push(CombatEvent::new(0, sides[first].actor, EventKind::Initiative));

    let mut winner = None;
    let mut rounds = 0;
    for round in 1..=PVP_MAX_ROUNDS {
        rounds = round;
        events.push(CombatEvent::new(round, Actor::Zone, EventKind::RoundStarted));
        for side in sides.iter_mut() {
            side.tick_bleeding(round, &mut events);
        }

        for attacker in [first, 1 - first] {
            let [a, b] = &mut sides;
            let (attacker_side, defender_side) = if attacker == 0 { (&*a, b) } else { (&*b, a) };
            if strike(attacker_side, defender_side, round, &mut events, rng) {
                winner = Some(attacker);
                break;
            }
        }
        if winner.is_some() {
            break;
        }
    }

    let (winner, decision) = match winner {
        Some(side) => (side, DuelDecision::Surrender),
        None => {
            let (c, t) = (sides[0].duelist.health, sides[1].duelist.health);
            if c != t {
                (if c > t { 0 } else { 1 }, DuelDecision::Health)
            } else if rng.chance(0.5) {
                (0, DuelDecision::CoinFlip)
            } else {
                (1, DuelDecision::CoinFlip)
            }
        }
    };
    events.push(CombatEvent::new(rounds, sides[winner].actor, EventKind::DuelWon { decision }));

    let [challenger_side, target_side] = sides;
    tracing::debug!(
        challenger = %challenger_side.duelist.name,
        target = %target_side.duelist.name,
        challenger_won = winner == 0,
        rounds,
        ?decision,
        "duel resolved"
    );

    let transcript = narrator.render_all(&events);
    PvpResult {
        victory: winner == 0,
        rounds,
        decision,
        challenger_damage_taken: challenger_side.damage_taken,
        target_damage_taken: target_side.damage_taken,
        events,
        transcript,
    }
}
