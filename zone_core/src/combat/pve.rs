//! Player versus mutant combat.

use serde::{Deserialize, Serialize};

use zone_rules::{
    apply_ability, deactivate_ability, AbilityEffect, AbilityState, Catalog, DamageKind, GameConfig, MutantAbility,
    MutantDef, Player, RandomSource, RubleRange, SpecialProc, StatusEffectInstance, StatusEffectKind,
    ABILITY_DEACTIVATION_CHANCE, MAX_RADIATION, PSYCHIC_ACCURACY_PENALTY, REGENERATION_CHANCE,
    REGENERATION_HEALTH_THRESHOLD, STEALTH_EVASION,
};

use super::{mitigate, roll_rewards, LootDrop, LootRoll, WeaponProfile};
use crate::events::{Actor, CombatEvent, EventKind, Narrator, RetreatReason};

pub const PVE_MAX_ROUNDS: u32 = 12;
/// Below this share of max health the stalker may decide to run.
pub const RETREAT_HEALTH_PERCENT: u32 = 25;
pub const RETREAT_CHANCE: f64 = 0.6;
/// Damage multiplier against a stunned mutant.
pub const STUNNED_DAMAGE_MULTIPLIER: f64 = 1.25;
/// Chance a stunned mutant loses its attack.
pub const STUNNED_SKIP_CHANCE: f64 = 0.5;
pub const BLOODSUCKER_BLEED_CHANCE: f64 = 0.3;
pub const CONTROLLER_STUN_CHANCE: f64 = 0.4;

/// The player's side of a fight, captured before the first round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub name: String,
    pub health: u32,
    pub max_health: u32,
    pub radiation: u32,
    /// Physical protection of the worn armor, in percent.
    pub armor_protection: u32,
    pub combat_bonus: i32,
    pub weapon_bonus: i32,
    pub status_effects: Vec<StatusEffectInstance>,
    pub inventory_weight: f64,
    pub max_inventory_weight: f64,
}

impl PlayerSnapshot {
    /// Capture a stalker's combat state.
    pub fn capture(player: &Player, catalog: &Catalog, config: &GameConfig) -> Self {
        Self {
            name: player.name.clone(),
            health: player.health,
            max_health: player.max_health,
            radiation: player.radiation,
            armor_protection: player.armor_protection(catalog, DamageKind::Physical),
            combat_bonus: player.bonuses.combat_bonus,
            weapon_bonus: player.bonuses.weapon_bonus,
            status_effects: player.status_effects.clone(),
            inventory_weight: player.inventory_weight,
            max_inventory_weight: config.max_inventory_weight,
        }
    }
}

/// The mutant's side of a fight.
#[derive(Debug, Clone, PartialEq)]
pub struct MutantProfile {
    pub name: String,
    /// Lowercased type name.
    pub kind: String,
    pub health: u32,
    pub damage: u32,
    pub accuracy: u32,
    pub reputation: u32,
    pub rubles: RubleRange,
    pub loot: Vec<LootRoll>,
}

impl MutantProfile {
    /// Build from a catalog definition, resolving its loot table.
    pub fn from_def(def: &MutantDef, catalog: &Catalog) -> Self {
        Self {
            name: def.name.clone(),
            kind: def.kind.to_lowercase(),
            health: def.health,
            damage: def.effective_damage(),
            accuracy: def.effective_accuracy(),
            reputation: def.reputation_reward(),
            rubles: def.ruble_range(),
            loot: LootRoll::table_for(def, catalog),
        }
    }
}

/// Outcome of a fight against a mutant.
///
/// Nothing here has touched the player yet; [`CombatResult::apply_to`]
/// consumes the result and writes it back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatResult {
    pub victory: bool,
    pub rounds: u32,
    pub damage_taken: u32,
    pub damage_dealt: u32,
    pub radiation_gained: u32,
    pub final_health: u32,
    pub reputation_gained: u32,
    pub loot: Vec<LootDrop>,
    pub ruble_reward: u32,
    pub survivor_status_effects: Vec<StatusEffectInstance>,
    pub events: Vec<CombatEvent>,
    pub transcript: Vec<String>,
}

/// A combat result that has been written to a player.
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedCombat {
    pub result: CombatResult,
    /// New rank, if the kill earned a promotion.
    pub promoted_to: Option<u32>,
}

impl CombatResult {
    /// Write this fight's outcome to `player`.
    pub fn apply_to(self, player: &mut Player, catalog: &Catalog) -> AppliedCombat {
        player.health = player.health.saturating_sub(self.damage_taken).max(1);
        player.radiation = (player.radiation + self.radiation_gained).min(MAX_RADIATION);
        player.merge_status_effects(self.survivor_status_effects.clone());

        let mut promoted_to = None;
        if self.victory {
            promoted_to = player.add_reputation(self.reputation_gained);
            player.rubles = player.rubles.saturating_add(self.ruble_reward);
            player
                .inventory
                .extend(self.loot.iter().map(|drop| drop.item_id.clone()));
            player.recompute_inventory_weight(catalog);
        }

        AppliedCombat {
            result: self,
            promoted_to,
        }
    }
}

enum FightEnd {
    Victory,
    Retreat,
}

struct PveFight<'a> {
    player: &'a PlayerSnapshot,
    mutant: &'a MutantProfile,
    weapon: WeaponProfile,
    abilities: Vec<MutantAbility>,
    state: AbilityState,
    round: u32,
    health: u32,
    radiation_gained: u32,
    damage_dealt: u32,
    player_effects: Vec<StatusEffectInstance>,
    mutant_effects: Vec<StatusEffectInstance>,
    events: Vec<CombatEvent>,
}

impl PveFight<'_> {
    fn log(&mut self, actor: Actor, kind: EventKind) {
        self.events.push(CombatEvent::new(self.round, actor, kind));
    }

    fn mutant_has(&self, kind: StatusEffectKind) -> bool {
        self.mutant_effects.iter().any(|e| e.kind == kind)
    }

    fn add_radiation(&mut self, amount: u32) {
        self.state.player_radiation = (self.state.player_radiation + amount).min(MAX_RADIATION);
        self.radiation_gained += amount;
    }

    fn tick_player_effects(&mut self) {
        let mut remaining = Vec::with_capacity(self.player_effects.len());
        for mut effect in std::mem::take(&mut self.player_effects) {
            let def = effect.definition();
            if def.damage_per_round > 0 {
                self.health = self.health.saturating_sub(def.damage_per_round).max(1);
                self.log(
                    Actor::Player,
                    EventKind::StatusDamage {
                        effect: effect.kind,
                        amount: def.damage_per_round,
                    },
                );
            }
            if def.radiation_per_round > 0 {
                self.add_radiation(def.radiation_per_round);
                self.log(
                    Actor::Player,
                    EventKind::StatusRadiation {
                        effect: effect.kind,
                        amount: def.radiation_per_round,
                    },
                );
            }
            if effect.tick() {
                self.log(Actor::Player, EventKind::StatusExpired { effect: effect.kind });
            } else {
                remaining.push(effect);
            }
        }
        self.player_effects = remaining;
    }

    fn tick_mutant_effects(&mut self) {
        let mut remaining = Vec::with_capacity(self.mutant_effects.len());
        for mut effect in std::mem::take(&mut self.mutant_effects) {
            if effect.tick() {
                self.log(Actor::Mutant, EventKind::StatusExpired { effect: effect.kind });
            } else {
                remaining.push(effect);
            }
        }
        self.mutant_effects = remaining;
    }

    fn deactivate_abilities(&mut self, rng: &mut dyn RandomSource) {
        for ability in self.state.active.clone() {
            if ability.can_deactivate() && rng.chance(ABILITY_DEACTIVATION_CHANCE) {
                let (state, effect) = deactivate_ability(ability, std::mem::take(&mut self.state));
                self.state = state;
                if let Some(effect) = effect {
                    self.log(Actor::Mutant, EventKind::Ability { effect });
                }
            }
        }
    }

    fn activate_abilities(&mut self, rng: &mut dyn RandomSource) {
        for ability in self.abilities.clone() {
            if self.state.is_active(ability) {
                continue;
            }
            if rng.chance(ability.activation_chance()) {
                let (state, effect) = apply_ability(ability, std::mem::take(&mut self.state), rng);
                self.state = state;
                if let AbilityEffect::RadiationBurst { amount } = effect {
                    self.radiation_gained += amount;
                }
                self.log(Actor::Mutant, EventKind::Ability { effect });
            }
        }
    }

    fn player_hit_chance(&self) -> f64 {
        let mut penalty: f64 = self
            .player_effects
            .iter()
            .map(|e| e.definition().accuracy_penalty)
            .sum();
        if self.state.is_active(MutantAbility::Psychic) {
            penalty += PSYCHIC_ACCURACY_PENALTY;
        }
        if self.state.is_active(MutantAbility::Stealth) {
            penalty += STEALTH_EVASION;
        }
        let chance = f64::from(self.weapon.accuracy) / 100.0 - penalty + f64::from(self.player.combat_bonus) / 100.0;
        chance.clamp(0.1, 0.9)
    }

    /// Returns true when the mutant goes down.
    fn player_attack(&mut self, rng: &mut dyn RandomSource) -> bool {
        if !rng.chance(self.player_hit_chance()) {
            let obscured = self.state.is_active(MutantAbility::Stealth);
            self.log(Actor::Player, EventKind::Miss { obscured });
            return false;
        }

        let class = self.weapon.class;
        let critical = rng.chance(class.critical_chance());
        let multiplier = if critical { class.critical_multiplier() } else { 1.0 };
        let rage = 1.0
            + self
                .player_effects
                .iter()
                .map(|e| e.definition().damage_bonus)
                .sum::<f64>();
        let base = (i64::from(self.weapon.damage) + i64::from(self.player.weapon_bonus)).max(0) as f64;
        let damage = (base * multiplier * rage * rng.between(0.8, 1.2)).floor() as u32;

        let (mut damage, proc) = class.roll_special(damage, rng);
        if let Some(proc) = proc {
            match proc {
                SpecialProc::Bleed => self
                    .mutant_effects
                    .push(StatusEffectInstance::new(StatusEffectKind::Bleeding)),
                SpecialProc::Stagger => self
                    .mutant_effects
                    .push(StatusEffectInstance::new(StatusEffectKind::Stunned)),
                SpecialProc::FollowUp { .. } | SpecialProc::Burst { .. } => {}
            }
            self.log(Actor::Player, EventKind::Special { proc });
        }
        if self.mutant_has(StatusEffectKind::Stunned) {
            damage = (f64::from(damage) * STUNNED_DAMAGE_MULTIPLIER).floor() as u32;
            self.log(Actor::Player, EventKind::StunBonus);
        }

        self.state.mutant_health = self.state.mutant_health.saturating_sub(damage);
        self.damage_dealt += damage;
        self.log(
            Actor::Player,
            EventKind::Hit {
                damage,
                critical,
                armored: false,
            },
        );

        if self.state.mutant_health == 0 {
            self.log(Actor::Mutant, EventKind::Slain);
            return true;
        }
        false
    }

    fn affliction(&self, rng: &mut dyn RandomSource) -> Option<StatusEffectKind> {
        let kind = &self.mutant.kind;
        if kind.contains("bloodsucker") && rng.chance(BLOODSUCKER_BLEED_CHANCE) {
            Some(StatusEffectKind::Bleeding)
        } else if kind.contains("controller") && rng.chance(CONTROLLER_STUN_CHANCE) {
            Some(StatusEffectKind::Stunned)
        } else {
            None
        }
    }

    /// Returns true when a blow forces the stalker out of the fight.
    fn mutant_attacks(&mut self, rng: &mut dyn RandomSource) -> bool {
        let attacks = if self.state.is_active(MutantAbility::Frenzy) { 2 } else { 1 };
        for attack in 0..attacks {
            if attack > 0 {
                self.log(Actor::Mutant, EventKind::ExtraAttack);
            }
            if self.mutant_has(StatusEffectKind::Stunned) && rng.chance(STUNNED_SKIP_CHANCE) {
                self.log(Actor::Mutant, EventKind::StunnedSkip);
                continue;
            }
            let hit_chance = (f64::from(self.mutant.accuracy) / 100.0).clamp(0.2, 0.9);
            if !rng.chance(hit_chance) {
                self.log(Actor::Mutant, EventKind::Miss { obscured: false });
                continue;
            }

            let raw = (f64::from(self.mutant.damage) * rng.between(0.8, 1.2)).floor() as u32;
            let damage = mitigate(raw, self.player.armor_protection);
            self.log(
                Actor::Mutant,
                EventKind::Hit {
                    damage,
                    critical: false,
                    armored: self.player.armor_protection > 0,
                },
            );
            if let Some(effect) = self.affliction(rng) {
                self.player_effects.push(StatusEffectInstance::new(effect));
                self.log(Actor::Mutant, EventKind::Afflicted { effect });
            }

            if damage >= self.health {
                self.health = 1;
                self.log(
                    Actor::Player,
                    EventKind::Retreat {
                        reason: RetreatReason::Wounded,
                    },
                );
                return true;
            }
            self.health -= damage;
        }
        false
    }

    fn wants_to_retreat(&self, rng: &mut dyn RandomSource) -> bool {
        self.round < PVE_MAX_ROUNDS
            && self.health * 100 < self.player.max_health * RETREAT_HEALTH_PERCENT
            && rng.chance(RETREAT_CHANCE)
    }

    fn run(&mut self, rng: &mut dyn RandomSource) -> Option<FightEnd> {
        for round in 1..=PVE_MAX_ROUNDS {
            self.round = round;
            self.log(Actor::Zone, EventKind::RoundStarted);

            self.tick_player_effects();
            self.tick_mutant_effects();
            self.deactivate_abilities(rng);
            self.activate_abilities(rng);

            if self.player_attack(rng) {
                return Some(FightEnd::Victory);
            }
            if self.mutant_attacks(rng) {
                return Some(FightEnd::Retreat);
            }
            if self.wants_to_retreat(rng) {
                self.log(
                    Actor::Player,
                    EventKind::Retreat {
                        reason: RetreatReason::LowHealth,
                    },
                );
                return Some(FightEnd::Retreat);
            }
        }
        None
    }
}

/// Fight a mutant to the end.
///
/// `weapon` is `None` for bare hands. The stalker never drops below 1 health:
/// a blow that would kill ends the fight as a retreat instead.
pub fn simulate_combat(
    player: &PlayerSnapshot,
    mutant: &MutantProfile,
    weapon: Option<&WeaponProfile>,
    rng: &mut dyn RandomSource,
) -> CombatResult {
    let weapon = weapon.cloned().unwrap_or_else(WeaponProfile::unarmed);

    let mut abilities: Vec<MutantAbility> = MutantAbility::for_mutant_type(&mutant.kind).into_iter().collect();
    if mutant.health > REGENERATION_HEALTH_THRESHOLD && rng.chance(REGENERATION_CHANCE) {
        abilities.push(MutantAbility::Regeneration);
    }

    let mut fight = PveFight {
        player,
        mutant,
        weapon,
        abilities,
        state: AbilityState::new(mutant.health, player.radiation),
        round: 0,
        health: player.health,
        radiation_gained: 0,
        damage_dealt: 0,
        player_effects: player.status_effects.clone(),
        mutant_effects: Vec::new(),
        events: Vec::new(),
    };

    fight.log(
        Actor::Player,
        EventKind::Encounter {
            mutant: mutant.name.clone(),
        },
    );
    fight.log(
        Actor::Player,
        EventKind::Armed {
            weapon: fight.weapon.name.clone(),
        },
    );
    if !fight.abilities.is_empty() {
        let abilities = fight.abilities.clone();
        fight.log(Actor::Mutant, EventKind::AbilitiesSensed { abilities });
    }

    let end = fight.run(rng);
    let victory = matches!(end, Some(FightEnd::Victory));
    if end.is_none() {
        fight.log(
            Actor::Player,
            EventKind::Retreat {
                reason: RetreatReason::Exhausted,
            },
        );
    }

    let damage_taken = player.health.saturating_sub(fight.health);
    if victory {
        fight.log(Actor::Player, EventKind::Victory);
    } else {
        fight.log(Actor::Player, EventKind::Escaped { damage_taken });
    }
    if fight.radiation_gained > 0 {
        let amount = fight.radiation_gained;
        fight.log(Actor::Player, EventKind::RadiationTotal { amount });
    }

    let rewards = if victory {
        roll_rewards(
            mutant.reputation,
            &mutant.loot,
            mutant.rubles,
            player.inventory_weight,
            player.max_inventory_weight,
            rng,
        )
    } else {
        Default::default()
    };

    tracing::debug!(
        mutant = %mutant.name,
        victory,
        rounds = fight.round,
        damage_taken,
        damage_dealt = fight.damage_dealt,
        "pve combat resolved"
    );

    let transcript = Narrator::pve(&mutant.name).render_all(&fight.events);
    CombatResult {
        victory,
        rounds: fight.round,
        damage_taken,
        damage_dealt: fight.damage_dealt,
        radiation_gained: fight.radiation_gained,
        final_health: fight.health,
        reputation_gained: rewards.reputation,
        loot: rewards.loot,
        ruble_reward: rewards.rubles,
        survivor_status_effects: fight.player_effects,
        events: fight.events,
        transcript,
    }
}
