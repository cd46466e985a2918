//! Structured combat event log and its plain-text rendering.
//!
//! Resolvers record what happened as [`CombatEvent`]s; the transcript shown to
//! players is rendered from those events by a [`Narrator`], so tests can check
//! the mechanics without depending on wording.

use serde::{Deserialize, Serialize};

use zone_rules::{AbilityEffect, MutantAbility, SpecialProc, StatusEffectKind};

/// Who an event is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Actor {
    Player,
    Mutant,
    Challenger,
    Target,
    /// The environment: emissions, anomalies.
    Zone,
}

impl Actor {
    /// The other side of a PvP duel.
    pub fn opponent(self) -> Actor {
        match self {
            Actor::Player => Actor::Mutant,
            Actor::Mutant => Actor::Player,
            Actor::Challenger => Actor::Target,
            Actor::Target => Actor::Challenger,
            Actor::Zone => Actor::Zone,
        }
    }
}

/// Why a fight ended without a kill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetreatReason {
    /// Health fell below a quarter and the stalker chose to run.
    LowHealth,
    /// A blow would have been fatal; the stalker staggered away at 1 health.
    Wounded,
    /// The round limit ran out.
    Exhausted,
}

/// How a duel was decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuelDecision {
    Surrender,
    Health,
    CoinFlip,
}

/// What happened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventKind {
    Encounter { mutant: String },
    Armed { weapon: String },
    AbilitiesSensed { abilities: Vec<MutantAbility> },
    Initiative,
    RoundStarted,
    StatusDamage { effect: StatusEffectKind, amount: u32 },
    StatusRadiation { effect: StatusEffectKind, amount: u32 },
    StatusExpired { effect: StatusEffectKind },
    Ability { effect: AbilityEffect },
    Special { proc: SpecialProc },
    StunBonus,
    Hit { damage: u32, critical: bool, armored: bool },
    Miss { obscured: bool },
    StunnedSkip,
    ExtraAttack,
    Afflicted { effect: StatusEffectKind },
    Slain,
    Retreat { reason: RetreatReason },
    Victory,
    Escaped { damage_taken: u32 },
    RadiationTotal { amount: u32 },
    DuelWon { decision: DuelDecision },
    EmissionSheltered,
    EmissionExposed { damage: u32 },
    RadiationExposure { amount: u32 },
}

/// One entry in a combat's event log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatEvent {
    /// 0 for events before the first round.
    pub round: u32,
    pub actor: Actor,
    #[serde(flatten)]
    pub kind: EventKind,
}

impl CombatEvent {
    pub fn new(round: u32, actor: Actor, kind: EventKind) -> Self {
        Self { round, actor, kind }
    }

    /// The numeric amount carried by the event, if any.
    pub fn amount(&self) -> Option<u32> {
        match &self.kind {
            EventKind::StatusDamage { amount, .. }
            | EventKind::StatusRadiation { amount, .. }
            | EventKind::RadiationTotal { amount }
            | EventKind::RadiationExposure { amount } => Some(*amount),
            EventKind::Hit { damage, .. } | EventKind::EmissionExposed { damage } => Some(*damage),
            EventKind::Escaped { damage_taken } => Some(*damage_taken),
            EventKind::Special {
                proc: SpecialProc::FollowUp { extra },
            } => Some(*extra),
            EventKind::Ability {
                effect: AbilityEffect::RadiationBurst { amount } | AbilityEffect::Regenerated { amount },
            } => Some(*amount),
            _ => None,
        }
    }

    pub fn is_hit(&self) -> bool {
        matches!(self.kind, EventKind::Hit { .. })
    }
}

/// Renders events as display lines.
///
/// PvE lines address the player in the second person; PvP lines name both sides.
#[derive(Debug, Clone)]
pub struct Narrator {
    mutant: String,
    challenger: String,
    target: String,
}

impl Narrator {
    /// Narrator for a fight against a mutant.
    pub fn pve(mutant: impl Into<String>) -> Self {
        Self {
            mutant: mutant.into(),
            challenger: String::new(),
            target: String::new(),
        }
    }

    /// Narrator for a duel.
    pub fn pvp(challenger: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            mutant: String::new(),
            challenger: challenger.into(),
            target: target.into(),
        }
    }

    fn name(&self, actor: Actor) -> &str {
        match actor {
            Actor::Player => "You",
            Actor::Mutant => &self.mutant,
            Actor::Challenger => &self.challenger,
            Actor::Target => &self.target,
            Actor::Zone => "The Zone",
        }
    }

    /// Render a whole log.
    pub fn render_all(&self, events: &[CombatEvent]) -> Vec<String> {
        events.iter().map(|event| self.render(event)).collect()
    }

    /// Render one event as a line of text.
    pub fn render(&self, event: &CombatEvent) -> String {
        let actor = event.actor;
        let m = &self.mutant;
        let pvp = matches!(actor, Actor::Challenger | Actor::Target);
        match &event.kind {
            EventKind::Encounter { mutant } => format!("You encountered a {mutant} in the zone."),
            EventKind::Armed { weapon } if pvp => format!("{} is armed with {weapon}.", self.name(actor)),
            EventKind::Armed { weapon } => format!("You're armed with {weapon}."),
            EventKind::AbilitiesSensed { abilities } => {
                let names: Vec<&str> = abilities.iter().map(|a| a.name()).collect();
                format!("The {m} seems to have special abilities: {}.", names.join(", "))
            }
            EventKind::Initiative => format!("{} moves first.", self.name(actor)),
            EventKind::RoundStarted => format!("[Round {}]", event.round),
            EventKind::StatusDamage { effect, amount } => {
                let def = effect.definition();
                match actor {
                    Actor::Player => format!("{} {}: You take {amount} damage.", def.icon, def.name),
                    _ => format!("{} {}: {} takes {amount} damage.", def.icon, def.name, self.name(actor)),
                }
            }
            EventKind::StatusRadiation { effect, amount } => {
                let def = effect.definition();
                format!("{} {}: Your radiation rises by {amount}.", def.icon, def.name)
            }
            EventKind::StatusExpired { effect } => match actor {
                Actor::Player => format!("You are no longer affected by {}.", effect.name()),
                Actor::Mutant => format!("The {m} is no longer affected by {}.", effect.name()),
                _ => format!("{} is no longer affected by {}.", self.name(actor), effect.name()),
            },
            EventKind::Ability { effect } => match effect {
                AbilityEffect::Vanished => format!("The {m} vanishes from sight!"),
                AbilityEffect::Reappeared => format!("The {m} reappears!"),
                AbilityEffect::Frenzied => format!("The {m} enters a frenzy!"),
                AbilityEffect::PsychicWave => {
                    format!("The {m} unleashes a psychic wave! Your vision blurs.")
                }
                AbilityEffect::PsychicFaded => "Your head clears.".to_string(),
                AbilityEffect::RadiationBurst { amount } => {
                    format!("The {m} emits a burst of radiation! (+{amount} radiation)")
                }
                AbilityEffect::Regenerated { amount } => {
                    format!("The {m} regenerates {amount} health!")
                }
            },
            EventKind::Special { proc } => self.render_special(actor, *proc),
            EventKind::StunBonus => format!("Your attack deals extra damage to the stunned {m}!"),
            EventKind::Hit {
                damage,
                critical,
                armored,
            } => self.render_hit(actor, *damage, *critical, *armored),
            EventKind::Miss { obscured } => match actor {
                Actor::Player if *obscured => format!("You can't see the {m} clearly and miss!"),
                Actor::Player => format!("You missed the {m}!"),
                Actor::Mutant => format!("The {m} missed you!"),
                _ => format!("{} misses {}!", self.name(actor), self.name(actor.opponent())),
            },
            EventKind::StunnedSkip => format!("The {m} is stunned and cannot attack!"),
            EventKind::ExtraAttack => format!("The {m} attacks again in its frenzy!"),
            EventKind::Afflicted { effect } => {
                let def = effect.definition();
                format!("{} The {m}'s attack leaves you {}!", def.icon, def.name.to_lowercase())
            }
            EventKind::Slain => format!("The {m} collapses!"),
            EventKind::Retreat { reason } => match reason {
                RetreatReason::LowHealth => "You're badly wounded and decide to retreat!".to_string(),
                RetreatReason::Wounded => "You're critically wounded and barely escape!".to_string(),
                RetreatReason::Exhausted => format!("You're exhausted and retreat from the {m}."),
            },
            EventKind::Victory => format!("You defeated the {m}!"),
            EventKind::Escaped { damage_taken } => {
                format!("You escaped from the {m}, but took {damage_taken} damage.")
            }
            EventKind::RadiationTotal { amount } => {
                format!("You gained {amount} radiation during the fight.")
            }
            EventKind::DuelWon { decision } => {
                let winner = self.name(actor);
                match decision {
                    DuelDecision::Surrender => {
                        format!("{} is critically wounded and surrenders! {winner} wins!", self.name(actor.opponent()))
                    }
                    DuelDecision::Health => format!("Time is up. {winner} wins with more health remaining!"),
                    DuelDecision::CoinFlip => format!("Time is up and both are equally hurt. Fate favours {winner}!"),
                }
            }
            EventKind::EmissionSheltered => "You ride out the emission in shelter.".to_string(),
            EventKind::EmissionExposed { damage } => {
                format!("The emission tears through you for {damage} damage!")
            }
            EventKind::RadiationExposure { amount } => {
                format!("Your dosimeter crackles: +{amount} radiation.")
            }
        }
    }

    fn render_special(&self, actor: Actor, proc: SpecialProc) -> String {
        let target = match actor {
            Actor::Player => format!("the {}", self.mutant),
            _ => self.name(actor.opponent()).to_string(),
        };
        let subject = self.name(actor);
        match proc {
            SpecialProc::Bleed => format!("🩸 The shot leaves {target} bleeding!"),
            SpecialProc::Stagger => format!("💫 The blow stuns {target}!"),
            SpecialProc::FollowUp { extra } => format!(
                "{subject} {} a quick follow-up shot for {extra} extra damage!",
                verb(actor, "fire", "fires")
            ),
            SpecialProc::Burst { rounds } => format!("{subject} {} a {rounds}-round burst!", verb(actor, "fire", "fires")),
        }
    }

    fn render_hit(&self, actor: Actor, damage: u32, critical: bool, armored: bool) -> String {
        let m = &self.mutant;
        let armor_note = if armored { " (reduced by armor)" } else { "" };
        match actor {
            Actor::Player if critical => format!("CRITICAL HIT! You strike the {m} for {damage} damage!"),
            Actor::Player => format!("You hit the {m} for {damage} damage."),
            Actor::Mutant => format!("The {m} attacks you for {damage} damage{armor_note}."),
            _ => {
                let crit = if critical { "CRITICAL HIT! " } else { "" };
                format!(
                    "{crit}{} hits {} for {damage} damage{armor_note}.",
                    self.name(actor),
                    self.name(actor.opponent())
                )
            }
        }
    }
}

fn verb(actor: Actor, second_person: &'static str, third_person: &'static str) -> &'static str {
    match actor {
        Actor::Player => second_person,
        _ => third_person,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pve_hit_lines() {
        let narrator = Narrator::pve("Blind Dog");
        let hit = CombatEvent::new(1, Actor::Player, EventKind::Hit { damage: 25, critical: false, armored: false });
        assert_eq!(narrator.render(&hit), "You hit the Blind Dog for 25 damage.");
        let bite = CombatEvent::new(1, Actor::Mutant, EventKind::Hit { damage: 7, critical: false, armored: true });
        assert_eq!(narrator.render(&bite), "The Blind Dog attacks you for 7 damage (reduced by armor).");
        assert_eq!(hit.amount(), Some(25));
    }

    #[test]
    fn test_pvp_lines_name_both_sides() {
        let narrator = Narrator::pvp("Strelok", "Degtyarev");
        let hit = CombatEvent::new(2, Actor::Target, EventKind::Hit { damage: 12, critical: true, armored: false });
        assert_eq!(narrator.render(&hit), "CRITICAL HIT! Degtyarev hits Strelok for 12 damage.");
        let miss = CombatEvent::new(2, Actor::Challenger, EventKind::Miss { obscured: false });
        assert_eq!(narrator.render(&miss), "Strelok misses Degtyarev!");
    }

    #[test]
    fn test_follow_up_wording() {
        let pve = Narrator::pve("Flesh");
        let event = CombatEvent::new(1, Actor::Player, EventKind::Special { proc: SpecialProc::FollowUp { extra: 12 } });
        assert_eq!(pve.render(&event), "You fire a quick follow-up shot for 12 extra damage!");
        assert_eq!(event.amount(), Some(12));

        let pvp = Narrator::pvp("Strelok", "Degtyarev");
        let event = CombatEvent::new(1, Actor::Target, EventKind::Special { proc: SpecialProc::FollowUp { extra: 6 } });
        assert_eq!(pvp.render(&event), "Degtyarev fires a quick follow-up shot for 6 extra damage!");
    }

    #[test]
    fn test_round_header() {
        let narrator = Narrator::pve("Flesh");
        let event = CombatEvent::new(3, Actor::Zone, EventKind::RoundStarted);
        assert_eq!(narrator.render(&event), "[Round 3]");
    }

    #[test]
    fn test_event_serializes_flat() {
        let event = CombatEvent::new(4, Actor::Mutant, EventKind::Slain);
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["round"], 4);
        assert_eq!(json["actor"], "mutant");
        assert_eq!(json["kind"], "slain");
    }
}
