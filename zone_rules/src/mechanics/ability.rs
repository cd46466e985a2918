//! Mutant special abilities.
//!
//! Abilities are applied through [`apply_ability`] and [`deactivate_ability`],
//! which take the fight's ability state by value and hand back the next state
//! along with what happened, so the combat loop never mutates it in place.

use serde::{Deserialize, Serialize};

use super::MAX_RADIATION;
use crate::rng::RandomSource;

/// Chance per round that an active Stealth or Psychic ability wears off.
pub const ABILITY_DEACTIVATION_CHANCE: f64 = 0.4;
/// Mutants above this max health may be granted Regeneration.
pub const REGENERATION_HEALTH_THRESHOLD: u32 = 100;
pub const REGENERATION_CHANCE: f64 = 0.25;
/// Fraction of max health restored per regeneration tick.
pub const REGENERATION_FRACTION: f64 = 0.05;
/// Subtracted from the player's hit chance while the mutant is cloaked.
pub const STEALTH_EVASION: f64 = 0.3;
/// Subtracted from the player's hit chance during a psychic attack.
pub const PSYCHIC_ACCURACY_PENALTY: f64 = 0.3;
/// Radiation burst range for the radiation aura, inclusive.
pub const RADIATION_AURA_RANGE: (u32, u32) = (3, 7);

/// Special abilities a mutant can bring to a fight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MutantAbility {
    Stealth,
    Frenzy,
    Psychic,
    RadiationAura,
    Regeneration,
}

impl MutantAbility {
    pub const fn name(self) -> &'static str {
        match self {
            MutantAbility::Stealth => "Stealth",
            MutantAbility::Frenzy => "Frenzy",
            MutantAbility::Psychic => "Psychic Attack",
            MutantAbility::RadiationAura => "Radiation Aura",
            MutantAbility::Regeneration => "Regeneration",
        }
    }

    /// Per-round chance that an inactive ability triggers.
    pub const fn activation_chance(self) -> f64 {
        match self {
            MutantAbility::Stealth => 0.3,
            MutantAbility::Frenzy => 0.25,
            MutantAbility::Psychic => 0.2,
            MutantAbility::RadiationAura => 0.3,
            MutantAbility::Regeneration => 1.0,
        }
    }

    /// Whether the ability can wear off once active. The others last the whole fight.
    pub const fn can_deactivate(self) -> bool {
        matches!(self, MutantAbility::Stealth | MutantAbility::Psychic)
    }

    /// Instant abilities fire every round and never enter the active set.
    pub const fn is_instant(self) -> bool {
        matches!(self, MutantAbility::Regeneration)
    }

    /// Ability granted by a mutant's type name, matched on lowercase substrings.
    pub fn for_mutant_type(type_name: &str) -> Option<Self> {
        let kind = type_name.to_lowercase();
        if kind.contains("bloodsucker") {
            Some(MutantAbility::Stealth)
        } else if kind.contains("pseudogiant") || kind.contains("boar") {
            Some(MutantAbility::Frenzy)
        } else if kind.contains("controller") || kind.contains("poltergeist") {
            Some(MutantAbility::Psychic)
        } else if kind.contains("snork") || kind.contains("chimera") {
            Some(MutantAbility::Frenzy)
        } else if kind.contains("burner") || kind.contains("pyrogeist") {
            Some(MutantAbility::RadiationAura)
        } else {
            None
        }
    }
}

impl std::fmt::Display for MutantAbility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// The part of a fight that abilities act on.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AbilityState {
    /// Abilities currently in effect. Never holds duplicates or instant abilities.
    pub active: Vec<MutantAbility>,
    pub mutant_health: u32,
    pub mutant_max_health: u32,
    pub player_radiation: u32,
}

impl AbilityState {
    /// Create the state at the start of a fight.
    pub fn new(mutant_health: u32, player_radiation: u32) -> Self {
        Self {
            active: Vec::new(),
            mutant_health,
            mutant_max_health: mutant_health,
            player_radiation,
        }
    }

    pub fn is_active(&self, ability: MutantAbility) -> bool {
        self.active.contains(&ability)
    }
}

/// What an ability did when it triggered or wore off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AbilityEffect {
    Vanished,
    Reappeared,
    Frenzied,
    PsychicWave,
    PsychicFaded,
    RadiationBurst { amount: u32 },
    Regenerated { amount: u32 },
}

/// Trigger `ability`, returning the next state and what happened.
pub fn apply_ability(
    ability: MutantAbility,
    mut state: AbilityState,
    rng: &mut dyn RandomSource,
) -> (AbilityState, AbilityEffect) {
    if !ability.is_instant() && !state.is_active(ability) {
        state.active.push(ability);
    }

    let effect = match ability {
        MutantAbility::Stealth => AbilityEffect::Vanished,
        MutantAbility::Frenzy => AbilityEffect::Frenzied,
        MutantAbility::Psychic => AbilityEffect::PsychicWave,
        MutantAbility::RadiationAura => {
            let (lo, hi) = RADIATION_AURA_RANGE;
            let amount = rng.roll_inclusive(lo, hi);
            state.player_radiation = (state.player_radiation + amount).min(MAX_RADIATION);
            AbilityEffect::RadiationBurst { amount }
        }
        MutantAbility::Regeneration => {
            let heal = (f64::from(state.mutant_max_health) * REGENERATION_FRACTION).floor() as u32;
            let healed = (state.mutant_health + heal).min(state.mutant_max_health);
            let amount = healed - state.mutant_health;
            state.mutant_health = healed;
            AbilityEffect::Regenerated { amount }
        }
    };

    (state, effect)
}

/// End an active ability. Returns the effect to report, if the ability has one.
pub fn deactivate_ability(
    ability: MutantAbility,
    mut state: AbilityState,
) -> (AbilityState, Option<AbilityEffect>) {
    let was_active = state.is_active(ability);
    state.active.retain(|a| *a != ability);

    let effect = match ability {
        MutantAbility::Stealth if was_active => Some(AbilityEffect::Reappeared),
        MutantAbility::Psychic if was_active => Some(AbilityEffect::PsychicFaded),
        _ => None,
    };
    (state, effect)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::FixedRandom;

    #[test]
    fn test_ability_assignment_by_type() {
        assert_eq!(MutantAbility::for_mutant_type("Bloodsucker"), Some(MutantAbility::Stealth));
        assert_eq!(MutantAbility::for_mutant_type("wild boar"), Some(MutantAbility::Frenzy));
        assert_eq!(MutantAbility::for_mutant_type("Poltergeist"), Some(MutantAbility::Psychic));
        assert_eq!(MutantAbility::for_mutant_type("snork"), Some(MutantAbility::Frenzy));
        assert_eq!(MutantAbility::for_mutant_type("Burner"), Some(MutantAbility::RadiationAura));
        assert_eq!(MutantAbility::for_mutant_type("flesh"), None);
    }

    #[test]
    fn test_first_match_wins() {
        // "bloodsucker" is checked before "controller".
        assert_eq!(
            MutantAbility::for_mutant_type("bloodsucker controller"),
            Some(MutantAbility::Stealth)
        );
    }

    #[test]
    fn test_apply_does_not_duplicate() {
        let mut rng = FixedRandom::new(0.5);
        let state = AbilityState::new(80, 0);
        let (state, _) = apply_ability(MutantAbility::Frenzy, state, &mut rng);
        let (state, effect) = apply_ability(MutantAbility::Frenzy, state, &mut rng);
        assert_eq!(effect, AbilityEffect::Frenzied);
        assert_eq!(state.active, vec![MutantAbility::Frenzy]);
    }

    #[test]
    fn test_radiation_aura_clamps() {
        let mut rng = FixedRandom::new(0.5);
        let (state, effect) = apply_ability(MutantAbility::RadiationAura, AbilityState::new(80, 98), &mut rng);
        assert_eq!(effect, AbilityEffect::RadiationBurst { amount: 5 });
        assert_eq!(state.player_radiation, 100);
    }

    #[test]
    fn test_regeneration_is_instant_and_capped() {
        let mut rng = FixedRandom::new(0.5);
        let mut state = AbilityState::new(200, 0);
        state.mutant_health = 195;
        let (state, effect) = apply_ability(MutantAbility::Regeneration, state, &mut rng);
        assert_eq!(effect, AbilityEffect::Regenerated { amount: 5 });
        assert_eq!(state.mutant_health, 200);
        assert!(state.active.is_empty());

        let mut wounded = AbilityState::new(200, 0);
        wounded.mutant_health = 100;
        let (wounded, effect) = apply_ability(MutantAbility::Regeneration, wounded, &mut rng);
        assert_eq!(effect, AbilityEffect::Regenerated { amount: 10 });
        assert_eq!(wounded.mutant_health, 110);
    }

    #[test]
    fn test_deactivate_stealth() {
        let mut rng = FixedRandom::new(0.5);
        let (state, _) = apply_ability(MutantAbility::Stealth, AbilityState::new(80, 0), &mut rng);
        assert!(state.is_active(MutantAbility::Stealth));
        let (state, effect) = deactivate_ability(MutantAbility::Stealth, state);
        assert_eq!(effect, Some(AbilityEffect::Reappeared));
        assert!(!state.is_active(MutantAbility::Stealth));
    }
}
