//! Weapon classes and their on-hit specials.

use serde::{Deserialize, Serialize};

use crate::rng::RandomSource;

/// Weapon classes recognised by the combat tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WeaponClass {
    Rifle,
    Shotgun,
    Pistol,
    Smg,
    Sniper,
    Melee,
}

/// A class's special ability, rolled once per successful hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WeaponSpecial {
    /// Chance to make the target bleed.
    Bleed { chance: f64 },
    /// Chance to stun the target.
    Stagger { chance: f64 },
    /// Chance of a quick follow-up shot worth `fraction` of the hit.
    FollowUp { chance: f64, fraction: f64 },
    /// Chance of a 2-3 round burst, each round worth `per_round` of the hit.
    Burst { chance: f64, per_round: f64 },
    None,
}

/// What a special roll produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpecialProc {
    Bleed,
    Stagger,
    FollowUp { extra: u32 },
    Burst { rounds: u32 },
}

impl WeaponClass {
    pub const ALL: [WeaponClass; 6] = [
        WeaponClass::Rifle,
        WeaponClass::Shotgun,
        WeaponClass::Pistol,
        WeaponClass::Smg,
        WeaponClass::Sniper,
        WeaponClass::Melee,
    ];

    /// Resolve a class from a catalog type name. Unknown names fall back to [`WeaponClass::Pistol`].
    pub fn from_type_name(name: &str) -> Self {
        match name.trim().to_ascii_uppercase().as_str() {
            "RIFLE" => WeaponClass::Rifle,
            "SHOTGUN" => WeaponClass::Shotgun,
            "SMG" => WeaponClass::Smg,
            "SNIPER" => WeaponClass::Sniper,
            "MELEE" => WeaponClass::Melee,
            _ => WeaponClass::Pistol,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            WeaponClass::Rifle => "Rifle",
            WeaponClass::Shotgun => "Shotgun",
            WeaponClass::Pistol => "Pistol",
            WeaponClass::Smg => "SMG",
            WeaponClass::Sniper => "Sniper Rifle",
            WeaponClass::Melee => "Melee",
        }
    }

    pub const fn critical_chance(self) -> f64 {
        match self {
            WeaponClass::Rifle => 0.15,
            WeaponClass::Shotgun => 0.2,
            WeaponClass::Pistol => 0.1,
            WeaponClass::Smg => 0.1,
            WeaponClass::Sniper => 0.3,
            WeaponClass::Melee => 0.15,
        }
    }

    pub const fn critical_multiplier(self) -> f64 {
        match self {
            WeaponClass::Rifle => 1.5,
            WeaponClass::Shotgun => 2.0,
            WeaponClass::Pistol => 1.3,
            WeaponClass::Smg => 1.2,
            WeaponClass::Sniper => 2.5,
            WeaponClass::Melee => 1.7,
        }
    }

    pub const fn special(self) -> WeaponSpecial {
        match self {
            WeaponClass::Rifle => WeaponSpecial::Bleed { chance: 0.2 },
            WeaponClass::Shotgun => WeaponSpecial::Stagger { chance: 0.15 },
            WeaponClass::Pistol => WeaponSpecial::FollowUp {
                chance: 0.25,
                fraction: 0.5,
            },
            WeaponClass::Smg => WeaponSpecial::Burst {
                chance: 0.3,
                per_round: 0.4,
            },
            WeaponClass::Sniper => WeaponSpecial::None,
            WeaponClass::Melee => WeaponSpecial::Stagger { chance: 0.25 },
        }
    }

    /// Roll this class's special for a hit of `damage`.
    ///
    /// Returns the adjusted damage and the proc, if any. Classes with a special
    /// always consume one draw; a burst consumes a second draw for its length.
    pub fn roll_special(self, damage: u32, rng: &mut dyn RandomSource) -> (u32, Option<SpecialProc>) {
        match self.special() {
            WeaponSpecial::None => (damage, None),
            WeaponSpecial::Bleed { chance } => {
                let proc = rng.chance(chance).then_some(SpecialProc::Bleed);
                (damage, proc)
            }
            WeaponSpecial::Stagger { chance } => {
                let proc = rng.chance(chance).then_some(SpecialProc::Stagger);
                (damage, proc)
            }
            WeaponSpecial::FollowUp { chance, fraction } => {
                if rng.chance(chance) {
                    let extra = (f64::from(damage) * fraction).floor() as u32;
                    (damage + extra, Some(SpecialProc::FollowUp { extra }))
                } else {
                    (damage, None)
                }
            }
            WeaponSpecial::Burst { chance, per_round } => {
                if rng.chance(chance) {
                    let rounds = (rng.next_f64() * 2.0).floor() as u32 + 2;
                    let total = (f64::from(damage) * f64::from(rounds) * per_round).floor() as u32;
                    (total, Some(SpecialProc::Burst { rounds }))
                } else {
                    (damage, None)
                }
            }
        }
    }
}

impl std::fmt::Display for WeaponClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{FixedRandom, ScriptedRandom};

    #[test]
    fn test_unknown_type_falls_back_to_pistol() {
        assert_eq!(WeaponClass::from_type_name("rifle"), WeaponClass::Rifle);
        assert_eq!(WeaponClass::from_type_name("SMG"), WeaponClass::Smg);
        assert_eq!(WeaponClass::from_type_name("railgun"), WeaponClass::Pistol);
        assert_eq!(WeaponClass::from_type_name(""), WeaponClass::Pistol);
    }

    #[test]
    fn test_sniper_consumes_no_draw() {
        let mut rng = ScriptedRandom::new(vec![0.0]);
        let (damage, proc) = WeaponClass::Sniper.roll_special(40, &mut rng);
        assert_eq!(damage, 40);
        assert_eq!(proc, None);
        assert_eq!(rng.draws(), 0);
    }

    #[test]
    fn test_pistol_follow_up() {
        let mut rng = FixedRandom::new(0.1);
        let (damage, proc) = WeaponClass::Pistol.roll_special(25, &mut rng);
        assert_eq!(damage, 37);
        assert_eq!(proc, Some(SpecialProc::FollowUp { extra: 12 }));

        let mut miss = FixedRandom::new(0.5);
        assert_eq!(WeaponClass::Pistol.roll_special(25, &mut miss), (25, None));
    }

    #[test]
    fn test_smg_burst() {
        // Proc on the first draw, burst length from the second: floor(0.6 * 2) + 2 = 3.
        let mut rng = ScriptedRandom::new(vec![0.1, 0.6]);
        let (damage, proc) = WeaponClass::Smg.roll_special(20, &mut rng);
        assert_eq!(proc, Some(SpecialProc::Burst { rounds: 3 }));
        assert_eq!(damage, 24);
        assert_eq!(rng.draws(), 2);
    }

    #[test]
    fn test_status_specials() {
        let mut rng = FixedRandom::new(0.1);
        assert_eq!(
            WeaponClass::Rifle.roll_special(30, &mut rng),
            (30, Some(SpecialProc::Bleed))
        );
        assert_eq!(
            WeaponClass::Shotgun.roll_special(30, &mut rng),
            (30, Some(SpecialProc::Stagger))
        );
        assert_eq!(
            WeaponClass::Melee.roll_special(30, &mut rng),
            (30, Some(SpecialProc::Stagger))
        );
    }
}
