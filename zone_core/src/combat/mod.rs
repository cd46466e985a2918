//! Round-based combat resolution.
//!
//! Both resolvers are pure functions of their inputs and the random source:
//! they take snapshots, never touch persisted state, and return a result the
//! caller applies once.

mod pve;
mod pvp;
mod rewards;

pub use pve::*;
pub use pvp::*;
pub use rewards::*;

use serde::{Deserialize, Serialize};

use zone_rules::{Catalog, Item, ItemId, WeaponClass};

use crate::error::Rejection;

/// Damage multiplier for blows that catch a mutant off guard.
pub const SURPRISE_PENALTY: f64 = 0.75;
/// Weight assumed for a catalog weapon listed without one.
pub const DEFAULT_WEAPON_WEIGHT: f64 = 2.0;

/// The combat-relevant view of a weapon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponProfile {
    pub name: String,
    pub class: WeaponClass,
    pub damage: u32,
    pub accuracy: u32,
    pub weight: f64,
}

impl WeaponProfile {
    /// Bare hands.
    pub fn unarmed() -> Self {
        Self {
            name: "your fists".to_string(),
            class: WeaponClass::Melee,
            damage: 5,
            accuracy: 60,
            weight: 0.0,
        }
    }

    /// Build from a catalog item. Missing stats fall back to the bare-hand
    /// values; a weapon without a weight weighs [`DEFAULT_WEAPON_WEIGHT`].
    pub fn from_item(item: &Item) -> Self {
        let unarmed = Self::unarmed();
        let weight = if item.weight > 0.0 { item.weight } else { DEFAULT_WEAPON_WEIGHT };
        Self {
            name: item.name.clone(),
            class: item.weapon_class.unwrap_or(WeaponClass::Pistol),
            damage: item.damage.unwrap_or(unarmed.damage),
            accuracy: item.accuracy.unwrap_or(unarmed.accuracy),
            weight,
        }
    }

    /// Resolve an equipped weapon id. An equipped id the catalog doesn't know is a rejection.
    pub fn lookup(catalog: &Catalog, id: &ItemId) -> Result<Self, Rejection> {
        catalog
            .item(id.as_str())
            .map(Self::from_item)
            .ok_or_else(|| Rejection::UnknownItem { id: id.clone() })
    }

    /// The same weapon swung in a panic: damage and accuracy scaled by
    /// [`SURPRISE_PENALTY`], floored.
    pub fn surprised(mut self) -> Self {
        self.damage = (f64::from(self.damage) * SURPRISE_PENALTY).floor() as u32;
        self.accuracy = (f64::from(self.accuracy) * SURPRISE_PENALTY).floor() as u32;
        self
    }
}

/// Reduce `damage` by an armor protection percentage.
///
/// Armored hits that land always deal at least 1.
pub fn mitigate(damage: u32, protection: u32) -> u32 {
    if protection == 0 || damage == 0 {
        return damage;
    }
    let protection = protection.min(100);
    let reduced = (f64::from(damage) - f64::from(damage) * f64::from(protection) / 100.0).floor();
    (reduced as u32).max(1)
}
