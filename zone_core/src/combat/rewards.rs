//! Kill rewards: reputation, loot and rubles.

use serde::{Deserialize, Serialize};

use zone_rules::{Catalog, ItemId, LootEntry, MutantDef, RandomSource, RubleRange, SYNTHESIZED_LOOT_WEIGHT};

/// An item that dropped from a kill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LootDrop {
    pub item_id: ItemId,
    pub name: String,
    pub weight: f64,
    pub value: u32,
}

/// A loot table entry with its item already looked up.
#[derive(Debug, Clone, PartialEq)]
pub struct LootRoll {
    pub drop: LootDrop,
    pub chance: f64,
}

impl LootRoll {
    /// Resolve an entry against the catalog. Items the catalog doesn't know
    /// are synthesized from the entry itself.
    pub fn resolve(entry: &LootEntry, catalog: &Catalog) -> Self {
        let drop = match catalog.item(entry.item_id.as_str()) {
            Some(item) => LootDrop {
                item_id: item.id.clone(),
                name: item.name.clone(),
                weight: item.weight,
                value: entry.value.unwrap_or(item.value),
            },
            None => LootDrop {
                item_id: entry.item_id.clone(),
                name: entry.name.clone().unwrap_or_else(|| entry.item_id.to_string()),
                weight: entry.weight.unwrap_or(SYNTHESIZED_LOOT_WEIGHT),
                value: entry.value.unwrap_or(0),
            },
        };
        Self {
            drop,
            chance: entry.drop_chance(),
        }
    }

    /// Resolve a mutant's whole loot table.
    pub fn table_for(mutant: &MutantDef, catalog: &Catalog) -> Vec<Self> {
        mutant
            .loot_table()
            .iter()
            .map(|entry| Self::resolve(entry, catalog))
            .collect()
    }
}

/// Everything a kill pays out.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Rewards {
    pub reputation: u32,
    pub loot: Vec<LootDrop>,
    pub rubles: u32,
}

/// Roll kill rewards.
///
/// Each loot entry gets one draw; a drop is kept only if it fits under
/// `capacity` on top of `carried` and anything already kept. Rubles take
/// one draw after the loot.
pub fn roll_rewards(
    reputation: u32,
    loot_table: &[LootRoll],
    rubles: RubleRange,
    carried: f64,
    capacity: f64,
    rng: &mut dyn RandomSource,
) -> Rewards {
    let mut weight = carried;
    let mut loot = Vec::new();
    for roll in loot_table {
        if rng.chance(roll.chance) && weight + roll.drop.weight <= capacity {
            weight += roll.drop.weight;
            loot.push(roll.drop.clone());
        }
    }
    let rubles = rng.roll_inclusive(rubles.min, rubles.max);
    Rewards {
        reputation,
        loot,
        rubles,
    }
}
