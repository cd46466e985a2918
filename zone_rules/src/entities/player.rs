//! Stalker definitions.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{
    ActiveAnomaly, Bonuses, Cooldowns, Equipment, ItemId, PlayerId, StatusEffectInstance, ZoneId,
    MAX_ARTIFACT_SLOTS,
};
use crate::catalog::{Catalog, ItemCategory};
use crate::config::GameConfig;
use crate::mechanics::{DamageKind, StatusEffectKind};

/// Reputation needed per rank.
pub const REPUTATION_PER_RANK: u32 = 100;
/// Durability of gear that has never been worn.
pub const FULL_DURABILITY: u32 = 100;
/// What every rookie walks into the Zone with.
pub const STARTER_KIT: [&str; 2] = ["junk_bolt", "medkit"];

/// A stalker's persisted record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    #[serde(default)]
    pub faction: Option<String>,
    pub rank: u32,
    pub reputation: u32,
    pub health: u32,
    pub max_health: u32,
    pub radiation: u32,
    pub rubles: u32,
    #[serde(default)]
    pub inventory: Vec<ItemId>,
    /// Cached total weight of `inventory`.
    #[serde(default)]
    pub inventory_weight: f64,
    pub current_zone: ZoneId,
    #[serde(default)]
    pub equipped: Equipment,
    #[serde(default)]
    pub status_effects: Vec<StatusEffectInstance>,
    #[serde(default)]
    pub cooldowns: Cooldowns,
    #[serde(default)]
    pub bonuses: Bonuses,
    #[serde(default)]
    pub active_anomaly: Option<ActiveAnomaly>,
    /// Item -> durability percentage. Missing entries are at full durability.
    #[serde(default)]
    pub durability: BTreeMap<ItemId, u32>,
}

impl Player {
    /// Create a fresh stalker with the configured starting kit.
    pub fn new(id: impl Into<PlayerId>, name: impl Into<String>, config: &GameConfig) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            faction: None,
            rank: 1,
            reputation: 0,
            health: config.starting_health,
            max_health: config.max_health,
            radiation: 0,
            rubles: config.starting_rubles,
            inventory: Vec::new(),
            inventory_weight: 0.0,
            current_zone: ZoneId::new(config.start_zone.clone()),
            equipped: Equipment::default(),
            status_effects: Vec::new(),
            cooldowns: Cooldowns::default(),
            bonuses: Bonuses::default(),
            active_anomaly: None,
            durability: BTreeMap::new(),
        }
    }

    /// Hand out [`STARTER_KIT`] and weigh it.
    pub fn with_starter_kit(mut self, catalog: &Catalog) -> Self {
        self.inventory.extend(STARTER_KIT.iter().map(|id| ItemId::from(*id)));
        self.recompute_inventory_weight(catalog);
        self
    }

    /// Rank earned by a reputation total.
    pub fn rank_for_reputation(reputation: u32) -> u32 {
        reputation / REPUTATION_PER_RANK + 1
    }

    /// Add reputation, returning the new rank on promotion.
    pub fn add_reputation(&mut self, amount: u32) -> Option<u32> {
        self.reputation = self.reputation.saturating_add(amount);
        let rank = Self::rank_for_reputation(self.reputation);
        if rank > self.rank {
            self.rank = rank;
            Some(rank)
        } else {
            None
        }
    }

    /// Sum of the catalog weights of everything carried.
    pub fn carried_weight(&self, catalog: &Catalog) -> f64 {
        self.inventory.iter().map(|id| catalog.item_weight(id.as_str())).sum()
    }

    /// Refresh the cached inventory weight.
    pub fn recompute_inventory_weight(&mut self, catalog: &Catalog) -> f64 {
        self.inventory_weight = self.carried_weight(catalog);
        self.inventory_weight
    }

    /// Whether an item of `weight` still fits under `capacity`.
    pub fn can_carry(&self, weight: f64, capacity: f64) -> bool {
        self.inventory_weight + weight <= capacity
    }

    /// Check if the stalker carries an item of `category`.
    pub fn has_item_in_category(&self, catalog: &Catalog, category: ItemCategory) -> bool {
        self.inventory
            .iter()
            .filter_map(|id| catalog.item(id.as_str()))
            .any(|item| item.category == category)
    }

    /// Check if the stalker has a specific status effect.
    pub fn has_status(&self, kind: StatusEffectKind) -> bool {
        self.status_effects.iter().any(|e| e.kind == kind)
    }

    /// Put an artifact on the belt. Returns false when every slot is taken.
    pub fn equip_artifact(&mut self, id: impl Into<ItemId>) -> bool {
        if self.equipped.artifacts.len() >= MAX_ARTIFACT_SLOTS {
            return false;
        }
        self.equipped.artifacts.push(id.into());
        true
    }

    /// Replace carried status effects with the survivors of a fight.
    pub fn merge_status_effects(&mut self, survivors: Vec<StatusEffectInstance>) {
        self.status_effects = survivors
            .into_iter()
            .filter(|effect| effect.remaining_rounds > 0)
            .collect();
    }

    /// Armor protection of the equipped armor against `kind`.
    pub fn armor_protection(&self, catalog: &Catalog, kind: DamageKind) -> u32 {
        self.equipped
            .armor
            .as_ref()
            .and_then(|id| catalog.item(id.as_str()))
            .map_or(0, |armor| armor.protection.against(kind))
            .min(100)
    }

    /// Total resistance against `kind`: armor plus bonuses, capped at 100.
    pub fn resistance(&self, catalog: &Catalog, kind: DamageKind) -> u32 {
        let bonus = match kind {
            DamageKind::Radiation => self.bonuses.radiation_resistance,
            _ => 0,
        };
        (self.armor_protection(catalog, kind) + bonus).min(100)
    }

    /// Durability of an item, full when never recorded.
    pub fn durability_of(&self, id: &str) -> u32 {
        self.durability.get(id).copied().unwrap_or(FULL_DURABILITY)
    }
}
