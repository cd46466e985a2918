//! Read-only game data: items, mutants, zones and artifacts.
//!
//! A catalog is loaded once from a JSON document and shared by every action.
//! Loading normalises the data so lookups never have to guess later: weapons
//! always carry a class, map keys and record ids agree, and every artifact is
//! also available as an inventory item.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::entities::{ItemId, MutantId, ZoneId};
use crate::error::CatalogError;
use crate::mechanics::{DamageKind, WeaponClass};

/// Mutants without a damage value hit for `10 + rarity * 2`.
pub const DEFAULT_MUTANT_BASE_DAMAGE: u32 = 10;
pub const DEFAULT_MUTANT_ACCURACY: u32 = 65;
pub const DEFAULT_ESCAPE_CHANCE: f64 = 0.5;
pub const DEFAULT_LOOT_CHANCE: f64 = 0.3;
/// Weight of loot whose item is missing from the catalog.
pub const SYNTHESIZED_LOOT_WEIGHT: f64 = 0.5;
pub const DEFAULT_ARTIFACT_VALUE: u32 = 1000;

/// Broad item categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemCategory {
    Weapon,
    Armor,
    Detector,
    Medical,
    Consumable,
    Artifact,
    MutantPart,
    #[serde(other)]
    Misc,
}

/// Armor protection per damage kind, in percent.
///
/// Accepts either a bare number (physical protection) or a map keyed by damage kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(from = "ProtectionRepr")]
pub struct Protection(BTreeMap<DamageKind, u32>);

#[derive(Deserialize)]
#[serde(untagged)]
enum ProtectionRepr {
    Flat(u32),
    ByKind(BTreeMap<DamageKind, u32>),
}

impl From<ProtectionRepr> for Protection {
    fn from(repr: ProtectionRepr) -> Self {
        match repr {
            ProtectionRepr::Flat(value) => Protection::new().with(DamageKind::Physical, value),
            ProtectionRepr::ByKind(map) => Protection(map),
        }
    }
}

impl Protection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set protection against a damage kind.
    pub fn with(mut self, kind: DamageKind, value: u32) -> Self {
        self.0.insert(kind, value);
        self
    }

    /// Protection against `kind`, 0 when unlisted.
    pub fn against(&self, kind: DamageKind) -> u32 {
        self.0.get(&kind).copied().unwrap_or(0)
    }
}

/// An item definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    #[serde(default)]
    pub id: ItemId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category: ItemCategory,
    #[serde(default)]
    pub weight: f64,
    #[serde(default)]
    pub value: u32,
    #[serde(default)]
    pub damage: Option<u32>,
    #[serde(default)]
    pub accuracy: Option<u32>,
    #[serde(default)]
    pub protection: Protection,
    /// Weapon class, resolved from the catalog's free-form `type` field.
    #[serde(rename = "type", default, deserialize_with = "weapon_class_from_name")]
    pub weapon_class: Option<WeaponClass>,
    #[serde(default)]
    pub rarity: Option<u32>,
}

fn weapon_class_from_name<'de, D>(deserializer: D) -> Result<Option<WeaponClass>, D::Error>
where
    D: Deserializer<'de>,
{
    let name: Option<String> = Option::deserialize(deserializer)?;
    Ok(name.map(|n| WeaponClass::from_type_name(&n)))
}

impl Item {
    /// Create a new item with no stats.
    pub fn new(id: impl Into<ItemId>, name: impl Into<String>, category: ItemCategory) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            category,
            weight: 0.0,
            value: 0,
            damage: None,
            accuracy: None,
            protection: Protection::default(),
            weapon_class: None,
            rarity: None,
        }
    }

    /// Create a weapon item.
    pub fn weapon(
        id: impl Into<ItemId>,
        name: impl Into<String>,
        class: WeaponClass,
        damage: u32,
        accuracy: u32,
    ) -> Self {
        let mut item = Self::new(id, name, ItemCategory::Weapon);
        item.weapon_class = Some(class);
        item.damage = Some(damage);
        item.accuracy = Some(accuracy);
        item
    }

    /// Create an armor item.
    pub fn armor(id: impl Into<ItemId>, name: impl Into<String>, protection: Protection) -> Self {
        let mut item = Self::new(id, name, ItemCategory::Armor);
        item.protection = protection;
        item
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_value(mut self, value: u32) -> Self {
        self.value = value;
        self
    }

    pub fn is_weapon(&self) -> bool {
        self.category == ItemCategory::Weapon
    }
}

/// One entry in a mutant's loot table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LootEntry {
    pub item_id: ItemId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub chance: Option<f64>,
    #[serde(default)]
    pub value: Option<u32>,
    #[serde(default)]
    pub weight: Option<f64>,
}

impl LootEntry {
    pub fn drop_chance(&self) -> f64 {
        self.chance.unwrap_or(DEFAULT_LOOT_CHANCE)
    }
}

/// Inclusive ruble reward range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RubleRange {
    pub min: u32,
    pub max: u32,
}

/// A mutant definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MutantDef {
    #[serde(default)]
    pub id: MutantId,
    pub name: String,
    /// Free-form type name; abilities and afflictions key off substrings of it.
    #[serde(rename = "type", default = "generic_mutant_type")]
    pub kind: String,
    pub health: u32,
    #[serde(default)]
    pub damage: Option<u32>,
    #[serde(default)]
    pub accuracy: Option<u32>,
    #[serde(default)]
    pub rarity: u32,
    /// Zone names or ids the mutant roams. `"all"` matches everywhere.
    #[serde(default)]
    pub zones: Vec<String>,
    #[serde(default, alias = "drops")]
    pub loot: Vec<LootEntry>,
    #[serde(default)]
    pub rubles: Option<RubleRange>,
    #[serde(default)]
    pub reputation: Option<u32>,
    #[serde(default)]
    pub escape_chance: Option<f64>,
}

fn generic_mutant_type() -> String {
    "generic".to_string()
}

impl MutantDef {
    /// Create a new mutant definition with defaults for everything optional.
    pub fn new(id: impl Into<MutantId>, name: impl Into<String>, kind: impl Into<String>, health: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: kind.into(),
            health,
            damage: None,
            accuracy: None,
            rarity: 0,
            zones: Vec::new(),
            loot: Vec::new(),
            rubles: None,
            reputation: None,
            escape_chance: None,
        }
    }

    pub fn with_damage(mut self, damage: u32) -> Self {
        self.damage = Some(damage);
        self
    }

    pub fn with_accuracy(mut self, accuracy: u32) -> Self {
        self.accuracy = Some(accuracy);
        self
    }

    pub fn with_rarity(mut self, rarity: u32) -> Self {
        self.rarity = rarity;
        self
    }

    pub fn in_zones(mut self, zones: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.zones = zones.into_iter().map(Into::into).collect();
        self
    }

    pub fn effective_damage(&self) -> u32 {
        self.damage
            .unwrap_or(DEFAULT_MUTANT_BASE_DAMAGE + self.rarity * 2)
    }

    pub fn effective_accuracy(&self) -> u32 {
        self.accuracy.unwrap_or(DEFAULT_MUTANT_ACCURACY)
    }

    pub fn effective_escape_chance(&self) -> f64 {
        self.escape_chance.unwrap_or(DEFAULT_ESCAPE_CHANCE)
    }

    /// Reputation for a kill: explicit value, else `floor(rarity * 2)`.
    pub fn reputation_reward(&self) -> u32 {
        self.reputation.unwrap_or(self.rarity * 2)
    }

    /// Ruble range for a kill, defaulting to `10..=20 + rarity * 10`.
    pub fn ruble_range(&self) -> RubleRange {
        self.rubles.unwrap_or(RubleRange {
            min: 10,
            max: 20 + self.rarity * 10,
        })
    }

    /// The loot table, or a single mutant-part drop when none is listed.
    pub fn loot_table(&self) -> Vec<LootEntry> {
        if !self.loot.is_empty() {
            return self.loot.clone();
        }
        let slug = self.kind.to_lowercase().replace(' ', "_");
        vec![LootEntry {
            item_id: ItemId::new(format!("mutant_part_{slug}")),
            name: Some(format!("{} part", self.name)),
            chance: Some(0.6),
            value: Some(self.rarity * 50),
            weight: None,
        }]
    }

    /// Whether the mutant roams `zone`.
    pub fn roams(&self, zone: &Zone) -> bool {
        self.zones
            .iter()
            .any(|z| z == "all" || z == &zone.name || z == zone.id.as_str())
    }
}

/// A zone of the Zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Zone {
    #[serde(default)]
    pub id: ZoneId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub danger_level: u32,
    #[serde(default)]
    pub anomaly_level: u32,
    /// Terrain type ("forest", "urban", ...), biases anomaly kinds.
    #[serde(rename = "type", default)]
    pub zone_type: String,
    #[serde(default, alias = "adjacentZones")]
    pub connections: Vec<ZoneId>,
}

impl Zone {
    pub fn new(id: impl Into<ZoneId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            danger_level: 0,
            anomaly_level: 0,
            zone_type: String::new(),
            connections: Vec::new(),
        }
    }

    pub fn with_levels(mut self, danger: u32, anomaly: u32) -> Self {
        self.danger_level = danger;
        self.anomaly_level = anomaly;
        self
    }

    pub fn with_type(mut self, zone_type: impl Into<String>) -> Self {
        self.zone_type = zone_type.into();
        self
    }
}

/// An artifact definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactDef {
    #[serde(default)]
    pub id: ItemId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub rarity: u32,
    #[serde(default)]
    pub weight: f64,
    #[serde(default)]
    pub value: Option<u32>,
    /// Zones the artifact forms in. `None` means anywhere.
    #[serde(default)]
    pub zones: Option<Vec<String>>,
    /// Anomaly damage kind that spawns it. `None` means any.
    #[serde(default)]
    pub anomaly_type: Option<DamageKind>,
}

impl ArtifactDef {
    pub fn new(id: impl Into<ItemId>, name: impl Into<String>, rarity: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            rarity,
            weight: 0.0,
            value: None,
            zones: None,
            anomaly_type: None,
        }
    }

    pub fn forms_in(&self, zone: &Zone) -> bool {
        match &self.zones {
            None => true,
            Some(zones) => zones.iter().any(|z| z == &zone.name || z == zone.id.as_str()),
        }
    }

    pub fn spawned_by(&self, kind: DamageKind) -> bool {
        self.anomaly_type.map_or(true, |t| t == kind)
    }

    /// Inventory item for this artifact.
    pub fn to_item(&self) -> Item {
        let mut item = Item::new(self.id.clone(), self.name.clone(), ItemCategory::Artifact)
            .with_weight(self.weight)
            .with_value(self.value.unwrap_or(DEFAULT_ARTIFACT_VALUE));
        item.description = self.description.clone();
        item.rarity = Some(self.rarity);
        item
    }
}

/// The full game data set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    items: BTreeMap<ItemId, Item>,
    #[serde(default)]
    mutants: BTreeMap<MutantId, MutantDef>,
    #[serde(default)]
    zones: BTreeMap<ZoneId, Zone>,
    #[serde(default)]
    artifacts: BTreeMap<ItemId, ArtifactDef>,
}

impl Catalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and normalise a catalog document.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let mut catalog: Catalog = serde_json::from_str(json)?;
        catalog.normalize()?;
        tracing::debug!(
            items = catalog.items.len(),
            mutants = catalog.mutants.len(),
            zones = catalog.zones.len(),
            artifacts = catalog.artifacts.len(),
            "catalog loaded"
        );
        Ok(catalog)
    }

    /// Load a catalog document from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    fn normalize(&mut self) -> Result<(), CatalogError> {
        fill_ids(&mut self.items, |item| &mut item.id)?;
        fill_ids(&mut self.mutants, |mutant| &mut mutant.id)?;
        fill_ids(&mut self.zones, |zone| &mut zone.id)?;
        fill_ids(&mut self.artifacts, |artifact| &mut artifact.id)?;

        for item in self.items.values_mut() {
            if item.is_weapon() && item.weapon_class.is_none() {
                tracing::warn!(item = %item.id, "weapon has no class, treating it as a pistol");
                item.weapon_class = Some(WeaponClass::Pistol);
            }
        }
        for artifact in self.artifacts.values() {
            self.items
                .entry(artifact.id.clone())
                .or_insert_with(|| artifact.to_item());
        }
        Ok(())
    }

    pub fn add_item(&mut self, item: Item) -> Result<(), CatalogError> {
        insert_unique(&mut self.items, item.id.clone(), item)
    }

    pub fn add_mutant(&mut self, mutant: MutantDef) -> Result<(), CatalogError> {
        insert_unique(&mut self.mutants, mutant.id.clone(), mutant)
    }

    pub fn add_zone(&mut self, zone: Zone) -> Result<(), CatalogError> {
        insert_unique(&mut self.zones, zone.id.clone(), zone)
    }

    /// Add an artifact, registering its inventory item alongside.
    pub fn add_artifact(&mut self, artifact: ArtifactDef) -> Result<(), CatalogError> {
        let item = artifact.to_item();
        insert_unique(&mut self.artifacts, artifact.id.clone(), artifact)?;
        self.items.entry(item.id.clone()).or_insert(item);
        Ok(())
    }

    pub fn item(&self, id: &str) -> Option<&Item> {
        self.items.get(id)
    }

    pub fn mutant(&self, id: &str) -> Option<&MutantDef> {
        self.mutants.get(id)
    }

    pub fn zone(&self, id: &str) -> Option<&Zone> {
        self.zones.get(id)
    }

    pub fn artifact(&self, id: &str) -> Option<&ArtifactDef> {
        self.artifacts.get(id)
    }

    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }

    pub fn mutants(&self) -> impl Iterator<Item = &MutantDef> {
        self.mutants.values()
    }

    pub fn zones(&self) -> impl Iterator<Item = &Zone> {
        self.zones.values()
    }

    pub fn artifacts(&self) -> impl Iterator<Item = &ArtifactDef> {
        self.artifacts.values()
    }

    /// Mutants roaming `zone`, in id order.
    pub fn mutants_in_zone(&self, zone: &Zone) -> Vec<&MutantDef> {
        self.mutants.values().filter(|m| m.roams(zone)).collect()
    }

    /// Weight of an item, 0 for unknown ids.
    pub fn item_weight(&self, id: &str) -> f64 {
        self.item(id).map_or(0.0, |item| item.weight)
    }
}

fn fill_ids<K, V>(map: &mut BTreeMap<K, V>, id_of: impl Fn(&mut V) -> &mut K) -> Result<(), CatalogError>
where
    K: Clone + Ord + std::fmt::Display,
{
    for (key, value) in map.iter_mut() {
        let id = id_of(value);
        let current = id.to_string();
        if current.is_empty() {
            *id = key.clone();
        } else if current != key.to_string() {
            return Err(CatalogError::MismatchedId {
                key: key.to_string(),
                id: current,
            });
        }
    }
    Ok(())
}

fn insert_unique<K, V>(map: &mut BTreeMap<K, V>, key: K, value: V) -> Result<(), CatalogError>
where
    K: Ord + std::fmt::Display,
{
    if map.contains_key(&key) {
        return Err(CatalogError::Duplicate(key.to_string()));
    }
    map.insert(key, value);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "items": {
            "pm_pistol": { "name": "PM Pistol", "category": "weapon", "type": "pistol",
                           "damage": 25, "accuracy": 75, "weight": 1.2, "value": 300 },
            "toz_34": { "name": "TOZ-34", "category": "weapon", "damage": 40, "accuracy": 60 },
            "leather_jacket": { "name": "Leather Jacket", "category": "armor", "protection": 10 },
            "seva": { "name": "SEVA Suit", "category": "armor",
                      "protection": { "physical": 30, "thermal": 40, "psychic": 20 } },
            "bread": { "name": "Bread", "category": "food" }
        },
        "mutants": {
            "blind_dog": { "name": "Blind Dog", "type": "dog", "health": 40,
                           "rarity": 1, "zones": ["Cordon"] },
            "bloodsucker": { "name": "Bloodsucker", "type": "bloodsucker", "health": 150,
                             "damage": 25, "rarity": 6, "zones": ["all"],
                             "rubles": { "min": 100, "max": 200 } }
        },
        "zones": {
            "cordon": { "name": "Cordon", "dangerLevel": 2, "anomalyLevel": 1, "type": "forest" }
        },
        "artifacts": {
            "flash": { "name": "Flash", "rarity": 3, "weight": 0.5, "anomalyType": "electric" }
        }
    }"#;

    #[test]
    fn test_load_sample() {
        let catalog = Catalog::from_json_str(SAMPLE).unwrap();
        let pistol = catalog.item("pm_pistol").unwrap();
        assert_eq!(pistol.id.as_str(), "pm_pistol");
        assert_eq!(pistol.weapon_class, Some(WeaponClass::Pistol));
        assert_eq!(catalog.item("bread").unwrap().category, ItemCategory::Misc);
        assert_eq!(catalog.zone("cordon").unwrap().danger_level, 2);
    }

    #[test]
    fn test_weapon_without_class_becomes_pistol() {
        let catalog = Catalog::from_json_str(SAMPLE).unwrap();
        assert_eq!(catalog.item("toz_34").unwrap().weapon_class, Some(WeaponClass::Pistol));
    }

    #[test]
    fn test_protection_shapes() {
        let catalog = Catalog::from_json_str(SAMPLE).unwrap();
        let jacket = &catalog.item("leather_jacket").unwrap().protection;
        assert_eq!(jacket.against(DamageKind::Physical), 10);
        assert_eq!(jacket.against(DamageKind::Thermal), 0);
        let seva = &catalog.item("seva").unwrap().protection;
        assert_eq!(seva.against(DamageKind::Thermal), 40);
    }

    #[test]
    fn test_artifacts_become_items() {
        let catalog = Catalog::from_json_str(SAMPLE).unwrap();
        let flash = catalog.item("flash").unwrap();
        assert_eq!(flash.category, ItemCategory::Artifact);
        assert_eq!(flash.value, DEFAULT_ARTIFACT_VALUE);
        assert_eq!(catalog.artifact("flash").unwrap().anomaly_type, Some(DamageKind::Electric));
    }

    #[test]
    fn test_mutants_in_zone() {
        let catalog = Catalog::from_json_str(SAMPLE).unwrap();
        let cordon = catalog.zone("cordon").unwrap();
        let names: Vec<_> = catalog.mutants_in_zone(cordon).iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Blind Dog", "Bloodsucker"]);
    }

    #[test]
    fn test_mutant_defaults() {
        let catalog = Catalog::from_json_str(SAMPLE).unwrap();
        let dog = catalog.mutant("blind_dog").unwrap();
        assert_eq!(dog.effective_damage(), 12);
        assert_eq!(dog.effective_accuracy(), 65);
        assert_eq!(dog.reputation_reward(), 2);
        assert_eq!(dog.ruble_range(), RubleRange { min: 10, max: 30 });

        let loot = dog.loot_table();
        assert_eq!(loot.len(), 1);
        assert_eq!(loot[0].item_id.as_str(), "mutant_part_dog");
        assert_eq!(loot[0].chance, Some(0.6));
        assert_eq!(loot[0].value, Some(50));

        let bloodsucker = catalog.mutant("bloodsucker").unwrap();
        assert_eq!(bloodsucker.ruble_range(), RubleRange { min: 100, max: 200 });
    }

    #[test]
    fn test_mismatched_id_is_rejected() {
        let json = r#"{ "zones": { "cordon": { "id": "garbage", "name": "Cordon" } } }"#;
        let err = Catalog::from_json_str(json).unwrap_err();
        assert!(matches!(err, CatalogError::MismatchedId { .. }));
    }

    #[test]
    fn test_duplicate_insert() {
        let mut catalog = Catalog::new();
        catalog.add_zone(Zone::new("cordon", "Cordon")).unwrap();
        let err = catalog.add_zone(Zone::new("cordon", "Cordon")).unwrap_err();
        assert!(matches!(err, CatalogError::Duplicate(id) if id == "cordon"));
    }

    #[test]
    fn test_unknown_lookup_is_none() {
        let catalog = Catalog::new();
        assert!(catalog.item("nothing").is_none());
        assert_eq!(catalog.item_weight("nothing"), 0.0);
    }
}
