//! Anomaly fields: scan for one with a detector, then step in for artifacts.

use serde::{Deserialize, Serialize};

use zone_rules::{
    ActionKind, ActionOutcome, ActiveAnomaly, AnomalyKind, ArtifactDef, Catalog, GameConfig, ItemCategory, ItemId,
    Player, RandomSource, Zone,
};

use crate::cooldown::{check_ready, start_cooldown};
use crate::encounter::select_anomaly_kind;
use crate::error::Rejection;

/// How long a located anomaly stays put.
pub const ANOMALY_LIFETIME_MILLIS: i64 = 30 * 60_000;
pub const BASE_FIND_CHANCE: f64 = 0.4;
pub const FIND_CHANCE_PER_LEVEL: f64 = 0.05;
pub const ARTIFACT_BONUS_PER_LEVEL: f64 = 0.03;
pub const MAX_ARTIFACT_RARITY: u32 = 9;
/// Health an anomaly always leaves a stalker with.
pub const ANOMALY_HEALTH_FLOOR: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum ScanOutcome {
    Found { kind: AnomalyKind, expires_at: i64 },
    Nothing,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum ArtifactFind {
    Found { id: ItemId, name: String },
    /// Found, but there was no room to carry it.
    Lost { name: String },
    Nothing,
}

/// What walking into an anomaly did.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnterOutcome {
    pub kind: AnomalyKind,
    pub damage_taken: u32,
    pub final_health: u32,
    pub artifact: ArtifactFind,
}

impl EnterOutcome {
    pub fn summary(&self) -> String {
        let mut line = format!(
            "You push through the {} and take {} damage.",
            self.kind.name(),
            self.damage_taken
        );
        match &self.artifact {
            ArtifactFind::Found { name, .. } => line.push_str(&format!(" You found a {name}!")),
            ArtifactFind::Lost { name } => {
                line.push_str(&format!(" You spot a {name}, but your pack is too heavy to take it."))
            }
            ArtifactFind::Nothing => line.push_str(" There was nothing to find."),
        }
        line
    }
}

/// Chance a scan locates an anomaly in `zone`.
pub fn find_chance(zone: &Zone) -> f64 {
    BASE_FIND_CHANCE + FIND_CHANCE_PER_LEVEL * f64::from(zone.anomaly_level)
}

/// Artifacts the anomaly in `zone` can yield.
pub fn artifact_candidates<'a>(catalog: &'a Catalog, zone: &Zone, kind: AnomalyKind) -> Vec<&'a ArtifactDef> {
    let max_rarity = (zone.anomaly_level + 2).min(MAX_ARTIFACT_RARITY);
    catalog
        .artifacts()
        .filter(|a| a.forms_in(zone) && a.spawned_by(kind.damage_kind()) && a.rarity <= max_rarity)
        .collect()
}

/// Sweep `zone` with a detector.
pub fn scan(
    player: &mut Player,
    zone: &Zone,
    catalog: &Catalog,
    config: &GameConfig,
    now: i64,
    rng: &mut dyn RandomSource,
) -> Result<ScanOutcome, Rejection> {
    if zone.anomaly_level == 0 {
        return Err(Rejection::NoAnomalies {
            zone: zone.name.clone(),
        });
    }
    if !player.has_item_in_category(catalog, ItemCategory::Detector) {
        return Err(Rejection::NoDetector);
    }
    check_ready(player, ActionKind::AnomalyScan, now)?;

    if !rng.chance(find_chance(zone)) {
        start_cooldown(player, ActionKind::AnomalyScan, ActionOutcome::Nothing, now, config);
        return Ok(ScanOutcome::Nothing);
    }

    let kind = select_anomaly_kind(zone, rng);
    let expires_at = now + ANOMALY_LIFETIME_MILLIS;
    player.active_anomaly = Some(ActiveAnomaly {
        kind,
        detected_at: now,
        expires_at,
    });
    start_cooldown(player, ActionKind::AnomalyScan, ActionOutcome::Completed, now, config);
    tracing::info!(player = %player.id, zone = %zone.id, anomaly = %kind, "anomaly located");
    Ok(ScanOutcome::Found { kind, expires_at })
}

/// Step into the located anomaly.
///
/// `weather_modifier` scales the raw damage (see
/// [`zone_rules::WeatherEffect::AnomalyDamage`]).
pub fn enter(
    player: &mut Player,
    zone: &Zone,
    catalog: &Catalog,
    config: &GameConfig,
    weather_modifier: f64,
    now: i64,
    rng: &mut dyn RandomSource,
) -> Result<EnterOutcome, Rejection> {
    let anomaly = player.active_anomaly.ok_or(Rejection::NoActiveAnomaly)?;
    if anomaly.is_expired(now) {
        return Err(Rejection::AnomalyShifted);
    }
    check_ready(player, ActionKind::AnomalyEnter, now)?;

    let kind = anomaly.kind;
    let profile = kind.profile();
    let raw = rng.roll_inclusive(profile.damage.0, profile.damage.1);
    let weathered = (f64::from(raw) * weather_modifier).round();
    let protection = player.armor_protection(catalog, kind.damage_kind());
    let damage = (weathered * (1.0 - f64::from(protection) / 100.0)).round().max(0.0) as u32;

    let before = player.health;
    player.health = player.health.saturating_sub(damage).max(1).max(ANOMALY_HEALTH_FLOOR);
    let damage_taken = before.saturating_sub(player.health);

    let chance = profile.artifact_chance * (1.0 + ARTIFACT_BONUS_PER_LEVEL * f64::from(zone.anomaly_level));
    let artifact = if rng.chance(chance) {
        let candidates = artifact_candidates(catalog, zone, kind);
        match candidates.get(rng.pick_index(candidates.len())) {
            None => ArtifactFind::Nothing,
            Some(found) if !player.can_carry(found.weight, config.max_inventory_weight) => ArtifactFind::Lost {
                name: found.name.clone(),
            },
            Some(found) => {
                player.inventory.push(found.id.clone());
                player.recompute_inventory_weight(catalog);
                ArtifactFind::Found {
                    id: found.id.clone(),
                    name: found.name.clone(),
                }
            }
        }
    } else {
        ArtifactFind::Nothing
    };

    player.active_anomaly = None;
    start_cooldown(player, ActionKind::AnomalyEnter, ActionOutcome::Completed, now, config);
    tracing::info!(
        player = %player.id,
        anomaly = %kind,
        damage_taken,
        artifact = ?artifact,
        "entered anomaly"
    );

    Ok(EnterOutcome {
        kind,
        damage_taken,
        final_health: player.health,
        artifact,
    })
}

/// Walk away from the located anomaly.
pub fn avoid(player: &mut Player) -> Result<AnomalyKind, Rejection> {
    let anomaly = player.active_anomaly.take().ok_or(Rejection::NoActiveAnomaly)?;
    Ok(anomaly.kind)
}
