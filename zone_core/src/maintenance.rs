//! Gear repair at a technician.

use zone_rules::{Catalog, EquipmentSlot, ItemId, Player, FULL_DURABILITY};

use crate::error::Rejection;

pub const MIN_REPAIR_COST: u32 = 25;
/// Share of an item's value charged per point of lost durability.
pub const REPAIR_RATE: f64 = 0.01;

/// Rubles to restore an item worth `value` from `durability` to full.
pub fn repair_cost(value: u32, durability: u32) -> u32 {
    let missing = FULL_DURABILITY.saturating_sub(durability);
    let cost = (f64::from(value) * REPAIR_RATE * f64::from(missing)).round() as u32;
    cost.max(MIN_REPAIR_COST)
}

fn repair_target(player: &Player, slot: EquipmentSlot) -> Result<ItemId, Rejection> {
    let equipped = &player.equipped;
    let id = match slot {
        EquipmentSlot::Weapon => equipped.weapon.clone(),
        EquipmentSlot::Armor => equipped.armor.clone(),
        EquipmentSlot::Artifact => {
            if equipped.artifacts.is_empty() {
                None
            } else {
                let worn = equipped
                    .artifacts
                    .iter()
                    .find(|id| player.durability_of(id.as_str()) < FULL_DURABILITY);
                Some(worn.unwrap_or(&equipped.artifacts[0]).clone())
            }
        }
    };
    id.ok_or(Rejection::NothingToRepair)
}

/// Repair the gear in `slot`, returning the rubles paid.
///
/// For the artifact belt the first worn artifact is repaired.
pub fn repair(player: &mut Player, slot: EquipmentSlot, catalog: &Catalog) -> Result<u32, Rejection> {
    let id = repair_target(player, slot)?;
    let durability = player.durability_of(id.as_str());
    if durability >= FULL_DURABILITY {
        return Err(Rejection::AlreadyRepaired);
    }
    let item = catalog
        .item(id.as_str())
        .ok_or_else(|| Rejection::UnknownItem { id: id.clone() })?;
    let cost = repair_cost(item.value, durability);
    if player.rubles < cost {
        return Err(Rejection::InsufficientFunds {
            needed: cost,
            available: player.rubles,
        });
    }

    player.rubles -= cost;
    player.durability.insert(id.clone(), FULL_DURABILITY);
    tracing::info!(player = %player.id, item = %id, cost, "gear repaired");
    Ok(cost)
}

#[cfg(test)]
mod tests {
    use super::*;
    use zone_rules::{GameConfig, Item, WeaponClass};

    fn catalog() -> Catalog {
        let mut catalog = Catalog::new();
        catalog
            .add_item(Item::weapon("ak74", "AK-74", WeaponClass::Rifle, 35, 70).with_value(1000))
            .unwrap();
        catalog
    }

    #[test]
    fn test_repair_cost() {
        assert_eq!(repair_cost(1000, 60), 400);
        assert_eq!(repair_cost(1000, 99), 25);
        assert_eq!(repair_cost(150, 50), 75);
        assert_eq!(repair_cost(0, 0), MIN_REPAIR_COST);
    }

    #[test]
    fn test_repair_weapon() {
        let catalog = catalog();
        let mut player = Player::new("1", "Strelok", &GameConfig::default());
        player.equipped.weapon = Some("ak74".into());
        player.durability.insert("ak74".into(), 60);
        assert_eq!(repair(&mut player, EquipmentSlot::Weapon, &catalog), Ok(400));
        assert_eq!(player.rubles, 100);
        assert_eq!(player.durability_of("ak74"), FULL_DURABILITY);
        assert_eq!(
            repair(&mut player, EquipmentSlot::Weapon, &catalog),
            Err(Rejection::AlreadyRepaired)
        );
    }

    #[test]
    fn test_repair_rejections_leave_player_alone() {
        let catalog = catalog();
        let mut player = Player::new("1", "Strelok", &GameConfig::default());
        assert_eq!(
            repair(&mut player, EquipmentSlot::Armor, &catalog),
            Err(Rejection::NothingToRepair)
        );
        assert_eq!(
            repair(&mut player, EquipmentSlot::Artifact, &catalog),
            Err(Rejection::NothingToRepair)
        );

        player.equipped.weapon = Some("ak74".into());
        player.durability.insert("ak74".into(), 10);
        player.rubles = 300;
        let before = player.clone();
        assert_eq!(
            repair(&mut player, EquipmentSlot::Weapon, &catalog),
            Err(Rejection::InsufficientFunds {
                needed: 900,
                available: 300
            })
        );
        assert_eq!(player, before);
    }
}
