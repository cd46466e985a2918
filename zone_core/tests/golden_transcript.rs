//! The fixed-0.5 fight, checked line by line against a stored transcript.

use zone_core::{simulate_combat, MutantProfile, PlayerSnapshot, WeaponProfile};
use zone_rules::{Catalog, FixedRandom, GameConfig, Player};

const CATALOG: &str = include_str!("fixtures/catalog.json");
const EXPECTED: &str = include_str!("fixtures/pve_fixed_half.txt");

fn fixed_half_fight() -> zone_core::CombatResult {
    let catalog = Catalog::from_json_str(CATALOG).unwrap();
    let config = GameConfig::default();
    let player = Player::new("1", "Strelok", &config);
    let snapshot = PlayerSnapshot::capture(&player, &catalog, &config);
    let mutant = MutantProfile::from_def(catalog.mutant("flesh").unwrap(), &catalog);
    let weapon = WeaponProfile::lookup(&catalog, &"pm_pistol".into()).unwrap();
    let mut rng = FixedRandom::new(0.5);
    simulate_combat(&snapshot, &mutant, Some(&weapon), &mut rng)
}

#[test]
fn test_fixed_half_transcript_matches_fixture() {
    let result = fixed_half_fight();
    let expected: Vec<&str> = EXPECTED.lines().collect();
    assert_eq!(result.transcript, expected);
}

#[test]
fn test_fixed_half_numbers() {
    let result = fixed_half_fight();
    assert!(result.victory);
    assert_eq!(result.rounds, 4);
    assert_eq!(result.damage_dealt, 100);
    assert_eq!(result.damage_taken, 0);
    assert_eq!(result.final_health, 100);
    assert_eq!(result.reputation_gained, 6);
    assert_eq!(result.ruble_reward, 30);
}

#[test]
fn test_transcript_is_rendered_from_events() {
    let result = fixed_half_fight();
    assert_eq!(result.transcript.len(), result.events.len());
    let hits: Vec<u32> = result
        .events
        .iter()
        .filter(|e| e.is_hit())
        .filter_map(|e| e.amount())
        .collect();
    assert_eq!(hits, vec![25, 25, 25, 25]);

    let json = serde_json::to_value(&result.events[3]).unwrap();
    assert_eq!(json["kind"], "hit");
    assert_eq!(json["actor"], "player");
    assert_eq!(json["damage"], 25);
}
