//! End-to-end flows against the in-memory store.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use zone_core::{
    await_encounter_choice, begin_hunt, resolve_duel, resolve_encounter, schedule_expiry, DuelRegistry,
    EncounterChoice, HuntOutcome, HuntStart, MemoryPlayerStore, PlayerStore, Rejection,
};
use zone_rules::{ActionKind, Catalog, Clock, FixedRandom, GameConfig, ManualClock, PlayerId};

const CATALOG: &str = include_str!("fixtures/catalog.json");

fn setup() -> (Arc<Catalog>, GameConfig, MemoryPlayerStore) {
    let catalog = Arc::new(Catalog::from_json_str(CATALOG).unwrap());
    let config = GameConfig::default();
    let store = MemoryPlayerStore::new(config.clone(), catalog.clone());
    (catalog, config, store)
}

#[tokio::test(start_paused = true)]
async fn test_hunt_with_timeout_fights_surprised() {
    let (catalog, config, store) = setup();
    let id = PlayerId::from("1");
    store.create(&id, "Strelok").unwrap();
    store.update(&id, |p| p.equipped.weapon = Some("pm_pistol".into())).unwrap();

    let mut rng = FixedRandom::new(0.5);
    let start = store
        .update(&id, |p| begin_hunt(p, &catalog, &config, 0, false, &mut rng))
        .unwrap()
        .unwrap();
    let HuntStart::Encounter(encounter) = start else {
        panic!("the flesh roams the village");
    };

    let (_tx, mut rx) = mpsc::channel::<String>(4);
    let window = Duration::from_secs(config.response_window_secs);
    let choice = await_encounter_choice(&mut rx, window).await;
    assert_eq!(choice, EncounterChoice::Timeout);

    let outcome = store
        .update(&id, |p| resolve_encounter(p, &encounter, choice, &catalog, &config, 0, &mut rng))
        .unwrap()
        .unwrap();
    let HuntOutcome::Fought { applied, surprised } = outcome else {
        panic!("a timeout always fights");
    };
    assert!(surprised);
    // 25 * 0.75 = 18 per hit.
    assert!(applied
        .result
        .events
        .iter()
        .filter(|e| e.is_hit() && e.actor == zone_core::Actor::Player)
        .all(|e| e.amount() == Some(18)));

    let player = store.get(&id).unwrap().unwrap();
    assert_eq!(player.health, applied.result.final_health);
    assert!(player.cooldowns.ready_at(ActionKind::Hunt).is_some());
    assert_eq!(player.inventory_weight, player.carried_weight(&catalog));
}

#[tokio::test(start_paused = true)]
async fn test_hunt_again_is_on_cooldown() {
    let (catalog, config, store) = setup();
    let id = PlayerId::from("1");
    store.create(&id, "Strelok").unwrap();
    store.update(&id, |p| p.equipped.weapon = Some("pm_pistol".into())).unwrap();

    let mut rng = FixedRandom::new(0.5);
    let HuntStart::Encounter(encounter) = store
        .update(&id, |p| begin_hunt(p, &catalog, &config, 0, false, &mut rng))
        .unwrap()
        .unwrap()
    else {
        panic!("expected an encounter");
    };

    let (tx, mut rx) = mpsc::channel(4);
    tx.send("FIGHT!".to_string()).await.unwrap();
    let choice = await_encounter_choice(&mut rx, Duration::from_secs(20)).await;
    store
        .update(&id, |p| resolve_encounter(p, &encounter, choice, &catalog, &config, 0, &mut rng))
        .unwrap()
        .unwrap();

    let before = store.get(&id).unwrap();
    let again = store
        .update(&id, |p| begin_hunt(p, &catalog, &config, 60_000, false, &mut rng))
        .unwrap();
    assert_eq!(
        again,
        Err(Rejection::Cooldown {
            action: ActionKind::Hunt,
            minutes: 7
        })
    );
    assert_eq!(store.get(&id).unwrap(), before);
}

#[tokio::test(start_paused = true)]
async fn test_duel_challenge_expires_or_resolves() {
    let (catalog, config, store) = setup();
    let strelok = PlayerId::from("1");
    let ghost = PlayerId::from("2");
    for (id, name) in [(&strelok, "Strelok"), (&ghost, "Ghost")] {
        store.create(id, name).unwrap();
        store.update(id, |p| p.equipped.weapon = Some("pm_pistol".into())).unwrap();
    }

    let registry = Arc::new(DuelRegistry::from_config(&config));
    let clock = Arc::new(ManualClock::new(0));

    // Nobody answers: the timer removes the challenge.
    let challenger = store.get(&strelok).unwrap().unwrap();
    let target = store.get(&ghost).unwrap().unwrap();
    let challenge = registry.challenge(&challenger, &target, clock.now_millis()).unwrap();
    let timer = schedule_expiry(registry.clone(), &challenge, clock.clone());
    assert!(timer.await.unwrap());
    clock.advance(60_000);
    assert_eq!(registry.accept(&ghost, clock.now_millis()), Err(Rejection::NoChallenge));

    // Second attempt is accepted and fought out.
    let challenge = registry.challenge(&challenger, &target, clock.now_millis()).unwrap();
    let timer = schedule_expiry(registry.clone(), &challenge, clock.clone());
    let accepted = registry.accept(&ghost, clock.now_millis() + 1_000).unwrap();
    assert_eq!(accepted.id, challenge.id);

    let mut a = store.get(&accepted.challenger).unwrap().unwrap();
    let mut b = store.get(&accepted.target).unwrap().unwrap();
    let mut rng = FixedRandom::new(0.99);
    let outcome = resolve_duel(&mut a, &mut b, &catalog, &mut rng).unwrap();
    store.save(&a).unwrap();
    store.save(&b).unwrap();

    let winner = store.get(&outcome.winner).unwrap().unwrap();
    assert_eq!(winner.reputation, 5);
    assert!(!timer.await.unwrap());
}
