//! Pending duel challenges and duel resolution.
//!
//! The [`DuelRegistry`] is an owned service, not a global: the host creates
//! one and passes it to whatever handles duel commands. Challenges expire on
//! two paths that agree on the same `expires_at`: any registry call drops
//! challenges with `now >= expires_at`, and [`schedule_expiry`] removes the
//! challenge with a matching id once the timer fires.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use uuid::Uuid;

use zone_rules::{Catalog, Clock, GameConfig, Player, PlayerId, RandomSource};

use crate::combat::{simulate_pvp_combat, Duelist, PvpResult, WeaponProfile};
use crate::error::Rejection;

/// Reputation for winning a duel.
pub const DUEL_REPUTATION: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChallengeId(pub Uuid);

impl ChallengeId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ChallengeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ChallengeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A duel invitation waiting for an answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Challenge {
    pub id: ChallengeId,
    pub challenger: PlayerId,
    pub challenger_name: String,
    pub target: PlayerId,
    pub target_name: String,
    pub created_at: i64,
    pub expires_at: i64,
}

impl Challenge {
    pub fn is_expired(&self, now: i64) -> bool {
        now >= self.expires_at
    }

    fn involves(&self, player: &PlayerId) -> bool {
        &self.challenger == player || &self.target == player
    }
}

/// Pending challenges, keyed by challenger.
#[derive(Debug)]
pub struct DuelRegistry {
    expiry_millis: i64,
    pending: Mutex<HashMap<PlayerId, Challenge>>,
}

impl DuelRegistry {
    pub fn new(expiry: Duration) -> Self {
        Self {
            expiry_millis: i64::try_from(expiry.as_millis()).unwrap_or(i64::MAX),
            pending: Mutex::new(HashMap::new()),
        }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(Duration::from_secs(config.duel_expiry_secs))
    }

    /// Lock the table and drop anything that has run out.
    fn live(&self, now: i64) -> MutexGuard<'_, HashMap<PlayerId, Challenge>> {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        pending.retain(|_, challenge| {
            let keep = !challenge.is_expired(now);
            if !keep {
                tracing::warn!(
                    challenger = %challenge.challenger,
                    target = %challenge.target,
                    "dropping expired duel challenge"
                );
            }
            keep
        });
        pending
    }

    /// Issue a challenge from `challenger` to `target`.
    pub fn challenge(&self, challenger: &Player, target: &Player, now: i64) -> Result<Challenge, Rejection> {
        if challenger.id == target.id {
            return Err(Rejection::SelfChallenge);
        }
        if challenger.equipped.weapon.is_none() {
            return Err(Rejection::NoWeapon);
        }
        if target.equipped.weapon.is_none() {
            return Err(Rejection::TargetUnarmed {
                name: target.name.clone(),
            });
        }

        let mut pending = self.live(now);
        if pending.values().any(|c| c.involves(&challenger.id)) {
            return Err(Rejection::ChallengePending);
        }
        if pending.values().any(|c| c.involves(&target.id)) {
            return Err(Rejection::TargetBusy {
                name: target.name.clone(),
            });
        }

        let challenge = Challenge {
            id: ChallengeId::new(),
            challenger: challenger.id.clone(),
            challenger_name: challenger.name.clone(),
            target: target.id.clone(),
            target_name: target.name.clone(),
            created_at: now,
            expires_at: now + self.expiry_millis,
        };
        pending.insert(challenger.id.clone(), challenge.clone());
        tracing::info!(challenger = %challenger.id, target = %target.id, id = %challenge.id, "duel challenge issued");
        Ok(challenge)
    }

    fn take_for_target(&self, target: &PlayerId, now: i64) -> Result<Challenge, Rejection> {
        let mut pending = self.live(now);
        let challenger = pending
            .values()
            .find(|c| &c.target == target)
            .map(|c| c.challenger.clone())
            .ok_or(Rejection::NoChallenge)?;
        pending.remove(&challenger).ok_or(Rejection::NoChallenge)
    }

    /// The target takes the challenge up. The caller runs [`resolve_duel`].
    pub fn accept(&self, target: &PlayerId, now: i64) -> Result<Challenge, Rejection> {
        let challenge = self.take_for_target(target, now)?;
        tracing::info!(challenger = %challenge.challenger, target = %target, "duel accepted");
        Ok(challenge)
    }

    pub fn decline(&self, target: &PlayerId, now: i64) -> Result<Challenge, Rejection> {
        let challenge = self.take_for_target(target, now)?;
        tracing::info!(challenger = %challenge.challenger, target = %target, "duel declined");
        Ok(challenge)
    }

    /// Withdraw the challenger's own pending challenge.
    pub fn cancel(&self, challenger: &PlayerId, now: i64) -> Result<Challenge, Rejection> {
        self.live(now).remove(challenger).ok_or(Rejection::NoChallenge)
    }

    /// Timer path: remove the challenge only if it is still the one with `id`.
    pub fn expire(&self, challenger: &PlayerId, id: ChallengeId) -> bool {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        match pending.get(challenger) {
            Some(challenge) if challenge.id == id => {
                pending.remove(challenger);
                tracing::info!(challenger = %challenger, %id, "duel challenge expired");
                true
            }
            _ => false,
        }
    }

    /// The live challenge `player` is part of, on either side.
    pub fn pending_for(&self, player: &PlayerId, now: i64) -> Option<Challenge> {
        self.live(now).values().find(|c| c.involves(player)).cloned()
    }

    pub fn len(&self, now: i64) -> usize {
        self.live(now).len()
    }

    pub fn is_empty(&self, now: i64) -> bool {
        self.len(now) == 0
    }
}

/// Spawn a task that expires `challenge` at its `expires_at`.
///
/// Resolves to whether the timer removed it; `false` means it was already
/// answered, cancelled or dropped.
pub fn schedule_expiry(registry: Arc<DuelRegistry>, challenge: &Challenge, clock: Arc<dyn Clock>) -> JoinHandle<bool> {
    let challenger = challenge.challenger.clone();
    let id = challenge.id;
    let expires_at = challenge.expires_at;
    tokio::spawn(async move {
        let wait = u64::try_from(expires_at - clock.now_millis()).unwrap_or(0);
        tokio::time::sleep(Duration::from_millis(wait)).await;
        registry.expire(&challenger, id)
    })
}

/// Outcome of a duel once it has been written back to both stalkers.
#[derive(Debug, Clone, PartialEq)]
pub struct DuelOutcome {
    pub result: PvpResult,
    pub winner: PlayerId,
    pub loser: PlayerId,
    pub promoted_to: Option<u32>,
}

/// Fight an accepted duel and persist health and reputation on both players.
pub fn resolve_duel(
    challenger: &mut Player,
    target: &mut Player,
    catalog: &Catalog,
    rng: &mut dyn RandomSource,
) -> Result<DuelOutcome, Rejection> {
    let challenger_weapon = challenger
        .equipped
        .weapon
        .as_ref()
        .ok_or(Rejection::NoWeapon)
        .and_then(|id| WeaponProfile::lookup(catalog, id))?;
    let target_weapon = target
        .equipped
        .weapon
        .as_ref()
        .ok_or_else(|| Rejection::TargetUnarmed {
            name: target.name.clone(),
        })
        .and_then(|id| WeaponProfile::lookup(catalog, id))?;

    let mut challenger_side = Duelist::from_player(challenger, catalog);
    let mut target_side = Duelist::from_player(target, catalog);
    let result = simulate_pvp_combat(
        &mut challenger_side,
        &mut target_side,
        Some(&challenger_weapon),
        Some(&target_weapon),
        rng,
    );
    challenger.health = challenger_side.health;
    target.health = target_side.health;

    let (winner, loser) = if result.victory {
        (challenger, target)
    } else {
        (target, challenger)
    };
    let promoted_to = winner.add_reputation(DUEL_REPUTATION);
    tracing::info!(winner = %winner.id, loser = %loser.id, rounds = result.rounds, "duel resolved");

    Ok(DuelOutcome {
        result,
        winner: winner.id.clone(),
        loser: loser.id.clone(),
        promoted_to,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use zone_rules::{FixedRandom, Item, ManualClock, WeaponClass};

    const MINUTE: i64 = 60_000;

    fn stalker(id: &str, name: &str, weapon: Option<&str>) -> Player {
        let mut player = Player::new(id, name, &GameConfig::default());
        player.equipped.weapon = weapon.map(Into::into);
        player
    }

    fn registry() -> DuelRegistry {
        DuelRegistry::from_config(&GameConfig::default())
    }

    #[test]
    fn test_challenge_preconditions() {
        let registry = registry();
        let strelok = stalker("1", "Strelok", Some("pm"));
        let ghost = stalker("2", "Ghost", Some("ak"));
        let fang = stalker("3", "Fang", None);

        assert_eq!(registry.challenge(&strelok, &strelok, 0).unwrap_err(), Rejection::SelfChallenge);
        assert_eq!(
            registry.challenge(&strelok, &fang, 0).unwrap_err(),
            Rejection::TargetUnarmed { name: "Fang".into() }
        );
        assert_eq!(registry.challenge(&fang, &strelok, 0).unwrap_err(), Rejection::NoWeapon);

        let challenge = registry.challenge(&strelok, &ghost, 0).unwrap();
        assert_eq!(challenge.expires_at, MINUTE);
        assert_eq!(
            registry.challenge(&strelok, &ghost, 1).unwrap_err(),
            Rejection::ChallengePending
        );
        let doc = stalker("4", "Doc", Some("pm"));
        assert_eq!(
            registry.challenge(&doc, &ghost, 1).unwrap_err(),
            Rejection::TargetBusy { name: "Ghost".into() }
        );
    }

    #[test]
    fn test_accept_and_decline() {
        let registry = registry();
        let strelok = stalker("1", "Strelok", Some("pm"));
        let ghost = stalker("2", "Ghost", Some("ak"));
        registry.challenge(&strelok, &ghost, 0).unwrap();
        assert_eq!(registry.accept(&strelok.id, 10).unwrap_err(), Rejection::NoChallenge);
        let accepted = registry.accept(&ghost.id, 10).unwrap();
        assert_eq!(accepted.challenger, strelok.id);
        assert!(registry.is_empty(10));

        registry.challenge(&strelok, &ghost, 20).unwrap();
        registry.decline(&ghost.id, 30).unwrap();
        assert_eq!(registry.decline(&ghost.id, 30).unwrap_err(), Rejection::NoChallenge);
    }

    #[test]
    fn test_opportunistic_expiry() {
        let registry = registry();
        let strelok = stalker("1", "Strelok", Some("pm"));
        let ghost = stalker("2", "Ghost", Some("ak"));
        registry.challenge(&strelok, &ghost, 0).unwrap();
        assert!(registry.pending_for(&ghost.id, MINUTE - 1).is_some());
        assert_eq!(registry.accept(&ghost.id, MINUTE).unwrap_err(), Rejection::NoChallenge);
        // The slot is free again.
        registry.challenge(&strelok, &ghost, MINUTE).unwrap();
    }

    #[test]
    fn test_expire_checks_id() {
        let registry = registry();
        let strelok = stalker("1", "Strelok", Some("pm"));
        let ghost = stalker("2", "Ghost", Some("ak"));
        let first = registry.challenge(&strelok, &ghost, 0).unwrap();
        registry.cancel(&strelok.id, 1).unwrap();
        let second = registry.challenge(&strelok, &ghost, 2).unwrap();
        assert!(!registry.expire(&strelok.id, first.id));
        assert_eq!(registry.pending_for(&strelok.id, 3), Some(second.clone()));
        assert!(registry.expire(&strelok.id, second.id));
        assert!(registry.is_empty(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_scheduled_expiry() {
        let registry = Arc::new(registry());
        let clock = Arc::new(ManualClock::new(0));
        let strelok = stalker("1", "Strelok", Some("pm"));
        let ghost = stalker("2", "Ghost", Some("ak"));
        let challenge = registry.challenge(&strelok, &ghost, clock.now_millis()).unwrap();
        let handle = schedule_expiry(registry.clone(), &challenge, clock.clone());
        assert!(handle.await.unwrap());
        assert!(registry.is_empty(0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_scheduled_expiry_after_accept_is_noop() {
        let registry = Arc::new(registry());
        let clock = Arc::new(ManualClock::new(0));
        let strelok = stalker("1", "Strelok", Some("pm"));
        let ghost = stalker("2", "Ghost", Some("ak"));
        let challenge = registry.challenge(&strelok, &ghost, 0).unwrap();
        let handle = schedule_expiry(registry.clone(), &challenge, clock.clone());
        registry.accept(&ghost.id, 5_000).unwrap();
        assert!(!handle.await.unwrap());
    }

    #[test]
    fn test_resolve_duel_persists_both_sides() {
        let mut catalog = Catalog::new();
        catalog
            .add_item(Item::weapon("pm", "PM Pistol", WeaponClass::Pistol, 20, 70).with_weight(1.0))
            .unwrap();
        let mut strelok = stalker("1", "Strelok", Some("pm"));
        let mut ghost = stalker("2", "Ghost", Some("pm"));
        ghost.health = 90;
        strelok.reputation = 98;

        // Everyone misses; the healthier challenger wins on time.
        let mut rng = FixedRandom::new(0.99);
        let outcome = resolve_duel(&mut strelok, &mut ghost, &catalog, &mut rng).unwrap();
        assert_eq!(outcome.winner, strelok.id);
        assert_eq!(outcome.promoted_to, Some(2));
        assert_eq!(strelok.reputation, 103);
        assert_eq!(ghost.reputation, 0);
        assert_eq!(ghost.health, 90);
    }

    #[test]
    fn test_resolve_duel_unknown_weapon() {
        let catalog = Catalog::new();
        let mut strelok = stalker("1", "Strelok", Some("pm"));
        let mut ghost = stalker("2", "Ghost", Some("pm"));
        let mut rng = FixedRandom::new(0.5);
        let err = resolve_duel(&mut strelok, &mut ghost, &catalog, &mut rng).unwrap_err();
        assert_eq!(err, Rejection::UnknownItem { id: "pm".into() });
    }
}
