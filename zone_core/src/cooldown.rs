//! Cooldown gate shared by every timed action.

use zone_rules::{ActionKind, ActionOutcome, GameConfig, Player};

use crate::error::Rejection;

const MILLIS_PER_MINUTE: i64 = 60_000;

/// Whether `action` is allowed at `now`.
pub fn is_ready(player: &Player, action: ActionKind, now: i64) -> bool {
    player
        .cooldowns
        .ready_at(action)
        .map_or(true, |ready_at| now >= ready_at)
}

/// Lock `action` until `now + duration_millis`.
pub fn set_cooldown(player: &mut Player, action: ActionKind, now: i64, duration_millis: i64) {
    player.cooldowns.set_ready_at(action, now + duration_millis);
}

/// Whole minutes left before `action` is allowed, rounded up.
pub fn remaining_minutes(player: &Player, action: ActionKind, now: i64) -> u64 {
    match player.cooldowns.ready_at(action) {
        Some(ready_at) if ready_at > now => {
            let millis = ready_at - now;
            ((millis + MILLIS_PER_MINUTE - 1) / MILLIS_PER_MINUTE) as u64
        }
        _ => 0,
    }
}

/// Reject with the remaining wait when `action` is still cooling down.
pub fn check_ready(player: &Player, action: ActionKind, now: i64) -> Result<(), Rejection> {
    if is_ready(player, action, now) {
        Ok(())
    } else {
        Err(Rejection::Cooldown {
            action,
            minutes: remaining_minutes(player, action, now),
        })
    }
}

/// Start the configured cooldown for `action` after `outcome`.
pub fn start_cooldown(
    player: &mut Player,
    action: ActionKind,
    outcome: ActionOutcome,
    now: i64,
    config: &GameConfig,
) {
    let millis = config.cooldowns.rule(action).millis(outcome);
    tracing::debug!(player = %player.id, ?action, ?outcome, millis, "cooldown started");
    set_cooldown(player, action, now, millis);
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn player() -> Player {
        Player::new("1", "Strelok", &GameConfig::default())
    }

    #[test]
    fn test_unset_is_ready() {
        let player = player();
        for action in ActionKind::ALL {
            assert!(is_ready(&player, action, 0));
            assert_eq!(remaining_minutes(&player, action, 0), 0);
        }
    }

    #[test]
    fn test_remaining_rounds_up() {
        let mut player = player();
        set_cooldown(&mut player, ActionKind::Hunt, 0, 90_000);
        assert_eq!(remaining_minutes(&player, ActionKind::Hunt, 0), 2);
        assert_eq!(remaining_minutes(&player, ActionKind::Hunt, 30_000), 1);
        assert_eq!(remaining_minutes(&player, ActionKind::Hunt, 30_001), 1);
        assert_eq!(remaining_minutes(&player, ActionKind::Hunt, 90_000), 0);
    }

    #[test]
    fn test_check_ready_rejects() {
        let mut player = player();
        set_cooldown(&mut player, ActionKind::Camp, 1_000, 60_000);
        assert_eq!(
            check_ready(&player, ActionKind::Camp, 1_000),
            Err(Rejection::Cooldown {
                action: ActionKind::Camp,
                minutes: 1
            })
        );
        assert!(check_ready(&player, ActionKind::Camp, 61_000).is_ok());
        assert!(check_ready(&player, ActionKind::Hunt, 1_000).is_ok());
    }

    #[test]
    fn test_outcome_dependent_duration() {
        let config = GameConfig::default();
        let mut player = player();
        start_cooldown(&mut player, ActionKind::Hunt, ActionOutcome::Nothing, 0, &config);
        assert_eq!(player.cooldowns.ready_at(ActionKind::Hunt), Some(5 * 60_000));
        start_cooldown(&mut player, ActionKind::Hunt, ActionOutcome::Failure, 0, &config);
        assert_eq!(player.cooldowns.ready_at(ActionKind::Hunt), Some(10 * 60_000));
    }

    fn any_action() -> impl Strategy<Value = ActionKind> {
        prop::sample::select(ActionKind::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn prop_gate_opens_exactly_at_deadline(
            action in any_action(),
            now in 0i64..1_000_000_000,
            duration in 0i64..10_000_000,
            probe in 0i64..20_000_000,
        ) {
            let mut player = player();
            set_cooldown(&mut player, action, now, duration);
            let deadline = now + duration;
            let t = now + probe;
            prop_assert_eq!(is_ready(&player, action, t), t >= deadline);
        }
    }
}
