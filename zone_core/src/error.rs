//! Typed rejections and engine errors.
//!
//! A [`Rejection`] is a precondition failure: the action was not attempted and
//! nothing was changed. Its `Display` is the in-universe message shown to the
//! player. [`StoreError`] covers the player store itself.

use thiserror::Error;

use zone_rules::{ActionKind, ItemId, PlayerId, ZoneId};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Rejection {
    #[error("{}", cooldown_message(.action, .minutes))]
    Cooldown { action: ActionKind, minutes: u64 },

    #[error("You need to equip a weapon first. Stalkers don't go hunting bare-handed.")]
    NoWeapon,

    #[error("Nobody in the Zone has ever seen gear like \"{id}\". Check your equipment.")]
    UnknownItem { id: ItemId },

    #[error("You seem to be lost. No map shows a place called \"{id}\".")]
    UnknownZone { id: ZoneId },

    #[error("You need an anomaly detector to search for anomalies.")]
    NoDetector,

    #[error("Your detector stays silent. There are no anomalies in {zone}.")]
    NoAnomalies { zone: String },

    #[error("You haven't located an anomaly. Scan for one first.")]
    NoActiveAnomaly,

    #[error("The anomaly has shifted and is gone. You'll need to scan again.")]
    AnomalyShifted,

    #[error("Your backpack is too heavy to carry anything more.")]
    InventoryFull,

    #[error("You need {needed} rubles but only have {available}.")]
    InsufficientFunds { needed: u32, available: u32 },

    #[error("Nothing is equipped in that slot.")]
    NothingToRepair,

    #[error("Your gear is already in perfect condition.")]
    AlreadyRepaired,

    #[error("You can't challenge yourself to a duel.")]
    SelfChallenge,

    #[error("You already have a challenge waiting for an answer.")]
    ChallengePending,

    #[error("{name} already has a challenge waiting for an answer.")]
    TargetBusy { name: String },

    #[error("{name} has no weapon equipped. There's no honour in shooting the unarmed.")]
    TargetUnarmed { name: String },

    #[error("Nobody has challenged you to a duel.")]
    NoChallenge,

    #[error("No stalker with id {id} is known in the Zone.")]
    UnknownPlayer { id: PlayerId },
}

fn cooldown_message(action: &ActionKind, minutes: &u64) -> String {
    let wait = match minutes {
        1 => "1 minute".to_string(),
        n => format!("{n} minutes"),
    };
    let activity = match action {
        ActionKind::Hunt => "You're still recovering from your last hunt.",
        ActionKind::Explore => "You're still catching your breath from the last expedition.",
        ActionKind::Travel => "You need to rest before travelling again.",
        ActionKind::Scout => "You've just scouted the area.",
        ActionKind::Camp => "You've only just broken camp.",
        ActionKind::Detect => "Your detector is still recalibrating.",
        ActionKind::AnomalyScan => "Your detector needs time to recharge.",
        ActionKind::AnomalyEnter => "You're still shaken from the last anomaly.",
    };
    format!("{activity} Try again in {wait}.")
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("player {0} not found")]
    NotFound(PlayerId),

    #[error("player {0} already exists")]
    AlreadyExists(PlayerId),

    #[error("player record could not be encoded: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error("player store lock poisoned")]
    Poisoned,
}
