//! Waiting for a stalker's reply to an encounter.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{timeout_at, Instant};

use crate::hunt::EncounterChoice;

/// Read a fight/flee answer out of a chat message.
///
/// Running takes priority, so "don't fight, run!" flees.
pub fn parse_choice(message: &str) -> Option<EncounterChoice> {
    let message = message.to_lowercase();
    if message.contains("run") || message.contains("flee") {
        Some(EncounterChoice::Flee)
    } else if message.contains("fight") || message.contains("attack") {
        Some(EncounterChoice::Fight)
    } else {
        None
    }
}

/// Wait up to `window` for a message that answers the encounter.
///
/// Messages that don't answer it are skipped. A closed channel or an elapsed
/// window both give [`EncounterChoice::Timeout`].
pub async fn await_encounter_choice(rx: &mut mpsc::Receiver<String>, window: Duration) -> EncounterChoice {
    let deadline = Instant::now() + window;
    loop {
        match timeout_at(deadline, rx.recv()).await {
            Ok(Some(message)) => {
                if let Some(choice) = parse_choice(&message) {
                    return choice;
                }
                tracing::debug!(%message, "ignoring reply");
            }
            Ok(None) => return EncounterChoice::Timeout,
            Err(_) => {
                tracing::debug!(?window, "no reply to encounter");
                return EncounterChoice::Timeout;
            }
        }
    }
}
