//! # Zone Core
//!
//! The engine of the Zone. This crate resolves stalker actions against the
//! rule book in `zone_rules`: combat, encounters, cooldowns, anomaly fields,
//! emissions and duels.
//!
//! ## Core Components
//!
//! - **combat**: Round-based PvE and PvP resolvers and kill rewards
//! - **events**: Structured combat log and its transcript rendering
//! - **hunt**: The hunt command, from encounter to applied result
//! - **explore**: Expeditions that may or may not run into a mutant
//! - **duel**: Pending challenges with expiry, and duel resolution
//! - **store**: Player persistence with per-player serialization
//!
//! ## Design Philosophy
//!
//! - **Value in, value out**: Resolvers read snapshots and return results; the caller applies them once
//! - **Injected randomness and time**: Every roll goes through a `RandomSource`, every timestamp through the caller
//! - **Rejections are values**: Failed preconditions come back as a `Rejection` and change nothing

pub mod anomaly;
pub mod combat;
pub mod cooldown;
pub mod duel;
pub mod emission;
pub mod encounter;
pub mod error;
pub mod events;
pub mod explore;
pub mod hunt;
pub mod maintenance;
pub mod response;
pub mod store;
pub mod weather;

pub use anomaly::*;
pub use combat::*;
pub use cooldown::*;
pub use duel::*;
pub use emission::*;
pub use encounter::*;
pub use error::*;
pub use events::*;
pub use explore::*;
pub use hunt::*;
pub use maintenance::*;
pub use response::*;
pub use store::*;
pub use weather::*;
