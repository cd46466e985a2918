//! # Zone Rules
//!
//! The rule book of the Zone - entities, catalogs, combat tables and configuration.
//! This crate holds data and pure rules only; the engine that resolves actions
//! against it lives in `zone_core`.

pub mod catalog;
pub mod config;
pub mod entities;
pub mod error;
pub mod mechanics;
pub mod rng;
pub mod world_state;

pub use catalog::*;
pub use config::*;
pub use entities::*;
pub use error::*;
pub use mechanics::*;
pub use rng::*;
pub use world_state::*;
