//! Progression & economy engine.
//!
//! Pure functions over immutable `GameSnapshot`s: costs, derived stats, rank
//! resolution and prestige, tied together by the `Engine::apply` reducer.
//! No I/O, no clocks; timers and persistence belong to the caller (see
//! `crate::session`).

pub mod actions;
pub mod catalog;
pub mod config;
pub mod cost;
pub mod format;
pub mod logic;
pub mod prestige;
pub mod rank;
pub mod save;
pub mod state;
pub mod stats;

#[cfg(test)]
mod simulator;

pub use actions::{Action, Outcome, Quantity, Rejection, Step};
pub use catalog::{Catalog, CatalogError};
pub use config::EngineConfig;
pub use logic::Engine;
pub use rank::RankProgress;
pub use save::{LoadSource, Loaded, SaveError};
pub use state::{DerivedStats, GameSnapshot, RankInfo};
