//! Progression and economy engine for themed incremental clicker games.
//!
//! Everything here is plain data in, plain data out. A host (terminal UI,
//! browser page, test harness) owns rendering and storage; this crate owns
//! the numbers.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`big`] | Arbitrary-magnitude non-negative numbers for idle-game values |
//! | [`engine`] | Costs, derived stats, ranks, prestige and the action reducer |
//! | [`session`] | Single-writer session: ticks, autosave cadence |
//! | [`time`] | Fixed-timestep accumulator turning frame times into ticks |
//! | [`variants`] | Built-in themed catalogs (Rift, Precinct) |

pub mod big;
pub mod engine;
pub mod session;
pub mod time;
pub mod variants;

pub use big::BigNum;
pub use engine::{
    Action, Catalog, CatalogError, DerivedStats, Engine, EngineConfig, GameSnapshot, LoadSource,
    Outcome, Quantity, Rejection, SaveError, Step,
};
pub use session::{Advance, Session};
pub use variants::{create_catalog, VariantChoice};
