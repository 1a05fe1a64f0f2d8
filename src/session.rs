//! Single-writer game session.
//!
//! Owns the current snapshot and is the only thing that replaces it. The
//! caller forwards user actions through `dispatch` and frame timestamps
//! through `advance`; the session turns elapsed time into whole-second
//! `Tick`s and hands back an autosave document every
//! `autosave_interval_secs`. Storing that document is up to the caller.

use crate::big::BigNum;
use crate::engine::save::{self, LoadSource, SaveError};
use crate::engine::{Action, CatalogError, Engine, GameSnapshot, Outcome};
use crate::time::GameTime;
use crate::variants::{create_catalog, VariantChoice};

/// What happened while advancing the clock.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Advance {
    /// Whole seconds of passive income applied.
    pub seconds: u32,
    pub earned: BigNum,
    /// Boosts that ran out.
    pub expired: Vec<String>,
    /// Save document, when an autosave came due.
    pub autosave: Option<String>,
}

pub struct Session {
    engine: Engine,
    snapshot: GameSnapshot,
    clock: GameTime,
    /// Ticks that don't yet add up to a whole second.
    pending_ticks: u32,
    secs_since_save: u32,
    load_source: LoadSource,
}

impl Session {
    pub fn new(engine: Engine) -> Self {
        let snapshot = engine.new_game();
        Self::with_snapshot(engine, snapshot, LoadSource::Fresh)
    }

    pub fn for_variant(choice: VariantChoice) -> Result<Self, CatalogError> {
        Ok(Self::new(Engine::new(create_catalog(&choice))?))
    }

    /// Resume from a save document. Never fails; an unusable document
    /// starts a fresh game (see `load_source`).
    pub fn resume(engine: Engine, json: &str) -> Self {
        let loaded = save::from_json(&engine, json);
        log::info!("session resumed ({:?})", loaded.source);
        Self::with_snapshot(engine, loaded.snapshot, loaded.source)
    }

    fn with_snapshot(engine: Engine, snapshot: GameSnapshot, load_source: LoadSource) -> Self {
        let clock = GameTime::from_config(&engine.catalog().config.session);
        Self {
            engine,
            snapshot,
            clock,
            pending_ticks: 0,
            secs_since_save: 0,
            load_source,
        }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn snapshot(&self) -> &GameSnapshot {
        &self.snapshot
    }

    pub fn load_source(&self) -> LoadSource {
        self.load_source
    }

    /// Apply a user action to the current snapshot.
    pub fn dispatch(&mut self, action: &Action) -> Outcome {
        let step = self.engine.apply(&self.snapshot, action);
        self.snapshot = step.snapshot;
        step.outcome
    }

    /// Feed a frame timestamp (ms).
    pub fn advance(&mut self, now_ms: f64) -> Advance {
        let ticks = self.clock.update(now_ms);
        self.run_ticks(ticks)
    }

    /// Advance by a tick count directly, bypassing the wall clock.
    pub fn advance_ticks(&mut self, ticks: u32) -> Advance {
        self.clock.add_ticks(ticks);
        self.run_ticks(ticks)
    }

    fn run_ticks(&mut self, ticks: u32) -> Advance {
        let per_sec = self.clock.ticks_per_sec();
        let total = self.pending_ticks.saturating_add(ticks);
        let seconds = total / per_sec;
        self.pending_ticks = total % per_sec;
        if seconds == 0 {
            return Advance::default();
        }

        let mut advance = Advance {
            seconds,
            ..Advance::default()
        };
        if let Outcome::Ticked { earned, expired } = self.dispatch(&Action::Tick { seconds }) {
            advance.earned = earned;
            advance.expired = expired;
        }

        // 0 ならオートセーブしない
        let interval = self.engine.catalog().config.session.autosave_interval_secs;
        self.secs_since_save = self.secs_since_save.saturating_add(seconds);
        if interval > 0 && self.secs_since_save >= interval {
            self.secs_since_save = 0;
            match self.save() {
                Ok(json) => advance.autosave = Some(json),
                Err(e) => log::warn!("autosave failed: {}", e),
            }
        }
        advance
    }

    /// Save document for the current snapshot.
    pub fn save(&self) -> Result<String, SaveError> {
        save::to_json(&self.snapshot)
    }
}
