//! Fixed-timestep clock using an accumulator.
//!
//! The caller feeds frame timestamps at whatever rate it renders; `GameTime`
//! turns them into a whole number of discrete ticks so the simulation stays
//! deterministic and testable.

use crate::engine::config::SessionConfig;

#[derive(Clone, Debug)]
pub struct GameTime {
    /// Milliseconds per tick (e.g. 100ms = 10 ticks/sec)
    ms_per_tick: f64,
    ticks_per_sec: u32,
    /// Longest gap between two frames that still counts in full.
    max_frame_ms: f64,
    /// Milliseconds not yet consumed as ticks
    accumulator: f64,
    /// Total elapsed ticks since creation
    pub total_ticks: u64,
    /// Timestamp of the last update (ms), None before the first frame
    last_timestamp: Option<f64>,
}

impl GameTime {
    /// `ticks_per_sec` game ticks per real-time second, frame gaps clamped
    /// to 500ms.
    pub fn new(ticks_per_sec: u32) -> Self {
        Self::with_max_frame(ticks_per_sec, 500.0)
    }

    pub fn with_max_frame(ticks_per_sec: u32, max_frame_ms: f64) -> Self {
        let ticks_per_sec = ticks_per_sec.max(1);
        Self {
            ms_per_tick: 1000.0 / f64::from(ticks_per_sec),
            ticks_per_sec,
            max_frame_ms,
            accumulator: 0.0,
            total_ticks: 0,
            last_timestamp: None,
        }
    }

    pub fn from_config(config: &SessionConfig) -> Self {
        Self::with_max_frame(config.ticks_per_sec, config.max_frame_ms)
    }

    pub fn ticks_per_sec(&self) -> u32 {
        self.ticks_per_sec
    }

    /// Feed a wall-clock timestamp in milliseconds. Returns the number of
    /// ticks to process this frame.
    pub fn update(&mut self, now_ms: f64) -> u32 {
        let delta = match self.last_timestamp {
            // Clamp so a backgrounded tab doesn't dump minutes of ticks at once
            Some(prev) => (now_ms - prev).clamp(0.0, self.max_frame_ms),
            None => 0.0,
        };
        self.last_timestamp = Some(now_ms);

        self.accumulator += delta;
        let ticks = (self.accumulator / self.ms_per_tick) as u32;
        self.accumulator -= f64::from(ticks) * self.ms_per_tick;
        self.total_ticks += u64::from(ticks);
        ticks
    }

    /// Add ticks without timestamps.
    pub fn add_ticks(&mut self, ticks: u32) {
        self.total_ticks += u64::from(ticks);
    }
}
