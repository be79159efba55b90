use chrono::prelude::*;
use serde::{Deserialize, Serialize};

/// Wall-clock stopwatch for single-player games.
///
/// Nothing ticks in the background, elapsed time is computed from the recorded timestamps whenever asked.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameTimer {
    started_at: Option<DateTime<Utc>>,
    ended_at: Option<DateTime<Utc>>,
}

impl GameTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some() && self.ended_at.is_none()
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// Starts from scratch at `now`, discarding any previous run.
    pub fn start(&mut self, now: DateTime<Utc>) {
        log::debug!("timer started at {}", now);
        self.started_at = Some(now);
        self.ended_at = None;
    }

    /// Freezes the elapsed time at `now`. Stopping an idle or already stopped timer does nothing.
    pub fn stop(&mut self, now: DateTime<Utc>) {
        if self.is_running() {
            log::debug!("timer stopped at {}", now);
            self.ended_at = Some(now);
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Whole seconds between start and stop (or `now` while running), 0 if never started.
    pub fn elapsed_secs(&self, now: DateTime<Utc>) -> u32 {
        match self.started_at {
            Some(started_at) => (self.ended_at.unwrap_or(now) - started_at)
                .num_seconds()
                .clamp(0, u32::MAX as i64) as u32,
            None => 0,
        }
    }
}
