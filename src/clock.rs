//! Frame clock: display-refresh timestamps in, whole simulation ticks out
//!
//! The host calls [`FrameClock::advance`] once per refresh with the
//! timestamp it was given (milliseconds, monotonically increasing). Time is
//! banked in an accumulator and paid out in fixed `SIM_DT` ticks.

use std::cell::Cell;
use std::rc::Rc;

use crate::consts::*;

/// Slack for float drift when comparing against one tick
const TICK_EPSILON_MS: f64 = 1e-6;

#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last_time_ms: Option<f64>,
    accumulator_ms: f64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of ticks to run for a refresh at `timestamp_ms`
    ///
    /// The first refresh runs exactly one tick. Gaps are clamped to
    /// `MAX_FRAME_GAP_MS`, at most `MAX_SUBSTEPS` ticks are paid out per
    /// refresh, and a timestamp that goes backwards counts as no time.
    pub fn advance(&mut self, timestamp_ms: f64) -> u32 {
        let dt_ms = match self.last_time_ms {
            Some(last) if timestamp_ms >= last => (timestamp_ms - last).min(MAX_FRAME_GAP_MS),
            Some(last) => {
                log::debug!("Clock went backwards ({} < {})", timestamp_ms, last);
                0.0
            }
            None => SIM_DT_MS,
        };
        self.last_time_ms = Some(self.last_time_ms.map_or(timestamp_ms, |l| l.max(timestamp_ms)));
        self.accumulator_ms += dt_ms;

        let mut ticks = 0;
        while self.accumulator_ms + TICK_EPSILON_MS >= SIM_DT_MS && ticks < MAX_SUBSTEPS {
            self.accumulator_ms -= SIM_DT_MS;
            ticks += 1;
        }
        self.accumulator_ms = self.accumulator_ms.max(0.0);
        ticks
    }
}

/// Cooperative cancellation for the refresh loop
///
/// Clones share one flag. Once stopped, a session ignores further frames
/// and the host stops rescheduling itself.
#[derive(Debug, Clone, Default)]
pub struct StopHandle {
    stopped: Rc<Cell<bool>>,
}

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.stopped.set(true);
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.get()
    }
}
