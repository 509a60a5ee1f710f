//! telemetry/timers.rs
//! Wall-clock timer for a sensor or collector run.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct TelemetryTimer {
    start: Instant,
    stopped: Option<Duration>,
}

impl TelemetryTimer {
    pub fn start() -> Self {
        Self { start: Instant::now(), stopped: None }
    }

    pub fn stop(&mut self) {
        if self.stopped.is_none() {
            self.stopped = Some(self.start.elapsed());
        }
    }

    /// Frozen once stopped.
    pub fn elapsed(&self) -> Duration {
        self.stopped.unwrap_or_else(|| self.start.elapsed())
    }
}

impl Default for TelemetryTimer {
    fn default() -> Self {
        Self::start()
    }
}
