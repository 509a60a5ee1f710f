use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::telemetry::counters::TransportCounters;
use crate::telemetry::timers::TelemetryTimer;

/// Immutable end-of-run view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    pub counters: TransportCounters,
    pub open_handles: u64,
    pub elapsed: Duration,
    pub throughput_bytes_per_sec: f64,
}

impl TelemetrySnapshot {
    pub fn from(counters: &TransportCounters, timer: &TelemetryTimer, open_handles: usize) -> Self {
        let elapsed = timer.elapsed();
        let moved = counters.bytes_sent.max(counters.bytes_received);
        let throughput = if elapsed.as_secs_f64() > 0.0 {
            moved as f64 / elapsed.as_secs_f64()
        } else {
            0.0
        };
        Self {
            counters: counters.clone(),
            open_handles: open_handles as u64,
            elapsed,
            throughput_bytes_per_sec: throughput,
        }
    }

    /// Fraction of received datagrams that were dropped.
    pub fn drop_ratio(&self) -> f64 {
        let c = &self.counters;
        if c.datagrams_received == 0 {
            return 0.0;
        }
        c.datagrams_dropped as f64 / c.datagrams_received as f64
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| format!("{{\"error\":\"{}\"}}", e))
    }
}
