//! Time utilities for the fixed-step simulation

use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

/// Get current Unix timestamp in milliseconds
pub fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_millis() as u64
}

/// Tick rate configuration
pub const SIMULATION_TPS: u32 = 60; // 60 ticks per second
pub const SNAPSHOT_TPS: u32 = 30; // 30 snapshots per second
pub const TICK_DURATION_MICROS: u64 = 1_000_000 / SIMULATION_TPS as u64;

/// Fixed duration of one simulation tick
pub fn tick_duration() -> Duration {
    Duration::from_micros(TICK_DURATION_MICROS)
}

/// Convert a wall-clock duration in milliseconds to whole simulation ticks (rounded)
pub const fn ms_to_ticks(ms: u64) -> u32 {
    ((ms * SIMULATION_TPS as u64 + 500) / 1000) as u32
}

/// Convert a tick count to seconds of simulated time
pub fn ticks_to_secs(ticks: u64) -> f32 {
    ticks as f32 / SIMULATION_TPS as f32
}

/// A simple timer for measuring durations
#[derive(Debug, Clone)]
pub struct Timer {
    start: Instant,
}

impl Timer {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startup_window_is_nine_ticks() {
        assert_eq!(ms_to_ticks(150), 9);
        assert_eq!(ms_to_ticks(1000), SIMULATION_TPS);
        assert_eq!(ms_to_ticks(0), 0);
    }

    #[test]
    fn tick_seconds() {
        assert!((ticks_to_secs(120) - 2.0).abs() < f32::EPSILON);
        assert_eq!(tick_duration().as_micros() as u64, TICK_DURATION_MICROS);
    }
}
