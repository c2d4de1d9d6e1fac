//! Time utilities for the simulated session loop

use std::time::{Duration, Instant};

/// Shortest tick the simulated loop will run at
pub const MIN_TICK_MS: u64 = 1;

/// Tick period for a configured millisecond value
pub fn tick_duration(tick_ms: u64) -> Duration {
    Duration::from_millis(tick_ms.max(MIN_TICK_MS))
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
    fn test_tick_duration_floor() {
        assert_eq!(tick_duration(0), Duration::from_millis(MIN_TICK_MS));
        assert_eq!(tick_duration(50), Duration::from_millis(50));
    }
}
