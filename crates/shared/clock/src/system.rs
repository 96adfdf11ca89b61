use chrono::Utc;
use nonstop_core::Timestamp;
use nonstop_ports::Clock;

/// Real system clock for standalone use
///
/// Returns the current wall-clock time in whole seconds. Inside a trading
/// server the server's own clock should be preferred.
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Utc::now().timestamp()
    }

    fn name(&self) -> &str {
        "SystemClock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_tracks_wall_time() {
        let clock = SystemClock::new();
        let before = Utc::now().timestamp();
        let now = clock.now();
        let after = Utc::now().timestamp();

        assert!(before <= now && now <= after);
    }
}
