use chrono::DateTime;
use nonstop_core::Timestamp;
use nonstop_ports::Clock;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

/// Clock that only moves when told to
///
/// Useful for deterministic tests of time-driven behavior: the generator can
/// be made to see any idle window without waiting for it.
pub struct ManualClock {
    current: AtomicI64,
}

impl ManualClock {
    pub fn new(initial_time: Timestamp) -> Arc<Self> {
        Arc::new(Self {
            current: AtomicI64::new(initial_time),
        })
    }

    /// Explicitly set the time
    ///
    /// Warning: This can move time backwards. Use with caution.
    pub fn set_time(&self, time: Timestamp) {
        self.current.store(time, Ordering::SeqCst);
    }

    /// Advance the time by `seconds`, returning the new time
    pub fn advance(&self, seconds: i64) -> Timestamp {
        self.current.fetch_add(seconds, Ordering::SeqCst) + seconds
    }

    /// Current time rendered as RFC 3339, for logs
    pub fn to_rfc3339(&self) -> String {
        DateTime::from_timestamp(self.now(), 0)
            .map(|t| t.to_rfc3339())
            .unwrap_or_else(|| self.now().to_string())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        self.current.load(Ordering::SeqCst)
    }

    fn name(&self) -> &str {
        "ManualClock"
    }
}
