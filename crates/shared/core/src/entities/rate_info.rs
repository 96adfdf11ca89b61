use serde::{Deserialize, Serialize};

use super::Tick;
use crate::values::Timestamp;

/// Continuity state of one tracked symbol
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RateInfo {
    /// Last genuine bid
    pub last_bid: f64,
    /// Last genuine ask
    pub last_ask: f64,
    /// Time of the last genuine tick
    pub last_real_rate_time: Timestamp,
    /// Time of the last tick of any kind, synthetic included
    pub last_rate_time: Timestamp,
    /// Perturbation step used by the last synthesized tick
    pub last_rand: i32,
    /// Set by the first genuine tick; nothing can be synthesized before it
    pub has_real_rate: bool,
}

impl RateInfo {
    /// Record a genuine tick
    pub fn apply_real(&mut self, tick: &Tick) {
        self.last_bid = tick.bid;
        self.last_ask = tick.ask;
        self.last_rate_time = tick.datetime;
        self.last_real_rate_time = tick.datetime;
        self.has_real_rate = true;
    }

    /// Record that one of our own synthetic ticks reached the price stream
    ///
    /// Only the any-tick clock moves, and never behind the real-tick clock.
    pub fn apply_synthetic(&mut self, datetime: Timestamp) {
        self.last_rate_time = datetime.max(self.last_real_rate_time);
    }

    /// Seconds since the last tick of any kind
    pub fn idle(&self, now: Timestamp) -> i64 {
        now - self.last_rate_time
    }

    /// Seconds since the last genuine tick
    pub fn real_idle(&self, now: Timestamp) -> i64 {
        now - self.last_real_rate_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_has_no_rate() {
        let info = RateInfo::default();
        assert!(!info.has_real_rate);
        assert_eq!(info.last_rate_time, 0);
        assert_eq!(info.last_rand, 0);
    }

    #[test]
    fn test_apply_real_sets_both_clocks() {
        let mut info = RateInfo::default();
        info.apply_real(&Tick::new("EURUSD", 1.1, 1.2, 50));

        assert!(info.has_real_rate);
        assert_eq!(info.last_bid, 1.1);
        assert_eq!(info.last_ask, 1.2);
        assert_eq!(info.last_rate_time, 50);
        assert_eq!(info.last_real_rate_time, 50);
    }

    #[test]
    fn test_apply_synthetic_never_passes_real_clock() {
        let mut info = RateInfo::default();
        info.apply_real(&Tick::new("EURUSD", 1.1, 1.2, 50));

        info.apply_synthetic(80);
        assert_eq!(info.last_rate_time, 80);
        assert_eq!(info.last_real_rate_time, 50);
        assert_eq!(info.last_bid, 1.1);

        info.apply_synthetic(40);
        assert_eq!(info.last_rate_time, 50);
    }

    #[test]
    fn test_idle_windows() {
        let mut info = RateInfo::default();
        info.apply_real(&Tick::new("EURUSD", 1.1, 1.2, 10));
        info.apply_synthetic(25);

        assert_eq!(info.idle(30), 5);
        assert_eq!(info.real_idle(30), 20);
    }
}
