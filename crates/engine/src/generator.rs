//! Rate Generator
//!
//! Decides, symbol by symbol, whether the quote stream has gone quiet long
//! enough to need a synthetic tick, and builds one by nudging the last
//! genuine price a few points up or down.
//!
//! ```text
//!   idle < timeout          timeout <= idle, real_idle < failover     real_idle >= failover
//! |-----------------------|---------------------------------------|----------------------
//!        fresh                        synthesize                     server fails over
//! ```

use crate::config::PluginConfig;
use crate::services::HostServices;
use crate::store::SymbolStateStore;
use nonstop_core::{Precision, RateInfo, Tick, Timestamp};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;

/// Time between two generator passes
pub const ADD_RATE_INTERVAL: Duration = Duration::from_millis(500);

/// Largest perturbation in points; steps are drawn from `-MAX_STEP..=MAX_STEP`
pub const MAX_STEP: i32 = 2;

/// Draws allowed to find a step different from the previous one before the
/// repeat is accepted
pub const MAX_REDRAWS: usize = 16;

/// What the continuity policy says about one symbol at one instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// A tick arrived within the staleness timeout
    Fresh,
    /// Real ticks are missing for longer than the server's failover timeout;
    /// the server's own failover must not be masked
    FailedOver,
    /// Stale, but no genuine price has been seen to start from
    NoBaseline,
    /// Stale with a known price: synthesize
    Due,
}

/// Apply the continuity policy to `info` at time `now`
pub fn evaluate(info: &RateInfo, now: Timestamp, config: &PluginConfig) -> Decision {
    if info.idle(now) < config.timeout {
        Decision::Fresh
    } else if info.real_idle(now) >= config.feeder_failover_timeout {
        Decision::FailedOver
    } else if !info.has_real_rate {
        Decision::NoBaseline
    } else {
        Decision::Due
    }
}

/// Tally of one generator pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PassReport {
    /// Ticks handed to the host
    pub emitted: Vec<Tick>,
    pub fresh: usize,
    pub failed_over: usize,
    pub no_baseline: usize,
    /// Symbols skipped because their precision could not be read
    pub metadata_unavailable: usize,
    /// Ticks the host refused
    pub submit_failed: usize,
}

impl PassReport {
    pub fn emitted_count(&self) -> usize {
        self.emitted.len()
    }
}

/// Synthesizes substitute ticks for stale symbols
pub struct RateGenerator {
    rng: StdRng,
}

impl RateGenerator {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Create with a specific seed for reproducible runs
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Draw a step in points, avoiding `last` when possible
    pub fn draw_step(&mut self, last: i32) -> i32 {
        let mut step = self.rng.gen_range(-MAX_STEP..=MAX_STEP);
        for _ in 0..MAX_REDRAWS {
            if step != last {
                break;
            }
            step = self.rng.gen_range(-MAX_STEP..=MAX_STEP);
        }
        step
    }

    /// Evaluate every tracked symbol once and submit a synthetic tick for
    /// each one that is due
    ///
    /// Per-symbol problems (missing metadata, a refused tick) skip that
    /// symbol only; the next pass retries it.
    pub fn run_pass(
        &mut self,
        store: &SymbolStateStore,
        config: &PluginConfig,
        services: &HostServices,
    ) -> PassReport {
        let mut report = PassReport::default();

        for (symbol, info) in store.snapshot() {
            let now = services.clock.now();

            match evaluate(&info, now, config) {
                Decision::Fresh => {
                    report.fresh += 1;
                    continue;
                }
                Decision::FailedOver => {
                    report.failed_over += 1;
                    continue;
                }
                Decision::NoBaseline => {
                    log::info!("Symbol [{}] has no real rate. Ignore!", symbol);
                    report.no_baseline += 1;
                    continue;
                }
                Decision::Due => {}
            }

            let precision = match services.symbols.digits(&symbol) {
                Ok(digits) => Precision::new(digits),
                Err(e) => {
                    log::warn!("Symbol [{}] precision unavailable: {}", symbol, e);
                    report.metadata_unavailable += 1;
                    continue;
                }
            };

            let step = self.draw_step(info.last_rand);
            let offset = precision.offset(step);
            let tick = Tick::synthetic(
                symbol.clone(),
                precision.normalize(info.last_bid + offset),
                precision.normalize(info.last_ask + offset),
                now,
            );
            store.with_entry(&symbol, |entry| entry.last_rand = step);

            log::info!(
                "Generated fake rate for [{}] with old_bid={}, fake_bid={}, old_ask={}, fake_ask={}, offset={:.*}",
                symbol,
                info.last_bid,
                tick.bid,
                info.last_ask,
                tick.ask,
                precision.digits() as usize,
                offset
            );

            if let Err(e) = services.ticks.submit(&tick) {
                log::warn!("Fake rate for [{}] rejected: {}", symbol, e);
                report.submit_failed += 1;
                continue;
            }
            report.emitted.push(tick);
        }

        report
    }
}

impl Default for RateGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(timeout: i64, failover: i64) -> PluginConfig {
        PluginConfig {
            timeout,
            feeder_failover_timeout: failover,
            ..PluginConfig::default()
        }
    }

    fn real_info(at: Timestamp) -> RateInfo {
        let mut info = RateInfo::default();
        info.apply_real(&Tick::new("EURUSD", 1.1, 1.2, at));
        info
    }

    #[test]
    fn test_evaluate_windows() {
        let config = config(28, 60);
        let info = real_info(100);

        assert_eq!(evaluate(&info, 100, &config), Decision::Fresh);
        assert_eq!(evaluate(&info, 127, &config), Decision::Fresh);
        assert_eq!(evaluate(&info, 128, &config), Decision::Due);
        assert_eq!(evaluate(&info, 159, &config), Decision::Due);
        assert_eq!(evaluate(&info, 160, &config), Decision::FailedOver);
    }

    #[test]
    fn test_synthetic_feedback_keeps_symbol_fresh() {
        let config = config(28, 60);
        let mut info = real_info(100);
        info.apply_synthetic(130);

        assert_eq!(evaluate(&info, 140, &config), Decision::Fresh);
        assert_eq!(evaluate(&info, 158, &config), Decision::Due);
    }

    #[test]
    fn test_no_baseline_without_real_rate() {
        let config = config(28, 10_000);
        let info = RateInfo::default();

        assert_eq!(evaluate(&info, 100, &config), Decision::NoBaseline);
    }

    #[test]
    fn test_unknown_failover_timeout_blocks_synthesis() {
        let config = config(28, 0);
        let info = real_info(100);

        assert_eq!(evaluate(&info, 200, &config), Decision::FailedOver);
    }

    #[test]
    fn test_draw_step_avoids_previous() {
        let mut generator = RateGenerator::with_seed(7);
        let mut last = 0;
        for _ in 0..1000 {
            let step = generator.draw_step(last);
            assert!((-MAX_STEP..=MAX_STEP).contains(&step));
            assert_ne!(step, last);
            last = step;
        }
    }

    #[test]
    fn test_draw_step_is_reproducible() {
        let mut a = RateGenerator::with_seed(42);
        let mut b = RateGenerator::with_seed(42);
        for last in [0, 1, -2, 2, 0] {
            assert_eq!(a.draw_step(last), b.draw_step(last));
        }
    }
}
