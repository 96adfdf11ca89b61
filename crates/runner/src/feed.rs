//! Quote Feed - Simulated upstream data feed
//!
//! Walks each symbol's bid a few points at a time and quotes the ask at a
//! fixed spread above it. Not every symbol quotes every second, so the
//! stream looks like a real feed with uneven activity.

use crate::config::SymbolConfig;
use nonstop_core::{Precision, Tick, Timestamp};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
struct Walk {
    precision: Precision,
    bid: f64,
    spread: i32,
}

impl Walk {
    fn ask(&self) -> f64 {
        self.precision
            .normalize(self.bid + self.precision.offset(self.spread))
    }
}

/// Random walk quote generator
pub struct QuoteFeedSimulator {
    walks: BTreeMap<String, Walk>,
    /// Largest move per quote, in points
    volatility: i32,
    quote_probability: f64,
    rng: StdRng,
}

impl QuoteFeedSimulator {
    pub fn new(symbols: &[SymbolConfig], volatility: i64, quote_probability: f64) -> Self {
        Self::build(symbols, volatility, quote_probability, StdRng::from_entropy())
    }

    /// Create with a specific seed for reproducible runs
    pub fn with_seed(
        symbols: &[SymbolConfig],
        volatility: i64,
        quote_probability: f64,
        seed: u64,
    ) -> Self {
        Self::build(symbols, volatility, quote_probability, StdRng::seed_from_u64(seed))
    }

    fn build(symbols: &[SymbolConfig], volatility: i64, quote_probability: f64, rng: StdRng) -> Self {
        let walks = symbols
            .iter()
            .map(|s| {
                let precision = Precision::new(s.digits);
                let walk = Walk {
                    precision,
                    bid: precision.normalize(s.bid),
                    spread: s.spread as i32,
                };
                (s.name.clone(), walk)
            })
            .collect();

        Self {
            walks,
            volatility: volatility.clamp(0, i32::MAX as i64) as i32,
            quote_probability: quote_probability.clamp(0.0, 1.0),
            rng,
        }
    }

    /// Last bid quoted for `symbol`
    pub fn bid(&self, symbol: &str) -> Option<f64> {
        self.walks.get(symbol).map(|walk| walk.bid)
    }

    /// Quotes for one simulated second
    pub fn next_quotes(&mut self, now: Timestamp) -> Vec<Tick> {
        let mut quotes = Vec::new();

        for (symbol, walk) in self.walks.iter_mut() {
            if !self.rng.gen_bool(self.quote_probability) {
                continue;
            }

            let step = self.rng.gen_range(-self.volatility..=self.volatility);
            let bid = walk.precision.normalize(walk.bid + walk.precision.offset(step));
            // Never walk through zero
            if bid > 0.0 {
                walk.bid = bid;
            }

            quotes.push(Tick::new(symbol.clone(), walk.bid, walk.ask(), now));
        }

        quotes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symbols() -> Vec<SymbolConfig> {
        vec![
            SymbolConfig::new("EURUSD", 5, 1.08500, 20),
            SymbolConfig::new("USDJPY", 3, 151.250, 15),
        ]
    }

    #[test]
    fn test_walk_stays_within_volatility() {
        let mut feed = QuoteFeedSimulator::with_seed(&symbols(), 3, 1.0, 42);

        let mut last = feed.bid("EURUSD").unwrap();
        for now in 0..100 {
            let quotes = feed.next_quotes(now);
            assert_eq!(quotes.len(), 2);

            let eurusd = quotes.iter().find(|t| t.symbol == "EURUSD").unwrap();
            assert!((eurusd.bid - last).abs() <= 3.0 * 0.00001 + 1e-9);
            assert!((eurusd.spread() - 0.00020).abs() < 1e-9);
            assert!(!eurusd.is_synthetic());
            assert_eq!(eurusd.datetime, now);
            last = eurusd.bid;
        }
    }

    #[test]
    fn test_silent_feed() {
        let mut feed = QuoteFeedSimulator::with_seed(&symbols(), 3, 0.0, 42);
        assert!(feed.next_quotes(0).is_empty());
    }

    #[test]
    fn test_seeded_feeds_agree() {
        let mut a = QuoteFeedSimulator::with_seed(&symbols(), 5, 0.5, 9);
        let mut b = QuoteFeedSimulator::with_seed(&symbols(), 5, 0.5, 9);

        for now in 0..20 {
            assert_eq!(a.next_quotes(now), b.next_quotes(now));
        }
    }
}
