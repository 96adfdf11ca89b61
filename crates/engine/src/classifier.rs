//! Tick Classifier & Ingestion
//!
//! Sorts every tick entering the price stream into one of three groups:
//! our own synthetic ticks coming back (feedback), ticks that are not from
//! the primary feed (ignored), and genuine primary feed quotes (applied).

use crate::config::PluginConfig;
use crate::store::SymbolStateStore;
use nonstop_core::{SourceId, SourceKind, Tick};
use nonstop_ports::FeedRegistry;

/// Outcome of classifying one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickDisposition {
    /// One of our synthetic ticks reached the stream; `tracked` tells whether
    /// its symbol is still tracked
    SyntheticFeedback { tracked: bool },
    /// Manual or gateway tick
    IgnoredNonFeed,
    /// Feed index unknown to the server
    IgnoredUnresolvedFeed,
    /// Tick from a feed other than the primary one
    IgnoredForeignFeed,
    /// Primary feed tick carrying the synthetic marker
    IgnoredSynthetic,
    /// Genuine primary feed tick for a symbol nobody tracks
    Untracked,
    /// Genuine primary feed tick recorded
    Applied,
}

impl TickDisposition {
    /// Whether the tick changed any continuity state
    pub fn changed_state(&self) -> bool {
        matches!(
            self,
            TickDisposition::Applied | TickDisposition::SyntheticFeedback { tracked: true }
        )
    }
}

/// Classify `tick` by its source and record it in `store` when it matters
///
/// Never fails: unknown feeds and symbols are ignored, and the only wait is
/// for the store lock.
pub fn classify_and_apply(
    source: SourceId,
    tick: &Tick,
    store: &SymbolStateStore,
    config: &PluginConfig,
    feeds: &dyn FeedRegistry,
) -> TickDisposition {
    if source.is_dealer() && tick.is_synthetic() {
        let tracked = store
            .with_entry(&tick.symbol, |info| info.apply_synthetic(tick.datetime))
            .is_some();
        return TickDisposition::SyntheticFeedback { tracked };
    }

    let SourceKind::Feed(index) = source.kind() else {
        return TickDisposition::IgnoredNonFeed;
    };

    let feed_name = match feeds.feed_name(index) {
        Ok(name) => name,
        Err(e) => {
            log::debug!("Feed index {} not resolvable: {}", index, e);
            return TickDisposition::IgnoredUnresolvedFeed;
        }
    };

    if !config.is_primary_feed(&feed_name) {
        return TickDisposition::IgnoredForeignFeed;
    }

    if tick.is_synthetic() {
        return TickDisposition::IgnoredSynthetic;
    }

    match store.with_entry(&tick.symbol, |info| info.apply_real(tick)) {
        Some(()) => TickDisposition::Applied,
        None => TickDisposition::Untracked,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FEEDER_PARAM_NAME, SYMBOLS_PARAM_NAME, TIMEOUT_PARAM_NAME};
    use nonstop_core::RateInfo;
    use nonstop_ports::{HostError, HostResult, PluginParam};

    struct StaticFeeds(Vec<&'static str>);

    impl FeedRegistry for StaticFeeds {
        fn feed_name(&self, index: usize) -> HostResult<String> {
            self.0
                .get(index)
                .map(|name| name.to_string())
                .ok_or_else(|| HostError::NotFound(format!("feed #{}", index)))
        }
    }

    fn setup() -> (SymbolStateStore, PluginConfig, StaticFeeds) {
        let config = PluginConfig::default().reconcile(&[
            PluginParam::new(TIMEOUT_PARAM_NAME, "30"),
            PluginParam::new(FEEDER_PARAM_NAME, "FeedA"),
            PluginParam::new(SYMBOLS_PARAM_NAME, "EURUSD,GBPUSD"),
        ]);
        let store = SymbolStateStore::new();
        store.reset(config.symbols.iter().cloned());
        (store, config, StaticFeeds(vec!["FeedB", " FeedA "]))
    }

    const FEED_B: SourceId = SourceId(64);
    const FEED_A: SourceId = SourceId(65);

    #[test]
    fn test_primary_feed_tick_is_applied() {
        let (store, config, feeds) = setup();
        let tick = Tick::new("EURUSD", 1.1000, 1.1002, 100);

        let disposition = classify_and_apply(FEED_A, &tick, &store, &config, &feeds);

        assert_eq!(disposition, TickDisposition::Applied);
        let info = store.get("EURUSD").unwrap();
        assert_eq!(info.last_bid, 1.1000);
        assert_eq!(info.last_ask, 1.1002);
        assert_eq!(info.last_real_rate_time, 100);
        assert_eq!(info.last_rate_time, 100);
        assert!(info.has_real_rate);
    }

    #[test]
    fn test_dealer_fake_tick_only_moves_rate_time() {
        let (store, config, feeds) = setup();
        classify_and_apply(FEED_A, &Tick::new("EURUSD", 1.1, 1.2, 100), &store, &config, &feeds);

        let fake = Tick::synthetic("EURUSD", 1.3, 1.4, 130);
        let disposition = classify_and_apply(SourceId::DEALER, &fake, &store, &config, &feeds);

        assert_eq!(disposition, TickDisposition::SyntheticFeedback { tracked: true });
        let info = store.get("EURUSD").unwrap();
        assert_eq!(info.last_rate_time, 130);
        assert_eq!(info.last_real_rate_time, 100);
        assert_eq!(info.last_bid, 1.1);
        assert_eq!(info.last_ask, 1.2);
    }

    #[test]
    fn test_fake_tick_for_untracked_symbol() {
        let (store, config, feeds) = setup();
        let fake = Tick::synthetic("XAUUSD", 1.0, 1.0, 10);

        let disposition = classify_and_apply(SourceId::DEALER, &fake, &store, &config, &feeds);
        assert_eq!(disposition, TickDisposition::SyntheticFeedback { tracked: false });
        assert!(!disposition.changed_state());
    }

    #[test]
    fn test_manual_and_gateway_ticks_are_ignored() {
        let (store, config, feeds) = setup();
        let tick = Tick::new("EURUSD", 1.1, 1.2, 100);

        for source in [SourceId::DEALER, SourceId(0), SourceId(63)] {
            let disposition = classify_and_apply(source, &tick, &store, &config, &feeds);
            assert_eq!(disposition, TickDisposition::IgnoredNonFeed);
        }
        assert_eq!(store.get("EURUSD"), Some(RateInfo::default()));
    }

    #[test]
    fn test_foreign_feed_is_idempotent_noop() {
        let (store, config, feeds) = setup();
        let tick = Tick::new("EURUSD", 1.1, 1.2, 100);

        let first = classify_and_apply(FEED_B, &tick, &store, &config, &feeds);
        let after_first = store.snapshot();
        let second = classify_and_apply(FEED_B, &tick, &store, &config, &feeds);

        assert_eq!(first, TickDisposition::IgnoredForeignFeed);
        assert_eq!(second, TickDisposition::IgnoredForeignFeed);
        assert_eq!(store.snapshot(), after_first);
        assert_eq!(store.get("EURUSD"), Some(RateInfo::default()));
    }

    #[test]
    fn test_unresolvable_feed_is_ignored() {
        let (store, config, feeds) = setup();
        let tick = Tick::new("EURUSD", 1.1, 1.2, 100);

        let disposition = classify_and_apply(SourceId::feed(9), &tick, &store, &config, &feeds);
        assert_eq!(disposition, TickDisposition::IgnoredUnresolvedFeed);
    }

    #[test]
    fn test_marked_tick_from_primary_feed_is_not_real() {
        let (store, config, feeds) = setup();
        let tick = Tick::synthetic("EURUSD", 1.1, 1.2, 100);

        let disposition = classify_and_apply(FEED_A, &tick, &store, &config, &feeds);
        assert_eq!(disposition, TickDisposition::IgnoredSynthetic);
        assert!(!store.get("EURUSD").unwrap().has_real_rate);
    }

    #[test]
    fn test_untracked_symbol_from_primary_feed() {
        let (store, config, feeds) = setup();
        let tick = Tick::new("USDJPY", 150.0, 150.02, 100);

        let disposition = classify_and_apply(FEED_A, &tick, &store, &config, &feeds);
        assert_eq!(disposition, TickDisposition::Untracked);
        assert_eq!(store.len(), 2);
    }
}
