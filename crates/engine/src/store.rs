//! Symbol State Store
//!
//! Per-symbol continuity state shared by the tick path and the generator.
//! Thread-safe; every operation holds one mutex for its whole duration, so
//! a read-modify-write of an entry or a full reset is never observed half
//! applied.

use nonstop_core::{RateInfo, Symbol};
use parking_lot::Mutex;
use std::collections::BTreeMap;

#[derive(Debug, Default)]
pub struct SymbolStateStore {
    entries: Mutex<BTreeMap<Symbol, RateInfo>>,
}

impl SymbolStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole store with fresh entries for `symbols`
    pub fn reset<I, S>(&self, symbols: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<Symbol>,
    {
        let fresh: BTreeMap<Symbol, RateInfo> = symbols
            .into_iter()
            .map(|symbol| (symbol.into(), RateInfo::default()))
            .collect();

        *self.entries.lock() = fresh;
    }

    /// Run `f` on the entry for `symbol` under the store lock
    ///
    /// Returns `None` when the symbol is not tracked.
    pub fn with_entry<R>(&self, symbol: &str, f: impl FnOnce(&mut RateInfo) -> R) -> Option<R> {
        self.entries.lock().get_mut(symbol).map(f)
    }

    /// Copy of the entry for `symbol`
    pub fn get(&self, symbol: &str) -> Option<RateInfo> {
        self.entries.lock().get(symbol).copied()
    }

    /// Copy of every entry, ordered by symbol
    pub fn snapshot(&self) -> Vec<(Symbol, RateInfo)> {
        self.entries
            .lock()
            .iter()
            .map(|(symbol, info)| (symbol.clone(), *info))
            .collect()
    }

    pub fn symbols(&self) -> Vec<Symbol> {
        self.entries.lock().keys().cloned().collect()
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.entries.lock().contains_key(symbol)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nonstop_core::Tick;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_reset_creates_fresh_entries() {
        let store = SymbolStateStore::new();
        store.reset(["EURUSD", "GBPUSD"]);

        assert_eq!(store.len(), 2);
        assert_eq!(store.get("EURUSD"), Some(RateInfo::default()));
        assert_eq!(store.get("USDJPY"), None);
    }

    #[test]
    fn test_reset_drops_removed_symbols() {
        let store = SymbolStateStore::new();
        store.reset(["EURUSD", "GBPUSD"]);
        store.with_entry("EURUSD", |info| {
            info.apply_real(&Tick::new("EURUSD", 1.1, 1.2, 10))
        });

        store.reset(["EURUSD", "USDJPY"]);

        assert_eq!(store.symbols(), vec!["EURUSD", "USDJPY"]);
        // Reset rebuilds everything, surviving symbols included
        assert_eq!(store.get("EURUSD"), Some(RateInfo::default()));
        assert!(!store.contains("GBPUSD"));
    }

    #[test]
    fn test_with_entry_unknown_symbol() {
        let store = SymbolStateStore::new();
        store.reset(["EURUSD"]);

        let touched = store.with_entry("XAUUSD", |info| info.last_rand = 2);
        assert!(touched.is_none());
    }

    #[test]
    fn test_snapshot_is_ordered_copy() {
        let store = SymbolStateStore::new();
        store.reset(["USDJPY", "EURUSD", "GBPUSD"]);

        let snapshot = store.snapshot();
        store.with_entry("EURUSD", |info| info.last_rand = 1);

        let names: Vec<_> = snapshot.iter().map(|(s, _)| s.as_str()).collect();
        assert_eq!(names, vec!["EURUSD", "GBPUSD", "USDJPY"]);
        assert_eq!(snapshot[0].1.last_rand, 0);
    }

    #[test]
    fn test_concurrent_updates_are_not_lost() {
        let store = Arc::new(SymbolStateStore::new());
        store.reset(["EURUSD"]);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                thread::spawn(move || {
                    for _ in 0..1000 {
                        store.with_entry("EURUSD", |info| info.last_rate_time += 1);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.get("EURUSD").unwrap().last_rate_time, 8000);
    }
}
