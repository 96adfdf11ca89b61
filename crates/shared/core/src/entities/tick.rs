use serde::{Deserialize, Serialize};

use crate::values::{Symbol, Timestamp};

/// Width of the host's symbol buffer, including the terminator
pub const SYMBOL_LEN: usize = 32;

/// Size of the reserved area carried by every tick
pub const RESERVED_LEN: usize = 8;

/// Marker stamped into the reserved area of ticks synthesized by this engine
pub const FAKE_MARKER: [u8; 4] = [0x46, 0x41, 0x4B, 0x45];

/// Price tick as exchanged with the trading server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    pub symbol: Symbol,
    pub bid: f64,
    pub ask: f64,
    /// Server time of the quote
    pub datetime: Timestamp,
    pub reserved: [u8; RESERVED_LEN],
}

impl Tick {
    /// Create a tick with an empty reserved area
    ///
    /// Symbols longer than the host buffer are cut to fit it.
    pub fn new(symbol: impl Into<Symbol>, bid: f64, ask: f64, datetime: Timestamp) -> Self {
        Self {
            symbol: fit_symbol(symbol.into()),
            bid,
            ask,
            datetime,
            reserved: [0; RESERVED_LEN],
        }
    }

    /// Create a tick already carrying the synthetic marker
    pub fn synthetic(symbol: impl Into<Symbol>, bid: f64, ask: f64, datetime: Timestamp) -> Self {
        let mut tick = Self::new(symbol, bid, ask, datetime);
        tick.mark_synthetic();
        tick
    }

    pub fn mark_synthetic(&mut self) {
        self.reserved[..FAKE_MARKER.len()].copy_from_slice(&FAKE_MARKER);
    }

    /// True when the reserved area starts with exactly the synthetic marker
    pub fn is_synthetic(&self) -> bool {
        self.reserved[..FAKE_MARKER.len()] == FAKE_MARKER
    }

    pub fn spread(&self) -> f64 {
        self.ask - self.bid
    }
}

fn fit_symbol(symbol: Symbol) -> Symbol {
    if symbol.chars().count() < SYMBOL_LEN {
        symbol
    } else {
        symbol.chars().take(SYMBOL_LEN - 1).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_tick_is_genuine() {
        let tick = Tick::new("EURUSD", 1.1000, 1.1002, 100);
        assert!(!tick.is_synthetic());
        assert_eq!(tick.reserved, [0; RESERVED_LEN]);
    }

    #[test]
    fn test_synthetic_marker_spells_fake() {
        let tick = Tick::synthetic("EURUSD", 1.1000, 1.1002, 100);
        assert!(tick.is_synthetic());
        assert_eq!(&tick.reserved[..4], b"FAKE");
    }

    #[test]
    fn test_partial_marker_is_not_synthetic() {
        let mut tick = Tick::new("EURUSD", 1.0, 1.0, 0);
        tick.reserved[..3].copy_from_slice(b"FAK");
        assert!(!tick.is_synthetic());

        tick.reserved[..4].copy_from_slice(b"FAKF");
        assert!(!tick.is_synthetic());
    }

    #[test]
    fn test_long_symbol_is_cut_to_buffer() {
        let long = "X".repeat(40);
        let tick = Tick::new(long, 1.0, 1.0, 0);
        assert_eq!(tick.symbol.len(), SYMBOL_LEN - 1);
    }
}
