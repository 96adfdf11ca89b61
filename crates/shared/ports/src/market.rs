use nonstop_core::Tick;

use crate::error::HostResult;

/// Port for injecting ticks into the live price stream
///
/// The host stamps the stream time itself; the tick's own `datetime` is only
/// a hint.
pub trait TickSink: Send + Sync {
    fn submit(&self, tick: &Tick) -> HostResult<()>;
}

/// Port for resolving data feed indices to feed names
pub trait FeedRegistry: Send + Sync {
    /// Name of the data feed at `index` of the server's feed list
    fn feed_name(&self, index: usize) -> HostResult<String>;
}

/// Port for symbol metadata
pub trait SymbolCatalog: Send + Sync {
    /// Number of decimal digits the symbol is quoted with
    fn digits(&self, symbol: &str) -> HostResult<u32>;
}
