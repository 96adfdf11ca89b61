use serde::{Deserialize, Serialize};

/// Origin of a tick, as the feeder index passed along by the trading server
///
/// - `-1` is a quote added by hand through a manager terminal or the API
/// - `0..=63` is a quote received from a gateway
/// - `64` and above is a quote from a data feed; the feed's index in the
///   server's feed list is the value minus 64
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SourceId(pub i32);

/// Decoded form of a [`SourceId`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Dealer,
    /// Gateway connection, or any other non-feed source
    Gateway(i32),
    /// Data feed at this index of the server's feed list
    Feed(usize),
}

impl SourceId {
    pub const DEALER: SourceId = SourceId(-1);

    /// First source id belonging to a data feed
    pub const FEED_OFFSET: i32 = 64;

    /// Source id of the data feed at `index` of the server's feed list
    pub fn feed(index: usize) -> Self {
        SourceId(Self::FEED_OFFSET + index as i32)
    }

    pub fn is_dealer(&self) -> bool {
        *self == Self::DEALER
    }

    pub fn is_feed(&self) -> bool {
        self.0 >= Self::FEED_OFFSET
    }

    /// Index into the server's feed list, for feed sources only
    pub fn feed_index(&self) -> Option<usize> {
        self.is_feed().then(|| (self.0 - Self::FEED_OFFSET) as usize)
    }

    pub fn kind(&self) -> SourceKind {
        match self.feed_index() {
            Some(index) => SourceKind::Feed(index),
            None if self.is_dealer() => SourceKind::Dealer,
            None => SourceKind::Gateway(self.0),
        }
    }
}

impl std::fmt::Display for SourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
