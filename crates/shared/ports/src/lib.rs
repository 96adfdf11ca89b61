//! Nonstop Rate Ports
//!
//! Port definitions (traits) between the rate continuity engine and the
//! trading server hosting it. These define the boundaries between domain
//! logic and infrastructure.

mod clock;
mod config;
mod error;
mod events;
mod market;

pub use clock::Clock;
pub use config::{
    ParamType, PluginConfigSource, PluginIdentity, PluginParam, PluginRecord, ServerCategory,
    ServerConfigSource,
};
pub use error::{HostError, HostResult};
pub use events::{
    EventHub, PluginConfigHandler, ServerConfigHandler, SubscriptionId, TickHandler,
};
pub use market::{FeedRegistry, SymbolCatalog, TickSink};
