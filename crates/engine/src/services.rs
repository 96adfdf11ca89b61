//! Host services the engine calls into

use crate::error::{EngineError, Result};
use nonstop_ports::{
    Clock, EventHub, FeedRegistry, PluginConfigSource, ServerConfigSource, SymbolCatalog,
    TickSink,
};
use std::sync::Arc;

/// Every port the engine needs from its host
#[derive(Clone)]
pub struct HostServices {
    pub clock: Arc<dyn Clock>,
    pub ticks: Arc<dyn TickSink>,
    pub feeds: Arc<dyn FeedRegistry>,
    pub symbols: Arc<dyn SymbolCatalog>,
    pub plugin_config: Arc<dyn PluginConfigSource>,
    pub server_config: Arc<dyn ServerConfigSource>,
    pub events: Arc<dyn EventHub>,
}

impl HostServices {
    pub fn builder() -> HostServicesBuilder {
        HostServicesBuilder::default()
    }

    /// Use one host object for every port
    pub fn from_host<H>(host: Arc<H>) -> Self
    where
        H: Clock
            + TickSink
            + FeedRegistry
            + SymbolCatalog
            + PluginConfigSource
            + ServerConfigSource
            + EventHub
            + 'static,
    {
        Self {
            clock: host.clone(),
            ticks: host.clone(),
            feeds: host.clone(),
            symbols: host.clone(),
            plugin_config: host.clone(),
            server_config: host.clone(),
            events: host,
        }
    }
}

/// Assembles [`HostServices`] from separately provided ports
#[derive(Default)]
pub struct HostServicesBuilder {
    clock: Option<Arc<dyn Clock>>,
    ticks: Option<Arc<dyn TickSink>>,
    feeds: Option<Arc<dyn FeedRegistry>>,
    symbols: Option<Arc<dyn SymbolCatalog>>,
    plugin_config: Option<Arc<dyn PluginConfigSource>>,
    server_config: Option<Arc<dyn ServerConfigSource>>,
    events: Option<Arc<dyn EventHub>>,
}

impl HostServicesBuilder {
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn ticks(mut self, ticks: Arc<dyn TickSink>) -> Self {
        self.ticks = Some(ticks);
        self
    }

    pub fn feeds(mut self, feeds: Arc<dyn FeedRegistry>) -> Self {
        self.feeds = Some(feeds);
        self
    }

    pub fn symbols(mut self, symbols: Arc<dyn SymbolCatalog>) -> Self {
        self.symbols = Some(symbols);
        self
    }

    pub fn plugin_config(mut self, plugin_config: Arc<dyn PluginConfigSource>) -> Self {
        self.plugin_config = Some(plugin_config);
        self
    }

    pub fn server_config(mut self, server_config: Arc<dyn ServerConfigSource>) -> Self {
        self.server_config = Some(server_config);
        self
    }

    pub fn events(mut self, events: Arc<dyn EventHub>) -> Self {
        self.events = Some(events);
        self
    }

    /// Fails with [`EngineError::MissingService`] naming the first absent port
    pub fn build(self) -> Result<HostServices> {
        Ok(HostServices {
            clock: self.clock.ok_or(EngineError::MissingService("clock"))?,
            ticks: self.ticks.ok_or(EngineError::MissingService("tick sink"))?,
            feeds: self.feeds.ok_or(EngineError::MissingService("feed registry"))?,
            symbols: self
                .symbols
                .ok_or(EngineError::MissingService("symbol catalog"))?,
            plugin_config: self
                .plugin_config
                .ok_or(EngineError::MissingService("plugin config"))?,
            server_config: self
                .server_config
                .ok_or(EngineError::MissingService("server config"))?,
            events: self.events.ok_or(EngineError::MissingService("event hub"))?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nonstop_core::Timestamp;

    struct FixedClock;

    impl Clock for FixedClock {
        fn now(&self) -> Timestamp {
            42
        }
    }

    #[test]
    fn test_builder_reports_first_missing_port() {
        let err = HostServices::builder().build().err().unwrap();
        assert!(matches!(err, EngineError::MissingService("clock")));

        let err = HostServices::builder()
            .clock(Arc::new(FixedClock))
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, EngineError::MissingService("tick sink")));
    }
}
