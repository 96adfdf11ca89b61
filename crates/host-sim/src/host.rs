//! Simulated trading server
//!
//! Implements every port the engine needs, backed by plain in-memory tables
//! that tests and the runner manipulate directly:
//!
//! - a feed list resolving feed indices to names
//! - a symbol table with quote digits
//! - the plugin's parameter record and the history server's feed timeout
//! - an event hub delivering ticks and configuration changes
//!
//! Ticks submitted by the engine are recorded and, with loopback on, fed
//! back through the hub as manual (dealer) ticks, the way a real server
//! routes ticks added through its API.

use crate::hub::HandlerRegistry;
use log::debug;
use nonstop_core::{SourceId, Tick, Timestamp};
use nonstop_ports::{
    Clock, EventHub, FeedRegistry, HostError, HostResult, PluginConfigHandler,
    PluginConfigSource, PluginIdentity, PluginParam, PluginRecord, ServerCategory,
    ServerConfigHandler, ServerConfigSource, SubscriptionId, SymbolCatalog, TickHandler, TickSink,
};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::broadcast;

/// A tick as it entered the simulated price stream
#[derive(Debug, Clone, PartialEq)]
pub struct StreamTick {
    pub source: SourceId,
    pub tick: Tick,
}

/// Fault switches for exercising the engine's error paths
#[derive(Default)]
struct Faults {
    plugin_config_unavailable: AtomicBool,
    reject_ticks: AtomicBool,
    refuse_subscriptions: AtomicBool,
}

pub struct SimulatedHost {
    clock: Arc<dyn Clock>,
    feeds: RwLock<Vec<String>>,
    digits: RwLock<HashMap<String, u32>>,
    plugin: RwLock<PluginRecord>,
    datafeeds_timeout: RwLock<Option<i64>>,
    handlers: HandlerRegistry,
    submitted: Mutex<Vec<Tick>>,
    stream_tx: broadcast::Sender<StreamTick>,
    loopback: AtomicBool,
    faults: Faults,
}

impl SimulatedHost {
    /// Create a host with no feeds, no symbols and an empty parameter list
    pub fn new(clock: Arc<dyn Clock>, identity: PluginIdentity) -> Arc<Self> {
        let (stream_tx, _) = broadcast::channel(1000);

        Arc::new(Self {
            clock,
            feeds: RwLock::new(Vec::new()),
            digits: RwLock::new(HashMap::new()),
            plugin: RwLock::new(PluginRecord {
                identity,
                params: Vec::new(),
            }),
            datafeeds_timeout: RwLock::new(None),
            handlers: HandlerRegistry::new(),
            submitted: Mutex::new(Vec::new()),
            stream_tx,
            loopback: AtomicBool::new(true),
            faults: Faults::default(),
        })
    }

    pub fn identity(&self) -> PluginIdentity {
        self.plugin.read().identity.clone()
    }

    /// Register a data feed, returning the source id its ticks carry
    pub fn add_feed(&self, name: impl Into<String>) -> SourceId {
        let mut feeds = self.feeds.write();
        feeds.push(name.into());
        SourceId::feed(feeds.len() - 1)
    }

    pub fn set_digits(&self, symbol: impl Into<String>, digits: u32) {
        self.digits.write().insert(symbol.into(), digits);
    }

    pub fn remove_symbol(&self, symbol: &str) {
        self.digits.write().remove(symbol);
    }

    /// Replace the plugin's parameters without notifying anyone
    pub fn set_params(&self, params: Vec<PluginParam>) {
        self.plugin.write().params = params;
    }

    /// Replace the plugin's parameters and broadcast the change
    pub fn update_params(&self, params: Vec<PluginParam>) {
        self.set_params(params);
        let identity = self.identity();
        self.handlers.dispatch_plugin_config(&identity);
    }

    /// Broadcast a configuration change of some plugin
    pub fn notify_plugin_changed(&self, plugin: &PluginIdentity) {
        self.handlers.dispatch_plugin_config(plugin);
    }

    /// Set the history server's feed timeout without notifying anyone;
    /// `None` makes the server configuration unreadable
    pub fn set_datafeeds_timeout(&self, seconds: Option<i64>) {
        *self.datafeeds_timeout.write() = seconds;
    }

    /// Set the history server's feed timeout and broadcast the change
    pub fn update_datafeeds_timeout(&self, seconds: i64) {
        self.set_datafeeds_timeout(Some(seconds));
        self.handlers.dispatch_server_config(ServerCategory::History);
    }

    /// Broadcast a configuration change of a server
    pub fn notify_server_changed(&self, category: ServerCategory) {
        self.handlers.dispatch_server_config(category);
    }

    /// Push a tick into the price stream
    pub fn push_tick(&self, source: SourceId, tick: Tick) {
        self.handlers.dispatch_tick(source, &tick);
        // No observers is fine
        let _ = self.stream_tx.send(StreamTick { source, tick });
    }

    /// Push a quote from a data feed, stamped with the host clock
    pub fn feed_quote(&self, source: SourceId, symbol: &str, bid: f64, ask: f64) {
        let tick = Tick::new(symbol, bid, ask, self.clock.now());
        self.push_tick(source, tick);
    }

    /// Observe everything entering the price stream
    pub fn subscribe_stream(&self) -> broadcast::Receiver<StreamTick> {
        self.stream_tx.subscribe()
    }

    /// Feed submitted ticks back through the hub (on by default)
    pub fn set_loopback(&self, enabled: bool) {
        self.loopback.store(enabled, Ordering::SeqCst);
    }

    pub fn set_plugin_config_unavailable(&self, unavailable: bool) {
        self.faults
            .plugin_config_unavailable
            .store(unavailable, Ordering::SeqCst);
    }

    pub fn set_reject_ticks(&self, reject: bool) {
        self.faults.reject_ticks.store(reject, Ordering::SeqCst);
    }

    pub fn set_refuse_subscriptions(&self, refuse: bool) {
        self.faults
            .refuse_subscriptions
            .store(refuse, Ordering::SeqCst);
    }

    /// Every tick submitted so far
    pub fn submitted(&self) -> Vec<Tick> {
        self.submitted.lock().clone()
    }

    /// Drain the submitted ticks
    pub fn take_submitted(&self) -> Vec<Tick> {
        std::mem::take(&mut *self.submitted.lock())
    }

    pub fn subscription_count(&self) -> usize {
        self.handlers.len()
    }

    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    fn check_subscribe(&self) -> HostResult<()> {
        if self.faults.refuse_subscriptions.load(Ordering::SeqCst) {
            return Err(HostError::Subscribe("subscriptions refused".to_string()));
        }
        Ok(())
    }
}

impl Clock for SimulatedHost {
    fn now(&self) -> Timestamp {
        self.clock.now()
    }

    fn name(&self) -> &str {
        "SimulatedHost"
    }
}

impl TickSink for SimulatedHost {
    fn submit(&self, tick: &Tick) -> HostResult<()> {
        if self.faults.reject_ticks.load(Ordering::SeqCst) {
            return Err(HostError::TickRejected(tick.symbol.clone()));
        }

        self.submitted.lock().push(tick.clone());
        debug!("Tick added for [{}] bid={} ask={}", tick.symbol, tick.bid, tick.ask);

        if self.loopback.load(Ordering::SeqCst) {
            // The server stamps ticks added through the API with its own time
            let mut stamped = tick.clone();
            stamped.datetime = self.clock.now();
            self.push_tick(SourceId::DEALER, stamped);
        }
        Ok(())
    }
}

impl FeedRegistry for SimulatedHost {
    fn feed_name(&self, index: usize) -> HostResult<String> {
        self.feeds
            .read()
            .get(index)
            .cloned()
            .ok_or_else(|| HostError::NotFound(format!("feed #{}", index)))
    }
}

impl SymbolCatalog for SimulatedHost {
    fn digits(&self, symbol: &str) -> HostResult<u32> {
        self.digits
            .read()
            .get(symbol)
            .copied()
            .ok_or_else(|| HostError::NotFound(format!("symbol {}", symbol)))
    }
}

impl PluginConfigSource for SimulatedHost {
    fn current(&self) -> HostResult<PluginRecord> {
        if self.faults.plugin_config_unavailable.load(Ordering::SeqCst) {
            return Err(HostError::ConfigUnavailable("plugin".to_string()));
        }
        Ok(self.plugin.read().clone())
    }
}

impl ServerConfigSource for SimulatedHost {
    fn datafeeds_timeout(&self) -> HostResult<i64> {
        self.datafeeds_timeout
            .read()
            .ok_or_else(|| HostError::ConfigUnavailable("history server".to_string()))
    }
}

impl EventHub for SimulatedHost {
    fn subscribe_ticks(&self, handler: TickHandler) -> HostResult<SubscriptionId> {
        self.check_subscribe()?;
        Ok(self.handlers.add_tick(handler))
    }

    fn subscribe_plugin_config(
        &self,
        handler: PluginConfigHandler,
    ) -> HostResult<SubscriptionId> {
        self.check_subscribe()?;
        Ok(self.handlers.add_plugin_config(handler))
    }

    fn subscribe_server_config(
        &self,
        handler: ServerConfigHandler,
    ) -> HostResult<SubscriptionId> {
        self.check_subscribe()?;
        Ok(self.handlers.add_server_config(handler))
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.handlers.remove(id);
    }
}
