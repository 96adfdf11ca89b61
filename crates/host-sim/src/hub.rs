//! Callback tables behind the simulated host's event hub

use nonstop_core::{SourceId, Tick};
use nonstop_ports::{
    PluginConfigHandler, PluginIdentity, ServerCategory, ServerConfigHandler, SubscriptionId,
    TickHandler,
};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Registered handlers, keyed by subscription id
///
/// Dispatch copies the handlers out before calling them, so a handler may
/// subscribe, unsubscribe or trigger another dispatch without deadlocking.
#[derive(Default)]
pub struct HandlerRegistry {
    next_id: AtomicU64,
    ticks: Mutex<BTreeMap<SubscriptionId, TickHandler>>,
    plugin_config: Mutex<BTreeMap<SubscriptionId, PluginConfigHandler>>,
    server_config: Mutex<BTreeMap<SubscriptionId, ServerConfigHandler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&self) -> SubscriptionId {
        self.next_id.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn add_tick(&self, handler: TickHandler) -> SubscriptionId {
        let id = self.next_id();
        self.ticks.lock().insert(id, handler);
        id
    }

    pub fn add_plugin_config(&self, handler: PluginConfigHandler) -> SubscriptionId {
        let id = self.next_id();
        self.plugin_config.lock().insert(id, handler);
        id
    }

    pub fn add_server_config(&self, handler: ServerConfigHandler) -> SubscriptionId {
        let id = self.next_id();
        self.server_config.lock().insert(id, handler);
        id
    }

    /// Remove a subscription; returns whether it existed
    pub fn remove(&self, id: SubscriptionId) -> bool {
        self.ticks.lock().remove(&id).is_some()
            || self.plugin_config.lock().remove(&id).is_some()
            || self.server_config.lock().remove(&id).is_some()
    }

    /// Total number of live subscriptions
    pub fn len(&self) -> usize {
        self.ticks.lock().len() + self.plugin_config.lock().len() + self.server_config.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn dispatch_tick(&self, source: SourceId, tick: &Tick) {
        let handlers: Vec<TickHandler> = self.ticks.lock().values().cloned().collect();
        for handler in handlers {
            handler(source, tick);
        }
    }

    pub fn dispatch_plugin_config(&self, plugin: &PluginIdentity) {
        let handlers: Vec<PluginConfigHandler> =
            self.plugin_config.lock().values().cloned().collect();
        for handler in handlers {
            handler(plugin);
        }
    }

    pub fn dispatch_server_config(&self, category: ServerCategory) {
        let handlers: Vec<ServerConfigHandler> =
            self.server_config.lock().values().cloned().collect();
        for handler in handlers {
            handler(category);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_dispatch_reaches_every_handler() {
        let registry = HandlerRegistry::new();
        let calls = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let calls = calls.clone();
            registry.add_tick(Arc::new(move |_source: SourceId, _tick: &Tick| {
                calls.fetch_add(1, Ordering::SeqCst);
            }));
        }

        registry.dispatch_tick(SourceId::DEALER, &Tick::new("EURUSD", 1.0, 1.0, 0));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_remove_stops_delivery() {
        let registry = HandlerRegistry::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let counter = calls.clone();
        let id = registry.add_server_config(Arc::new(move |_category: ServerCategory| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        assert!(registry.remove(id));
        assert!(!registry.remove(id));
        registry.dispatch_server_config(ServerCategory::History);

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_ids_are_unique_across_event_types() {
        let registry = HandlerRegistry::new();
        let a = registry.add_tick(Arc::new(|_: SourceId, _: &Tick| {}));
        let b = registry.add_plugin_config(Arc::new(|_: &PluginIdentity| {}));
        let c = registry.add_server_config(Arc::new(|_: ServerCategory| {}));

        assert!(a != b && b != c && a != c);
        assert_eq!(registry.len(), 3);
    }
}
