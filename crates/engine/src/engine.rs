//! Engine lifecycle and host callbacks
//!
//! [`RateEngine::start`] reads the configuration, registers the host
//! callbacks and spawns the generator task; [`RateEngine::stop`] undoes all
//! of it and only returns once the generator task has exited.
//!
//! Two locks keep the shared state consistent:
//! - the store's own mutex, taken for every read-modify-write of an entry
//! - the generator lock, held for a whole generator pass and by every
//!   reconfiguration, so a reload never swaps the symbol set under a pass
//!
//! They are always taken in that order (generator lock first). The store
//! lock is never held across a host call, so a host that feeds submitted
//! ticks straight back into `on_tick` cannot deadlock a pass.

use crate::classifier::{TickDisposition, classify_and_apply};
use crate::config::PluginConfig;
use crate::error::{EngineError, Result};
use crate::generator::{ADD_RATE_INTERVAL, PassReport, RateGenerator};
use crate::services::HostServices;
use crate::store::SymbolStateStore;
use arc_swap::ArcSwap;
use log::{debug, error, info};
use nonstop_core::{RateInfo, SourceId, Tick};
use nonstop_ports::{EventHub, PluginIdentity, PluginRecord, ServerCategory, SubscriptionId};
use parking_lot::Mutex;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Runtime options that are not plugin parameters
#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// Time between generator passes
    pub interval: Duration,
    /// Seed for the perturbation RNG; entropy when `None`
    pub seed: Option<u64>,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            interval: ADD_RATE_INTERVAL,
            seed: None,
        }
    }
}

/// State shared between the host callbacks and the generator task
pub struct EngineCore {
    services: HostServices,
    identity: PluginIdentity,
    store: SymbolStateStore,
    config: ArcSwap<PluginConfig>,
    generator_lock: Mutex<()>,
}

impl EngineCore {
    /// Core with an empty store and default configuration
    pub fn new(services: HostServices, identity: PluginIdentity) -> Self {
        Self {
            services,
            identity,
            store: SymbolStateStore::new(),
            config: ArcSwap::from_pointee(PluginConfig::default()),
            generator_lock: Mutex::new(()),
        }
    }

    pub fn identity(&self) -> &PluginIdentity {
        &self.identity
    }

    /// Latest published configuration
    pub fn config(&self) -> Arc<PluginConfig> {
        self.config.load_full()
    }

    pub fn store(&self) -> &SymbolStateStore {
        &self.store
    }

    pub fn rate_info(&self, symbol: &str) -> Option<RateInfo> {
        self.store.get(symbol)
    }

    /// Host callback: a tick entered the price stream
    pub fn on_tick(&self, source: SourceId, tick: &Tick) -> TickDisposition {
        let config = self.config.load();
        let disposition =
            classify_and_apply(source, tick, &self.store, &config, self.services.feeds.as_ref());

        match disposition {
            TickDisposition::SyntheticFeedback { .. } => debug!(
                "Received fake rate for [{}] with bid={}, ask={}, feeder_index={}",
                tick.symbol, tick.bid, tick.ask, source
            ),
            TickDisposition::IgnoredNonFeed => {
                debug!("Tick is not from feeder, index={}", source)
            }
            _ => {}
        }

        disposition
    }

    /// Host callback: some plugin's configuration changed
    ///
    /// The notification goes to every plugin, so only our own identity
    /// triggers a reload.
    pub fn on_plugin_config_changed(&self, plugin: &PluginIdentity) {
        debug!(
            "Plugin config changed: plugin_name={}, config_name={}",
            plugin.name, self.identity.name
        );
        if *plugin == self.identity {
            self.reload_plugin_parameters();
        }
    }

    /// Host callback: a server's configuration changed
    ///
    /// Only the history server carries the feed failover timeout.
    pub fn on_server_config_changed(&self, category: ServerCategory) {
        if category == ServerCategory::History {
            info!("Update history server configuration");
            self.refresh_server_parameters();
        }
    }

    /// Re-read our parameters from the host and rebuild the store
    ///
    /// If the host cannot provide them the previous configuration stays.
    pub fn reload_plugin_parameters(&self) {
        match self.services.plugin_config.current() {
            Ok(record) => self.apply_plugin_record(&record),
            Err(e) => error!("Get current plugin config failed: {}", e),
        }
    }

    /// Reconcile `record` into a new configuration and publish it
    pub fn apply_plugin_record(&self, record: &PluginRecord) {
        let _pass = self.generator_lock.lock();

        let next = self.config.load().reconcile(&record.params);
        self.store.reset(next.symbols.iter().cloned());

        info!(
            "Read parameters (v{}): timeout={}, feeder={}, symbols={}",
            next.version,
            next.timeout,
            next.primary_feed_name,
            next.symbol_list()
        );
        self.config.store(Arc::new(next));
    }

    /// Re-read the feed failover timeout from the server configuration
    ///
    /// If the host cannot provide it the previous value stays.
    pub fn refresh_server_parameters(&self) {
        let timeout = match self.services.server_config.datafeeds_timeout() {
            Ok(timeout) => timeout,
            Err(e) => {
                error!("Get server config failed: {}", e);
                return;
            }
        };

        let _pass = self.generator_lock.lock();
        let next = self.config.load().with_failover_timeout(timeout);
        info!(
            "Feeder switch timeout is {}s (v{})",
            next.feeder_failover_timeout, next.version
        );
        self.config.store(Arc::new(next));
    }

    /// One generator pass over every tracked symbol
    pub fn generate(&self, generator: &mut RateGenerator) -> PassReport {
        let _pass = self.generator_lock.lock();
        let config = self.config.load();
        generator.run_pass(&self.store, &config, &self.services)
    }

    /// Forget all symbols and go back to the default configuration
    fn reset(&self) {
        let _pass = self.generator_lock.lock();
        self.store.clear();
        self.config.store(Arc::new(PluginConfig::default()));
    }
}

/// Host subscriptions, cancelled together when dropped
struct Subscriptions {
    events: Arc<dyn EventHub>,
    ids: Vec<SubscriptionId>,
}

impl Subscriptions {
    fn new(events: Arc<dyn EventHub>) -> Self {
        Self {
            events,
            ids: Vec::new(),
        }
    }

    fn release(&mut self) {
        for id in self.ids.drain(..) {
            self.events.unsubscribe(id);
        }
    }
}

impl Drop for Subscriptions {
    fn drop(&mut self) {
        self.release();
    }
}

/// A running rate continuity engine
pub struct RateEngine {
    core: Arc<EngineCore>,
    subscriptions: Subscriptions,
    shutdown_tx: watch::Sender<bool>,
    generator: JoinHandle<()>,
}

impl RateEngine {
    /// Start the engine inside the current tokio runtime
    ///
    /// Fails when the host cannot tell us who we are, when a subscription is
    /// refused, or when called outside a runtime. Nothing stays registered
    /// with the host after a failed start.
    pub fn start(services: HostServices, options: EngineOptions) -> Result<Self> {
        info!("Plugin start!");

        let runtime = tokio::runtime::Handle::try_current().map_err(|_| EngineError::NoRuntime)?;
        let record = services.plugin_config.current()?;
        debug!("Server time from {}", services.clock.name());

        let core = Arc::new(EngineCore::new(services.clone(), record.identity.clone()));
        core.apply_plugin_record(&record);
        core.refresh_server_parameters();

        let subscriptions = Self::subscribe(&core, services.events.clone())?;

        let generator = match options.seed {
            Some(seed) => RateGenerator::with_seed(seed),
            None => RateGenerator::new(),
        };
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = runtime.spawn(run_generator(
            core.clone(),
            generator,
            options.interval,
            shutdown_rx,
        ));

        Ok(Self {
            core,
            subscriptions,
            shutdown_tx,
            generator: handle,
        })
    }

    /// Register the three host callbacks
    ///
    /// Handlers hold a weak reference: the host keeps them, and the core
    /// keeps the host, so a strong one would never be freed.
    fn subscribe(core: &Arc<EngineCore>, events: Arc<dyn EventHub>) -> Result<Subscriptions> {
        let mut subscriptions = Subscriptions::new(events.clone());

        let weak: Weak<EngineCore> = Arc::downgrade(core);
        let id = events
            .subscribe_ticks(Arc::new(move |source: SourceId, tick: &Tick| {
                if let Some(core) = weak.upgrade() {
                    core.on_tick(source, tick);
                }
            }))
            .map_err(EngineError::Subscribe)?;
        subscriptions.ids.push(id);

        let weak = Arc::downgrade(core);
        let id = events
            .subscribe_plugin_config(Arc::new(move |plugin: &PluginIdentity| {
                if let Some(core) = weak.upgrade() {
                    core.on_plugin_config_changed(plugin);
                }
            }))
            .map_err(EngineError::Subscribe)?;
        subscriptions.ids.push(id);

        let weak = Arc::downgrade(core);
        let id = events
            .subscribe_server_config(Arc::new(move |category: ServerCategory| {
                if let Some(core) = weak.upgrade() {
                    core.on_server_config_changed(category);
                }
            }))
            .map_err(EngineError::Subscribe)?;
        subscriptions.ids.push(id);

        Ok(subscriptions)
    }

    pub fn core(&self) -> &Arc<EngineCore> {
        &self.core
    }

    pub fn config(&self) -> Arc<PluginConfig> {
        self.core.config()
    }

    pub fn rate_info(&self, symbol: &str) -> Option<RateInfo> {
        self.core.rate_info(symbol)
    }

    /// Stop the engine
    ///
    /// Returns only after the generator task has exited, so nothing touches
    /// the host once this resolves.
    pub async fn stop(self) -> Result<()> {
        let RateEngine {
            core,
            mut subscriptions,
            shutdown_tx,
            generator,
        } = self;

        info!("Plugin stop!");
        subscriptions.release();

        // Receiver may already be gone if the task ended on its own
        let _ = shutdown_tx.send(true);
        let joined = generator.await;

        core.reset();
        joined.map_err(|e| EngineError::GeneratorTask(e.to_string()))
    }
}

/// Generator task: one pass per interval until shutdown is signalled
async fn run_generator(
    core: Arc<EngineCore>,
    mut generator: RateGenerator,
    interval: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    info!("AddRate thread start ({}ms interval)", interval.as_millis());

    // First pass one full interval after start
    let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
            _ = ticker.tick() => {
                let report = core.generate(&mut generator);
                if !report.emitted.is_empty() {
                    debug!("Generator pass emitted {} fake rate(s)", report.emitted_count());
                }
            }
        }
    }

    info!("AddRate thread stop.");
}
