//! Simulation - Continuity engine on a simulated trading server
//!
//! Ties together:
//! - the simulated host with a primary and a backup feed
//! - the rate engine, started against the host's ports
//! - a quote feed that goes silent during the configured outages
//! - an observer logging every fake tick that reaches the price stream
//!
//! Simulated time runs on a manual clock, one second per `step_ms`.

use crate::config::RunnerConfig;
use crate::feed::QuoteFeedSimulator;
use nonstop_clock::{ManualClock, SystemClock};
use nonstop_core::{SourceId, Timestamp};
use nonstop_engine::{EngineOptions, HostServices, RateEngine};
use nonstop_host_sim::{SimulatedHost, StreamTick};
use nonstop_ports::{Clock, PluginIdentity};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;

/// What happened during a run
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    /// Simulated time of the first second
    pub started_at: Timestamp,
    /// Quotes published by the primary feed
    pub genuine_quotes: usize,
    /// Fake ticks the engine submitted, by symbol
    pub fake_by_symbol: BTreeMap<String, usize>,
    /// Elapsed simulated seconds of every fake tick, by symbol
    pub fake_times: BTreeMap<String, Vec<i64>>,
}

impl RunReport {
    pub fn fake_ticks(&self) -> usize {
        self.fake_by_symbol.values().sum()
    }
}

pub struct ContinuitySimulation {
    config: RunnerConfig,
    clock: Arc<ManualClock>,
    host: Arc<SimulatedHost>,
    primary: SourceId,
    backup: SourceId,
    primary_feed: QuoteFeedSimulator,
    backup_feed: QuoteFeedSimulator,
}

impl ContinuitySimulation {
    /// Set up the host: feeds, symbols, plugin parameters and the history
    /// server's failover timeout
    pub fn new(config: RunnerConfig) -> Self {
        let clock = ManualClock::new(SystemClock.now());
        let host = SimulatedHost::new(
            clock.clone(),
            PluginIdentity::new(config.plugin_name.clone(), 1),
        );

        let primary = host.add_feed(config.primary_feed.clone());
        let backup = host.add_feed(config.backup_feed.clone());
        for symbol in &config.symbols {
            host.set_digits(symbol.name.clone(), symbol.digits);
        }
        host.set_params(config.plugin_params());
        host.set_datafeeds_timeout(Some(config.failover_timeout));

        let feed = |offset: u64| match config.seed {
            Some(seed) => QuoteFeedSimulator::with_seed(
                &config.symbols,
                config.volatility,
                config.quote_probability,
                seed.wrapping_add(offset),
            ),
            None => QuoteFeedSimulator::new(
                &config.symbols,
                config.volatility,
                config.quote_probability,
            ),
        };
        let primary_feed = feed(1);
        let backup_feed = feed(2);

        Self {
            config,
            clock,
            host,
            primary,
            backup,
            primary_feed,
            backup_feed,
        }
    }

    pub fn host(&self) -> &Arc<SimulatedHost> {
        &self.host
    }

    /// Run the simulation to the end and stop the engine
    pub async fn run(mut self) -> nonstop_engine::Result<RunReport> {
        log::info!("Starting continuity simulation...");

        let engine = RateEngine::start(
            HostServices::from_host(self.host.clone()),
            EngineOptions {
                seed: self.config.seed,
                ..EngineOptions::default()
            },
        )?;

        let observer = tokio::spawn(observe_fakes(
            self.host.subscribe_stream(),
            self.clock.clone(),
        ));

        let mut report = RunReport {
            started_at: self.clock.now(),
            ..RunReport::default()
        };

        let mut ticker = tokio::time::interval(Duration::from_millis(self.config.step_ms.max(1)));
        let mut silent = false;

        for elapsed in 0..self.config.duration {
            ticker.tick().await;
            let now = report.started_at + elapsed;
            self.clock.set_time(now);

            let outage = self.config.in_outage(elapsed);
            if outage != silent {
                if outage {
                    log::warn!("Feed [{}] silent at +{}s", self.config.primary_feed, elapsed);
                } else {
                    log::info!("Feed [{}] back at +{}s", self.config.primary_feed, elapsed);
                }
                silent = outage;
            }

            if !outage {
                for tick in self.primary_feed.next_quotes(now) {
                    self.host.push_tick(self.primary, tick);
                    report.genuine_quotes += 1;
                }
            }
            for tick in self.backup_feed.next_quotes(now) {
                self.host.push_tick(self.backup, tick);
            }
        }

        log::info!("Simulation complete, shutting down...");
        engine.stop().await?;
        observer.abort();

        for tick in self.host.submitted() {
            *report.fake_by_symbol.entry(tick.symbol.clone()).or_default() += 1;
            report
                .fake_times
                .entry(tick.symbol)
                .or_default()
                .push(tick.datetime - report.started_at);
        }

        log::info!(
            "Simulation finished: {} genuine quotes, {} fake ticks",
            report.genuine_quotes,
            report.fake_ticks()
        );

        Ok(report)
    }
}

/// Log fake ticks as they reach the price stream
async fn observe_fakes(mut stream: broadcast::Receiver<StreamTick>, clock: Arc<ManualClock>) {
    loop {
        match stream.recv().await {
            Ok(StreamTick { source, tick }) if source.is_dealer() && tick.is_synthetic() => {
                log::info!(
                    "[{}] Fake rate on stream: {} bid={} ask={}",
                    clock.to_rfc3339(),
                    tick.symbol,
                    tick.bid,
                    tick.ask
                );
            }
            Ok(_) => {}
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                log::trace!("Stream observer skipped {} ticks", skipped);
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}
