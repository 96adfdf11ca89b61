//! Nonstop Rate Engine
//!
//! Keeps the quote stream of configured symbols continuous when the primary
//! data feed goes quiet:
//!
//! - **Symbol State Store**: last genuine and last seen tick per symbol
//! - **Tick Classifier**: sorts incoming ticks into genuine primary feed
//!   quotes, our own synthetic ticks coming back, and everything else
//! - **Rate Generator**: every 500 ms, synthesizes a tick for each symbol
//!   that has been silent past the staleness timeout but not yet past the
//!   server's feed failover timeout
//! - **Configuration Reconciler**: turns the plugin's parameter list into
//!   an immutable configuration snapshot
//!
//! ## Architecture
//!
//! ```text
//!   host tick ──► on_tick ──► Classifier ──► SymbolStateStore ◄──┐
//!                                                 ▲              │ snapshot
//!   plugin / server config ──► Reconciler ────────┘              │
//!                                  │ publish                      │
//!                                  ▼                              │
//!                          ArcSwap<PluginConfig> ──► RateGenerator (500 ms)
//!                                                        │
//!                                                        ▼
//!                                              TickSink (FAKE marked)
//! ```

pub mod classifier;
pub mod config;
pub mod engine;
pub mod error;
pub mod generator;
pub mod services;
pub mod store;

// Re-export main types
pub use classifier::{TickDisposition, classify_and_apply};
pub use config::{PLUGIN_INFO, PluginConfig, PluginInfo, default_parameters};
pub use engine::{EngineCore, EngineOptions, RateEngine};
pub use error::{EngineError, Result};
pub use generator::{ADD_RATE_INTERVAL, Decision, PassReport, RateGenerator, evaluate};
pub use services::{HostServices, HostServicesBuilder};
pub use store::SymbolStateStore;
