//! Nonstop Runner - Rate continuity on a simulated server
//!
//! Runs the rate engine against the in-memory host and a scripted primary
//! feed that drops out for a while:
//!
//! - **Config**: runner settings, loadable from JSON
//! - **Feed**: random walk quotes for the configured symbols
//! - **Simulation**: host setup, feed loop and engine lifecycle
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────┐   quotes    ┌─────────────────┐   ticks   ┌──────────────┐
//!   │ Primary feed │ ──────────► │  SimulatedHost  │ ────────► │  RateEngine  │
//!   │ (outages)    │             │  (event hub)    │ ◄──────── │  (generator) │
//!   └──────────────┘             └────────┬────────┘  fakes    └──────────────┘
//!   ┌──────────────┐   quotes             │
//!   │ Backup feed  │ ─────────────────────┘ stream
//!   └──────────────┘                      ▼
//!                                  fake tick observer
//! ```

pub mod config;
pub mod feed;
pub mod simulation;

pub use config::{ConfigError, Outage, RunnerConfig, SymbolConfig};
pub use feed::QuoteFeedSimulator;
pub use simulation::{ContinuitySimulation, RunReport};
