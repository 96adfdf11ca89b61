//! Nonstop Host Simulator
//!
//! An in-memory stand-in for the trading server the rate engine plugs
//! into. It implements every host port and lets callers script the server
//! side: register feeds and symbols, change parameters, push quotes, and
//! switch on faults.
//!
//! ```text
//!   feed_quote / push_tick ──► HandlerRegistry ──► engine tick handler
//!                                   ▲                      │
//!                                   │ loopback (DEALER)    │ submit
//!                                   └──── SimulatedHost ◄──┘
//! ```

pub mod host;
pub mod hub;

pub use host::{SimulatedHost, StreamTick};
pub use hub::HandlerRegistry;
