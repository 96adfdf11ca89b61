//! Nonstop Rate Clocks
//!
//! Time sources for the rate continuity engine. All of them speak whole
//! seconds since the Unix epoch, the resolution of the trading server's
//! tick timestamps.
//!
//! - [`SystemClock`]: wall-clock time
//! - [`ManualClock`]: frozen time, moved explicitly by tests and simulations

mod manual;
mod system;

pub use manual::ManualClock;
pub use system::SystemClock;

// Re-export the Clock trait for convenience
pub use nonstop_ports::Clock;
