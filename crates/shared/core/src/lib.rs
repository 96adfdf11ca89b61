//! Nonstop Rate Core Domain
//!
//! Pure domain types for the rate continuity engine: ticks as exchanged with
//! the trading server, their sources, and the per-symbol continuity state.
//! This crate contains no async, no I/O, and is 100% unit testable.

pub mod entities;
pub mod values;

// Re-export commonly used types at crate root
pub use entities::{FAKE_MARKER, RESERVED_LEN, RateInfo, SYMBOL_LEN, SourceId, SourceKind, Tick};
pub use values::{Precision, Symbol, Timestamp, text};
