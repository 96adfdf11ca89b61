//! Error types for the engine crate

use nonstop_ports::HostError;
use thiserror::Error;

/// Errors that stop the engine from starting or stopping cleanly
///
/// Everything that happens while the engine runs (unknown symbols,
/// unresolvable feeds, missing symbol metadata) is handled locally and never
/// surfaces here.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Host service not provided: {0}")]
    MissingService(&'static str),

    #[error("Host error: {0}")]
    Host(#[from] HostError),

    #[error("Subscribing to host events failed: {0}")]
    Subscribe(HostError),

    #[error("No async runtime available for the rate generator")]
    NoRuntime,

    #[error("Rate generator task failed: {0}")]
    GeneratorTask(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
