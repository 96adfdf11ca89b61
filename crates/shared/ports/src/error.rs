use thiserror::Error;

/// Failures reported by the host server behind a port
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration unavailable: {0}")]
    ConfigUnavailable(String),

    #[error("Subscription failed: {0}")]
    Subscribe(String),

    #[error("Tick rejected: {0}")]
    TickRejected(String),
}

pub type HostResult<T> = std::result::Result<T, HostError>;
