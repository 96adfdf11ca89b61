/// Server time in whole seconds since the Unix epoch
pub type Timestamp = i64;

/// Symbol identifier as configured on the trading server
pub type Symbol = String;

mod precision;
pub mod text;

pub use precision::Precision;
