mod rate_info;
mod source;
mod tick;

pub use rate_info::RateInfo;
pub use source::{SourceId, SourceKind};
pub use tick::{FAKE_MARKER, RESERVED_LEN, SYMBOL_LEN, Tick};
