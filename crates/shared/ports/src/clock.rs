use nonstop_core::Timestamp;

/// Server time, in whole seconds since the Unix epoch
///
/// Every staleness decision is made against this clock, never against the
/// machine the engine happens to run on, so that tick timestamps and "now"
/// come from the same source.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;

    /// Identifier used in logs
    fn name(&self) -> &str {
        "Clock"
    }
}
