//! Clock port for obtaining the current time.

use chrono::{DateTime, Utc};

/// Provides the current time.
///
/// The clock is the one source of non-determinism in the crate: relative
/// time tokens resolve against whatever `now()` returns. Production code
/// injects the wall clock; tests inject a fixed instant so resolution is
/// reproducible.
pub trait Clock: Send + Sync {
    /// Returns the current UTC time.
    fn now(&self) -> DateTime<Utc>;
}
