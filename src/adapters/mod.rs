//! Adapter implementations of the port traits.

pub mod clock;

pub use clock::{FixedClock, LiveClock};
