//! Port traits defining external boundaries.
//!
//! The only boundary the core needs is time: everything else is a pure
//! transformation over its inputs. Implementations live in `src/adapters/`.

pub mod clock;

pub use clock::Clock;
