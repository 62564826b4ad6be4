//! Domain types for buoy station data.
//!
//! All types enforce their invariants at construction time, so code that
//! receives these types can trust their validity.

mod snapshot;
mod source;
mod station;

pub use snapshot::BuoySnapshot;
pub use source::{Source, alias_for};
pub use station::{InvalidStationId, StationId};
