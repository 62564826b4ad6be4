//! Station groupings as published by NDBC.

use serde::{Deserialize, Serialize};

use super::StationId;

/// A named group of stations (an NDBC program such as
/// "NDBC Meteorological/Ocean" or "IOOS Partners").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    /// The provider's own name for the group.
    pub name: String,

    /// Stations in the order the provider listed them.
    pub stations: Vec<StationId>,
}

impl Source {
    /// Create a source from its name and station list.
    pub fn new(name: impl Into<String>, stations: Vec<StationId>) -> Self {
        Self {
            name: name.into(),
            stations,
        }
    }

    /// URL-safe alias for this source's name.
    pub fn alias(&self) -> String {
        alias_for(&self.name)
    }
}

/// Derive the URL path segment used to address a source.
///
/// Slashes and spaces become underscores; everything else is kept.
/// Distinct names can collide (`"A B"` and `"A/B"` both map to `"A_B"`).
pub fn alias_for(name: &str) -> String {
    name.chars()
        .map(|c| if c == '/' || c == ' ' { '_' } else { c })
        .collect()
}
