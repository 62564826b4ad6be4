//! Buoy station identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Longest identifier NDBC has been seen to publish, with headroom.
const MAX_LEN: usize = 16;

/// Error returned when parsing an invalid station identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid station id: {reason}")]
pub struct InvalidStationId {
    reason: &'static str,
}

/// A valid NDBC station identifier (e.g. `41001`, `BURL1`).
///
/// Station ids are 1 to 16 ASCII letters or digits. NDBC publishes them in
/// mixed case depending on the feed, so they are normalized to uppercase on
/// parse; `burl1` and `BURL1` name the same station.
///
/// # Examples
///
/// ```
/// use nautical_server::domain::StationId;
///
/// let id = StationId::parse("burl1").unwrap();
/// assert_eq!(id.as_str(), "BURL1");
///
/// assert!(StationId::parse("").is_err());
/// assert!(StationId::parse("41 001").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StationId(String);

impl StationId {
    /// Parse a station id, normalizing it to uppercase.
    pub fn parse(s: &str) -> Result<Self, InvalidStationId> {
        if s.is_empty() {
            return Err(InvalidStationId {
                reason: "must not be empty",
            });
        }

        if s.len() > MAX_LEN {
            return Err(InvalidStationId {
                reason: "must be at most 16 characters",
            });
        }

        if !s.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return Err(InvalidStationId {
                reason: "must be ASCII letters or digits",
            });
        }

        Ok(StationId(s.to_ascii_uppercase()))
    }

    /// Returns the normalized id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for StationId {
    type Error = InvalidStationId;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        StationId::parse(&s)
    }
}

impl From<StationId> for String {
    fn from(id: StationId) -> Self {
        id.0
    }
}

impl fmt::Debug for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationId({})", self.0)
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
