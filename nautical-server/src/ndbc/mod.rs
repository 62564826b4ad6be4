//! NDBC (National Data Buoy Center) client.
//!
//! This module provides the upstream side of the cache: an HTTP client for
//! the NDBC station list and realtime observation files, plus a mock client
//! that serves the same data from local JSON.
//!
//! Key characteristics of NDBC:
//! - Stations are grouped by program (`pgm`), which this crate calls a source
//! - Observations are published roughly twice an hour and take a few
//!   minutes to settle after each half-hour mark
//! - A station may be listed as active yet have no realtime file (404)

mod client;
mod error;
mod mock;
mod parse;
mod upstream;

pub use client::{NdbcClient, NdbcConfig};
pub use error::NdbcError;
pub use mock::MockNdbcClient;
pub use parse::{parse_active_stations, parse_realtime};
pub use upstream::Upstream;
