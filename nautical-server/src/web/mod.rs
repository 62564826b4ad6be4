//! HTTP API over the buoy cache.
//!
//! Read-only JSON endpoints for listing sources and stations and fetching
//! the latest observation of a station.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::create_router;
pub use state::{AppState, RefreshStatus};
