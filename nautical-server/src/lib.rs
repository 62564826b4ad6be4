//! NDBC buoy cache server.
//!
//! Keeps an in-memory copy of the National Data Buoy Center station list,
//! refreshed twice an hour, and serves it with on-demand observations over
//! a small JSON API.

pub mod cache;
pub mod domain;
pub mod ndbc;
pub mod web;
