//! HTTP trigger surface for the tickerbeat ingestion pipeline.
//!
//! Exposed as a library so integration tests can build the router against
//! fake feed providers without touching the network.

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod main_lib;

pub use main_lib::{build_state, build_state_with, init_tracing, AppState};
