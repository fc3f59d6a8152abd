//! HTTP read surface and process wiring for the market data snapshot service.

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod router;
pub mod state;
