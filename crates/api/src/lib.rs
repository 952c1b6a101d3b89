//! Vistoria API server library.
//!
//! Exposes config, state, error handling and routes so the integration tests
//! and the binary entrypoint build the exact same application.

pub mod auth;
pub mod bootstrap;
pub mod config;
pub mod error;
pub mod export;
pub mod handlers;
pub mod middleware;
pub mod query;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
