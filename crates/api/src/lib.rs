//! HTTP surface of the deposition platform.
//!
//! Thin axum layer over the session orchestrator in `depo-core`:
//! handlers authenticate the caller, deserialize the request, delegate
//! to the orchestrator, and translate `CoreError` into JSON error
//! responses. No business rules live here.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod rooms;
pub mod router;
pub mod routes;
pub mod state;
