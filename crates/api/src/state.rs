use std::sync::Arc;

use depo_core::SessionOrchestrator;

use crate::config::ServerConfig;

/// Shared application state available to all axum handlers via
/// `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: depo_db::DbPool,
    /// Server configuration (accessed by middleware and handlers).
    pub config: Arc<ServerConfig>,
    /// Session orchestrator, the single entry point for all deposition
    /// operations.
    pub orchestrator: Arc<SessionOrchestrator>,
}
