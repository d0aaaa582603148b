//! Handlers for the waiting-room admission queue.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use depo_core::types::DbId;
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/depositions/{id}/admission/pending
///
/// The waiting-room queue, in request order.
pub async fn list_pending(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(deposition_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let pending = state
        .orchestrator
        .list_pending_participants(&auth.actor(), deposition_id)
        .await?;

    Ok(Json(DataResponse { data: pending }))
}

#[derive(Debug, Deserialize)]
pub struct AdmissionDecision {
    pub admit: bool,
}

/// POST /api/v1/depositions/{id}/admission/{participant_id}
///
/// Admit or deny one waiting participant. A second decision for the
/// same participant returns 409.
pub async fn decide(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((deposition_id, participant_id)): Path<(DbId, DbId)>,
    Json(decision): Json<AdmissionDecision>,
) -> AppResult<impl IntoResponse> {
    let participant = state
        .orchestrator
        .decide_admission(&auth.actor(), deposition_id, participant_id, decision.admit)
        .await?;

    tracing::info!(
        deposition_id,
        participant_id,
        user_id = auth.user_id,
        admitted = decision.admit,
        "Admission decided"
    );

    Ok(Json(DataResponse { data: participant }))
}
