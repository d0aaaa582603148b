//! Handlers for deposition lifecycle operations.
//!
//! Every handler delegates to the session orchestrator; the only work
//! done here is extraction, authentication, and response shaping.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use depo_core::types::{DbId, Timestamp};
use depo_core::{JoinOutcome, Participant, Role, ScheduleRequest};
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/depositions
///
/// Schedule a new deposition with its initial participant roster.
pub async fn schedule(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(request): Json<ScheduleRequest>,
) -> AppResult<impl IntoResponse> {
    let deposition = state
        .orchestrator
        .schedule_deposition(&auth.actor(), request)
        .await?;

    tracing::info!(
        deposition_id = deposition.id,
        user_id = auth.user_id,
        "Deposition scheduled"
    );

    Ok(Json(DataResponse { data: deposition }))
}

/// GET /api/v1/depositions/{id}
pub async fn get_deposition(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(deposition_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let deposition = state
        .orchestrator
        .get_deposition(&auth.actor(), deposition_id)
        .await?;

    Ok(Json(DataResponse { data: deposition }))
}

#[derive(Debug, Deserialize)]
pub struct JoinRequest {
    pub participant_id: DbId,
}

/// Join outcome rendered for the client: either seated in the main
/// room or parked in the waiting room.
#[derive(Debug, Serialize)]
pub struct JoinResponse {
    pub outcome: &'static str,
    pub participant: Participant,
}

/// POST /api/v1/depositions/{id}/join
///
/// Deliberately unauthenticated: participants may be external guests
/// identified only by their participant record.
pub async fn join(
    State(state): State<AppState>,
    Path(deposition_id): Path<DbId>,
    Json(request): Json<JoinRequest>,
) -> AppResult<impl IntoResponse> {
    let outcome = state
        .orchestrator
        .join_deposition(deposition_id, request.participant_id)
        .await?;

    let response = match outcome {
        JoinOutcome::Admitted(participant) => JoinResponse {
            outcome: "admitted",
            participant,
        },
        JoinOutcome::Waiting(participant) => JoinResponse {
            outcome: "waiting",
            participant,
        },
    };

    Ok(Json(DataResponse { data: response }))
}

#[derive(Debug, Deserialize)]
pub struct OnRecordRequest {
    pub value: bool,
}

/// POST /api/v1/depositions/{id}/on-record
pub async fn set_on_record(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(deposition_id): Path<DbId>,
    Json(request): Json<OnRecordRequest>,
) -> AppResult<impl IntoResponse> {
    let deposition = state
        .orchestrator
        .set_on_record(&auth.actor(), deposition_id, request.value)
        .await?;

    Ok(Json(DataResponse { data: deposition }))
}

/// POST /api/v1/depositions/{id}/end
pub async fn end(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(deposition_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let deposition = state
        .orchestrator
        .end_deposition(&auth.actor(), deposition_id)
        .await?;

    tracing::info!(
        deposition_id,
        user_id = auth.user_id,
        "Deposition completed"
    );

    Ok(Json(DataResponse { data: deposition }))
}

/// POST /api/v1/depositions/{id}/cancel
pub async fn cancel(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(deposition_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let deposition = state
        .orchestrator
        .cancel_deposition(&auth.actor(), deposition_id)
        .await?;

    Ok(Json(DataResponse { data: deposition }))
}

/// POST /api/v1/depositions/{id}/revert-cancel
pub async fn revert_cancel(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(deposition_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let deposition = state
        .orchestrator
        .revert_cancel(&auth.actor(), deposition_id)
        .await?;

    Ok(Json(DataResponse { data: deposition }))
}

#[derive(Debug, Deserialize)]
pub struct RescheduleRequest {
    pub scheduled_start: Timestamp,
    pub scheduled_end: Option<Timestamp>,
    pub shared_document_id: Option<DbId>,
}

/// POST /api/v1/depositions/{id}/reschedule
pub async fn reschedule(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(deposition_id): Path<DbId>,
    Json(request): Json<RescheduleRequest>,
) -> AppResult<impl IntoResponse> {
    let deposition = state
        .orchestrator
        .reschedule_deposition(
            &auth.actor(),
            deposition_id,
            request.scheduled_start,
            request.scheduled_end,
            request.shared_document_id,
        )
        .await?;

    Ok(Json(DataResponse { data: deposition }))
}

#[derive(Debug, Deserialize)]
pub struct RoleChangeRequest {
    pub role: Role,
}

/// POST /api/v1/depositions/{id}/participants/{participant_id}/role
///
/// Change a participant's session role. Rejected once the deposition
/// has completed.
pub async fn set_participant_role(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((deposition_id, participant_id)): Path<(DbId, DbId)>,
    Json(request): Json<RoleChangeRequest>,
) -> AppResult<impl IntoResponse> {
    let participant = state
        .orchestrator
        .set_participant_role(&auth.actor(), deposition_id, participant_id, request.role)
        .await?;

    Ok(Json(DataResponse { data: participant }))
}

/// GET /api/v1/depositions/{id}/events
///
/// Activity timeline for audit display.
pub async fn list_events(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(deposition_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let events = state
        .orchestrator
        .list_events(&auth.actor(), deposition_id)
        .await?;

    Ok(Json(DataResponse { data: events }))
}
