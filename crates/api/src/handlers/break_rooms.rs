//! Handlers for break-room management.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use depo_core::types::DbId;
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateBreakRoomRequest {
    pub name: String,
}

/// POST /api/v1/depositions/{id}/break-rooms
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(deposition_id): Path<DbId>,
    Json(request): Json<CreateBreakRoomRequest>,
) -> AppResult<impl IntoResponse> {
    let room = state
        .orchestrator
        .create_break_room(&auth.actor(), deposition_id, &request.name)
        .await?;

    tracing::info!(
        deposition_id,
        room_id = room.id,
        user_id = auth.user_id,
        "Break room created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: room })))
}

/// GET /api/v1/depositions/{id}/break-rooms
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(deposition_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let rooms = state
        .orchestrator
        .list_break_rooms(&auth.actor(), deposition_id)
        .await?;

    Ok(Json(DataResponse { data: rooms }))
}

#[derive(Debug, Deserialize)]
pub struct LockRequest {
    pub locked: bool,
}

/// POST /api/v1/depositions/{id}/break-rooms/{room_id}/lock
pub async fn lock(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((deposition_id, room_id)): Path<(DbId, DbId)>,
    Json(request): Json<LockRequest>,
) -> AppResult<impl IntoResponse> {
    let room = state
        .orchestrator
        .lock_break_room(&auth.actor(), deposition_id, room_id, request.locked)
        .await?;

    Ok(Json(DataResponse { data: room }))
}

#[derive(Debug, Deserialize)]
pub struct MembershipRequest {
    pub participant_id: DbId,
}

/// POST /api/v1/depositions/{id}/break-rooms/{room_id}/join
///
/// Unauthenticated, keyed by participant record, matching the main
/// join endpoint.
pub async fn join(
    State(state): State<AppState>,
    Path((deposition_id, room_id)): Path<(DbId, DbId)>,
    Json(request): Json<MembershipRequest>,
) -> AppResult<impl IntoResponse> {
    let room = state
        .orchestrator
        .join_break_room(deposition_id, room_id, request.participant_id)
        .await?;

    Ok(Json(DataResponse { data: room }))
}

/// POST /api/v1/depositions/{id}/break-rooms/{room_id}/leave
pub async fn leave(
    State(state): State<AppState>,
    Path((deposition_id, room_id)): Path<(DbId, DbId)>,
    Json(request): Json<MembershipRequest>,
) -> AppResult<impl IntoResponse> {
    state
        .orchestrator
        .leave_break_room(deposition_id, room_id, request.participant_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
