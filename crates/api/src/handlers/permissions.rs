//! Handler exposing resolved permissions for UI gating.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use depo_core::action::ResourceType;
use depo_core::types::DbId;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/depositions/{id}/permissions
///
/// The actions the caller may perform on this deposition. The frontend
/// uses this to show or hide controls; the backend re-checks on every
/// mutation regardless.
pub async fn resolve_for_deposition(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(deposition_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let actions = state
        .orchestrator
        .resolve_permissions(&auth.actor(), ResourceType::Deposition, deposition_id)
        .await?;

    // Stable order for clients and tests.
    let mut actions: Vec<_> = actions.into_iter().collect();
    actions.sort_by_key(|a| a.as_str());

    Ok(Json(DataResponse { data: actions }))
}
