//! Route definitions for deposition sessions.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{admission, break_rooms, depositions, permissions};
use crate::state::AppState;

/// Deposition routes mounted at `/depositions`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(depositions::schedule))
        .route("/{id}", get(depositions::get_deposition))
        .route("/{id}/join", post(depositions::join))
        .route("/{id}/on-record", post(depositions::set_on_record))
        .route("/{id}/end", post(depositions::end))
        .route("/{id}/cancel", post(depositions::cancel))
        .route("/{id}/revert-cancel", post(depositions::revert_cancel))
        .route("/{id}/reschedule", post(depositions::reschedule))
        .route(
            "/{id}/participants/{participant_id}/role",
            post(depositions::set_participant_role),
        )
        .route("/{id}/events", get(depositions::list_events))
        .route("/{id}/permissions", get(permissions::resolve_for_deposition))
        .route("/{id}/admission/pending", get(admission::list_pending))
        .route("/{id}/admission/{participant_id}", post(admission::decide))
        .route(
            "/{id}/break-rooms",
            get(break_rooms::list).post(break_rooms::create),
        )
        .route("/{id}/break-rooms/{room_id}/lock", post(break_rooms::lock))
        .route("/{id}/break-rooms/{room_id}/join", post(break_rooms::join))
        .route("/{id}/break-rooms/{room_id}/leave", post(break_rooms::leave))
}
