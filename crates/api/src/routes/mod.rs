pub mod depositions;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /depositions                                      schedule (POST)
/// /depositions/{id}                                 get (GET)
/// /depositions/{id}/join                            join or request admission (POST, public)
/// /depositions/{id}/on-record                       toggle the record (POST)
/// /depositions/{id}/end                             complete (POST)
/// /depositions/{id}/cancel                          cancel (POST)
/// /depositions/{id}/revert-cancel                   back to scheduled (POST)
/// /depositions/{id}/reschedule                      move the session (POST)
/// /depositions/{id}/participants/{pid}/role         change a session role (POST)
/// /depositions/{id}/events                          activity timeline (GET)
/// /depositions/{id}/permissions                     resolved actions for caller (GET)
/// /depositions/{id}/admission/pending               waiting-room queue (GET)
/// /depositions/{id}/admission/{participant_id}      admit or deny (POST)
/// /depositions/{id}/break-rooms                     list, create (GET, POST)
/// /depositions/{id}/break-rooms/{room_id}/lock      lock or unlock (POST)
/// /depositions/{id}/break-rooms/{room_id}/join      enter (POST, public)
/// /depositions/{id}/break-rooms/{room_id}/leave     exit (POST, public)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/depositions", depositions::router())
}
