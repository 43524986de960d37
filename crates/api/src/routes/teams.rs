//! Route definitions for the `/teams` resource.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::teams;
use crate::state::AppState;

/// Routes mounted at `/teams`.
///
/// ```text
/// GET    /                       -> list
/// POST   /                       -> create
/// GET    /mine                   -> list_mine
/// GET    /{id}                   -> get_by_id
/// PUT    /{id}                   -> update
/// POST   /{id}/admins            -> add_admin
/// DELETE /{id}/admins/{user_id}  -> remove_admin
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(teams::list).post(teams::create))
        .route("/mine", get(teams::list_mine))
        .route("/{id}", get(teams::get_by_id).put(teams::update))
        .route("/{id}/admins", post(teams::add_admin))
        .route("/{id}/admins/{user_id}", delete(teams::remove_admin))
}
