//! Route definitions for the `/matches` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::matches;
use crate::state::AppState;

/// Routes mounted at `/matches`.
///
/// ```text
/// GET  /{id}         -> get_by_id
/// POST /{id}/result  -> report (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}", get(matches::get_by_id))
        .route("/{id}/result", post(matches::report))
}
