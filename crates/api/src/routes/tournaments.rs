//! Route definitions for the `/tournaments` resource.
//!
//! Registration, the random pool, the bracket and the match list all hang
//! off `/tournaments/{id}/...`.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::{bracket, entries, matches, random_entries, tournaments};
use crate::state::AppState;

/// Routes mounted at `/tournaments`.
///
/// ```text
/// GET    /                              -> list
/// POST   /                              -> create
/// GET    /{id}                          -> get_by_id
/// PUT    /{id}                          -> update
///
/// GET    /{id}/entries                  -> entries::list
/// POST   /{id}/entries                  -> entries::create
/// DELETE /{id}/entries/{entry_id}       -> entries::delete
///
/// GET    /{id}/random-entries           -> random_entries::list
/// POST   /{id}/random-entries           -> random_entries::join
/// DELETE /{id}/random-entries/me        -> random_entries::leave
/// POST   /{id}/random-teams             -> random_entries::form_teams
///
/// GET    /{id}/bracket                  -> bracket::get
/// POST   /{id}/bracket                  -> bracket::generate
/// GET    /{id}/matches                  -> matches::list_by_tournament
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(tournaments::list).post(tournaments::create))
        .route(
            "/{id}",
            get(tournaments::get_by_id).put(tournaments::update),
        )
        .route("/{id}/entries", get(entries::list).post(entries::create))
        .route("/{id}/entries/{entry_id}", delete(entries::delete))
        .route(
            "/{id}/random-entries",
            get(random_entries::list).post(random_entries::join),
        )
        .route("/{id}/random-entries/me", delete(random_entries::leave))
        .route("/{id}/random-teams", post(random_entries::form_teams))
        .route("/{id}/bracket", get(bracket::get).post(bracket::generate))
        .route("/{id}/matches", get(matches::list_by_tournament))
}
