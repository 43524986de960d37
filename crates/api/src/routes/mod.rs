pub mod auth;
pub mod health;
pub mod matches;
pub mod teams;
pub mod tournaments;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                                   register (public)
/// /auth/login                                      login (public)
/// /auth/refresh                                    refresh (public)
/// /auth/logout                                     logout (requires auth)
/// /auth/me                                         current user
///
/// /tournaments                                     list, create (admin)
/// /tournaments/{id}                                get, update (admin)
/// /tournaments/{id}/entries                        list, register a team
/// /tournaments/{id}/entries/{entry_id}             withdraw
/// /tournaments/{id}/random-entries                 list, join pool
/// /tournaments/{id}/random-entries/me              leave pool
/// /tournaments/{id}/random-teams                   form teams from pool (admin)
/// /tournaments/{id}/bracket                        get, generate (admin)
/// /tournaments/{id}/matches                        list
///
/// /teams                                           list, create
/// /teams/mine                                      teams the caller administers
/// /teams/{id}                                      get, update
/// /teams/{id}/admins                               add admin
/// /teams/{id}/admins/{user_id}                     remove admin
///
/// /matches/{id}                                    get
/// /matches/{id}/result                             report result (admin)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/tournaments", tournaments::router())
        .nest("/teams", teams::router())
        .nest("/matches", matches::router())
}
