//! Handlers for the random-team pool at `/tournaments/{id}/random-entries`
//! and for turning that pool into teams.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use tourney_core::error::CoreError;
use tourney_core::random_teams::{partition, random_team_name};
use tourney_core::types::DbId;
use tourney_db::models::random_entry::{NewRandomTeam, PlayerRandomTeamEntry};
use tourney_db::models::team_entry::TeamEntry;
use tourney_db::repositories::{RandomEntryRepo, TeamEntryRepo, TournamentRepo};

use crate::error::AppResult;
use crate::handlers::tournaments::{ensure_registration_open, load_tournament};
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::response::DataResponse;
use crate::state::AppState;

/// Result of `POST /tournaments/{id}/random-teams`.
#[derive(Debug, Serialize)]
pub struct FormedTeams {
    pub entries: Vec<TeamEntry>,
    /// Players left in the pool because no valid team could take them.
    pub unassigned: Vec<DbId>,
}

/// GET /api/v1/tournaments/{id}/random-entries
pub async fn list(
    State(state): State<AppState>,
    Path(tournament_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<PlayerRandomTeamEntry>>>> {
    load_tournament(&state.pool, tournament_id).await?;
    let entries = RandomEntryRepo::list_by_tournament(&state.pool, tournament_id).await?;
    Ok(Json(DataResponse { data: entries }))
}

/// POST /api/v1/tournaments/{id}/random-entries
///
/// The caller joins the pool. The tournament must allow random teams and
/// the caller must not already be registered in it.
pub async fn join(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(tournament_id): Path<DbId>,
) -> AppResult<(StatusCode, Json<DataResponse<PlayerRandomTeamEntry>>)> {
    let mut tx = state.pool.begin().await?;
    let tournament = TournamentRepo::lock(&mut tx, tournament_id)
        .await?
        .ok_or(CoreError::not_found("Tournament", tournament_id))?;

    if !tournament.allow_random_teams {
        return Err(CoreError::Conflict(format!(
            "Tournament {tournament_id} does not accept players without a team"
        ))
        .into());
    }
    ensure_registration_open(&tournament, Utc::now())?;

    let taken =
        TeamEntryRepo::registered_player_ids(&mut tx, tournament_id, &[user.user_id]).await?;
    if !taken.is_empty() {
        return Err(CoreError::Conflict(
            "You are already registered in this tournament".into(),
        )
        .into());
    }

    let entry = RandomEntryRepo::create_in_tx(&mut tx, tournament_id, user.user_id).await?;
    tx.commit().await?;

    tracing::info!(tournament_id, user_id = user.user_id, "Player joined random pool");
    Ok((StatusCode::CREATED, Json(DataResponse { data: entry })))
}

/// DELETE /api/v1/tournaments/{id}/random-entries/me
///
/// Runs under the tournament lock, so a concurrent team formation either
/// sees the player in the pool and places them, or never sees them.
pub async fn leave(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(tournament_id): Path<DbId>,
) -> AppResult<StatusCode> {
    let mut tx = state.pool.begin().await?;
    let tournament = TournamentRepo::lock(&mut tx, tournament_id)
        .await?
        .ok_or(CoreError::not_found("Tournament", tournament_id))?;
    ensure_registration_open(&tournament, Utc::now())?;

    if !RandomEntryRepo::delete(&mut tx, tournament_id, user.user_id).await? {
        return Err(CoreError::not_found("Random team entry", user.user_id).into());
    }
    tx.commit().await?;

    tracing::info!(tournament_id, user_id = user.user_id, "Player left random pool");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/tournaments/{id}/random-teams
///
/// Admin only, before the bracket exists. Shuffles the pool into teams
/// that fit the size bounds and the remaining `max_teams` capacity,
/// registers them, and leaves the rest in the pool.
pub async fn form_teams(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(tournament_id): Path<DbId>,
) -> AppResult<Json<DataResponse<FormedTeams>>> {
    let mut tx = state.pool.begin().await?;
    let tournament = TournamentRepo::lock(&mut tx, tournament_id)
        .await?
        .ok_or(CoreError::not_found("Tournament", tournament_id))?;

    if tournament.has_bracket() {
        return Err(CoreError::Conflict(format!(
            "The bracket for tournament {tournament_id} has already been generated"
        ))
        .into());
    }

    let pool_ids = RandomEntryRepo::pool_user_ids(&mut tx, tournament_id).await?;
    let team_cap = match tournament.max_teams {
        Some(max) => {
            let registered = TeamEntryRepo::count_by_tournament(&mut tx, tournament_id).await?;
            Some(usize::try_from(i64::from(max) - registered).unwrap_or(0))
        }
        None => None,
    };

    let split = partition(pool_ids, tournament.bounds(), team_cap, &mut rand::rng());

    let first = usize::try_from(tournament.random_teams_formed).unwrap_or(0) + 1;
    let new_teams: Vec<NewRandomTeam> = split
        .teams
        .into_iter()
        .enumerate()
        .map(|(i, player_ids)| NewRandomTeam {
            name: random_team_name(tournament_id, first + i),
            player_ids,
        })
        .collect();

    let entries = RandomEntryRepo::form_teams(&mut tx, tournament_id, &new_teams).await?;
    let formed = i32::try_from(new_teams.len())
        .map_err(|_| CoreError::Internal("Too many random teams in one run".into()))?;
    TournamentRepo::record_random_teams(&mut tx, tournament_id, formed).await?;
    tx.commit().await?;

    tracing::info!(
        tournament_id,
        user_id = admin.user_id,
        teams = entries.len(),
        unassigned = split.unassigned.len(),
        "Random teams formed"
    );

    Ok(Json(DataResponse {
        data: FormedTeams {
            entries,
            unassigned: split.unassigned,
        },
    }))
}
