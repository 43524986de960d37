//! Handlers for team registrations at `/tournaments/{id}/entries`.

use std::collections::BTreeSet;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use tourney_core::error::CoreError;
use tourney_core::types::DbId;
use tourney_db::models::team_entry::{CreateTeamEntry, TeamEntryWithPlayers};
use tourney_db::repositories::{TeamEntryRepo, TournamentRepo, UserRepo};

use crate::error::AppResult;
use crate::handlers::teams::{ensure_team_admin, load_team};
use crate::handlers::tournaments::{ensure_registration_open, load_tournament};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/tournaments/{id}/entries
///
/// Entries in seeding order with team names and player usernames.
pub async fn list(
    State(state): State<AppState>,
    Path(tournament_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<TeamEntryWithPlayers>>>> {
    load_tournament(&state.pool, tournament_id).await?;
    let entries = TeamEntryRepo::list_by_tournament(&state.pool, tournament_id).await?;
    Ok(Json(DataResponse { data: entries }))
}

/// POST /api/v1/tournaments/{id}/entries
///
/// A team admin registers the team with a roster. The roster must fit the
/// tournament's team size bounds, name only active users, and not include
/// anyone already registered in this tournament, on a roster or in the
/// random-team pool. Only site admins may set a seed.
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Path(tournament_id): Path<DbId>,
    Json(input): Json<CreateTeamEntry>,
) -> AppResult<(StatusCode, Json<DataResponse<TeamEntryWithPlayers>>)> {
    let tournament = load_tournament(&state.pool, tournament_id).await?;
    load_team(&state.pool, input.team_id).await?;
    ensure_team_admin(&state.pool, input.team_id, &user).await?;

    if let Some(seed) = input.seed {
        if !user.is_admin() {
            return Err(CoreError::Forbidden("Only admins may assign seeds".into()).into());
        }
        if seed < 1 {
            return Err(
                CoreError::Validation(format!("seed must be at least 1, got {seed}")).into(),
            );
        }
    }

    tournament.bounds().check_roster(&input.player_ids)?;

    let mut players = UserRepo::find_active_summaries(&state.pool, &input.player_ids).await?;
    if players.len() != input.player_ids.len() {
        let known: BTreeSet<DbId> = players.iter().map(|p| p.id).collect();
        let unknown: Vec<String> = input
            .player_ids
            .iter()
            .filter(|id| !known.contains(id))
            .map(ToString::to_string)
            .collect();
        return Err(CoreError::Validation(format!(
            "Unknown or inactive players: {}",
            unknown.join(", ")
        ))
        .into());
    }

    let mut tx = state.pool.begin().await?;
    let tournament = TournamentRepo::lock(&mut tx, tournament.id)
        .await?
        .ok_or(CoreError::not_found("Tournament", tournament_id))?;
    ensure_registration_open(&tournament, Utc::now())?;

    let taken =
        TeamEntryRepo::registered_player_ids(&mut tx, tournament_id, &input.player_ids).await?;
    if !taken.is_empty() {
        let ids: Vec<String> = taken.iter().map(ToString::to_string).collect();
        return Err(CoreError::Conflict(format!(
            "Players already registered in this tournament: {}",
            ids.join(", ")
        ))
        .into());
    }

    if let Some(max_teams) = tournament.max_teams {
        let count = TeamEntryRepo::count_by_tournament(&mut tx, tournament_id).await?;
        if count >= i64::from(max_teams) {
            return Err(CoreError::Conflict(format!(
                "Tournament {tournament_id} is full ({max_teams} teams)"
            ))
            .into());
        }
    }

    let entry = TeamEntryRepo::create_in_tx(
        &mut tx,
        tournament_id,
        input.team_id,
        &input.player_ids,
        input.seed,
    )
    .await?;
    tx.commit().await?;

    tracing::info!(
        tournament_id,
        team_id = entry.team_id,
        entry_id = entry.id,
        players = players.len(),
        "Team registered"
    );

    players.sort_by(|a, b| a.username.cmp(&b.username));
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: TeamEntryWithPlayers { entry, players },
        }),
    ))
}

/// DELETE /api/v1/tournaments/{id}/entries/{entry_id}
///
/// Withdraw a team. Site admins may do so until the bracket is generated;
/// team admins only while registration is open.
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path((tournament_id, entry_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    load_tournament(&state.pool, tournament_id).await?;
    let entry = TeamEntryRepo::find_by_id(&state.pool, entry_id)
        .await?
        .filter(|e| e.tournament_id == tournament_id)
        .ok_or(CoreError::not_found("Team entry", entry_id))?;

    ensure_team_admin(&state.pool, entry.team_id, &user).await?;

    let mut tx = state.pool.begin().await?;
    let tournament = TournamentRepo::lock(&mut tx, tournament_id)
        .await?
        .ok_or(CoreError::not_found("Tournament", tournament_id))?;
    if user.is_admin() {
        if tournament.has_bracket() {
            return Err(CoreError::Conflict(
                "Entries cannot be withdrawn after the bracket is generated".into(),
            )
            .into());
        }
    } else {
        ensure_registration_open(&tournament, Utc::now())?;
    }

    if !TeamEntryRepo::delete(&mut tx, entry_id).await? {
        return Err(CoreError::not_found("Team entry", entry_id).into());
    }
    tx.commit().await?;

    tracing::info!(tournament_id, entry_id, user_id = user.user_id, "Team entry withdrawn");
    Ok(StatusCode::NO_CONTENT)
}
