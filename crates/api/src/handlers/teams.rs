//! Handlers for the `/teams` resource and its admin list.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use tourney_core::error::CoreError;
use tourney_core::roster::validate_team_name;
use tourney_core::types::DbId;
use tourney_db::models::team::{CreateTeam, Team, TeamDetail, UpdateTeam};
use tourney_db::repositories::{TeamEntryRepo, TeamRepo, UserRepo};
use tourney_db::DbPool;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AddAdminRequest {
    pub username: String,
}

pub(crate) async fn load_team(pool: &DbPool, id: DbId) -> AppResult<Team> {
    Ok(TeamRepo::find_by_id(pool, id)
        .await?
        .ok_or(CoreError::not_found("Team", id))?)
}

/// The caller must administer `team_id`. Site admins pass as well.
pub(crate) async fn ensure_team_admin(
    pool: &DbPool,
    team_id: DbId,
    user: &AuthUser,
) -> AppResult<()> {
    if user.is_admin() || TeamRepo::is_admin(pool, team_id, user.user_id).await? {
        return Ok(());
    }
    Err(CoreError::Forbidden(format!("You are not an admin of team {team_id}")).into())
}

async fn detail(pool: &DbPool, team: Team) -> AppResult<TeamDetail> {
    let admins = TeamRepo::list_admins(pool, team.id).await?;
    let tournament_entries = TeamEntryRepo::list_by_team(pool, team.id).await?;
    Ok(TeamDetail {
        team,
        admins,
        tournament_entries,
    })
}

/// GET /api/v1/teams
pub async fn list(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<Team>>>> {
    let teams = TeamRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: teams }))
}

/// GET /api/v1/teams/mine
///
/// Teams the caller administers.
pub async fn list_mine(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> AppResult<Json<DataResponse<Vec<Team>>>> {
    let teams = TeamRepo::list_administered_by(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse { data: teams }))
}

/// POST /api/v1/teams
///
/// The caller becomes the creator and first admin. Names with the
/// generated-team prefix are rejected.
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(input): Json<CreateTeam>,
) -> AppResult<(StatusCode, Json<DataResponse<TeamDetail>>)> {
    validate_team_name(&input.name)?;

    let team = TeamRepo::create(&state.pool, &input.name, user.user_id).await?;
    tracing::info!(team_id = team.id, user_id = user.user_id, "Team created");

    let data = detail(&state.pool, team).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data })))
}

/// GET /api/v1/teams/{id}
///
/// Includes admins and every tournament entry with its roster.
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<TeamDetail>>> {
    let team = load_team(&state.pool, id).await?;
    let data = detail(&state.pool, team).await?;
    Ok(Json(DataResponse { data }))
}

/// PUT /api/v1/teams/{id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTeam>,
) -> AppResult<Json<DataResponse<TeamDetail>>> {
    load_team(&state.pool, id).await?;
    ensure_team_admin(&state.pool, id, &user).await?;
    if let Some(name) = &input.name {
        validate_team_name(name)?;
    }

    let team = TeamRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(CoreError::not_found("Team", id))?;
    let data = detail(&state.pool, team).await?;
    Ok(Json(DataResponse { data }))
}

/// POST /api/v1/teams/{id}/admins
///
/// Grant admin rights to a user by username. Adding an existing admin is 409.
pub async fn add_admin(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<AddAdminRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<TeamDetail>>)> {
    let team = load_team(&state.pool, id).await?;
    ensure_team_admin(&state.pool, id, &user).await?;

    let new_admin = UserRepo::find_by_username(&state.pool, &input.username)
        .await?
        .filter(|u| u.is_active)
        .ok_or_else(|| {
            CoreError::Validation(format!("No active user named '{}'", input.username))
        })?;

    TeamRepo::add_admin(&state.pool, id, new_admin.id).await?;
    tracing::info!(team_id = id, user_id = new_admin.id, "Team admin added");

    let data = detail(&state.pool, team).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data })))
}

/// DELETE /api/v1/teams/{id}/admins/{user_id}
///
/// Admins may remove themselves or each other, but a team always keeps at
/// least one admin.
pub async fn remove_admin(
    State(state): State<AppState>,
    user: AuthUser,
    Path((id, admin_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    load_team(&state.pool, id).await?;
    ensure_team_admin(&state.pool, id, &user).await?;

    if !TeamRepo::is_admin(&state.pool, id, admin_id).await? {
        return Err(CoreError::not_found("Team admin", admin_id).into());
    }
    if !TeamRepo::remove_admin(&state.pool, id, admin_id).await? {
        return Err(CoreError::Conflict(format!(
            "User {admin_id} is the last admin of team {id} and cannot be removed"
        ))
        .into());
    }

    tracing::info!(team_id = id, user_id = admin_id, "Team admin removed");
    Ok(StatusCode::NO_CONTENT)
}
