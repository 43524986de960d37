//! Handlers for the `/tournaments` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use tourney_core::bracket::{Format, TEAMS_PER_MATCH};
use tourney_core::error::CoreError;
use tourney_core::roster::{validate_best_of, validate_max_teams, validate_name, TeamSizeBounds};
use tourney_core::schedule::{Phase, Schedule};
use tourney_core::types::{DbId, Timestamp};
use tourney_db::models::tournament::{CreateTournament, Tournament, UpdateTournament};
use tourney_db::repositories::TournamentRepo;
use tourney_db::DbPool;

use crate::error::AppResult;
use crate::middleware::rbac::RequireAdmin;
use crate::query::PhaseParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// A tournament with the fields derived from its schedule at request time.
#[derive(Debug, Serialize)]
pub struct TournamentResponse {
    #[serde(flatten)]
    pub tournament: Tournament,
    pub format: Format,
    pub phase: Phase,
    /// Sign-ups accepted right now: inside the window and no bracket yet.
    pub registration_open: bool,
    pub min_teams_per_match: i32,
    pub max_teams_per_match: i32,
}

impl TournamentResponse {
    pub fn at(tournament: Tournament, now: Timestamp) -> Result<Self, CoreError> {
        let schedule = tournament.schedule();
        Ok(Self {
            format: tournament.format()?,
            phase: schedule.phase_at(now),
            registration_open: accepts_registrations(&tournament, now),
            min_teams_per_match: TEAMS_PER_MATCH,
            max_teams_per_match: TEAMS_PER_MATCH,
            tournament,
        })
    }
}

// ---------------------------------------------------------------------------
// Shared guards
// ---------------------------------------------------------------------------

pub(crate) fn accepts_registrations(tournament: &Tournament, now: Timestamp) -> bool {
    tournament.schedule().registration_open_at(now) && !tournament.has_bracket()
}

/// Entries and pool changes are only allowed while registration is open and
/// before the bracket is drawn.
pub(crate) fn ensure_registration_open(
    tournament: &Tournament,
    now: Timestamp,
) -> Result<(), CoreError> {
    if tournament.has_bracket() {
        return Err(CoreError::Conflict(format!(
            "The bracket for tournament {} has already been generated",
            tournament.id
        )));
    }
    if !tournament.schedule().registration_open_at(now) {
        return Err(CoreError::Conflict(format!(
            "Registration for tournament {} is closed",
            tournament.id
        )));
    }
    Ok(())
}

pub(crate) async fn load_tournament(pool: &DbPool, id: DbId) -> AppResult<Tournament> {
    Ok(TournamentRepo::find_by_id(pool, id)
        .await?
        .ok_or(CoreError::not_found("Tournament", id))?)
}

/// Validate every setting of a tournament as it would be stored.
fn validate_settings(
    name: &str,
    schedule: &Schedule,
    bounds: TeamSizeBounds,
    max_teams: Option<i32>,
    best_of: i32,
) -> Result<(), CoreError> {
    validate_name("Tournament", name)?;
    schedule.validate()?;
    bounds.validate()?;
    validate_max_teams(max_teams)?;
    validate_best_of(best_of)
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/tournaments?phase=future|active|past
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<PhaseParams>,
) -> AppResult<Json<DataResponse<Vec<TournamentResponse>>>> {
    let phase = params.parse()?;
    let now = Utc::now();
    let tournaments = TournamentRepo::list(&state.pool, phase, now).await?;
    let data = tournaments
        .into_iter()
        .map(|t| TournamentResponse::at(t, now))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(DataResponse { data }))
}

/// POST /api/v1/tournaments
///
/// Admin only. The caller becomes `created_by`.
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<CreateTournament>,
) -> AppResult<(StatusCode, Json<DataResponse<TournamentResponse>>)> {
    let schedule = Schedule {
        registration_opens_at: input.registration_opens_at,
        registration_closes_at: input.registration_closes_at,
        starts_at: input.starts_at,
        ends_at: input.ends_at,
    };
    let bounds = TeamSizeBounds {
        min: input.min_team_size.unwrap_or(1),
        max: input.max_team_size.unwrap_or(1),
    };
    validate_settings(
        &input.name,
        &schedule,
        bounds,
        input.max_teams,
        input.best_of.unwrap_or(1),
    )?;

    let tournament = TournamentRepo::create(&state.pool, admin.user_id, &input).await?;
    let data = TournamentResponse::at(tournament, Utc::now())?;
    tracing::info!(
        tournament_id = data.tournament.id,
        user_id = admin.user_id,
        format = data.format.as_str(),
        "Tournament created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data })))
}

/// GET /api/v1/tournaments/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<TournamentResponse>>> {
    let tournament = load_tournament(&state.pool, id).await?;
    Ok(Json(DataResponse {
        data: TournamentResponse::at(tournament, Utc::now())?,
    }))
}

/// PUT /api/v1/tournaments/{id}
///
/// Admin only. Format, best-of and team-size settings are frozen once the
/// bracket exists. The merged result is validated as a whole.
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTournament>,
) -> AppResult<Json<DataResponse<TournamentResponse>>> {
    let mut tx = state.pool.begin().await?;
    let current = TournamentRepo::lock(&mut tx, id)
        .await?
        .ok_or(CoreError::not_found("Tournament", id))?;

    if current.has_bracket() && input.changes_bracket_settings() {
        return Err(CoreError::Conflict(
            "Format, best-of and team size settings cannot change after the bracket is generated"
                .into(),
        )
        .into());
    }

    let schedule = Schedule {
        registration_opens_at: input
            .registration_opens_at
            .unwrap_or(current.registration_opens_at),
        registration_closes_at: input
            .registration_closes_at
            .unwrap_or(current.registration_closes_at),
        starts_at: input.starts_at.unwrap_or(current.starts_at),
        ends_at: input.ends_at.unwrap_or(current.ends_at),
    };
    let bounds = TeamSizeBounds {
        min: input.min_team_size.unwrap_or(current.min_team_size),
        max: input.max_team_size.unwrap_or(current.max_team_size),
    };
    validate_settings(
        input.name.as_deref().unwrap_or(&current.name),
        &schedule,
        bounds,
        input.max_teams.or(current.max_teams),
        input.best_of.unwrap_or(current.best_of),
    )?;

    let tournament = TournamentRepo::update(&mut tx, id, &input)
        .await?
        .ok_or(CoreError::not_found("Tournament", id))?;
    tx.commit().await?;

    Ok(Json(DataResponse {
        data: TournamentResponse::at(tournament, Utc::now())?,
    }))
}
