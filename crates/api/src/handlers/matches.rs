//! Handlers for bracket matches and result reporting.

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use tourney_core::bracket::{MatchState, Side, SlotIndex};
use tourney_core::error::CoreError;
use tourney_core::roster::validate_scores;
use tourney_core::types::{DbId, Timestamp};
use tourney_db::models::matches::{bracket_from_rows, Match, ReportResult};
use tourney_db::repositories::{MatchRepo, TournamentRepo};

use crate::error::AppResult;
use crate::handlers::tournaments::load_tournament;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TeamRef {
    pub id: DbId,
    pub name: String,
}

/// Where a team goes after this match.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct NextRef {
    pub match_id: DbId,
    pub slot: SlotIndex,
}

/// Public shape of a match.
#[derive(Debug, Clone, Serialize)]
pub struct MatchResponse {
    pub id: DbId,
    pub tournament_id: DbId,
    pub side: Side,
    pub round: i32,
    pub position: i32,
    pub team_a: Option<TeamRef>,
    pub team_b: Option<TeamRef>,
    pub team_a_bye: bool,
    pub team_b_bye: bool,
    pub winner: Option<TeamRef>,
    pub status: MatchState,
    pub score_a: Option<i32>,
    pub score_b: Option<i32>,
    pub winner_next: Option<NextRef>,
    pub loser_next: Option<NextRef>,
    pub completed_at: Option<Timestamp>,
}

fn team_ref(id: Option<DbId>, name: Option<String>) -> Option<TeamRef> {
    id.map(|id| TeamRef {
        id,
        name: name.unwrap_or_default(),
    })
}

fn next_ref(match_id: Option<DbId>, slot: Option<i16>) -> Option<NextRef> {
    let slot = slot
        .and_then(|s| usize::try_from(s).ok())
        .and_then(SlotIndex::from_index)?;
    match_id.map(|match_id| NextRef { match_id, slot })
}

impl TryFrom<Match> for MatchResponse {
    type Error = CoreError;

    fn try_from(row: Match) -> Result<Self, Self::Error> {
        let side = row
            .side()
            .ok_or_else(|| CoreError::Internal(format!("Match {} has an unknown side", row.id)))?;
        let status = row.status().ok_or_else(|| {
            CoreError::Internal(format!("Match {} has an unknown status", row.id))
        })?;
        Ok(Self {
            id: row.id,
            tournament_id: row.tournament_id,
            side: side.into(),
            round: row.round,
            position: row.position,
            team_a: team_ref(row.team_a_id, row.team_a_name),
            team_b: team_ref(row.team_b_id, row.team_b_name),
            team_a_bye: row.team_a_bye,
            team_b_bye: row.team_b_bye,
            winner: team_ref(row.winner_id, row.winner_name),
            status: status.into(),
            score_a: row.score_a,
            score_b: row.score_b,
            winner_next: next_ref(row.winner_next_id, row.winner_next_slot),
            loser_next: next_ref(row.loser_next_id, row.loser_next_slot),
            completed_at: row.completed_at,
        })
    }
}

pub(crate) fn to_responses(rows: Vec<Match>) -> Result<Vec<MatchResponse>, CoreError> {
    rows.into_iter().map(MatchResponse::try_from).collect()
}

/// GET /api/v1/tournaments/{id}/matches
pub async fn list_by_tournament(
    State(state): State<AppState>,
    Path(tournament_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<MatchResponse>>>> {
    load_tournament(&state.pool, tournament_id).await?;
    let rows = MatchRepo::list_by_tournament(&state.pool, tournament_id).await?;
    Ok(Json(DataResponse {
        data: to_responses(rows)?,
    }))
}

/// GET /api/v1/matches/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<MatchResponse>>> {
    let row = MatchRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::not_found("Match", id))?;
    Ok(Json(DataResponse {
        data: MatchResponse::try_from(row)?,
    }))
}

/// POST /api/v1/matches/{id}/result
///
/// Admin only. Records the winner of a ready match, moves the winner along
/// `winner_next` and the loser along `loser_next`, and settles any
/// walkovers that follow.
pub async fn report(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<ReportResult>,
) -> AppResult<Json<DataResponse<MatchResponse>>> {
    let found = MatchRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::not_found("Match", id))?;

    let mut tx = state.pool.begin().await?;
    let tournament = TournamentRepo::lock(&mut tx, found.tournament_id)
        .await?
        .ok_or(CoreError::not_found("Tournament", found.tournament_id))?;

    let rows = MatchRepo::list_in_tx(&mut tx, tournament.id).await?;
    let (index, row) = rows
        .iter()
        .enumerate()
        .find(|(_, m)| m.id == id)
        .ok_or(CoreError::not_found("Match", id))?;

    match row.status().map(MatchState::from) {
        Some(MatchState::Ready) => {}
        Some(MatchState::Pending) => {
            return Err(CoreError::Conflict(format!(
                "Match {id} is waiting for its opponents"
            ))
            .into())
        }
        _ => {
            return Err(
                CoreError::Conflict(format!("Match {id} has already been decided")).into(),
            )
        }
    }

    let winner_slot = row.slot_of(input.winner_id).ok_or_else(|| {
        CoreError::Validation(format!(
            "Team {} is not playing in match {id}",
            input.winner_id
        ))
    })?;
    validate_scores(
        tournament.best_of,
        winner_slot == SlotIndex::A,
        input.score_a,
        input.score_b,
    )?;

    let (mut bracket, ids) = bracket_from_rows(&rows)?;
    let changed = bracket.report_winner(index, input.winner_id)?;
    MatchRepo::save_changes(&mut tx, &bracket, &ids, &changed).await?;
    MatchRepo::set_scores(&mut tx, id, input.score_a, input.score_b).await?;
    tx.commit().await?;

    tracing::info!(
        match_id = id,
        tournament_id = tournament.id,
        winner_id = input.winner_id,
        user_id = admin.user_id,
        updated = changed.len(),
        "Match result reported"
    );

    let updated = MatchRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::not_found("Match", id))?;
    Ok(Json(DataResponse {
        data: MatchResponse::try_from(updated)?,
    }))
}
