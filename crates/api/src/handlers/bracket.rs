//! Bracket generation and the grouped bracket view.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tourney_core::bracket::{Bracket, Format, Side};
use tourney_core::error::CoreError;
use tourney_core::types::DbId;
use tourney_db::models::matches::{bracket_from_rows, Match};
use tourney_db::models::tournament::Tournament;
use tourney_db::repositories::{MatchRepo, TeamEntryRepo, TournamentRepo};

use crate::error::AppResult;
use crate::handlers::matches::{to_responses, MatchResponse, TeamRef};
use crate::handlers::tournaments::load_tournament;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct GenerateBracket {
    /// Ignore seeds and draw the field in random order.
    #[serde(default)]
    pub shuffle: bool,
}

#[derive(Debug, Serialize)]
pub struct RoundView {
    pub round: i32,
    pub matches: Vec<MatchResponse>,
}

#[derive(Debug, Serialize)]
pub struct SideView {
    pub side: Side,
    pub rounds: Vec<RoundView>,
}

#[derive(Debug, Serialize)]
pub struct BracketView {
    pub tournament_id: DbId,
    pub format: Format,
    pub generated: bool,
    pub champion: Option<TeamRef>,
    pub sides: Vec<SideView>,
}

const SIDE_ORDER: [Side; 3] = [Side::Winners, Side::Losers, Side::GrandFinal];

/// The team that won the final match, with its name taken from the rows.
fn champion(rows: &[Match]) -> Result<Option<TeamRef>, CoreError> {
    if rows.is_empty() {
        return Ok(None);
    }
    let (bracket, _) = bracket_from_rows(rows)?;
    Ok(bracket.champion().map(|id| TeamRef {
        id,
        name: rows
            .iter()
            .find(|m| m.winner_id == Some(id))
            .and_then(|m| m.winner_name.clone())
            .unwrap_or_default(),
    }))
}

fn build_view(tournament: &Tournament, rows: Vec<Match>) -> Result<BracketView, CoreError> {
    let champion = champion(&rows)?;
    let matches = to_responses(rows)?;

    let sides = SIDE_ORDER
        .iter()
        .filter_map(|&side| {
            let mut rounds: Vec<RoundView> = Vec::new();
            for m in matches.iter().filter(|m| m.side == side) {
                match rounds.iter_mut().find(|r| r.round == m.round) {
                    Some(r) => r.matches.push(m.clone()),
                    None => rounds.push(RoundView {
                        round: m.round,
                        matches: vec![m.clone()],
                    }),
                }
            }
            if rounds.is_empty() {
                return None;
            }
            rounds.sort_by_key(|r| r.round);
            for r in &mut rounds {
                r.matches.sort_by_key(|m| m.position);
            }
            Some(SideView { side, rounds })
        })
        .collect();

    Ok(BracketView {
        tournament_id: tournament.id,
        format: tournament.format()?,
        generated: tournament.has_bracket(),
        champion,
        sides,
    })
}

/// GET /api/v1/tournaments/{id}/bracket
///
/// Before generation the view is empty with `generated: false`.
pub async fn get(
    State(state): State<AppState>,
    Path(tournament_id): Path<DbId>,
) -> AppResult<Json<DataResponse<BracketView>>> {
    let tournament = load_tournament(&state.pool, tournament_id).await?;
    let rows = MatchRepo::list_by_tournament(&state.pool, tournament_id).await?;
    Ok(Json(DataResponse {
        data: build_view(&tournament, rows)?,
    }))
}

/// POST /api/v1/tournaments/{id}/bracket
///
/// Admin only, once registration has closed. Entries are placed by seed
/// (unseeded entries after seeded ones, in sign-up order) unless `shuffle`
/// is set. A bracket can only be generated once.
pub async fn generate(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(tournament_id): Path<DbId>,
    body: Option<Json<GenerateBracket>>,
) -> AppResult<(StatusCode, Json<DataResponse<BracketView>>)> {
    let options = body.map(|Json(b)| b).unwrap_or_default();

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
    if Utc::now() < tournament.registration_closes_at {
        return Err(CoreError::Conflict(format!(
            "Registration for tournament {tournament_id} has not closed yet"
        ))
        .into());
    }

    let mut team_ids = TeamEntryRepo::seeded_team_ids(&mut tx, tournament_id).await?;
    if team_ids.len() < 2 {
        return Err(CoreError::Conflict(format!(
            "Tournament {tournament_id} needs at least 2 entries to draw a bracket, has {}",
            team_ids.len()
        ))
        .into());
    }
    if options.shuffle {
        team_ids.shuffle(&mut rand::rng());
    }

    let bracket = Bracket::generate(tournament.format()?, &team_ids)?;
    if !TournamentRepo::mark_bracket_generated(&mut tx, tournament_id).await? {
        return Err(CoreError::Conflict(format!(
            "The bracket for tournament {tournament_id} has already been generated"
        ))
        .into());
    }
    MatchRepo::insert_bracket(&mut tx, tournament_id, &bracket).await?;
    tx.commit().await?;

    tracing::info!(
        tournament_id,
        user_id = admin.user_id,
        teams = team_ids.len(),
        matches = bracket.matches().len(),
        "Bracket generated"
    );

    let tournament = load_tournament(&state.pool, tournament_id).await?;
    let rows = MatchRepo::list_by_tournament(&state.pool, tournament_id).await?;
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: build_view(&tournament, rows)?,
        }),
    ))
}
