//! Team registration (entry) model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tourney_core::types::{DbId, Timestamp};

use crate::models::user::UserSummary;

/// A `team_entries` row joined with the team's name.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TeamEntry {
    pub id: DbId,
    pub team_id: DbId,
    pub team_name: String,
    pub tournament_id: DbId,
    pub seed: Option<i32>,
    pub created_at: Timestamp,
}

/// An entry with its roster.
#[derive(Debug, Clone, Serialize)]
pub struct TeamEntryWithPlayers {
    #[serde(flatten)]
    pub entry: TeamEntry,
    pub players: Vec<UserSummary>,
}

/// DTO for registering a team into a tournament.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTeamEntry {
    pub team_id: DbId,
    pub player_ids: Vec<DbId>,
    pub seed: Option<i32>,
}
