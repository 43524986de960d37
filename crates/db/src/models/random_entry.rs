//! Player-without-team registration model.

use serde::Serialize;
use sqlx::FromRow;
use tourney_core::types::{DbId, Timestamp};

/// A `player_random_team_entries` row joined with the player's username.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PlayerRandomTeamEntry {
    pub id: DbId,
    pub tournament_id: DbId,
    pub user_id: DbId,
    pub username: String,
    pub created_at: Timestamp,
}

/// A team to be created from the random pool.
#[derive(Debug, Clone)]
pub struct NewRandomTeam {
    pub name: String,
    /// The first player becomes the team's creator and admin.
    pub player_ids: Vec<DbId>,
}
