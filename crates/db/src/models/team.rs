//! Team entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tourney_core::types::{DbId, Timestamp};

use crate::models::team_entry::TeamEntryWithPlayers;
use crate::models::user::UserSummary;

/// A team row joined with its creator's username.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Team {
    pub id: DbId,
    pub name: String,
    pub creator_id: DbId,
    pub creator_username: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A team with the users allowed to manage it and the tournaments it
/// has entered, each with the roster it fielded.
#[derive(Debug, Clone, Serialize)]
pub struct TeamDetail {
    #[serde(flatten)]
    pub team: Team,
    pub admins: Vec<UserSummary>,
    pub tournament_entries: Vec<TeamEntryWithPlayers>,
}

/// DTO for creating a team. The creator comes from the authenticated user.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTeam {
    pub name: String,
}

/// DTO for updating a team.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateTeam {
    pub name: Option<String>,
}
