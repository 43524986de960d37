//! Tournament entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tourney_core::bracket::Format;
use tourney_core::error::CoreError;
use tourney_core::roster::TeamSizeBounds;
use tourney_core::schedule::Schedule;
use tourney_core::types::{DbId, Timestamp};

use crate::models::status::{StatusId, TournamentFormat};

/// A tournament row joined with its creator's username.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Tournament {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub format_id: StatusId,
    pub min_team_size: i32,
    pub max_team_size: i32,
    pub max_teams: Option<i32>,
    pub best_of: i32,
    pub registration_opens_at: Timestamp,
    pub registration_closes_at: Timestamp,
    pub starts_at: Timestamp,
    pub ends_at: Timestamp,
    pub allow_random_teams: bool,
    pub bracket_generated_at: Option<Timestamp>,
    /// Random teams generated so far; numbers the next batch.
    pub random_teams_formed: i32,
    pub created_by: DbId,
    pub creator_username: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Tournament {
    pub fn schedule(&self) -> Schedule {
        Schedule {
            registration_opens_at: self.registration_opens_at,
            registration_closes_at: self.registration_closes_at,
            starts_at: self.starts_at,
            ends_at: self.ends_at,
        }
    }

    /// Team size bounds. The table's CHECK constraint keeps these valid.
    pub fn bounds(&self) -> TeamSizeBounds {
        TeamSizeBounds {
            min: self.min_team_size,
            max: self.max_team_size,
        }
    }

    pub fn format(&self) -> Result<Format, CoreError> {
        TournamentFormat::from_id(self.format_id)
            .map(Format::from)
            .ok_or_else(|| {
                CoreError::Internal(format!(
                    "Tournament {} has unknown format {}",
                    self.id, self.format_id
                ))
            })
    }

    pub fn has_bracket(&self) -> bool {
        self.bracket_generated_at.is_some()
    }
}

/// DTO for creating a new tournament. Omitted settings take the column
/// defaults (single elimination, teams of one, best of one).
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTournament {
    pub name: String,
    pub description: Option<String>,
    pub format: Option<Format>,
    pub min_team_size: Option<i32>,
    pub max_team_size: Option<i32>,
    pub max_teams: Option<i32>,
    pub best_of: Option<i32>,
    pub registration_opens_at: Timestamp,
    pub registration_closes_at: Timestamp,
    pub starts_at: Timestamp,
    pub ends_at: Timestamp,
    pub allow_random_teams: Option<bool>,
}

/// DTO for updating an existing tournament. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTournament {
    pub name: Option<String>,
    pub description: Option<String>,
    pub format: Option<Format>,
    pub min_team_size: Option<i32>,
    pub max_team_size: Option<i32>,
    pub max_teams: Option<i32>,
    pub best_of: Option<i32>,
    pub registration_opens_at: Option<Timestamp>,
    pub registration_closes_at: Option<Timestamp>,
    pub starts_at: Option<Timestamp>,
    pub ends_at: Option<Timestamp>,
    pub allow_random_teams: Option<bool>,
}

impl UpdateTournament {
    /// Whether the update touches settings that shape the bracket.
    pub fn changes_bracket_settings(&self) -> bool {
        self.format.is_some()
            || self.best_of.is_some()
            || self.min_team_size.is_some()
            || self.max_team_size.is_some()
            || self.max_teams.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::{Duration, Utc};

    fn tournament(format_id: StatusId) -> Tournament {
        let now = Utc::now();
        Tournament {
            id: 7,
            name: "Lookup Cup".to_string(),
            description: None,
            format_id,
            min_team_size: 1,
            max_team_size: 1,
            max_teams: None,
            best_of: 1,
            registration_opens_at: now,
            registration_closes_at: now + Duration::hours(1),
            starts_at: now + Duration::hours(2),
            ends_at: now + Duration::hours(3),
            allow_random_teams: false,
            bracket_generated_at: None,
            random_teams_formed: 0,
            created_by: 1,
            creator_username: "admin".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn known_format_ids_map_to_formats() {
        assert_eq!(tournament(1).format().unwrap(), Format::SingleElimination);
        assert_eq!(tournament(2).format().unwrap(), Format::DoubleElimination);
    }

    #[test]
    fn unknown_format_id_is_an_internal_error() {
        assert_matches!(tournament(99).format(), Err(CoreError::Internal(_)));
    }

    #[test]
    fn best_of_counts_as_a_bracket_setting() {
        let update = UpdateTournament {
            best_of: Some(3),
            ..Default::default()
        };
        assert!(update.changes_bracket_settings());
        let cosmetic = UpdateTournament {
            description: Some("Now with prizes".to_string()),
            ..Default::default()
        };
        assert!(!cosmetic.changes_bracket_settings());
    }
}
