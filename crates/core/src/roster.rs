//! Name, roster and format validation shared by tournaments, teams and
//! entries.

use std::collections::HashSet;

use crate::error::CoreError;
use crate::random_teams::RANDOM_TEAM_PREFIX;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum allowed length for tournament and team names.
pub const MAX_NAME_LENGTH: usize = 100;

/// Upper bound on players per team.
pub const MAX_TEAM_SIZE: i32 = 64;

/// Largest accepted best-of series length.
pub const MAX_BEST_OF: i32 = 9;

// ---------------------------------------------------------------------------
// Names
// ---------------------------------------------------------------------------

/// Validate a display name: non-empty, trimmed, and within
/// [`MAX_NAME_LENGTH`]. `kind` is used in the error message.
pub fn validate_name(kind: &str, name: &str) -> Result<(), CoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(format!("{kind} name must not be empty")));
    }
    if trimmed.len() != name.len() {
        return Err(CoreError::Validation(format!(
            "{kind} name must not have leading or trailing whitespace"
        )));
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "{kind} name must not exceed {MAX_NAME_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate a user-chosen team name. Names starting with
/// [`RANDOM_TEAM_PREFIX`] (any case) are kept for generated teams.
pub fn validate_team_name(name: &str) -> Result<(), CoreError> {
    validate_name("Team", name)?;
    let reserved = name
        .get(..RANDOM_TEAM_PREFIX.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(RANDOM_TEAM_PREFIX));
    if reserved {
        return Err(CoreError::Validation(format!(
            "Team names starting with '{RANDOM_TEAM_PREFIX}' are reserved"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Team size
// ---------------------------------------------------------------------------

/// Inclusive bounds on the number of players a team fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TeamSizeBounds {
    pub min: i32,
    pub max: i32,
}

impl TeamSizeBounds {
    pub fn new(min: i32, max: i32) -> Result<Self, CoreError> {
        let bounds = Self { min, max };
        bounds.validate()?;
        Ok(bounds)
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.min < 1 {
            return Err(CoreError::Validation(
                "min_team_size must be at least 1".to_string(),
            ));
        }
        if self.max < self.min {
            return Err(CoreError::Validation(format!(
                "max_team_size ({}) must not be less than min_team_size ({})",
                self.max, self.min
            )));
        }
        if self.max > MAX_TEAM_SIZE {
            return Err(CoreError::Validation(format!(
                "max_team_size must not exceed {MAX_TEAM_SIZE}"
            )));
        }
        Ok(())
    }

    pub fn contains(&self, count: usize) -> bool {
        let count = count as i64;
        count >= i64::from(self.min) && count <= i64::from(self.max)
    }

    /// Check a proposed roster: no player twice, size within bounds.
    pub fn check_roster(&self, player_ids: &[DbId]) -> Result<(), CoreError> {
        let mut seen = HashSet::with_capacity(player_ids.len());
        for id in player_ids {
            if !seen.insert(*id) {
                return Err(CoreError::Validation(format!(
                    "Player {id} appears more than once in the roster"
                )));
            }
        }
        if !self.contains(player_ids.len()) {
            return Err(CoreError::Validation(format!(
                "Roster must have between {} and {} players, got {}",
                self.min,
                self.max,
                player_ids.len()
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Format settings
// ---------------------------------------------------------------------------

/// A series is decided by a majority of games, so its length must be odd.
pub fn validate_best_of(best_of: i32) -> Result<(), CoreError> {
    if best_of < 1 || best_of > MAX_BEST_OF || best_of % 2 == 0 {
        return Err(CoreError::Validation(format!(
            "best_of must be an odd number between 1 and {MAX_BEST_OF}, got {best_of}"
        )));
    }
    Ok(())
}

/// Games needed to take a best-of-`best_of` series.
pub fn wins_needed(best_of: i32) -> i32 {
    best_of / 2 + 1
}

/// A bracket needs at least two teams, so a cap below that is meaningless.
pub fn validate_max_teams(max_teams: Option<i32>) -> Result<(), CoreError> {
    match max_teams {
        Some(n) if n < 2 => Err(CoreError::Validation(format!(
            "max_teams must be at least 2 when set, got {n}"
        ))),
        _ => Ok(()),
    }
}

/// Validate reported series scores against the declared winner.
///
/// `winner_is_a` tells which slot won. Scores are optional, but when given
/// both must be present, the winner must lead, and neither may exceed the
/// number of games needed to win the series.
pub fn validate_scores(
    best_of: i32,
    winner_is_a: bool,
    score_a: Option<i32>,
    score_b: Option<i32>,
) -> Result<(), CoreError> {
    let (a, b) = match (score_a, score_b) {
        (None, None) => return Ok(()),
        (Some(a), Some(b)) => (a, b),
        _ => {
            return Err(CoreError::Validation(
                "score_a and score_b must be given together".to_string(),
            ))
        }
    };
    let cap = wins_needed(best_of);
    if a < 0 || b < 0 || a > cap || b > cap {
        return Err(CoreError::Validation(format!(
            "Scores must be between 0 and {cap} for a best-of-{best_of} series"
        )));
    }
    let (winner, loser) = if winner_is_a { (a, b) } else { (b, a) };
    if winner <= loser {
        return Err(CoreError::Validation(
            "The reported winner must have the higher score".to_string(),
        ));
    }
    Ok(())
}
