//! Match entity model and conversion to and from the bracket engine.
//!
//! A slot is stored as a nullable team id plus a bye flag:
//!
//! | team id | bye   | slot               |
//! |---------|-------|--------------------|
//! | NULL    | false | `Slot::Pending`    |
//! | NULL    | true  | `Slot::Bye`        |
//! | id      | false | `Slot::Team(id)`   |
//!
//! Forward references are stored as a match id plus a SMALLINT slot index
//! (0 = A, 1 = B).

use std::collections::HashMap;

use serde::Deserialize;
use sqlx::FromRow;
use tourney_core::bracket::{Bracket, BracketMatch, Link, Slot, SlotIndex};
use tourney_core::error::CoreError;
use tourney_core::types::{DbId, Timestamp};

use crate::models::status::{BracketSide, MatchStatus, StatusId};

/// A `matches` row joined with the names of both teams and the winner.
#[derive(Debug, Clone, FromRow)]
pub struct Match {
    pub id: DbId,
    pub tournament_id: DbId,
    pub side_id: StatusId,
    pub round: i32,
    pub position: i32,
    pub team_a_id: Option<DbId>,
    pub team_a_bye: bool,
    pub team_b_id: Option<DbId>,
    pub team_b_bye: bool,
    pub winner_id: Option<DbId>,
    pub status_id: StatusId,
    pub score_a: Option<i32>,
    pub score_b: Option<i32>,
    pub winner_next_id: Option<DbId>,
    pub winner_next_slot: Option<i16>,
    pub loser_next_id: Option<DbId>,
    pub loser_next_slot: Option<i16>,
    pub completed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub team_a_name: Option<String>,
    pub team_b_name: Option<String>,
    pub winner_name: Option<String>,
}

impl Match {
    pub fn slot(&self, index: SlotIndex) -> Slot<DbId> {
        match index {
            SlotIndex::A => decode_slot(self.team_a_id, self.team_a_bye),
            SlotIndex::B => decode_slot(self.team_b_id, self.team_b_bye),
        }
    }

    pub fn status(&self) -> Option<MatchStatus> {
        MatchStatus::from_id(self.status_id)
    }

    pub fn side(&self) -> Option<BracketSide> {
        BracketSide::from_id(self.side_id)
    }

    /// Which slot `team_id` occupies, if it plays in this match.
    pub fn slot_of(&self, team_id: DbId) -> Option<SlotIndex> {
        if self.team_a_id == Some(team_id) {
            Some(SlotIndex::A)
        } else if self.team_b_id == Some(team_id) {
            Some(SlotIndex::B)
        } else {
            None
        }
    }
}

/// DTO for reporting a match result.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportResult {
    pub winner_id: DbId,
    pub score_a: Option<i32>,
    pub score_b: Option<i32>,
}

pub fn decode_slot(team_id: Option<DbId>, bye: bool) -> Slot<DbId> {
    match (team_id, bye) {
        (Some(id), _) => Slot::Team(id),
        (None, true) => Slot::Bye,
        (None, false) => Slot::Pending,
    }
}

/// Column values `(team_id, bye)` for a slot.
pub fn encode_slot(slot: Slot<DbId>) -> (Option<DbId>, bool) {
    match slot {
        Slot::Pending => (None, false),
        Slot::Bye => (None, true),
        Slot::Team(id) => (Some(id), false),
    }
}

fn decode_link(
    from: DbId,
    target: Option<DbId>,
    slot: Option<i16>,
    index_of: &HashMap<DbId, usize>,
) -> Result<Option<Link>, CoreError> {
    let Some(target_id) = target else {
        return Ok(None);
    };
    let target = *index_of.get(&target_id).ok_or_else(|| {
        CoreError::Internal(format!(
            "Match {from} links to match {target_id} outside its bracket"
        ))
    })?;
    let slot = slot
        .and_then(|s| usize::try_from(s).ok())
        .and_then(SlotIndex::from_index)
        .ok_or_else(|| CoreError::Internal(format!("Match {from} has an invalid link slot")))?;
    Ok(Some(Link { target, slot }))
}

/// Rebuild the bracket engine from a tournament's matches.
///
/// Returns the bracket and the match id at each engine index.
pub fn bracket_from_rows(rows: &[Match]) -> Result<(Bracket<DbId>, Vec<DbId>), CoreError> {
    let ids: Vec<DbId> = rows.iter().map(|m| m.id).collect();
    let index_of: HashMap<DbId, usize> = ids.iter().enumerate().map(|(i, id)| (*id, i)).collect();

    let matches = rows
        .iter()
        .map(|row| {
            let side = row.side().ok_or_else(|| {
                CoreError::Internal(format!("Match {} has unknown side {}", row.id, row.side_id))
            })?;
            let status = row.status().ok_or_else(|| {
                CoreError::Internal(format!(
                    "Match {} has unknown status {}",
                    row.id, row.status_id
                ))
            })?;
            Ok(BracketMatch {
                side: side.into(),
                round: row.round,
                position: row.position,
                slots: [row.slot(SlotIndex::A), row.slot(SlotIndex::B)],
                winner: row.winner_id,
                state: status.into(),
                winner_next: decode_link(
                    row.id,
                    row.winner_next_id,
                    row.winner_next_slot,
                    &index_of,
                )?,
                loser_next: decode_link(row.id, row.loser_next_id, row.loser_next_slot, &index_of)?,
            })
        })
        .collect::<Result<Vec<_>, CoreError>>()?;

    let bracket = Bracket::from_matches(matches)?;
    Ok((bracket, ids))
}
