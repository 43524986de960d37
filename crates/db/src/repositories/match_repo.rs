//! Repository for the `matches` table.

use sqlx::PgPool;
use tourney_core::bracket::{Bracket, BracketMatch, SlotIndex};
use tourney_core::types::DbId;

use crate::models::matches::{encode_slot, Match};
use crate::models::status::{BracketSide, MatchStatus};

/// Columns of `matches m` with the team names joined in.
const COLUMNS: &str = "m.id, m.tournament_id, m.side_id, m.round, m.position, \
                        m.team_a_id, m.team_a_bye, m.team_b_id, m.team_b_bye, m.winner_id, \
                        m.status_id, m.score_a, m.score_b, m.winner_next_id, m.winner_next_slot, \
                        m.loser_next_id, m.loser_next_slot, m.completed_at, m.created_at, \
                        m.updated_at, ta.name AS team_a_name, tb.name AS team_b_name, \
                        tw.name AS winner_name";

const FROM: &str = "matches m
                    LEFT JOIN teams ta ON ta.id = m.team_a_id
                    LEFT JOIN teams tb ON tb.id = m.team_b_id
                    LEFT JOIN teams tw ON tw.id = m.winner_id";

/// Engine order: insertion order, which is the bracket's own index order.
const ORDER: &str = "ORDER BY m.id ASC";

/// Provides persistence for bracket matches.
pub struct MatchRepo;

impl MatchRepo {
    /// Persist a freshly generated bracket and return the match id at each
    /// engine index.
    ///
    /// Rows are inserted in index order first, then forward references are
    /// filled in once every target has an id.
    pub async fn insert_bracket(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        tournament_id: DbId,
        bracket: &Bracket<DbId>,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        let mut ids = Vec::with_capacity(bracket.matches().len());
        for m in bracket.matches() {
            let (team_a_id, team_a_bye) = encode_slot(m.slots[SlotIndex::A.index()]);
            let (team_b_id, team_b_bye) = encode_slot(m.slots[SlotIndex::B.index()]);
            let id = sqlx::query_scalar::<_, DbId>(
                "INSERT INTO matches
                    (tournament_id, side_id, round, position, team_a_id, team_a_bye,
                     team_b_id, team_b_bye, winner_id, status_id, completed_at)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
                         CASE WHEN $11 THEN NOW() END)
                 RETURNING id",
            )
            .bind(tournament_id)
            .bind(BracketSide::from(m.side).id())
            .bind(m.round)
            .bind(m.position)
            .bind(team_a_id)
            .bind(team_a_bye)
            .bind(team_b_id)
            .bind(team_b_bye)
            .bind(m.winner)
            .bind(MatchStatus::from(m.state).id())
            .bind(m.state.is_decided())
            .fetch_one(&mut **tx)
            .await?;
            ids.push(id);
        }

        for (m, id) in bracket.matches().iter().zip(&ids) {
            if m.winner_next.is_none() && m.loser_next.is_none() {
                continue;
            }
            sqlx::query(
                "UPDATE matches SET
                    winner_next_id = $2, winner_next_slot = $3,
                    loser_next_id = $4, loser_next_slot = $5
                 WHERE id = $1",
            )
            .bind(id)
            .bind(m.winner_next.map(|l| ids[l.target]))
            .bind(m.winner_next.map(|l| l.slot.index() as i16))
            .bind(m.loser_next.map(|l| ids[l.target]))
            .bind(m.loser_next.map(|l| l.slot.index() as i16))
            .execute(&mut **tx)
            .await?;
        }

        tracing::debug!(tournament_id, matches = ids.len(), "Inserted bracket");
        Ok(ids)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Match>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM {FROM} WHERE m.id = $1");
        sqlx::query_as::<_, Match>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_by_tournament(
        pool: &PgPool,
        tournament_id: DbId,
    ) -> Result<Vec<Match>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM {FROM} WHERE m.tournament_id = $1 {ORDER}");
        sqlx::query_as::<_, Match>(&query)
            .bind(tournament_id)
            .fetch_all(pool)
            .await
    }

    /// Same as [`Self::list_by_tournament`], read inside a transaction that
    /// already holds the tournament lock.
    pub async fn list_in_tx(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        tournament_id: DbId,
    ) -> Result<Vec<Match>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM {FROM} WHERE m.tournament_id = $1 {ORDER}");
        sqlx::query_as::<_, Match>(&query)
            .bind(tournament_id)
            .fetch_all(&mut **tx)
            .await
    }

    /// Write back the engine state of the matches at `changed`.
    ///
    /// `completed_at` is stamped the first time a match becomes decided.
    pub async fn save_changes(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        bracket: &Bracket<DbId>,
        ids: &[DbId],
        changed: &[usize],
    ) -> Result<(), sqlx::Error> {
        for &index in changed {
            let (Some(m), Some(&id)) = (bracket.matches().get(index), ids.get(index)) else {
                continue;
            };
            Self::save_one(tx, id, m).await?;
        }
        Ok(())
    }

    async fn save_one(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        id: DbId,
        m: &BracketMatch<DbId>,
    ) -> Result<(), sqlx::Error> {
        let (team_a_id, team_a_bye) = encode_slot(m.slots[SlotIndex::A.index()]);
        let (team_b_id, team_b_bye) = encode_slot(m.slots[SlotIndex::B.index()]);
        sqlx::query(
            "UPDATE matches SET
                team_a_id = $2, team_a_bye = $3,
                team_b_id = $4, team_b_bye = $5,
                winner_id = $6, status_id = $7,
                completed_at = CASE WHEN $8 THEN COALESCE(completed_at, NOW()) END
             WHERE id = $1",
        )
        .bind(id)
        .bind(team_a_id)
        .bind(team_a_bye)
        .bind(team_b_id)
        .bind(team_b_bye)
        .bind(m.winner)
        .bind(MatchStatus::from(m.state).id())
        .bind(m.state.is_decided())
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    pub async fn set_scores(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        id: DbId,
        score_a: Option<i32>,
        score_b: Option<i32>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE matches SET score_a = $2, score_b = $3 WHERE id = $1")
            .bind(id)
            .bind(score_a)
            .bind(score_b)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }
}
