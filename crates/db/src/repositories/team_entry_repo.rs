//! Repository for the `team_entries` and `team_entry_players` tables.

use std::collections::HashMap;

use sqlx::PgPool;
use tourney_core::types::DbId;

use crate::models::team_entry::{TeamEntry, TeamEntryWithPlayers};
use crate::models::user::UserSummary;

/// Columns of `team_entries e` joined with `teams tm`.
const COLUMNS: &str =
    "e.id, e.team_id, tm.name AS team_name, e.tournament_id, e.seed, e.created_at";

const FROM: &str = "team_entries e JOIN teams tm ON tm.id = e.team_id";

/// Bracket seeding order: explicit seeds first, then registration order.
const SEED_ORDER: &str = "ORDER BY e.seed ASC NULLS LAST, e.created_at ASC, e.id ASC";

/// Provides registration of teams into tournaments.
pub struct TeamEntryRepo;

impl TeamEntryRepo {
    /// Register a team with its roster inside an existing transaction.
    ///
    /// A second entry for the same team violates
    /// `uq_team_entries_team_tournament`; a player already on another
    /// roster violates `uq_team_entry_players_tournament_user`.
    pub async fn create_in_tx(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        tournament_id: DbId,
        team_id: DbId,
        player_ids: &[DbId],
        seed: Option<i32>,
    ) -> Result<TeamEntry, sqlx::Error> {
        let query = format!(
            "WITH e AS (
                INSERT INTO team_entries (team_id, tournament_id, seed)
                VALUES ($1, $2, $3)
                RETURNING *
             )
             SELECT {COLUMNS} FROM e JOIN teams tm ON tm.id = e.team_id"
        );
        let entry = sqlx::query_as::<_, TeamEntry>(&query)
            .bind(team_id)
            .bind(tournament_id)
            .bind(seed)
            .fetch_one(&mut **tx)
            .await?;

        sqlx::query(
            "INSERT INTO team_entry_players (entry_id, tournament_id, user_id)
             SELECT $1, $2, UNNEST($3::BIGINT[])",
        )
        .bind(entry.id)
        .bind(tournament_id)
        .bind(player_ids)
        .execute(&mut **tx)
        .await?;

        Ok(entry)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<TeamEntry>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM {FROM} WHERE e.id = $1");
        sqlx::query_as::<_, TeamEntry>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Entries of a tournament in seeding order, each with its roster.
    pub async fn list_by_tournament(
        pool: &PgPool,
        tournament_id: DbId,
    ) -> Result<Vec<TeamEntryWithPlayers>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM {FROM} WHERE e.tournament_id = $1 {SEED_ORDER}");
        let entries = sqlx::query_as::<_, TeamEntry>(&query)
            .bind(tournament_id)
            .fetch_all(pool)
            .await?;
        Self::with_rosters(pool, entries).await
    }

    /// Every tournament a team has entered, newest first, with rosters.
    pub async fn list_by_team(
        pool: &PgPool,
        team_id: DbId,
    ) -> Result<Vec<TeamEntryWithPlayers>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM {FROM} WHERE e.team_id = $1
             ORDER BY e.created_at DESC, e.id DESC"
        );
        let entries = sqlx::query_as::<_, TeamEntry>(&query)
            .bind(team_id)
            .fetch_all(pool)
            .await?;
        Self::with_rosters(pool, entries).await
    }

    /// Attach rosters (ordered by username) to `entries`, keeping their order.
    async fn with_rosters(
        pool: &PgPool,
        entries: Vec<TeamEntry>,
    ) -> Result<Vec<TeamEntryWithPlayers>, sqlx::Error> {
        let entry_ids: Vec<DbId> = entries.iter().map(|e| e.id).collect();
        let rows: Vec<(DbId, DbId, String)> = sqlx::query_as(
            "SELECT p.entry_id, u.id, u.username FROM team_entry_players p
             JOIN users u ON u.id = p.user_id
             WHERE p.entry_id = ANY($1)
             ORDER BY u.username ASC",
        )
        .bind(&entry_ids)
        .fetch_all(pool)
        .await?;

        let mut rosters: HashMap<DbId, Vec<UserSummary>> = HashMap::new();
        for (entry_id, id, username) in rows {
            rosters
                .entry(entry_id)
                .or_default()
                .push(UserSummary { id, username });
        }

        Ok(entries
            .into_iter()
            .map(|entry| {
                let players = rosters.remove(&entry.id).unwrap_or_default();
                TeamEntryWithPlayers { entry, players }
            })
            .collect())
    }

    /// Withdraw an entry. Its roster rows cascade.
    pub async fn delete(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM team_entries WHERE id = $1")
            .bind(id)
            .execute(&mut **tx)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn count_by_tournament(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        tournament_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM team_entries WHERE tournament_id = $1")
            .bind(tournament_id)
            .fetch_one(&mut **tx)
            .await
    }

    /// Which of `user_ids` are already registered in the tournament, on a
    /// roster or in the random-team pool.
    pub async fn registered_player_ids(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        tournament_id: DbId,
        user_ids: &[DbId],
    ) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "SELECT user_id FROM team_entry_players
             WHERE tournament_id = $1 AND user_id = ANY($2)
             UNION
             SELECT user_id FROM player_random_team_entries
             WHERE tournament_id = $1 AND user_id = ANY($2)
             ORDER BY user_id",
        )
        .bind(tournament_id)
        .bind(user_ids)
        .fetch_all(&mut **tx)
        .await
    }

    /// Team ids of a tournament's entries in seeding order.
    pub async fn seeded_team_ids(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        tournament_id: DbId,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        let query = format!(
            "SELECT e.team_id FROM team_entries e WHERE e.tournament_id = $1 {SEED_ORDER}"
        );
        sqlx::query_scalar::<_, DbId>(&query)
            .bind(tournament_id)
            .fetch_all(&mut **tx)
            .await
    }
}
