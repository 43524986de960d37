//! Repository for the `player_random_team_entries` table.

use sqlx::PgPool;
use tourney_core::types::DbId;

use crate::models::random_entry::{NewRandomTeam, PlayerRandomTeamEntry};
use crate::models::team_entry::TeamEntry;
use crate::repositories::{TeamEntryRepo, TeamRepo};

const COLUMNS: &str = "r.id, r.tournament_id, r.user_id, u.username, r.created_at";

/// Provides the pool of players waiting for a random team.
pub struct RandomEntryRepo;

impl RandomEntryRepo {
    /// Add a player to the pool. A second join violates
    /// `uq_player_random_team_entries_tournament_user`.
    pub async fn create_in_tx(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        tournament_id: DbId,
        user_id: DbId,
    ) -> Result<PlayerRandomTeamEntry, sqlx::Error> {
        let query = format!(
            "WITH r AS (
                INSERT INTO player_random_team_entries (tournament_id, user_id)
                VALUES ($1, $2)
                RETURNING *
             )
             SELECT {COLUMNS} FROM r JOIN users u ON u.id = r.user_id"
        );
        sqlx::query_as::<_, PlayerRandomTeamEntry>(&query)
            .bind(tournament_id)
            .bind(user_id)
            .fetch_one(&mut **tx)
            .await
    }

    /// Remove a player from the pool. Returns `false` if they were not in it.
    pub async fn delete(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        tournament_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM player_random_team_entries WHERE tournament_id = $1 AND user_id = $2",
        )
        .bind(tournament_id)
        .bind(user_id)
        .execute(&mut **tx)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// The pool in join order.
    pub async fn list_by_tournament(
        pool: &PgPool,
        tournament_id: DbId,
    ) -> Result<Vec<PlayerRandomTeamEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM player_random_team_entries r
             JOIN users u ON u.id = r.user_id
             WHERE r.tournament_id = $1
             ORDER BY r.created_at ASC, r.id ASC"
        );
        sqlx::query_as::<_, PlayerRandomTeamEntry>(&query)
            .bind(tournament_id)
            .fetch_all(pool)
            .await
    }

    /// User ids in the pool, in join order.
    pub async fn pool_user_ids(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        tournament_id: DbId,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "SELECT user_id FROM player_random_team_entries
             WHERE tournament_id = $1
             ORDER BY created_at ASC, id ASC",
        )
        .bind(tournament_id)
        .fetch_all(&mut **tx)
        .await
    }

    /// Create and register the given teams, then take their players out of
    /// the pool. Each team's first player becomes its creator and admin.
    pub async fn form_teams(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        tournament_id: DbId,
        teams: &[NewRandomTeam],
    ) -> Result<Vec<TeamEntry>, sqlx::Error> {
        let mut entries = Vec::with_capacity(teams.len());
        for new_team in teams {
            let Some(&creator_id) = new_team.player_ids.first() else {
                continue;
            };
            let team = TeamRepo::create_in_tx(tx, &new_team.name, creator_id).await?;

            sqlx::query(
                "DELETE FROM player_random_team_entries
                 WHERE tournament_id = $1 AND user_id = ANY($2)",
            )
            .bind(tournament_id)
            .bind(&new_team.player_ids)
            .execute(&mut **tx)
            .await?;

            let entry =
                TeamEntryRepo::create_in_tx(tx, tournament_id, team.id, &new_team.player_ids, None)
                    .await?;
            entries.push(entry);
        }
        tracing::debug!(tournament_id, teams = entries.len(), "Formed random teams");
        Ok(entries)
    }
}
