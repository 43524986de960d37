//! Repository for the `teams` and `team_admins` tables.

use sqlx::PgPool;
use tourney_core::types::DbId;

use crate::models::team::{Team, UpdateTeam};
use crate::models::user::UserSummary;

/// Columns of `teams t` joined with the creator as `users u`.
const COLUMNS: &str = "t.id, t.name, t.creator_id, u.username AS creator_username, \
                        t.created_at, t.updated_at";

const FROM: &str = "teams t JOIN users u ON u.id = t.creator_id";

/// Provides CRUD for teams and their admin lists.
pub struct TeamRepo;

impl TeamRepo {
    /// Create a team and make its creator the first admin, atomically.
    pub async fn create(pool: &PgPool, name: &str, creator_id: DbId) -> Result<Team, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let team = Self::create_in_tx(&mut tx, name, creator_id).await?;
        tx.commit().await?;
        Ok(team)
    }

    /// Insert a team and its creator-admin row inside an existing transaction.
    pub async fn create_in_tx(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        name: &str,
        creator_id: DbId,
    ) -> Result<Team, sqlx::Error> {
        let query = format!(
            "WITH t AS (
                INSERT INTO teams (name, creator_id) VALUES ($1, $2) RETURNING *
             )
             SELECT {COLUMNS} FROM t JOIN users u ON u.id = t.creator_id"
        );
        let team = sqlx::query_as::<_, Team>(&query)
            .bind(name)
            .bind(creator_id)
            .fetch_one(&mut **tx)
            .await?;

        sqlx::query("INSERT INTO team_admins (team_id, user_id) VALUES ($1, $2)")
            .bind(team.id)
            .bind(creator_id)
            .execute(&mut **tx)
            .await?;

        Ok(team)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Team>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM {FROM} WHERE t.id = $1");
        sqlx::query_as::<_, Team>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all teams ordered by name.
    pub async fn list(pool: &PgPool) -> Result<Vec<Team>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM {FROM} ORDER BY t.name ASC");
        sqlx::query_as::<_, Team>(&query).fetch_all(pool).await
    }

    /// Teams the user administers, ordered by name.
    pub async fn list_administered_by(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<Team>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM {FROM}
             JOIN team_admins ta ON ta.team_id = t.id
             WHERE ta.user_id = $1
             ORDER BY t.name ASC"
        );
        sqlx::query_as::<_, Team>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Rename a team. Returns `None` if the team does not exist.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTeam,
    ) -> Result<Option<Team>, sqlx::Error> {
        let query = format!(
            "WITH t AS (
                UPDATE teams SET name = COALESCE($2, name) WHERE id = $1 RETURNING *
             )
             SELECT {COLUMNS} FROM t JOIN users u ON u.id = t.creator_id"
        );
        sqlx::query_as::<_, Team>(&query)
            .bind(id)
            .bind(&input.name)
            .fetch_optional(pool)
            .await
    }

    /// Admins of a team, in the order they were added.
    pub async fn list_admins(
        pool: &PgPool,
        team_id: DbId,
    ) -> Result<Vec<UserSummary>, sqlx::Error> {
        sqlx::query_as::<_, UserSummary>(
            "SELECT u.id, u.username FROM team_admins ta
             JOIN users u ON u.id = ta.user_id
             WHERE ta.team_id = $1
             ORDER BY ta.created_at ASC, u.id ASC",
        )
        .bind(team_id)
        .fetch_all(pool)
        .await
    }

    pub async fn is_admin(
        pool: &PgPool,
        team_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM team_admins WHERE team_id = $1 AND user_id = $2)",
        )
        .bind(team_id)
        .bind(user_id)
        .fetch_one(pool)
        .await
    }

    /// Add an admin. A duplicate violates `uq_team_admins`.
    pub async fn add_admin(pool: &PgPool, team_id: DbId, user_id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("INSERT INTO team_admins (team_id, user_id) VALUES ($1, $2)")
            .bind(team_id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Remove an admin unless they are the team's last one.
    ///
    /// Returns `false` when nothing was deleted: either the user is not an
    /// admin or they are the only admin left. The team row is locked so two
    /// concurrent removals cannot empty the list.
    pub async fn remove_admin(
        pool: &PgPool,
        team_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;
        sqlx::query("SELECT id FROM teams WHERE id = $1 FOR UPDATE")
            .bind(team_id)
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query(
            "DELETE FROM team_admins
             WHERE team_id = $1 AND user_id = $2
               AND (SELECT COUNT(*) FROM team_admins WHERE team_id = $1) > 1",
        )
        .bind(team_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }
}
