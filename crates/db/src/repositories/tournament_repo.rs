//! Repository for the `tournaments` table.

use sqlx::PgPool;
use tourney_core::schedule::Phase;
use tourney_core::types::{DbId, Timestamp};

use crate::models::status::{StatusId, TournamentFormat};
use crate::models::tournament::{CreateTournament, Tournament, UpdateTournament};

/// Columns of `tournaments t` joined with the creator as `users u`.
const COLUMNS: &str = "t.id, t.name, t.description, t.format_id, t.min_team_size, \
                        t.max_team_size, t.max_teams, t.best_of, t.registration_opens_at, \
                        t.registration_closes_at, t.starts_at, t.ends_at, t.allow_random_teams, \
                        t.bracket_generated_at, t.random_teams_formed, t.created_by, \
                        u.username AS creator_username, t.created_at, t.updated_at";

const FROM: &str = "tournaments t JOIN users u ON u.id = t.created_by";

fn format_id(input: Option<tourney_core::bracket::Format>) -> Option<StatusId> {
    input.map(|f| TournamentFormat::from(f).id())
}

/// Provides CRUD and locking for tournaments.
pub struct TournamentRepo;

impl TournamentRepo {
    /// Insert a new tournament. Omitted settings take the column defaults.
    pub async fn create(
        pool: &PgPool,
        created_by: DbId,
        input: &CreateTournament,
    ) -> Result<Tournament, sqlx::Error> {
        let query = format!(
            "WITH t AS (
                INSERT INTO tournaments
                    (name, description, format_id, min_team_size, max_team_size, max_teams,
                     best_of, registration_opens_at, registration_closes_at, starts_at, ends_at,
                     allow_random_teams, created_by)
                VALUES ($1, $2, COALESCE($3, 1), COALESCE($4, 1), COALESCE($5, 1), $6,
                        COALESCE($7, 1), $8, $9, $10, $11, COALESCE($12, false), $13)
                RETURNING *
             )
             SELECT {COLUMNS} FROM t JOIN users u ON u.id = t.created_by"
        );
        sqlx::query_as::<_, Tournament>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(format_id(input.format))
            .bind(input.min_team_size)
            .bind(input.max_team_size)
            .bind(input.max_teams)
            .bind(input.best_of)
            .bind(input.registration_opens_at)
            .bind(input.registration_closes_at)
            .bind(input.starts_at)
            .bind(input.ends_at)
            .bind(input.allow_random_teams)
            .bind(created_by)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Tournament>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM {FROM} WHERE t.id = $1");
        sqlx::query_as::<_, Tournament>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List tournaments ordered by start time, optionally restricted to the
    /// phase they are in at `now`.
    ///
    /// The predicates mirror [`tourney_core::schedule::Schedule::phase_at`].
    pub async fn list(
        pool: &PgPool,
        phase: Option<Phase>,
        now: Timestamp,
    ) -> Result<Vec<Tournament>, sqlx::Error> {
        let order = "ORDER BY t.starts_at ASC, t.id ASC";
        let Some(phase) = phase else {
            let query = format!("SELECT {COLUMNS} FROM {FROM} {order}");
            return sqlx::query_as::<_, Tournament>(&query).fetch_all(pool).await;
        };
        let predicate = match phase {
            Phase::Future => "$1 < t.starts_at",
            Phase::Active => "t.starts_at <= $1 AND $1 < t.ends_at",
            Phase::Past => "t.ends_at <= $1",
        };
        let query = format!("SELECT {COLUMNS} FROM {FROM} WHERE {predicate} {order}");
        sqlx::query_as::<_, Tournament>(&query)
            .bind(now)
            .fetch_all(pool)
            .await
    }

    /// Update a tournament. Only non-`None` fields in `input` are applied.
    /// Callers hold the row lock from [`TournamentRepo::lock`] so the
    /// bracket state they checked cannot change underneath them.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        id: DbId,
        input: &UpdateTournament,
    ) -> Result<Option<Tournament>, sqlx::Error> {
        let query = format!(
            "WITH t AS (
                UPDATE tournaments SET
                    name = COALESCE($2, name),
                    description = COALESCE($3, description),
                    format_id = COALESCE($4, format_id),
                    min_team_size = COALESCE($5, min_team_size),
                    max_team_size = COALESCE($6, max_team_size),
                    max_teams = COALESCE($7, max_teams),
                    best_of = COALESCE($8, best_of),
                    registration_opens_at = COALESCE($9, registration_opens_at),
                    registration_closes_at = COALESCE($10, registration_closes_at),
                    starts_at = COALESCE($11, starts_at),
                    ends_at = COALESCE($12, ends_at),
                    allow_random_teams = COALESCE($13, allow_random_teams)
                WHERE id = $1
                RETURNING *
             )
             SELECT {COLUMNS} FROM t JOIN users u ON u.id = t.created_by"
        );
        sqlx::query_as::<_, Tournament>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(format_id(input.format))
            .bind(input.min_team_size)
            .bind(input.max_team_size)
            .bind(input.max_teams)
            .bind(input.best_of)
            .bind(input.registration_opens_at)
            .bind(input.registration_closes_at)
            .bind(input.starts_at)
            .bind(input.ends_at)
            .bind(input.allow_random_teams)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Load a tournament and lock its row until the transaction ends.
    ///
    /// Registration, bracket generation and result reporting all take this
    /// lock first, so they serialize per tournament.
    pub async fn lock(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        id: DbId,
    ) -> Result<Option<Tournament>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM {FROM} WHERE t.id = $1 FOR UPDATE OF t");
        sqlx::query_as::<_, Tournament>(&query)
            .bind(id)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Stamp `bracket_generated_at`. Returns `false` if a bracket already exists.
    pub async fn mark_bracket_generated(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE tournaments SET bracket_generated_at = NOW()
             WHERE id = $1 AND bracket_generated_at IS NULL",
        )
        .bind(id)
        .execute(&mut **tx)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Add `count` to the number of random teams formed for the tournament.
    pub async fn record_random_teams(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        id: DbId,
        count: i32,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE tournaments SET random_teams_formed = random_teams_formed + $2 WHERE id = $1",
        )
        .bind(id)
        .bind(count)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }
}
