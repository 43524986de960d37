//! Refresh-token sessions in `user_sessions`.
//!
//! Only the SHA-256 hash of a refresh token is stored. A token is good for
//! exactly one refresh: [`SessionRepo::consume`] revokes it in the same
//! statement that reads it.

use sqlx::PgPool;
use tourney_core::types::{DbId, Timestamp};

pub struct SessionRepo;

impl SessionRepo {
    /// Store a new refresh session and return its id.
    pub async fn issue(
        pool: &PgPool,
        user_id: DbId,
        refresh_token_hash: &str,
        expires_at: Timestamp,
    ) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "INSERT INTO user_sessions (user_id, refresh_token_hash, expires_at)
             VALUES ($1, $2, $3)
             RETURNING id",
        )
        .bind(user_id)
        .bind(refresh_token_hash)
        .bind(expires_at)
        .fetch_one(pool)
        .await
    }

    /// Revoke the live session with this hash and return its user.
    ///
    /// `None` when the token is unknown, expired, or already used, including
    /// when a concurrent refresh with the same token got there first.
    pub async fn consume(
        pool: &PgPool,
        refresh_token_hash: &str,
    ) -> Result<Option<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "UPDATE user_sessions SET is_revoked = true
             WHERE refresh_token_hash = $1
               AND is_revoked = false
               AND expires_at > NOW()
             RETURNING user_id",
        )
        .bind(refresh_token_hash)
        .fetch_optional(pool)
        .await
    }

    /// Revoke every live session of a user. Returns how many were revoked.
    pub async fn revoke_all_for_user(pool: &PgPool, user_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE user_sessions SET is_revoked = true
             WHERE user_id = $1 AND is_revoked = false",
        )
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
