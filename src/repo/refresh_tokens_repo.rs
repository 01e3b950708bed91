use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct RefreshTokenRecord {
    pub user_id: Uuid,
    pub expires_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct RefreshTokensRepo {
    pub pool: PgPool,
}

impl RefreshTokensRepo {
    pub async fn insert(
        &self,
        token_digest: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<()> {
        sqlx::query(
            "INSERT INTO refresh_tokens (token_digest, user_id, expires_at) VALUES ($1, $2, $3)",
        )
        .bind(token_digest)
        .bind(user_id)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Single-use consumption: the row is removed whether or not the
    /// caller ends up accepting it, so a replayed token always misses.
    pub async fn take(&self, token_digest: &str) -> Result<Option<RefreshTokenRecord>> {
        let row = sqlx::query(
            "DELETE FROM refresh_tokens WHERE token_digest = $1 RETURNING user_id, expires_at",
        )
        .bind(token_digest)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| RefreshTokenRecord {
            user_id: r.get("user_id"),
            expires_at: r.get("expires_at"),
        }))
    }

    pub async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64> {
        let result = sqlx::query("DELETE FROM refresh_tokens WHERE expires_at < $1")
            .bind(now)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
