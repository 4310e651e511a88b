use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;
use crate::models::UserStatus;

pub struct UserStatusRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserStatusRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn upsert(
        &self,
        user_id: Uuid,
        blocked: bool,
        updated_by: Uuid,
        at: DateTime<Utc>,
    ) -> Result<UserStatus> {
        let status = sqlx::query_as::<_, UserStatus>(
            r#"
            INSERT INTO user_statuses (user_id, blocked, updated_by, updated_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id)
            DO UPDATE SET
                blocked = EXCLUDED.blocked,
                updated_by = EXCLUDED.updated_by,
                updated_at = EXCLUDED.updated_at
            RETURNING user_id, blocked, updated_by, updated_at
            "#,
        )
        .bind(user_id)
        .bind(blocked)
        .bind(updated_by)
        .bind(at)
        .fetch_one(self.pool)
        .await?;

        Ok(status)
    }

    pub async fn is_blocked(&self, user_id: Uuid) -> Result<bool> {
        let blocked =
            sqlx::query_scalar::<_, bool>("SELECT blocked FROM user_statuses WHERE user_id = $1")
                .bind(user_id)
                .fetch_optional(self.pool)
                .await?;

        Ok(blocked.unwrap_or(false))
    }
}
