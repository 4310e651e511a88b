use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{LedgerError, Result};
use crate::models::{NewPayoutConfig, PayoutConfig};

const CONFIG_COLUMNS: &str =
    "config_id, version, sponsor_bonus_pct, tds_pct, effective_from, created_by, created_at";

pub struct PayoutConfigRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PayoutConfigRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Appends a version after checking monotonicity under a table lock, so
    /// two concurrent appends cannot both pass the check. The version must
    /// also start after the newest payout; reviews take a conflicting lock
    /// before inserting one.
    pub async fn append(&self, new: &NewPayoutConfig) -> Result<PayoutConfig> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("LOCK TABLE payout_configs IN SHARE ROW EXCLUSIVE MODE")
            .execute(&mut *tx)
            .await?;

        let latest = sqlx::query_as::<_, PayoutConfig>(&format!(
            r#"
            SELECT {CONFIG_COLUMNS}
            FROM payout_configs
            ORDER BY effective_from DESC
            LIMIT 1
            "#
        ))
        .fetch_optional(&mut *tx)
        .await?;

        let version = match latest {
            Some(latest) if new.effective_from <= latest.effective_from => {
                tx.rollback().await?;
                return Err(LedgerError::NonMonotonicTimestamp);
            }
            Some(latest) => latest.version + 1,
            None => 1,
        };

        let newest_payout: Option<DateTime<Utc>> =
            sqlx::query_scalar("SELECT MAX(created_at) FROM payouts")
                .fetch_one(&mut *tx)
                .await?;
        if newest_payout.is_some_and(|at| new.effective_from <= at) {
            tx.rollback().await?;
            return Err(LedgerError::NonMonotonicTimestamp);
        }

        let config = sqlx::query_as::<_, PayoutConfig>(&format!(
            r#"
            INSERT INTO payout_configs (
                config_id, version, sponsor_bonus_pct, tds_pct,
                effective_from, created_by, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {CONFIG_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(version)
        .bind(new.rates.sponsor_bonus_pct)
        .bind(new.rates.tds_pct)
        .bind(new.effective_from)
        .bind(new.created_by)
        .bind(new.created_at)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(config)
    }

    pub async fn latest(&self) -> Result<Option<PayoutConfig>> {
        let config = sqlx::query_as::<_, PayoutConfig>(&format!(
            r#"
            SELECT {CONFIG_COLUMNS}
            FROM payout_configs
            ORDER BY effective_from DESC
            LIMIT 1
            "#
        ))
        .fetch_optional(self.pool)
        .await?;

        Ok(config)
    }

    pub async fn effective_at(&self, at: DateTime<Utc>) -> Result<PayoutConfig> {
        let config = sqlx::query_as::<_, PayoutConfig>(&format!(
            r#"
            SELECT {CONFIG_COLUMNS}
            FROM payout_configs
            WHERE effective_from <= $1
            ORDER BY effective_from DESC
            LIMIT 1
            "#
        ))
        .bind(at)
        .fetch_optional(self.pool)
        .await?
        .ok_or(LedgerError::NoConfiguration)?;

        Ok(config)
    }

    pub async fn find_by_id(&self, config_id: Uuid) -> Result<PayoutConfig> {
        let config = sqlx::query_as::<_, PayoutConfig>(&format!(
            r#"
            SELECT {CONFIG_COLUMNS}
            FROM payout_configs
            WHERE config_id = $1
            "#
        ))
        .bind(config_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(LedgerError::NotFound)?;

        Ok(config)
    }

    pub async fn list_all(&self) -> Result<Vec<PayoutConfig>> {
        let configs = sqlx::query_as::<_, PayoutConfig>(&format!(
            r#"
            SELECT {CONFIG_COLUMNS}
            FROM payout_configs
            ORDER BY effective_from
            "#
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(configs)
    }
}
