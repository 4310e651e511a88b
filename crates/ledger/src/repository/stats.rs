use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::stats::{BvStatsEntry, PayoutTotals, StatsRange};
use crate::error::Result;

/// Aggregations are computed on read; there is no rollup table.
pub struct StatsRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> StatsRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn payout_totals(&self, user_id: Uuid, range: &StatsRange) -> Result<PayoutTotals> {
        let totals = sqlx::query_as::<_, PayoutTotals>(
            r#"
            SELECT
                COUNT(*) AS payout_count,
                COALESCE(SUM(gross), 0) AS gross_total,
                COALESCE(SUM(sponsor_bonus), 0) AS sponsor_bonus_total,
                COALESCE(SUM(tds), 0) AS tds_total,
                COALESCE(SUM(net), 0) AS net_total
            FROM payouts
            WHERE user_id = $1
              AND ($2::timestamptz IS NULL OR created_at >= $2)
              AND ($3::timestamptz IS NULL OR created_at < $3)
            "#,
        )
        .bind(user_id)
        .bind(range.from)
        .bind(range.to)
        .fetch_one(self.pool)
        .await?;

        Ok(totals)
    }

    pub async fn bv_stats(&self, range: &StatsRange) -> Result<Vec<BvStatsEntry>> {
        let entries = sqlx::query_as::<_, BvStatsEntry>(
            r#"
            SELECT
                p.competition_id,
                c.title,
                COUNT(*) AS verified_count,
                COALESCE(SUM(p.gross), 0) AS gross_volume,
                COALESCE(SUM(p.net), 0) AS net_volume
            FROM payouts p
            INNER JOIN competitions c ON c.competition_id = p.competition_id
            WHERE ($1::timestamptz IS NULL OR p.created_at >= $1)
              AND ($2::timestamptz IS NULL OR p.created_at < $2)
            GROUP BY p.competition_id, c.title
            ORDER BY gross_volume DESC, c.title
            "#,
        )
        .bind(range.from)
        .bind(range.to)
        .fetch_all(self.pool)
        .await?;

        Ok(entries)
    }
}
