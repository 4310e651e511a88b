use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{LedgerError, Result, is_unique_violation};
use crate::models::{NewParticipation, Participation, ParticipationFilter, ParticipationStatus};

pub(crate) const PARTICIPATION_COLUMNS: &str =
    "participation_id, competition_id, user_id, status, payment_attempts, created_at, updated_at";

pub struct ParticipationRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ParticipationRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, new: &NewParticipation) -> Result<Participation> {
        let participation = sqlx::query_as::<_, Participation>(&format!(
            r#"
            INSERT INTO participations (
                participation_id, competition_id, user_id, status,
                payment_attempts, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, 0, $5, $5)
            RETURNING {PARTICIPATION_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(new.competition_id)
        .bind(new.user_id)
        .bind(ParticipationStatus::Enrolled)
        .bind(new.created_at)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                return LedgerError::AlreadyEnrolled;
            }
            if let sqlx::Error::Database(ref db_err) = e {
                if db_err.code().as_deref() == Some("23503") {
                    return LedgerError::NotFound;
                }
            }
            LedgerError::from(e)
        })?;

        Ok(participation)
    }

    pub async fn find_by_id(&self, participation_id: Uuid) -> Result<Participation> {
        let participation = sqlx::query_as::<_, Participation>(&format!(
            r#"
            SELECT {PARTICIPATION_COLUMNS}
            FROM participations
            WHERE participation_id = $1
            "#
        ))
        .bind(participation_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(LedgerError::NotFound)?;

        Ok(participation)
    }

    pub async fn list(&self, filter: &ParticipationFilter) -> Result<(Vec<Participation>, i64)> {
        const FILTER: &str = r#"
            ($1::uuid IS NULL OR user_id = $1)
            AND ($2::uuid IS NULL OR competition_id = $2)
            AND ($3::text IS NULL OR status::text = $3)
        "#;
        let status = filter.status.map(|s| s.as_str());

        let participations = sqlx::query_as::<_, Participation>(&format!(
            r#"
            SELECT {PARTICIPATION_COLUMNS}
            FROM participations
            WHERE {FILTER}
            ORDER BY created_at DESC, participation_id
            LIMIT $4 OFFSET $5
            "#
        ))
        .bind(filter.user_id)
        .bind(filter.competition_id)
        .bind(status)
        .bind(i64::from(filter.limit))
        .bind(i64::from(filter.offset))
        .fetch_all(self.pool)
        .await?;

        let total = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM participations WHERE {FILTER}"
        ))
        .bind(filter.user_id)
        .bind(filter.competition_id)
        .bind(status)
        .fetch_one(self.pool)
        .await?;

        Ok((participations, total))
    }

    pub async fn transition(
        &self,
        participation_id: Uuid,
        expected: &[ParticipationStatus],
        next: ParticipationStatus,
        at: DateTime<Utc>,
    ) -> Result<Participation> {
        let updated = sqlx::query_as::<_, Participation>(&format!(
            r#"
            UPDATE participations
            SET status = $2, updated_at = $3
            WHERE participation_id = $1 AND status::text = ANY($4)
            RETURNING {PARTICIPATION_COLUMNS}
            "#
        ))
        .bind(participation_id)
        .bind(next)
        .bind(at)
        .bind(status_names(expected))
        .fetch_optional(self.pool)
        .await?;

        match updated {
            Some(participation) => Ok(participation),
            None => Err(self.cas_miss(participation_id, expected).await),
        }
    }

    /// Explains why a compare-and-set matched no row.
    pub(crate) async fn cas_miss(
        &self,
        participation_id: Uuid,
        expected: &[ParticipationStatus],
    ) -> LedgerError {
        match self.find_by_id(participation_id).await {
            Ok(current) => {
                tracing::warn!(
                    %participation_id,
                    actual = %current.status,
                    "Participation status changed concurrently"
                );
                LedgerError::invalid_state(expected, current.status)
            }
            Err(e) => e,
        }
    }
}

pub(crate) fn status_names(statuses: &[ParticipationStatus]) -> Vec<String> {
    statuses.iter().map(|s| s.as_str().to_string()).collect()
}
