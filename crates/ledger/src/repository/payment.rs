use sqlx::PgPool;
use uuid::Uuid;

use super::participation::{PARTICIPATION_COLUMNS, ParticipationRepository, status_names};
use crate::error::{LedgerError, Result, is_unique_violation};
use crate::models::{
    Participation, ParticipationStatus, PaymentDetail, PaymentReview, PaymentSubmission, Payout,
    ReviewDecision,
};

const PAYMENT_COLUMNS: &str = "payment_id, participation_id, attempt, amount, evidence, \
     submitted_at, reviewer_id, reviewed_at, decision, review_note";

const PAYOUT_COLUMNS: &str = "payout_id, payment_id, participation_id, user_id, competition_id, \
     config_id, gross, sponsor_bonus, tds, net, created_at";

/// Payment details and the payouts derived from them.
///
/// Writes that touch a participation's status run in one transaction together
/// with the rows they depend on; dropping the future before commit rolls
/// everything back.
pub struct PaymentRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PaymentRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn record(
        &self,
        submission: &PaymentSubmission,
        expected: &[ParticipationStatus],
    ) -> Result<(Participation, PaymentDetail)> {
        let mut tx = self.pool.begin().await?;

        let participation = sqlx::query_as::<_, Participation>(&format!(
            r#"
            UPDATE participations
            SET status = $2,
                payment_attempts = payment_attempts + 1,
                updated_at = $3
            WHERE participation_id = $1 AND status::text = ANY($4)
            RETURNING {PARTICIPATION_COLUMNS}
            "#
        ))
        .bind(submission.participation_id)
        .bind(ParticipationStatus::PendingVerification)
        .bind(submission.submitted_at)
        .bind(status_names(expected))
        .fetch_optional(&mut *tx)
        .await?;

        let Some(participation) = participation else {
            tx.rollback().await?;
            return Err(ParticipationRepository::new(self.pool)
                .cas_miss(submission.participation_id, expected)
                .await);
        };

        let payment = sqlx::query_as::<_, PaymentDetail>(&format!(
            r#"
            INSERT INTO payment_details (
                payment_id, participation_id, attempt, amount, evidence, submitted_at
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {PAYMENT_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(submission.participation_id)
        .bind(participation.payment_attempts)
        .bind(submission.amount)
        .bind(&submission.evidence)
        .bind(submission.submitted_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                return LedgerError::ConstraintViolation(
                    "Participation already has an active payment".to_string(),
                );
            }
            LedgerError::from(e)
        })?;

        tx.commit().await?;

        Ok((participation, payment))
    }

    pub async fn list_for(&self, participation_id: Uuid) -> Result<Vec<PaymentDetail>> {
        let payments = sqlx::query_as::<_, PaymentDetail>(&format!(
            r#"
            SELECT {PAYMENT_COLUMNS}
            FROM payment_details
            WHERE participation_id = $1
            ORDER BY attempt
            "#
        ))
        .bind(participation_id)
        .fetch_all(self.pool)
        .await?;

        Ok(payments)
    }

    pub async fn apply_review(&self, review: &PaymentReview) -> Result<(Participation, Option<Payout>)> {
        let next = match (review.decision, &review.payout) {
            (ReviewDecision::Approved, Some(_)) => ParticipationStatus::Verified,
            (ReviewDecision::Rejected, None) => ParticipationStatus::PaymentRejected,
            _ => {
                return Err(LedgerError::ConstraintViolation(
                    "A payout must accompany exactly the approved reviews".to_string(),
                ));
            }
        };

        let mut tx = self.pool.begin().await?;

        // Conflicts with the append lock, so no version can land between the
        // check below and commit.
        if let Some(new) = &review.payout {
            sqlx::query("LOCK TABLE payout_configs IN SHARE MODE")
                .execute(&mut *tx)
                .await?;

            let effective: Option<Uuid> = sqlx::query_scalar(
                r#"
                SELECT config_id
                FROM payout_configs
                WHERE effective_from <= $1
                ORDER BY effective_from DESC
                LIMIT 1
                "#,
            )
            .bind(new.created_at)
            .fetch_optional(&mut *tx)
            .await?;

            if effective != Some(new.config_id) {
                tx.rollback().await?;
                return Err(LedgerError::ConfigurationChanged);
            }
        }

        let participation = sqlx::query_as::<_, Participation>(&format!(
            r#"
            UPDATE participations
            SET status = $2, updated_at = $3
            WHERE participation_id = $1 AND status = $4
            RETURNING {PARTICIPATION_COLUMNS}
            "#
        ))
        .bind(review.participation_id)
        .bind(next)
        .bind(review.reviewed_at)
        .bind(ParticipationStatus::PendingVerification)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(participation) = participation else {
            tx.rollback().await?;
            return Err(ParticipationRepository::new(self.pool)
                .cas_miss(review.participation_id, &ParticipationStatus::REVIEWABLE)
                .await);
        };

        let reviewed = sqlx::query(
            r#"
            UPDATE payment_details
            SET decision = $3, reviewer_id = $4, reviewed_at = $5, review_note = $6
            WHERE payment_id = $1 AND participation_id = $2 AND decision IS NULL
            "#,
        )
        .bind(review.payment_id)
        .bind(review.participation_id)
        .bind(review.decision)
        .bind(review.reviewer_id)
        .bind(review.reviewed_at)
        .bind(&review.note)
        .execute(&mut *tx)
        .await?;

        if reviewed.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(LedgerError::AlreadyReviewed);
        }

        let payout = match &review.payout {
            Some(new) => {
                let payout = sqlx::query_as::<_, Payout>(&format!(
                    r#"
                    INSERT INTO payouts (
                        payout_id, payment_id, participation_id, user_id, competition_id,
                        config_id, gross, sponsor_bonus, tds, net, created_at
                    )
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
                    RETURNING {PAYOUT_COLUMNS}
                    "#
                ))
                .bind(Uuid::new_v4())
                .bind(new.payment_id)
                .bind(new.participation_id)
                .bind(new.user_id)
                .bind(new.competition_id)
                .bind(new.config_id)
                .bind(new.breakdown.gross)
                .bind(new.breakdown.sponsor_bonus)
                .bind(new.breakdown.tds)
                .bind(new.breakdown.net)
                .bind(new.created_at)
                .fetch_one(&mut *tx)
                .await
                .map_err(|e| {
                    if is_unique_violation(&e) {
                        return LedgerError::AlreadyReviewed;
                    }
                    LedgerError::from(e)
                })?;
                Some(payout)
            }
            None => None,
        };

        tx.commit().await?;

        Ok((participation, payout))
    }

    pub async fn find_payout(&self, participation_id: Uuid) -> Result<Option<Payout>> {
        let payout = sqlx::query_as::<_, Payout>(&format!(
            r#"
            SELECT {PAYOUT_COLUMNS}
            FROM payouts
            WHERE participation_id = $1
            "#
        ))
        .bind(participation_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(payout)
    }
}
