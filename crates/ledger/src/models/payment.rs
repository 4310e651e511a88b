use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::payout::NewPayout;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[sqlx(type_name = "review_decision", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ReviewDecision {
    Approved,
    Rejected,
}

/// Payment evidence attached to a participation.
///
/// Rejected payments stay on record; a resubmission is a new row with the
/// next `attempt` number.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct PaymentDetail {
    pub payment_id: Uuid,
    pub participation_id: Uuid,
    pub attempt: i32,
    pub amount: Decimal,
    pub evidence: String,
    pub submitted_at: DateTime<Utc>,
    pub reviewer_id: Option<Uuid>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub decision: Option<ReviewDecision>,
    pub review_note: Option<String>,
}

impl PaymentDetail {
    /// Undecided or approved.
    pub fn is_active(&self) -> bool {
        self.decision != Some(ReviewDecision::Rejected)
    }

    pub fn is_pending(&self) -> bool {
        self.decision.is_none()
    }
}

#[derive(Debug, Clone)]
pub struct PaymentSubmission {
    pub participation_id: Uuid,
    pub amount: Decimal,
    pub evidence: String,
    pub submitted_at: DateTime<Utc>,
}

/// Everything a review writes, applied as one atomic unit.
#[derive(Debug, Clone)]
pub struct PaymentReview {
    pub participation_id: Uuid,
    pub payment_id: Uuid,
    pub decision: ReviewDecision,
    pub reviewer_id: Uuid,
    pub reviewed_at: DateTime<Utc>,
    pub note: Option<String>,
    /// Present exactly when `decision` is `Approved`.
    pub payout: Option<NewPayout>,
}
