use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Competition {
    pub competition_id: Uuid,
    pub title: String,
    pub slug: String,
    pub entry_fee: Decimal,
    pub opens_at: DateTime<Utc>,
    pub closes_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Competition {
    /// Enrollment window is `[opens_at, closes_at)`; an unset `closes_at` never closes.
    pub fn is_open_at(&self, at: DateTime<Utc>) -> bool {
        self.opens_at <= at && self.closes_at.is_none_or(|closes_at| at < closes_at)
    }
}

/// Values for a competition about to be inserted.
#[derive(Debug, Clone)]
pub struct NewCompetition {
    pub title: String,
    pub slug: String,
    pub entry_fee: Decimal,
    pub opens_at: DateTime<Utc>,
    pub closes_at: Option<DateTime<Utc>>,
}

/// Fully resolved replacement values for an existing competition.
#[derive(Debug, Clone)]
pub struct CompetitionChanges {
    pub title: String,
    pub slug: String,
    pub entry_fee: Decimal,
    pub opens_at: DateTime<Utc>,
    pub closes_at: Option<DateTime<Utc>>,
}
