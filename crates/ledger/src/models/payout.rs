use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Immutable split of an approved payment.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Payout {
    pub payout_id: Uuid,
    pub payment_id: Uuid,
    pub participation_id: Uuid,
    pub user_id: Uuid,
    pub competition_id: Uuid,
    pub config_id: Uuid,
    pub gross: Decimal,
    pub sponsor_bonus: Decimal,
    pub tds: Decimal,
    pub net: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Output of the payout calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PayoutBreakdown {
    pub gross: Decimal,
    pub sponsor_bonus: Decimal,
    pub tds: Decimal,
    pub net: Decimal,
}

#[derive(Debug, Clone)]
pub struct NewPayout {
    pub payment_id: Uuid,
    pub participation_id: Uuid,
    pub user_id: Uuid,
    pub competition_id: Uuid,
    pub config_id: Uuid,
    pub breakdown: PayoutBreakdown,
    pub created_at: DateTime<Utc>,
}

impl NewPayout {
    pub fn into_payout(self, payout_id: Uuid) -> Payout {
        Payout {
            payout_id,
            payment_id: self.payment_id,
            participation_id: self.participation_id,
            user_id: self.user_id,
            competition_id: self.competition_id,
            config_id: self.config_id,
            gross: self.breakdown.gross,
            sponsor_bonus: self.breakdown.sponsor_bonus,
            tds: self.breakdown.tds,
            net: self.breakdown.net,
            created_at: self.created_at,
        }
    }
}
