use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// One version of the sponsor-bonus / TDS configuration.
///
/// Versions are append-only and totally ordered by `effective_from`, so a payout
/// computed under an older version can always be reproduced from `config_id`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct PayoutConfig {
    pub config_id: Uuid,
    pub version: i32,
    pub sponsor_bonus_pct: Decimal,
    pub tds_pct: Decimal,
    pub effective_from: DateTime<Utc>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

impl PayoutConfig {
    pub fn rates(&self) -> PayoutRates {
        PayoutRates {
            sponsor_bonus_pct: self.sponsor_bonus_pct,
            tds_pct: self.tds_pct,
        }
    }
}

/// Percentages applied to a gross amount, both in `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PayoutRates {
    pub sponsor_bonus_pct: Decimal,
    pub tds_pct: Decimal,
}

impl PayoutRates {
    pub fn new(sponsor_bonus_pct: Decimal, tds_pct: Decimal) -> Self {
        Self {
            sponsor_bonus_pct,
            tds_pct,
        }
    }

    /// Returns a description of the first violated bound, if any.
    pub fn range_violation(&self) -> Option<String> {
        let hundred = Decimal::from(100);

        if self.sponsor_bonus_pct < Decimal::ZERO {
            return Some("sponsor_bonus_pct must not be negative".to_string());
        }
        if self.tds_pct < Decimal::ZERO {
            return Some("tds_pct must not be negative".to_string());
        }
        if self.sponsor_bonus_pct + self.tds_pct > hundred {
            return Some("sponsor_bonus_pct + tds_pct must not exceed 100".to_string());
        }
        None
    }
}

#[derive(Debug, Clone)]
pub struct NewPayoutConfig {
    pub rates: PayoutRates,
    pub effective_from: DateTime<Utc>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_rates() {
        assert!(PayoutRates::new(Decimal::from(10), Decimal::from(5)).range_violation().is_none());
        assert!(PayoutRates::new(Decimal::ZERO, Decimal::ZERO).range_violation().is_none());
        assert!(PayoutRates::new(Decimal::from(60), Decimal::from(40)).range_violation().is_none());
    }

    #[test]
    fn test_negative_rate_rejected() {
        let violation = PayoutRates::new(Decimal::from(-1), Decimal::from(5)).range_violation();
        assert!(violation.unwrap().contains("sponsor_bonus_pct"));

        let violation = PayoutRates::new(Decimal::from(1), Decimal::new(-1, 2)).range_violation();
        assert!(violation.unwrap().contains("tds_pct"));
    }

    #[test]
    fn test_sum_above_hundred_rejected() {
        let rates = PayoutRates::new(Decimal::new(5001, 2), Decimal::from(50));
        assert!(rates.range_violation().is_some());
    }
}
