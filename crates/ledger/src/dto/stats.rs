use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// Half-open reporting window `[from, to)`; missing bounds are unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct StatsRange {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl StatsRange {
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.from.is_none_or(|from| from <= at) && self.to.is_none_or(|to| at < to)
    }

    pub fn validate(&self) -> Result<(), String> {
        match (self.from, self.to) {
            (Some(from), Some(to)) if to <= from => Err("to must be after from".to_string()),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct IncomeStatsQuery {
    /// Admins may query any user; defaults to the caller.
    pub user_id: Option<Uuid>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl IncomeStatsQuery {
    pub fn range(&self) -> StatsRange {
        StatsRange {
            from: self.from,
            to: self.to,
        }
    }
}

/// Payout totals for one user over a window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct IncomeStats {
    pub user_id: Uuid,
    pub range: StatsRange,
    pub payout_count: i64,
    pub gross_total: Decimal,
    pub sponsor_bonus_total: Decimal,
    pub tds_total: Decimal,
    pub net_total: Decimal,
}

/// Raw aggregate row; both stores fill it before it is attached to a user.
#[derive(Debug, Clone, Default, PartialEq, FromRow)]
pub struct PayoutTotals {
    pub payout_count: i64,
    pub gross_total: Decimal,
    pub sponsor_bonus_total: Decimal,
    pub tds_total: Decimal,
    pub net_total: Decimal,
}

impl PayoutTotals {
    pub fn into_income(self, user_id: Uuid, range: StatsRange) -> IncomeStats {
        IncomeStats {
            user_id,
            range,
            payout_count: self.payout_count,
            gross_total: self.gross_total,
            sponsor_bonus_total: self.sponsor_bonus_total,
            tds_total: self.tds_total,
            net_total: self.net_total,
        }
    }
}

/// Binary-volume style aggregate, grouped by competition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BvStatsEntry {
    pub competition_id: Uuid,
    pub title: String,
    pub verified_count: i64,
    pub gross_volume: Decimal,
    pub net_volume: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_range_is_half_open() {
        let now = Utc::now();
        let range = StatsRange {
            from: Some(now),
            to: Some(now + Duration::days(1)),
        };
        assert!(range.contains(now));
        assert!(!range.contains(now + Duration::days(1)));
        assert!(!range.contains(now - Duration::seconds(1)));
    }

    #[test]
    fn test_income_stats_compare_by_value() {
        let user_id = Uuid::new_v4();
        let range = StatsRange {
            from: Some(Utc::now()),
            to: None,
        };
        let a = PayoutTotals::default().into_income(user_id, range);
        let b = PayoutTotals::default().into_income(user_id, range);
        assert_eq!(a, b);
        assert_ne!(a, PayoutTotals::default().into_income(user_id, StatsRange::default()));
    }

    #[test]
    fn test_unbounded_range() {
        assert!(StatsRange::default().contains(Utc::now()));
    }

    #[test]
    fn test_inverted_range_rejected() {
        let now = Utc::now();
        let range = StatsRange {
            from: Some(now),
            to: Some(now),
        };
        assert!(range.validate().is_err());
    }
}
