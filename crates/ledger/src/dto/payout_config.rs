use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::PayoutConfig;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct SetPayoutConfigRequest {
    #[schema(example = "10")]
    pub sponsor_bonus_pct: Decimal,

    #[schema(example = "5")]
    pub tds_pct: Decimal,

    /// Defaults to the moment of the request.
    pub effective_from: Option<DateTime<Utc>>,
}

/// Update one rate, carrying the other forward from the latest version.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct SetRateRequest {
    #[schema(example = "10")]
    pub percentage: Decimal,

    pub effective_from: Option<DateTime<Utc>>,
}

/// Single-rate view of a configuration version.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RateResponse {
    pub config_id: Uuid,
    pub version: i32,
    pub percentage: Decimal,
    pub effective_from: DateTime<Utc>,
}

impl RateResponse {
    pub fn sponsor_bonus(config: &PayoutConfig) -> Self {
        Self {
            config_id: config.config_id,
            version: config.version,
            percentage: config.sponsor_bonus_pct,
            effective_from: config.effective_from,
        }
    }

    pub fn tds(config: &PayoutConfig) -> Self {
        Self {
            config_id: config.config_id,
            version: config.version,
            percentage: config.tds_pct,
            effective_from: config.effective_from,
        }
    }
}
