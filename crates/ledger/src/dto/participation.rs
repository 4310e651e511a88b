use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::common::PaginationParams;
use crate::models::{
    Participation, ParticipationStatus, PaymentDetail, Payout, PayoutConfig, ReviewDecision,
};

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct SubmitPaymentRequest {
    #[schema(example = "1000.00")]
    pub amount: Decimal,

    /// Transaction id or receipt pointer
    #[validate(length(
        min = 1,
        max = 512,
        message = "Evidence must be between 1 and 512 characters"
    ))]
    pub evidence: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct VerifyPaymentRequest {
    pub decision: ReviewDecision,

    #[validate(length(max = 1024))]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct ParticipationListQuery {
    pub status: Option<ParticipationStatus>,
    pub competition_id: Option<Uuid>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl ParticipationListQuery {
    pub fn pagination(&self) -> PaginationParams {
        let defaults = PaginationParams::default();
        PaginationParams::new(
            self.page.unwrap_or(defaults.page),
            self.page_size.unwrap_or(defaults.page_size),
        )
    }
}

/// A participation with its payment history and payout, enough to render a receipt.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ParticipationDetailResponse {
    pub participation: Participation,
    pub payments: Vec<PaymentDetail>,
    pub payout: Option<Payout>,
    /// Configuration version the payout was computed with.
    pub payout_config: Option<PayoutConfig>,
}

/// What the payer gets back after submitting: the participation, now pending, and the recorded payment.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PaymentReceipt {
    pub participation: Participation,
    pub payment: PaymentDetail,
}

/// Result of an admin review: the updated participation and, on approval, its payout.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReviewOutcome {
    pub participation: Participation,
    pub payout: Option<Payout>,
}
