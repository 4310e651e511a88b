use ledger::{
    Ledger,
    dto::participation::{PaymentReceipt, ReviewOutcome, SubmitPaymentRequest, VerifyPaymentRequest},
    models::Identity,
    services::{payment_intake, verification},
};
use uuid::Uuid;
use validator::Validate;

use crate::error::ApiResult;

pub async fn submit_payment(
    ledger: &Ledger,
    identity: &Identity,
    participation_id: Uuid,
    request: SubmitPaymentRequest,
) -> ApiResult<PaymentReceipt> {
    request.validate()?;

    let (participation, payment) = payment_intake::submit_payment(
        ledger,
        identity,
        participation_id,
        request.amount,
        request.evidence,
    )
    .await?;

    Ok(PaymentReceipt {
        participation,
        payment,
    })
}

pub async fn verify_payment(
    ledger: &Ledger,
    identity: &Identity,
    participation_id: Uuid,
    request: VerifyPaymentRequest,
) -> ApiResult<ReviewOutcome> {
    request.validate()?;

    Ok(verification::verify(
        ledger,
        identity,
        participation_id,
        request.decision,
        request.note,
    )
    .await?)
}
