use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::payout_calculation::CURRENCY_SCALE;
use crate::Ledger;
use crate::error::{LedgerError, Result};
use crate::models::{Identity, Participation, ParticipationStatus, PaymentDetail, PaymentSubmission};

/// Attach payment evidence to the caller's participation and queue it for review.
///
/// The amount must equal the competition's entry fee exactly; partial
/// payments are rejected here rather than at verification.
pub async fn submit_payment(
    ledger: &Ledger,
    identity: &Identity,
    participation_id: Uuid,
    amount: Decimal,
    evidence: String,
) -> Result<(Participation, PaymentDetail)> {
    let store = ledger.store();
    let participation = ledger.call(store.find_participation(participation_id)).await?;
    identity.ensure_owner(participation.user_id)?;

    if !ParticipationStatus::PAYABLE.contains(&participation.status) {
        return Err(LedgerError::invalid_state(
            &ParticipationStatus::PAYABLE,
            participation.status,
        ));
    }

    let competition = ledger
        .call(store.find_competition(participation.competition_id))
        .await?;
    check_amount(amount, competition.entry_fee)?;

    let (participation, payment) = ledger
        .call(store.record_payment(
            PaymentSubmission {
                participation_id,
                amount,
                evidence,
                submitted_at: Utc::now(),
            },
            &ParticipationStatus::PAYABLE,
        ))
        .await?;

    tracing::info!(
        %participation_id,
        payment_id = %payment.payment_id,
        attempt = payment.attempt,
        "Payment submitted for verification"
    );

    Ok((participation, payment))
}

fn check_amount(amount: Decimal, entry_fee: Decimal) -> Result<()> {
    if amount <= Decimal::ZERO {
        return Err(LedgerError::InvalidAmount(
            "amount must be positive".to_string(),
        ));
    }
    if amount.normalize().scale() > CURRENCY_SCALE {
        return Err(LedgerError::InvalidAmount(format!(
            "amount must have at most {} decimal places",
            CURRENCY_SCALE
        )));
    }
    if amount != entry_fee {
        return Err(LedgerError::InvalidAmount(format!(
            "amount {} does not match the entry fee {}",
            amount, entry_fee
        )));
    }
    Ok(())
}
