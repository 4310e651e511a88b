use chrono::Utc;
use uuid::Uuid;

use super::payout_calculation::compute_payout;
use crate::Ledger;
use crate::dto::participation::ReviewOutcome;
use crate::error::{LedgerError, Result};
use crate::models::{
    Identity, NewPayout, ParticipationStatus, PaymentDetail, PaymentReview, ReviewDecision,
};

/// Approve or reject the pending payment of a participation.
///
/// Admin capability is checked on every call. On approval the configuration
/// effective at the approval instant is read once and the payout, the payment
/// review and the status change are committed together. If a configuration
/// version taking effect at or before that instant lands in between, the
/// commit is refused with `ConfigurationChanged` and nothing is written.
/// Repeating a call after it succeeded (or after a timeout that actually
/// committed) fails with `InvalidState` and never pays twice.
pub async fn verify(
    ledger: &Ledger,
    reviewer: &Identity,
    participation_id: Uuid,
    decision: ReviewDecision,
    note: Option<String>,
) -> Result<ReviewOutcome> {
    reviewer.require_admin()?;

    let store = ledger.store();
    let participation = ledger.call(store.find_participation(participation_id)).await?;
    if participation.status != ParticipationStatus::PendingVerification {
        return Err(LedgerError::invalid_state(
            &ParticipationStatus::REVIEWABLE,
            participation.status,
        ));
    }

    let payment = ledger
        .call(store.list_payments(participation_id))
        .await?
        .into_iter()
        .find(PaymentDetail::is_pending)
        .ok_or(LedgerError::AlreadyReviewed)?;

    let reviewed_at = Utc::now();
    let payout = match decision {
        ReviewDecision::Approved => {
            let config = ledger.call(store.effective_config(reviewed_at)).await?;
            let breakdown = compute_payout(payment.amount, &config.rates())?;

            Some(NewPayout {
                payment_id: payment.payment_id,
                participation_id,
                user_id: participation.user_id,
                competition_id: participation.competition_id,
                config_id: config.config_id,
                breakdown,
                created_at: reviewed_at,
            })
        }
        ReviewDecision::Rejected => None,
    };

    let (participation, payout) = ledger
        .call(store.apply_review(PaymentReview {
            participation_id,
            payment_id: payment.payment_id,
            decision,
            reviewer_id: reviewer.user_id,
            reviewed_at,
            note,
            payout,
        }))
        .await?;

    match &payout {
        Some(payout) => tracing::info!(
            %participation_id,
            payment_id = %payout.payment_id,
            config_id = %payout.config_id,
            gross = %payout.gross,
            net = %payout.net,
            "Payment approved"
        ),
        None => tracing::info!(%participation_id, "Payment rejected"),
    }

    Ok(ReviewOutcome {
        participation,
        payout,
    })
}
