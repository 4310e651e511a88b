use chrono::Utc;
use uuid::Uuid;

use crate::Ledger;
use crate::dto::participation::ParticipationDetailResponse;
use crate::error::{LedgerError, Result};
use crate::models::{Identity, NewParticipation, Participation, ParticipationStatus};

/// Enroll the caller in a competition.
pub async fn enroll(
    ledger: &Ledger,
    identity: &Identity,
    competition_id: Uuid,
) -> Result<Participation> {
    let store = ledger.store();
    let competition = ledger.call(store.find_competition(competition_id)).await?;

    let now = Utc::now();
    if !competition.is_open_at(now) {
        return Err(LedgerError::CompetitionClosed);
    }
    if ledger.call(store.is_user_blocked(identity.user_id)).await? {
        return Err(LedgerError::UserIneligible);
    }

    let participation = ledger
        .call(store.insert_participation(NewParticipation {
            competition_id,
            user_id: identity.user_id,
            created_at: now,
        }))
        .await?;

    tracing::info!(
        participation_id = %participation.participation_id,
        %competition_id,
        user_id = %identity.user_id,
        "User enrolled"
    );

    Ok(participation)
}

/// Fetch a participation the caller is allowed to see.
pub async fn get(
    ledger: &Ledger,
    identity: &Identity,
    participation_id: Uuid,
) -> Result<Participation> {
    let participation = ledger
        .call(ledger.store().find_participation(participation_id))
        .await?;
    identity.ensure_can_read(participation.user_id)?;

    Ok(participation)
}

/// Participation plus every payment attempt and, once verified, the payout
/// with the configuration version it was computed under.
pub async fn detail(
    ledger: &Ledger,
    identity: &Identity,
    participation_id: Uuid,
) -> Result<ParticipationDetailResponse> {
    let participation = get(ledger, identity, participation_id).await?;
    let payments = ledger
        .call(ledger.store().list_payments(participation_id))
        .await?;
    let payout = ledger
        .call(ledger.store().find_payout(participation_id))
        .await?;
    let payout_config = match &payout {
        Some(payout) => Some(ledger.call(ledger.store().find_config(payout.config_id)).await?),
        None => None,
    };

    Ok(ParticipationDetailResponse {
        participation,
        payments,
        payout,
        payout_config,
    })
}

/// Give up an unpaid or rejected participation, freeing the slot for re-enrollment.
pub async fn withdraw(
    ledger: &Ledger,
    identity: &Identity,
    participation_id: Uuid,
) -> Result<Participation> {
    let store = ledger.store();
    let participation = ledger.call(store.find_participation(participation_id)).await?;
    identity.ensure_owner(participation.user_id)?;

    let participation = ledger
        .call(store.transition_participation(
            participation_id,
            &ParticipationStatus::WITHDRAWABLE,
            ParticipationStatus::Withdrawn,
            Utc::now(),
        ))
        .await?;

    tracing::info!(%participation_id, "Participation withdrawn");

    Ok(participation)
}
