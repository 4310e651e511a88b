use chrono::Utc;
use uuid::Uuid;

use crate::Ledger;
use crate::dto::competition::UpdateCompetitionRequest;
use crate::error::{LedgerError, Result};
use crate::models::{Competition, Identity, NewCompetition};

pub async fn list_competitions(ledger: &Ledger) -> Result<Vec<Competition>> {
    ledger.call(ledger.store().list_competitions()).await
}

pub async fn get_competition(ledger: &Ledger, competition_id: Uuid) -> Result<Competition> {
    ledger
        .call(ledger.store().find_competition(competition_id))
        .await
}

pub async fn create_competition(
    ledger: &Ledger,
    admin: &Identity,
    new: NewCompetition,
) -> Result<Competition> {
    admin.require_admin()?;

    let competition = ledger.call(ledger.store().insert_competition(new)).await?;
    tracing::info!(
        competition_id = %competition.competition_id,
        slug = %competition.slug,
        "Competition created"
    );

    Ok(competition)
}

/// Competitions are frozen once anyone has enrolled; only closing remains possible.
pub async fn update_competition(
    ledger: &Ledger,
    admin: &Identity,
    competition_id: Uuid,
    request: &UpdateCompetitionRequest,
) -> Result<Competition> {
    admin.require_admin()?;

    let existing = get_competition(ledger, competition_id).await?;
    let changes = request
        .apply_to(&existing)
        .map_err(|e| LedgerError::InvalidRange(e.to_string()))?;

    ledger
        .call(ledger.store().update_competition(competition_id, changes))
        .await
}

pub async fn close_competition(
    ledger: &Ledger,
    admin: &Identity,
    competition_id: Uuid,
) -> Result<Competition> {
    admin.require_admin()?;

    let competition = ledger
        .call(ledger.store().close_competition(competition_id, Utc::now()))
        .await?;
    tracing::info!(%competition_id, "Competition window closed");

    Ok(competition)
}
