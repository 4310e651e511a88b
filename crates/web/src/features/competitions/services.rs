use chrono::Utc;
use ledger::{
    Ledger,
    dto::competition::{CreateCompetitionRequest, UpdateCompetitionRequest},
    models::{Competition, Identity},
    services::competitions,
};
use uuid::Uuid;
use validator::Validate;

use crate::error::{ApiResult, WebError};

/// Validate the payload, fill in defaults and create the competition
pub async fn create_competition(
    ledger: &Ledger,
    identity: &Identity,
    request: CreateCompetitionRequest,
) -> ApiResult<Competition> {
    request.validate()?;

    let new = request
        .into_new(Utc::now())
        .map_err(|e| WebError::BadRequest(e.to_string()))?;

    Ok(competitions::create_competition(ledger, identity, new).await?)
}

/// Validate the payload and apply it on top of the stored competition
pub async fn update_competition(
    ledger: &Ledger,
    identity: &Identity,
    competition_id: Uuid,
    request: &UpdateCompetitionRequest,
) -> ApiResult<Competition> {
    request.validate()?;

    Ok(competitions::update_competition(ledger, identity, competition_id, request).await?)
}
