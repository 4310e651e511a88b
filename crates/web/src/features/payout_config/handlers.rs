use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use ledger::{
    Ledger,
    dto::payout_config::{RateResponse, SetPayoutConfigRequest, SetRateRequest},
    models::{Identity, PayoutConfig},
    services::payout_config,
};

use crate::error::WebError;

use super::services::{self, Rate};

#[utoipa::path(
    get,
    path = "/api/payout-config",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Configuration effective now", body = PayoutConfig),
        (status = 500, description = "No configuration has been set")
    ),
    tag = "payout-config"
)]
pub async fn get_current_config(State(ledger): State<Ledger>) -> Result<Response, WebError> {
    let config = payout_config::current_config(&ledger).await?;

    Ok(Json(config).into_response())
}

#[utoipa::path(
    put,
    path = "/api/payout-config",
    request_body = SetPayoutConfigRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "New configuration version appended", body = PayoutConfig),
        (status = 400, description = "Rates out of range"),
        (status = 403, description = "Admin capability required"),
        (status = 409, description = "effective_from does not follow the latest version")
    ),
    tag = "payout-config"
)]
pub async fn set_config(
    State(ledger): State<Ledger>,
    Extension(identity): Extension<Identity>,
    Json(req): Json<SetPayoutConfigRequest>,
) -> Result<Response, WebError> {
    let config = services::set_config(&ledger, &identity, req).await?;

    Ok((StatusCode::CREATED, Json(config)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/payout-config/history",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "All configuration versions, oldest first", body = Vec<PayoutConfig>),
        (status = 403, description = "Admin capability required")
    ),
    tag = "payout-config"
)]
pub async fn get_history(
    State(ledger): State<Ledger>,
    Extension(identity): Extension<Identity>,
) -> Result<Response, WebError> {
    let history = payout_config::history(&ledger, &identity).await?;

    Ok(Json(history).into_response())
}

#[utoipa::path(
    get,
    path = "/api/payout-config/sponsor-bonus",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Sponsor bonus effective now", body = RateResponse)
    ),
    tag = "payout-config"
)]
pub async fn get_sponsor_bonus(State(ledger): State<Ledger>) -> Result<Response, WebError> {
    let rate = services::current_rate(&ledger, Rate::SponsorBonus).await?;

    Ok(Json(rate).into_response())
}

#[utoipa::path(
    put,
    path = "/api/payout-config/sponsor-bonus",
    request_body = SetRateRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "New version with the sponsor bonus changed", body = RateResponse),
        (status = 403, description = "Admin capability required")
    ),
    tag = "payout-config"
)]
pub async fn set_sponsor_bonus(
    State(ledger): State<Ledger>,
    Extension(identity): Extension<Identity>,
    Json(req): Json<SetRateRequest>,
) -> Result<Response, WebError> {
    let rate = services::set_rate(&ledger, &identity, Rate::SponsorBonus, req).await?;

    Ok((StatusCode::CREATED, Json(rate)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/payout-config/tds",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "TDS rate effective now", body = RateResponse)
    ),
    tag = "payout-config"
)]
pub async fn get_tds(State(ledger): State<Ledger>) -> Result<Response, WebError> {
    let rate = services::current_rate(&ledger, Rate::Tds).await?;

    Ok(Json(rate).into_response())
}

#[utoipa::path(
    put,
    path = "/api/payout-config/tds",
    request_body = SetRateRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "New version with the TDS rate changed", body = RateResponse),
        (status = 403, description = "Admin capability required")
    ),
    tag = "payout-config"
)]
pub async fn set_tds(
    State(ledger): State<Ledger>,
    Extension(identity): Extension<Identity>,
    Json(req): Json<SetRateRequest>,
) -> Result<Response, WebError> {
    let rate = services::set_rate(&ledger, &identity, Rate::Tds, req).await?;

    Ok((StatusCode::CREATED, Json(rate)).into_response())
}
