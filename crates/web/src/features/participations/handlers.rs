use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use ledger::{
    Ledger,
    dto::{
        common::PaginatedResponse,
        participation::{
            ParticipationDetailResponse, ParticipationListQuery, PaymentReceipt, ReviewOutcome,
            SubmitPaymentRequest, VerifyPaymentRequest,
        },
    },
    models::{Identity, Participation},
    services::{participation, reporting},
};
use uuid::Uuid;

use crate::error::WebError;

use super::services;

#[utoipa::path(
    post,
    path = "/api/participations/{participation_id}/payment",
    params(
        ("participation_id" = Uuid, Path, description = "Participation id")
    ),
    request_body = SubmitPaymentRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Payment recorded, awaiting verification", body = PaymentReceipt),
        (status = 400, description = "Amount does not match the entry fee"),
        (status = 403, description = "Not the participation owner"),
        (status = 404, description = "Participation not found"),
        (status = 409, description = "Participation is not awaiting payment")
    ),
    tag = "participations"
)]
pub async fn submit_payment(
    State(ledger): State<Ledger>,
    Extension(identity): Extension<Identity>,
    Path(participation_id): Path<Uuid>,
    Json(req): Json<SubmitPaymentRequest>,
) -> Result<Response, WebError> {
    let receipt = services::submit_payment(&ledger, &identity, participation_id, req).await?;

    Ok((StatusCode::CREATED, Json(receipt)).into_response())
}

#[utoipa::path(
    post,
    path = "/api/participations/{participation_id}/withdraw",
    params(
        ("participation_id" = Uuid, Path, description = "Participation id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Participation withdrawn", body = Participation),
        (status = 403, description = "Not the participation owner"),
        (status = 409, description = "A payment is pending or already verified")
    ),
    tag = "participations"
)]
pub async fn withdraw(
    State(ledger): State<Ledger>,
    Extension(identity): Extension<Identity>,
    Path(participation_id): Path<Uuid>,
) -> Result<Response, WebError> {
    let withdrawn = participation::withdraw(&ledger, &identity, participation_id).await?;

    Ok(Json(withdrawn).into_response())
}

#[utoipa::path(
    get,
    path = "/api/participations/my",
    params(ParticipationListQuery),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "The caller's participations", body = PaginatedResponse<Participation>)
    ),
    tag = "participations"
)]
pub async fn my_participations(
    State(ledger): State<Ledger>,
    Extension(identity): Extension<Identity>,
    Query(query): Query<ParticipationListQuery>,
) -> Result<Response, WebError> {
    let page = reporting::my_participations(&ledger, &identity, &query).await?;

    Ok(Json(page).into_response())
}

#[utoipa::path(
    get,
    path = "/api/participations/{participation_id}",
    params(
        ("participation_id" = Uuid, Path, description = "Participation id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Participation found", body = Participation),
        (status = 403, description = "Neither owner nor admin"),
        (status = 404, description = "Participation not found")
    ),
    tag = "participations"
)]
pub async fn get_participation(
    State(ledger): State<Ledger>,
    Extension(identity): Extension<Identity>,
    Path(participation_id): Path<Uuid>,
) -> Result<Response, WebError> {
    let found = participation::get(&ledger, &identity, participation_id).await?;

    Ok(Json(found).into_response())
}

#[utoipa::path(
    get,
    path = "/api/participations/{participation_id}/detail",
    params(
        ("participation_id" = Uuid, Path, description = "Participation id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Participation with payments and payout", body = ParticipationDetailResponse),
        (status = 403, description = "Neither owner nor admin"),
        (status = 404, description = "Participation not found")
    ),
    tag = "participations"
)]
pub async fn get_participation_detail(
    State(ledger): State<Ledger>,
    Extension(identity): Extension<Identity>,
    Path(participation_id): Path<Uuid>,
) -> Result<Response, WebError> {
    let detail = participation::detail(&ledger, &identity, participation_id).await?;

    Ok(Json(detail).into_response())
}

#[utoipa::path(
    get,
    path = "/api/participations/admin/all",
    params(ParticipationListQuery),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "All participations", body = PaginatedResponse<Participation>),
        (status = 403, description = "Admin capability required")
    ),
    tag = "participations"
)]
pub async fn all_participations(
    State(ledger): State<Ledger>,
    Extension(identity): Extension<Identity>,
    Query(query): Query<ParticipationListQuery>,
) -> Result<Response, WebError> {
    let page = reporting::all_participations(&ledger, &identity, &query).await?;

    Ok(Json(page).into_response())
}

#[utoipa::path(
    put,
    path = "/api/participations/admin/{participation_id}/verify-payment",
    params(
        ("participation_id" = Uuid, Path, description = "Participation id")
    ),
    request_body = VerifyPaymentRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Payment reviewed", body = ReviewOutcome),
        (status = 403, description = "Admin capability required"),
        (status = 404, description = "Participation not found"),
        (status = 409, description = "Participation is not pending verification"),
        (status = 500, description = "No payout configuration is effective")
    ),
    tag = "participations"
)]
pub async fn verify_payment(
    State(ledger): State<Ledger>,
    Extension(identity): Extension<Identity>,
    Path(participation_id): Path<Uuid>,
    Json(req): Json<VerifyPaymentRequest>,
) -> Result<Response, WebError> {
    let outcome = services::verify_payment(&ledger, &identity, participation_id, req).await?;

    Ok(Json(outcome).into_response())
}
