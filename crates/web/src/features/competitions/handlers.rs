use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use ledger::{
    Ledger,
    dto::competition::{CreateCompetitionRequest, UpdateCompetitionRequest},
    models::{Competition, Identity, Participation},
    services::{competitions, participation},
};
use uuid::Uuid;

use crate::error::WebError;

use super::services;

#[utoipa::path(
    get,
    path = "/api/competitions",
    responses(
        (status = 200, description = "List all competitions successfully", body = Vec<Competition>)
    ),
    tag = "competitions"
)]
pub async fn list_competitions(State(ledger): State<Ledger>) -> Result<Response, WebError> {
    let competitions = competitions::list_competitions(&ledger).await?;

    Ok(Json(competitions).into_response())
}

#[utoipa::path(
    get,
    path = "/api/competitions/{competition_id}",
    params(
        ("competition_id" = Uuid, Path, description = "Competition id")
    ),
    responses(
        (status = 200, description = "Competition found", body = Competition),
        (status = 404, description = "Competition not found")
    ),
    tag = "competitions"
)]
pub async fn get_competition(
    State(ledger): State<Ledger>,
    Path(competition_id): Path<Uuid>,
) -> Result<Response, WebError> {
    let competition = competitions::get_competition(&ledger, competition_id).await?;

    Ok(Json(competition).into_response())
}

#[utoipa::path(
    post,
    path = "/api/competitions",
    request_body = CreateCompetitionRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Competition created successfully", body = Competition),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Missing or unknown token"),
        (status = 403, description = "Admin capability required"),
        (status = 409, description = "Slug already exists")
    ),
    tag = "competitions"
)]
pub async fn create_competition(
    State(ledger): State<Ledger>,
    Extension(identity): Extension<Identity>,
    Json(req): Json<CreateCompetitionRequest>,
) -> Result<Response, WebError> {
    let competition = services::create_competition(&ledger, &identity, req).await?;

    Ok((StatusCode::CREATED, Json(competition)).into_response())
}

#[utoipa::path(
    put,
    path = "/api/competitions/{competition_id}",
    params(
        ("competition_id" = Uuid, Path, description = "Competition id")
    ),
    request_body = UpdateCompetitionRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Competition updated successfully", body = Competition),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Admin capability required"),
        (status = 404, description = "Competition not found"),
        (status = 409, description = "Competition already has participants, or slug exists")
    ),
    tag = "competitions"
)]
pub async fn update_competition(
    State(ledger): State<Ledger>,
    Extension(identity): Extension<Identity>,
    Path(competition_id): Path<Uuid>,
    Json(update_req): Json<UpdateCompetitionRequest>,
) -> Result<Response, WebError> {
    let updated =
        services::update_competition(&ledger, &identity, competition_id, &update_req).await?;

    Ok(Json(updated).into_response())
}

#[utoipa::path(
    put,
    path = "/api/competitions/{competition_id}/close",
    params(
        ("competition_id" = Uuid, Path, description = "Competition id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Enrollment window closed", body = Competition),
        (status = 403, description = "Admin capability required"),
        (status = 404, description = "Competition not found")
    ),
    tag = "competitions"
)]
pub async fn close_competition(
    State(ledger): State<Ledger>,
    Extension(identity): Extension<Identity>,
    Path(competition_id): Path<Uuid>,
) -> Result<Response, WebError> {
    let closed = competitions::close_competition(&ledger, &identity, competition_id).await?;

    Ok(Json(closed).into_response())
}

#[utoipa::path(
    post,
    path = "/api/competitions/{competition_id}/participate",
    params(
        ("competition_id" = Uuid, Path, description = "Competition id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Enrolled", body = Participation),
        (status = 403, description = "User is not eligible"),
        (status = 404, description = "Competition not found"),
        (status = 409, description = "Already enrolled, or the window is closed")
    ),
    tag = "competitions"
)]
pub async fn participate(
    State(ledger): State<Ledger>,
    Extension(identity): Extension<Identity>,
    Path(competition_id): Path<Uuid>,
) -> Result<Response, WebError> {
    let enrolled = participation::enroll(&ledger, &identity, competition_id).await?;

    Ok((StatusCode::CREATED, Json(enrolled)).into_response())
}
