use axum::{
    Extension, Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use ledger::{
    Ledger,
    dto::user::BlockUserRequest,
    models::{Identity, UserStatus},
    services::users,
};
use uuid::Uuid;

use crate::error::WebError;

#[utoipa::path(
    put,
    path = "/api/admin/users/{user_id}/block",
    params(
        ("user_id" = Uuid, Path, description = "User id")
    ),
    request_body = BlockUserRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Eligibility updated", body = UserStatus),
        (status = 403, description = "Admin capability required")
    ),
    tag = "admin"
)]
pub async fn set_user_blocked(
    State(ledger): State<Ledger>,
    Extension(identity): Extension<Identity>,
    Path(user_id): Path<Uuid>,
    Json(req): Json<BlockUserRequest>,
) -> Result<Response, WebError> {
    let status = users::set_user_blocked(&ledger, &identity, user_id, req.blocked).await?;

    Ok(Json(status).into_response())
}
