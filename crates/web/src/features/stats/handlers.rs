use axum::{
    Extension, Json,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use ledger::{
    Ledger,
    dto::stats::{BvStatsEntry, IncomeStats, IncomeStatsQuery, StatsRange},
    models::Identity,
    services::reporting,
};

use crate::error::WebError;

#[utoipa::path(
    get,
    path = "/api/stats/income",
    params(IncomeStatsQuery),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Payout totals over the window", body = IncomeStats),
        (status = 400, description = "Empty or inverted window"),
        (status = 403, description = "Only admins may query other users")
    ),
    tag = "stats"
)]
pub async fn income_stats(
    State(ledger): State<Ledger>,
    Extension(identity): Extension<Identity>,
    Query(query): Query<IncomeStatsQuery>,
) -> Result<Response, WebError> {
    let stats = reporting::income_stats(&ledger, &identity, query.user_id, query.range()).await?;

    Ok(Json(stats).into_response())
}

#[utoipa::path(
    get,
    path = "/api/stats/bv",
    params(StatsRange),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Verified volume per competition", body = Vec<BvStatsEntry>),
        (status = 403, description = "Admin capability required")
    ),
    tag = "stats"
)]
pub async fn bv_stats(
    State(ledger): State<Ledger>,
    Extension(identity): Extension<Identity>,
    Query(range): Query<StatsRange>,
) -> Result<Response, WebError> {
    let entries = reporting::bv_stats(&ledger, &identity, range).await?;

    Ok(Json(entries).into_response())
}
