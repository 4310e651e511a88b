use uuid::Uuid;

use crate::Ledger;
use crate::dto::common::{PaginatedResponse, PaginationParams};
use crate::dto::participation::ParticipationListQuery;
use crate::dto::stats::{BvStatsEntry, IncomeStats, StatsRange};
use crate::error::{LedgerError, Result};
use crate::models::{Identity, Participation, ParticipationFilter};

pub async fn my_participations(
    ledger: &Ledger,
    identity: &Identity,
    query: &ParticipationListQuery,
) -> Result<PaginatedResponse<Participation>> {
    list(ledger, Some(identity.user_id), query).await
}

pub async fn all_participations(
    ledger: &Ledger,
    admin: &Identity,
    query: &ParticipationListQuery,
) -> Result<PaginatedResponse<Participation>> {
    admin.require_admin()?;
    list(ledger, None, query).await
}

async fn list(
    ledger: &Ledger,
    user_id: Option<Uuid>,
    query: &ParticipationListQuery,
) -> Result<PaginatedResponse<Participation>> {
    let pagination: PaginationParams = query.pagination();
    pagination.validate().map_err(LedgerError::InvalidRange)?;

    let filter = ParticipationFilter {
        user_id,
        competition_id: query.competition_id,
        status: query.status,
        offset: pagination.offset(),
        limit: pagination.limit(),
    };
    let (participations, total) = ledger
        .call(ledger.store().list_participations(&filter))
        .await?;

    Ok(PaginatedResponse::new(participations, pagination, total))
}

/// Payout totals for `user_id` (defaults to the caller). Only admins may
/// look at other users.
pub async fn income_stats(
    ledger: &Ledger,
    identity: &Identity,
    user_id: Option<Uuid>,
    range: StatsRange,
) -> Result<IncomeStats> {
    let user_id = user_id.unwrap_or(identity.user_id);
    identity.ensure_can_read(user_id)?;
    range.validate().map_err(LedgerError::InvalidRange)?;

    let totals = ledger
        .call(ledger.store().payout_totals(user_id, &range))
        .await?;

    Ok(totals.into_income(user_id, range))
}

pub async fn bv_stats(
    ledger: &Ledger,
    admin: &Identity,
    range: StatsRange,
) -> Result<Vec<BvStatsEntry>> {
    admin.require_admin()?;
    range.validate().map_err(LedgerError::InvalidRange)?;

    ledger.call(ledger.store().bv_stats(&range)).await
}
