use chrono::Utc;
use uuid::Uuid;

use crate::Ledger;
use crate::error::Result;
use crate::models::{Identity, UserStatus};

/// Blocked users cannot enroll; existing participations are left alone.
pub async fn set_user_blocked(
    ledger: &Ledger,
    admin: &Identity,
    user_id: Uuid,
    blocked: bool,
) -> Result<UserStatus> {
    admin.require_admin()?;

    let status = ledger
        .call(
            ledger
                .store()
                .set_user_blocked(user_id, blocked, admin.user_id, Utc::now()),
        )
        .await?;
    tracing::info!(%user_id, blocked, "User eligibility changed");

    Ok(status)
}
