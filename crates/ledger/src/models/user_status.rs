use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct UserStatus {
    pub user_id: Uuid,
    pub blocked: bool,
    pub updated_by: Uuid,
    pub updated_at: DateTime<Utc>,
}
