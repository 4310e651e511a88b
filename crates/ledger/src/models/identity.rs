use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{LedgerError, Result};

/// The caller as asserted by the authentication layer.
///
/// The ledger never authenticates anyone; it trusts `user_id` and `is_admin`
/// and re-checks the capability on every operation that needs it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Identity {
    pub user_id: Uuid,
    pub is_admin: bool,
}

impl Identity {
    pub fn user(user_id: Uuid) -> Self {
        Self {
            user_id,
            is_admin: false,
        }
    }

    pub fn admin(user_id: Uuid) -> Self {
        Self {
            user_id,
            is_admin: true,
        }
    }

    pub fn require_admin(&self) -> Result<()> {
        if self.is_admin {
            Ok(())
        } else {
            Err(LedgerError::Unauthorized)
        }
    }

    /// Owners see their own records, admins see everything.
    pub fn ensure_can_read(&self, owner: Uuid) -> Result<()> {
        if self.is_admin || self.user_id == owner {
            Ok(())
        } else {
            Err(LedgerError::Forbidden)
        }
    }

    /// Only the owner may act on their participation, admin or not.
    pub fn ensure_owner(&self, owner: Uuid) -> Result<()> {
        if self.user_id == owner {
            Ok(())
        } else {
            Err(LedgerError::Forbidden)
        }
    }
}
