use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Lifecycle of a participation.
///
/// ```text
/// enrolled ──> pending_verification ──> verified
///    │              ▲        │
///    │              │        v
///    │              └── payment_rejected
///    v                       │
/// withdrawn <────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[sqlx(type_name = "participation_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ParticipationStatus {
    Enrolled,
    PendingVerification,
    Verified,
    PaymentRejected,
    Withdrawn,
}

impl ParticipationStatus {
    /// States a payment may be submitted from.
    pub const PAYABLE: [ParticipationStatus; 2] = [
        ParticipationStatus::Enrolled,
        ParticipationStatus::PaymentRejected,
    ];

    /// States a participant may withdraw from.
    pub const WITHDRAWABLE: [ParticipationStatus; 2] = Self::PAYABLE;

    pub const REVIEWABLE: [ParticipationStatus; 1] = [ParticipationStatus::PendingVerification];

    pub fn as_str(&self) -> &'static str {
        match self {
            ParticipationStatus::Enrolled => "enrolled",
            ParticipationStatus::PendingVerification => "pending_verification",
            ParticipationStatus::Verified => "verified",
            ParticipationStatus::PaymentRejected => "payment_rejected",
            ParticipationStatus::Withdrawn => "withdrawn",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ParticipationStatus::Verified | ParticipationStatus::Withdrawn
        )
    }
}

impl std::fmt::Display for ParticipationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ParticipationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "enrolled" => Ok(ParticipationStatus::Enrolled),
            "pending_verification" => Ok(ParticipationStatus::PendingVerification),
            "verified" => Ok(ParticipationStatus::Verified),
            "payment_rejected" => Ok(ParticipationStatus::PaymentRejected),
            "withdrawn" => Ok(ParticipationStatus::Withdrawn),
            other => Err(format!("unknown participation status: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Participation {
    pub participation_id: Uuid,
    pub competition_id: Uuid,
    pub user_id: Uuid,
    pub status: ParticipationStatus,
    pub payment_attempts: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewParticipation {
    pub competition_id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Query over participations; every filter is optional.
#[derive(Debug, Clone, Default)]
pub struct ParticipationFilter {
    pub user_id: Option<Uuid>,
    pub competition_id: Option<Uuid>,
    pub status: Option<ParticipationStatus>,
    pub offset: u32,
    pub limit: u32,
}

impl ParticipationFilter {
    pub fn matches(&self, participation: &Participation) -> bool {
        self.user_id.is_none_or(|id| participation.user_id == id)
            && self
                .competition_id
                .is_none_or(|id| participation.competition_id == id)
            && self.status.is_none_or(|status| participation.status == status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(ParticipationStatus::Verified.is_terminal());
        assert!(ParticipationStatus::Withdrawn.is_terminal());
        assert!(!ParticipationStatus::Enrolled.is_terminal());
        assert!(!ParticipationStatus::PendingVerification.is_terminal());
        assert!(!ParticipationStatus::PaymentRejected.is_terminal());
    }

    #[test]
    fn test_status_string_conversion() {
        for status in [
            ParticipationStatus::Enrolled,
            ParticipationStatus::PendingVerification,
            ParticipationStatus::Verified,
            ParticipationStatus::PaymentRejected,
            ParticipationStatus::Withdrawn,
        ] {
            assert_eq!(status.as_str().parse::<ParticipationStatus>(), Ok(status));
        }
        assert!("approved".parse::<ParticipationStatus>().is_err());
    }

    #[test]
    fn test_pending_is_not_payable() {
        assert!(!ParticipationStatus::PAYABLE.contains(&ParticipationStatus::PendingVerification));
        assert!(!ParticipationStatus::PAYABLE.contains(&ParticipationStatus::Verified));
    }
}
