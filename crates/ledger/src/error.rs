use thiserror::Error;

use crate::models::ParticipationStatus;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Database error: {0}")]
    Database(#[source] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Not found")]
    NotFound,

    #[error("Caller does not own this resource")]
    Forbidden,

    #[error("Caller lacks admin capability")]
    Unauthorized,

    #[error("Invalid state: expected one of {expected:?}, found {actual:?}")]
    InvalidState {
        expected: Vec<ParticipationStatus>,
        actual: ParticipationStatus,
    },

    #[error("Payment was already reviewed")]
    AlreadyReviewed,

    #[error("User already has an active participation in this competition")]
    AlreadyEnrolled,

    #[error("Competition is not open for enrollment")]
    CompetitionClosed,

    #[error("User is not eligible to participate")]
    UserIneligible,

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid range: {0}")]
    InvalidRange(String),

    #[error("Invalid payout configuration: {0}")]
    InvalidConfiguration(String),

    #[error("effective_from must be later than the latest configuration version and the latest payout")]
    NonMonotonicTimestamp,

    #[error("Payout configuration changed while the payment was being reviewed")]
    ConfigurationChanged,

    #[error("No payout configuration is in effect")]
    NoConfiguration,

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Store call timed out")]
    Timeout,

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),
}

pub type Result<T> = std::result::Result<T, LedgerError>;

impl From<sqlx::Error> for LedgerError {
    fn from(error: sqlx::Error) -> Self {
        match error {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                LedgerError::StoreUnavailable(error.to_string())
            }
            other => LedgerError::Database(other),
        }
    }
}

impl LedgerError {
    /// Transient failures may be retried by the caller with backoff.
    pub fn is_transient(&self) -> bool {
        matches!(self, LedgerError::StoreUnavailable(_) | LedgerError::Timeout)
    }

    /// Stable machine-readable name, surfaced in API error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            LedgerError::Database(_) => "database",
            LedgerError::Migration(_) => "migration",
            LedgerError::NotFound => "not_found",
            LedgerError::Forbidden => "forbidden",
            LedgerError::Unauthorized => "unauthorized",
            LedgerError::InvalidState { .. } | LedgerError::AlreadyReviewed => "invalid_state",
            LedgerError::AlreadyEnrolled => "already_enrolled",
            LedgerError::CompetitionClosed => "competition_closed",
            LedgerError::UserIneligible => "user_ineligible",
            LedgerError::InvalidAmount(_) => "invalid_amount",
            LedgerError::InvalidRange(_) => "invalid_range",
            LedgerError::InvalidConfiguration(_) => "invalid_configuration",
            LedgerError::NonMonotonicTimestamp => "non_monotonic_timestamp",
            LedgerError::NoConfiguration => "no_configuration",
            LedgerError::ConfigurationChanged => "configuration_changed",
            LedgerError::StoreUnavailable(_) => "store_unavailable",
            LedgerError::Timeout => "timeout",
            LedgerError::ConstraintViolation(_) => "constraint_violation",
        }
    }

    /// Classify a participation whose compare-and-set found a different status.
    pub fn invalid_state(expected: &[ParticipationStatus], actual: ParticipationStatus) -> Self {
        LedgerError::InvalidState {
            expected: expected.to_vec(),
            actual,
        }
    }
}

pub(crate) fn is_unique_violation(error: &sqlx::Error) -> bool {
    matches!(error, sqlx::Error::Database(e) if e.code().as_deref() == Some("23505"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_errors() {
        assert!(LedgerError::Timeout.is_transient());
        assert!(LedgerError::StoreUnavailable("down".into()).is_transient());
        assert!(!LedgerError::NotFound.is_transient());
        assert!(!LedgerError::NoConfiguration.is_transient());
    }

    #[test]
    fn test_pool_timeout_maps_to_store_unavailable() {
        let error = LedgerError::from(sqlx::Error::PoolTimedOut);
        assert!(matches!(error, LedgerError::StoreUnavailable(_)));
        assert_eq!(error.kind(), "store_unavailable");
    }

    #[test]
    fn test_invalid_state_kind() {
        let error = LedgerError::invalid_state(
            &[ParticipationStatus::PendingVerification],
            ParticipationStatus::Verified,
        );
        assert_eq!(error.kind(), "invalid_state");
        assert!(error.to_string().contains("Verified"));
    }
}
