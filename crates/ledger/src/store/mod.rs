//! Durable state behind the ledger services.
//!
//! Every method is one atomic unit. Status transitions are compare-and-set:
//! the write only lands if the stored status is one of `expected`, otherwise
//! the call fails with [`LedgerError::InvalidState`](crate::error::LedgerError)
//! and nothing is written.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::dto::stats::{BvStatsEntry, PayoutTotals, StatsRange};
use crate::error::Result;
use crate::models::{
    Competition, CompetitionChanges, NewCompetition, NewParticipation, NewPayoutConfig,
    Participation, ParticipationFilter, ParticipationStatus, PaymentDetail, PaymentReview,
    PaymentSubmission, Payout, PayoutConfig, UserStatus,
};

pub mod memory;
pub mod postgres;

pub use memory::MemoryLedger;

#[async_trait]
pub trait LedgerStore: Send + Sync {
    async fn insert_competition(&self, new: NewCompetition) -> Result<Competition>;

    async fn find_competition(&self, competition_id: Uuid) -> Result<Competition>;

    async fn list_competitions(&self) -> Result<Vec<Competition>>;

    /// Fails with `ConstraintViolation` once the competition has participations.
    async fn update_competition(
        &self,
        competition_id: Uuid,
        changes: CompetitionChanges,
    ) -> Result<Competition>;

    /// Moves `closes_at` back to `at` unless the window already closed earlier.
    async fn close_competition(&self, competition_id: Uuid, at: DateTime<Utc>)
    -> Result<Competition>;

    /// Fails with `AlreadyEnrolled` when a non-terminal participation exists
    /// for the same user and competition.
    async fn insert_participation(&self, new: NewParticipation) -> Result<Participation>;

    async fn find_participation(&self, participation_id: Uuid) -> Result<Participation>;

    /// Returns the requested page and the total number of matches.
    async fn list_participations(
        &self,
        filter: &ParticipationFilter,
    ) -> Result<(Vec<Participation>, i64)>;

    async fn transition_participation(
        &self,
        participation_id: Uuid,
        expected: &[ParticipationStatus],
        next: ParticipationStatus,
        at: DateTime<Utc>,
    ) -> Result<Participation>;

    /// CAS to `pending_verification` from one of `expected`, bump the attempt
    /// counter and insert the payment detail.
    async fn record_payment(
        &self,
        submission: PaymentSubmission,
        expected: &[ParticipationStatus],
    ) -> Result<(Participation, PaymentDetail)>;

    /// Payment details of a participation, oldest attempt first.
    async fn list_payments(&self, participation_id: Uuid) -> Result<Vec<PaymentDetail>>;

    /// CAS out of `pending_verification`, mark the payment reviewed and, on
    /// approval, insert the payout. At most one payout per payment. Fails with
    /// `ConfigurationChanged` unless the payout's `config_id` is still the
    /// version effective at its `created_at`.
    async fn apply_review(&self, review: PaymentReview) -> Result<(Participation, Option<Payout>)>;

    async fn find_payout(&self, participation_id: Uuid) -> Result<Option<Payout>>;

    /// Fails with `NonMonotonicTimestamp` unless `effective_from` is strictly
    /// after both the latest version and the newest payout.
    async fn append_config(&self, new: NewPayoutConfig) -> Result<PayoutConfig>;

    async fn latest_config(&self) -> Result<Option<PayoutConfig>>;

    /// Latest version with `effective_from <= at`, or `NoConfiguration`.
    async fn effective_config(&self, at: DateTime<Utc>) -> Result<PayoutConfig>;

    /// Version a payout was computed with.
    async fn find_config(&self, config_id: Uuid) -> Result<PayoutConfig>;

    /// All versions, ascending by `effective_from`.
    async fn config_history(&self) -> Result<Vec<PayoutConfig>>;

    async fn set_user_blocked(
        &self,
        user_id: Uuid,
        blocked: bool,
        updated_by: Uuid,
        at: DateTime<Utc>,
    ) -> Result<UserStatus>;

    async fn is_user_blocked(&self, user_id: Uuid) -> Result<bool>;

    async fn payout_totals(&self, user_id: Uuid, range: &StatsRange) -> Result<PayoutTotals>;

    async fn bv_stats(&self, range: &StatsRange) -> Result<Vec<BvStatsEntry>>;
}
