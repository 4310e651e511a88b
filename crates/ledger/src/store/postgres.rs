use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::LedgerStore;
use crate::Database;
use crate::dto::stats::{BvStatsEntry, PayoutTotals, StatsRange};
use crate::error::Result;
use crate::models::{
    Competition, CompetitionChanges, NewCompetition, NewParticipation, NewPayoutConfig,
    Participation, ParticipationFilter, ParticipationStatus, PaymentDetail, PaymentReview,
    PaymentSubmission, Payout, PayoutConfig, UserStatus,
};
use crate::repository::{
    competition::CompetitionRepository, participation::ParticipationRepository,
    payment::PaymentRepository, payout_config::PayoutConfigRepository, stats::StatsRepository,
    user_status::UserStatusRepository,
};

#[async_trait]
impl LedgerStore for Database {
    async fn insert_competition(&self, new: NewCompetition) -> Result<Competition> {
        CompetitionRepository::new(self.pool()).create(&new).await
    }

    async fn find_competition(&self, competition_id: Uuid) -> Result<Competition> {
        CompetitionRepository::new(self.pool())
            .find_by_id(competition_id)
            .await
    }

    async fn list_competitions(&self) -> Result<Vec<Competition>> {
        CompetitionRepository::new(self.pool()).list().await
    }

    async fn update_competition(
        &self,
        competition_id: Uuid,
        changes: CompetitionChanges,
    ) -> Result<Competition> {
        CompetitionRepository::new(self.pool())
            .update(competition_id, &changes)
            .await
    }

    async fn close_competition(
        &self,
        competition_id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<Competition> {
        CompetitionRepository::new(self.pool())
            .close(competition_id, at)
            .await
    }

    async fn insert_participation(&self, new: NewParticipation) -> Result<Participation> {
        ParticipationRepository::new(self.pool()).create(&new).await
    }

    async fn find_participation(&self, participation_id: Uuid) -> Result<Participation> {
        ParticipationRepository::new(self.pool())
            .find_by_id(participation_id)
            .await
    }

    async fn list_participations(
        &self,
        filter: &ParticipationFilter,
    ) -> Result<(Vec<Participation>, i64)> {
        ParticipationRepository::new(self.pool()).list(filter).await
    }

    async fn transition_participation(
        &self,
        participation_id: Uuid,
        expected: &[ParticipationStatus],
        next: ParticipationStatus,
        at: DateTime<Utc>,
    ) -> Result<Participation> {
        ParticipationRepository::new(self.pool())
            .transition(participation_id, expected, next, at)
            .await
    }

    async fn record_payment(
        &self,
        submission: PaymentSubmission,
        expected: &[ParticipationStatus],
    ) -> Result<(Participation, PaymentDetail)> {
        PaymentRepository::new(self.pool())
            .record(&submission, expected)
            .await
    }

    async fn list_payments(&self, participation_id: Uuid) -> Result<Vec<PaymentDetail>> {
        PaymentRepository::new(self.pool())
            .list_for(participation_id)
            .await
    }

    async fn apply_review(&self, review: PaymentReview) -> Result<(Participation, Option<Payout>)> {
        PaymentRepository::new(self.pool())
            .apply_review(&review)
            .await
    }

    async fn find_payout(&self, participation_id: Uuid) -> Result<Option<Payout>> {
        PaymentRepository::new(self.pool())
            .find_payout(participation_id)
            .await
    }

    async fn append_config(&self, new: NewPayoutConfig) -> Result<PayoutConfig> {
        PayoutConfigRepository::new(self.pool()).append(&new).await
    }

    async fn latest_config(&self) -> Result<Option<PayoutConfig>> {
        PayoutConfigRepository::new(self.pool()).latest().await
    }

    async fn effective_config(&self, at: DateTime<Utc>) -> Result<PayoutConfig> {
        PayoutConfigRepository::new(self.pool())
            .effective_at(at)
            .await
    }

    async fn find_config(&self, config_id: Uuid) -> Result<PayoutConfig> {
        PayoutConfigRepository::new(self.pool())
            .find_by_id(config_id)
            .await
    }

    async fn config_history(&self) -> Result<Vec<PayoutConfig>> {
        PayoutConfigRepository::new(self.pool()).list_all().await
    }

    async fn set_user_blocked(
        &self,
        user_id: Uuid,
        blocked: bool,
        updated_by: Uuid,
        at: DateTime<Utc>,
    ) -> Result<UserStatus> {
        UserStatusRepository::new(self.pool())
            .upsert(user_id, blocked, updated_by, at)
            .await
    }

    async fn is_user_blocked(&self, user_id: Uuid) -> Result<bool> {
        UserStatusRepository::new(self.pool())
            .is_blocked(user_id)
            .await
    }

    async fn payout_totals(&self, user_id: Uuid, range: &StatsRange) -> Result<PayoutTotals> {
        StatsRepository::new(self.pool())
            .payout_totals(user_id, range)
            .await
    }

    async fn bv_stats(&self, range: &StatsRange) -> Result<Vec<BvStatsEntry>> {
        StatsRepository::new(self.pool()).bv_stats(range).await
    }
}
