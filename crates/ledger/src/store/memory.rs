use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::LedgerStore;
use crate::dto::stats::{BvStatsEntry, PayoutTotals, StatsRange};
use crate::error::{LedgerError, Result};
use crate::models::{
    Competition, CompetitionChanges, NewCompetition, NewParticipation, NewPayoutConfig,
    Participation, ParticipationFilter, ParticipationStatus, PaymentDetail, PaymentReview,
    PaymentSubmission, Payout, PayoutConfig, ReviewDecision, UserStatus,
};

#[derive(Default)]
struct State {
    competitions: HashMap<Uuid, Competition>,
    participations: HashMap<Uuid, Participation>,
    payments: Vec<PaymentDetail>,
    /// Keyed by payment id, which makes a second payout for a payment unrepresentable.
    payouts: HashMap<Uuid, Payout>,
    /// Ascending by `effective_from`.
    configs: Vec<PayoutConfig>,
    users: HashMap<Uuid, UserStatus>,
}

/// In-process ledger for tests and single-node development.
///
/// Each write holds the lock for its whole check-then-write sequence and never
/// awaits in between, so a dropped future cannot leave a partial write.
#[derive(Default)]
pub struct MemoryLedger {
    state: RwLock<State>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LedgerStore for MemoryLedger {
    async fn insert_competition(&self, new: NewCompetition) -> Result<Competition> {
        let mut state = self.state.write().await;

        if state.competitions.values().any(|c| c.slug == new.slug) {
            return Err(LedgerError::ConstraintViolation(
                "Slug already exists".to_string(),
            ));
        }

        let competition = Competition {
            competition_id: Uuid::new_v4(),
            title: new.title,
            slug: new.slug,
            entry_fee: new.entry_fee,
            opens_at: new.opens_at,
            closes_at: new.closes_at,
            created_at: Utc::now(),
        };
        state
            .competitions
            .insert(competition.competition_id, competition.clone());

        Ok(competition)
    }

    async fn find_competition(&self, competition_id: Uuid) -> Result<Competition> {
        let state = self.state.read().await;
        state
            .competitions
            .get(&competition_id)
            .cloned()
            .ok_or(LedgerError::NotFound)
    }

    async fn list_competitions(&self) -> Result<Vec<Competition>> {
        let state = self.state.read().await;
        let mut competitions: Vec<Competition> = state.competitions.values().cloned().collect();
        competitions.sort_by(|a, b| b.opens_at.cmp(&a.opens_at).then(b.created_at.cmp(&a.created_at)));
        Ok(competitions)
    }

    async fn update_competition(
        &self,
        competition_id: Uuid,
        changes: CompetitionChanges,
    ) -> Result<Competition> {
        let mut state = self.state.write().await;
        let state = &mut *state;

        if state
            .participations
            .values()
            .any(|p| p.competition_id == competition_id)
        {
            return Err(LedgerError::ConstraintViolation(
                "Competition already has participants".to_string(),
            ));
        }
        if state
            .competitions
            .values()
            .any(|c| c.slug == changes.slug && c.competition_id != competition_id)
        {
            return Err(LedgerError::ConstraintViolation(
                "Slug already exists".to_string(),
            ));
        }

        let competition = state
            .competitions
            .get_mut(&competition_id)
            .ok_or(LedgerError::NotFound)?;
        competition.title = changes.title;
        competition.slug = changes.slug;
        competition.entry_fee = changes.entry_fee;
        competition.opens_at = changes.opens_at;
        competition.closes_at = changes.closes_at;

        Ok(competition.clone())
    }

    async fn close_competition(
        &self,
        competition_id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<Competition> {
        let mut state = self.state.write().await;
        let competition = state
            .competitions
            .get_mut(&competition_id)
            .ok_or(LedgerError::NotFound)?;

        competition.closes_at = Some(match competition.closes_at {
            Some(closes_at) => closes_at.min(at),
            None => at,
        });

        Ok(competition.clone())
    }

    async fn insert_participation(&self, new: NewParticipation) -> Result<Participation> {
        let mut state = self.state.write().await;

        if !state.competitions.contains_key(&new.competition_id) {
            return Err(LedgerError::NotFound);
        }
        if state.participations.values().any(|p| {
            p.user_id == new.user_id
                && p.competition_id == new.competition_id
                && !p.status.is_terminal()
        }) {
            return Err(LedgerError::AlreadyEnrolled);
        }

        let participation = Participation {
            participation_id: Uuid::new_v4(),
            competition_id: new.competition_id,
            user_id: new.user_id,
            status: ParticipationStatus::Enrolled,
            payment_attempts: 0,
            created_at: new.created_at,
            updated_at: new.created_at,
        };
        state
            .participations
            .insert(participation.participation_id, participation.clone());

        Ok(participation)
    }

    async fn find_participation(&self, participation_id: Uuid) -> Result<Participation> {
        let state = self.state.read().await;
        state
            .participations
            .get(&participation_id)
            .cloned()
            .ok_or(LedgerError::NotFound)
    }

    async fn list_participations(
        &self,
        filter: &ParticipationFilter,
    ) -> Result<(Vec<Participation>, i64)> {
        let state = self.state.read().await;

        let mut matching: Vec<&Participation> = state
            .participations
            .values()
            .filter(|p| filter.matches(p))
            .collect();
        matching.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then(a.participation_id.cmp(&b.participation_id))
        });

        let total = matching.len() as i64;
        let page = matching
            .into_iter()
            .skip(filter.offset as usize)
            .take(filter.limit as usize)
            .cloned()
            .collect();

        Ok((page, total))
    }

    async fn transition_participation(
        &self,
        participation_id: Uuid,
        expected: &[ParticipationStatus],
        next: ParticipationStatus,
        at: DateTime<Utc>,
    ) -> Result<Participation> {
        let mut state = self.state.write().await;
        let participation = state
            .participations
            .get_mut(&participation_id)
            .ok_or(LedgerError::NotFound)?;

        if !expected.contains(&participation.status) {
            return Err(LedgerError::invalid_state(expected, participation.status));
        }
        participation.status = next;
        participation.updated_at = at;

        Ok(participation.clone())
    }

    async fn record_payment(
        &self,
        submission: PaymentSubmission,
        expected: &[ParticipationStatus],
    ) -> Result<(Participation, PaymentDetail)> {
        let mut state = self.state.write().await;
        let state = &mut *state;

        let participation = state
            .participations
            .get_mut(&submission.participation_id)
            .ok_or(LedgerError::NotFound)?;

        if !expected.contains(&participation.status) {
            return Err(LedgerError::invalid_state(expected, participation.status));
        }
        if state
            .payments
            .iter()
            .any(|p| p.participation_id == submission.participation_id && p.is_active())
        {
            return Err(LedgerError::ConstraintViolation(
                "Participation already has an active payment".to_string(),
            ));
        }

        participation.status = ParticipationStatus::PendingVerification;
        participation.payment_attempts += 1;
        participation.updated_at = submission.submitted_at;

        let payment = PaymentDetail {
            payment_id: Uuid::new_v4(),
            participation_id: submission.participation_id,
            attempt: participation.payment_attempts,
            amount: submission.amount,
            evidence: submission.evidence,
            submitted_at: submission.submitted_at,
            reviewer_id: None,
            reviewed_at: None,
            decision: None,
            review_note: None,
        };
        state.payments.push(payment.clone());

        Ok((participation.clone(), payment))
    }

    async fn list_payments(&self, participation_id: Uuid) -> Result<Vec<PaymentDetail>> {
        let state = self.state.read().await;
        let mut payments: Vec<PaymentDetail> = state
            .payments
            .iter()
            .filter(|p| p.participation_id == participation_id)
            .cloned()
            .collect();
        payments.sort_by_key(|p| p.attempt);
        Ok(payments)
    }

    async fn apply_review(&self, review: PaymentReview) -> Result<(Participation, Option<Payout>)> {
        let mut state = self.state.write().await;
        let state = &mut *state;

        match (review.decision, &review.payout) {
            (ReviewDecision::Approved, Some(_)) | (ReviewDecision::Rejected, None) => {}
            _ => {
                return Err(LedgerError::ConstraintViolation(
                    "A payout must accompany exactly the approved reviews".to_string(),
                ));
            }
        }

        let participation = state
            .participations
            .get_mut(&review.participation_id)
            .ok_or(LedgerError::NotFound)?;
        if participation.status != ParticipationStatus::PendingVerification {
            return Err(LedgerError::invalid_state(
                &ParticipationStatus::REVIEWABLE,
                participation.status,
            ));
        }

        let payment = state
            .payments
            .iter_mut()
            .find(|p| {
                p.payment_id == review.payment_id && p.participation_id == review.participation_id
            })
            .ok_or(LedgerError::NotFound)?;
        if !payment.is_pending() || state.payouts.contains_key(&review.payment_id) {
            return Err(LedgerError::AlreadyReviewed);
        }
        if let Some(new) = &review.payout {
            let effective = state
                .configs
                .iter()
                .rev()
                .find(|c| c.effective_from <= new.created_at);
            if effective.map(|c| c.config_id) != Some(new.config_id) {
                return Err(LedgerError::ConfigurationChanged);
            }
        }

        participation.status = match review.decision {
            ReviewDecision::Approved => ParticipationStatus::Verified,
            ReviewDecision::Rejected => ParticipationStatus::PaymentRejected,
        };
        participation.updated_at = review.reviewed_at;

        payment.decision = Some(review.decision);
        payment.reviewer_id = Some(review.reviewer_id);
        payment.reviewed_at = Some(review.reviewed_at);
        payment.review_note = review.note;

        let payout = review.payout.map(|new| {
            let payout = new.into_payout(Uuid::new_v4());
            state.payouts.insert(payout.payment_id, payout.clone());
            payout
        });

        Ok((participation.clone(), payout))
    }

    async fn find_payout(&self, participation_id: Uuid) -> Result<Option<Payout>> {
        let state = self.state.read().await;
        Ok(state
            .payouts
            .values()
            .find(|p| p.participation_id == participation_id)
            .cloned())
    }

    async fn append_config(&self, new: NewPayoutConfig) -> Result<PayoutConfig> {
        let mut state = self.state.write().await;

        let version = match state.configs.last() {
            Some(latest) if new.effective_from <= latest.effective_from => {
                return Err(LedgerError::NonMonotonicTimestamp);
            }
            Some(latest) => latest.version + 1,
            None => 1,
        };
        if state
            .payouts
            .values()
            .any(|p| p.created_at >= new.effective_from)
        {
            return Err(LedgerError::NonMonotonicTimestamp);
        }

        let config = PayoutConfig {
            config_id: Uuid::new_v4(),
            version,
            sponsor_bonus_pct: new.rates.sponsor_bonus_pct,
            tds_pct: new.rates.tds_pct,
            effective_from: new.effective_from,
            created_by: new.created_by,
            created_at: new.created_at,
        };
        state.configs.push(config.clone());

        Ok(config)
    }

    async fn latest_config(&self) -> Result<Option<PayoutConfig>> {
        let state = self.state.read().await;
        Ok(state.configs.last().cloned())
    }

    async fn effective_config(&self, at: DateTime<Utc>) -> Result<PayoutConfig> {
        let state = self.state.read().await;
        state
            .configs
            .iter()
            .rev()
            .find(|c| c.effective_from <= at)
            .cloned()
            .ok_or(LedgerError::NoConfiguration)
    }

    async fn find_config(&self, config_id: Uuid) -> Result<PayoutConfig> {
        let state = self.state.read().await;
        state
            .configs
            .iter()
            .find(|c| c.config_id == config_id)
            .cloned()
            .ok_or(LedgerError::NotFound)
    }

    async fn config_history(&self) -> Result<Vec<PayoutConfig>> {
        let state = self.state.read().await;
        Ok(state.configs.clone())
    }

    async fn set_user_blocked(
        &self,
        user_id: Uuid,
        blocked: bool,
        updated_by: Uuid,
        at: DateTime<Utc>,
    ) -> Result<UserStatus> {
        let mut state = self.state.write().await;
        let status = UserStatus {
            user_id,
            blocked,
            updated_by,
            updated_at: at,
        };
        state.users.insert(user_id, status.clone());
        Ok(status)
    }

    async fn is_user_blocked(&self, user_id: Uuid) -> Result<bool> {
        let state = self.state.read().await;
        Ok(state.users.get(&user_id).is_some_and(|u| u.blocked))
    }

    async fn payout_totals(&self, user_id: Uuid, range: &StatsRange) -> Result<PayoutTotals> {
        let state = self.state.read().await;

        let totals = state
            .payouts
            .values()
            .filter(|p| p.user_id == user_id && range.contains(p.created_at))
            .fold(PayoutTotals::default(), |mut acc, p| {
                acc.payout_count += 1;
                acc.gross_total += p.gross;
                acc.sponsor_bonus_total += p.sponsor_bonus;
                acc.tds_total += p.tds;
                acc.net_total += p.net;
                acc
            });

        Ok(totals)
    }

    async fn bv_stats(&self, range: &StatsRange) -> Result<Vec<BvStatsEntry>> {
        let state = self.state.read().await;

        let mut grouped: BTreeMap<Uuid, (i64, Decimal, Decimal)> = BTreeMap::new();
        for payout in state.payouts.values().filter(|p| range.contains(p.created_at)) {
            let entry = grouped
                .entry(payout.competition_id)
                .or_insert((0, Decimal::ZERO, Decimal::ZERO));
            entry.0 += 1;
            entry.1 += payout.gross;
            entry.2 += payout.net;
        }

        let mut entries: Vec<BvStatsEntry> = grouped
            .into_iter()
            .map(|(competition_id, (verified_count, gross_volume, net_volume))| BvStatsEntry {
                competition_id,
                title: state
                    .competitions
                    .get(&competition_id)
                    .map(|c| c.title.clone())
                    .unwrap_or_default(),
                verified_count,
                gross_volume,
                net_volume,
            })
            .collect();
        entries.sort_by(|a, b| {
            b.gross_volume
                .cmp(&a.gross_volume)
                .then_with(|| a.title.cmp(&b.title))
        });

        Ok(entries)
    }
}
