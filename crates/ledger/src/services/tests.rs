use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use super::*;
use crate::Ledger;
use crate::dto::competition::UpdateCompetitionRequest;
use crate::dto::participation::ParticipationListQuery;
use crate::dto::stats::StatsRange;
use crate::error::LedgerError;
use crate::models::{
    Competition, Identity, NewCompetition, NewPayout, Participation, ParticipationStatus,
    PaymentReview, PayoutRates, ReviewDecision,
};

struct Fixture {
    ledger: Ledger,
    admin: Identity,
    competition: Competition,
}

async fn fixture() -> Fixture {
    let ledger = Ledger::in_memory();
    let admin = Identity::admin(Uuid::new_v4());
    let now = Utc::now();

    let competition = competitions::create_competition(
        &ledger,
        &admin,
        NewCompetition {
            title: "Spring Cup".to_string(),
            slug: "spring-cup".to_string(),
            entry_fee: Decimal::from(1000),
            opens_at: now - Duration::days(1),
            closes_at: None,
        },
    )
    .await
    .unwrap();

    payout_config::set_config(
        &ledger,
        &admin,
        PayoutRates::new(Decimal::from(10), Decimal::from(5)),
        Some(now - Duration::hours(1)),
    )
    .await
    .unwrap();

    Fixture {
        ledger,
        admin,
        competition,
    }
}

impl Fixture {
    async fn enrolled(&self, user: &Identity) -> Participation {
        participation::enroll(&self.ledger, user, self.competition.competition_id)
            .await
            .unwrap()
    }

    async fn pending(&self, user: &Identity) -> Participation {
        let participation = self.enrolled(user).await;
        self.pay(user, participation.participation_id).await
    }

    async fn pay(&self, user: &Identity, participation_id: Uuid) -> Participation {
        payment_intake::submit_payment(
            &self.ledger,
            user,
            participation_id,
            Decimal::from(1000),
            "TXN-0001".to_string(),
        )
        .await
        .unwrap()
        .0
    }
}

#[tokio::test]
async fn test_approval_produces_reference_breakdown() {
    let fx = fixture().await;
    let user = Identity::user(Uuid::new_v4());
    let pending = fx.pending(&user).await;
    assert_eq!(pending.status, ParticipationStatus::PendingVerification);

    let outcome = verification::verify(
        &fx.ledger,
        &fx.admin,
        pending.participation_id,
        ReviewDecision::Approved,
        None,
    )
    .await
    .unwrap();

    assert_eq!(outcome.participation.status, ParticipationStatus::Verified);
    let payout = outcome.payout.unwrap();
    assert_eq!(payout.gross, Decimal::from(1000));
    assert_eq!(payout.sponsor_bonus, Decimal::from(100));
    assert_eq!(payout.tds, Decimal::from(50));
    assert_eq!(payout.net, Decimal::from(850));
    assert_eq!(payout.sponsor_bonus + payout.tds + payout.net, payout.gross);

    let detail = participation::detail(&fx.ledger, &user, pending.participation_id)
        .await
        .unwrap();
    assert_eq!(detail.payments.len(), 1);
    assert_eq!(detail.payments[0].decision, Some(ReviewDecision::Approved));
    assert_eq!(detail.payments[0].reviewer_id, Some(fx.admin.user_id));
    assert_eq!(detail.payout.unwrap().payout_id, payout.payout_id);
}

#[tokio::test]
async fn test_second_enrollment_rejected_while_active() {
    let fx = fixture().await;
    let user = Identity::user(Uuid::new_v4());
    let first = fx.enrolled(&user).await;

    let result =
        participation::enroll(&fx.ledger, &user, fx.competition.competition_id).await;
    assert!(matches!(result, Err(LedgerError::AlreadyEnrolled)));

    participation::withdraw(&fx.ledger, &user, first.participation_id)
        .await
        .unwrap();
    let second = fx.enrolled(&user).await;
    assert_ne!(first.participation_id, second.participation_id);
}

#[tokio::test]
async fn test_closed_competition_rejects_enrollment() {
    let fx = fixture().await;
    competitions::close_competition(&fx.ledger, &fx.admin, fx.competition.competition_id)
        .await
        .unwrap();

    let user = Identity::user(Uuid::new_v4());
    let result =
        participation::enroll(&fx.ledger, &user, fx.competition.competition_id).await;
    assert!(matches!(result, Err(LedgerError::CompetitionClosed)));
}

#[tokio::test]
async fn test_blocked_user_is_ineligible() {
    let fx = fixture().await;
    let user = Identity::user(Uuid::new_v4());
    users::set_user_blocked(&fx.ledger, &fx.admin, user.user_id, true)
        .await
        .unwrap();

    let result =
        participation::enroll(&fx.ledger, &user, fx.competition.competition_id).await;
    assert!(matches!(result, Err(LedgerError::UserIneligible)));

    users::set_user_blocked(&fx.ledger, &fx.admin, user.user_id, false)
        .await
        .unwrap();
    fx.enrolled(&user).await;
}

#[tokio::test]
async fn test_enroll_in_unknown_competition() {
    let fx = fixture().await;
    let user = Identity::user(Uuid::new_v4());
    let result = participation::enroll(&fx.ledger, &user, Uuid::new_v4()).await;
    assert!(matches!(result, Err(LedgerError::NotFound)));
}

#[tokio::test]
async fn test_get_is_limited_to_owner_or_admin() {
    let fx = fixture().await;
    let owner = Identity::user(Uuid::new_v4());
    let stranger = Identity::user(Uuid::new_v4());
    let enrolled = fx.enrolled(&owner).await;

    let result = participation::get(&fx.ledger, &stranger, enrolled.participation_id).await;
    assert!(matches!(result, Err(LedgerError::Forbidden)));

    assert!(
        participation::get(&fx.ledger, &owner, enrolled.participation_id)
            .await
            .is_ok()
    );
    assert!(
        participation::get(&fx.ledger, &fx.admin, enrolled.participation_id)
            .await
            .is_ok()
    );

    let result = participation::get(&fx.ledger, &owner, Uuid::new_v4()).await;
    assert!(matches!(result, Err(LedgerError::NotFound)));
}

#[tokio::test]
async fn test_payment_intake_guards() {
    let fx = fixture().await;
    let owner = Identity::user(Uuid::new_v4());
    let stranger = Identity::user(Uuid::new_v4());
    let enrolled = fx.enrolled(&owner).await;
    let id = enrolled.participation_id;

    let result = payment_intake::submit_payment(
        &fx.ledger,
        &stranger,
        id,
        Decimal::from(1000),
        "TXN".to_string(),
    )
    .await;
    assert!(matches!(result, Err(LedgerError::Forbidden)));

    let result = payment_intake::submit_payment(
        &fx.ledger,
        &owner,
        id,
        Decimal::from(999),
        "TXN".to_string(),
    )
    .await;
    assert!(matches!(result, Err(LedgerError::InvalidAmount(_))));

    fx.pay(&owner, id).await;

    let result = payment_intake::submit_payment(
        &fx.ledger,
        &owner,
        id,
        Decimal::from(1000),
        "TXN-AGAIN".to_string(),
    )
    .await;
    assert!(matches!(
        result,
        Err(LedgerError::InvalidState {
            actual: ParticipationStatus::PendingVerification,
            ..
        })
    ));
}

#[tokio::test]
async fn test_verify_twice_second_call_invalid_state() {
    let fx = fixture().await;
    let user = Identity::user(Uuid::new_v4());
    let pending = fx.pending(&user).await;

    verification::verify(
        &fx.ledger,
        &fx.admin,
        pending.participation_id,
        ReviewDecision::Approved,
        None,
    )
    .await
    .unwrap();

    let second = verification::verify(
        &fx.ledger,
        &fx.admin,
        pending.participation_id,
        ReviewDecision::Approved,
        None,
    )
    .await;
    assert!(matches!(
        second,
        Err(LedgerError::InvalidState {
            actual: ParticipationStatus::Verified,
            ..
        })
    ));

    let stats = reporting::income_stats(&fx.ledger, &user, None, StatsRange::default())
        .await
        .unwrap();
    assert_eq!(stats.payout_count, 1);
}

#[tokio::test]
async fn test_resubmission_after_rejection_creates_new_payment() {
    let fx = fixture().await;
    let user = Identity::user(Uuid::new_v4());
    let pending = fx.pending(&user).await;
    let id = pending.participation_id;

    let outcome = verification::verify(
        &fx.ledger,
        &fx.admin,
        id,
        ReviewDecision::Rejected,
        Some("Receipt unreadable".to_string()),
    )
    .await
    .unwrap();
    assert_eq!(outcome.participation.status, ParticipationStatus::PaymentRejected);
    assert!(outcome.payout.is_none());

    // A rejected participation only returns to pending through a fresh submission
    let result =
        verification::verify(&fx.ledger, &fx.admin, id, ReviewDecision::Approved, None).await;
    assert!(matches!(result, Err(LedgerError::InvalidState { .. })));

    let resubmitted = fx.pay(&user, id).await;
    assert_eq!(resubmitted.status, ParticipationStatus::PendingVerification);
    assert_eq!(resubmitted.payment_attempts, 2);

    let detail = participation::detail(&fx.ledger, &user, id).await.unwrap();
    assert_eq!(detail.payments.len(), 2);
    assert_ne!(detail.payments[0].payment_id, detail.payments[1].payment_id);
    assert_eq!(detail.payments[0].decision, Some(ReviewDecision::Rejected));
    assert_eq!(
        detail.payments[0].review_note.as_deref(),
        Some("Receipt unreadable")
    );
    assert_eq!(detail.payments[1].attempt, 2);
    assert!(detail.payments[1].decision.is_none());
    assert!(detail.payout.is_none());
}

#[tokio::test]
async fn test_non_admin_verify_is_unauthorized() {
    let fx = fixture().await;
    let owner = Identity::user(Uuid::new_v4());
    let other = Identity::user(Uuid::new_v4());
    let pending = fx.pending(&owner).await;

    for caller in [other, owner] {
        let result = verification::verify(
            &fx.ledger,
            &caller,
            pending.participation_id,
            ReviewDecision::Approved,
            None,
        )
        .await;
        assert!(matches!(result, Err(LedgerError::Unauthorized)));
    }

    let still_pending = participation::get(&fx.ledger, &owner, pending.participation_id)
        .await
        .unwrap();
    assert_eq!(still_pending.status, ParticipationStatus::PendingVerification);
}

#[tokio::test]
async fn test_config_lookup_by_effective_time() {
    let ledger = Ledger::in_memory();
    let admin = Identity::admin(Uuid::new_v4());
    let t0 = Utc::now() - Duration::days(10);

    let result = payout_config::effective_config(&ledger, t0).await;
    assert!(matches!(result, Err(LedgerError::NoConfiguration)));

    let v1 = payout_config::set_config(
        &ledger,
        &admin,
        PayoutRates::new(Decimal::from(10), Decimal::from(5)),
        Some(t0),
    )
    .await
    .unwrap();
    let v2 = payout_config::set_config(
        &ledger,
        &admin,
        PayoutRates::new(Decimal::from(12), Decimal::from(5)),
        Some(t0 + Duration::days(5)),
    )
    .await
    .unwrap();
    assert_eq!((v1.version, v2.version), (1, 2));

    let before = payout_config::effective_config(&ledger, t0 - Duration::seconds(1)).await;
    assert!(matches!(before, Err(LedgerError::NoConfiguration)));

    let at_v1 = payout_config::effective_config(&ledger, t0).await.unwrap();
    assert_eq!(at_v1.config_id, v1.config_id);

    let between = payout_config::effective_config(&ledger, t0 + Duration::days(3))
        .await
        .unwrap();
    assert_eq!(between.config_id, v1.config_id);

    let current = payout_config::current_config(&ledger).await.unwrap();
    assert_eq!(current.config_id, v2.config_id);
}

#[tokio::test]
async fn test_config_append_guards() {
    let ledger = Ledger::in_memory();
    let admin = Identity::admin(Uuid::new_v4());
    let user = Identity::user(Uuid::new_v4());
    let t0 = Utc::now();
    let rates = PayoutRates::new(Decimal::from(10), Decimal::from(5));

    let result = payout_config::set_config(&ledger, &user, rates, Some(t0)).await;
    assert!(matches!(result, Err(LedgerError::Unauthorized)));

    let result = payout_config::set_config(
        &ledger,
        &admin,
        PayoutRates::new(Decimal::from(90), Decimal::from(11)),
        Some(t0),
    )
    .await;
    assert!(matches!(result, Err(LedgerError::InvalidRange(_))));

    payout_config::set_config(&ledger, &admin, rates, Some(t0))
        .await
        .unwrap();

    for effective_from in [t0, t0 - Duration::minutes(1)] {
        let result = payout_config::set_config(&ledger, &admin, rates, Some(effective_from)).await;
        assert!(matches!(result, Err(LedgerError::NonMonotonicTimestamp)));
    }

    let history = payout_config::history(&ledger, &admin).await.unwrap();
    assert_eq!(history.len(), 1);
}

#[tokio::test]
async fn test_single_rate_updates_carry_the_other_rate() {
    let fx = fixture().await;

    let missing = payout_config::set_tds(&Ledger::in_memory(), &fx.admin, Decimal::ONE, None).await;
    assert!(matches!(missing, Err(LedgerError::NoConfiguration)));

    let config = payout_config::set_tds(&fx.ledger, &fx.admin, Decimal::from(2), None)
        .await
        .unwrap();
    assert_eq!(config.sponsor_bonus_pct, Decimal::from(10));
    assert_eq!(config.tds_pct, Decimal::from(2));

    let config = payout_config::set_sponsor_bonus(
        &fx.ledger,
        &fx.admin,
        Decimal::from(7),
        Some(Utc::now() + Duration::seconds(1)),
    )
    .await
    .unwrap();
    assert_eq!(config.sponsor_bonus_pct, Decimal::from(7));
    assert_eq!(config.tds_pct, Decimal::from(2));
    assert_eq!(config.version, 3);
}

#[tokio::test]
async fn test_approval_without_configuration_leaves_state_untouched() {
    let ledger = Ledger::in_memory();
    let admin = Identity::admin(Uuid::new_v4());
    let user = Identity::user(Uuid::new_v4());
    let competition = competitions::create_competition(
        &ledger,
        &admin,
        NewCompetition {
            title: "Unconfigured".to_string(),
            slug: "unconfigured".to_string(),
            entry_fee: Decimal::from(500),
            opens_at: Utc::now() - Duration::hours(1),
            closes_at: None,
        },
    )
    .await
    .unwrap();

    let enrolled = participation::enroll(&ledger, &user, competition.competition_id)
        .await
        .unwrap();
    payment_intake::submit_payment(
        &ledger,
        &user,
        enrolled.participation_id,
        Decimal::from(500),
        "UTR-77".to_string(),
    )
    .await
    .unwrap();

    let result = verification::verify(
        &ledger,
        &admin,
        enrolled.participation_id,
        ReviewDecision::Approved,
        None,
    )
    .await;
    assert!(matches!(result, Err(LedgerError::NoConfiguration)));

    let detail = participation::detail(&ledger, &user, enrolled.participation_id)
        .await
        .unwrap();
    assert_eq!(detail.participation.status, ParticipationStatus::PendingVerification);
    assert!(detail.payments[0].decision.is_none());
    assert!(detail.payout.is_none());
}

#[tokio::test]
async fn test_payout_uses_configuration_effective_at_approval() {
    let fx = fixture().await;
    payout_config::set_config(
        &fx.ledger,
        &fx.admin,
        PayoutRates::new(Decimal::from(20), Decimal::from(10)),
        Some(Utc::now() + Duration::days(30)),
    )
    .await
    .unwrap();

    let user = Identity::user(Uuid::new_v4());
    let pending = fx.pending(&user).await;
    let outcome = verification::verify(
        &fx.ledger,
        &fx.admin,
        pending.participation_id,
        ReviewDecision::Approved,
        None,
    )
    .await
    .unwrap();

    let payout = outcome.payout.unwrap();
    assert_eq!(payout.sponsor_bonus, Decimal::from(100));

    let detail = participation::detail(&fx.ledger, &user, pending.participation_id)
        .await
        .unwrap();
    let config = detail.payout_config.unwrap();
    assert_eq!(config.config_id, payout.config_id);
    assert_eq!(config.version, 1);
}

#[tokio::test]
async fn test_config_cannot_start_before_existing_payout() {
    let fx = fixture().await;
    let user = Identity::user(Uuid::new_v4());
    let pending = fx.pending(&user).await;
    let payout = verification::verify(
        &fx.ledger,
        &fx.admin,
        pending.participation_id,
        ReviewDecision::Approved,
        None,
    )
    .await
    .unwrap()
    .payout
    .unwrap();

    let rates = PayoutRates::new(Decimal::from(20), Decimal::from(10));
    for effective_from in [payout.created_at - Duration::minutes(30), payout.created_at] {
        let result =
            payout_config::set_config(&fx.ledger, &fx.admin, rates, Some(effective_from)).await;
        assert!(matches!(result, Err(LedgerError::NonMonotonicTimestamp)));
    }

    let at_approval = payout_config::effective_config(&fx.ledger, payout.created_at)
        .await
        .unwrap();
    assert_eq!(at_approval.config_id, payout.config_id);

    let later = payout_config::set_config(
        &fx.ledger,
        &fx.admin,
        rates,
        Some(payout.created_at + Duration::seconds(1)),
    )
    .await
    .unwrap();
    assert_eq!(later.version, 2);

    let at_approval = payout_config::effective_config(&fx.ledger, payout.created_at)
        .await
        .unwrap();
    assert_eq!(at_approval.config_id, payout.config_id);
}

#[tokio::test]
async fn test_review_with_superseded_configuration_is_refused() {
    let fx = fixture().await;
    let user = Identity::user(Uuid::new_v4());
    let pending = fx.pending(&user).await;
    let store = fx.ledger.store();

    let reviewed_at = Utc::now();
    let stale = store.effective_config(reviewed_at).await.unwrap();
    let payment = store
        .list_payments(pending.participation_id)
        .await
        .unwrap()
        .remove(0);

    // Lands between the config read and the commit.
    let current = payout_config::set_config(
        &fx.ledger,
        &fx.admin,
        PayoutRates::new(Decimal::from(20), Decimal::from(10)),
        Some(reviewed_at - Duration::minutes(1)),
    )
    .await
    .unwrap();

    let breakdown =
        payout_calculation::compute_payout(payment.amount, &stale.rates()).unwrap();
    let result = store
        .apply_review(PaymentReview {
            participation_id: pending.participation_id,
            payment_id: payment.payment_id,
            decision: ReviewDecision::Approved,
            reviewer_id: fx.admin.user_id,
            reviewed_at,
            note: None,
            payout: Some(NewPayout {
                payment_id: payment.payment_id,
                participation_id: pending.participation_id,
                user_id: user.user_id,
                competition_id: fx.competition.competition_id,
                config_id: stale.config_id,
                breakdown,
                created_at: reviewed_at,
            }),
        })
        .await;
    assert!(matches!(result, Err(LedgerError::ConfigurationChanged)));

    let unchanged = participation::get(&fx.ledger, &user, pending.participation_id)
        .await
        .unwrap();
    assert_eq!(unchanged.status, ParticipationStatus::PendingVerification);

    let payout = verification::verify(
        &fx.ledger,
        &fx.admin,
        pending.participation_id,
        ReviewDecision::Approved,
        None,
    )
    .await
    .unwrap()
    .payout
    .unwrap();
    assert_eq!(payout.config_id, current.config_id);
    assert_eq!(payout.sponsor_bonus, Decimal::from(200));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_approvals_pay_once() {
    let fx = fixture().await;
    let user = Identity::user(Uuid::new_v4());
    let pending = fx.pending(&user).await;

    let handles: Vec<_> = (0..2)
        .map(|_| {
            let ledger = fx.ledger.clone();
            let admin = fx.admin;
            let id = pending.participation_id;
            tokio::spawn(async move {
                verification::verify(&ledger, &admin, id, ReviewDecision::Approved, None).await
            })
        })
        .collect();

    let mut successes = 0;
    let mut conflicts = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => successes += 1,
            Err(LedgerError::InvalidState { .. }) | Err(LedgerError::AlreadyReviewed) => {
                conflicts += 1
            }
            Err(other) => panic!("unexpected error: {other}"),
        }
    }
    assert_eq!((successes, conflicts), (1, 1));

    let stats = reporting::income_stats(&fx.ledger, &user, None, StatsRange::default())
        .await
        .unwrap();
    assert_eq!(stats.payout_count, 1);
    assert_eq!(stats.net_total, Decimal::from(850));
}

#[tokio::test]
async fn test_withdraw_rules() {
    let fx = fixture().await;
    let owner = Identity::user(Uuid::new_v4());
    let pending = fx.pending(&owner).await;

    let result = participation::withdraw(&fx.ledger, &owner, pending.participation_id).await;
    assert!(matches!(result, Err(LedgerError::InvalidState { .. })));

    let result = participation::withdraw(&fx.ledger, &fx.admin, pending.participation_id).await;
    assert!(matches!(result, Err(LedgerError::Forbidden)));
}

#[tokio::test]
async fn test_competition_frozen_after_enrollment() {
    let fx = fixture().await;
    let request = UpdateCompetitionRequest {
        title: Some("Spring Cup Finals".to_string()),
        slug: None,
        entry_fee: Some(Decimal::from(1500)),
        opens_at: None,
        closes_at: None,
    };

    let updated = competitions::update_competition(
        &fx.ledger,
        &fx.admin,
        fx.competition.competition_id,
        &request,
    )
    .await
    .unwrap();
    assert_eq!(updated.entry_fee, Decimal::from(1500));

    let user = Identity::user(Uuid::new_v4());
    fx.enrolled(&user).await;

    let result = competitions::update_competition(
        &fx.ledger,
        &fx.admin,
        fx.competition.competition_id,
        &request,
    )
    .await;
    assert!(matches!(result, Err(LedgerError::ConstraintViolation(_))));

    let closed =
        competitions::close_competition(&fx.ledger, &fx.admin, fx.competition.competition_id)
            .await
            .unwrap();
    assert!(closed.closes_at.is_some());
}

#[tokio::test]
async fn test_participation_listings() {
    let fx = fixture().await;
    let alice = Identity::user(Uuid::new_v4());
    let bob = Identity::user(Uuid::new_v4());
    fx.pending(&alice).await;
    fx.enrolled(&bob).await;

    let mine = reporting::my_participations(&fx.ledger, &alice, &ParticipationListQuery::default())
        .await
        .unwrap();
    assert_eq!(mine.pagination.total_items, 1);
    assert!(mine.data.iter().all(|p| p.user_id == alice.user_id));

    let result =
        reporting::all_participations(&fx.ledger, &alice, &ParticipationListQuery::default())
            .await;
    assert!(matches!(result, Err(LedgerError::Unauthorized)));

    let pending_only = ParticipationListQuery {
        status: Some(ParticipationStatus::PendingVerification),
        ..Default::default()
    };
    let all = reporting::all_participations(&fx.ledger, &fx.admin, &pending_only)
        .await
        .unwrap();
    assert_eq!(all.pagination.total_items, 1);
    assert_eq!(all.data[0].user_id, alice.user_id);

    let paged = ParticipationListQuery {
        page: Some(2),
        page_size: Some(1),
        ..Default::default()
    };
    let page_two = reporting::all_participations(&fx.ledger, &fx.admin, &paged)
        .await
        .unwrap();
    assert_eq!(page_two.data.len(), 1);
    assert_eq!(page_two.pagination.total_pages, 2);

    let bad = ParticipationListQuery {
        page_size: Some(500),
        ..Default::default()
    };
    let result = reporting::my_participations(&fx.ledger, &alice, &bad).await;
    assert!(matches!(result, Err(LedgerError::InvalidRange(_))));

    let far = ParticipationListQuery {
        page: Some(100_000_000),
        page_size: Some(50),
        ..Default::default()
    };
    let result = reporting::my_participations(&fx.ledger, &alice, &far).await;
    assert!(matches!(result, Err(LedgerError::InvalidRange(_))));
}

#[tokio::test]
async fn test_income_and_bv_stats() {
    let fx = fixture().await;
    let alice = Identity::user(Uuid::new_v4());
    let bob = Identity::user(Uuid::new_v4());

    for user in [&alice, &bob] {
        let pending = fx.pending(user).await;
        verification::verify(
            &fx.ledger,
            &fx.admin,
            pending.participation_id,
            ReviewDecision::Approved,
            None,
        )
        .await
        .unwrap();
    }

    let income = reporting::income_stats(&fx.ledger, &alice, None, StatsRange::default())
        .await
        .unwrap();
    assert_eq!(income.user_id, alice.user_id);
    assert_eq!(income.gross_total, Decimal::from(1000));
    assert_eq!(income.sponsor_bonus_total, Decimal::from(100));
    assert_eq!(income.tds_total, Decimal::from(50));
    assert_eq!(income.net_total, Decimal::from(850));

    let result =
        reporting::income_stats(&fx.ledger, &alice, Some(bob.user_id), StatsRange::default())
            .await;
    assert!(matches!(result, Err(LedgerError::Forbidden)));

    let future_window = StatsRange {
        from: Some(Utc::now() + Duration::days(1)),
        to: None,
    };
    let empty = reporting::income_stats(&fx.ledger, &fx.admin, Some(bob.user_id), future_window)
        .await
        .unwrap();
    assert_eq!(empty.payout_count, 0);
    assert_eq!(empty.net_total, Decimal::ZERO);

    let bv = reporting::bv_stats(&fx.ledger, &fx.admin, StatsRange::default())
        .await
        .unwrap();
    assert_eq!(bv.len(), 1);
    assert_eq!(bv[0].competition_id, fx.competition.competition_id);
    assert_eq!(bv[0].title, "Spring Cup");
    assert_eq!(bv[0].verified_count, 2);
    assert_eq!(bv[0].gross_volume, Decimal::from(2000));
    assert_eq!(bv[0].net_volume, Decimal::from(1700));

    let result = reporting::bv_stats(&fx.ledger, &alice, StatsRange::default()).await;
    assert!(matches!(result, Err(LedgerError::Unauthorized)));
}
