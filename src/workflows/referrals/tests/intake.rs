use std::sync::Arc;

use super::common::{
    build_service, churned_candidates, program, scouts, submission, FailingNotifier,
    MemoryRecordStore,
};
use crate::workflows::referrals::domain::{Eligibility, ReferralRecord};
use crate::workflows::referrals::intake::{duplicates, eligibility};
use crate::workflows::referrals::service::{ReferralService, ReferralServiceError};
use crate::workflows::referrals::store::{Collection, RecordStore, StoreError};

fn unranked(scout_code: &str, phone: &str, email: &str) -> ReferralRecord {
    ReferralRecord::from_submission(submission(scout_code, phone, email))
}

#[test]
fn validate_copies_scout_fields_on_hit() {
    let record = eligibility::validate(
        unranked("SC-100", "5551234567", "former.driver@example.com"),
        &scouts(),
        &churned_candidates(),
        &program(),
    );

    assert_eq!(record.scout_eligibility, Eligibility::Eligible);
    assert_eq!(record.scout_name, "Maya");
    assert_eq!(record.scout_email, "maya@example.com");
    assert_eq!(record.scout_id, "drv-100");
}

#[test]
fn validate_blanks_scout_fields_on_miss() {
    let record = eligibility::validate(
        unranked("SC-999", "5551234567", "former.driver@example.com"),
        &scouts(),
        &churned_candidates(),
        &program(),
    );

    assert_eq!(record.scout_eligibility, Eligibility::NotEligible);
    assert!(record.scout_name.is_empty());
    assert!(record.scout_email.is_empty());
    assert!(record.scout_id.is_empty());
}

#[test]
fn validate_matches_candidate_by_phone() {
    let record = eligibility::validate(
        unranked("SC-100", "5551234567", "unknown@example.com"),
        &scouts(),
        &churned_candidates(),
        &program(),
    );

    assert_eq!(record.candidate_eligibility, Eligibility::Eligible);
    assert_eq!(record.candidate_id, "drv-churn-1");
    assert_eq!(record.resolved_candidate_email, "former.driver@example.com");
}

#[test]
fn validate_matches_candidate_by_email_when_phone_differs() {
    let record = eligibility::validate(
        unranked("SC-100", "5550001111", "second.driver@example.com"),
        &scouts(),
        &churned_candidates(),
        &program(),
    );

    assert_eq!(record.candidate_eligibility, Eligibility::Eligible);
    assert_eq!(record.candidate_id, "drv-churn-2");
}

#[test]
fn validate_miss_files_the_placeholder_mailbox() {
    let record = eligibility::validate(
        unranked("SC-100", "5550000000", "stranger@example.com"),
        &scouts(),
        &churned_candidates(),
        &program(),
    );

    assert_eq!(record.candidate_eligibility, Eligibility::NotEligible);
    assert!(record.candidate_id.is_empty());
    assert_eq!(
        record.resolved_candidate_email,
        program().invalid_candidate_email
    );
}

#[test]
fn rank_is_zero_when_either_party_is_not_eligible() {
    let mut record = super::common::eligible_record("5551234567", 0);
    record.candidate_eligibility = Eligibility::NotEligible;

    assert_eq!(duplicates::rank(&record, std::iter::empty()), 0);
}

#[test]
fn rank_counts_prior_eligible_rows_with_a_matching_phone() {
    let prior = vec![
        super::common::eligible_record("555-123-4567", 1),
        super::common::eligible_record("5551234567", 2),
        super::common::eligible_record("5559876543", 1),
    ];
    let record = super::common::eligible_record("(555) 123-4567", 0);

    assert_eq!(duplicates::rank(&record, prior.iter()), 3);
}

#[test]
fn rank_ignores_prior_rows_that_were_not_both_eligible() {
    let mut rejected = super::common::eligible_record("5551234567", 0);
    rejected.scout_eligibility = Eligibility::NotEligible;
    let record = super::common::eligible_record("5551234567", 0);

    assert_eq!(duplicates::rank(&record, [&rejected]), 1);
}

#[test]
fn submit_persists_annotations_into_the_intake_log() {
    let (service, store, _notifier) = build_service();

    service
        .submit(submission("SC-100", "5551234567", "former.driver@example.com"))
        .expect("submit failed");

    let log = store.read_all(Collection::Referrals).expect("read failed");
    assert_eq!(log.len(), 1);
    let row = &log[0].record;
    assert_eq!(row.scout_eligibility, Eligibility::Eligible);
    assert_eq!(row.candidate_eligibility, Eligibility::Eligible);
    assert_eq!(row.duplicate_rank, 1);
}

#[test]
fn intake_with_an_empty_log_is_a_no_op() {
    let (service, _store, notifier) = build_service();

    let outcome = service.on_intake().expect("intake failed");

    assert!(outcome.is_none());
    assert!(notifier.sent().is_empty());
}

#[test]
fn missing_scout_collection_aborts_the_intake() {
    let (service, store, _notifier) = build_service();
    store.mark_missing(Collection::Scouts);

    let err = service
        .submit(submission("SC-100", "5551234567", "former.driver@example.com"))
        .expect_err("intake should fail");

    match err {
        ReferralServiceError::Store(StoreError::MissingCollection(Collection::Scouts)) => {}
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn notifier_failure_aborts_the_intake() {
    let store = Arc::new(MemoryRecordStore::default());
    store.seed_scouts(scouts());
    store.seed_churned_candidates(churned_candidates());
    let service = ReferralService::new(store, Arc::new(FailingNotifier), program());

    let err = service
        .submit(submission("SC-100", "5551234567", "former.driver@example.com"))
        .expect_err("intake should fail");

    match err {
        ReferralServiceError::Notify(_) => {}
        other => panic!("unexpected error: {other:?}"),
    }
}
