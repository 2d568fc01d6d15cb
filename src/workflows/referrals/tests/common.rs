use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crate::config::ProgramConfig;
use crate::workflows::referrals::domain::{
    ActivityFeedRecord, ChurnedCandidateRecord, Eligibility, ReferralRecord, ReferralSubmission,
    ScoutRecord,
};
use crate::workflows::referrals::notify::{Notifier, NotifyError, OutboundEmail};
use crate::workflows::referrals::service::ReferralService;
use crate::workflows::referrals::store::{
    Collection, RecordId, RecordStore, StoreError, StoredReferral,
};

pub(super) fn program() -> ProgramConfig {
    ProgramConfig::default()
}

pub(super) fn scouts() -> Vec<ScoutRecord> {
    vec![
        ScoutRecord {
            code: "SC-100".to_string(),
            id: "drv-100".to_string(),
            name: "Maya".to_string(),
            email: "maya@example.com".to_string(),
        },
        ScoutRecord {
            code: "SC-200".to_string(),
            id: "drv-200".to_string(),
            name: "Jonas".to_string(),
            email: "jonas@example.com".to_string(),
        },
    ]
}

pub(super) fn churned_candidates() -> Vec<ChurnedCandidateRecord> {
    vec![
        ChurnedCandidateRecord {
            id: "drv-churn-1".to_string(),
            phone: "5551234567".to_string(),
            email: "former.driver@example.com".to_string(),
        },
        ChurnedCandidateRecord {
            id: "drv-churn-2".to_string(),
            phone: "5559876543".to_string(),
            email: "second.driver@example.com".to_string(),
        },
    ]
}

pub(super) fn submission(scout_code: &str, phone: &str, email: &str) -> ReferralSubmission {
    ReferralSubmission {
        scout_code: scout_code.to_string(),
        candidate_phone: phone.to_string(),
        candidate_email: email.to_string(),
    }
}

/// Fully annotated row as the intake pipeline would leave it for an
/// eligible scout/candidate pair.
pub(super) fn eligible_record(phone: &str, rank: u32) -> ReferralRecord {
    ReferralRecord {
        scout_code: "SC-100".to_string(),
        candidate_phone: phone.to_string(),
        candidate_email: "former.driver@example.com".to_string(),
        scout_name: "Maya".to_string(),
        scout_email: "maya@example.com".to_string(),
        scout_eligibility: Eligibility::Eligible,
        candidate_eligibility: Eligibility::Eligible,
        scout_id: "drv-100".to_string(),
        candidate_id: "drv-churn-1".to_string(),
        resolved_candidate_email: "former.driver@example.com".to_string(),
        duplicate_rank: rank,
        ..ReferralRecord::default()
    }
}

pub(super) fn build_service() -> (
    ReferralService<MemoryRecordStore, MemoryNotifier>,
    Arc<MemoryRecordStore>,
    Arc<MemoryNotifier>,
) {
    let store = Arc::new(MemoryRecordStore::default());
    store.seed_scouts(scouts());
    store.seed_churned_candidates(churned_candidates());
    let notifier = Arc::new(MemoryNotifier::default());
    let service = ReferralService::new(store.clone(), notifier.clone(), program());
    (service, store, notifier)
}

#[derive(Default)]
struct Tables {
    referrals: HashMap<Collection, Vec<StoredReferral>>,
    scouts: Vec<ScoutRecord>,
    churned: Vec<ChurnedCandidateRecord>,
    activity: Vec<ActivityFeedRecord>,
}

/// Test double for the record store, with monotonically increasing row
/// ids and an opt-in way to simulate a missing reference collection.
#[derive(Default)]
pub(super) struct MemoryRecordStore {
    tables: Mutex<Tables>,
    missing: Mutex<HashSet<Collection>>,
    next_id: AtomicU64,
}

impl MemoryRecordStore {
    pub(super) fn seed_scouts(&self, rows: Vec<ScoutRecord>) {
        self.tables.lock().expect("store mutex poisoned").scouts = rows;
    }

    pub(super) fn seed_churned_candidates(&self, rows: Vec<ChurnedCandidateRecord>) {
        self.tables.lock().expect("store mutex poisoned").churned = rows;
    }

    pub(super) fn seed_activity_feed(&self, rows: Vec<ActivityFeedRecord>) {
        self.tables.lock().expect("store mutex poisoned").activity = rows;
    }

    pub(super) fn mark_missing(&self, collection: Collection) {
        self.missing
            .lock()
            .expect("store mutex poisoned")
            .insert(collection);
    }

    fn check_present(&self, collection: Collection) -> Result<(), StoreError> {
        if self
            .missing
            .lock()
            .expect("store mutex poisoned")
            .contains(&collection)
        {
            return Err(StoreError::MissingCollection(collection));
        }
        Ok(())
    }
}

impl RecordStore for MemoryRecordStore {
    fn append(
        &self,
        collection: Collection,
        record: ReferralRecord,
    ) -> Result<StoredReferral, StoreError> {
        self.check_present(collection)?;
        let id = RecordId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let stored = StoredReferral { id, record };
        let mut tables = self.tables.lock().expect("store mutex poisoned");
        tables
            .referrals
            .entry(collection)
            .or_default()
            .push(stored.clone());
        Ok(stored)
    }

    fn read_all(&self, collection: Collection) -> Result<Vec<StoredReferral>, StoreError> {
        self.check_present(collection)?;
        let mut tables = self.tables.lock().expect("store mutex poisoned");
        Ok(tables.referrals.entry(collection).or_default().clone())
    }

    fn read_last(&self, collection: Collection) -> Result<Option<StoredReferral>, StoreError> {
        self.check_present(collection)?;
        let mut tables = self.tables.lock().expect("store mutex poisoned");
        Ok(tables.referrals.entry(collection).or_default().last().cloned())
    }

    fn update(
        &self,
        collection: Collection,
        id: RecordId,
        record: ReferralRecord,
    ) -> Result<(), StoreError> {
        self.check_present(collection)?;
        let mut tables = self.tables.lock().expect("store mutex poisoned");
        let rows = tables.referrals.entry(collection).or_default();
        match rows.iter_mut().find(|row| row.id == id) {
            Some(row) => {
                row.record = record;
                Ok(())
            }
            None => Err(StoreError::NotFound { collection, id }),
        }
    }

    fn delete(&self, collection: Collection, id: RecordId) -> Result<(), StoreError> {
        self.check_present(collection)?;
        let mut tables = self.tables.lock().expect("store mutex poisoned");
        let rows = tables.referrals.entry(collection).or_default();
        let before = rows.len();
        rows.retain(|row| row.id != id);
        if rows.len() == before {
            return Err(StoreError::NotFound { collection, id });
        }
        Ok(())
    }

    fn scouts(&self) -> Result<Vec<ScoutRecord>, StoreError> {
        self.check_present(Collection::Scouts)?;
        Ok(self.tables.lock().expect("store mutex poisoned").scouts.clone())
    }

    fn churned_candidates(&self) -> Result<Vec<ChurnedCandidateRecord>, StoreError> {
        self.check_present(Collection::ChurnedCandidates)?;
        Ok(self
            .tables
            .lock()
            .expect("store mutex poisoned")
            .churned
            .clone())
    }

    fn activity_feed(&self) -> Result<Vec<ActivityFeedRecord>, StoreError> {
        self.check_present(Collection::ActivityFeed)?;
        Ok(self
            .tables
            .lock()
            .expect("store mutex poisoned")
            .activity
            .clone())
    }

    fn replace_churned_candidates(
        &self,
        rows: Vec<ChurnedCandidateRecord>,
    ) -> Result<(), StoreError> {
        self.check_present(Collection::ChurnedCandidates)?;
        self.tables.lock().expect("store mutex poisoned").churned = rows;
        Ok(())
    }

    fn replace_activity_feed(&self, rows: Vec<ActivityFeedRecord>) -> Result<(), StoreError> {
        self.check_present(Collection::ActivityFeed)?;
        self.tables.lock().expect("store mutex poisoned").activity = rows;
        Ok(())
    }
}

#[derive(Default)]
pub(super) struct MemoryNotifier {
    sent: Mutex<Vec<OutboundEmail>>,
}

impl MemoryNotifier {
    pub(super) fn sent(&self) -> Vec<OutboundEmail> {
        self.sent.lock().expect("notifier mutex poisoned").clone()
    }
}

impl Notifier for MemoryNotifier {
    fn send(&self, email: OutboundEmail) -> Result<(), NotifyError> {
        self.sent
            .lock()
            .expect("notifier mutex poisoned")
            .push(email);
        Ok(())
    }
}

pub(super) struct FailingNotifier;

impl Notifier for FailingNotifier {
    fn send(&self, _email: OutboundEmail) -> Result<(), NotifyError> {
        Err(NotifyError::Transport("smtp relay offline".to_string()))
    }
}
