use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use scout_referrals::workflows::referrals::anonymize::mask_email;
use scout_referrals::workflows::referrals::{
    ActivityFeedRecord, ChurnedCandidateRecord, Collection, Notifier, NotifyError, OutboundEmail,
    RecordId, RecordStore, ReferralRecord, ScoutRecord, StoreError, StoredReferral, TripScenario,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default)]
struct Tables {
    referrals: HashMap<Collection, Vec<StoredReferral>>,
    scouts: Vec<ScoutRecord>,
    churned: Vec<ChurnedCandidateRecord>,
    activity: Vec<ActivityFeedRecord>,
}

/// Process-local record store backing `serve` and `demo`. Row ids are
/// monotonic across all collections so insertion order is recoverable.
#[derive(Default)]
pub(crate) struct MemoryRecordStore {
    tables: Mutex<Tables>,
    next_id: AtomicU64,
}

impl MemoryRecordStore {
    pub(crate) fn seed_scouts(&self, rows: Vec<ScoutRecord>) {
        self.tables.lock().expect("store mutex poisoned").scouts = rows;
    }

    pub(crate) fn seed_churned_candidates(&self, rows: Vec<ChurnedCandidateRecord>) {
        self.tables.lock().expect("store mutex poisoned").churned = rows;
    }

    pub(crate) fn set_trip_scenario(&self, id: RecordId, scenario: TripScenario) {
        let mut tables = self.tables.lock().expect("store mutex poisoned");
        if let Some(rows) = tables.referrals.get_mut(&Collection::ValidReferrals) {
            if let Some(row) = rows.iter_mut().find(|row| row.id == id) {
                row.record.trip_scenario = scenario;
            }
        }
    }
}

fn referral_rows(
    tables: &mut Tables,
    collection: Collection,
) -> Result<&mut Vec<StoredReferral>, StoreError> {
    match collection {
        Collection::Scouts | Collection::ChurnedCandidates | Collection::ActivityFeed => Err(
            StoreError::Unavailable(format!(
                "'{}' does not hold referral rows",
                collection.label()
            )),
        ),
        other => Ok(tables.referrals.entry(other).or_default()),
    }
}

impl RecordStore for MemoryRecordStore {
    fn append(
        &self,
        collection: Collection,
        record: ReferralRecord,
    ) -> Result<StoredReferral, StoreError> {
        let id = RecordId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let stored = StoredReferral { id, record };
        let mut tables = self.tables.lock().expect("store mutex poisoned");
        referral_rows(&mut tables, collection)?.push(stored.clone());
        Ok(stored)
    }

    fn read_all(&self, collection: Collection) -> Result<Vec<StoredReferral>, StoreError> {
        let mut tables = self.tables.lock().expect("store mutex poisoned");
        Ok(referral_rows(&mut tables, collection)?.clone())
    }

    fn read_last(&self, collection: Collection) -> Result<Option<StoredReferral>, StoreError> {
        let mut tables = self.tables.lock().expect("store mutex poisoned");
        Ok(referral_rows(&mut tables, collection)?.last().cloned())
    }

    fn update(
        &self,
        collection: Collection,
        id: RecordId,
        record: ReferralRecord,
    ) -> Result<(), StoreError> {
        let mut tables = self.tables.lock().expect("store mutex poisoned");
        let rows = referral_rows(&mut tables, collection)?;
        match rows.iter_mut().find(|row| row.id == id) {
            Some(row) => {
                row.record = record;
                Ok(())
            }
            None => Err(StoreError::NotFound { collection, id }),
        }
    }

    fn delete(&self, collection: Collection, id: RecordId) -> Result<(), StoreError> {
        let mut tables = self.tables.lock().expect("store mutex poisoned");
        let rows = referral_rows(&mut tables, collection)?;
        let before = rows.len();
        rows.retain(|row| row.id != id);
        if rows.len() == before {
            return Err(StoreError::NotFound { collection, id });
        }
        Ok(())
    }

    fn scouts(&self) -> Result<Vec<ScoutRecord>, StoreError> {
        Ok(self.tables.lock().expect("store mutex poisoned").scouts.clone())
    }

    fn churned_candidates(&self) -> Result<Vec<ChurnedCandidateRecord>, StoreError> {
        Ok(self
            .tables
            .lock()
            .expect("store mutex poisoned")
            .churned
            .clone())
    }

    fn activity_feed(&self) -> Result<Vec<ActivityFeedRecord>, StoreError> {
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
        self.tables.lock().expect("store mutex poisoned").churned = rows;
        Ok(())
    }

    fn replace_activity_feed(&self, rows: Vec<ActivityFeedRecord>) -> Result<(), StoreError> {
        self.tables.lock().expect("store mutex poisoned").activity = rows;
        Ok(())
    }
}

/// Notifier that logs outbound notices instead of delivering them; the
/// real transport sits outside this service. Recipients are masked on
/// the way into the log.
pub(crate) struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn send(&self, email: OutboundEmail) -> Result<(), NotifyError> {
        tracing::info!(
            to = %mask_email(&email.to),
            subject = %email.subject,
            "outbound notice"
        );
        Ok(())
    }
}
