use std::io::Read;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::ProgramConfig;

use super::domain::{EscalationStatus, ReferralRecord, ReferralSubmission};
use super::feed::{self, FeedError};
use super::intake::{duplicates, eligibility, notifications, routing, IntakeEvent};
use super::jobs::{compensation, escalation, reconcile};
use super::jobs::reconcile::{ActivityMerge, ReconcileSummary};
use super::notify::{Notifier, NotifyError};
use super::store::{Collection, RecordStore, StoreError, StoredReferral};

/// Facade composing the intake pipeline and the periodic jobs over a
/// record store and a notifier. Entry points are invoked by the HTTP
/// layer or an external scheduler; the collaborating trigger source
/// guarantees at most one entry point in flight at a time.
pub struct ReferralService<S, N> {
    store: Arc<S>,
    notifier: Arc<N>,
    program: ProgramConfig,
}

/// What one intake run decided, for logging and API responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntakeOutcome {
    pub record: ReferralRecord,
    pub destination: Collection,
    pub event: Option<IntakeEvent>,
}

impl<S, N> ReferralService<S, N>
where
    S: RecordStore + 'static,
    N: Notifier + 'static,
{
    pub fn new(store: Arc<S>, notifier: Arc<N>, program: ProgramConfig) -> Self {
        Self {
            store,
            notifier,
            program,
        }
    }

    /// Append a new submission to the intake log and run the pipeline on
    /// it immediately.
    pub fn submit(
        &self,
        submission: ReferralSubmission,
    ) -> Result<IntakeOutcome, ReferralServiceError> {
        self.store.append(
            Collection::Referrals,
            ReferralRecord::from_submission(submission),
        )?;
        let outcome = self.on_intake()?.ok_or_else(|| {
            ReferralServiceError::Store(StoreError::Unavailable(
                "intake log lost the appended submission".to_string(),
            ))
        })?;
        Ok(outcome)
    }

    /// Process the newest intake-log row: validate, rank, notify, route.
    ///
    /// The whole sequence is one fault boundary: a failure aborts the
    /// remaining steps for this submission and leaves the row in
    /// whatever annotated state it reached; there is no rollback.
    /// Returns `None` when the intake log is empty.
    pub fn on_intake(&self) -> Result<Option<IntakeOutcome>, ReferralServiceError> {
        let Some(stored) = self.store.read_last(Collection::Referrals)? else {
            warn!("intake triggered with an empty referral log");
            return Ok(None);
        };

        let scouts = self.store.scouts()?;
        let churned = self.store.churned_candidates()?;

        let mut record = eligibility::validate(stored.record, &scouts, &churned, &self.program);

        let prior: Vec<ReferralRecord> = self
            .store
            .read_all(Collection::Referrals)?
            .into_iter()
            .filter(|row| row.id < stored.id)
            .map(|row| row.record)
            .collect();
        record.duplicate_rank = duplicates::rank(&record, prior.iter());

        // Persist the annotations so the append-only history carries them.
        self.store
            .update(Collection::Referrals, stored.id, record.clone())?;

        let event = notifications::intake_event(&record);
        if let Some(event) = event {
            for email in notifications::intake_emails(&record, event) {
                self.notifier.send(email)?;
            }
        }

        let destination = routing::destination(&record);
        self.store.append(destination, record.clone())?;

        info!(
            destination = destination.label(),
            rank = record.duplicate_rank,
            event = ?event,
            "referral intake routed"
        );

        Ok(Some(IntakeOutcome {
            record,
            destination,
            event,
        }))
    }

    /// Periodic scenario sweep: one scout-facing update per valid
    /// referral whose trip scenario is set.
    pub fn run_scenario_notices(&self) -> Result<usize, ReferralServiceError> {
        let rows = self.store.read_all(Collection::ValidReferrals)?;
        let mut sent = 0;
        for row in &rows {
            if let Some(email) = notifications::scenario_email(&row.record) {
                self.notifier.send(email)?;
                sent += 1;
            }
        }

        info!(sent, "scenario notices dispatched");
        Ok(sent)
    }

    /// Merge the activity feed into valid referrals. Each row's mutation
    /// commits independently, so a partial run is safe to repeat.
    pub fn reconcile_activity(&self) -> Result<ReconcileSummary, ReferralServiceError> {
        let latest = reconcile::latest_activity_by_candidate(&self.store.activity_feed()?);

        let mut summary = ReconcileSummary::default();
        for stored in self.store.read_all(Collection::ValidReferrals)? {
            if stored.record.candidate_id.is_empty() {
                continue;
            }
            let Some(activity_date) = latest.get(&stored.record.candidate_id).copied() else {
                continue;
            };

            summary.matched += 1;
            let mut record = stored.record;
            match reconcile::merge_activity(&mut record, activity_date) {
                ActivityMerge::Reactivated => {
                    summary.reactivated += 1;
                    self.store
                        .update(Collection::ValidReferrals, stored.id, record)?;
                }
                ActivityMerge::Refreshed => {
                    summary.refreshed += 1;
                    self.store
                        .update(Collection::ValidReferrals, stored.id, record)?;
                }
                ActivityMerge::Unchanged => {}
            }
        }

        info!(
            matched = summary.matched,
            reactivated = summary.reactivated,
            refreshed = summary.refreshed,
            "activity feed reconciled"
        );
        Ok(summary)
    }

    /// Re-admit escalated not-eligible rows whose scout still resolves.
    /// Newest rows first; the source row stays behind as an audit trail.
    pub fn process_escalations(&self) -> Result<usize, ReferralServiceError> {
        let scouts = self.store.scouts()?;
        let rows = self.store.read_all(Collection::NotEligibleReferrals)?;

        let mut readmitted = 0;
        for stored in rows.into_iter().rev() {
            if !escalation::ready_for_readmission(&stored.record) {
                continue;
            }
            let Some(scout) = scouts
                .iter()
                .find(|scout| scout.code == stored.record.scout_code)
            else {
                continue;
            };

            self.store.append(
                Collection::ValidReferrals,
                escalation::readmitted_record(&stored.record, scout),
            )?;

            let mut record = stored.record;
            record.escalation = EscalationStatus::Resolved;
            self.store
                .update(Collection::NotEligibleReferrals, stored.id, record)?;
            readmitted += 1;
        }

        info!(readmitted, "escalations processed");
        Ok(readmitted)
    }

    /// Move completed referrals into CompensationDue, newest first. This
    /// is a move: a swept row no longer appears in ValidReferrals.
    pub fn sweep_compensation(&self) -> Result<usize, ReferralServiceError> {
        let rows = self.store.read_all(Collection::ValidReferrals)?;

        let mut moved = 0;
        for stored in rows.into_iter().rev() {
            if !compensation::is_compensation_due(&stored.record) {
                continue;
            }
            self.store
                .append(Collection::CompensationDue, stored.record.clone())?;
            self.store.delete(Collection::ValidReferrals, stored.id)?;
            moved += 1;
        }

        info!(moved, "compensation sweep finished");
        Ok(moved)
    }

    /// Replace the churned-candidate snapshot from an external CSV export.
    pub fn sync_churned_candidates<R: Read>(
        &self,
        reader: R,
    ) -> Result<usize, ReferralServiceError> {
        let rows = feed::parse_churned_candidates(reader)?;
        let count = rows.len();
        self.store.replace_churned_candidates(rows)?;
        info!(count, "churned-candidate feed replaced");
        Ok(count)
    }

    /// Replace the activity feed from an external CSV export.
    pub fn sync_activity_feed<R: Read>(&self, reader: R) -> Result<usize, ReferralServiceError> {
        let rows = feed::parse_activity_feed(reader)?;
        let count = rows.len();
        self.store.replace_activity_feed(rows)?;
        info!(count, "activity feed replaced");
        Ok(count)
    }

    /// Snapshot of a referral collection for API listings.
    pub fn collection(&self, collection: Collection) -> Result<Vec<StoredReferral>, ReferralServiceError> {
        Ok(self.store.read_all(collection)?)
    }
}

/// Error raised by the referral service.
#[derive(Debug, thiserror::Error)]
pub enum ReferralServiceError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Notify(#[from] NotifyError),
    #[error(transparent)]
    Feed(#[from] FeedError),
}
