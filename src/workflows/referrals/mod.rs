//! Referral program lifecycle: a scout (active driver) refers a churned
//! driver back into the fleet. Intake validates both parties, ranks
//! duplicates, notifies, and routes each row; periodic jobs reconcile
//! external activity data, honor manual escalations, sweep completed
//! referrals into compensation, and send scenario updates to scouts.

pub mod anonymize;
pub mod domain;
pub mod feed;
pub(crate) mod intake;
pub(crate) mod jobs;
pub mod notify;
pub mod router;
pub mod service;
pub mod store;

#[cfg(test)]
mod tests;

pub use domain::{
    ActivityFeedRecord, ChurnedCandidateRecord, Eligibility, EscalationStatus, ReferralRecord,
    ReferralSubmission, ScoutRecord, TripScenario,
};
pub use feed::FeedError;
pub use intake::IntakeEvent;
pub use jobs::reconcile::ReconcileSummary;
pub use notify::{Notifier, NotifyError, OutboundEmail};
pub use router::{referral_router, ReferralRecordView};
pub use service::{IntakeOutcome, ReferralService, ReferralServiceError};
pub use store::{Collection, RecordId, RecordStore, StoreError, StoredReferral};
