use serde::{Deserialize, Serialize};

use super::domain::{ActivityFeedRecord, ChurnedCandidateRecord, ReferralRecord, ScoutRecord};

/// The named collections of the referral program. Collection identifiers
/// are fixed; backends map them to whatever tables or sheets they manage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Referrals,
    Scouts,
    ChurnedCandidates,
    ValidReferrals,
    NotEligibleReferrals,
    ActivityFeed,
    CompensationDue,
    BlockedList,
}

impl Collection {
    pub const fn label(self) -> &'static str {
        match self {
            Collection::Referrals => "referrals",
            Collection::Scouts => "scouts",
            Collection::ChurnedCandidates => "churned_candidates",
            Collection::ValidReferrals => "valid_referrals",
            Collection::NotEligibleReferrals => "not_eligible_referrals",
            Collection::ActivityFeed => "activity_feed",
            Collection::CompensationDue => "compensation_due",
            Collection::BlockedList => "blocked_list",
        }
    }
}

/// Stable identity of a stored row. Jobs that delete or insert rows key
/// their operations on this, never on positional indices.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct RecordId(pub u64);

/// A referral row together with its storage identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredReferral {
    pub id: RecordId,
    pub record: ReferralRecord,
}

/// Error enumeration for record store failures. A missing collection is
/// the startup-precondition failure of the engine: fatal to the
/// triggering run, never a per-record outcome.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("required collection '{}' is missing", .0.label())]
    MissingCollection(Collection),
    #[error("record {id:?} not found in '{}'", .collection.label())]
    NotFound { collection: Collection, id: RecordId },
    #[error("record store unavailable: {0}")]
    Unavailable(String),
}

/// Durable tabular storage behind the lifecycle engine. Referral-shaped
/// collections (Referrals, ValidReferrals, NotEligibleReferrals,
/// CompensationDue) expose append/read/update/delete; the reference
/// collections are read as full snapshots and replaced wholesale by the
/// external feed sync.
pub trait RecordStore: Send + Sync {
    fn append(
        &self,
        collection: Collection,
        record: ReferralRecord,
    ) -> Result<StoredReferral, StoreError>;

    /// All rows of a referral collection in insertion order.
    fn read_all(&self, collection: Collection) -> Result<Vec<StoredReferral>, StoreError>;

    /// Newest row of a referral collection, if any.
    fn read_last(&self, collection: Collection) -> Result<Option<StoredReferral>, StoreError>;

    fn update(
        &self,
        collection: Collection,
        id: RecordId,
        record: ReferralRecord,
    ) -> Result<(), StoreError>;

    fn delete(&self, collection: Collection, id: RecordId) -> Result<(), StoreError>;

    fn scouts(&self) -> Result<Vec<ScoutRecord>, StoreError>;

    fn churned_candidates(&self) -> Result<Vec<ChurnedCandidateRecord>, StoreError>;

    fn activity_feed(&self) -> Result<Vec<ActivityFeedRecord>, StoreError>;

    fn replace_churned_candidates(
        &self,
        rows: Vec<ChurnedCandidateRecord>,
    ) -> Result<(), StoreError>;

    fn replace_activity_feed(&self, rows: Vec<ActivityFeedRecord>) -> Result<(), StoreError>;
}
