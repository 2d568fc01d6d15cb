use super::super::domain::ReferralRecord;
use super::super::store::Collection;

/// Classify a ranked intake row into its destination collection.
///
/// Only the canonical valid referral (both parties eligible, rank 1)
/// lands in ValidReferrals. A rank >= 2 row files as not-eligible even
/// though a duplicate notice went out: the classification answers "is
/// this the referral on file", not "are the parties eligible". Routing
/// always runs exactly once per intake, whatever notification fired.
pub fn destination(record: &ReferralRecord) -> Collection {
    if record.both_eligible() && record.duplicate_rank == 1 {
        Collection::ValidReferrals
    } else {
        Collection::NotEligibleReferrals
    }
}
