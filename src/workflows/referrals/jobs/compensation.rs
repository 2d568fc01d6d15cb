use super::super::domain::{ReferralRecord, TripScenario};

/// A valid referral moves to CompensationDue exactly when its trip
/// scenario reached `Completed`.
pub fn is_compensation_due(record: &ReferralRecord) -> bool {
    record.trip_scenario == TripScenario::Completed
}
