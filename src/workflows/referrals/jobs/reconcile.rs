use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::super::domain::{ActivityFeedRecord, ReferralRecord};

/// How a feed date was merged into a valid referral.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityMerge {
    /// First observed activity filled the reactivation date.
    Reactivated,
    /// Reactivation was already set; the last-activity date moved.
    Refreshed,
    /// The row already reflected the feed; nothing to write.
    Unchanged,
}

/// Collapse the activity feed into candidate id -> latest activity date.
pub fn latest_activity_by_candidate(
    feed: &[ActivityFeedRecord],
) -> HashMap<String, NaiveDate> {
    let mut latest: HashMap<String, NaiveDate> = HashMap::new();
    for row in feed {
        latest
            .entry(row.candidate_id.clone())
            .and_modify(|date| {
                if row.activity_date > *date {
                    *date = row.activity_date;
                }
            })
            .or_insert(row.activity_date);
    }
    latest
}

/// Merge one feed date into one valid referral. The first recorded
/// activity fills the reactivation date; later activity only advances
/// the last-activity date. A set reactivation date is never overwritten,
/// which also makes repeat runs over an unchanged feed converge.
pub fn merge_activity(
    record: &mut ReferralRecord,
    activity_date: NaiveDate,
) -> ActivityMerge {
    if record.reactivation_date.is_none() {
        record.reactivation_date = Some(activity_date);
        return ActivityMerge::Reactivated;
    }

    if record.last_activity_date == Some(activity_date) {
        return ActivityMerge::Unchanged;
    }

    record.last_activity_date = Some(activity_date);
    ActivityMerge::Refreshed
}

/// Per-run counters reported by the reconciliation job.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileSummary {
    pub matched: usize,
    pub reactivated: usize,
    pub refreshed: usize,
}
