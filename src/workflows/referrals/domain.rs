use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Binary outcome of a lookup against a reference collection. `Unset`
/// marks a row the intake pipeline has not annotated yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Eligibility {
    Eligible,
    NotEligible,
    #[default]
    Unset,
}

impl Eligibility {
    pub const fn is_eligible(self) -> bool {
        matches!(self, Eligibility::Eligible)
    }
}

/// Trip-progress classification used for the periodic scout updates and
/// the compensation sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TripScenario {
    NoTrips,
    InProgress,
    Missed,
    Completed,
    #[default]
    Unset,
}

/// Manual override lifecycle for rejected rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EscalationStatus {
    #[default]
    None,
    Escalated,
    Resolved,
}

/// Raw form payload for one referral submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferralSubmission {
    pub scout_code: String,
    pub candidate_phone: String,
    pub candidate_email: String,
}

/// One row of the referral collections. Created once per submission,
/// annotated in place during intake, then copied/moved between
/// collections by the routing and batch jobs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReferralRecord {
    pub scout_code: String,
    pub candidate_phone: String,
    pub candidate_email: String,
    pub scout_name: String,
    pub scout_email: String,
    pub scout_eligibility: Eligibility,
    pub candidate_eligibility: Eligibility,
    pub scout_id: String,
    pub candidate_id: String,
    pub resolved_candidate_email: String,
    pub duplicate_rank: u32,
    pub trip_scenario: TripScenario,
    pub reactivation_date: Option<NaiveDate>,
    pub last_activity_date: Option<NaiveDate>,
    pub escalation: EscalationStatus,
    pub resolution_note: String,
    pub resolution_email: String,
    pub resolution_counter: u32,
}

impl ReferralRecord {
    pub fn from_submission(submission: ReferralSubmission) -> Self {
        Self {
            scout_code: submission.scout_code,
            candidate_phone: submission.candidate_phone,
            candidate_email: submission.candidate_email,
            ..Self::default()
        }
    }

    /// Both lookups succeeded for this row.
    pub fn both_eligible(&self) -> bool {
        self.scout_eligibility.is_eligible() && self.candidate_eligibility.is_eligible()
    }
}

/// Identity row for an active driver allowed to refer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoutRecord {
    pub code: String,
    pub id: String,
    pub name: String,
    pub email: String,
}

/// Identity row for a churned driver who may be referred back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChurnedCandidateRecord {
    pub id: String,
    pub phone: String,
    pub email: String,
}

/// Externally supplied activity observation, keyed by candidate id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityFeedRecord {
    pub candidate_id: String,
    pub activity_date: NaiveDate,
}

/// Digits-only view of a phone number so legacy numeric-vs-string storage
/// still compares equal. Leading zeros are dropped for the same reason.
pub fn normalized_phone(raw: &str) -> String {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    let trimmed = digits.trim_start_matches('0');
    if trimmed.is_empty() && !digits.is_empty() {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Loose phone equality used as the sole duplicate-detection key.
pub fn phones_match(left: &str, right: &str) -> bool {
    normalized_phone(left) == normalized_phone(right)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_submission_leaves_annotations_unset() {
        let record = ReferralRecord::from_submission(ReferralSubmission {
            scout_code: "SC-9".to_string(),
            candidate_phone: "5551234567".to_string(),
            candidate_email: "driver@example.com".to_string(),
        });

        assert_eq!(record.scout_eligibility, Eligibility::Unset);
        assert_eq!(record.candidate_eligibility, Eligibility::Unset);
        assert_eq!(record.duplicate_rank, 0);
        assert_eq!(record.trip_scenario, TripScenario::Unset);
        assert_eq!(record.escalation, EscalationStatus::None);
    }

    #[test]
    fn phones_match_ignores_formatting_and_leading_zeros() {
        assert!(phones_match("5551234567", "555-123-4567"));
        assert!(phones_match("05551234567", "5551234567"));
        assert!(phones_match(" (555) 123 4567 ", "5551234567"));
        assert!(!phones_match("5551234567", "5551234568"));
    }

    #[test]
    fn normalized_phone_keeps_a_zero_for_all_zero_input() {
        assert_eq!(normalized_phone("000"), "0");
        assert_eq!(normalized_phone(""), "");
    }
}
