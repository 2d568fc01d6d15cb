use super::super::domain::{
    Eligibility, EscalationStatus, ReferralRecord, ScoutRecord,
};

/// Whether a not-eligible row qualifies for manual re-admission. All
/// conditions are required: the candidate side already checked out, an
/// operator set the escalated flag and wrote a resolution note, and no
/// resolution has been recorded against the row yet.
pub fn ready_for_readmission(record: &ReferralRecord) -> bool {
    record.candidate_eligibility == Eligibility::Eligible
        && record.escalation == EscalationStatus::Escalated
        && !record.resolution_note.trim().is_empty()
        && record.resolution_email.is_empty()
        && record.resolution_counter == 0
}

/// Build the minimal replacement row appended to ValidReferrals when an
/// escalation is honored: candidate contact fields plus the scout fields
/// re-resolved from the current scout snapshot.
pub fn readmitted_record(source: &ReferralRecord, scout: &ScoutRecord) -> ReferralRecord {
    ReferralRecord {
        scout_code: source.scout_code.clone(),
        candidate_phone: source.candidate_phone.clone(),
        candidate_email: source.candidate_email.clone(),
        scout_email: scout.email.clone(),
        scout_name: scout.name.clone(),
        scout_id: scout.id.clone(),
        ..ReferralRecord::default()
    }
}
