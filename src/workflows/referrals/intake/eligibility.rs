use crate::config::ProgramConfig;

use super::super::domain::{
    ChurnedCandidateRecord, Eligibility, ReferralRecord, ScoutRecord,
};

/// Annotate a referral with the outcome of both reference lookups.
///
/// The scout is matched by exact code; a hit copies name, id, and email
/// onto the record. The candidate is matched by phone OR email against
/// the churned-candidate snapshot, first stored match wins. A candidate
/// miss files the configured placeholder address so downstream notices
/// never target an unknown mailbox. Lookup misses are normal branches,
/// not errors.
pub fn validate(
    mut record: ReferralRecord,
    scouts: &[ScoutRecord],
    churned: &[ChurnedCandidateRecord],
    program: &ProgramConfig,
) -> ReferralRecord {
    match scouts.iter().find(|scout| scout.code == record.scout_code) {
        Some(scout) => {
            record.scout_eligibility = Eligibility::Eligible;
            record.scout_email = scout.email.clone();
            record.scout_id = scout.id.clone();
            record.scout_name = scout.name.clone();
        }
        None => {
            record.scout_eligibility = Eligibility::NotEligible;
            record.scout_email = String::new();
            record.scout_id = String::new();
            record.scout_name = String::new();
        }
    }

    let candidate = churned.iter().find(|candidate| {
        candidate.phone == record.candidate_phone || candidate.email == record.candidate_email
    });
    match candidate {
        Some(candidate) => {
            record.candidate_eligibility = Eligibility::Eligible;
            record.candidate_id = candidate.id.clone();
            record.resolved_candidate_email = candidate.email.clone();
        }
        None => {
            record.candidate_eligibility = Eligibility::NotEligible;
            record.candidate_id = String::new();
            record.resolved_candidate_email = program.invalid_candidate_email.clone();
        }
    }

    record
}
