use super::super::domain::{phones_match, ReferralRecord};

/// Rank a validated referral against the prior intake log.
///
/// Ranking applies only when both eligibilities came back `Eligible`;
/// every other row stays at 0. The rank counts strictly earlier rows
/// whose candidate phone matches (loose digit comparison) and whose own
/// two eligibilities were both `Eligible`, plus one for the current row,
/// so the first eligible occurrence ranks 1 and duplicates rank 2 and
/// up. Phone is the sole dedup key; email is deliberately not consulted
/// even though churn lookup accepts it.
pub fn rank<'a, I>(record: &ReferralRecord, prior: I) -> u32
where
    I: IntoIterator<Item = &'a ReferralRecord>,
{
    if !record.both_eligible() {
        return 0;
    }

    let matches = prior
        .into_iter()
        .filter(|earlier| earlier.both_eligible())
        .filter(|earlier| phones_match(&earlier.candidate_phone, &record.candidate_phone))
        .count() as u32;

    matches + 1
}
