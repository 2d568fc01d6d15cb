use serde::{Deserialize, Serialize};

use super::super::anonymize::mask_phone;
use super::super::domain::{Eligibility, ReferralRecord, TripScenario};
use super::super::notify::OutboundEmail;

/// Notification event chosen for a freshly ranked intake row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntakeEvent {
    /// First eligible occurrence of this candidate.
    Confirmation,
    /// Both parties eligible but the candidate was already referred.
    DuplicateNotice,
    /// Eligible scout, candidate not on the churned list.
    IneligibleNotice,
}

/// Decide which event an annotated intake row produces.
///
/// No event ever fires for a not-eligible scout. A rank of 0 with both
/// parties eligible cannot be produced by the ranking step, so that row
/// also yields no event.
pub fn intake_event(record: &ReferralRecord) -> Option<IntakeEvent> {
    if record.scout_eligibility != Eligibility::Eligible {
        return None;
    }

    match record.candidate_eligibility {
        Eligibility::NotEligible => Some(IntakeEvent::IneligibleNotice),
        Eligibility::Eligible => match record.duplicate_rank {
            1 => Some(IntakeEvent::Confirmation),
            rank if rank >= 2 => Some(IntakeEvent::DuplicateNotice),
            _ => None,
        },
        Eligibility::Unset => None,
    }
}

/// Render the outbound notices for an intake event. Every event writes
/// to both parties with bodies phrased for each side; the candidate
/// address is always the resolved one, which is the placeholder mailbox
/// when the candidate was not found.
pub fn intake_emails(record: &ReferralRecord, event: IntakeEvent) -> Vec<OutboundEmail> {
    let masked_phone = mask_phone(&record.candidate_phone);

    match event {
        IntakeEvent::Confirmation => vec![
            OutboundEmail {
                to: record.scout_email.clone(),
                subject: "Your referral is in".to_string(),
                body: format!(
                    "Hi {}, we received your referral for the driver at {}. \
                     We'll keep you posted as they get back on the road.",
                    record.scout_name, masked_phone
                ),
            },
            OutboundEmail {
                to: record.resolved_candidate_email.clone(),
                subject: "A fellow driver referred you back".to_string(),
                body: format!(
                    "{} thinks you should drive with us again. \
                     Log in to pick up where you left off.",
                    record.scout_name
                ),
            },
        ],
        IntakeEvent::DuplicateNotice => vec![
            OutboundEmail {
                to: record.scout_email.clone(),
                subject: "This driver was already referred".to_string(),
                body: format!(
                    "Hi {}, the driver at {} was already referred before you. \
                     Only the first referral counts toward compensation.",
                    record.scout_name, masked_phone
                ),
            },
            OutboundEmail {
                to: record.resolved_candidate_email.clone(),
                subject: "You were referred again".to_string(),
                body: "Another driver referred you, but your earlier referral \
                       is still the one on file. Nothing changes for you."
                    .to_string(),
            },
        ],
        IntakeEvent::IneligibleNotice => vec![
            OutboundEmail {
                to: record.scout_email.clone(),
                subject: "We couldn't match your referral".to_string(),
                body: format!(
                    "Hi {}, the driver at {} isn't on the returning-driver \
                     list, so this referral doesn't qualify for the program.",
                    record.scout_name, masked_phone
                ),
            },
            OutboundEmail {
                to: record.resolved_candidate_email.clone(),
                subject: "About your referral".to_string(),
                body: "A driver tried to refer you to the program, but we \
                       couldn't match you to a returning-driver profile."
                    .to_string(),
            },
        ],
    }
}

/// Render the periodic scenario update for one valid referral. Goes to
/// the scout only; `Unset` produces nothing.
pub fn scenario_email(record: &ReferralRecord) -> Option<OutboundEmail> {
    let masked_phone = mask_phone(&record.candidate_phone);

    let (subject, body) = match record.trip_scenario {
        TripScenario::NoTrips => (
            "Your referral hasn't started driving yet".to_string(),
            format!(
                "The driver you referred ({masked_phone}) signed up but has \
                 not completed a trip yet. A nudge from you might help."
            ),
        ),
        TripScenario::InProgress => (
            "Your referral is on the road".to_string(),
            format!(
                "The driver you referred ({masked_phone}) is completing \
                 trips. Compensation unlocks when they finish the program."
            ),
        ),
        TripScenario::Missed => (
            "Your referral missed the window".to_string(),
            format!(
                "The driver you referred ({masked_phone}) did not complete \
                 the required trips in time, so this referral has lapsed."
            ),
        ),
        TripScenario::Completed => (
            "Your referral completed the program".to_string(),
            format!(
                "Great news: the driver you referred ({masked_phone}) \
                 completed the program. Your compensation is on its way."
            ),
        ),
        TripScenario::Unset => return None,
    };

    Some(OutboundEmail {
        to: record.scout_email.clone(),
        subject,
        body,
    })
}
