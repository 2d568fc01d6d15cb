//! Per-submission pipeline: eligibility lookups, duplicate ranking,
//! notification selection, and routing. Each step is a pure
//! transformation over the referral value; persistence happens in the
//! service layer at pipeline boundaries.

pub mod duplicates;
pub mod eligibility;
pub mod notifications;
pub mod routing;

pub use notifications::IntakeEvent;
