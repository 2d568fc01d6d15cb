//! Rules for the periodic batch jobs. Orchestration (snapshots, store
//! round-trips, ordering) lives in the service; these modules hold the
//! per-row decisions so they can be tested in isolation.

pub mod compensation;
pub mod escalation;
pub mod reconcile;
