use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::io::Cursor;

use super::anonymize::{mask_email, mask_phone};
use super::domain::{Eligibility, EscalationStatus, ReferralRecord, ReferralSubmission, TripScenario};
use super::notify::Notifier;
use super::service::{IntakeOutcome, ReferralService, ReferralServiceError};
use super::store::{Collection, RecordStore, StoreError};

/// Router builder exposing the intake endpoint, collection listings, and
/// the scheduler-facing job and feed triggers.
pub fn referral_router<S, N>(service: Arc<ReferralService<S, N>>) -> Router
where
    S: RecordStore + 'static,
    N: Notifier + 'static,
{
    Router::new()
        .route("/api/v1/referrals", post(submit_handler::<S, N>))
        .route(
            "/api/v1/referrals/collections/:collection",
            get(collection_handler::<S, N>),
        )
        .route(
            "/api/v1/referrals/jobs/:job",
            post(job_handler::<S, N>),
        )
        .route(
            "/api/v1/referrals/feeds/:feed",
            post(feed_handler::<S, N>),
        )
        .with_state(service)
}

/// Privacy-safe projection of a referral row; contact fields are masked
/// before they leave the service.
#[derive(Debug, Clone, Serialize)]
pub struct ReferralRecordView {
    pub scout_code: String,
    pub scout_name: String,
    pub candidate_phone: String,
    pub candidate_email: String,
    pub scout_eligibility: Eligibility,
    pub candidate_eligibility: Eligibility,
    pub duplicate_rank: u32,
    pub trip_scenario: TripScenario,
    pub escalation: EscalationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reactivation_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_activity_date: Option<NaiveDate>,
}

impl ReferralRecordView {
    pub fn from_record(record: &ReferralRecord) -> Self {
        Self {
            scout_code: record.scout_code.clone(),
            scout_name: record.scout_name.clone(),
            candidate_phone: mask_phone(&record.candidate_phone),
            candidate_email: mask_email(&record.candidate_email),
            scout_eligibility: record.scout_eligibility,
            candidate_eligibility: record.candidate_eligibility,
            duplicate_rank: record.duplicate_rank,
            trip_scenario: record.trip_scenario,
            escalation: record.escalation,
            reactivation_date: record.reactivation_date,
            last_activity_date: record.last_activity_date,
        }
    }
}

#[derive(Debug, Serialize)]
struct IntakeOutcomeView {
    destination: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    event: Option<super::intake::IntakeEvent>,
    record: ReferralRecordView,
}

impl IntakeOutcomeView {
    fn from_outcome(outcome: &IntakeOutcome) -> Self {
        Self {
            destination: outcome.destination.label(),
            event: outcome.event,
            record: ReferralRecordView::from_record(&outcome.record),
        }
    }
}

#[derive(Debug, Deserialize)]
struct FeedPayload {
    csv: String,
}

fn error_response(error: ReferralServiceError) -> Response {
    let status = match &error {
        ReferralServiceError::Feed(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ReferralServiceError::Store(StoreError::MissingCollection(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}

pub(crate) async fn submit_handler<S, N>(
    State(service): State<Arc<ReferralService<S, N>>>,
    axum::Json(submission): axum::Json<ReferralSubmission>,
) -> Response
where
    S: RecordStore + 'static,
    N: Notifier + 'static,
{
    match service.submit(submission) {
        Ok(outcome) => (
            StatusCode::ACCEPTED,
            axum::Json(IntakeOutcomeView::from_outcome(&outcome)),
        )
            .into_response(),
        Err(error) => {
            tracing::error!(%error, "intake pipeline aborted");
            error_response(error)
        }
    }
}

fn referral_collection(label: &str) -> Option<Collection> {
    match label {
        "referrals" => Some(Collection::Referrals),
        "valid-referrals" => Some(Collection::ValidReferrals),
        "not-eligible-referrals" => Some(Collection::NotEligibleReferrals),
        "compensation-due" => Some(Collection::CompensationDue),
        _ => None,
    }
}

pub(crate) async fn collection_handler<S, N>(
    State(service): State<Arc<ReferralService<S, N>>>,
    Path(collection): Path<String>,
) -> Response
where
    S: RecordStore + 'static,
    N: Notifier + 'static,
{
    let Some(collection) = referral_collection(&collection) else {
        let payload = json!({ "error": format!("unknown collection '{collection}'") });
        return (StatusCode::NOT_FOUND, axum::Json(payload)).into_response();
    };

    match service.collection(collection) {
        Ok(rows) => {
            let views: Vec<ReferralRecordView> = rows
                .iter()
                .map(|row| ReferralRecordView::from_record(&row.record))
                .collect();
            (StatusCode::OK, axum::Json(views)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn job_handler<S, N>(
    State(service): State<Arc<ReferralService<S, N>>>,
    Path(job): Path<String>,
) -> Response
where
    S: RecordStore + 'static,
    N: Notifier + 'static,
{
    let outcome = match job.as_str() {
        "scenario-notices" => service
            .run_scenario_notices()
            .map(|sent| json!({ "job": job, "sent": sent })),
        "reconcile-activity" => service.reconcile_activity().map(|summary| {
            json!({
                "job": job,
                "matched": summary.matched,
                "reactivated": summary.reactivated,
                "refreshed": summary.refreshed,
            })
        }),
        "process-escalations" => service
            .process_escalations()
            .map(|readmitted| json!({ "job": job, "readmitted": readmitted })),
        "sweep-compensation" => service
            .sweep_compensation()
            .map(|moved| json!({ "job": job, "moved": moved })),
        _ => {
            let payload = json!({ "error": format!("unknown job '{job}'") });
            return (StatusCode::NOT_FOUND, axum::Json(payload)).into_response();
        }
    };

    match outcome {
        Ok(payload) => (StatusCode::OK, axum::Json(payload)).into_response(),
        Err(error) => {
            tracing::error!(%error, job, "periodic job failed");
            error_response(error)
        }
    }
}

pub(crate) async fn feed_handler<S, N>(
    State(service): State<Arc<ReferralService<S, N>>>,
    Path(feed): Path<String>,
    axum::Json(payload): axum::Json<FeedPayload>,
) -> Response
where
    S: RecordStore + 'static,
    N: Notifier + 'static,
{
    let reader = Cursor::new(payload.csv.into_bytes());
    let outcome = match feed.as_str() {
        "churned-candidates" => service.sync_churned_candidates(reader),
        "activity" => service.sync_activity_feed(reader),
        _ => {
            let payload = json!({ "error": format!("unknown feed '{feed}'") });
            return (StatusCode::NOT_FOUND, axum::Json(payload)).into_response();
        }
    };

    match outcome {
        Ok(count) => {
            let payload = json!({ "feed": feed, "rows": count });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}
