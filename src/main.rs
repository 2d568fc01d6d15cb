mod infra;

use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json};
use axum_prometheus::PrometheusMetricLayer;
use clap::{Args, Parser, Subcommand};
use serde_json::json;
use std::io::Cursor;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

use scout_referrals::config::AppConfig;
use scout_referrals::error::AppError;
use scout_referrals::telemetry;
use scout_referrals::workflows::referrals::{
    referral_router, ChurnedCandidateRecord, Collection, ReferralRecordView, ReferralService,
    ReferralSubmission, ScoutRecord, TripScenario,
};

use infra::{AppState, MemoryRecordStore, TracingNotifier};

#[derive(Parser, Debug)]
#[command(
    name = "Scout Referrals",
    about = "Run the driver referral program service from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Seed an in-memory store, run the full lifecycle, and print the collections
    Demo,
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => run_server(args).await,
        Command::Demo => run_demo(),
    }
}

async fn run_server(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = Arc::new(MemoryRecordStore::default());
    let notifier = Arc::new(TracingNotifier);
    let service = Arc::new(ReferralService::new(
        store,
        notifier,
        config.program.clone(),
    ));

    let app = referral_router(service)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .layer(prometheus_layer)
        .layer(Extension(state));

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "referral program service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

fn run_demo() -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let store = Arc::new(MemoryRecordStore::default());
    store.seed_scouts(vec![
        ScoutRecord {
            code: "SC-100".to_string(),
            id: "drv-100".to_string(),
            name: "Maya".to_string(),
            email: "maya@example.com".to_string(),
        },
        ScoutRecord {
            code: "SC-200".to_string(),
            id: "drv-200".to_string(),
            name: "Jonas".to_string(),
            email: "jonas@example.com".to_string(),
        },
    ]);
    store.seed_churned_candidates(vec![ChurnedCandidateRecord {
        id: "drv-churn-1".to_string(),
        phone: "5551234567".to_string(),
        email: "former.driver@example.com".to_string(),
    }]);

    let service = ReferralService::new(
        store.clone(),
        Arc::new(TracingNotifier),
        config.program.clone(),
    );

    // First referral is valid, second a duplicate, third unmatched.
    let submissions = [
        ("SC-100", "5551234567", "former.driver@example.com"),
        ("SC-200", "555-123-4567", "former.driver@example.com"),
        ("SC-100", "5550000000", "stranger@example.com"),
    ];
    for (scout_code, phone, email) in submissions {
        let outcome = service.submit(ReferralSubmission {
            scout_code: scout_code.to_string(),
            candidate_phone: phone.to_string(),
            candidate_email: email.to_string(),
        })?;
        println!(
            "submitted via {scout_code}: routed to {} (event {:?})",
            outcome.destination.label(),
            outcome.event
        );
    }

    // Activity feed arrives and the valid referral completes its trips.
    service.sync_activity_feed(Cursor::new(
        "Driver ID,Activity Date\ndrv-churn-1,2026-08-20\n",
    ))?;
    let reconciled = service.reconcile_activity()?;
    println!(
        "reconciled activity: {} matched, {} reactivated",
        reconciled.matched, reconciled.reactivated
    );

    if let Some(valid) = service.collection(Collection::ValidReferrals)?.first() {
        store.set_trip_scenario(valid.id, TripScenario::Completed);
    }
    let notices = service.run_scenario_notices()?;
    let moved = service.sweep_compensation()?;
    println!("scenario notices sent: {notices}; referrals swept to compensation: {moved}");

    for collection in [
        Collection::Referrals,
        Collection::ValidReferrals,
        Collection::NotEligibleReferrals,
        Collection::CompensationDue,
    ] {
        let rows = service.collection(collection)?;
        println!("\n{} ({} rows)", collection.label(), rows.len());
        for row in &rows {
            let view = ReferralRecordView::from_record(&row.record);
            println!(
                "- scout {} -> candidate {} | scout {:?} candidate {:?} rank {} scenario {:?}",
                view.scout_code,
                view.candidate_phone,
                view.scout_eligibility,
                view.candidate_eligibility,
                view.duplicate_rank,
                view.trip_scenario
            );
        }
    }

    Ok(())
}
