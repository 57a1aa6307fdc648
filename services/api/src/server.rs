use crate::cli::ServeArgs;
use crate::infra::{default_criteria, load_criteria_from_path, seed_default_weights, AppState};
use crate::routes::with_evaluation_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;
use vendorscore::config::AppConfig;
use vendorscore::error::AppError;
use vendorscore::evaluations::{EvaluationService, InMemoryStore, OrganizationId};
use vendorscore::telemetry;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
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
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let criteria = match args.criteria_csv.take() {
        Some(path) => load_criteria_from_path(&path)?,
        None => default_criteria(),
    };
    info!(criteria = criteria.len(), "criteria catalog loaded");

    let store = Arc::new(InMemoryStore::with_criteria(criteria));
    let service = Arc::new(EvaluationService::new(
        store.clone(),
        store,
        config.scoring,
    ));

    if let Some(organization) = args.seed_organization.take() {
        seed_default_weights(&*service, &OrganizationId(organization))?;
    }

    let app = with_evaluation_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "vendorscore service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
