use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;

use super::domain::{
    Block, CriterionId, EvaluationId, EvaluationRequest, OrganizationId, ScoreEntry, Strategy,
    SupplierRegistration,
};
use super::repository::{EvaluationRepository, WeightRepository};
use super::service::{EvaluationService, EvaluationServiceError};
use super::summary::ScoringInput;
use crate::scoring::{normalize_weights, RawWeights};

/// Router builder exposing suppliers, evaluations, weights and scoring previews.
pub fn evaluation_router<R, W>(service: Arc<EvaluationService<R, W>>) -> Router
where
    R: EvaluationRepository + 'static,
    W: WeightRepository + 'static,
{
    Router::new()
        .route("/api/v1/suppliers", post(register_supplier_handler::<R, W>))
        .route("/api/v1/evaluations", post(create_evaluation_handler::<R, W>))
        .route(
            "/api/v1/evaluations/:evaluation_id",
            get(summary_handler::<R, W>),
        )
        .route(
            "/api/v1/evaluations/:evaluation_id/scores",
            post(save_all_handler::<R, W>),
        )
        .route(
            "/api/v1/evaluations/:evaluation_id/scores/:criterion_id",
            put(record_score_handler::<R, W>),
        )
        .route(
            "/api/v1/organizations/:organization_id/weights/:strategy",
            get(weights_handler::<R, W>).put(configure_weights_handler::<R, W>),
        )
        .route("/api/v1/scoring/preview", post(preview_handler))
        .with_state(service)
}

/// Batch of entries keyed by criterion, as sent by the "save all" action.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SaveAllRequest {
    pub scores: BTreeMap<CriterionId, ScoreEntry>,
}

/// Raw weights for every block plus their normalized share across all five blocks.
#[derive(Debug, Clone, Serialize)]
pub struct WeightMatrixView {
    pub organization_id: OrganizationId,
    pub strategy: Strategy,
    pub weights: RawWeights,
    pub normalized: BTreeMap<Block, f64>,
}

impl WeightMatrixView {
    fn new(organization_id: OrganizationId, strategy: Strategy, stored: RawWeights) -> Self {
        let weights: RawWeights = Block::ALL
            .into_iter()
            .map(|block| (block, stored.get(&block).copied().unwrap_or(0.0)))
            .collect();
        let normalized = normalize_weights(Block::ALL, &weights);
        Self {
            organization_id,
            strategy,
            weights,
            normalized,
        }
    }
}

pub(crate) async fn register_supplier_handler<R, W>(
    State(service): State<Arc<EvaluationService<R, W>>>,
    axum::Json(registration): axum::Json<SupplierRegistration>,
) -> Response
where
    R: EvaluationRepository + 'static,
    W: WeightRepository + 'static,
{
    match service.register_supplier(registration) {
        Ok(supplier) => (StatusCode::CREATED, axum::Json(supplier)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn create_evaluation_handler<R, W>(
    State(service): State<Arc<EvaluationService<R, W>>>,
    axum::Json(request): axum::Json<EvaluationRequest>,
) -> Response
where
    R: EvaluationRepository + 'static,
    W: WeightRepository + 'static,
{
    match service.create_evaluation(request) {
        Ok(evaluation) => (StatusCode::CREATED, axum::Json(evaluation)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn summary_handler<R, W>(
    State(service): State<Arc<EvaluationService<R, W>>>,
    Path(evaluation_id): Path<String>,
) -> Response
where
    R: EvaluationRepository + 'static,
    W: WeightRepository + 'static,
{
    match service.summary(&EvaluationId(evaluation_id)) {
        Ok(summary) => (StatusCode::OK, axum::Json(summary)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn record_score_handler<R, W>(
    State(service): State<Arc<EvaluationService<R, W>>>,
    Path((evaluation_id, criterion_id)): Path<(String, String)>,
    axum::Json(entry): axum::Json<ScoreEntry>,
) -> Response
where
    R: EvaluationRepository + 'static,
    W: WeightRepository + 'static,
{
    let evaluation_id = EvaluationId(evaluation_id);
    let criterion_id = CriterionId(criterion_id);
    match service.record_score(&evaluation_id, &criterion_id, entry) {
        Ok(row) => (StatusCode::OK, axum::Json(row)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn save_all_handler<R, W>(
    State(service): State<Arc<EvaluationService<R, W>>>,
    Path(evaluation_id): Path<String>,
    axum::Json(request): axum::Json<SaveAllRequest>,
) -> Response
where
    R: EvaluationRepository + 'static,
    W: WeightRepository + 'static,
{
    match service.save_all(&EvaluationId(evaluation_id), request.scores) {
        Ok(rows) => (StatusCode::OK, axum::Json(json!({ "saved": rows }))).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn weights_handler<R, W>(
    State(service): State<Arc<EvaluationService<R, W>>>,
    Path((organization_id, strategy)): Path<(String, String)>,
) -> Response
where
    R: EvaluationRepository + 'static,
    W: WeightRepository + 'static,
{
    let Some(strategy) = Strategy::parse(&strategy) else {
        return unknown_strategy_response(&strategy);
    };
    let organization_id = OrganizationId(organization_id);
    match service.weights(&organization_id, strategy) {
        Ok(weights) => {
            let view = WeightMatrixView::new(organization_id, strategy, weights);
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn configure_weights_handler<R, W>(
    State(service): State<Arc<EvaluationService<R, W>>>,
    Path((organization_id, strategy)): Path<(String, String)>,
    axum::Json(weights): axum::Json<RawWeights>,
) -> Response
where
    R: EvaluationRepository + 'static,
    W: WeightRepository + 'static,
{
    let Some(strategy) = Strategy::parse(&strategy) else {
        return unknown_strategy_response(&strategy);
    };
    let organization_id = OrganizationId(organization_id);
    match service.configure_weights(&organization_id, strategy, &weights) {
        Ok(saved) => {
            let view = WeightMatrixView::new(organization_id, strategy, saved);
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn preview_handler(axum::Json(input): axum::Json<ScoringInput>) -> Response {
    (StatusCode::OK, axum::Json(input.compute())).into_response()
}

fn unknown_strategy_response(strategy: &str) -> Response {
    let payload = json!({
        "error": format!("unknown strategy '{strategy}'"),
        "expected": Strategy::ALL.map(Strategy::label),
    });
    (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
}

fn error_response(err: EvaluationServiceError) -> Response {
    let status = err.status_code();
    if status.is_server_error() {
        error!(error = %err, "evaluation request failed");
    }
    let payload = json!({
        "error": err.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
