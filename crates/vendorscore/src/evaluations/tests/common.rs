use std::collections::BTreeMap;
use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;

use crate::config::ScoringConfig;
use crate::evaluations::domain::{
    Block, Criterion, CriterionId, CriterionScore, Evaluation, EvaluationId, EvaluationRequest,
    OrganizationId, Rating, ScoreEntry, Strategy, Supplier, SupplierId, SupplierRegistration,
    WeightConfig,
};
use crate::evaluations::memory::InMemoryStore;
use crate::evaluations::repository::{EvaluationRepository, RepositoryError, WeightRepository};
use crate::evaluations::{evaluation_router, EvaluationService};
use crate::scoring::RawWeights;

pub(super) type MemoryService = EvaluationService<InMemoryStore, InMemoryStore>;

pub(super) fn organization() -> OrganizationId {
    OrganizationId("org-vendorscore".to_string())
}

fn criterion(id: &str, block: Block, label: &str) -> Criterion {
    Criterion {
        id: CriterionId(id.to_string()),
        block,
        label: label.to_string(),
        points_max: 10.0,
    }
}

pub(super) fn catalog() -> Vec<Criterion> {
    vec![
        criterion("k1-levertijd", Block::K1, "Levertijd"),
        criterion("k1-sla", Block::K1, "SLA-naleving"),
        criterion("k2-prijs", Block::K2, "Prijsniveau"),
        criterion("k3-kwaliteit", Block::K3, "Kwaliteit geleverde diensten"),
    ]
}

pub(super) fn criterion_id(id: &str) -> CriterionId {
    CriterionId(id.to_string())
}

pub(super) fn weights(entries: &[(Block, f64)]) -> RawWeights {
    entries.iter().copied().collect()
}

pub(super) fn registration() -> SupplierRegistration {
    SupplierRegistration {
        organization_id: organization(),
        name: "Noordzee Facilitair B.V.".to_string(),
        kvk_number: Some("1234 5678".to_string()),
        classification: Some("Strategische leverancier".to_string()),
    }
}

pub(super) fn build_service() -> (MemoryService, Arc<InMemoryStore>) {
    let store = Arc::new(InMemoryStore::with_criteria(catalog()));
    let service = EvaluationService::new(store.clone(), store.clone(), ScoringConfig::default());
    (service, store)
}

/// Service with a registered supplier and an open Strategisch evaluation.
pub(super) fn service_with_evaluation() -> (MemoryService, Arc<InMemoryStore>, Evaluation) {
    let (service, store) = build_service();
    let supplier = service
        .register_supplier(registration())
        .expect("supplier registers");
    let evaluation = service
        .create_evaluation(EvaluationRequest {
            organization_id: organization(),
            supplier_id: supplier.id,
            strategy: Strategy::Strategisch,
            title: None,
        })
        .expect("evaluation opens");
    (service, store, evaluation)
}

pub(super) fn entries(ratings: &[(&str, Option<Rating>)]) -> BTreeMap<CriterionId, ScoreEntry> {
    ratings
        .iter()
        .map(|(id, rating)| {
            (
                criterion_id(id),
                ScoreEntry {
                    rating: *rating,
                    ..ScoreEntry::default()
                },
            )
        })
        .collect()
}

pub(super) fn evaluation_router_with_service(service: MemoryService) -> axum::Router {
    evaluation_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

/// Store that refuses every operation, for exercising failure paths.
pub(super) struct UnavailableStore;

impl EvaluationRepository for UnavailableStore {
    fn insert_supplier(&self, _supplier: Supplier) -> Result<Supplier, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch_supplier(&self, _id: &SupplierId) -> Result<Option<Supplier>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn insert_evaluation(&self, _evaluation: Evaluation) -> Result<Evaluation, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch_evaluation(
        &self,
        _id: &EvaluationId,
    ) -> Result<Option<Evaluation>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn criteria(&self) -> Result<Vec<Criterion>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn scores(
        &self,
        _evaluation_id: &EvaluationId,
    ) -> Result<Vec<CriterionScore>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn upsert_scores(
        &self,
        _evaluation_id: &EvaluationId,
        _rows: Vec<CriterionScore>,
    ) -> Result<Vec<CriterionScore>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

impl WeightRepository for UnavailableStore {
    fn weights(
        &self,
        _organization_id: &OrganizationId,
        _strategy: Strategy,
    ) -> Result<Vec<WeightConfig>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn upsert_weights(
        &self,
        _rows: Vec<WeightConfig>,
    ) -> Result<Vec<WeightConfig>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}
