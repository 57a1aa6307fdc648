use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use super::domain::{
    Block, Criterion, CriterionId, CriterionScore, Evaluation, EvaluationId, OrganizationId,
    Strategy, Supplier, SupplierId, WeightConfig,
};
use super::repository::{EvaluationRepository, RepositoryError, WeightRepository};

#[derive(Default)]
struct StoreState {
    suppliers: HashMap<SupplierId, Supplier>,
    evaluations: HashMap<EvaluationId, Evaluation>,
    criteria: Vec<Criterion>,
    scores: HashMap<(EvaluationId, CriterionId), CriterionScore>,
    weights: HashMap<(OrganizationId, Strategy, Block), WeightConfig>,
}

/// Process-local store backing both repositories. Every batch is applied under one lock, so a
/// batch either lands completely or not at all.
#[derive(Default, Clone)]
pub struct InMemoryStore {
    state: Arc<Mutex<StoreState>>,
}

impl InMemoryStore {
    pub fn with_criteria(criteria: Vec<Criterion>) -> Self {
        let store = Self::default();
        if let Ok(mut state) = store.state.lock() {
            state.criteria = criteria;
        }
        store
    }

    fn lock(&self) -> Result<MutexGuard<'_, StoreState>, RepositoryError> {
        self.state
            .lock()
            .map_err(|_| RepositoryError::Unavailable("store mutex poisoned".to_string()))
    }
}

impl EvaluationRepository for InMemoryStore {
    fn insert_supplier(&self, supplier: Supplier) -> Result<Supplier, RepositoryError> {
        let mut state = self.lock()?;
        if state.suppliers.contains_key(&supplier.id) {
            return Err(RepositoryError::Conflict);
        }
        state.suppliers.insert(supplier.id.clone(), supplier.clone());
        Ok(supplier)
    }

    fn fetch_supplier(&self, id: &SupplierId) -> Result<Option<Supplier>, RepositoryError> {
        Ok(self.lock()?.suppliers.get(id).cloned())
    }

    fn insert_evaluation(&self, evaluation: Evaluation) -> Result<Evaluation, RepositoryError> {
        let mut state = self.lock()?;
        if state.evaluations.contains_key(&evaluation.id) {
            return Err(RepositoryError::Conflict);
        }
        state
            .evaluations
            .insert(evaluation.id.clone(), evaluation.clone());
        Ok(evaluation)
    }

    fn fetch_evaluation(&self, id: &EvaluationId) -> Result<Option<Evaluation>, RepositoryError> {
        Ok(self.lock()?.evaluations.get(id).cloned())
    }

    fn criteria(&self) -> Result<Vec<Criterion>, RepositoryError> {
        Ok(self.lock()?.criteria.clone())
    }

    fn scores(&self, evaluation_id: &EvaluationId) -> Result<Vec<CriterionScore>, RepositoryError> {
        let state = self.lock()?;
        let mut rows: Vec<CriterionScore> = state
            .scores
            .iter()
            .filter(|((evaluation, _), _)| evaluation == evaluation_id)
            .map(|(_, row)| row.clone())
            .collect();
        rows.sort_by(|left, right| left.criterion_id.cmp(&right.criterion_id));
        Ok(rows)
    }

    fn upsert_scores(
        &self,
        evaluation_id: &EvaluationId,
        rows: Vec<CriterionScore>,
    ) -> Result<Vec<CriterionScore>, RepositoryError> {
        let mut state = self.lock()?;
        if !state.evaluations.contains_key(evaluation_id) {
            return Err(RepositoryError::NotFound);
        }
        if rows.iter().any(|row| &row.evaluation_id != evaluation_id) {
            return Err(RepositoryError::Conflict);
        }

        for row in &rows {
            state.scores.insert(
                (row.evaluation_id.clone(), row.criterion_id.clone()),
                row.clone(),
            );
        }
        Ok(rows)
    }
}

impl WeightRepository for InMemoryStore {
    fn weights(
        &self,
        organization_id: &OrganizationId,
        strategy: Strategy,
    ) -> Result<Vec<WeightConfig>, RepositoryError> {
        let state = self.lock()?;
        let mut rows: Vec<WeightConfig> = state
            .weights
            .values()
            .filter(|row| &row.organization_id == organization_id && row.strategy == strategy)
            .cloned()
            .collect();
        rows.sort_by_key(|row| row.block);
        Ok(rows)
    }

    fn upsert_weights(
        &self,
        rows: Vec<WeightConfig>,
    ) -> Result<Vec<WeightConfig>, RepositoryError> {
        let mut state = self.lock()?;
        for row in &rows {
            state.weights.insert(
                (row.organization_id.clone(), row.strategy, row.block),
                row.clone(),
            );
        }
        Ok(rows)
    }
}
