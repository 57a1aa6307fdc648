use super::domain::{
    Criterion, CriterionScore, Evaluation, EvaluationId, OrganizationId, Strategy, Supplier,
    SupplierId, WeightConfig,
};
use crate::scoring::RawWeights;

/// Storage for suppliers, evaluations, the criteria catalog and score rows.
///
/// `upsert_scores` is keyed by (evaluation, criterion): re-saving a criterion overwrites its
/// row. Implementations should apply a batch as a whole; callers reload persisted state after
/// any batch error before trusting in-memory figures again.
pub trait EvaluationRepository: Send + Sync {
    fn insert_supplier(&self, supplier: Supplier) -> Result<Supplier, RepositoryError>;
    fn fetch_supplier(&self, id: &SupplierId) -> Result<Option<Supplier>, RepositoryError>;
    fn insert_evaluation(&self, evaluation: Evaluation) -> Result<Evaluation, RepositoryError>;
    fn fetch_evaluation(&self, id: &EvaluationId) -> Result<Option<Evaluation>, RepositoryError>;
    fn criteria(&self) -> Result<Vec<Criterion>, RepositoryError>;
    fn scores(&self, evaluation_id: &EvaluationId) -> Result<Vec<CriterionScore>, RepositoryError>;
    fn upsert_scores(
        &self,
        evaluation_id: &EvaluationId,
        rows: Vec<CriterionScore>,
    ) -> Result<Vec<CriterionScore>, RepositoryError>;
}

/// Raw weight rows keyed by (organization, strategy, block); last write wins.
pub trait WeightRepository: Send + Sync {
    fn weights(
        &self,
        organization_id: &OrganizationId,
        strategy: Strategy,
    ) -> Result<Vec<WeightConfig>, RepositoryError>;
    fn upsert_weights(&self, rows: Vec<WeightConfig>)
        -> Result<Vec<WeightConfig>, RepositoryError>;
}

/// Collapses weight rows into the block map the scoring engine consumes.
pub fn raw_weights(rows: &[WeightConfig]) -> RawWeights {
    rows.iter().map(|row| (row.block, row.weight)).collect()
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
