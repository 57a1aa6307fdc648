use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::http::StatusCode;
use chrono::Utc;
use tracing::{debug, info, warn};

use super::classification::normalize_classification;
use super::domain::{
    Block, Criterion, CriterionId, CriterionScore, Evaluation, EvaluationId, EvaluationRequest,
    OrganizationId, ScoreEntry, Strategy, Supplier, SupplierId, SupplierRegistration,
    WeightConfig,
};
use super::kvk::KvkNumber;
use super::repository::{raw_weights, EvaluationRepository, RepositoryError, WeightRepository};
use super::summary::{EvaluationProgress, EvaluationSummary};
use crate::config::ScoringConfig;
use crate::scoring::{compute_totals, RawWeights};

/// Service composing the evaluation store, the weight store and the scoring engine.
///
/// Holds no global state: every collaborator is passed in at construction.
pub struct EvaluationService<R, W> {
    repository: Arc<R>,
    weights: Arc<W>,
    config: ScoringConfig,
    sequence: AtomicU64,
}

impl<R, W> EvaluationService<R, W>
where
    R: EvaluationRepository + 'static,
    W: WeightRepository + 'static,
{
    pub fn new(repository: Arc<R>, weights: Arc<W>, config: ScoringConfig) -> Self {
        Self {
            repository,
            weights,
            config,
            sequence: AtomicU64::new(1),
        }
    }

    fn next_id(&self, prefix: &str) -> String {
        let id = self.sequence.fetch_add(1, Ordering::Relaxed);
        format!("{prefix}-{id:06}")
    }

    /// Register a supplier. KVK numbers are normalized to digits and must be eight long;
    /// classification text is mapped onto a strategy when it is recognizable.
    pub fn register_supplier(
        &self,
        registration: SupplierRegistration,
    ) -> Result<Supplier, EvaluationServiceError> {
        let name = registration.name.trim().to_string();
        if name.is_empty() {
            return Err(EvaluationServiceError::MissingSupplierName);
        }

        let kvk_number = match registration.kvk_number.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => Some(
                KvkNumber::parse(raw)
                    .ok_or_else(|| EvaluationServiceError::InvalidKvk(raw.to_string()))?,
            ),
            _ => None,
        };

        let classification = registration
            .classification
            .as_deref()
            .and_then(|raw| {
                let strategy = normalize_classification(raw);
                if strategy.is_none() && !raw.trim().is_empty() {
                    warn!(classification = raw, "ignoring unrecognized supplier classification");
                }
                strategy
            });

        let supplier = Supplier {
            id: SupplierId(self.next_id("sup")),
            organization_id: registration.organization_id,
            name,
            kvk_number,
            classification,
            is_active: true,
            created_at: Utc::now(),
        };

        let stored = self.repository.insert_supplier(supplier)?;
        info!(supplier = %stored.id, organization = %stored.organization_id, "supplier registered");
        Ok(stored)
    }

    /// Open a new evaluation for an active supplier of the same organization.
    pub fn create_evaluation(
        &self,
        request: EvaluationRequest,
    ) -> Result<Evaluation, EvaluationServiceError> {
        let supplier = self
            .repository
            .fetch_supplier(&request.supplier_id)?
            .filter(|supplier| supplier.organization_id == request.organization_id)
            .ok_or_else(|| EvaluationServiceError::SupplierNotFound(request.supplier_id.clone()))?;

        if !supplier.is_active {
            return Err(EvaluationServiceError::InactiveSupplier(supplier.id));
        }

        let title = request
            .title
            .map(|title| title.trim().to_string())
            .filter(|title| !title.is_empty())
            .unwrap_or_else(|| format!("Beoordeling – {}", supplier.name));

        let evaluation = Evaluation {
            id: EvaluationId(self.next_id("eval")),
            organization_id: request.organization_id,
            supplier_id: supplier.id,
            strategy: request.strategy,
            title,
            created_at: Utc::now(),
        };

        let stored = self.repository.insert_evaluation(evaluation)?;
        info!(evaluation = %stored.id, strategy = %stored.strategy, "evaluation created");
        Ok(stored)
    }

    pub fn evaluation(
        &self,
        evaluation_id: &EvaluationId,
    ) -> Result<Evaluation, EvaluationServiceError> {
        self.repository
            .fetch_evaluation(evaluation_id)?
            .ok_or_else(|| EvaluationServiceError::EvaluationNotFound(evaluation_id.clone()))
    }

    /// Save one criterion. An entry without a rating is still stored (annotations survive) but
    /// counts as unrated in every total.
    pub fn record_score(
        &self,
        evaluation_id: &EvaluationId,
        criterion_id: &CriterionId,
        entry: ScoreEntry,
    ) -> Result<CriterionScore, EvaluationServiceError> {
        let evaluation = self.evaluation(evaluation_id)?;
        let catalog = self.catalog()?;
        let criterion = catalog
            .get(criterion_id)
            .ok_or_else(|| EvaluationServiceError::UnknownCriterion(criterion_id.clone()))?;
        validate_points(criterion_id, &entry)?;

        let row = CriterionScore::from_entry(evaluation.id.clone(), criterion, entry, Utc::now());
        let mut saved = self.repository.upsert_scores(&evaluation.id, vec![row])?;
        let row = saved.pop().ok_or(RepositoryError::NotFound)?;

        debug!(
            evaluation = %evaluation.id,
            criterion = %row.criterion_id,
            score = row.score,
            "criterion score saved"
        );
        Ok(row)
    }

    /// Save every rated entry in one batch. Unrated entries are skipped, never zeroed; a batch
    /// with nothing rated is rejected with [`EvaluationServiceError::NothingToSave`].
    pub fn save_all(
        &self,
        evaluation_id: &EvaluationId,
        entries: BTreeMap<CriterionId, ScoreEntry>,
    ) -> Result<Vec<CriterionScore>, EvaluationServiceError> {
        let evaluation = self.evaluation(evaluation_id)?;
        let catalog = self.catalog()?;
        let now = Utc::now();

        let mut rows = Vec::new();
        for (criterion_id, entry) in entries {
            if entry.rating.is_none() {
                continue;
            }
            let criterion = catalog
                .get(&criterion_id)
                .ok_or_else(|| EvaluationServiceError::UnknownCriterion(criterion_id.clone()))?;
            validate_points(&criterion_id, &entry)?;
            rows.push(CriterionScore::from_entry(
                evaluation.id.clone(),
                criterion,
                entry,
                now,
            ));
        }

        if rows.is_empty() {
            return Err(EvaluationServiceError::NothingToSave);
        }

        let saved = self.repository.upsert_scores(&evaluation.id, rows)?;
        info!(evaluation = %evaluation.id, saved = saved.len(), "criterion scores saved");
        Ok(saved)
    }

    /// Load a consistent snapshot of criteria, rows and weights and run the scoring engine.
    pub fn summary(
        &self,
        evaluation_id: &EvaluationId,
    ) -> Result<EvaluationSummary, EvaluationServiceError> {
        let evaluation = self.evaluation(evaluation_id)?;
        let criteria = self.repository.criteria()?;
        let rows = self.repository.scores(&evaluation.id)?;
        let weights = self
            .weights
            .weights(&evaluation.organization_id, evaluation.strategy)?;

        let by_criterion: BTreeMap<CriterionId, CriterionScore> = rows
            .iter()
            .map(|row| (row.criterion_id.clone(), row.clone()))
            .collect();
        let totals = compute_totals(&criteria, &by_criterion, &raw_weights(&weights));
        let progress = EvaluationProgress::from_rows(&criteria, &rows);

        debug!(
            evaluation = %evaluation.id,
            total = totals.total,
            stars = totals.stars.get(),
            "evaluation totals computed"
        );

        Ok(EvaluationSummary {
            evaluation,
            totals,
            progress,
            scores: rows,
        })
    }

    /// Raw weights for one strategy; blocks without a stored row are absent.
    pub fn weights(
        &self,
        organization_id: &OrganizationId,
        strategy: Strategy,
    ) -> Result<RawWeights, EvaluationServiceError> {
        let rows = self.weights.weights(organization_id, strategy)?;
        Ok(raw_weights(&rows))
    }

    /// Store one row per block for the strategy; blocks missing from `weights` are written as 0.
    pub fn configure_weights(
        &self,
        organization_id: &OrganizationId,
        strategy: Strategy,
        weights: &RawWeights,
    ) -> Result<RawWeights, EvaluationServiceError> {
        let max = self.config.max_raw_weight;
        let now = Utc::now();

        let mut rows = Vec::with_capacity(Block::ALL.len());
        for block in Block::ALL {
            let weight = weights.get(&block).copied().unwrap_or(0.0);
            if !(weight.is_finite() && (0.0..=max).contains(&weight)) {
                return Err(EvaluationServiceError::WeightOutOfRange { block, weight, max });
            }
            rows.push(WeightConfig {
                organization_id: organization_id.clone(),
                strategy,
                block,
                weight,
                updated_at: now,
            });
        }

        let saved = self.weights.upsert_weights(rows)?;
        info!(organization = %organization_id, %strategy, "weight configuration saved");
        Ok(raw_weights(&saved))
    }

    fn catalog(&self) -> Result<HashMap<CriterionId, Criterion>, EvaluationServiceError> {
        Ok(self
            .repository
            .criteria()?
            .into_iter()
            .map(|criterion| (criterion.id.clone(), criterion))
            .collect())
    }
}

fn validate_points(
    criterion_id: &CriterionId,
    entry: &ScoreEntry,
) -> Result<(), EvaluationServiceError> {
    match entry.points {
        Some(points) if !(points.is_finite() && points >= 0.0) => {
            Err(EvaluationServiceError::InvalidPoints {
                criterion: criterion_id.clone(),
            })
        }
        _ => Ok(()),
    }
}

/// Error raised by the evaluation service.
#[derive(Debug, thiserror::Error)]
pub enum EvaluationServiceError {
    #[error("supplier name must not be empty")]
    MissingSupplierName,
    #[error("KVK number must contain exactly 8 digits, got '{0}'")]
    InvalidKvk(String),
    #[error("supplier {0} not found")]
    SupplierNotFound(SupplierId),
    #[error("supplier {0} is inactive")]
    InactiveSupplier(SupplierId),
    #[error("evaluation {0} not found")]
    EvaluationNotFound(EvaluationId),
    #[error("criterion {0} is not part of the catalog")]
    UnknownCriterion(CriterionId),
    #[error("points for criterion {criterion} must be a non-negative number")]
    InvalidPoints { criterion: CriterionId },
    #[error("no ratings entered to save")]
    NothingToSave,
    #[error("weight {weight} for {block} is outside the allowed range 0-{max}")]
    WeightOutOfRange { block: Block, weight: f64, max: f64 },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl EvaluationServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            EvaluationServiceError::SupplierNotFound(_)
            | EvaluationServiceError::EvaluationNotFound(_)
            | EvaluationServiceError::Repository(RepositoryError::NotFound) => {
                StatusCode::NOT_FOUND
            }
            EvaluationServiceError::MissingSupplierName
            | EvaluationServiceError::InvalidKvk(_)
            | EvaluationServiceError::InactiveSupplier(_)
            | EvaluationServiceError::UnknownCriterion(_)
            | EvaluationServiceError::InvalidPoints { .. }
            | EvaluationServiceError::NothingToSave
            | EvaluationServiceError::WeightOutOfRange { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            EvaluationServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
            EvaluationServiceError::Repository(RepositoryError::Unavailable(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}
