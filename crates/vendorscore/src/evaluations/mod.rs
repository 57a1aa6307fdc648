//! Supplier evaluations: suppliers, strategy-bound evaluations, per-criterion score rows,
//! the weight configuration store and the HTTP surface over them.
//!
//! Persistence sits behind [`EvaluationRepository`] and [`WeightRepository`]; the service
//! loads a snapshot, hands it to [`crate::scoring::compute_totals`] and returns the figures.

pub mod catalog;
mod classification;
pub mod domain;
mod kvk;
pub mod memory;
pub mod repository;
pub mod router;
pub mod service;
mod summary;

#[cfg(test)]
mod tests;

pub use catalog::{load_criteria, CatalogError};
pub use classification::normalize_classification;
pub use domain::{
    Block, Criterion, CriterionId, CriterionScore, Evaluation, EvaluationId, EvaluationRequest,
    OrganizationId, Rating, ScoreEntry, Strategy, Supplier, SupplierId, SupplierRegistration,
    WeightConfig,
};
pub use kvk::KvkNumber;
pub use memory::InMemoryStore;
pub use repository::{raw_weights, EvaluationRepository, RepositoryError, WeightRepository};
pub use router::{evaluation_router, SaveAllRequest, WeightMatrixView};
pub use service::{EvaluationService, EvaluationServiceError};
pub use summary::{EvaluationProgress, EvaluationSummary, ScoringInput};
