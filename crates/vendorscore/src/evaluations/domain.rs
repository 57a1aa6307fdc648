use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use crate::scoring::{Block, Criterion, CriterionId, Rating};
use crate::scoring::{deserialize_optional_rating, factor_for, RatedCriterion};

use super::kvk::KvkNumber;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub String);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(
    /// Tenant boundary; every supplier, evaluation and weight row belongs to one.
    OrganizationId
);
string_id!(SupplierId);
string_id!(EvaluationId);

/// Kraljic portfolio category assigned to an evaluation; selects the weight set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Strategy {
    Strategisch,
    Knelpunt,
    Hefboom,
    Routine,
}

impl Strategy {
    pub const ALL: [Strategy; 4] = [
        Strategy::Strategisch,
        Strategy::Knelpunt,
        Strategy::Hefboom,
        Strategy::Routine,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Strategy::Strategisch => "Strategisch",
            Strategy::Knelpunt => "Knelpunt",
            Strategy::Hefboom => "Hefboom",
            Strategy::Routine => "Routine",
        }
    }

    /// Exact (case-insensitive) label match. Free-form classification text goes through
    /// [`super::normalize_classification`] instead.
    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.label().eq_ignore_ascii_case(trimmed))
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Registered supplier within an organization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Supplier {
    pub id: SupplierId,
    pub organization_id: OrganizationId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kvk_number: Option<KvkNumber>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classification: Option<Strategy>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Registration payload; `classification` accepts free-form text such as
/// "Strategische leverancier".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierRegistration {
    pub organization_id: OrganizationId,
    pub name: String,
    #[serde(default)]
    pub kvk_number: Option<String>,
    #[serde(default)]
    pub classification: Option<String>,
}

/// A supplier evaluation bound to one strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub id: EvaluationId,
    pub organization_id: OrganizationId,
    pub supplier_id: SupplierId,
    pub strategy: Strategy,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationRequest {
    pub organization_id: OrganizationId,
    pub supplier_id: SupplierId,
    pub strategy: Strategy,
    #[serde(default)]
    pub title: Option<String>,
}

/// Evaluator input for one criterion. A blank or missing rating means "not yet rated".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreEntry {
    #[serde(default, deserialize_with = "deserialize_optional_rating")]
    pub rating: Option<Rating>,
    #[serde(default)]
    pub points: Option<f64>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub motivation: Option<String>,
}

impl ScoreEntry {
    pub fn rated(rating: Rating) -> Self {
        Self {
            rating: Some(rating),
            ..Self::default()
        }
    }
}

impl RatedCriterion for ScoreEntry {
    fn rating(&self) -> Option<Rating> {
        self.rating
    }

    fn points(&self) -> Option<f64> {
        self.points
    }
}

/// Persisted score row, unique per (evaluation, criterion).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionScore {
    pub evaluation_id: EvaluationId,
    pub criterion_id: CriterionId,
    pub rating: Option<Rating>,
    pub points: f64,
    pub factor: f64,
    pub score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub motivation: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl CriterionScore {
    /// Builds the row for `criterion`, deriving `factor` and `score` from the entry.
    /// Points default to the criterion's `points_max`; blank annotations are dropped.
    pub fn from_entry(
        evaluation_id: EvaluationId,
        criterion: &Criterion,
        entry: ScoreEntry,
        updated_at: DateTime<Utc>,
    ) -> Self {
        let points = entry.points.unwrap_or(criterion.points_max);
        let factor = factor_for(entry.rating);

        Self {
            evaluation_id,
            criterion_id: criterion.id.clone(),
            rating: entry.rating,
            points,
            factor,
            score: points * factor,
            source: non_blank(entry.source),
            motivation: non_blank(entry.motivation),
            updated_at,
        }
    }
}

impl RatedCriterion for CriterionScore {
    fn rating(&self) -> Option<Rating> {
        self.rating
    }

    fn points(&self) -> Option<f64> {
        Some(self.points)
    }
}

/// One raw weight per (organization, strategy, block).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightConfig {
    pub organization_id: OrganizationId,
    pub strategy: Strategy,
    pub block: Block,
    pub weight: f64,
    pub updated_at: DateTime<Utc>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}
