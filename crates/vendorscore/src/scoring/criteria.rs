use std::fmt;

use serde::{Deserialize, Serialize};

use super::rating::Rating;
use super::weights::Block;

/// Identifier wrapper for catalog criteria.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CriterionId(pub String);

impl fmt::Display for CriterionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single scoring item within a block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Criterion {
    pub id: CriterionId,
    #[serde(default)]
    pub block: Block,
    pub label: String,
    pub points_max: f64,
}

/// Anything the engine can read a rating and a point allotment from.
///
/// `points` of `None` means "use the criterion's `points_max`".
pub trait RatedCriterion {
    fn rating(&self) -> Option<Rating>;
    fn points(&self) -> Option<f64>;
}
