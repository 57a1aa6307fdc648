//! Weighted K1-K5 scoring.
//!
//! Ratings map to factors, rated criteria roll up into 0-10 block scores, and block scores are
//! weighted by the strategy's normalized weights into a 0-100 total with a 1-5 star rating.
//! Everything in here is pure: no I/O, no shared state, identical inputs give identical output.

mod criteria;
mod engine;
mod policy;
mod rating;
mod rules;
mod weights;

pub use criteria::{Criterion, CriterionId, RatedCriterion};
pub use engine::{compute_totals, BlockBreakdown, ScoreTotals};
pub use policy::StarRating;
pub use rating::{factor_for, factor_of, Rating};
pub use weights::{normalize_weights, Block, RawWeights};

pub(crate) use rating::deserialize_optional_rating;

/// Clamps garbage numeric input (negative, NaN, infinite) to zero.
pub(crate) fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Round half away from zero to one decimal place.
pub(crate) fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
