use std::collections::BTreeMap;

use super::criteria::{Criterion, CriterionId, RatedCriterion};
use super::non_negative;
use super::weights::Block;

/// Running totals for one block. Only rated criteria feed `sum` and `max`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct BlockTally {
    pub sum: f64,
    pub max: f64,
    pub rated: usize,
    pub criteria: usize,
}

impl BlockTally {
    /// 0-10 block score; a block with nothing rated scores 0.
    pub fn block_score(&self) -> f64 {
        if self.max > 0.0 {
            (self.sum / self.max) * 10.0
        } else {
            0.0
        }
    }
}

/// Groups criteria by block and sums the scores of the rated ones.
///
/// Unrated criteria still register their block (so it joins the weight normalization set) but
/// add nothing to `sum` or `max`. Score entries for criteria outside the list are ignored.
pub(crate) fn tally_blocks<S>(
    criteria: &[Criterion],
    scores: &BTreeMap<CriterionId, S>,
) -> BTreeMap<Block, BlockTally>
where
    S: RatedCriterion,
{
    let mut tallies: BTreeMap<Block, BlockTally> = BTreeMap::new();

    for criterion in criteria {
        let tally = tallies.entry(criterion.block).or_default();
        tally.criteria += 1;

        let Some(entry) = scores.get(&criterion.id) else {
            continue;
        };
        let Some(rating) = entry.rating() else {
            continue;
        };

        let points_max = non_negative(criterion.points_max);
        let points = entry.points().map_or(points_max, non_negative);

        tally.sum += points * rating.factor();
        tally.max += points_max;
        tally.rated += 1;
    }

    tallies
}
