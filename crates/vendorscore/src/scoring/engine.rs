use std::collections::BTreeMap;

use serde::Serialize;

use super::criteria::{Criterion, CriterionId, RatedCriterion};
use super::policy::StarRating;
use super::round_to_tenth;
use super::rules::tally_blocks;
use super::weights::{normalize_weights, Block, RawWeights};

/// Per-block figures behind the composite total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockBreakdown {
    /// 0-10 normalized block score.
    pub block_score: f64,
    pub raw_weight: f64,
    /// Share of the 0-1 weight space across the blocks present in the evaluation.
    pub normalized_weight: f64,
    /// `block_score * normalized_weight * 10`, on the 0-100 scale.
    pub contribution: f64,
    pub rated: usize,
    pub criteria: usize,
}

/// Output of [`compute_totals`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreTotals {
    pub per_block: BTreeMap<Block, BlockBreakdown>,
    /// Sum of block contributions rounded to one decimal. Not clamped to 0-100.
    pub total: f64,
    /// Derived from the rounded `total`.
    pub stars: StarRating,
}

/// Turns per-criterion ratings into block scores, a weighted total and a star rating.
///
/// Only blocks that have at least one criterion take part in weight normalization. The
/// computation is total over its input: empty criteria or an empty weight map give a total of
/// 0 and one star.
pub fn compute_totals<S>(
    criteria: &[Criterion],
    scores: &BTreeMap<CriterionId, S>,
    raw_weights: &RawWeights,
) -> ScoreTotals
where
    S: RatedCriterion,
{
    let tallies = tally_blocks(criteria, scores);
    let normalized = normalize_weights(tallies.keys().copied(), raw_weights);

    let mut per_block = BTreeMap::new();
    let mut total = 0.0;

    for (block, tally) in tallies {
        let block_score = tally.block_score();
        let normalized_weight = normalized.get(&block).copied().unwrap_or(0.0);
        let contribution = block_score * normalized_weight * 10.0;
        total += contribution;

        per_block.insert(
            block,
            BlockBreakdown {
                block_score,
                raw_weight: raw_weights.get(&block).copied().unwrap_or(0.0),
                normalized_weight,
                contribution,
                rated: tally.rated,
                criteria: tally.criteria,
            },
        );
    }

    let total = round_to_tenth(total);
    ScoreTotals {
        per_block,
        total,
        stars: StarRating::from_total(total),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::Rating;

    #[derive(Clone)]
    struct Entry {
        rating: Option<Rating>,
        points: Option<f64>,
    }

    impl RatedCriterion for Entry {
        fn rating(&self) -> Option<Rating> {
            self.rating
        }

        fn points(&self) -> Option<f64> {
            self.points
        }
    }

    fn criterion(id: &str, block: Block) -> Criterion {
        Criterion {
            id: CriterionId(id.to_string()),
            block,
            label: format!("criterion {id}"),
            points_max: 10.0,
        }
    }

    fn rated(entries: &[(&str, Option<Rating>)]) -> BTreeMap<CriterionId, Entry> {
        entries
            .iter()
            .map(|(id, rating)| {
                (
                    CriterionId(id.to_string()),
                    Entry {
                        rating: *rating,
                        points: None,
                    },
                )
            })
            .collect()
    }

    fn weights(entries: &[(Block, f64)]) -> RawWeights {
        entries.iter().copied().collect()
    }

    #[test]
    fn single_excellent_criterion_scores_full_marks() {
        let criteria = vec![criterion("k1-a", Block::K1)];
        let scores = rated(&[("k1-a", Some(Rating::Uitstekend))]);
        let raw = weights(&[(Block::K1, 20.0), (Block::K2, 0.0)]);

        let totals = compute_totals(&criteria, &scores, &raw);
        let k1 = &totals.per_block[&Block::K1];

        assert_eq!(k1.block_score, 10.0);
        assert_eq!(k1.normalized_weight, 1.0);
        assert_eq!(k1.contribution, 100.0);
        assert_eq!(totals.total, 100.0);
        assert_eq!(totals.stars.get(), 5);
    }

    #[test]
    fn single_moderate_criterion_scores_forty() {
        let criteria = vec![criterion("k1-a", Block::K1)];
        let scores = rated(&[("k1-a", Some(Rating::Matig))]);
        let raw = weights(&[(Block::K1, 20.0)]);

        let totals = compute_totals(&criteria, &scores, &raw);

        assert!((totals.per_block[&Block::K1].block_score - 4.0).abs() < 1e-9);
        assert_eq!(totals.total, 40.0);
        assert_eq!(totals.stars.get(), 2);
    }

    #[test]
    fn unrated_block_keeps_its_weight_share_but_scores_zero() {
        // Pinned policy: unrated criteria are left out of both sum and max, so an untouched
        // block scores 0 while still taking its share of the normalized weight.
        let criteria = vec![criterion("k1-a", Block::K1), criterion("k2-a", Block::K2)];
        let scores = rated(&[("k1-a", Some(Rating::Goed))]);
        let raw = weights(&[(Block::K1, 10.0), (Block::K2, 10.0)]);

        let totals = compute_totals(&criteria, &scores, &raw);

        assert!((totals.per_block[&Block::K1].block_score - 8.0).abs() < 1e-9);
        assert_eq!(totals.per_block[&Block::K2].block_score, 0.0);
        assert!((totals.per_block[&Block::K1].normalized_weight - 0.5).abs() < 1e-12);
        assert!((totals.per_block[&Block::K2].normalized_weight - 0.5).abs() < 1e-12);
        assert_eq!(totals.total, 40.0);
        assert_eq!(totals.stars.get(), 2);
    }

    #[test]
    fn all_zero_weights_give_zero_total() {
        let criteria = vec![criterion("k1-a", Block::K1), criterion("k3-a", Block::K3)];
        let scores = rated(&[
            ("k1-a", Some(Rating::Uitstekend)),
            ("k3-a", Some(Rating::Uitstekend)),
        ]);
        let raw = weights(&[(Block::K1, 0.0), (Block::K3, 0.0)]);

        let totals = compute_totals(&criteria, &scores, &raw);

        assert!(totals
            .per_block
            .values()
            .all(|block| block.normalized_weight == 0.0));
        assert_eq!(totals.total, 0.0);
        assert_eq!(totals.stars.get(), 1);
    }

    #[test]
    fn empty_inputs_give_zero_and_one_star() {
        let scores: BTreeMap<CriterionId, Entry> = BTreeMap::new();
        let totals = compute_totals(&[], &scores, &RawWeights::new());

        assert!(totals.per_block.is_empty());
        assert_eq!(totals.total, 0.0);
        assert_eq!(totals.stars.get(), 1);

        let criteria = vec![criterion("k1-a", Block::K1)];
        let scores = rated(&[("k1-a", Some(Rating::Goed))]);
        let totals = compute_totals(&criteria, &scores, &RawWeights::new());
        assert_eq!(totals.total, 0.0);
        assert_eq!(totals.stars.get(), 1);
    }

    #[test]
    fn blocks_without_criteria_are_left_out_of_normalization() {
        let criteria = vec![criterion("k1-a", Block::K1)];
        let scores = rated(&[("k1-a", Some(Rating::Uitstekend))]);
        // K5 carries weight but has no criteria, so K1 takes the whole weight space.
        let raw = weights(&[(Block::K1, 5.0), (Block::K5, 15.0)]);

        let totals = compute_totals(&criteria, &scores, &raw);

        assert!(!totals.per_block.contains_key(&Block::K5));
        assert_eq!(totals.per_block[&Block::K1].normalized_weight, 1.0);
        assert_eq!(totals.total, 100.0);
    }

    #[test]
    fn total_is_rounded_to_one_decimal() {
        let criteria = vec![
            criterion("k1-a", Block::K1),
            criterion("k2-a", Block::K2),
            criterion("k3-a", Block::K3),
        ];
        let scores = rated(&[
            ("k1-a", Some(Rating::Goed)),
            ("k2-a", Some(Rating::Redelijk)),
            ("k3-a", Some(Rating::Matig)),
        ]);
        let raw = weights(&[(Block::K1, 1.0), (Block::K2, 1.0), (Block::K3, 1.0)]);

        let totals = compute_totals(&criteria, &scores, &raw);

        // (8 + 6 + 4) / 3 * 10 = 60.000...
        assert_eq!(totals.total, 60.0);
        assert_eq!(totals.stars.get(), 3);

        let raw = weights(&[(Block::K1, 2.0), (Block::K2, 1.0), (Block::K3, 0.0)]);
        let totals = compute_totals(&criteria, &scores, &raw);
        // 8 * 2/3 * 10 + 6 * 1/3 * 10 = 73.333...
        assert_eq!(totals.total, 73.3);
        assert_eq!(totals.stars.get(), 3);
    }

    #[test]
    fn stars_follow_the_rounded_total() {
        let criteria = vec![criterion("k1-a", Block::K1), criterion("k1-b", Block::K1)];
        let mut scores = rated(&[
            ("k1-a", Some(Rating::Uitstekend)),
            ("k1-b", Some(Rating::Uitstekend)),
        ]);
        // (4.996 + 10) / 20 of the points -> 74.98 before rounding.
        scores.insert(
            CriterionId("k1-a".into()),
            Entry {
                rating: Some(Rating::Uitstekend),
                points: Some(4.996),
            },
        );
        scores.insert(
            CriterionId("k1-b".into()),
            Entry {
                rating: Some(Rating::Uitstekend),
                points: Some(10.0),
            },
        );
        let raw = weights(&[(Block::K1, 1.0)]);

        let totals = compute_totals(&criteria, &scores, &raw);

        assert_eq!(totals.total, 75.0);
        assert_eq!(totals.stars.get(), 4);
    }

    #[test]
    fn identical_inputs_give_identical_output() {
        let criteria = vec![criterion("k1-a", Block::K1), criterion("k4-a", Block::K4)];
        let scores = rated(&[
            ("k1-a", Some(Rating::Redelijk)),
            ("k4-a", Some(Rating::Goed)),
        ]);
        let raw = weights(&[(Block::K1, 7.0), (Block::K4, 13.0)]);

        let first = compute_totals(&criteria, &scores, &raw);
        let second = compute_totals(&criteria, &scores, &raw);

        assert_eq!(first, second);
    }

    #[test]
    fn overweighted_points_pass_through_unclamped() {
        let criteria = vec![criterion("k1-a", Block::K1)];
        let mut scores = BTreeMap::new();
        scores.insert(
            CriterionId("k1-a".into()),
            Entry {
                rating: Some(Rating::Uitstekend),
                points: Some(15.0),
            },
        );
        let raw = weights(&[(Block::K1, 3.0)]);

        let totals = compute_totals(&criteria, &scores, &raw);

        assert_eq!(totals.total, 150.0);
        assert_eq!(totals.stars.get(), 5);
    }
}
