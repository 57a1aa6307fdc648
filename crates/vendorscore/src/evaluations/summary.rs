use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::{Criterion, CriterionId, CriterionScore, Evaluation, ScoreEntry};
use crate::scoring::{compute_totals, RawWeights, ScoreTotals};

/// How many catalog criteria carry a rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EvaluationProgress {
    pub rated: usize,
    pub total: usize,
    /// Rounded whole percentage; 0 when the catalog is empty.
    pub percent: u8,
}

impl EvaluationProgress {
    pub fn from_rows(criteria: &[Criterion], rows: &[CriterionScore]) -> Self {
        let total = criteria.len();
        let rated = criteria
            .iter()
            .filter(|criterion| {
                rows.iter()
                    .any(|row| row.criterion_id == criterion.id && row.rating.is_some())
            })
            .count();
        let percent = if total == 0 {
            0
        } else {
            ((rated as f64 / total as f64) * 100.0).round() as u8
        };

        Self {
            rated,
            total,
            percent,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.rated == self.total
    }
}

/// Everything an evaluation screen shows: the record, its saved rows and computed figures.
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationSummary {
    pub evaluation: Evaluation,
    pub totals: ScoreTotals,
    pub progress: EvaluationProgress,
    pub scores: Vec<CriterionScore>,
}

/// Self-contained scoring input: catalog, entered ratings and the strategy's raw weights.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoringInput {
    pub criteria: Vec<Criterion>,
    #[serde(default)]
    pub scores: BTreeMap<CriterionId, ScoreEntry>,
    #[serde(default)]
    pub weights: RawWeights,
}

impl ScoringInput {
    pub fn compute(&self) -> ScoreTotals {
        compute_totals(&self.criteria, &self.scores, &self.weights)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluations::domain::{Block, CriterionId, EvaluationId, Rating, ScoreEntry};
    use chrono::Utc;

    fn criterion(id: &str) -> Criterion {
        Criterion {
            id: CriterionId(id.to_string()),
            block: Block::K1,
            label: id.to_string(),
            points_max: 10.0,
        }
    }

    #[test]
    fn counts_only_rated_rows_for_catalog_criteria() {
        let criteria = vec![criterion("a"), criterion("b"), criterion("c")];
        let evaluation_id = EvaluationId("eval-1".to_string());
        let rows = vec![
            CriterionScore::from_entry(
                evaluation_id.clone(),
                &criteria[0],
                ScoreEntry::rated(Rating::Goed),
                Utc::now(),
            ),
            CriterionScore::from_entry(
                evaluation_id.clone(),
                &criteria[1],
                ScoreEntry::default(),
                Utc::now(),
            ),
            CriterionScore::from_entry(
                evaluation_id,
                &criterion("retired"),
                ScoreEntry::rated(Rating::Matig),
                Utc::now(),
            ),
        ];

        let progress = EvaluationProgress::from_rows(&criteria, &rows);

        assert_eq!(progress.rated, 1);
        assert_eq!(progress.total, 3);
        assert_eq!(progress.percent, 33);
        assert!(!progress.is_complete());
    }

    #[test]
    fn scoring_input_parses_json_payloads() {
        let input: ScoringInput = serde_json::from_str(
            r#"{
                "criteria": [
                    { "id": "k1-a", "block": "K1", "label": "Levertijd", "points_max": 10 },
                    { "id": "k2-a", "block": "K2", "label": "Prijs", "points_max": 10 }
                ],
                "scores": { "k1-a": { "rating": "Goed" }, "k2-a": { "rating": "" } },
                "weights": { "K1": 10, "K2": 10 }
            }"#,
        )
        .expect("payload parses");

        let totals = input.compute();

        assert_eq!(totals.total, 40.0);
        assert_eq!(totals.stars.get(), 2);
    }

    #[test]
    fn empty_catalog_reports_zero_percent() {
        let progress = EvaluationProgress::from_rows(&[], &[]);
        assert_eq!(progress.percent, 0);
        assert!(!progress.is_complete());
    }
}
