use std::collections::HashSet;
use std::io::Read;

use serde::{Deserialize, Deserializer};

use super::domain::{Block, Criterion, CriterionId};

/// Failure while loading a criteria catalog. Line numbers count the header as line 1.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read criteria catalog: {0}")]
    Csv(#[from] csv::Error),
    #[error("line {line}: criterion id must not be empty")]
    MissingId { line: usize },
    #[error("line {line}: duplicate criterion id '{id}'")]
    DuplicateId { line: usize, id: String },
    #[error("line {line}: unknown block '{value}' (expected K1-K5)")]
    UnknownBlock { line: usize, value: String },
    #[error("line {line}: points_max must be a positive number, got {value}")]
    InvalidPointsMax { line: usize, value: f64 },
}

#[derive(Debug, Deserialize)]
struct CatalogRow {
    id: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    block: Option<String>,
    label: String,
    points_max: f64,
}

/// Reads criteria from CSV with the header `id,block,label,points_max`.
///
/// A blank block falls back to K1.
pub fn load_criteria<R: Read>(reader: R) -> Result<Vec<Criterion>, CatalogError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut criteria = Vec::new();
    let mut seen = HashSet::new();

    for (index, record) in csv_reader.deserialize::<CatalogRow>().enumerate() {
        let line = index + 2;
        let row = record?;

        if row.id.is_empty() {
            return Err(CatalogError::MissingId { line });
        }
        if !seen.insert(row.id.clone()) {
            return Err(CatalogError::DuplicateId { line, id: row.id });
        }

        let block = match row.block {
            Some(code) => {
                Block::parse(&code).ok_or(CatalogError::UnknownBlock { line, value: code })?
            }
            None => Block::default(),
        };

        if !(row.points_max.is_finite() && row.points_max > 0.0) {
            return Err(CatalogError::InvalidPointsMax {
                line,
                value: row.points_max,
            });
        }

        criteria.push(Criterion {
            id: CriterionId(row.id),
            block,
            label: row.label,
            points_max: row.points_max,
        });
    }

    criteria.sort_by(|left, right| {
        left.block
            .cmp(&right.block)
            .then_with(|| left.label.cmp(&right.label))
    });
    Ok(criteria)
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
