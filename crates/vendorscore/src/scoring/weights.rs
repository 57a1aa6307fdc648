use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::non_negative;

/// Scoring block codes. K5 is optional and only counts when it has criteria.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Block {
    #[default]
    K1,
    K2,
    K3,
    K4,
    K5,
}

impl Block {
    pub const ALL: [Block; 5] = [Block::K1, Block::K2, Block::K3, Block::K4, Block::K5];

    pub fn code(self) -> &'static str {
        match self {
            Block::K1 => "K1",
            Block::K2 => "K2",
            Block::K3 => "K3",
            Block::K4 => "K4",
            Block::K5 => "K5",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Block::K1 => "Afspraken & prestaties",
            Block::K2 => "Kosten & contract",
            Block::K3 => "Kwaliteit & continuïteit",
            Block::K4 => "Relatie & samenwerking",
            Block::K5 => "Innovatie & duurzaamheid",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|block| block.code().eq_ignore_ascii_case(trimmed))
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Raw, unnormalized weights for one (organization, strategy). Missing blocks weigh 0.
pub type RawWeights = BTreeMap<Block, f64>;

/// Normalizes raw weights over the given block set so they sum to 1.
///
/// Blocks outside the set are ignored entirely. When the raw weights of the set sum to 0,
/// every block in the set gets 0.
pub fn normalize_weights<I>(blocks: I, raw: &RawWeights) -> BTreeMap<Block, f64>
where
    I: IntoIterator<Item = Block>,
{
    let present: BTreeMap<Block, f64> = blocks
        .into_iter()
        .map(|block| (block, raw.get(&block).copied().map_or(0.0, non_negative)))
        .collect();

    let total_raw: f64 = present.values().sum();
    if total_raw <= 0.0 {
        return present.into_keys().map(|block| (block, 0.0)).collect();
    }

    present
        .into_iter()
        .map(|(block, weight)| (block, weight / total_raw))
        .collect()
}
