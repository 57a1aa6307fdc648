use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Qualitative judgement for a single criterion, ordered best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Rating {
    Uitstekend,
    Goed,
    Redelijk,
    Matig,
    Slecht,
}

impl Rating {
    pub const ALL: [Rating; 5] = [
        Rating::Uitstekend,
        Rating::Goed,
        Rating::Redelijk,
        Rating::Matig,
        Rating::Slecht,
    ];

    pub fn factor(self) -> f64 {
        match self {
            Rating::Uitstekend => 1.0,
            Rating::Goed => 0.8,
            Rating::Redelijk => 0.6,
            Rating::Matig => 0.4,
            Rating::Slecht => 0.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Rating::Uitstekend => "Uitstekend",
            Rating::Goed => "Goed",
            Rating::Redelijk => "Redelijk",
            Rating::Matig => "Matig",
            Rating::Slecht => "Slecht",
        }
    }

    /// Case-insensitive lookup of a rating label; surrounding whitespace is ignored.
    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|rating| rating.label().eq_ignore_ascii_case(trimmed))
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Rating {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Rating::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown rating '{raw}'")))
    }
}

/// Factor for a raw rating label. Unknown, empty and missing labels score 0.
pub fn factor_of(label: Option<&str>) -> f64 {
    label.and_then(Rating::parse).map_or(0.0, Rating::factor)
}

/// Factor for an optional typed rating; unrated is 0.
pub fn factor_for(rating: Option<Rating>) -> f64 {
    rating.map_or(0.0, Rating::factor)
}

/// Treats a missing or blank rating as unrated instead of rejecting the payload.
pub(crate) fn deserialize_optional_rating<'de, D>(
    deserializer: D,
) -> Result<Option<Rating>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw {
        Some(value) if !value.trim().is_empty() => Rating::parse(&value)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown rating '{value}'"))),
        _ => Ok(None),
    }
}
