use std::fmt;

use serde::{Deserialize, Serialize};

/// Dutch Chamber of Commerce (KVK) registration number: exactly eight digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct KvkNumber(String);

impl KvkNumber {
    pub const LENGTH: usize = 8;

    /// Strips everything but digits and truncates to eight characters.
    pub fn normalize(input: &str) -> String {
        input
            .chars()
            .filter(char::is_ascii_digit)
            .take(Self::LENGTH)
            .collect()
    }

    /// Normalizes `input` and accepts it only when eight digits remain.
    pub fn parse(input: &str) -> Option<Self> {
        let normalized = Self::normalize(input);
        (normalized.len() == Self::LENGTH).then_some(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for KvkNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for KvkNumber {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("'{value}' is not an 8-digit KVK number"))
    }
}

impl From<KvkNumber> for String {
    fn from(value: KvkNumber) -> Self {
        value.0
    }
}
