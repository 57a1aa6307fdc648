use super::domain::Strategy;

/// Maps free-form supplier classification text onto a [`Strategy`].
///
/// Accepted (case-insensitive, substring) synonyms:
///
/// | text contains            | strategy    |
/// |--------------------------|-------------|
/// | `strateg`                | Strategisch |
/// | `knelpunt`, `bottleneck` | Knelpunt    |
/// | `hefboom`, `leverage`    | Hefboom     |
/// | `routine`                | Routine     |
///
/// Blank or unrecognized text yields `None`.
pub fn normalize_classification(value: &str) -> Option<Strategy> {
    let lowered = value.trim().to_lowercase();
    if lowered.is_empty() {
        return None;
    }

    const SYNONYMS: [(&str, Strategy); 6] = [
        ("strateg", Strategy::Strategisch),
        ("knelpunt", Strategy::Knelpunt),
        ("bottleneck", Strategy::Knelpunt),
        ("hefboom", Strategy::Hefboom),
        ("leverage", Strategy::Hefboom),
        ("routine", Strategy::Routine),
    ];

    SYNONYMS
        .iter()
        .find(|(needle, _)| lowered.contains(needle))
        .map(|(_, strategy)| *strategy)
}
