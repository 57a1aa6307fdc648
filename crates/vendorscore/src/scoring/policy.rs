use std::fmt;

use serde::Serialize;

/// 1-5 star rating derived from a composite total. There is no 0-star outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct StarRating(u8);

impl StarRating {
    /// Maps a total onto the star bands; every lower bound is inclusive.
    ///
    /// Totals are not clamped first: anything below 40, including negative or NaN input,
    /// lands in the lowest band and anything at or above 100 gets five stars.
    pub fn from_total(total: f64) -> Self {
        let stars = if total >= 100.0 {
            5
        } else if total >= 75.0 {
            4
        } else if total >= 60.0 {
            3
        } else if total >= 40.0 {
            2
        } else {
            1
        };
        Self(stars)
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl fmt::Display for StarRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}★", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_lower_bounds_are_inclusive() {
        assert_eq!(StarRating::from_total(100.0).get(), 5);
        assert_eq!(StarRating::from_total(99.9).get(), 4);
        assert_eq!(StarRating::from_total(75.0).get(), 4);
        assert_eq!(StarRating::from_total(74.9).get(), 3);
        assert_eq!(StarRating::from_total(60.0).get(), 3);
        assert_eq!(StarRating::from_total(59.9).get(), 2);
        assert_eq!(StarRating::from_total(40.0).get(), 2);
        assert_eq!(StarRating::from_total(39.9).get(), 1);
    }

    #[test]
    fn out_of_range_totals_do_not_panic() {
        assert_eq!(StarRating::from_total(0.0).get(), 1);
        assert_eq!(StarRating::from_total(-12.5).get(), 1);
        assert_eq!(StarRating::from_total(f64::NAN).get(), 1);
        assert_eq!(StarRating::from_total(250.0).get(), 5);
    }

    #[test]
    fn displays_with_star_suffix() {
        assert_eq!(StarRating::from_total(61.0).to_string(), "3★");
    }
}
