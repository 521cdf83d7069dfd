//! Rating aggregation: the mean and count cached on every store.
//!
//! The cache is always rebuilt from a full scan of the store's ratings, never
//! adjusted incrementally, so concurrent writers converge on the value of
//! whichever recompute finishes last.

use store_ratings_sdk::RatingValue;

/// Aggregate fields of a store.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aggregate {
    /// Mean rounded half up to one decimal; `0.0` when there are no ratings.
    pub average_rating: f64,
    pub total_ratings: u32,
}

impl Aggregate {
    pub const EMPTY: Self = Self {
        average_rating: 0.0,
        total_ratings: 0,
    };
}

/// Compute the aggregate of a set of ratings.
///
/// Rounding is half up at one decimal and is done on integer tenths,
/// so `[5, 5, 4, 3]` (mean 4.25) yields `4.3`.
#[must_use]
pub fn compute_aggregate(values: &[RatingValue]) -> Aggregate {
    let count = u64::try_from(values.len()).unwrap_or(u64::MAX);
    let sum: u64 = values.iter().map(|v| u64::from(v.get())).sum();

    // tenths = round_half_up(10 * sum / count) = (20 * sum + count) / (2 * count)
    let Some(tenths) = (20 * sum + count).checked_div(2 * count) else {
        return Aggregate::EMPTY;
    };

    // The mean of values in 1..=5 is at most 50 tenths.
    let tenths = u32::try_from(tenths).unwrap_or(50);

    Aggregate {
        average_rating: f64::from(tenths) / 10.0,
        total_ratings: u32::try_from(count).unwrap_or(u32::MAX),
    }
}
