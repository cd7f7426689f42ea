//! Resampling strategies: exact enumeration, fixed-budget Monte Carlo, and
//! the sequential-stopping variant.
//!
//! All three share one indicator: an arrangement of the pooled sample is
//! split at `n1`, the statistic of the split is compared against the observed
//! value, and the signed score feeds the shared tally in
//! [`EstimatorState`](crate::EstimatorState).

mod exact;
mod monte_carlo;
mod sequential;

pub use exact::exact_permutation_test;
pub use monte_carlo::MonteCarloTest;
pub use sequential::{
    Crossing, SequentialTest, StoppingParameters, DEFAULT_LOWER_BUFFER, DEFAULT_UPPER_BUFFER,
};

use crate::types::Alternative;

/// Signed indicator for one arrangement of the pooled sample.
///
/// One-sided alternatives score {0, 1}; the two-sided alternative scores
/// {-1, 0, 1} so the tally can recover both tail fractions.
pub(crate) fn score_arrangement<F>(
    statistic: &F,
    pooled: &[f64],
    n1: usize,
    observed: f64,
    alternative: Alternative,
) -> i8
where
    F: Fn(&[f64], &[f64]) -> f64,
{
    let value = statistic(&pooled[..n1], &pooled[n1..]);
    match alternative {
        Alternative::GreaterThan => i8::from(value <= observed),
        Alternative::LessThan => i8::from(value >= observed),
        Alternative::TwoSided => {
            if value > observed {
                1
            } else if value < observed {
                -1
            } else {
                0
            }
        }
    }
}
