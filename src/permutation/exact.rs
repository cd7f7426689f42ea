//! Exact permutation test by full enumeration.

use crate::error::{Error, Result};
use crate::estimator::EstimatorState;
use crate::permutation::score_arrangement;
use crate::types::Alternative;

/// Exact permutation test over every ordering of the pooled sample.
///
/// Enumerates all `(n1+n2)!` orderings with Heap's algorithm and applies the
/// same indicator and finalize formulas as the Monte Carlo strategies. Each
/// distinct split of the pool is visited `n1!*n2!` times, so the split
/// weighting stays uniform and the resulting ratio is exact. No random
/// source is involved: repeated calls return identical values.
///
/// Factorial cost limits this to small combined sizes; the dispatcher gates
/// it behind [`TestConfig::max_exact_n`](crate::TestConfig::max_exact_n).
///
/// # Errors
///
/// Returns [`Error::EmptySampleA`] / [`Error::EmptySampleB`] if a sample is
/// empty.
pub fn exact_permutation_test<F>(
    sample_a: &[f64],
    sample_b: &[f64],
    statistic: F,
    alternative: Alternative,
) -> Result<f64>
where
    F: Fn(&[f64], &[f64]) -> f64,
{
    if sample_a.is_empty() {
        return Err(Error::EmptySampleA);
    }
    if sample_b.is_empty() {
        return Err(Error::EmptySampleB);
    }

    let observed = statistic(sample_a, sample_b);
    let n1 = sample_a.len();
    let mut pooled = [sample_a, sample_b].concat();
    let n = pooled.len();

    let mut state = EstimatorState::new(factorial(n));
    state.record(
        score_arrangement(&statistic, &pooled, n1, observed, alternative),
        alternative,
    );

    // Heap's algorithm, iterative form: each step swaps one pair and yields
    // a new ordering until all n! have been visited.
    let mut counters = vec![0usize; n];
    let mut i = 0;
    while i < n {
        if counters[i] < i {
            if i % 2 == 0 {
                pooled.swap(0, i);
            } else {
                pooled.swap(counters[i], i);
            }
            state.record(
                score_arrangement(&statistic, &pooled, n1, observed, alternative),
                alternative,
            );
            counters[i] += 1;
            i = 0;
        } else {
            counters[i] = 0;
            i += 1;
        }
    }

    state.finalize(alternative);
    // At least one ordering is always tallied, so the estimate is set.
    Ok(state.estimate().unwrap_or(1.0))
}

fn factorial(n: usize) -> u64 {
    (1..=n as u64).fold(1, u64::saturating_mul)
}
