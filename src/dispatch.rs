//! Public entry points and strategy selection.

use crate::config::TestConfig;
use crate::error::Result;
use crate::estimator::Estimator;
use crate::permutation::{exact_permutation_test, MonteCarloTest, SequentialTest};
use crate::statistics::{convert_samples_to_ranks, mean_difference, wilcoxon_rank_sum};
use crate::types::Alternative;

/// Exact permutation test with a caller-supplied statistic.
///
/// Thin alias over [`exact_permutation_test`]; see there for semantics and
/// the factorial cost caveat.
pub fn permutation_test<F>(
    x: &[f64],
    y: &[f64],
    statistic: F,
    alternative: Alternative,
) -> Result<f64>
where
    F: Fn(&[f64], &[f64]) -> f64,
{
    exact_permutation_test(x, y, statistic, alternative)
}

/// Permutation test on the mean-difference statistic.
///
/// Picks the exact test for small combined sizes and Monte Carlo otherwise;
/// see [`TestConfig`] for the thresholds and budgets.
///
/// # Example
///
/// ```
/// use permutest::{permutation_mean_test, Alternative, TestConfig};
///
/// let x = [1.0, 2.0, 3.0, 4.0];
/// let y = [10.0, 11.0, 12.0, 13.0];
/// let config = TestConfig::default().seed(7);
/// let p = permutation_mean_test(&x, &y, Alternative::TwoSided, &config).unwrap();
/// assert!(p < 0.05);
/// ```
pub fn permutation_mean_test(
    x: &[f64],
    y: &[f64],
    alternative: Alternative,
    config: &TestConfig,
) -> Result<f64> {
    config.validate()?;
    dispatch(x, y, mean_difference, alternative, config)
}

/// Permutation test on the Wilcoxon rank-sum statistic.
///
/// Both samples are midrank-converted over their pooled values before
/// dispatch, so cross-sample ties share averaged ranks.
pub fn permutation_rank_test(
    x: &[f64],
    y: &[f64],
    alternative: Alternative,
    config: &TestConfig,
) -> Result<f64> {
    config.validate()?;
    let (ranks_x, ranks_y) = convert_samples_to_ranks(x, y);
    dispatch(&ranks_x, &ranks_y, wilcoxon_rank_sum, alternative, config)
}

fn dispatch<F>(
    x: &[f64],
    y: &[f64],
    statistic: F,
    alternative: Alternative,
    config: &TestConfig,
) -> Result<f64>
where
    F: Fn(&[f64], &[f64]) -> f64 + Sync,
{
    let combined = x.len() + y.len();
    let exact = match config.max_exact_n {
        None => true,
        Some(limit) => combined <= limit,
    };
    if exact {
        return exact_permutation_test(x, y, statistic, alternative);
    }

    // Monte Carlo always tallies at least one draw, so the estimate is set.
    if config.use_stopping_rule {
        let mut test = SequentialTest::new(
            x,
            y,
            statistic,
            alternative,
            config.target_p_value,
            config.iterations,
            config.seed,
        )?;
        Ok(test.estimate(false).unwrap_or(1.0))
    } else {
        let mut test =
            MonteCarloTest::new(x, y, statistic, alternative, config.iterations, config.seed)?;
        let estimate = if config.parallel {
            test.estimate_parallel()
        } else {
            test.estimate(false)
        };
        Ok(estimate.unwrap_or(1.0))
    }
}
