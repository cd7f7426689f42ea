//! Two-sample test statistics.
//!
//! Statistics plug into the engine as plain `Fn(&[f64], &[f64]) -> f64`
//! closures; these are the two families the dispatcher exposes.

/// Difference of sample means: `mean(y) - mean(x)`.
///
/// # Panics
///
/// Panics if either sample is empty. The engine validates emptiness at test
/// construction, so splits reaching this function are always non-empty.
pub fn mean_difference(x: &[f64], y: &[f64]) -> f64 {
    assert!(
        !x.is_empty() && !y.is_empty(),
        "mean_difference needs non-empty samples"
    );
    mean(y) - mean(x)
}

/// Wilcoxon rank-sum statistic: the sum of the second sample.
///
/// Intended for rank-converted samples, where the sum of one sample's
/// midranks carries all the location information; see
/// [`convert_samples_to_ranks`](crate::convert_samples_to_ranks).
pub fn wilcoxon_rank_sum(_x: &[f64], y: &[f64]) -> f64 {
    y.iter().sum()
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}
