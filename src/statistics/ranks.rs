//! Midrank conversion using the average-rank-for-ties convention.
//!
//! Values from both samples are pooled and sorted; a group of `k` equal
//! values starting at running offset `n` receives the 0-based midrank
//! `n + (k - 1) / 2`, the average of the ranks the tied values would occupy
//! if untied. This is the standard convention for rank-based tests
//! (Wilcoxon/Mann-Whitney) in the presence of ties.

/// Convert two samples to midranks over their pooled values.
///
/// Returns one rank sequence per input sample, preserving each sample's
/// original element order. Ties spanning both samples receive the same
/// averaged rank. Empty inputs produce empty outputs.
///
/// # Example
///
/// ```
/// use permutest::convert_samples_to_ranks;
///
/// let (rx, ry) = convert_samples_to_ranks(&[1.0, 4.0, 5.0], &[0.0, 2.0, 3.0]);
/// assert_eq!(rx, vec![1.0, 4.0, 5.0]);
/// assert_eq!(ry, vec![0.0, 2.0, 3.0]);
/// ```
pub fn convert_samples_to_ranks(x: &[f64], y: &[f64]) -> (Vec<f64>, Vec<f64>) {
    // (value, origin, position within origin)
    let mut pooled: Vec<(f64, bool, usize)> = Vec::with_capacity(x.len() + y.len());
    for (i, &value) in x.iter().enumerate() {
        pooled.push((value, false, i));
    }
    for (i, &value) in y.iter().enumerate() {
        pooled.push((value, true, i));
    }
    pooled.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut ranks_x = vec![0.0; x.len()];
    let mut ranks_y = vec![0.0; y.len()];

    let mut offset = 0;
    while offset < pooled.len() {
        let mut end = offset + 1;
        while end < pooled.len() && pooled[end].0 == pooled[offset].0 {
            end += 1;
        }
        let k = end - offset;
        let rank = offset as f64 + (k as f64 - 1.0) / 2.0;
        for &(_, from_y, position) in &pooled[offset..end] {
            if from_y {
                ranks_y[position] = rank;
            } else {
                ranks_x[position] = rank;
            }
        }
        offset = end;
    }

    (ranks_x, ranks_y)
}
