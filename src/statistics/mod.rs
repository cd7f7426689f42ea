//! Statistical toolbox for the permutation engine:
//! - Midrank conversion for pooled samples (average-rank-for-ties)
//! - The pluggable two-sample test statistics (mean difference, rank sum)

mod ranks;
mod statistic;

pub use ranks::convert_samples_to_ranks;
pub use statistic::{mean_difference, wilcoxon_rank_sum};
