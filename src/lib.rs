//! # permutest
//!
//! Distribution-free two-sample hypothesis testing by label permutation.
//!
//! Given two independent numeric samples, the engine decides whether they
//! differ in mean or location by reshuffling group labels and comparing a
//! test statistic against its permutation distribution, without assuming a
//! parametric form. Three strategies share the same indicator and p-value
//! semantics:
//!
//! - **Exact enumeration** of every ordering of the pooled sample, for small
//!   combined sizes (default threshold 7).
//! - **Fixed-budget Monte Carlo** resampling, optionally sharded across
//!   rayon workers.
//! - **Sequential-stopping Monte Carlo** (MCB rule after Kim 2010) that
//!   halts as soon as the running tally crosses a significance boundary.
//!
//! The dispatching entry points pick a strategy from a [`TestConfig`]:
//!
//! ```
//! use permutest::{permutation_mean_test, Alternative, TestConfig};
//!
//! let control = vec![12.6, 11.4, 13.2, 11.2, 9.4, 12.0];
//! let treated = vec![16.4, 14.1, 13.4, 15.4, 14.0, 11.3];
//!
//! let config = TestConfig::default().seed(42);
//! let p = permutation_mean_test(&control, &treated, Alternative::TwoSided, &config).unwrap();
//! assert!((0.0..=1.0).contains(&p));
//! ```
//!
//! For tie-robust location testing, [`permutation_rank_test`] midrank-converts
//! both samples and permutes the Wilcoxon rank-sum statistic instead. The
//! strategies are also usable directly ([`MonteCarloTest`],
//! [`SequentialTest`], [`exact_permutation_test`]) through the
//! [`Estimator`] lifecycle when a caller needs the draw counts or the
//! boundary crossing, not just the p-value.
//!
//! Every test instance owns a seedable `Xoshiro256++` generator; pass a seed
//! through [`TestConfig::seed`] for reproducible estimates. The engine
//! reports a scalar p-value per call; confidence intervals and effect sizes
//! are out of scope.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod config;
mod dispatch;
mod error;
mod estimator;
mod types;

pub mod permutation;
pub mod statistics;

pub use config::TestConfig;
pub use dispatch::{permutation_mean_test, permutation_rank_test, permutation_test};
pub use error::{Error, Result};
pub use estimator::{Estimator, EstimatorState};
pub use permutation::{
    exact_permutation_test, Crossing, MonteCarloTest, SequentialTest, StoppingParameters,
};
pub use statistics::{convert_samples_to_ranks, mean_difference, wilcoxon_rank_sum};
pub use types::Alternative;
