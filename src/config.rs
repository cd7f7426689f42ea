//! Configuration for the dispatching entry points.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Configuration for [`permutation_mean_test`](crate::permutation_mean_test)
/// and [`permutation_rank_test`](crate::permutation_rank_test).
///
/// Controls which of the three strategies the dispatcher picks and how much
/// work the Monte Carlo paths are allowed to do.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestConfig {
    /// Significance level the sequential stopping rule targets.
    ///
    /// Only consulted when `use_stopping_rule` is true. Default: 0.05.
    pub target_p_value: f64,

    /// Resampling budget for the Monte Carlo strategies.
    ///
    /// The sequential stopping rule may use far fewer draws; the fixed-budget
    /// strategy always uses exactly this many. Default: 10,000.
    pub iterations: u64,

    /// Stop Monte Carlo sampling early once the running tally crosses a
    /// significance boundary.
    ///
    /// Default: true.
    pub use_stopping_rule: bool,

    /// Largest combined sample size for which the exact test is used.
    ///
    /// When `None`, the exact test is used regardless of size. Beyond the
    /// threshold the factorial enumeration is intractable and the dispatcher
    /// falls back to Monte Carlo. Default: `Some(7)`.
    pub max_exact_n: Option<usize>,

    /// Deterministic seed for the Monte Carlo strategies.
    ///
    /// When set, repeated runs reproduce the same estimate. The exact
    /// strategy has no random source and ignores this. Default: None.
    pub seed: Option<u64>,

    /// Shard fixed-budget draws across rayon workers.
    ///
    /// Only affects the fixed-budget strategy; the sequential stopping rule
    /// is inherently serial, since each bound check decides whether the next
    /// draw happens at all. Default: false.
    pub parallel: bool,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            target_p_value: 0.05,
            iterations: 10_000,
            use_stopping_rule: true,
            max_exact_n: Some(7),
            seed: None,
            parallel: false,
        }
    }
}

impl TestConfig {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the target significance level for the stopping rule.
    pub fn target_p_value(mut self, p: f64) -> Self {
        assert!(p > 0.0 && p < 1.0, "target_p_value must be in (0, 1)");
        self.target_p_value = p;
        self
    }

    /// Set the Monte Carlo resampling budget.
    pub fn iterations(mut self, n: u64) -> Self {
        assert!(n > 0, "iterations must be positive");
        self.iterations = n;
        self
    }

    /// Enable or disable the sequential stopping rule.
    pub fn use_stopping_rule(mut self, on: bool) -> Self {
        self.use_stopping_rule = on;
        self
    }

    /// Set the exact-enumeration threshold, or `None` to always enumerate.
    pub fn max_exact_n(mut self, limit: Option<usize>) -> Self {
        self.max_exact_n = limit;
        self
    }

    /// Set a deterministic seed for the Monte Carlo strategies.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Shard fixed-budget draws across rayon workers.
    pub fn parallel(mut self, on: bool) -> Self {
        self.parallel = on;
        self
    }

    /// Check that the configuration is usable.
    pub fn validate(&self) -> Result<()> {
        if !(self.target_p_value > 0.0 && self.target_p_value < 1.0) {
            return Err(Error::InvalidConfig(
                "target_p_value must be in (0, 1)".to_string(),
            ));
        }
        if self.iterations == 0 {
            return Err(Error::InvalidConfig(
                "iterations must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
