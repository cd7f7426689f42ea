//! Sequential-stopping Monte Carlo permutation test.
//!
//! Implements the MCB stopping rule after Kim (2010): after every draw the
//! running positive/tie tally is checked against an upper and a lower
//! boundary derived from the target significance level, and sampling halts
//! the moment a boundary is crossed. For targets of 0.95 or 0.99 the
//! resulting estimate lands within about 0.001 of the true boundary while
//! spending a fraction of the fixed budget on clear-cut inputs.

use crate::error::Result;
use crate::estimator::{Estimator, EstimatorState};
use crate::permutation::MonteCarloTest;
use crate::types::Alternative;

/// Default upper boundary buffer (c1) from Kim (2010).
pub const DEFAULT_UPPER_BUFFER: f64 = 2.241;

/// Default lower boundary buffer (c2), conventionally the negated upper.
pub const DEFAULT_LOWER_BUFFER: f64 = -2.241;

/// Which boundary the running tally has crossed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Crossing {
    /// Tally at or above the upper boundary.
    Upper,
    /// Tally at or below the lower boundary.
    Lower,
    /// Both tails pinned inside the boundaries; reachable only two-sided.
    Inner,
}

/// Configuration of the sequential stopping boundary.
#[derive(Debug, Clone, Copy)]
pub struct StoppingParameters {
    /// Boundary probability. For two-sided tests the caller's significance
    /// level is normalized to `max(p, 1 - p)` at construction, so a target
    /// of 0.05 becomes the upper-tail probability 0.95.
    pub target_p: f64,
    /// Upper boundary buffer (c1 > 0).
    pub upper_buffer: f64,
    /// Lower boundary buffer (c2 < 0).
    pub lower_buffer: f64,
}

impl StoppingParameters {
    /// Build parameters for `alternative` with the default buffers.
    pub fn new(target_p_value: f64, alternative: Alternative) -> Self {
        let target_p = if alternative.is_two_sided() {
            target_p_value.max(1.0 - target_p_value)
        } else {
            target_p_value
        };
        Self {
            target_p,
            upper_buffer: DEFAULT_UPPER_BUFFER,
            lower_buffer: DEFAULT_LOWER_BUFFER,
        }
    }

    /// Upper stopping boundary for probability `p` after `n` of `m` draws.
    ///
    /// `min(ceil(c1 * sqrt(m*p*(1-p)) + n*p), ceil(p * (m+1)))`; a negative
    /// result carries no information and is discarded.
    pub fn upper_bound(&self, p: f64, m: u64, n: u64) -> Option<i64> {
        let spread = self.upper_buffer * (m as f64 * p * (1.0 - p)).sqrt();
        let drift = (spread + n as f64 * p).ceil() as i64;
        let cap = (p * (m as f64 + 1.0)).ceil() as i64;
        let bound = drift.min(cap);
        (bound >= 0).then_some(bound)
    }

    /// Lower stopping boundary for probability `p` after `n` of `m` draws.
    ///
    /// `max(floor(c2 * sqrt(m*p*(1-p)) + n*p), floor(n - (1-p) * (m+1)))`;
    /// a negative result carries no information and is discarded.
    pub fn lower_bound(&self, p: f64, m: u64, n: u64) -> Option<i64> {
        let spread = self.lower_buffer * (m as f64 * p * (1.0 - p)).sqrt();
        let drift = (spread + n as f64 * p).floor() as i64;
        let floor = (n as f64 - (1.0 - p) * (m as f64 + 1.0)).floor() as i64;
        let bound = drift.max(floor);
        (bound >= 0).then_some(bound)
    }

    /// Classify the running tally against the boundaries.
    ///
    /// Two-sided tests split the tail budget across both sides
    /// (`p' = 1 - (1-p)/2`) and compare the dominant and recessive tails;
    /// `Inner` means both tails are pinned strictly inside the boundaries,
    /// so the estimate cannot become significant. One-sided tests compare
    /// the positive count directly.
    pub fn classify(
        &self,
        alternative: Alternative,
        positive: u64,
        ties: u64,
        m: u64,
        n: u64,
    ) -> Option<Crossing> {
        match alternative {
            Alternative::TwoSided => {
                let p = 1.0 - (1.0 - self.target_p) / 2.0;
                let high = (positive + ties).max(n - positive) as i64;
                let low = (positive + ties).min(n - positive) as i64;
                if let Some(upper) = self.upper_bound(p, m, n) {
                    if high >= upper {
                        return Some(Crossing::Upper);
                    }
                }
                if let (Some(lower), Some(far)) =
                    (self.lower_bound(p, m, n), self.upper_bound(1.0 - p, m, n))
                {
                    if high <= lower && low > far {
                        return Some(Crossing::Inner);
                    }
                }
                None
            }
            Alternative::GreaterThan | Alternative::LessThan => {
                let value = positive as i64;
                if let Some(upper) = self.upper_bound(self.target_p, m, n) {
                    if value >= upper {
                        return Some(Crossing::Upper);
                    }
                }
                if let Some(lower) = self.lower_bound(self.target_p, m, n) {
                    if value <= lower {
                        return Some(Crossing::Lower);
                    }
                }
                None
            }
        }
    }
}

/// Monte Carlo permutation test with the MCB sequential stopping rule.
///
/// Wraps a [`MonteCarloTest`] and halts sampling as soon as the running
/// tally crosses a stopping boundary, so clear-cut inputs spend a fraction
/// of the budget. The early exit is data-driven; the finalize formula is
/// unchanged and always safe on a partially sampled state.
pub struct SequentialTest<F> {
    inner: MonteCarloTest<F>,
    params: StoppingParameters,
    crossing: Option<Crossing>,
}

impl<F> SequentialTest<F>
where
    F: Fn(&[f64], &[f64]) -> f64 + Sync,
{
    /// Build a sequential test targeting `target_p_value`.
    ///
    /// Validation matches [`MonteCarloTest::new`]; the two-sided target is
    /// normalized per [`StoppingParameters::new`].
    pub fn new(
        sample_a: &[f64],
        sample_b: &[f64],
        statistic: F,
        alternative: Alternative,
        target_p_value: f64,
        max_samples: u64,
        seed: Option<u64>,
    ) -> Result<Self> {
        let inner = MonteCarloTest::new(
            sample_a,
            sample_b,
            statistic,
            alternative,
            max_samples,
            seed,
        )?;
        Ok(Self {
            inner,
            params: StoppingParameters::new(target_p_value, alternative),
            crossing: None,
        })
    }

    /// Override the boundary buffers.
    pub fn buffers(mut self, upper: f64, lower: f64) -> Self {
        assert!(upper > 0.0, "upper buffer must be positive");
        assert!(lower < 0.0, "lower buffer must be negative");
        self.params.upper_buffer = upper;
        self.params.lower_buffer = lower;
        self
    }

    /// Boundary crossed in the current run, if any.
    pub fn crossing(&self) -> Option<Crossing> {
        self.crossing
    }

    /// Stopping parameters in effect.
    pub fn params(&self) -> &StoppingParameters {
        &self.params
    }
}

impl<F> Estimator for SequentialTest<F>
where
    F: Fn(&[f64], &[f64]) -> f64 + Sync,
{
    fn state(&self) -> &EstimatorState {
        self.inner.state()
    }

    fn state_mut(&mut self) -> &mut EstimatorState {
        self.inner.state_mut()
    }

    fn alternative(&self) -> Alternative {
        self.inner.alternative()
    }

    fn draw(&mut self) -> i8 {
        self.inner.draw()
    }

    // Recomputed after every draw; the first crossing latches until reset,
    // so a crossed run never resumes sampling.
    fn should_stop(&mut self) -> bool {
        if self.crossing.is_none() {
            let state = self.inner.state();
            let (positive, ties, m, n) = (
                state.positive_count(),
                state.tie_count(),
                state.max_samples(),
                state.samples_drawn(),
            );
            self.crossing = self
                .params
                .classify(self.inner.alternative(), positive, ties, m, n);
        }
        self.crossing.is_some()
    }

    fn reset(&mut self) {
        self.crossing = None;
        self.inner.reset();
    }
}
