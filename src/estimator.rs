//! Sampling lifecycle shared by every resampling strategy.
//!
//! [`EstimatorState`] is the running tally of a resampling run; the
//! [`Estimator`] trait layers the reset / accumulate / finalize lifecycle on
//! top of it. Strategies supply one hook, [`Estimator::draw`], which produces
//! a random arrangement of the pooled sample and scores it against the
//! observed statistic; everything else is provided.

use crate::types::Alternative;

/// Running tally for one resampling run.
///
/// Counts are interpreted by the finalize formula for the alternative the
/// indicators were built for, so the same tally serves the one-sided and
/// two-sided cases.
#[derive(Debug, Clone)]
pub struct EstimatorState {
    samples_drawn: u64,
    positive_count: u64,
    tie_count: u64,
    max_samples: u64,
    estimate: Option<f64>,
    finalized: bool,
}

impl EstimatorState {
    /// Create an empty tally with the given resampling budget.
    pub fn new(max_samples: u64) -> Self {
        Self {
            samples_drawn: 0,
            positive_count: 0,
            tie_count: 0,
            max_samples,
            estimate: None,
            finalized: false,
        }
    }

    /// Wipe the tally so a fresh run can start.
    pub fn clear(&mut self) {
        self.samples_drawn = 0;
        self.positive_count = 0;
        self.tie_count = 0;
        self.estimate = None;
        self.finalized = false;
    }

    /// Feed one indicator value into the tally.
    ///
    /// Two-sided indicators are in {-1, 0, 1}: positive values feed
    /// `positive_count`, exact ties feed `tie_count`, and negative values
    /// feed neither counter. The asymmetry is required by the min-like
    /// two-tail combination in [`finalize`](Self::finalize): the lower-tail
    /// fraction is recovered as `1 - c` and must not absorb the ties twice.
    /// One-sided indicators are in {0, 1} and add directly to
    /// `positive_count`. Every call advances `samples_drawn`.
    pub fn record(&mut self, indicator: i8, alternative: Alternative) {
        self.samples_drawn += 1;
        match alternative {
            Alternative::TwoSided => {
                if indicator > 0 {
                    self.positive_count += 1;
                } else if indicator == 0 {
                    self.tie_count += 1;
                }
            }
            Alternative::GreaterThan | Alternative::LessThan => {
                debug_assert!(indicator >= 0, "one-sided indicators are 0 or 1");
                self.positive_count += indicator.max(0) as u64;
            }
        }
    }

    /// Merge a batch of counts tallied elsewhere (parallel shards).
    pub(crate) fn record_batch(&mut self, draws: u64, positive: u64, ties: u64) {
        self.samples_drawn += draws;
        self.positive_count += positive;
        self.tie_count += ties;
    }

    /// Freeze the tally into a p-value estimate.
    ///
    /// With zero draws the estimate stays unset. One-sided: the positive
    /// fraction. Two-sided: the classic min-like combination, doubling the
    /// smaller of (upper tail + ties) and (lower tail + ties) = `1 - c`,
    /// clipped to [0, 1]. This matches the exact-test conventions of R and
    /// the reference statistics packages.
    pub fn finalize(&mut self, alternative: Alternative) {
        self.finalized = true;
        if self.samples_drawn == 0 {
            self.estimate = None;
            return;
        }
        let n = self.samples_drawn as f64;
        let c = self.positive_count as f64 / n;
        let estimate = match alternative {
            Alternative::TwoSided => {
                let t = self.tie_count as f64 / n;
                (2.0 * (c + t).min(1.0 - c)).min(1.0)
            }
            Alternative::GreaterThan | Alternative::LessThan => c.min(1.0),
        };
        self.estimate = Some(estimate);
    }

    /// Number of arrangements drawn so far.
    pub fn samples_drawn(&self) -> u64 {
        self.samples_drawn
    }

    /// Count of arrangements scoring a positive indicator.
    pub fn positive_count(&self) -> u64 {
        self.positive_count
    }

    /// Count of arrangements tying the observed statistic (two-sided only).
    pub fn tie_count(&self) -> u64 {
        self.tie_count
    }

    /// Resampling budget for a full run.
    pub fn max_samples(&self) -> u64 {
        self.max_samples
    }

    /// The frozen estimate, if `finalize` has run with at least one draw.
    pub fn estimate(&self) -> Option<f64> {
        self.estimate
    }

    /// Whether `finalize` has run since the last clear.
    pub fn is_finalized(&self) -> bool {
        self.finalized
    }
}

/// Template-method lifecycle for permutation resamplers.
///
/// Implementors supply [`draw`](Self::draw) plus access to their shared
/// [`EstimatorState`]; the provided methods drive the lifecycle. A strategy
/// with a data-driven early exit overrides [`should_stop`](Self::should_stop)
/// (and [`reset`](Self::reset), if it latches anything across draws).
pub trait Estimator {
    /// Shared tally for the current run.
    fn state(&self) -> &EstimatorState;

    /// Mutable access to the shared tally.
    fn state_mut(&mut self) -> &mut EstimatorState;

    /// Alternative hypothesis the indicators are built for.
    fn alternative(&self) -> Alternative;

    /// Produce one random arrangement of the pooled sample and score it.
    ///
    /// Returns 1, 0, or -1; see [`EstimatorState::record`] for how each
    /// value feeds the tally.
    fn draw(&mut self) -> i8;

    /// Whether sampling should halt before the requested draws are spent.
    ///
    /// Consulted once after every recorded draw.
    fn should_stop(&mut self) -> bool {
        false
    }

    /// Clear the accumulated state, keeping the observed statistic.
    fn reset(&mut self) {
        self.state_mut().clear();
    }

    /// Draw up to `n` arrangements, then optionally finalize.
    fn add_samples(&mut self, n: u64, finalize_after: bool) {
        let alternative = self.alternative();
        for _ in 0..n {
            let indicator = self.draw();
            self.state_mut().record(indicator, alternative);
            if self.should_stop() {
                break;
            }
        }
        if finalize_after {
            self.finalize();
        }
    }

    /// Freeze the current tally into an estimate.
    ///
    /// Safe to call on a partially sampled state; with zero draws the
    /// estimate stays unset.
    fn finalize(&mut self) {
        let alternative = self.alternative();
        self.state_mut().finalize(alternative);
    }

    /// The p-value estimate, running a full budgeted pass first if none
    /// exists yet (or unconditionally when `force_recompute` is set).
    fn estimate(&mut self, force_recompute: bool) -> Option<f64> {
        if force_recompute || !self.state().is_finalized() {
            let budget = self.state().max_samples();
            self.reset();
            self.add_samples(budget, false);
            self.finalize();
        }
        self.state().estimate()
    }

    /// Number of arrangements drawn in the current run.
    fn samples_drawn(&self) -> u64 {
        self.state().samples_drawn()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_sided_tally_is_asymmetric() {
        let mut state = EstimatorState::new(100);
        state.record(1, Alternative::TwoSided);
        state.record(0, Alternative::TwoSided);
        state.record(-1, Alternative::TwoSided);
        state.record(-1, Alternative::TwoSided);

        // Negative indicators advance the draw count only.
        assert_eq!(state.samples_drawn(), 4);
        assert_eq!(state.positive_count(), 1);
        assert_eq!(state.tie_count(), 1);
    }

    #[test]
    fn one_sided_finalize_is_positive_fraction() {
        let mut state = EstimatorState::new(4);
        for indicator in [1, 1, 0, 1] {
            state.record(indicator, Alternative::GreaterThan);
        }
        state.finalize(Alternative::GreaterThan);
        assert_eq!(state.estimate(), Some(0.75));
    }

    #[test]
    fn two_sided_finalize_doubles_smaller_tail() {
        // c = 0.25, t = 0.25: min(c + t, 1 - c) = 0.5, doubled to 1.0.
        let mut state = EstimatorState::new(4);
        state.record(1, Alternative::TwoSided);
        state.record(0, Alternative::TwoSided);
        state.record(-1, Alternative::TwoSided);
        state.record(-1, Alternative::TwoSided);
        state.finalize(Alternative::TwoSided);
        assert_eq!(state.estimate(), Some(1.0));

        // c = 0.75, t = 0: min(0.75, 0.25) = 0.25, doubled to 0.5.
        let mut state = EstimatorState::new(4);
        for indicator in [1, 1, 1, -1] {
            state.record(indicator, Alternative::TwoSided);
        }
        state.finalize(Alternative::TwoSided);
        assert_eq!(state.estimate(), Some(0.5));
    }

    #[test]
    fn zero_draw_finalize_leaves_estimate_unset() {
        let mut state = EstimatorState::new(10);
        state.finalize(Alternative::TwoSided);
        assert!(state.is_finalized());
        assert_eq!(state.estimate(), None);
    }

    #[test]
    fn clear_wipes_everything() {
        let mut state = EstimatorState::new(10);
        state.record(1, Alternative::GreaterThan);
        state.finalize(Alternative::GreaterThan);
        state.clear();
        assert_eq!(state.samples_drawn(), 0);
        assert_eq!(state.positive_count(), 0);
        assert_eq!(state.tie_count(), 0);
        assert!(!state.is_finalized());
        assert_eq!(state.estimate(), None);
        assert_eq!(state.max_samples(), 10);
    }
}
