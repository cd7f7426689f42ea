//! Errors surfaced at test construction time.
//!
//! Every failure is reported to the caller immediately; the engine never
//! retries. The one advisory condition (a resampling budget under 1000
//! draws) is logged as a warning and does not alter behavior.

/// Errors rejected before any sampling starts.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// Sample A had no observations.
    #[error("sample A is empty; each sample needs at least one observation")]
    EmptySampleA,
    /// Sample B had no observations.
    #[error("sample B is empty; each sample needs at least one observation")]
    EmptySampleB,
    /// The resampling budget was zero.
    #[error("max_samples must be positive")]
    InvalidBudget,
    /// A configuration field failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Convenience alias for engine results.
pub type Result<T> = std::result::Result<T, Error>;
