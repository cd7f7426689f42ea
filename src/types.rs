//! Shared vocabulary types for the permutation engine.

use serde::{Deserialize, Serialize};

/// Direction of the alternative hypothesis under test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Alternative {
    /// Sample B is located above sample A.
    GreaterThan,
    /// Sample B is located below sample A.
    LessThan,
    /// The samples differ in either direction.
    TwoSided,
}

impl Alternative {
    /// Whether this is the two-sided alternative.
    pub fn is_two_sided(self) -> bool {
        matches!(self, Alternative::TwoSided)
    }
}
