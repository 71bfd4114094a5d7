//! Absolute-difference comparison for floating-point results

use std::fmt;

/// True when `|actual - expected| <= delta`.
///
/// NaN on any side never passes.
pub fn within_delta(actual: f64, expected: f64, delta: f64) -> bool {
    (actual - expected).abs() <= delta
}

/// Outcome of comparing a value against an expected value with a tolerance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeltaCheck {
    pub actual: f64,
    pub expected: f64,
    pub delta: f64,
}

impl DeltaCheck {
    pub fn new(actual: f64, expected: f64, delta: f64) -> Self {
        DeltaCheck {
            actual,
            expected,
            delta,
        }
    }

    /// Observed absolute difference
    pub fn difference(&self) -> f64 {
        (self.actual - self.expected).abs()
    }

    pub fn passed(&self) -> bool {
        within_delta(self.actual, self.expected, self.delta)
    }
}

impl fmt::Display for DeltaCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({} == {}) up to {} ({} != {})",
            self.actual, self.expected, self.delta, self.actual, self.expected
        )
    }
}
