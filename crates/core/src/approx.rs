//! Continued-fraction approximation of π
//!
//! Evaluates the truncated continued fraction
//!
//! ```text
//!           4
//! π = ─────────────────────
//!     1 +       1²
//!         ─────────────────
//!         3 +     2²
//!             ─────────────
//!             5 +   3²
//!                 ─────────
//!                 7 + ...
//! ```
//!
//! from the innermost term outward. The arithmetic order is fixed: results
//! must match other implementations of the same recurrence bit for bit, so
//! the loop below should not be "simplified".

use thiserror::Error;

/// Value returned for `n == 1`: the one-term truncation `4 / (1 + 1²/1)`.
pub const ONE_TERM_APPROXIMATION: f64 = 2.0;

/// Errors from the approximation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ApproxError {
    /// The iteration count was below 1
    #[error("invalid iteration count {n}: must be at least 1")]
    InvalidArgument { n: i64 },
}

/// Approximate π using `n` terms of the continued fraction.
///
/// `n == 1` yields [`ONE_TERM_APPROXIMATION`]. The result is within 0.01 of
/// π from `n = 5` on, and exact to `f64` precision from roughly `n = 25`.
pub fn compute_pi(n: i64) -> Result<f64, ApproxError> {
    if n < 1 {
        return Err(ApproxError::InvalidArgument { n });
    }

    let nf = n as f64;
    let mut denom = (2.0 * nf - 1.0) + nf * nf;

    // Seeded with the n == 1 base case; overwritten whenever the loop runs.
    let mut frac = 1.0;

    for i in (1..n).rev() {
        let fi = i as f64;
        frac = (fi * fi) / denom;
        denom = (2.0 * fi - 1.0) + frac;
    }

    Ok(4.0 / (1.0 + frac))
}

/// Absolute distance between `compute_pi(n)` and [`std::f64::consts::PI`].
pub fn approximation_error(n: i64) -> Result<f64, ApproxError> {
    compute_pi(n).map(|pi| (pi - std::f64::consts::PI).abs())
}
