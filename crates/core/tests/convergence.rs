//! Convergence properties of the continued-fraction recurrence
//!
//! These sweep ranges of iteration counts rather than single values, to
//! catch changes to the evaluation order that unit tests could miss.

use pi_core::{approximation_error, compute_pi, within_delta};
use std::f64::consts::PI;

#[test]
fn test_within_tolerance_from_five_terms() {
    for n in 5..=2000 {
        let pi = compute_pi(n).unwrap();
        assert!(within_delta(pi, PI, 0.01), "n={} gave {}", n, pi);
    }
}

#[test]
fn test_outside_tolerance_below_five_terms() {
    for n in 1..5 {
        let pi = compute_pi(n).unwrap();
        assert!(!within_delta(pi, PI, 0.01), "n={} gave {}", n, pi);
    }
}

#[test]
fn test_error_non_increasing() {
    let mut previous = approximation_error(1).unwrap();
    for n in 2..=500 {
        let error = approximation_error(n).unwrap();
        assert!(
            error <= previous,
            "error grew from {} to {} at n={}",
            previous,
            error,
            n
        );
        previous = error;
    }
}

#[test]
fn test_alternates_around_pi() {
    // Successive truncations of the fraction bracket the limit
    assert!(compute_pi(2).unwrap() > PI);
    assert!(compute_pi(3).unwrap() < PI);
    assert!(compute_pi(4).unwrap() > PI);
    assert!(compute_pi(5).unwrap() < PI);
}

#[test]
fn test_large_iteration_count_is_finite() {
    let pi = compute_pi(1_000_000).unwrap();
    assert!(pi.is_finite());
    assert!((pi - PI).abs() < 1e-12);
}
