//! Pi Core: approximation of π by a continued-fraction backward recurrence
//!
//! This crate holds the numeric part of compute-pi and nothing else. It has
//! no I/O and no global state; callers pass the iteration count explicitly.
//!
//! # Modules
//!
//! - `approx`: the recurrence itself (`compute_pi`) and its error type
//! - `check`: the absolute-difference comparison used by the test contract
//!
//! ```
//! use pi_core::{compute_pi, within_delta};
//!
//! let pi = compute_pi(1000).unwrap();
//! assert!(within_delta(pi, std::f64::consts::PI, 0.01));
//! ```

pub mod approx;
pub mod check;

pub use approx::{ApproxError, ONE_TERM_APPROXIMATION, approximation_error, compute_pi};
pub use check::{DeltaCheck, within_delta};
