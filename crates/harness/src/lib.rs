//! compute-pi harness library
//!
//! The host program and the in-process test runner for the continued-fraction
//! approximation in [`pi_core`]. Both take their iteration count from a
//! [`HarnessConfig`] passed in by the caller.
//!
//! ```rust
//! use compute_pi::{HarnessConfig, TestRunner, all_suites};
//!
//! let config = HarnessConfig::default_config().unwrap();
//! let runner = TestRunner::new(false, None, config);
//! let summary = runner.run(&all_suites());
//! assert!(summary.success());
//! ```

pub mod config;
pub mod report;
pub mod runner;
pub mod suite;

pub use config::{HarnessConfig, ReportFormat};
pub use runner::{SuiteResults, TestOutcome, TestRunner, TestSummary};
pub use suite::{Suite, TestContext, TestFailure, all_suites, compute_pi_suite};

use pi_core::ApproxError;

/// Message printed by the host program
pub fn host_message(config: &HarnessConfig) -> Result<String, ApproxError> {
    let pi = pi_core::compute_pi(config.iterations)?;
    Ok(format!("The approximate value of PI is {:.6}", pi))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_message() {
        let config = HarnessConfig::default_config().unwrap();
        assert_eq!(
            host_message(&config).unwrap(),
            "The approximate value of PI is 3.141593"
        );
    }

    #[test]
    fn test_host_message_small_counts() {
        let mut config = HarnessConfig::default_config().unwrap();
        config.iterations = 1;
        assert_eq!(
            host_message(&config).unwrap(),
            "The approximate value of PI is 2.000000"
        );
        config.iterations = 0;
        assert!(host_message(&config).is_err());
    }
}
