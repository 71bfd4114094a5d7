//! Test suites and the assertion context
//!
//! Assertions record failures in a [`TestContext`] instead of panicking, so a
//! failing test is reported as a failure rather than aborting the run.

use crate::config::HarnessConfig;
use pi_core::{DeltaCheck, compute_pi};

/// Kind of a recorded failure, used as the XUnit `type` attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// A delta assertion did not hold
    AssertDelta,
    /// The test could not evaluate its assertion (error result or panic)
    Error,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::AssertDelta => "failedAssertDelta",
            FailureKind::Error => "error",
        }
    }
}

/// A single test failure with context
#[derive(Debug, Clone, PartialEq)]
pub struct TestFailure {
    pub kind: FailureKind,
    pub message: String,
    pub expected: Option<String>,
    pub actual: Option<String>,
    /// Source line of the failing assertion
    pub line: u32,
}

/// Tracks assertion results for the test being executed
#[derive(Debug, Default)]
pub struct TestContext {
    pub current_test: Option<String>,
    pub passes: usize,
    pub failures: Vec<TestFailure>,
}

impl TestContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self, test_name: Option<String>) {
        self.current_test = test_name;
        self.passes = 0;
        self.failures.clear();
    }

    pub fn record_pass(&mut self) {
        self.passes += 1;
    }

    pub fn record_failure(&mut self, failure: TestFailure) {
        self.failures.push(failure);
    }

    /// Record an error that kept the test from reaching its assertions
    pub fn record_error(&mut self, message: impl Into<String>, line: u32) {
        self.record_failure(TestFailure {
            kind: FailureKind::Error,
            message: message.into(),
            expected: None,
            actual: None,
            line,
        });
    }

    /// Assert `|actual - expected| <= delta`; returns whether it held
    pub fn assert_delta(&mut self, actual: f64, expected: f64, delta: f64, line: u32) -> bool {
        let check = DeltaCheck::new(actual, expected, delta);
        if check.passed() {
            self.record_pass();
            return true;
        }

        self.record_failure(TestFailure {
            kind: FailureKind::AssertDelta,
            message: format!("Error: Assertion failed: {}", check),
            expected: Some(format!("{} +/- {}", expected, delta)),
            actual: Some(format!("{} (off by {})", actual, check.difference())),
            line,
        });
        false
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Signature of a test body
pub type TestFn = fn(&mut TestContext, &HarnessConfig);

/// One test in a suite
#[derive(Debug, Clone)]
pub struct TestCase {
    pub name: &'static str,
    pub line: u32,
    pub run: TestFn,
}

/// A named group of tests, reported together
#[derive(Debug, Clone)]
pub struct Suite {
    /// Class name used in reports (`ComputePiTest`)
    pub name: &'static str,
    /// Test target the suite belongs to; names the report file
    pub target: &'static str,
    pub file: &'static str,
    pub line: u32,
    pub tests: Vec<TestCase>,
}

/// The `ComputePiTest` suite
pub fn compute_pi_suite() -> Suite {
    Suite {
        name: "ComputePiTest",
        target: "compute-pi-test",
        file: file!(),
        line: line!(),
        tests: vec![TestCase {
            name: "testComputePi",
            line: line!(),
            run: test_compute_pi,
        }],
    }
}

/// Every suite the runner knows about
pub fn all_suites() -> Vec<Suite> {
    vec![compute_pi_suite()]
}

fn test_compute_pi(ctx: &mut TestContext, config: &HarnessConfig) {
    match compute_pi(config.iterations) {
        Ok(pi) => {
            ctx.assert_delta(pi, config.expected, config.tolerance, line!());
        }
        Err(e) => ctx.record_error(format!("Error: {}", e), line!()),
    }
}
