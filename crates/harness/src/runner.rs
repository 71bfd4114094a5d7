//! Test runner
//!
//! Executes registered suites in process, one fresh [`TestContext`] per test,
//! and reports results in the `name ... ok` / `name ... FAILED` format.

use crate::config::HarnessConfig;
use crate::suite::{Suite, TestContext, TestFailure};
use std::panic::{self, AssertUnwindSafe};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Result of running a single test
#[derive(Debug, Clone)]
pub struct TestOutcome {
    /// Name of the test function
    pub name: String,
    /// Source line of the test
    pub line: u32,
    pub passed: bool,
    /// Number of assertions that held
    pub passes: usize,
    pub duration: Duration,
    pub failures: Vec<TestFailure>,
}

/// Results for a single suite
#[derive(Debug, Clone)]
pub struct SuiteResults {
    pub suite: String,
    pub target: String,
    pub file: String,
    pub line: u32,
    pub tests: Vec<TestOutcome>,
}

impl SuiteResults {
    pub fn failed(&self) -> usize {
        self.tests.iter().filter(|t| !t.passed).count()
    }

    pub fn duration(&self) -> Duration {
        self.tests.iter().map(|t| t.duration).sum()
    }
}

/// Summary of all test results
#[derive(Debug, Default)]
pub struct TestSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub suites: Vec<SuiteResults>,
}

impl TestSummary {
    pub fn success(&self) -> bool {
        self.failed == 0
    }

    pub fn duration(&self) -> Duration {
        self.suites.iter().map(|s| s.duration()).sum()
    }
}

/// Test runner configuration
pub struct TestRunner {
    /// Show per-test timing
    pub verbose: bool,
    /// Filter pattern for test names
    pub filter: Option<String>,
    pub config: HarnessConfig,
}

impl TestRunner {
    pub fn new(verbose: bool, filter: Option<String>, config: HarnessConfig) -> Self {
        Self {
            verbose,
            filter,
            config,
        }
    }

    fn matches_filter(&self, name: &str) -> bool {
        match &self.filter {
            Some(pattern) => name.contains(pattern.as_str()),
            None => true,
        }
    }

    /// Run all matching tests in a suite
    pub fn run_suite(&self, suite: &Suite) -> SuiteResults {
        let mut ctx = TestContext::new();
        let mut tests = Vec::new();

        for case in suite.tests.iter().filter(|c| self.matches_filter(c.name)) {
            debug!(suite = suite.name, test = case.name, "running test");
            ctx.reset(Some(case.name.to_string()));

            let start = Instant::now();
            let result = panic::catch_unwind(AssertUnwindSafe(|| (case.run)(&mut ctx, &self.config)));
            let duration = start.elapsed();

            if let Err(payload) = result {
                ctx.record_error(
                    format!("Test panicked: {}", format_panic_payload(&payload)),
                    case.line,
                );
            }

            tests.push(TestOutcome {
                name: case.name.to_string(),
                line: case.line,
                passed: !ctx.has_failures(),
                passes: ctx.passes,
                duration,
                failures: std::mem::take(&mut ctx.failures),
            });
        }

        SuiteResults {
            suite: suite.name.to_string(),
            target: suite.target.to_string(),
            file: suite.file.to_string(),
            line: suite.line,
            tests,
        }
    }

    /// Run suites and return summary
    pub fn run(&self, suites: &[Suite]) -> TestSummary {
        let mut summary = TestSummary::default();

        for suite in suites {
            let results = self.run_suite(suite);

            for test in &results.tests {
                summary.total += 1;
                if test.passed {
                    summary.passed += 1;
                } else {
                    summary.failed += 1;
                }
            }

            summary.suites.push(results);
        }

        info!(
            total = summary.total,
            passed = summary.passed,
            failed = summary.failed,
            "test run finished"
        );
        summary
    }

    /// Render test results the way `print_results` writes them
    pub fn format_results(&self, summary: &TestSummary) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "Running {} tests ({} test{})\n",
            self.config.report.world_name,
            summary.total,
            if summary.total == 1 { "" } else { "s" }
        ));

        for suite in &summary.suites {
            for test in &suite.tests {
                let status = if test.passed { "ok" } else { "FAILED" };
                if self.verbose {
                    out.push_str(&format!(
                        "  {}::{} ... {} ({}ms)\n",
                        suite.suite,
                        test.name,
                        status,
                        test.duration.as_millis()
                    ));
                } else {
                    out.push_str(&format!("  {}::{} ... {}\n", suite.suite, test.name, status));
                }
            }
        }

        out.push_str("\n========================================\n");
        if self.verbose {
            out.push_str(&format!(
                "Results: {} passed, {} failed ({}ms)\n",
                summary.passed,
                summary.failed,
                summary.duration().as_millis()
            ));
        } else {
            out.push_str(&format!(
                "Results: {} passed, {} failed\n",
                summary.passed, summary.failed
            ));
        }

        let failures: Vec<_> = summary
            .suites
            .iter()
            .flat_map(|s| s.tests.iter().filter(|t| !t.passed).map(move |t| (s, t)))
            .collect();

        if !failures.is_empty() {
            out.push_str("\nFAILURES:\n\n");
            for (suite, test) in failures {
                out.push_str(&format!("{}::{}\n", suite.suite, test.name));
                for failure in &test.failures {
                    out.push_str(&format!("  {}:{}: {}\n", suite.file, failure.line, failure.message));
                    if let Some(ref expected) = failure.expected {
                        out.push_str(&format!("    expected: {}\n", expected));
                    }
                    if let Some(ref actual) = failure.actual {
                        out.push_str(&format!("    actual: {}\n", actual));
                    }
                }
                out.push('\n');
            }
        }

        out
    }

    /// Print test results
    pub fn print_results(&self, summary: &TestSummary) {
        print!("{}", self.format_results(summary));
    }
}

/// Format a panic payload into an error message
fn format_panic_payload(payload: &Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::suite::{FailureKind, TestCase, compute_pi_suite};

    fn runner(iterations: i64, filter: Option<&str>) -> TestRunner {
        let mut config = HarnessConfig::default_config().unwrap();
        config.iterations = iterations;
        TestRunner::new(false, filter.map(String::from), config)
    }

    fn panicking_test(_ctx: &mut TestContext, _config: &HarnessConfig) {
        panic!("boom");
    }

    fn two_assertions(ctx: &mut TestContext, _config: &HarnessConfig) {
        ctx.assert_delta(1.0, 1.0, 0.0, 10);
        ctx.assert_delta(2.0, 1.0, 0.5, 11);
    }

    fn scratch_suite() -> Suite {
        Suite {
            name: "ScratchTest",
            target: "scratch-test",
            file: "scratch.rs",
            line: 1,
            tests: vec![
                TestCase {
                    name: "testPanics",
                    line: 2,
                    run: panicking_test,
                },
                TestCase {
                    name: "testTwoAssertions",
                    line: 3,
                    run: two_assertions,
                },
            ],
        }
    }

    #[test]
    fn test_run_passing_suite() {
        let summary = runner(1000, None).run(&[compute_pi_suite()]);
        assert_eq!(summary.total, 1);
        assert_eq!(summary.passed, 1);
        assert_eq!(summary.failed, 0);
        assert!(summary.success());
        assert_eq!(summary.suites[0].tests[0].passes, 1);
    }

    #[test]
    fn test_run_failing_suite() {
        let summary = runner(3, None).run(&[compute_pi_suite()]);
        assert_eq!(summary.failed, 1);
        assert!(!summary.success());
        assert_eq!(
            summary.suites[0].tests[0].failures[0].kind,
            FailureKind::AssertDelta
        );
    }

    #[test]
    fn test_filter() {
        let summary = runner(1000, Some("Assertions")).run(&[scratch_suite()]);
        assert_eq!(summary.total, 1);
        assert_eq!(summary.suites[0].tests[0].name, "testTwoAssertions");

        let summary = runner(1000, Some("nothing-matches")).run(&[compute_pi_suite()]);
        assert_eq!(summary.total, 0);
        assert!(summary.suites[0].tests.is_empty());
    }

    #[test]
    fn test_panic_recorded_as_error() {
        let summary = runner(1000, None).run(&[scratch_suite()]);
        let panicked = &summary.suites[0].tests[0];
        assert!(!panicked.passed);
        assert_eq!(panicked.failures[0].kind, FailureKind::Error);
        assert_eq!(panicked.failures[0].message, "Test panicked: boom");
    }

    #[test]
    fn test_context_fresh_per_test() {
        let summary = runner(1000, None).run(&[scratch_suite()]);
        let second = &summary.suites[0].tests[1];
        assert_eq!(second.passes, 1);
        assert_eq!(second.failures.len(), 1);
        assert_eq!(second.failures[0].line, 11);
        assert_eq!(summary.failed, 2);
    }

    #[test]
    fn test_format_results() {
        let r = runner(2, None);
        let summary = r.run(&[compute_pi_suite()]);
        let text = r.format_results(&summary);
        assert!(text.starts_with("Running cxxtest tests (1 test)\n"));
        assert!(text.contains("  ComputePiTest::testComputePi ... FAILED\n"));
        assert!(text.contains("Results: 0 passed, 1 failed"));
        assert!(text.contains("FAILURES:"));
        assert!(text.contains(&format!("expected: {} +/- 0.01", r.config.expected)));
    }

    #[test]
    fn test_format_results_pass() {
        let r = runner(1000, None);
        let text = r.format_results(&r.run(&[compute_pi_suite()]));
        assert!(text.contains("  ComputePiTest::testComputePi ... ok\n"));
        assert!(!text.contains("FAILURES"));
    }
}
