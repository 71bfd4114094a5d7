//! Run reports
//!
//! One report file per suite, named after the suite's test target:
//! - `xml` → XUnit, readable by CI servers (`cxxtest-report-compute-pi-test.xml`)
//! - `json` → flat JSON summary (needs the `report-json` feature)
//!
//! ## Feature Flag
//!
//! Without `report-json`, JSON requests fall back to XUnit with a warning.

use crate::config::{HarnessConfig, ReportFormat};
use crate::runner::SuiteResults;
use crate::suite::FailureKind;
use std::fs;
use std::path::PathBuf;
use tracing::info;

// =============================================================================
// XUnit
// =============================================================================

/// Escape text for use in XML attributes and character data
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

fn seconds(d: std::time::Duration) -> String {
    format!("{:.3}", d.as_secs_f64())
}

/// Render one suite's results as an XUnit document
pub fn format_xunit(results: &SuiteResults, world_name: &str) -> String {
    let failures = results.failed();
    let errors = results
        .tests
        .iter()
        .filter(|t| {
            t.failures
                .iter()
                .any(|f| f.kind == FailureKind::Error)
        })
        .count();

    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\" ?>\n");
    out.push_str(&format!(
        "<testsuite name=\"{}\" tests=\"{}\" errors=\"{}\" failures=\"{}\" time=\"{}\" >\n",
        escape_xml(world_name),
        results.tests.len(),
        errors,
        failures - errors,
        seconds(results.duration())
    ));

    for test in &results.tests {
        let open = format!(
            "    <testcase classname=\"{}\" name=\"{}\" line=\"{}\" time=\"{}\"",
            escape_xml(&results.suite),
            escape_xml(&test.name),
            test.line,
            seconds(test.duration)
        );

        if test.failures.is_empty() {
            out.push_str(&open);
            out.push_str(" />\n");
            continue;
        }

        out.push_str(&open);
        out.push_str(">\n");
        for failure in &test.failures {
            out.push_str(&format!(
                "        <failure file=\"{}\" line=\"{}\" type=\"{}\" >{}</failure>\n",
                escape_xml(&results.file),
                failure.line,
                failure.kind.as_str(),
                escape_xml(&failure.message)
            ));
        }
        out.push_str("    </testcase>\n");
    }

    out.push_str("</testsuite>\n");
    out
}

// =============================================================================
// JSON
// =============================================================================

#[cfg(feature = "report-json")]
pub fn format_json(results: &SuiteResults, world_name: &str) -> String {
    let tests: Vec<serde_json::Value> = results
        .tests
        .iter()
        .map(|t| {
            let failures: Vec<serde_json::Value> = t
                .failures
                .iter()
                .map(|f| {
                    serde_json::json!({
                        "type": f.kind.as_str(),
                        "line": f.line,
                        "message": f.message,
                        "expected": f.expected,
                        "actual": f.actual,
                    })
                })
                .collect();
            serde_json::json!({
                "name": t.name,
                "line": t.line,
                "passed": t.passed,
                "assertions": t.passes,
                "time_ms": t.duration.as_millis() as u64,
                "failures": failures,
            })
        })
        .collect();

    let obj = serde_json::json!({
        "world": world_name,
        "suite": results.suite,
        "target": results.target,
        "file": results.file,
        "line": results.line,
        "tests": tests,
        "failed": results.failed(),
    });
    serde_json::to_string_pretty(&obj).unwrap_or_else(|_| "{}".to_string())
}

#[cfg(not(feature = "report-json"))]
pub fn format_json(results: &SuiteResults, world_name: &str) -> String {
    tracing::warn!("JSON reports require the 'report-json' feature. Falling back to XUnit.");
    format_xunit(results, world_name)
}

// =============================================================================
// Emit
// =============================================================================

/// Render a suite's report in the configured format
pub fn render(results: &SuiteResults, config: &HarnessConfig) -> String {
    match config.report.format {
        ReportFormat::Xml => format_xunit(results, &config.report.world_name),
        ReportFormat::Json => format_json(results, &config.report.world_name),
    }
}

/// Write a report for every suite; returns the paths written
pub fn write_reports(suites: &[SuiteResults], config: &HarnessConfig) -> Result<Vec<PathBuf>, String> {
    fs::create_dir_all(&config.report.dir).map_err(|e| {
        format!(
            "Failed to create report directory {}: {}",
            config.report.dir.display(),
            e
        )
    })?;

    let mut written = Vec::with_capacity(suites.len());
    for results in suites {
        if results.tests.is_empty() {
            continue;
        }
        let path = config.report_path(&results.target);
        fs::write(&path, render(results, config))
            .map_err(|e| format!("Failed to write report {}: {}", path.display(), e))?;
        info!(path = %path.display(), "wrote test report");
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::TestRunner;
    use crate::suite::compute_pi_suite;

    fn run_with(iterations: i64) -> (SuiteResults, HarnessConfig) {
        let mut config = HarnessConfig::default_config().unwrap();
        config.iterations = iterations;
        let runner = TestRunner::new(false, None, config.clone());
        let mut summary = runner.run(&[compute_pi_suite()]);
        (summary.suites.remove(0), config)
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("a<b & \"c\" 'd'>"), "a&lt;b &amp; &quot;c&quot; &apos;d&apos;&gt;");
        assert_eq!(escape_xml("plain"), "plain");
    }

    #[test]
    fn test_xunit_passing() {
        let (results, _) = run_with(1000);
        let xml = format_xunit(&results, "cxxtest");
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\" ?>\n"));
        assert!(xml.contains("<testsuite name=\"cxxtest\" tests=\"1\" errors=\"0\" failures=\"0\""));
        assert!(xml.contains("<testcase classname=\"ComputePiTest\" name=\"testComputePi\""));
        assert!(xml.contains(" />\n"));
        assert!(!xml.contains("<failure"));
        assert!(xml.ends_with("</testsuite>\n"));
    }

    #[test]
    fn test_xunit_failure() {
        let (results, config) = run_with(2);
        let xml = format_xunit(&results, "cxxtest");
        assert!(xml.contains("errors=\"0\" failures=\"1\""));
        assert!(xml.contains("type=\"failedAssertDelta\""));
        assert!(xml.contains(&format!("(3.5 == {}) up to 0.01", config.expected)));
        assert!(xml.contains("</testcase>"));
    }

    #[test]
    fn test_xunit_error() {
        let (results, _) = run_with(-1);
        let xml = format_xunit(&results, "cxxtest");
        assert!(xml.contains("errors=\"1\" failures=\"0\""));
        assert!(xml.contains("type=\"error\""));
    }

    #[cfg(feature = "report-json")]
    #[test]
    fn test_json_report() {
        let (results, _) = run_with(2);
        let json: serde_json::Value = serde_json::from_str(&format_json(&results, "cxxtest")).unwrap();
        assert_eq!(json["world"], "cxxtest");
        assert_eq!(json["suite"], "ComputePiTest");
        assert_eq!(json["failed"], 1);
        assert_eq!(json["tests"][0]["passed"], false);
        assert_eq!(json["tests"][0]["failures"][0]["type"], "failedAssertDelta");
    }

    #[test]
    fn test_write_reports() {
        let dir = tempfile::tempdir().unwrap();
        let (results, mut config) = run_with(1000);
        config.report.dir = dir.path().join("test-reports");

        let written = write_reports(&[results], &config).unwrap();
        assert_eq!(
            written,
            vec![dir.path().join("test-reports/cxxtest-report-compute-pi-test.xml")]
        );
        let content = fs::read_to_string(&written[0]).unwrap();
        assert!(content.contains("testComputePi"));
    }

    #[test]
    fn test_write_reports_skips_empty_suites() {
        let dir = tempfile::tempdir().unwrap();
        let (mut results, mut config) = run_with(1000);
        results.tests.clear();
        config.report.dir = dir.path().to_path_buf();

        let written = write_reports(&[results], &config).unwrap();
        assert!(written.is_empty());
    }
}
