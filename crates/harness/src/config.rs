//! Harness configuration
//!
//! The iteration count and test parameters are an explicit value handed to
//! both the host program and the test suite. Values are layered:
//!
//! 1. Embedded defaults (`defaults.toml`)
//! 2. A user TOML file (`--config PATH`), which may set any subset of keys
//! 3. The `COMPUTE_PI_ITERATIONS` environment variable
//! 4. Command-line flags (applied by the binary)
//!
//! # Example
//!
//! ```rust
//! use compute_pi::HarnessConfig;
//!
//! let mut config = HarnessConfig::default_config().unwrap();
//! config.merge(HarnessConfig::overrides_from_toml("iterations = 50").unwrap());
//! assert_eq!(config.iterations, 50);
//! ```

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Embedded default configuration
pub static DEFAULT_CONFIG: &str = include_str!("defaults.toml");

/// Environment variable overriding the iteration count
pub const ITERATIONS_ENV: &str = "COMPUTE_PI_ITERATIONS";

/// Output format of the run report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// XUnit XML (the default)
    #[default]
    Xml,
    /// JSON summary
    Json,
}

impl ReportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Xml => "xml",
            ReportFormat::Json => "json",
        }
    }
}

/// Where and how the run report is written
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReportSettings {
    pub dir: PathBuf,
    pub prefix: String,
    pub world_name: String,
    pub format: ReportFormat,
}

/// Test-run behavior switches
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RunSettings {
    /// Do not run tests at all
    pub skip_tests: bool,
    /// Failing tests produce a warning instead of a failing exit status
    pub ignore_failures: bool,
}

/// Complete harness configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HarnessConfig {
    /// Number of continued-fraction terms (`COMPUTE_PI_ITERATIONS`)
    pub iterations: i64,
    /// Value `testComputePi` compares the approximation against
    pub expected: f64,
    /// Allowed absolute difference
    pub tolerance: f64,
    pub report: ReportSettings,
    pub run: RunSettings,
}

/// Partial configuration as read from a user file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigOverrides {
    pub iterations: Option<i64>,
    pub expected: Option<f64>,
    pub tolerance: Option<f64>,
    #[serde(default)]
    pub report: ReportOverrides,
    #[serde(default)]
    pub run: RunOverrides,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReportOverrides {
    pub dir: Option<PathBuf>,
    pub prefix: Option<String>,
    pub world_name: Option<String>,
    pub format: Option<ReportFormat>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunOverrides {
    pub skip_tests: Option<bool>,
    pub ignore_failures: Option<bool>,
}

impl HarnessConfig {
    /// Load the embedded default configuration
    pub fn default_config() -> Result<Self, String> {
        toml::from_str(DEFAULT_CONFIG)
            .map_err(|e| format!("Failed to parse default config: {}", e))
    }

    /// Parse a (possibly partial) user configuration
    pub fn overrides_from_toml(toml_str: &str) -> Result<ConfigOverrides, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse config: {}", e))
    }

    /// Defaults merged with the file at `path`, if any, then the environment
    pub fn load(path: Option<&Path>) -> Result<Self, String> {
        let mut config = Self::default_config()?;

        if let Some(path) = path {
            let content = fs::read_to_string(path)
                .map_err(|e| format!("Failed to read config {}: {}", path.display(), e))?;
            config.merge(Self::overrides_from_toml(&content)?);
        }

        config.apply_env()?;
        Ok(config)
    }

    /// Merge user overrides into this config (user values win)
    pub fn merge(&mut self, other: ConfigOverrides) {
        if let Some(iterations) = other.iterations {
            self.iterations = iterations;
        }
        if let Some(expected) = other.expected {
            self.expected = expected;
        }
        if let Some(tolerance) = other.tolerance {
            self.tolerance = tolerance;
        }

        let report = other.report;
        if let Some(dir) = report.dir {
            self.report.dir = dir;
        }
        if let Some(prefix) = report.prefix {
            self.report.prefix = prefix;
        }
        if let Some(world_name) = report.world_name {
            self.report.world_name = world_name;
        }
        if let Some(format) = report.format {
            self.report.format = format;
        }

        if let Some(skip) = other.run.skip_tests {
            self.run.skip_tests = skip;
        }
        if let Some(ignore) = other.run.ignore_failures {
            self.run.ignore_failures = ignore;
        }
    }

    /// Apply overrides from the process environment
    pub fn apply_env(&mut self) -> Result<(), String> {
        self.apply_env_with(|key| std::env::var(key).ok())
    }

    /// Apply overrides using `lookup` to read variables
    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<(), String>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup(ITERATIONS_ENV) {
            let val = val.trim();
            if val.is_empty() {
                return Ok(());
            }
            self.iterations = val.parse().map_err(|_| {
                format!("{}='{}' is not an integer", ITERATIONS_ENV, val)
            })?;
            tracing::debug!(iterations = self.iterations, "iterations set from environment");
        }
        Ok(())
    }

    /// Check values that would make the run meaningless
    ///
    /// The iteration count is not checked here: `compute_pi` rejects it, and
    /// the test run reports that as a test error.
    pub fn validate(&self) -> Result<(), String> {
        if !self.expected.is_finite() {
            return Err(format!("expected must be finite (got {})", self.expected));
        }
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(format!(
                "tolerance must be a finite, non-negative number (got {})",
                self.tolerance
            ));
        }
        if self.report.prefix.is_empty() {
            return Err("report prefix cannot be empty".to_string());
        }
        if self.report.world_name.is_empty() {
            return Err("report world name cannot be empty".to_string());
        }
        Ok(())
    }

    /// Report path for a test target
    ///
    /// `compute-pi-test` becomes `<dir>/cxxtest-report-compute-pi-test.xml`.
    /// A trailing extension on `target` is dropped.
    pub fn report_path(&self, target: &str) -> PathBuf {
        let stem = Path::new(target)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(target);
        self.report.dir.join(format!(
            "{}-{}.{}",
            self.report.prefix,
            stem,
            self.report.format.extension()
        ))
    }
}
