//! compute-pi CLI
//!
//! Without a subcommand, prints the approximation of π for the configured
//! iteration count. `compute-pi test` runs the test suites and writes their
//! reports.

use clap::{CommandFactory, Parser as ClapParser, Subcommand};
use clap_complete::{Shell, generate};
use compute_pi::{HarnessConfig, ReportFormat, TestRunner, all_suites, host_message, report};
use std::io;
use std::path::{Path, PathBuf};
use std::process;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(ClapParser)]
#[command(name = "compute-pi")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Approximate pi with a continued fraction", long_about = None)]
struct Cli {
    /// Configuration file (TOML); keys not set fall back to the defaults
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Number of continued-fraction terms (overrides COMPUTE_PI_ITERATIONS)
    #[arg(short = 'n', long, global = true, allow_negative_numbers = true)]
    iterations: Option<i64>,

    /// Debug logging on stderr, per-test timing in test output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the test suites and write their reports
    Test {
        /// Filter: only run tests whose name contains this pattern
        #[arg(short, long)]
        filter: Option<String>,

        /// Directory the reports are written to
        #[arg(long, value_name = "DIR")]
        report_dir: Option<PathBuf>,

        /// Report format
        #[arg(long, value_enum)]
        report_format: Option<ReportFormat>,

        /// Do not write report files
        #[arg(long)]
        no_report: bool,

        /// Do not run any tests
        #[arg(long)]
        skip_tests: bool,

        /// Exit successfully even when tests fail
        #[arg(long)]
        ignore_failures: bool,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Some(Commands::Completions { shell }) => run_completions(shell),
        None => {
            let config = load_config(cli.config.as_deref(), cli.iterations);
            run_host(&config);
        }
        Some(Commands::Test {
            filter,
            report_dir,
            report_format,
            no_report,
            skip_tests,
            ignore_failures,
        }) => {
            let mut config = load_config(cli.config.as_deref(), cli.iterations);
            if let Some(dir) = report_dir {
                config.report.dir = dir;
            }
            if let Some(format) = report_format {
                config.report.format = format;
            }
            config.run.skip_tests |= skip_tests;
            config.run.ignore_failures |= ignore_failures;
            run_test(config, filter, cli.verbose, !no_report);
        }
    }
}

/// Defaults, config file and environment, then the `--iterations` flag
fn load_config(path: Option<&Path>, iterations: Option<i64>) -> HarnessConfig {
    let mut config = match HarnessConfig::load(path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };
    if let Some(iterations) = iterations {
        config.iterations = iterations;
    }
    config
}

fn init_logging(verbose: bool) {
    let default = if verbose {
        "compute_pi=debug,pi_core=debug"
    } else {
        "compute_pi=warn,pi_core=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run_completions(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "compute-pi", &mut io::stdout());
}

fn run_host(config: &HarnessConfig) {
    info!(iterations = config.iterations, "computing approximation");
    match host_message(config) {
        Ok(message) => println!("{}", message),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn run_test(config: HarnessConfig, filter: Option<String>, verbose: bool, write_report: bool) {
    if let Err(e) = config.validate() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }

    // Reported in a form CI log scrapers recognize
    if config.run.skip_tests {
        println!("Tests are skipped.");
        return;
    }

    let ignore_failures = config.run.ignore_failures;
    let runner = TestRunner::new(verbose, filter, config);
    let summary = runner.run(&all_suites());

    runner.print_results(&summary);

    if summary.total == 0 {
        eprintln!("No tests found");
        process::exit(2);
    }

    if write_report {
        match report::write_reports(&summary.suites, &runner.config) {
            Ok(paths) => {
                for path in paths {
                    println!("Report written to {}", path.display());
                }
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        }
    }

    if !summary.success() {
        if ignore_failures {
            warn!("Some tests failed to pass");
        } else {
            process::exit(1);
        }
    }
}
