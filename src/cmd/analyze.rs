//! Analyze command implementation
//!
//! Loads a project snapshot, runs a full scan and prints the console or
//! JSON report. With `--check` the configured weight budgets are enforced.

use anyhow::{Context, Result};
use console::style;
use std::env;
use std::path::Path;

use crate::budget::{first_violation, BudgetChecker};
use crate::config::ConfigLoader;
use crate::fmt::{CHECKMARK, CROSSMARK, MICROSCOPE};
use crate::report::{format_console_report, format_json_report};
use crate::scan::run_analysis;
use crate::source::{InMemorySource, ProjectSnapshot};

/// Analyze a project snapshot
///
/// `config_dir` defaults to the current directory.
///
/// # Examples
///
/// ```no_run
/// use site_weight::cmd::analyze::cmd_analyze;
/// use std::path::Path;
///
/// // Console report
/// cmd_analyze(Path::new("snapshot.json"), false, false, None)?;
///
/// // JSON for CI, failing on budget violations
/// cmd_analyze(Path::new("snapshot.json"), true, true, None)?;
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn cmd_analyze(
    snapshot_path: &Path,
    json: bool,
    check: bool,
    config_dir: Option<&Path>,
) -> Result<()> {
    let config_dir = match config_dir {
        Some(dir) => dir.to_path_buf(),
        None => env::current_dir().context("Failed to determine current directory")?,
    };
    let config = ConfigLoader::load(&config_dir)?;

    if !json {
        println!(
            "{} {} {}",
            MICROSCOPE,
            style("Analyzing").bold(),
            style(snapshot_path.display()).cyan()
        );
    }

    let snapshot = ProjectSnapshot::load(snapshot_path)?;
    let source = InMemorySource::from_snapshot(snapshot);
    let analysis = run_analysis(&source, &config)?;

    if json {
        println!("{}", format_json_report(&analysis)?);
    } else {
        print!("{}", format_console_report(&analysis)?);
    }

    if !check {
        return Ok(());
    }

    let checker = BudgetChecker::new(config.budget.clone().unwrap_or_default());
    let results = checker.check_analysis(&analysis);
    if !json {
        println!("{}", style("Weight Budget Check").bold());
        for result in &results {
            result.print();
        }
    }

    match first_violation(&results) {
        Some(err) => {
            if !json {
                println!("\n{} Budget exceeded", CROSSMARK);
            }
            Err(err.into())
        }
        None => {
            if !json {
                println!("\n{} All breakpoints within budget", CHECKMARK);
            }
            Ok(())
        }
    }
}
