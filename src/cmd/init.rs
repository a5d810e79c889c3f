//! Init command implementation
//!
//! Handles the `site-weight init` command which writes a configuration file
//! holding every default so it can be tuned in place.

use anyhow::Result;
use console::{style, Emoji};
use std::env;
use std::path::Path;

use crate::config::{self, ConfigFile};
use crate::fmt::{format_bytes, CHECKMARK, SPARKLES, WARNING};

static INFO: Emoji = Emoji("ℹ️", "i");

/// Write `.site-weight.toml` with default settings to the current directory
///
/// # Examples
///
/// ```no_run
/// use site_weight::cmd::init::cmd_init;
///
/// cmd_init()?;
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn cmd_init() -> Result<()> {
    let project_root = env::current_dir()?;
    init_in(&project_root)
}

/// Write the default configuration into `project_root`
///
/// Leaves an existing file untouched.
pub fn init_in(project_root: &Path) -> Result<()> {
    println!(
        "{} {} Initializing site-weight",
        SPARKLES,
        style("site-weight init").bold()
    );
    println!();

    if config::ConfigLoader::exists(project_root) {
        println!(
            "{} Config file already exists: {}",
            WARNING,
            style(config::CONFIG_FILE_NAME).cyan()
        );
        println!("   Delete it first or edit manually to update.");
        return Ok(());
    }

    let defaults = ConfigFile::default();
    config::ConfigLoader::save(&defaults, project_root)?;
    log::debug!("wrote default config to {}", project_root.display());

    println!(
        "{} Created {}",
        CHECKMARK,
        style(config::CONFIG_FILE_NAME).cyan().bold()
    );
    println!();
    println!("{}  Defaults:", INFO);
    println!(
        "   {} base overhead per breakpoint: {}",
        style("•").dim(),
        style(format_bytes(defaults.estimator.base_overhead_bytes)).green()
    );
    println!(
        "   {} font face: {}",
        style("•").dim(),
        style(format_bytes(defaults.estimator.font_face_bytes)).green()
    );
    println!(
        "   {} savings cap: {:.0}% of breakpoint weight",
        style("•").dim(),
        defaults.savings.cap_ratio * 100.0
    );
    println!(
        "   {} traffic model: {} visits x {} pages per month",
        style("•").dim(),
        defaults.traffic.monthly_visits,
        defaults.traffic.pages_per_visit
    );
    println!();
    println!("{}  Next Steps:", style("💡").bold());
    println!(
        "   1. Add a {} section to enforce per-breakpoint limits",
        style("[budget]").cyan()
    );
    println!(
        "   2. Run {} on an exported project snapshot",
        style("site-weight analyze <SNAPSHOT.json>").cyan()
    );

    Ok(())
}
