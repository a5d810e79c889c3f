use clap::{Parser, Subcommand};
use clap_complete::Shell;
use site_weight::cmd;
use std::path::PathBuf;
use std::process;

/// Page weight estimator for visual design-tool projects
///
/// site-weight estimates how many bytes each page transfers at mobile,
/// tablet and desktop widths and ranks the fixes that save the most.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Disable emoji output (useful for CI/CD or accessibility)
    #[arg(long, global = true)]
    no_emoji: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate page weight from a project snapshot
    Analyze {
        /// Project snapshot (JSON) exported from the design tool
        #[arg(value_name = "SNAPSHOT")]
        snapshot: PathBuf,

        /// Output the full analysis as JSON
        #[arg(long)]
        json: bool,

        /// Check breakpoint totals against the configured budget (fail if exceeded)
        #[arg(long)]
        check: bool,

        /// Directory containing .site-weight.toml (defaults to the current directory)
        #[arg(long, value_name = "DIR")]
        config: Option<PathBuf>,
    },

    /// Write a default .site-weight.toml
    Init,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() {
    // Initialize logger (use RUST_LOG env var to control verbosity)
    env_logger::init();

    let cli = Cli::parse();

    if cli.no_emoji {
        std::env::set_var("NO_EMOJI", "1");
    }

    let result = match &cli.command {
        Some(Commands::Analyze {
            snapshot,
            json,
            check,
            config,
        }) => cmd::cmd_analyze(snapshot, *json, *check, config.as_deref()),
        Some(Commands::Init) => cmd::cmd_init(),
        Some(Commands::Completions { shell }) => {
            cmd::cmd_completions(*shell);
            Ok(())
        }
        None => {
            println!("site-weight v{}", env!("CARGO_PKG_VERSION"));
            println!("Page weight estimator for visual design-tool projects\n");
            println!("Usage: site-weight <COMMAND>\n");
            println!("Commands:");
            println!("  analyze      Estimate page weight from a project snapshot");
            println!("  init         Write a default .site-weight.toml");
            println!("  completions  Generate shell completions");
            println!("\nRun 'site-weight <COMMAND> --help' for more information on a command.");
            Ok(())
        }
    };

    if let Err(e) = result {
        use site_weight::error::ErrorFormatter;
        eprintln!("{}", ErrorFormatter::format(&e));
        let exit_code = ErrorFormatter::exit_code(&e);
        process::exit(exit_code);
    }
}
