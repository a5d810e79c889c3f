//! Completions command implementation
//!
//! Handles the `site-weight completions` command which generates
//! shell completion scripts for bash, zsh, fish, etc.

use clap::{Arg, ArgAction, Command};
use clap_complete::{generate, Shell};
use std::io::Write;

/// Command structure used for completions (the derive-based `Cli` lives in main.rs)
pub fn completion_command() -> Command {
    Command::new("site-weight")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Page weight estimator for visual design-tool projects")
        .arg(
            Arg::new("no-emoji")
                .long("no-emoji")
                .help("Disable emoji output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("analyze")
                .about("Estimate page weight from a project snapshot")
                .arg(Arg::new("snapshot").value_name("SNAPSHOT").required(true))
                .arg(Arg::new("json").long("json").action(ArgAction::SetTrue))
                .arg(Arg::new("check").long("check").action(ArgAction::SetTrue))
                .arg(Arg::new("config").long("config").value_name("DIR")),
        )
        .subcommand(Command::new("init").about("Write a default .site-weight.toml"))
        .subcommand(
            Command::new("completions")
                .about("Generate shell completions")
                .arg(
                    Arg::new("shell")
                        .help("Shell to generate completions for")
                        .value_parser(clap::value_parser!(Shell))
                        .required(true),
                ),
        )
}

/// Write a completion script for `shell` to `out`
pub fn write_completions(shell: Shell, out: &mut dyn Write) {
    let mut cmd = completion_command();
    generate(shell, &mut cmd, "site-weight", out);
}

/// Generate shell completion scripts
///
/// Outputs completion script for the specified shell to stdout.
/// Users can redirect this to their shell's completion directory.
///
/// # Examples
///
/// ```bash
/// # Bash
/// site-weight completions bash > /etc/bash_completion.d/site-weight
///
/// # Zsh
/// site-weight completions zsh > ~/.zfunc/_site-weight
///
/// # Fish
/// site-weight completions fish > ~/.config/fish/completions/site-weight.fish
/// ```
pub fn cmd_completions(shell: Shell) {
    write_completions(shell, &mut std::io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_command_is_consistent() {
        completion_command().debug_assert();
    }

    #[test]
    fn test_every_shell_mentions_subcommands() {
        for shell in [Shell::Bash, Shell::Zsh, Shell::Fish, Shell::PowerShell] {
            let mut buf = Vec::new();
            write_completions(shell, &mut buf);
            let script = String::from_utf8(buf).unwrap();
            assert!(script.contains("analyze"), "{:?} script lacks analyze", shell);
            assert!(script.contains("init"), "{:?} script lacks init", shell);
        }
    }

    #[test]
    fn test_completions_subcommand_offers_shell_names() {
        let mut buf = Vec::new();
        write_completions(Shell::Bash, &mut buf);
        let script = String::from_utf8(buf).unwrap();
        assert!(script.contains("elvish"));
        assert!(script.contains("powershell"));
    }
}
