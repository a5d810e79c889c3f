//! Command handlers for the site-weight CLI
//!
//! Each submodule handles a specific CLI command.

pub mod analyze;
pub mod completions;
pub mod init;

// Re-export command functions for convenient access
pub use analyze::cmd_analyze;
pub use completions::cmd_completions;
pub use init::cmd_init;
