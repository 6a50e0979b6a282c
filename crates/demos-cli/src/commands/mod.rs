//! Command handlers, one module per subcommand.

mod apply_env;
mod check;
mod init;
mod misc;
mod show;
mod use_config;

pub use apply_env::handle_apply_env;
pub use check::handle_check;
pub use init::handle_init;
pub use misc::handle_completions;
pub use show::handle_show;
pub use use_config::handle_use_config;

/// Placeholder shown wherever the credential would appear in output.
pub const MASKED: &str = "***hidden***";
