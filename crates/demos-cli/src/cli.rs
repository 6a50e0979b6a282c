use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use demos_core::VERSION;

/// Demostools - settings and credentials for the Demos network toolkit
#[derive(Parser)]
#[command(name = "demostools")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Override a setting for this invocation (KEY=VALUE, repeatable)
    #[arg(long = "config", global = true, value_name = "KEY=VALUE")]
    pub overrides: Vec<String>,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Arguments for the `config show` command
#[derive(Args)]
pub struct ShowArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `config init` command
#[derive(Args)]
pub struct InitArgs {
    /// Overwrite an encrypted credential in the existing file
    #[arg(long)]
    pub force: bool,
}

/// Arguments for the `completions` command
#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_name = "SHELL")]
    pub shell: Shell,
}

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show resolved settings and where each value came from
    Show(ShowArgs),

    /// Write a plaintext config file from the currently resolved values
    Init(InitArgs),

    /// Encrypt .env values into the config file and delete .env
    ApplyEnv,

    /// Back up .env so the config file takes precedence
    UseConfig,

    /// Verify the credential can be read end to end
    Check,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Inspect and manage stored settings
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}
