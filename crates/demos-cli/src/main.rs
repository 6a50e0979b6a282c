//! Demostools CLI - settings and credentials for the Demos network toolkit
//!
//! This is the command-line interface over the demos-core library. Core
//! layers return typed failures; only this binary maps them to process
//! exit codes.

mod app;
mod cli;
mod commands;
mod constants;

use std::path::Path;

use clap::Parser;

use demos_core::{CoreError, VERSION};

use crate::cli::{Cli, Commands, ConfigCommands};
use crate::constants::exit_codes;

fn main() {
    // `.env` in the current directory participates in resolution through
    // the process environment; already-set variables win over the file.
    app::load_env_file(Path::new(".env"));

    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("Error: {:#}", err);
        std::process::exit(exit_code_for(&err));
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match &cli.command {
        Some(Commands::Config(args)) => match &args.command {
            ConfigCommands::Show(show_args) => commands::handle_show(&cli, show_args),
            ConfigCommands::Init(init_args) => commands::handle_init(&cli, init_args),
            ConfigCommands::ApplyEnv => commands::handle_apply_env(&cli),
            ConfigCommands::UseConfig => commands::handle_use_config(&cli),
            ConfigCommands::Check => commands::handle_check(&cli),
        },
        Some(Commands::Completions(args)) => commands::handle_completions(args.shell),
        None => {
            println!("demostools v{}", VERSION);
            println!("\nRun `demostools --help` for usage information.");
            Ok(())
        }
    }
}

fn exit_code_for(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<CoreError>() {
        Some(CoreError::MissingCredential(_)) => exit_codes::NOT_FOUND,
        Some(CoreError::InvalidInput(_)) => exit_codes::INVALID_INPUT,
        Some(CoreError::Decryption) => exit_codes::AUTH_FAILED,
        Some(CoreError::Precondition(_)) => exit_codes::PRECONDITION_FAILED,
        _ => 1,
    }
}
