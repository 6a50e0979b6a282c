use demos_core::migrate;

use crate::app::AppContext;
use crate::cli::Cli;

pub fn handle_use_config(cli: &Cli) -> anyhow::Result<()> {
    let ctx = AppContext::load(cli)?;

    match migrate::prefer_file_over_env(ctx.store(), ctx.env_file())? {
        Some(backup) => {
            if !cli.quiet {
                println!(
                    "Backed up {} to {}",
                    ctx.env_file().display(),
                    backup.display()
                );
                println!("The config file now takes precedence.");
            }
        }
        None => {
            if !cli.quiet {
                println!(
                    "No {} file found; the config file already takes precedence.",
                    ctx.env_file().display()
                );
            }
        }
    }
    Ok(())
}
