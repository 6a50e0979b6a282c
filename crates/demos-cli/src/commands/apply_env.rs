use demos_core::migrate;

use crate::app::{AppContext, DialoguerPasswords};
use crate::cli::Cli;

pub fn handle_apply_env(cli: &Cli) -> anyhow::Result<()> {
    let ctx = AppContext::load(cli)?;

    let mut provider = DialoguerPasswords;
    migrate::apply_env_to_encrypted(
        ctx.store(),
        ctx.env_file(),
        ctx.env(),
        ctx.file(),
        &mut provider,
    )?;

    if !cli.quiet {
        println!(
            "Encrypted settings written to {}",
            ctx.store().path().display()
        );
        println!("Removed {}", ctx.env_file().display());
    }
    Ok(())
}
