use demos_core::resolve::Credential;
use demos_core::{CoreError, Settings, StoredConfig, DEFAULT_RPC_URL};

use crate::app::AppContext;
use crate::cli::{Cli, InitArgs};

pub fn handle_init(cli: &Cli, args: &InitArgs) -> anyhow::Result<()> {
    let ctx = AppContext::load(cli)?;

    // Refuse to silently discard an encrypted credential.
    if let Some(StoredConfig::Encrypted {
        credential: Some(_),
        ..
    }) = ctx.file()
    {
        if !args.force {
            return Err(CoreError::Precondition(format!(
                "config file {} holds an encrypted credential; pass --force to overwrite it",
                ctx.store().path().display()
            ))
            .into());
        }
    }

    let resolved = ctx.resolved();
    let settings = Settings {
        // Only a plaintext-resolved credential carries over; an encrypted
        // one is never decrypted here.
        private_key: match &resolved.credential {
            Credential::Plain(value) => Some(value.clone()),
            _ => None,
        },
        rpc_url: Some(
            resolved
                .rpc_url
                .clone()
                .unwrap_or_else(|| DEFAULT_RPC_URL.to_string()),
        ),
        referral_code: resolved.referral_code.clone(),
    };

    ctx.store().write_plain(&settings)?;

    if !cli.quiet {
        println!("Wrote {}", ctx.store().path().display());
        if settings.private_key.is_none() {
            println!();
            println!("No credential configured yet. Edit PRIVATE_KEY in the file,");
            println!("or run `demostools config apply-env` to encrypt one from .env.");
        }
    }
    Ok(())
}
