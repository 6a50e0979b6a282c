use zeroize::Zeroizing;

use demos_core::resolve::Source;
use demos_core::{Field, SecretGate};

use crate::app::{AppContext, DialoguerPasswords};
use crate::cli::Cli;

/// Onboarding diagnostic: resolve the settings and read the credential
/// through the gate, prompting if the stored copy is encrypted. Succeeds
/// only when a downstream command would also succeed.
pub fn handle_check(cli: &Cli) -> anyhow::Result<()> {
    let ctx = AppContext::load(cli)?;
    let resolved = ctx.resolved();
    let record = ctx.provenance();

    let mut gate = SecretGate::new(&resolved, DialoguerPasswords);
    if gate.requires_password() && !cli.quiet {
        println!("Stored credential is encrypted; password required.");
    }

    // Read through the gate and drop the plaintext immediately.
    let _credential = Zeroizing::new(gate.credential()?);

    if !cli.quiet {
        println!(
            "Credential: OK [{}]",
            record.source(Field::PrivateKey)
        );
        println!("Endpoint:   {}", gate.rpc_url());
        match record.source(Field::ReferralCode) {
            Source::Unset => println!("Referral:   (not set)"),
            source => println!(
                "Referral:   {} [{}]",
                resolved.referral_code.as_deref().unwrap_or(""),
                source
            ),
        }
    }
    Ok(())
}
