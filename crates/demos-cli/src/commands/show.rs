use demos_core::resolve::{Credential, ResolvedSettings, Source};
use demos_core::{Field, DEFAULT_RPC_URL};

use crate::app::AppContext;
use crate::cli::{Cli, ShowArgs};
use crate::commands::MASKED;

pub fn handle_show(cli: &Cli, args: &ShowArgs) -> anyhow::Result<()> {
    let ctx = AppContext::load(cli)?;
    let resolved = ctx.resolved();
    let record = ctx.provenance();

    if args.json {
        let mut fields = serde_json::Map::new();
        for (field, source) in record.iter() {
            fields.insert(
                field.env_var().to_string(),
                serde_json::json!({
                    "value": display_value(field, &resolved, source),
                    "source": source_label(field, source),
                }),
            );
        }
        let output = serde_json::json!({
            "config_file": ctx.store().path().display().to_string(),
            "fields": fields,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if !cli.quiet {
        println!("Priority: command line > environment (.env) > config file");
        println!(
            "Config file: {}{}",
            ctx.store().path().display(),
            if ctx.store().exists() { "" } else { " (absent)" }
        );
        println!();
    }
    for (field, source) in record.iter() {
        println!(
            "{:<14} {:<40} [{}]",
            field.env_var(),
            display_value(field, &resolved, source),
            source_label(field, source)
        );
    }
    Ok(())
}

fn display_value(field: Field, resolved: &ResolvedSettings, source: Source) -> String {
    match field {
        Field::PrivateKey => match resolved.credential {
            Credential::Unset => "(not set)".to_string(),
            // Never the actual value, whether plaintext or encrypted.
            _ => MASKED.to_string(),
        },
        Field::RpcUrl => match source {
            Source::Unset => DEFAULT_RPC_URL.to_string(),
            _ => resolved.rpc_url.clone().unwrap_or_else(|| "(not set)".to_string()),
        },
        Field::ReferralCode => resolved
            .referral_code
            .clone()
            .unwrap_or_else(|| "(not set)".to_string()),
    }
}

fn source_label(field: Field, source: Source) -> String {
    // The endpoint always resolves to something; an unset endpoint shows
    // the built-in default rather than "not set".
    if field == Field::RpcUrl && source == Source::Unset {
        return "default".to_string();
    }
    source.to_string()
}
