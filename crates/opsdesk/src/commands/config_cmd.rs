//! `config` subcommand: init wizard, key storage, and profile listing.
//!
//! These handlers run before any gateway connection exists, so they work
//! against the raw `Config` rather than a resolved profile.

use std::collections::HashMap;

use dialoguer::{Input, Select};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Defaults, Profile};
use crate::error::CliError;
use crate::output;

// ── Helpers ─────────────────────────────────────────────────────────

/// Render the config as TOML-shaped text with the API key masked.
fn format_config_redacted(cfg: &Config) -> String {
    use std::fmt::Write;
    let mut out = String::new();

    if let Some(ref default) = cfg.default_profile {
        let _ = writeln!(out, "default_profile = \"{default}\"");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = writeln!(out, "color = \"{}\"", cfg.defaults.color);
    let _ = writeln!(out, "timeout = {}", cfg.defaults.timeout);

    let mut names: Vec<_> = cfg.profiles.keys().collect();
    names.sort();
    for name in names {
        let p = &cfg.profiles[name];
        let _ = writeln!(out);
        let _ = writeln!(out, "[profiles.{name}]");
        let _ = writeln!(out, "gateway = \"{}\"", p.gateway);
        if p.api_key.is_some() {
            let _ = writeln!(out, "api_key = \"****\"");
        }
        if let Some(ref env) = p.api_key_env {
            let _ = writeln!(out, "api_key_env = \"{env}\"");
        }
        if let Some(ref ca) = p.ca_cert {
            let _ = writeln!(out, "ca_cert = \"{}\"", ca.display());
        }
        if let Some(insecure) = p.insecure {
            let _ = writeln!(out, "insecure = {insecure}");
        }
        if let Some(timeout) = p.timeout {
            let _ = writeln!(out, "timeout = {timeout}");
        }
    }

    out
}

/// Convert a failed interactive prompt into a usage error.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// Prompt for a non-empty API key without echoing it.
fn prompt_api_key() -> Result<String, CliError> {
    let key = rpassword::prompt_password("API key: ").map_err(prompt_err)?;
    if key.is_empty() {
        return Err(CliError::Validation {
            field: "api_key".into(),
            reason: "API key cannot be empty".into(),
        });
    }
    Ok(key)
}

/// Offer to store the API key in the system keyring or return it for
/// plaintext config.
///
/// Returns `Some(key)` if the user chose plaintext, `None` if stored in
/// the keyring.
fn prompt_keyring_storage(key: &str, profile_name: &str) -> Result<Option<String>, CliError> {
    let choices = &[
        "System keyring (recommended)",
        "Config file (plaintext)",
    ];
    let selection = Select::new()
        .with_prompt("Where to store the API key?")
        .items(choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    if selection == 0 {
        store_in_keyring(profile_name, key)?;
        eprintln!("   ✓ API key stored in system keyring");
        Ok(None)
    } else {
        Ok(Some(key.to_owned()))
    }
}

fn store_in_keyring(profile_name: &str, key: &str) -> Result<(), CliError> {
    opsdesk_config::store_api_key(profile_name, key).map_err(|e| CliError::Validation {
        field: "keyring".into(),
        reason: format!("failed to store API key in keyring: {e}"),
    })
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let config_file = config::config_path();
            eprintln!("opsdesk configuration wizard");
            eprintln!("   Config path: {}\n", config_file.display());

            // 1. Profile name
            let profile_name: String = Input::new()
                .with_prompt("Profile name")
                .default("default".into())
                .interact_text()
                .map_err(prompt_err)?;

            // 2. Gateway URL
            let gateway: String = Input::new()
                .with_prompt("Gateway URL")
                .default("https://desk.example.com".into())
                .interact_text()
                .map_err(prompt_err)?;

            // 3. API key
            let key = prompt_api_key()?;
            let api_key = prompt_keyring_storage(&key, &profile_name)?;

            // 4. Build profile and config
            let mut profile = Profile::for_gateway(gateway);
            profile.api_key = api_key;

            let mut profiles = HashMap::new();
            profiles.insert(profile_name.clone(), profile);

            let cfg = Config {
                default_profile: Some(profile_name.clone()),
                defaults: Defaults::default(),
                profiles,
            };

            // 5. Write config
            config::save_config(&cfg)?;

            eprintln!("\n✓ Configuration written to {}", config_file.display());
            eprintln!("  Default profile: {profile_name}");
            eprintln!("\n  Test it: opsdesk refresh");

            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = config::load_config_or_default();
            let out = output::render_single(&global.output, &cfg, format_config_redacted, |_| {
                "config".into()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── SetKey ──────────────────────────────────────────────────
        ConfigCommand::SetKey { profile } => {
            let cfg = config::load_config_or_default();
            let profile_name = profile.unwrap_or_else(|| config::active_profile_name(global, &cfg));

            if !cfg.profiles.contains_key(&profile_name) {
                return Err(CliError::ProfileNotFound {
                    name: profile_name,
                    available: config::available_profiles(&cfg),
                });
            }

            let key = prompt_api_key()?;
            store_in_keyring(&profile_name, &key)?;

            eprintln!("✓ API key stored in system keyring for profile '{profile_name}'");
            Ok(())
        }

        // ── Path ────────────────────────────────────────────────────
        ConfigCommand::Path => {
            println!("{}", config::config_path().display());
            Ok(())
        }

        // ── Profiles ────────────────────────────────────────────────
        ConfigCommand::Profiles => {
            let cfg = config::load_config_or_default();
            let default = cfg.default_profile.as_deref().unwrap_or("default");
            if cfg.profiles.is_empty() {
                eprintln!("No profiles configured. Run: opsdesk config init");
            } else {
                let mut names: Vec<_> = cfg.profiles.keys().collect();
                names.sort();
                for name in names {
                    let marker = if name == default { " *" } else { "" };
                    println!("{name}{marker}");
                }
            }
            Ok(())
        }
    }
}
