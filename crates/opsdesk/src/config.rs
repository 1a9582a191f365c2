//! Flag-aware configuration resolution.
//!
//! `opsdesk_config` owns the file format and the credential chain; this
//! module layers `GlobalOpts` on top so `--gateway`, `--api-key`, and
//! friends override whatever the profile says.

use std::time::Duration;

use secrecy::SecretString;

use opsdesk_core::{GatewayConfig, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use opsdesk_config::{
    Config, Defaults, Profile, config_path, load_config_or_default, save_config,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Selection order: `--profile` flag, the file's `default_profile`,
/// then the literal name `default`.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Build a `GatewayConfig` from the config file, profile, and CLI overrides.
pub fn gateway_config(global: &GlobalOpts) -> Result<GatewayConfig, CliError> {
    let cfg = load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);

    // If a profile exists, use it with CLI flag overrides
    if let Some(profile) = cfg.profiles.get(&profile_name) {
        return resolve_profile(profile, &profile_name, global, &cfg);
    }

    // An explicitly requested profile that doesn't exist is an error,
    // not a fall-through to bare flags.
    if global.profile.is_some() {
        return Err(CliError::ProfileNotFound {
            name: profile_name,
            available: available_profiles(&cfg),
        });
    }

    // No profile found -- try to build from CLI flags / env vars alone
    let url_str = global
        .gateway
        .as_deref()
        .ok_or_else(|| CliError::NoGateway {
            path: config_path().display().to_string(),
        })?;
    let url = parse_gateway_url(url_str)?;

    let api_key = global
        .api_key
        .as_ref()
        .map(|key| SecretString::from(key.clone()))
        .ok_or(CliError::NoCredentials {
            profile: profile_name,
        })?;

    let tls = if global.insecure {
        TlsVerification::DangerAcceptInvalid
    } else {
        TlsVerification::SystemDefaults
    };

    Ok(GatewayConfig {
        url,
        api_key,
        tls,
        timeout: Duration::from_secs(global.timeout.unwrap_or(cfg.defaults.timeout)),
    })
}

/// Merge one profile with the global flags. Flags win wherever both
/// have an opinion.
fn resolve_profile(
    profile: &Profile,
    profile_name: &str,
    global: &GlobalOpts,
    cfg: &Config,
) -> Result<GatewayConfig, CliError> {
    // 1. Gateway URL
    let url_str = global.gateway.as_deref().unwrap_or(&profile.gateway);
    let url = parse_gateway_url(url_str)?;

    // 2. API key (CLI flag beats the profile's credential chain)
    let api_key = match global.api_key {
        Some(ref key) => SecretString::from(key.clone()),
        None => opsdesk_config::resolve_api_key(profile, profile_name)?,
    };

    // 3. TLS verification
    let tls = if global.insecure || profile.insecure.unwrap_or(false) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    // 4. Timeout (flag > profile > defaults)
    let seconds = global
        .timeout
        .or(profile.timeout)
        .unwrap_or(cfg.defaults.timeout);

    Ok(GatewayConfig {
        url,
        api_key,
        tls,
        timeout: Duration::from_secs(seconds),
    })
}

/// Comma-separated profile names for error messages, or "(none)".
pub fn available_profiles(cfg: &Config) -> String {
    if cfg.profiles.is_empty() {
        return "(none)".into();
    }
    let mut names: Vec<_> = cfg.profiles.keys().cloned().collect();
    names.sort();
    names.join(", ")
}

fn parse_gateway_url(url_str: &str) -> Result<url::Url, CliError> {
    url_str.parse().map_err(|_| CliError::Validation {
        field: "gateway".into(),
        reason: format!("invalid URL: {url_str}"),
    })
}
