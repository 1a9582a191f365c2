//! Shared configuration for the opsdesk CLI.
//!
//! TOML profiles, credential resolution (keyring + env + plaintext),
//! and translation to `opsdesk_core::GatewayConfig`. The CLI adds
//! flag-aware overrides on top.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use opsdesk_core::{GatewayConfig, TlsVerification};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no API key configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named gateway profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

/// Workspace-wide defaults, overridable per invocation by CLI flags.
#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct Defaults {
    pub output: String,
    pub color: String,
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: "table".into(),
            color: "auto".into(),
            timeout: 30,
        }
    }
}

/// A named gateway profile.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Profile {
    /// Gateway base URL (e.g., "https://desk.example.com").
    pub gateway: String,

    /// API key (plaintext — prefer keyring or env var).
    pub api_key: Option<String>,

    /// Environment variable name containing the API key.
    pub api_key_env: Option<String>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Skip TLS verification.
    pub insecure: Option<bool>,

    /// Override timeout (seconds).
    pub timeout: Option<u64>,
}

impl Profile {
    /// A profile with only a gateway URL set.
    #[must_use]
    pub fn for_gateway(gateway: impl Into<String>) -> Self {
        Self {
            gateway: gateway.into(),
            api_key: None,
            api_key_env: None,
            ca_cert: None,
            insecure: None,
            timeout: None,
        }
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    let dir = ProjectDirs::from("com", "opsdesk", "opsdesk")
        .map_or_else(dirs_fallback, |dirs| dirs.config_dir().to_path_buf());
    dir.join("config.toml")
}

fn dirs_fallback() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
    PathBuf::from(home).join(".config").join("opsdesk")
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    let path = config_path();

    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(&path))
        .merge(Env::prefixed("OPSDESK_").split("_"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
#[must_use]
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    let path = config_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(&path, toml_str)?;
    Ok(())
}

// ── Credential resolution (without CLI flags) ───────────────────────

/// Resolve an API key from the credential chain (no CLI flag step).
///
/// Order: profile's `api_key_env` env var, system keyring, plaintext
/// `api_key` in the config file.
pub fn resolve_api_key(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    // Named env var first
    if let Some(ref env_name) = profile.api_key_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    // Then the system keyring
    let entry = keyring::Entry::new("opsdesk", &format!("{profile_name}/api-key"));
    if let Ok(secret) = entry.and_then(|e| e.get_password()) {
        return Ok(SecretString::from(secret));
    }

    // Plaintext in the config file as a last resort
    if let Some(ref key) = profile.api_key {
        return Ok(SecretString::from(key.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Store an API key in the system keyring for a profile.
pub fn store_api_key(profile_name: &str, api_key: &str) -> Result<(), keyring::Error> {
    let entry = keyring::Entry::new("opsdesk", &format!("{profile_name}/api-key"))?;
    entry.set_password(api_key)
}

// ── Profile translation ─────────────────────────────────────────────

/// Build a `GatewayConfig` from a profile — no CLI flag overrides.
pub fn profile_to_gateway_config(
    profile: &Profile,
    profile_name: &str,
) -> Result<GatewayConfig, ConfigError> {
    let url: url::Url = profile.gateway.parse().map_err(|_| ConfigError::Validation {
        field: "gateway".into(),
        reason: format!("invalid URL: {}", profile.gateway),
    })?;

    let api_key = resolve_api_key(profile, profile_name)?;

    let tls = if profile.insecure.unwrap_or(false) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    let timeout = Duration::from_secs(profile.timeout.unwrap_or(30));

    Ok(GatewayConfig {
        url,
        api_key,
        tls,
        timeout,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    fn plaintext_profile() -> Profile {
        Profile {
            api_key: Some("sk-plain".into()),
            ..Profile::for_gateway("https://desk.example.com")
        }
    }

    #[test]
    fn defaults_are_sensible() {
        let config = Config::default();
        assert_eq!(config.default_profile.as_deref(), Some("default"));
        assert_eq!(config.defaults.output, "table");
        assert_eq!(config.defaults.color, "auto");
        assert_eq!(config.defaults.timeout, 30);
        assert!(config.profiles.is_empty());
    }

    #[test]
    fn plaintext_key_resolves() {
        let profile = plaintext_profile();
        let key = resolve_api_key(&profile, "default").unwrap();
        assert_eq!(key.expose_secret(), "sk-plain");
    }

    #[test]
    fn missing_key_is_no_credentials() {
        let profile = Profile::for_gateway("https://desk.example.com");
        let err = resolve_api_key(&profile, "staging").unwrap_err();
        assert!(
            matches!(err, ConfigError::NoCredentials { ref profile } if profile == "staging"),
            "expected NoCredentials, got: {err:?}"
        );
    }

    #[test]
    fn profile_maps_tls_settings() {
        let mut profile = plaintext_profile();
        let config = profile_to_gateway_config(&profile, "default").unwrap();
        assert_eq!(config.tls, TlsVerification::SystemDefaults);
        assert_eq!(config.timeout, Duration::from_secs(30));

        profile.ca_cert = Some(PathBuf::from("/etc/ssl/corp-ca.pem"));
        let config = profile_to_gateway_config(&profile, "default").unwrap();
        assert_eq!(
            config.tls,
            TlsVerification::CustomCa(PathBuf::from("/etc/ssl/corp-ca.pem"))
        );

        profile.insecure = Some(true);
        let config = profile_to_gateway_config(&profile, "default").unwrap();
        assert_eq!(config.tls, TlsVerification::DangerAcceptInvalid);

        profile.timeout = Some(5);
        let config = profile_to_gateway_config(&profile, "default").unwrap();
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn invalid_gateway_url_is_rejected() {
        let profile = Profile {
            api_key: Some("sk-plain".into()),
            ..Profile::for_gateway("not a url")
        };
        let err = profile_to_gateway_config(&profile, "default").unwrap_err();
        assert!(
            matches!(err, ConfigError::Validation { ref field, .. } if field == "gateway"),
            "expected Validation on gateway, got: {err:?}"
        );
    }
}
