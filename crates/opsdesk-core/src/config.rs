// ── Runtime connection configuration ──
//
// These types describe *how* to reach the Remote Data Gateway. They
// carry credential data and connection tuning, but never touch disk.
// The CLI constructs a `GatewayConfig` and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use opsdesk_api::{TlsMode, TransportConfig};
use secrecy::SecretString;
use url::Url;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification entirely.
    DangerAcceptInvalid,
}

/// Configuration for connecting to a single gateway.
///
/// Built by the CLI, passed to `Workspace` -- core never reads config
/// files.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Gateway URL (e.g., `https://desk.example.com`).
    pub url: Url,
    /// API key, sent on every request.
    pub api_key: SecretString,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Request timeout.
    pub timeout: Duration,
}

impl GatewayConfig {
    /// Config with default TLS and timeout settings.
    #[must_use]
    pub fn new(url: Url, api_key: SecretString) -> Self {
        Self {
            url,
            api_key,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
        }
    }

    pub(crate) fn transport(&self) -> TransportConfig {
        let tls = match &self.tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        };

        TransportConfig {
            tls,
            timeout: self.timeout,
        }
    }
}
