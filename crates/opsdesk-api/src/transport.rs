// HTTP client construction shared by every gateway consumer.
//
// One `TransportConfig` describes TLS trust, the request timeout, and
// the user agent; `GatewayClient` layers its auth headers on top via
// `build_client_with_headers`.

use std::path::PathBuf;
use std::time::Duration;

use reqwest::header::HeaderMap;

use crate::error::Error;

/// How server certificates are verified.
#[derive(Debug, Clone)]
pub enum TlsMode {
    /// Trust the system certificate store.
    System,
    /// Trust an additional CA loaded from the given PEM file.
    CustomCa(PathBuf),
    /// Accept any certificate (self-hosted gateways on private CAs).
    DangerAcceptInvalid,
}

/// Transport settings applied to every HTTP client this crate builds.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub tls: TlsMode,
    pub timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            tls: TlsMode::System,
            timeout: Duration::from_secs(30),
        }
    }
}

impl TransportConfig {
    /// Build a plain client with no extra default headers.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        self.build_client_with_headers(HeaderMap::new())
    }

    /// Build a client carrying `headers` on every request.
    ///
    /// The gateway client passes its `apikey` / `Authorization` pair
    /// here so auth never has to be re-attached per call.
    pub fn build_client_with_headers(&self, headers: HeaderMap) -> Result<reqwest::Client, Error> {
        let builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent("opsdesk/0.1.0")
            .default_headers(headers);

        let builder = match &self.tls {
            TlsMode::System => builder,
            TlsMode::CustomCa(path) => {
                let pem = std::fs::read(path).map_err(|e| {
                    Error::Tls(format!("cannot read CA certificate {}: {e}", path.display()))
                })?;
                let ca = reqwest::Certificate::from_pem(&pem)
                    .map_err(|e| Error::Tls(format!("invalid CA certificate: {e}")))?;
                builder.add_root_certificate(ca)
            }
            TlsMode::DangerAcceptInvalid => builder.danger_accept_invalid_certs(true),
        };

        builder
            .build()
            .map_err(|e| Error::Tls(format!("failed to build HTTP client: {e}")))
    }
}
