use thiserror::Error;

/// Top-level error type for the `opsdesk-api` crate.
///
/// Covers every failure mode of the Remote Data Gateway client:
/// authentication, transport, gateway-reported errors, and payload decoding.
/// `opsdesk-core` maps these into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Credential could not be used to build a request.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// API key rejected by the gateway.
    #[error("Invalid API key")]
    InvalidApiKey,

    /// The gateway's authorization layer denied the operation.
    #[error("Permission denied: {message}")]
    PermissionDenied { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// Failure raised by reqwest before any gateway response arrived
    /// (connection refused, DNS, timeout).
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The configured base URL did not parse.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Certificate loading or TLS client setup failed.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Gateway ─────────────────────────────────────────────────────
    /// Structured error reported by the gateway.
    #[error("Gateway error (HTTP {status}): {message}")]
    Gateway {
        message: String,
        code: Option<String>,
        status: u16,
    },

    /// An insert requested the stored row back but none came.
    #[error("Gateway returned no representation for insert into '{collection}'")]
    NoRepresentation { collection: String },

    // ── Data ────────────────────────────────────────────────────────
    /// The response body did not decode into the expected rows. The raw
    /// body rides along for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if the credential itself was the problem.
    pub fn is_auth(&self) -> bool {
        matches!(
            self,
            Self::Authentication { .. } | Self::InvalidApiKey | Self::PermissionDenied { .. }
        )
    }

    /// Whether the failure was a 404, from either layer.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            Self::Gateway { status: 404, .. } => true,
            _ => false,
        }
    }

    /// Extract the gateway error code, if available.
    pub fn gateway_error_code(&self) -> Option<&str> {
        match self {
            Self::Gateway { code, .. } => code.as_deref(),
            _ => None,
        }
    }
}
