// ── Core error types ──
//
// What store consumers see when a gateway call fails. HTTP statuses and
// JSON parse failures stay below this line; `From<opsdesk_api::Error>`
// folds the transport taxonomy into these domain-facing variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to gateway at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Gateway request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Gateway errors (wrapped, not exposed raw) ────────────────────
    #[error("Gateway error: {message}")]
    Gateway {
        message: String,
        /// The gateway's own error code (e.g., `"23505"` for a unique
        /// constraint violation).
        code: Option<String>,
        /// HTTP status, when the request got far enough to have one.
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<opsdesk_api::Error> for CoreError {
    fn from(err: opsdesk_api::Error) -> Self {
        use opsdesk_api::Error as Api;

        match err {
            Api::Authentication { message } => CoreError::AuthenticationFailed { message },
            Api::InvalidApiKey => CoreError::AuthenticationFailed {
                message: "Invalid API key".into(),
            },
            Api::PermissionDenied { message } => CoreError::AuthenticationFailed {
                message: format!("Permission denied: {message}"),
            },
            // Connect-phase failures carry the URL when reqwest still
            // knows it; anything that is neither a timeout nor a connect
            // failure folds into Gateway with whatever status was seen.
            Api::Transport(ref e) => {
                if e.is_timeout() {
                    return CoreError::Timeout { timeout_secs: 0 };
                }
                if e.is_connect() {
                    let url = e.url().map_or_else(|| "<unknown>".into(), ToString::to_string);
                    return CoreError::ConnectionFailed {
                        url,
                        reason: e.to_string(),
                    };
                }
                CoreError::Gateway {
                    message: e.to_string(),
                    code: None,
                    status: e.status().map(|s| s.as_u16()),
                }
            }
            Api::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            Api::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            Api::Gateway {
                status,
                message,
                code,
            } => CoreError::Gateway {
                message,
                code,
                status: Some(status),
            },
            Api::NoRepresentation { collection } => CoreError::Internal(format!(
                "Gateway returned no representation for inserted {collection} row"
            )),
            Api::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}
