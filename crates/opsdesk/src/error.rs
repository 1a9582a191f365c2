//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors
//! with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use opsdesk_config::ConfigError;
use opsdesk_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to gateway at {url}")]
    #[diagnostic(
        code(opsdesk::connection_failed),
        help(
            "Check that the gateway is running and accessible.\n\
             URL: {url}\n\
             Self-signed certificate? Retry with --insecure (-k)."
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(opsdesk::auth_failed),
        help(
            "Verify your API key.\n\
             Run: opsdesk config set-key"
        )
    )]
    AuthFailed { message: String },

    #[error("No API key configured for profile '{profile}'")]
    #[diagnostic(
        code(opsdesk::no_credentials),
        help(
            "Configure credentials with: opsdesk config init\n\
             Or set the OPSDESK_API_KEY environment variable."
        )
    )]
    NoCredentials { profile: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(opsdesk::not_found),
        help("Run: opsdesk {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── Gateway ──────────────────────────────────────────────────────
    #[error("Gateway error ({code}): {message}")]
    #[diagnostic(code(opsdesk::gateway_error))]
    Gateway { code: String, message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(opsdesk::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(opsdesk::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: opsdesk config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No gateway configured")]
    #[diagnostic(
        code(opsdesk::no_gateway),
        help(
            "Create a config file with: opsdesk config init\n\
             Or pass --gateway / set OPSDESK_GATEWAY.\n\
             Expected config at: {path}"
        )
    )]
    NoGateway { path: String },

    #[error(transparent)]
    #[diagnostic(code(opsdesk::config))]
    Config(ConfigError),

    // ── Timeout ──────────────────────────────────────────────────────
    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(opsdesk::timeout),
        help("Increase timeout with --timeout or check gateway responsiveness.")
    )]
    Timeout { seconds: u64 },

    // ── IO ───────────────────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed {
                url,
                source: reason.into(),
            },

            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },

            CoreError::Timeout { timeout_secs } => CliError::Timeout {
                seconds: timeout_secs,
            },

            CoreError::Gateway {
                message,
                code,
                status: _,
            } => CliError::Gateway {
                code: code.unwrap_or_default(),
                message,
            },

            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },

            CoreError::Internal(message) => CliError::Gateway {
                code: "internal".into(),
                message,
            },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            other => CliError::Config(other),
        }
    }
}
