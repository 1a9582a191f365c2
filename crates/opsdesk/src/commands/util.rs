//! Shared helpers for command handlers.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use owo_colors::OwoColorize;
use tokio::sync::broadcast;

use opsdesk_core::{Notice, Severity};

use crate::error::CliError;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Parse a flag value through the domain enum's `FromStr`.
///
/// The wire names double as flag values ("in-progress", "gcp", ...), so a
/// failed parse is a usage error listing the accepted spellings.
pub fn parse_flag<T: FromStr>(field: &str, value: &str, expected: &str) -> Result<T, CliError> {
    value.parse().map_err(|_| CliError::Validation {
        field: field.into(),
        reason: format!("expected one of {expected}, got '{value}'"),
    })
}

/// Parse a date flag: bare date (midnight UTC) or full RFC 3339 timestamp.
pub fn parse_timestamp(field: &str, value: &str) -> Result<DateTime<Utc>, CliError> {
    if let Ok(ts) = value.parse::<DateTime<Utc>>() {
        return Ok(ts);
    }
    if let Ok(date) = NaiveDate::from_str(value) {
        return Ok(date.and_time(NaiveTime::MIN).and_utc());
    }
    Err(CliError::Validation {
        field: field.into(),
        reason: format!("expected YYYY-MM-DD or RFC 3339, got '{value}'"),
    })
}

/// Drain and print pending notices to stderr.
///
/// Success notices are suppressed by `--quiet`; failures always print.
pub fn report_notices(rx: &mut broadcast::Receiver<Notice>, quiet: bool, color: bool) {
    while let Ok(notice) = rx.try_recv() {
        match notice.severity {
            Severity::Success if quiet => {}
            Severity::Success if color => {
                eprintln!("{}", format!("✓ {}", notice.message).green());
            }
            Severity::Success => eprintln!("✓ {}", notice.message),
            Severity::Error if color => {
                eprintln!("{}", format!("✗ {}", notice.message).red());
            }
            Severity::Error => eprintln!("✗ {}", notice.message),
        }
    }
}
