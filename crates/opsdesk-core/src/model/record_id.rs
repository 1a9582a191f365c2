// ── Core identity type ──
//
// Every row the gateway hands back carries an opaque `id` column.
// RecordId wraps it so record identifiers never mix with other strings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Canonical identifier for any gateway-owned record.
///
/// Ids are assigned by the Remote Data Gateway at insert time and are
/// opaque here: this layer never mints one, compares them only for
/// equality, and round-trips them on the wire unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecordId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_owned()))
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn record_id_from_str() {
        let id: RecordId = "t1".parse().unwrap();
        assert_eq!(id.as_str(), "t1");
    }

    #[test]
    fn record_id_display() {
        let id = RecordId::from("c-42");
        assert_eq!(id.to_string(), "c-42");
    }

    #[test]
    fn record_id_serde_transparent() {
        let id = RecordId::from("t1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"t1\"");

        let back: RecordId = serde_json::from_str("\"t1\"").unwrap();
        assert_eq!(back, id);
    }
}
