// ── Cloud integration domain type ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::record_id::RecordId;

/// Supported cloud providers.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CloudProvider {
    Aws,
    Azure,
    Gcp,
}

impl CloudProvider {
    /// Region a fresh connection lands in when none is given.
    #[must_use]
    pub fn default_region(self) -> &'static str {
        match self {
            Self::Aws => "us-east-1",
            Self::Azure => "East US",
            Self::Gcp => "us-central1",
        }
    }

    /// Uppercase form used in user-facing notices.
    #[must_use]
    pub fn notice_name(self) -> String {
        self.to_string().to_uppercase()
    }
}

/// A customer's link to a cloud provider account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloudIntegration {
    pub id: RecordId,
    pub customer_id: RecordId,
    pub provider: CloudProvider,
    #[serde(default)]
    pub connected: bool,
    #[serde(default)]
    pub resources: i64,
    #[serde(default)]
    pub monthly_spend: f64,
    pub region: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}
