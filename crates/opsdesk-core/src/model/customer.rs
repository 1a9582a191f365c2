// ── Customer domain type ──

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::record_id::RecordId;

/// Customer lifecycle status.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CustomerStatus {
    #[default]
    Active,
    Inactive,
    Pending,
}

/// An organization the desk does work for.
///
/// `id`, `join_date`, and the timestamps are gateway-assigned; everything
/// else comes from operators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: RecordId,
    pub name: String,
    pub company: String,
    pub email: String,
    pub phone: Option<String>,
    pub location: Option<String>,
    #[serde(default)]
    pub status: CustomerStatus,
    pub join_date: Option<NaiveDate>,
    pub created_by: Option<RecordId>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}
