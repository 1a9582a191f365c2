// ── Ticket domain type ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::record_id::RecordId;

/// Workflow state of a ticket.
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
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum TicketStatus {
    #[default]
    Open,
    InProgress,
    Resolved,
    Closed,
}

/// Urgency of a ticket.
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
pub enum TicketPriority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

/// A unit of support work.
///
/// `ticket_number` is a gateway sequence (`INC-1001`, `INC-1002`, ...)
/// assigned once at creation and never set by clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticket {
    pub id: RecordId,
    pub ticket_number: String,
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub status: TicketStatus,
    #[serde(default)]
    pub priority: TicketPriority,
    pub created_by: Option<RecordId>,
    pub assigned_to: Option<RecordId>,
    pub customer_id: Option<RecordId>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub due_date: Option<DateTime<Utc>>,
}
