// ── Typed gateway payloads ──
//
// `New*` types carry the fields an insert may set; the gateway fills in
// ids, sequence numbers, and timestamps. `*Patch` types are all-`Option`
// partial updates: only the fields present in the patch are serialized
// and sent, and only those fields are merged into the local record once
// the gateway confirms. An absent field means "leave it alone".

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::cloud::{CloudIntegration, CloudProvider};
use super::customer::{Customer, CustomerStatus};
use super::record_id::RecordId;
use super::ticket::{Ticket, TicketPriority, TicketStatus};

// ── Inserts ──

/// Payload for creating a customer.
#[derive(Debug, Clone, Serialize)]
pub struct NewCustomer {
    pub name: String,
    pub company: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<CustomerStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<RecordId>,
}

/// Payload for creating a ticket.
#[derive(Debug, Clone, Serialize)]
pub struct NewTicket {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TicketStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<TicketPriority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<RecordId>,
}

/// Payload for creating a cloud integration.
#[derive(Debug, Clone, Serialize)]
pub struct NewIntegration {
    pub customer_id: RecordId,
    pub provider: CloudProvider,
    pub connected: bool,
    pub resources: i64,
    pub monthly_spend: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

// ── Partial updates ──

/// Changed fields for a customer update.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CustomerPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<CustomerStatus>,
}

impl CustomerPatch {
    /// True when no fields are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.company.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.location.is_none()
            && self.status.is_none()
    }

    pub(crate) fn apply_to(&self, customer: &mut Customer) {
        if let Some(ref name) = self.name {
            customer.name = name.clone();
        }
        if let Some(ref company) = self.company {
            customer.company = company.clone();
        }
        if let Some(ref email) = self.email {
            customer.email = email.clone();
        }
        if let Some(ref phone) = self.phone {
            customer.phone = Some(phone.clone());
        }
        if let Some(ref location) = self.location {
            customer.location = Some(location.clone());
        }
        if let Some(status) = self.status {
            customer.status = status;
        }
    }
}

/// Changed fields for a ticket update.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TicketPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TicketStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<TicketPriority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<DateTime<Utc>>,
}

impl TicketPatch {
    /// True when no fields are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.priority.is_none()
            && self.assigned_to.is_none()
            && self.customer_id.is_none()
            && self.due_date.is_none()
            && self.resolved_at.is_none()
    }

    pub(crate) fn apply_to(&self, ticket: &mut Ticket) {
        if let Some(ref title) = self.title {
            ticket.title = title.clone();
        }
        if let Some(ref description) = self.description {
            ticket.description = Some(description.clone());
        }
        if let Some(status) = self.status {
            ticket.status = status;
        }
        if let Some(priority) = self.priority {
            ticket.priority = priority;
        }
        if let Some(ref assigned_to) = self.assigned_to {
            ticket.assigned_to = Some(assigned_to.clone());
        }
        if let Some(ref customer_id) = self.customer_id {
            ticket.customer_id = Some(customer_id.clone());
        }
        if let Some(due_date) = self.due_date {
            ticket.due_date = Some(due_date);
        }
        if let Some(resolved_at) = self.resolved_at {
            ticket.resolved_at = Some(resolved_at);
        }
    }
}

/// Changed fields for a cloud integration update.
#[derive(Debug, Clone, Default, Serialize)]
pub struct IntegrationPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<CloudProvider>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connected: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resources: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_spend: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

impl IntegrationPatch {
    /// True when no fields are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.provider.is_none()
            && self.customer_id.is_none()
            && self.connected.is_none()
            && self.resources.is_none()
            && self.monthly_spend.is_none()
            && self.region.is_none()
    }

    pub(crate) fn apply_to(&self, integration: &mut CloudIntegration) {
        if let Some(provider) = self.provider {
            integration.provider = provider;
        }
        if let Some(ref customer_id) = self.customer_id {
            integration.customer_id = customer_id.clone();
        }
        if let Some(connected) = self.connected {
            integration.connected = connected;
        }
        if let Some(resources) = self.resources {
            integration.resources = resources;
        }
        if let Some(monthly_spend) = self.monthly_spend {
            integration.monthly_spend = monthly_spend;
        }
        if let Some(ref region) = self.region {
            integration.region = Some(region.clone());
        }
    }
}
