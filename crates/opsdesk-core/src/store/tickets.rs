// ── Ticket store ──

use std::sync::Arc;

use opsdesk_api::GatewayClient;
use tokio::sync::watch;
use tracing::{debug, warn};

use super::records::{Keyed, RecordSet};
use super::StoreState;
use crate::error::CoreError;
use crate::model::requests::{NewTicket, TicketPatch};
use crate::model::{RecordId, Ticket, TicketStatus};
use crate::notify::Notifier;

impl Keyed for Ticket {
    fn id(&self) -> &RecordId {
        &self.id
    }
}

/// Client-side store for the `tickets` collection.
///
/// Holds the gateway-ordered list (newest first) and applies confirmed
/// mutations to it. Nothing is written locally before the gateway
/// answers; failed calls leave the list exactly as it was.
pub struct TicketStore {
    gateway: Arc<GatewayClient>,
    records: RecordSet<Ticket>,
    state: watch::Sender<StoreState>,
    notifier: Notifier,
}

impl TicketStore {
    const COLLECTION: &'static str = "tickets";

    pub(crate) fn new(gateway: Arc<GatewayClient>, notifier: Notifier) -> Self {
        let (state, _) = watch::channel(StoreState::Loading);
        Self {
            gateway,
            records: RecordSet::new(),
            state,
            notifier,
        }
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// Current snapshot, most recently created first.
    #[must_use]
    pub fn list(&self) -> Arc<Vec<Arc<Ticket>>> {
        self.records.snapshot()
    }

    /// Linear scan for a ticket by id.
    #[must_use]
    pub fn get_by_id(&self, id: &RecordId) -> Option<Arc<Ticket>> {
        self.records.get(id)
    }

    #[must_use]
    pub fn state(&self) -> StoreState {
        *self.state.borrow()
    }

    /// Subscribe to load state changes.
    #[must_use]
    pub fn subscribe_state(&self) -> watch::Receiver<StoreState> {
        self.state.subscribe()
    }

    /// Subscribe to list changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Arc<Vec<Arc<Ticket>>>> {
        self.records.subscribe()
    }

    // ── Mutations ────────────────────────────────────────────────────

    /// Create a ticket and prepend the row the gateway stored.
    ///
    /// Status defaults to `open` when the caller leaves it unset. The
    /// gateway assigns `id`, `ticket_number`, and timestamps.
    pub async fn create(&self, mut new: NewTicket) -> Result<Arc<Ticket>, CoreError> {
        new.status.get_or_insert(TicketStatus::Open);

        match self
            .gateway
            .insert_returning::<Ticket, _>(Self::COLLECTION, &new)
            .await
        {
            Ok(stored) => {
                let stored = self.records.prepend(stored);
                self.notifier.success("Ticket created successfully");
                Ok(stored)
            }
            Err(e) => {
                warn!(error = %e, "ticket create failed");
                self.notifier.error("Failed to create ticket");
                Err(e.into())
            }
        }
    }

    /// Send changed fields to the gateway, then merge them into the
    /// matching local row.
    ///
    /// The gateway confirms with no representation, so fields it
    /// computes on its side (`updated_at`, ...) drift locally until the
    /// next [`refresh`](Self::refresh). A patch matching no row is
    /// still a success on both sides; the local list is left as is.
    pub async fn update(&self, id: &RecordId, patch: TicketPatch) -> Result<(), CoreError> {
        match self
            .gateway
            .update_by_id(Self::COLLECTION, id.as_str(), &patch)
            .await
        {
            Ok(()) => {
                self.records.merge(id, |ticket| patch.apply_to(ticket));
                self.notifier.success("Ticket updated successfully");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "ticket update failed");
                self.notifier.error("Failed to update ticket");
                Err(e.into())
            }
        }
    }

    /// Delete a ticket and drop the local row.
    pub async fn delete(&self, id: &RecordId) -> Result<(), CoreError> {
        match self
            .gateway
            .delete_by_id(Self::COLLECTION, id.as_str())
            .await
        {
            Ok(()) => {
                self.records.remove(id);
                self.notifier.success("Ticket deleted successfully");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "ticket delete failed");
                self.notifier.error("Failed to delete ticket");
                Err(e.into())
            }
        }
    }

    /// Re-fetch the full list and replace the local one wholesale.
    ///
    /// This is the only reconciliation path: whatever the gateway
    /// returns becomes the list, drift and all.
    pub async fn refresh(&self) -> Result<(), CoreError> {
        let outcome = match self.gateway.fetch_ordered::<Ticket>(Self::COLLECTION).await {
            Ok(rows) => {
                self.records.replace_all(rows);
                debug!(count = self.records.len(), "tickets refreshed");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "ticket refresh failed");
                self.notifier.error("Failed to load tickets");
                Err(e.into())
            }
        };

        // The first completed attempt flips the store out of Loading,
        // fetched or failed.
        self.state.send_if_modified(|state| {
            if *state == StoreState::Loading {
                *state = StoreState::Ready;
                true
            } else {
                false
            }
        });

        outcome
    }
}
