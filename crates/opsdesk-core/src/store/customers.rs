// ── Customer store ──

use std::sync::Arc;

use opsdesk_api::GatewayClient;
use tokio::sync::watch;
use tracing::{debug, warn};

use super::records::{Keyed, RecordSet};
use super::StoreState;
use crate::error::CoreError;
use crate::model::requests::{CustomerPatch, NewCustomer};
use crate::model::{Customer, RecordId};
use crate::notify::Notifier;

impl Keyed for Customer {
    fn id(&self) -> &RecordId {
        &self.id
    }
}

/// Client-side store for the `customers` collection.
pub struct CustomerStore {
    gateway: Arc<GatewayClient>,
    records: RecordSet<Customer>,
    state: watch::Sender<StoreState>,
    notifier: Notifier,
}

impl CustomerStore {
    const COLLECTION: &'static str = "customers";

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
    pub fn list(&self) -> Arc<Vec<Arc<Customer>>> {
        self.records.snapshot()
    }

    /// Linear scan for a customer by id.
    #[must_use]
    pub fn get_by_id(&self, id: &RecordId) -> Option<Arc<Customer>> {
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
    pub fn subscribe(&self) -> watch::Receiver<Arc<Vec<Arc<Customer>>>> {
        self.records.subscribe()
    }

    // ── Mutations ────────────────────────────────────────────────────

    /// Create a customer and prepend the row the gateway stored.
    pub async fn create(&self, new: NewCustomer) -> Result<Arc<Customer>, CoreError> {
        match self
            .gateway
            .insert_returning::<Customer, _>(Self::COLLECTION, &new)
            .await
        {
            Ok(stored) => {
                let stored = self.records.prepend(stored);
                self.notifier.success("Customer created successfully");
                Ok(stored)
            }
            Err(e) => {
                warn!(error = %e, "customer create failed");
                self.notifier.error("Failed to create customer");
                Err(e.into())
            }
        }
    }

    /// Send changed fields to the gateway, then merge them into the
    /// matching local row. See [`TicketStore::update`] for the drift
    /// and zero-match caveats; they apply here unchanged.
    ///
    /// [`TicketStore::update`]: super::TicketStore::update
    pub async fn update(&self, id: &RecordId, patch: CustomerPatch) -> Result<(), CoreError> {
        match self
            .gateway
            .update_by_id(Self::COLLECTION, id.as_str(), &patch)
            .await
        {
            Ok(()) => {
                self.records.merge(id, |customer| patch.apply_to(customer));
                self.notifier.success("Customer updated successfully");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "customer update failed");
                self.notifier.error("Failed to update customer");
                Err(e.into())
            }
        }
    }

    /// Delete a customer and drop the local row.
    pub async fn delete(&self, id: &RecordId) -> Result<(), CoreError> {
        match self
            .gateway
            .delete_by_id(Self::COLLECTION, id.as_str())
            .await
        {
            Ok(()) => {
                self.records.remove(id);
                self.notifier.success("Customer deleted successfully");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "customer delete failed");
                self.notifier.error("Failed to delete customer");
                Err(e.into())
            }
        }
    }

    /// Re-fetch the full list and replace the local one wholesale.
    pub async fn refresh(&self) -> Result<(), CoreError> {
        let outcome = match self
            .gateway
            .fetch_ordered::<Customer>(Self::COLLECTION)
            .await
        {
            Ok(rows) => {
                self.records.replace_all(rows);
                debug!(count = self.records.len(), "customers refreshed");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "customer refresh failed");
                self.notifier.error("Failed to load customers");
                Err(e.into())
            }
        };

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
