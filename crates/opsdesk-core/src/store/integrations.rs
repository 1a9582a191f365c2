// ── Cloud integration store ──
//
// Generic CRUD plus the provider lifecycle: connect, disconnect, and
// resource sync. Inventory figures are simulated until real provider
// APIs are wired up.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use opsdesk_api::GatewayClient;
use tokio::sync::watch;
use tracing::{debug, warn};

use super::records::{Keyed, RecordSet};
use super::StoreState;
use crate::error::CoreError;
use crate::model::requests::{IntegrationPatch, NewIntegration};
use crate::model::{CloudIntegration, CloudProvider, RecordId};
use crate::notify::Notifier;

impl Keyed for CloudIntegration {
    fn id(&self) -> &RecordId {
        &self.id
    }
}

/// Client-side store for the `cloud_integrations` collection.
pub struct IntegrationStore {
    gateway: Arc<GatewayClient>,
    records: RecordSet<CloudIntegration>,
    state: watch::Sender<StoreState>,
    notifier: Notifier,
}

impl IntegrationStore {
    const COLLECTION: &'static str = "cloud_integrations";

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
    pub fn list(&self) -> Arc<Vec<Arc<CloudIntegration>>> {
        self.records.snapshot()
    }

    /// Linear scan for an integration by id.
    #[must_use]
    pub fn get_by_id(&self, id: &RecordId) -> Option<Arc<CloudIntegration>> {
        self.records.get(id)
    }

    /// Integrations owned by a customer. Linear scan, fresh allocation.
    #[must_use]
    pub fn for_customer(&self, customer_id: &RecordId) -> Vec<Arc<CloudIntegration>> {
        self.records
            .snapshot()
            .iter()
            .filter(|integration| integration.customer_id == *customer_id)
            .cloned()
            .collect()
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
    pub fn subscribe(&self) -> watch::Receiver<Arc<Vec<Arc<CloudIntegration>>>> {
        self.records.subscribe()
    }

    // ── Generic mutations ────────────────────────────────────────────

    /// Create an integration row as given and prepend the stored row.
    ///
    /// Most callers want [`connect_provider`](Self::connect_provider)
    /// instead, which fills in the simulated inventory and default
    /// region before inserting.
    pub async fn create(&self, new: NewIntegration) -> Result<Arc<CloudIntegration>, CoreError> {
        match self
            .gateway
            .insert_returning::<CloudIntegration, _>(Self::COLLECTION, &new)
            .await
        {
            Ok(stored) => {
                let stored = self.records.prepend(stored);
                self.notifier.success("Cloud integration created successfully");
                Ok(stored)
            }
            Err(e) => {
                warn!(error = %e, "integration create failed");
                self.notifier.error("Failed to create cloud integration");
                Err(e.into())
            }
        }
    }

    /// Send changed fields to the gateway, then merge them into the
    /// matching local row.
    pub async fn update(&self, id: &RecordId, patch: IntegrationPatch) -> Result<(), CoreError> {
        match self
            .gateway
            .update_by_id(Self::COLLECTION, id.as_str(), &patch)
            .await
        {
            Ok(()) => {
                self.records
                    .merge(id, |integration| patch.apply_to(integration));
                self.notifier.success("Cloud integration updated successfully");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "integration update failed");
                self.notifier.error("Failed to update cloud integration");
                Err(e.into())
            }
        }
    }

    /// Delete an integration and drop the local row.
    pub async fn delete(&self, id: &RecordId) -> Result<(), CoreError> {
        match self
            .gateway
            .delete_by_id(Self::COLLECTION, id.as_str())
            .await
        {
            Ok(()) => {
                self.records.remove(id);
                self.notifier.success("Cloud integration deleted successfully");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "integration delete failed");
                self.notifier.error("Failed to delete cloud integration");
                Err(e.into())
            }
        }
    }

    /// Re-fetch the full list and replace the local one wholesale.
    pub async fn refresh(&self) -> Result<(), CoreError> {
        let outcome = match self
            .gateway
            .fetch_ordered::<CloudIntegration>(Self::COLLECTION)
            .await
        {
            Ok(rows) => {
                self.records.replace_all(rows);
                debug!(count = self.records.len(), "cloud integrations refreshed");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "integration refresh failed");
                self.notifier.error("Failed to load cloud integrations");
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

    // ── Provider lifecycle ───────────────────────────────────────────

    /// Connect a provider for a customer.
    ///
    /// Inserts a connected integration with simulated inventory and the
    /// provider's default region, then immediately runs a resource sync
    /// on the stored row. A sync failure propagates even though the
    /// integration itself was created; the notices tell both halves.
    pub async fn connect_provider(
        &self,
        customer_id: &RecordId,
        provider: CloudProvider,
    ) -> Result<Arc<CloudIntegration>, CoreError> {
        let (resources, monthly_spend) = simulated_inventory();
        let new = NewIntegration {
            customer_id: customer_id.clone(),
            provider,
            connected: true,
            resources,
            monthly_spend,
            region: Some(provider.default_region().to_owned()),
        };

        let stored = match self
            .gateway
            .insert_returning::<CloudIntegration, _>(Self::COLLECTION, &new)
            .await
        {
            Ok(stored) => {
                let stored = self.records.prepend(stored);
                self.notifier.success(format!(
                    "{} integration connected successfully",
                    provider.notice_name()
                ));
                stored
            }
            Err(e) => {
                warn!(error = %e, provider = %provider, "provider connect failed");
                self.notifier.error("Failed to connect cloud provider");
                return Err(e.into());
            }
        };

        self.sync_resources(&stored.id).await?;
        Ok(self.records.get(&stored.id).unwrap_or(stored))
    }

    /// Flip an integration to disconnected.
    pub async fn disconnect_provider(&self, id: &RecordId) -> Result<(), CoreError> {
        let patch = IntegrationPatch {
            connected: Some(false),
            ..IntegrationPatch::default()
        };

        match self
            .gateway
            .update_by_id(Self::COLLECTION, id.as_str(), &patch)
            .await
        {
            Ok(()) => {
                self.records
                    .merge(id, |integration| patch.apply_to(integration));
                self.notifier.success("Cloud provider disconnected successfully");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "provider disconnect failed");
                self.notifier.error("Failed to disconnect cloud provider");
                Err(e.into())
            }
        }
    }

    /// Push fresh inventory figures for an integration.
    pub async fn sync_resources(&self, id: &RecordId) -> Result<(), CoreError> {
        let (resources, monthly_spend) = simulated_inventory();
        let patch = IntegrationPatch {
            resources: Some(resources),
            monthly_spend: Some(monthly_spend),
            ..IntegrationPatch::default()
        };

        match self
            .gateway
            .update_by_id(Self::COLLECTION, id.as_str(), &patch)
            .await
        {
            Ok(()) => {
                self.records
                    .merge(id, |integration| patch.apply_to(integration));
                self.notifier.success("Resources synced successfully");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "resource sync failed");
                self.notifier.error("Failed to sync resources");
                Err(e.into())
            }
        }
    }
}

/// Placeholder inventory figures until real provider APIs exist.
///
/// Derived from the clock's nanosecond field: resources land in
/// `[1, 50]`, monthly spend in `[500, 10500)`.
fn simulated_inventory() -> (i64, f64) {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .subsec_nanos();

    let resources = i64::from(nanos % 50) + 1;
    let monthly_spend = f64::from(nanos % 10_000) + 500.0;
    (resources, monthly_spend)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn simulated_inventory_stays_in_range() {
        for _ in 0..32 {
            let (resources, spend) = simulated_inventory();
            assert!((1..=50).contains(&resources));
            assert!((500.0..10_500.0).contains(&spend));
        }
    }
}
