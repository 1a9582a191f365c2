// ── Workspace facade ─────────────────────────────────────────────

use std::sync::Arc;

use opsdesk_api::GatewayClient;
use tokio::sync::broadcast;
use tracing::info;

use crate::config::GatewayConfig;
use crate::error::CoreError;
use crate::model::{CloudProvider, Customer};
use crate::notify::{Notice, Notifier};
use crate::store::{CustomerStore, IntegrationStore, TicketStore};

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<WorkspaceInner>`. Owns one store per
/// collection plus the notice channel they all publish on. Everything
/// is handed in through [`GatewayConfig`]; nothing global.
#[derive(Clone)]
pub struct Workspace {
    inner: Arc<WorkspaceInner>,
}

struct WorkspaceInner {
    config: GatewayConfig,
    customers: CustomerStore,
    tickets: TicketStore,
    integrations: IntegrationStore,
    notifier: Notifier,
}

impl Workspace {
    /// Create a workspace from configuration. Does NOT fetch anything --
    /// call [`connect()`](Self::connect) or
    /// [`refresh_all()`](Self::refresh_all) to load the stores.
    pub fn new(config: GatewayConfig) -> Result<Self, CoreError> {
        let gateway = Arc::new(GatewayClient::from_api_key(
            config.url.as_str(),
            &config.api_key,
            &config.transport(),
        )?);
        let notifier = Notifier::new();

        Ok(Self {
            inner: Arc::new(WorkspaceInner {
                customers: CustomerStore::new(Arc::clone(&gateway), notifier.clone()),
                tickets: TicketStore::new(Arc::clone(&gateway), notifier.clone()),
                integrations: IntegrationStore::new(gateway, notifier.clone()),
                notifier,
                config,
            }),
        })
    }

    /// Access the workspace configuration.
    #[must_use]
    pub fn config(&self) -> &GatewayConfig {
        &self.inner.config
    }

    // ── Lifecycle ────────────────────────────────────────────────

    /// Load every store with an initial fetch.
    ///
    /// Always resolves: an individual fetch failure is logged and
    /// noticed by the owning store, which still flips to `Ready` and
    /// keeps serving its (possibly empty) list. Callers that want hard
    /// failures use [`refresh_all()`](Self::refresh_all) instead.
    pub async fn connect(&self) {
        let (customers, tickets, integrations) = tokio::join!(
            self.inner.customers.refresh(),
            self.inner.tickets.refresh(),
            self.inner.integrations.refresh(),
        );

        let loaded = usize::from(customers.is_ok())
            + usize::from(tickets.is_ok())
            + usize::from(integrations.is_ok());
        info!(loaded, total = 3, "workspace connected");
    }

    /// Refresh every store, propagating the first failure.
    ///
    /// All three fetches run regardless; errors are checked afterwards
    /// in store order.
    pub async fn refresh_all(&self) -> Result<(), CoreError> {
        let (customers, tickets, integrations) = tokio::join!(
            self.inner.customers.refresh(),
            self.inner.tickets.refresh(),
            self.inner.integrations.refresh(),
        );

        customers?;
        tickets?;
        integrations?;
        Ok(())
    }

    // ── One-shot convenience ─────────────────────────────────────

    /// One-shot: build, load, run closure.
    ///
    /// Optimized for single CLI invocations. Loads via
    /// [`refresh_all()`](Self::refresh_all) so an unreachable gateway
    /// fails the invocation instead of silently serving empty lists.
    pub async fn oneshot<F, Fut, T>(config: GatewayConfig, f: F) -> Result<T, CoreError>
    where
        F: FnOnce(Workspace) -> Fut,
        Fut: std::future::Future<Output = Result<T, CoreError>>,
    {
        let workspace = Workspace::new(config)?;
        workspace.refresh_all().await?;
        f(workspace).await
    }

    // ── Store accessors ──────────────────────────────────────────

    #[must_use]
    pub fn customers(&self) -> &CustomerStore {
        &self.inner.customers
    }

    #[must_use]
    pub fn tickets(&self) -> &TicketStore {
        &self.inner.tickets
    }

    #[must_use]
    pub fn integrations(&self) -> &IntegrationStore {
        &self.inner.integrations
    }

    // ── Notices ──────────────────────────────────────────────────

    /// Subscribe to notices published after this call.
    #[must_use]
    pub fn notices(&self) -> broadcast::Receiver<Notice> {
        self.inner.notifier.subscribe()
    }

    // ── Cross-store queries ──────────────────────────────────────

    /// Customers with at least one connected integration for `provider`.
    ///
    /// The join lives here because integrations are their own store.
    /// Linear in both lists, fresh allocation.
    #[must_use]
    pub fn customers_with_provider(&self, provider: CloudProvider) -> Vec<Arc<Customer>> {
        let integrations = self.inner.integrations.list();

        self.inner
            .customers
            .list()
            .iter()
            .filter(|customer| {
                integrations.iter().any(|integration| {
                    integration.connected
                        && integration.provider == provider
                        && integration.customer_id == customer.id
                })
            })
            .cloned()
            .collect()
    }
}
