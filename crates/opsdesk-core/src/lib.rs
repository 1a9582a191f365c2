//! Reactive data layer between `opsdesk-api` and UI consumers.
//!
//! This crate owns the business logic, domain model, and client-side
//! state for the OpsDesk workspace:
//!
//! - **[`Workspace`]** — Central facade owning one store per collection.
//!   [`connect()`](Workspace::connect) loads everything in parallel and
//!   tolerates partial failure; [`Workspace::oneshot()`] provides a
//!   load-then-run mode for single CLI invocations.
//!
//! - **Entity stores** ([`store`]) — Per-collection reactive lists
//!   (`tokio::sync::watch` snapshots over `Arc<Vec<Arc<T>>>`), ordered
//!   the way the gateway returns them (newest first). Mutations go to
//!   the gateway first and touch local state only once confirmed.
//!
//! - **[`Notifier`]** — Broadcast channel of one-shot user notices, the
//!   place every operation reports its outcome regardless of who is
//!   listening.
//!
//! - **Domain model** ([`model`]) — Canonical row types (`Customer`,
//!   `Ticket`, `CloudIntegration`) plus typed insert/patch payloads in
//!   [`model::requests`].

pub mod config;
pub mod error;
pub mod model;
pub mod notify;
pub mod store;
pub mod workspace;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{GatewayConfig, TlsVerification};
pub use error::CoreError;
pub use notify::{Notice, Notifier, Severity};
pub use store::{CustomerStore, IntegrationStore, StoreState, TicketStore};
pub use workspace::Workspace;

// Re-export model types at the crate root for ergonomics.
pub use model::{
    CloudIntegration,
    CloudProvider,
    Customer,
    CustomerStatus,
    RecordId,
    Ticket,
    TicketPriority,
    TicketStatus,
};
