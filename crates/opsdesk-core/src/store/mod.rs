//! Per-collection entity stores backed by the Remote Data Gateway.

mod customers;
mod integrations;
mod records;
mod tickets;

pub use customers::CustomerStore;
pub use integrations::IntegrationStore;
pub use tickets::TicketStore;

pub(crate) use records::{Keyed, RecordSet};

/// Load state of a store.
///
/// `Loading` only ever flips to `Ready`: the transition happens after
/// the first refresh attempt completes, whether or not it succeeded.
/// There is no error state; failures surface as notices and logs while
/// the store keeps serving whatever data it holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreState {
    Loading,
    Ready,
}
