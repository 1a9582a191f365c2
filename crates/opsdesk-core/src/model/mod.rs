//! Domain model shared across the workspace.

mod cloud;
mod customer;
mod record_id;
mod ticket;

pub mod requests;

pub use cloud::{CloudIntegration, CloudProvider};
pub use customer::{Customer, CustomerStatus};
pub use record_id::RecordId;
pub use ticket::{Ticket, TicketPriority, TicketStatus};
