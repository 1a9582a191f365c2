// opsdesk-api: Async Rust client for the OpsDesk Remote Data Gateway

pub mod error;
pub mod gateway;
pub mod transport;

pub use error::Error;
pub use gateway::GatewayClient;
pub use transport::{TlsMode, TransportConfig};
