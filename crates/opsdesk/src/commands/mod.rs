//! Command dispatch: bridges CLI args -> store operations -> output formatting.

pub mod cloud;
pub mod config_cmd;
pub mod customers;
pub mod refresh;
pub mod tickets;
pub mod util;

use opsdesk_core::GatewayConfig;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a gateway-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    config: GatewayConfig,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Customers(args) => customers::handle(config, args, global).await,
        Command::Tickets(args) => tickets::handle(config, args, global).await,
        Command::Cloud(args) => cloud::handle(config, args, global).await,
        Command::Refresh => refresh::handle(config, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
