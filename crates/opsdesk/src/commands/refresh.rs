//! Refresh command: reload every store and report record counts.

use serde::Serialize;

use opsdesk_core::{GatewayConfig, Workspace};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

#[derive(Serialize)]
struct RefreshSummary {
    customers: usize,
    tickets: usize,
    cloud_integrations: usize,
}

fn detail(s: &RefreshSummary) -> String {
    [
        format!("Customers:           {}", s.customers),
        format!("Tickets:             {}", s.tickets),
        format!("Cloud integrations:  {}", s.cloud_integrations),
    ]
    .join("\n")
}

pub async fn handle(config: GatewayConfig, global: &GlobalOpts) -> Result<(), CliError> {
    // The workspace loads every store on the way in, so by the time the
    // closure runs the counts are fresh.
    let summary = Workspace::oneshot(config, |ws| async move {
        Ok(RefreshSummary {
            customers: ws.customers().list().len(),
            tickets: ws.tickets().list().len(),
            cloud_integrations: ws.integrations().list().len(),
        })
    })
    .await?;

    let out = output::render_single(&global.output, &summary, detail, |s| {
        (s.customers + s.tickets + s.cloud_integrations).to_string()
    });
    output::print_output(&out, global.quiet);
    Ok(())
}
