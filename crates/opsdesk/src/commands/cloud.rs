//! Cloud integration command handlers.

use std::sync::Arc;

use tabled::Tabled;

use opsdesk_core::{CloudIntegration, CloudProvider, GatewayConfig, RecordId, Workspace};

use crate::cli::{CloudArgs, CloudCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

const PROVIDER_VALUES: &str = "aws, azure, gcp";

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct IntegrationRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Customer")]
    customer: String,
    #[tabled(rename = "Provider")]
    provider: String,
    #[tabled(rename = "Region")]
    region: String,
    #[tabled(rename = "Connected")]
    connected: String,
    #[tabled(rename = "Resources")]
    resources: String,
    #[tabled(rename = "Spend/mo")]
    monthly_spend: String,
}

impl From<&Arc<CloudIntegration>> for IntegrationRow {
    fn from(i: &Arc<CloudIntegration>) -> Self {
        Self {
            id: i.id.to_string(),
            customer: i.customer_id.to_string(),
            provider: i.provider.to_string(),
            region: i.region.clone().unwrap_or_default(),
            connected: i.connected.to_string(),
            resources: i.resources.to_string(),
            monthly_spend: format!("${:.2}", i.monthly_spend),
        }
    }
}

fn detail(i: &Arc<CloudIntegration>) -> String {
    let mut lines = vec![
        format!("ID:         {}", i.id),
        format!("Customer:   {}", i.customer_id),
        format!("Provider:   {}", i.provider.notice_name()),
        format!("Region:     {}", i.region.as_deref().unwrap_or("-")),
        format!("Connected:  {}", i.connected),
        format!("Resources:  {}", i.resources),
        format!("Spend/mo:   ${:.2}", i.monthly_spend),
    ];
    if let Some(at) = i.created_at {
        lines.push(format!("Created:    {}", at.format("%Y-%m-%d %H:%M")));
    }
    if let Some(at) = i.updated_at {
        lines.push(format!("Updated:    {}", at.format("%Y-%m-%d %H:%M")));
    }
    lines.join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    config: GatewayConfig,
    args: CloudArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        CloudCommand::List {
            customer,
            provider,
            connected,
        } => {
            let provider: Option<CloudProvider> = provider
                .as_deref()
                .map(|p| util::parse_flag("provider", p, PROVIDER_VALUES))
                .transpose()?;
            let customer = customer.map(RecordId::from);

            let integrations = Workspace::oneshot(config, |ws| async move {
                Ok(match customer {
                    Some(ref cid) => ws.integrations().for_customer(cid),
                    None => ws.integrations().list().to_vec(),
                })
            })
            .await?;

            let integrations: Vec<_> = integrations
                .into_iter()
                .filter(|i| provider.is_none_or(|p| i.provider == p))
                .filter(|i| !connected || i.connected)
                .collect();

            let out = output::render_list(
                &global.output,
                &integrations,
                |i| IntegrationRow::from(i),
                |i| i.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        CloudCommand::Show { id } => {
            let wanted = RecordId::from(id.as_str());
            let found = Workspace::oneshot(config, |ws| async move {
                Ok(ws.integrations().get_by_id(&wanted))
            })
            .await?;
            match found {
                Some(integration) => {
                    let out = output::render_single(&global.output, &integration, detail, |i| {
                        i.id.to_string()
                    });
                    output::print_output(&out, global.quiet);
                    Ok(())
                }
                None => Err(CliError::NotFound {
                    resource_type: "cloud integration".into(),
                    identifier: id,
                    list_command: "cloud list".into(),
                }),
            }
        }

        CloudCommand::Connect { customer, provider } => {
            let provider: CloudProvider =
                util::parse_flag("provider", &provider, PROVIDER_VALUES)?;
            let customer_id = RecordId::from(customer);

            let quiet = global.quiet;
            let color = output::should_color(&global.color);
            let integration = Workspace::oneshot(config, |ws| async move {
                let mut notices = ws.notices();
                let result = ws
                    .integrations()
                    .connect_provider(&customer_id, provider)
                    .await;
                util::report_notices(&mut notices, quiet, color);
                result
            })
            .await?;

            let out = output::render_single(&global.output, &integration, detail, |i| {
                i.id.to_string()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        CloudCommand::Disconnect { id } => {
            let wanted = RecordId::from(id.as_str());
            let quiet = global.quiet;
            let color = output::should_color(&global.color);
            Workspace::oneshot(config, |ws| async move {
                let mut notices = ws.notices();
                let result = ws.integrations().disconnect_provider(&wanted).await;
                util::report_notices(&mut notices, quiet, color);
                result
            })
            .await?;
            Ok(())
        }

        CloudCommand::Sync { id } => {
            let wanted = RecordId::from(id.as_str());
            let quiet = global.quiet;
            let color = output::should_color(&global.color);
            Workspace::oneshot(config, |ws| async move {
                let mut notices = ws.notices();
                let result = ws.integrations().sync_resources(&wanted).await;
                util::report_notices(&mut notices, quiet, color);
                result
            })
            .await?;
            Ok(())
        }

        CloudCommand::Delete { id } => {
            if !util::confirm(&format!("Delete cloud integration {id}?"), global.yes)? {
                return Ok(());
            }

            let wanted = RecordId::from(id.as_str());
            let quiet = global.quiet;
            let color = output::should_color(&global.color);
            Workspace::oneshot(config, |ws| async move {
                let mut notices = ws.notices();
                let result = ws.integrations().delete(&wanted).await;
                util::report_notices(&mut notices, quiet, color);
                result
            })
            .await?;
            Ok(())
        }
    }
}
