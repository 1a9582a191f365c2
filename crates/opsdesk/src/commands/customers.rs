//! Customer command handlers.

use std::sync::Arc;

use tabled::Tabled;

use opsdesk_core::model::requests::{CustomerPatch, NewCustomer};
use opsdesk_core::{CloudProvider, Customer, CustomerStatus, GatewayConfig, RecordId, Workspace};

use crate::cli::{CustomersArgs, CustomersCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

const STATUS_VALUES: &str = "active, inactive, pending";

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct CustomerRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Company")]
    company: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Location")]
    location: String,
}

impl From<&Arc<Customer>> for CustomerRow {
    fn from(c: &Arc<Customer>) -> Self {
        Self {
            id: c.id.to_string(),
            name: c.name.clone(),
            company: c.company.clone(),
            email: c.email.clone(),
            status: c.status.to_string(),
            location: c.location.clone().unwrap_or_default(),
        }
    }
}

fn detail(c: &Arc<Customer>) -> String {
    let mut lines = vec![
        format!("ID:        {}", c.id),
        format!("Name:      {}", c.name),
        format!("Company:   {}", c.company),
        format!("Email:     {}", c.email),
        format!("Phone:     {}", c.phone.as_deref().unwrap_or("-")),
        format!("Location:  {}", c.location.as_deref().unwrap_or("-")),
        format!("Status:    {}", c.status),
    ];
    if let Some(join) = c.join_date {
        lines.push(format!("Joined:    {join}"));
    }
    if let Some(at) = c.created_at {
        lines.push(format!("Created:   {}", at.format("%Y-%m-%d %H:%M")));
    }
    if let Some(at) = c.updated_at {
        lines.push(format!("Updated:   {}", at.format("%Y-%m-%d %H:%M")));
    }
    lines.join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    config: GatewayConfig,
    args: CustomersArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        CustomersCommand::List { status, provider } => {
            let status: Option<CustomerStatus> = status
                .as_deref()
                .map(|s| util::parse_flag("status", s, STATUS_VALUES))
                .transpose()?;
            let provider: Option<CloudProvider> = provider
                .as_deref()
                .map(|p| util::parse_flag("provider", p, "aws, azure, gcp"))
                .transpose()?;

            let customers = Workspace::oneshot(config, |ws| async move {
                Ok(match provider {
                    Some(p) => ws.customers_with_provider(p),
                    None => ws.customers().list().to_vec(),
                })
            })
            .await?;

            let customers: Vec<_> = customers
                .into_iter()
                .filter(|c| status.is_none_or(|s| c.status == s))
                .collect();

            let out = output::render_list(
                &global.output,
                &customers,
                |c| CustomerRow::from(c),
                |c| c.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        CustomersCommand::Show { id } => {
            let wanted = RecordId::from(id.as_str());
            let found =
                Workspace::oneshot(config, |ws| async move { Ok(ws.customers().get_by_id(&wanted)) })
                    .await?;
            match found {
                Some(customer) => {
                    let out = output::render_single(&global.output, &customer, detail, |c| {
                        c.id.to_string()
                    });
                    output::print_output(&out, global.quiet);
                    Ok(())
                }
                None => Err(CliError::NotFound {
                    resource_type: "customer".into(),
                    identifier: id,
                    list_command: "customers list".into(),
                }),
            }
        }

        CustomersCommand::Create {
            name,
            company,
            email,
            phone,
            location,
            status,
        } => {
            let status = status
                .as_deref()
                .map(|s| util::parse_flag("status", s, STATUS_VALUES))
                .transpose()?;
            let request = NewCustomer {
                name,
                company,
                email,
                phone,
                location,
                status,
                created_by: None,
            };

            let quiet = global.quiet;
            let color = output::should_color(&global.color);
            let customer = Workspace::oneshot(config, |ws| async move {
                let mut notices = ws.notices();
                let result = ws.customers().create(request).await;
                util::report_notices(&mut notices, quiet, color);
                result
            })
            .await?;

            let out =
                output::render_single(&global.output, &customer, detail, |c| c.id.to_string());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        CustomersCommand::Update {
            id,
            name,
            company,
            email,
            phone,
            location,
            status,
        } => {
            let status = status
                .as_deref()
                .map(|s| util::parse_flag("status", s, STATUS_VALUES))
                .transpose()?;
            let patch = CustomerPatch {
                name,
                company,
                email,
                phone,
                location,
                status,
            };
            if patch.is_empty() {
                return Err(CliError::Validation {
                    field: "update".into(),
                    reason: "no fields to update; pass at least one field flag".into(),
                });
            }

            let wanted = RecordId::from(id.as_str());
            let quiet = global.quiet;
            let color = output::should_color(&global.color);
            Workspace::oneshot(config, |ws| async move {
                let mut notices = ws.notices();
                let result = ws.customers().update(&wanted, patch).await;
                util::report_notices(&mut notices, quiet, color);
                result
            })
            .await?;
            Ok(())
        }

        CustomersCommand::Delete { id } => {
            if !util::confirm(&format!("Delete customer {id}?"), global.yes)? {
                return Ok(());
            }

            let wanted = RecordId::from(id.as_str());
            let quiet = global.quiet;
            let color = output::should_color(&global.color);
            Workspace::oneshot(config, |ws| async move {
                let mut notices = ws.notices();
                let result = ws.customers().delete(&wanted).await;
                util::report_notices(&mut notices, quiet, color);
                result
            })
            .await?;
            Ok(())
        }
    }
}
