//! Ticket command handlers.

use std::sync::Arc;

use tabled::Tabled;

use opsdesk_core::model::requests::{NewTicket, TicketPatch};
use opsdesk_core::{GatewayConfig, RecordId, Ticket, TicketPriority, TicketStatus, Workspace};

use crate::cli::{GlobalOpts, TicketsArgs, TicketsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

const STATUS_VALUES: &str = "open, in-progress, resolved, closed";
const PRIORITY_VALUES: &str = "low, medium, high, critical";

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct TicketRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Number")]
    number: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Priority")]
    priority: String,
    #[tabled(rename = "Assignee")]
    assignee: String,
}

impl From<&Arc<Ticket>> for TicketRow {
    fn from(t: &Arc<Ticket>) -> Self {
        Self {
            id: t.id.to_string(),
            number: t.ticket_number.clone(),
            title: t.title.clone(),
            status: t.status.to_string(),
            priority: t.priority.to_string(),
            assignee: t
                .assigned_to
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
        }
    }
}

fn detail(t: &Arc<Ticket>) -> String {
    let mut lines = vec![
        format!("ID:        {}", t.id),
        format!("Number:    {}", t.ticket_number),
        format!("Title:     {}", t.title),
        format!("Status:    {}", t.status),
        format!("Priority:  {}", t.priority),
    ];
    if let Some(ref customer) = t.customer_id {
        lines.push(format!("Customer:  {customer}"));
    }
    if let Some(ref assignee) = t.assigned_to {
        lines.push(format!("Assignee:  {assignee}"));
    }
    if let Some(due) = t.due_date {
        lines.push(format!("Due:       {}", due.format("%Y-%m-%d")));
    }
    if let Some(at) = t.created_at {
        lines.push(format!("Created:   {}", at.format("%Y-%m-%d %H:%M")));
    }
    if let Some(at) = t.updated_at {
        lines.push(format!("Updated:   {}", at.format("%Y-%m-%d %H:%M")));
    }
    if let Some(at) = t.resolved_at {
        lines.push(format!("Resolved:  {}", at.format("%Y-%m-%d %H:%M")));
    }
    if let Some(ref description) = t.description {
        lines.push(format!("Details:   {description}"));
    }
    lines.join("\n")
}

// ── Identifier resolution ───────────────────────────────────────────

/// Find a ticket by record ID or human ticket number (INC-1001 style).
fn find_ticket(ws: &Workspace, identifier: &str) -> Option<Arc<Ticket>> {
    let snap = ws.tickets().list();
    snap.iter()
        .find(|t| t.id.as_str() == identifier || t.ticket_number == identifier)
        .cloned()
}

/// Resolve an identifier to a record ID.
///
/// If nothing in the snapshot matches, the identifier itself is treated
/// as the record ID and the gateway gets the final say.
fn resolve_ticket_id(ws: &Workspace, identifier: &str) -> RecordId {
    find_ticket(ws, identifier)
        .map(|t| t.id.clone())
        .unwrap_or_else(|| RecordId::from(identifier))
}

// ── Handler ─────────────────────────────────────────────────────────

#[allow(clippy::too_many_lines)]
pub async fn handle(
    config: GatewayConfig,
    args: TicketsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        TicketsCommand::List {
            status,
            priority,
            customer,
        } => {
            let status: Option<TicketStatus> = status
                .as_deref()
                .map(|s| util::parse_flag("status", s, STATUS_VALUES))
                .transpose()?;
            let priority: Option<TicketPriority> = priority
                .as_deref()
                .map(|p| util::parse_flag("priority", p, PRIORITY_VALUES))
                .transpose()?;
            let customer = customer.map(RecordId::from);

            let tickets =
                Workspace::oneshot(config, |ws| async move { Ok(ws.tickets().list().to_vec()) })
                    .await?;

            let tickets: Vec<_> = tickets
                .into_iter()
                .filter(|t| status.is_none_or(|s| t.status == s))
                .filter(|t| priority.is_none_or(|p| t.priority == p))
                .filter(|t| {
                    customer
                        .as_ref()
                        .is_none_or(|cid| t.customer_id.as_ref() == Some(cid))
                })
                .collect();

            let out = output::render_list(
                &global.output,
                &tickets,
                |t| TicketRow::from(t),
                |t| t.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        TicketsCommand::Show { ticket } => {
            let wanted = ticket.clone();
            let found =
                Workspace::oneshot(config, |ws| async move { Ok(find_ticket(&ws, &wanted)) })
                    .await?;
            match found {
                Some(t) => {
                    let out =
                        output::render_single(&global.output, &t, detail, |t| t.id.to_string());
                    output::print_output(&out, global.quiet);
                    Ok(())
                }
                None => Err(CliError::NotFound {
                    resource_type: "ticket".into(),
                    identifier: ticket,
                    list_command: "tickets list".into(),
                }),
            }
        }

        TicketsCommand::Create {
            title,
            description,
            priority,
            status,
            customer,
            assignee,
            due,
        } => {
            let status = status
                .as_deref()
                .map(|s| util::parse_flag("status", s, STATUS_VALUES))
                .transpose()?;
            let priority = priority
                .as_deref()
                .map(|p| util::parse_flag("priority", p, PRIORITY_VALUES))
                .transpose()?;
            let due_date = due
                .as_deref()
                .map(|d| util::parse_timestamp("due", d))
                .transpose()?;
            let request = NewTicket {
                title,
                description,
                status,
                priority,
                customer_id: customer.map(RecordId::from),
                assigned_to: assignee.map(RecordId::from),
                due_date,
                created_by: None,
            };

            let quiet = global.quiet;
            let color = output::should_color(&global.color);
            let ticket = Workspace::oneshot(config, |ws| async move {
                let mut notices = ws.notices();
                let result = ws.tickets().create(request).await;
                util::report_notices(&mut notices, quiet, color);
                result
            })
            .await?;

            let out = output::render_single(&global.output, &ticket, detail, |t| t.id.to_string());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        TicketsCommand::Update {
            ticket,
            title,
            description,
            status,
            priority,
            customer,
            assignee,
            due,
        } => {
            let status = status
                .as_deref()
                .map(|s| util::parse_flag("status", s, STATUS_VALUES))
                .transpose()?;
            let priority = priority
                .as_deref()
                .map(|p| util::parse_flag("priority", p, PRIORITY_VALUES))
                .transpose()?;
            let due_date = due
                .as_deref()
                .map(|d| util::parse_timestamp("due", d))
                .transpose()?;
            let patch = TicketPatch {
                title,
                description,
                status,
                priority,
                assigned_to: assignee.map(RecordId::from),
                customer_id: customer.map(RecordId::from),
                due_date,
                resolved_at: None,
            };
            if patch.is_empty() {
                return Err(CliError::Validation {
                    field: "update".into(),
                    reason: "no fields to update; pass at least one field flag".into(),
                });
            }

            let quiet = global.quiet;
            let color = output::should_color(&global.color);
            Workspace::oneshot(config, |ws| async move {
                let id = resolve_ticket_id(&ws, &ticket);
                let mut notices = ws.notices();
                let result = ws.tickets().update(&id, patch).await;
                util::report_notices(&mut notices, quiet, color);
                result
            })
            .await?;
            Ok(())
        }

        TicketsCommand::Delete { ticket } => {
            if !util::confirm(&format!("Delete ticket {ticket}?"), global.yes)? {
                return Ok(());
            }

            let quiet = global.quiet;
            let color = output::should_color(&global.color);
            Workspace::oneshot(config, |ws| async move {
                let id = resolve_ticket_id(&ws, &ticket);
                let mut notices = ws.notices();
                let result = ws.tickets().delete(&id).await;
                util::report_notices(&mut notices, quiet, color);
                result
            })
            .await?;
            Ok(())
        }
    }
}
