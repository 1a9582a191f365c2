//! Clap derive structures for the `opsdesk` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// opsdesk -- kubectl-style CLI for service desk management
#[derive(Debug, Parser)]
#[command(
    name = "opsdesk",
    version,
    about = "Manage service desk records from the command line",
    long_about = "A CLI for administering customers, tickets, and cloud\n\
        integrations on an opsdesk data gateway.\n\n\
        Every invocation loads a fresh snapshot of the records it touches,\n\
        so output always reflects the gateway's current state.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Gateway profile to use
    #[arg(long, short = 'p', env = "OPSDESK_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Gateway URL (overrides profile)
    #[arg(long, short = 'g', env = "OPSDESK_GATEWAY", global = true)]
    pub gateway: Option<String>,

    /// Gateway API key
    #[arg(long, env = "OPSDESK_API_KEY", global = true, hide_env = true)]
    pub api_key: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "OPSDESK_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "OPSDESK_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (default: profile setting or 30)
    #[arg(long, env = "OPSDESK_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one id per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage customers
    #[command(alias = "cust", alias = "c")]
    Customers(CustomersArgs),

    /// Manage support tickets
    #[command(alias = "tix", alias = "t")]
    Tickets(TicketsArgs),

    /// Manage cloud provider integrations
    Cloud(CloudArgs),

    /// Reload every store from the gateway and report counts
    Refresh,

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CUSTOMERS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CustomersArgs {
    #[command(subcommand)]
    pub command: CustomersCommand,
}

#[derive(Debug, Subcommand)]
pub enum CustomersCommand {
    /// List customers
    #[command(alias = "ls")]
    List {
        /// Filter by status: active, inactive, pending
        #[arg(long, short = 's')]
        status: Option<String>,

        /// Only customers with a connected integration for this provider
        #[arg(long)]
        provider: Option<String>,
    },

    /// Show customer details
    #[command(alias = "get")]
    Show {
        /// Customer ID
        id: String,
    },

    /// Create a new customer
    Create {
        /// Customer name
        #[arg(long, required = true)]
        name: String,

        /// Company name
        #[arg(long, required = true)]
        company: String,

        /// Contact email
        #[arg(long, required = true)]
        email: String,

        /// Contact phone number
        #[arg(long)]
        phone: Option<String>,

        /// Location (city, region)
        #[arg(long)]
        location: Option<String>,

        /// Initial status: active, inactive, pending
        #[arg(long)]
        status: Option<String>,
    },

    /// Update customer fields
    Update {
        /// Customer ID
        id: String,

        /// Customer name
        #[arg(long)]
        name: Option<String>,

        /// Company name
        #[arg(long)]
        company: Option<String>,

        /// Contact email
        #[arg(long)]
        email: Option<String>,

        /// Contact phone number
        #[arg(long)]
        phone: Option<String>,

        /// Location (city, region)
        #[arg(long)]
        location: Option<String>,

        /// Status: active, inactive, pending
        #[arg(long)]
        status: Option<String>,
    },

    /// Delete a customer
    Delete {
        /// Customer ID
        id: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  TICKETS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct TicketsArgs {
    #[command(subcommand)]
    pub command: TicketsCommand,
}

#[derive(Debug, Subcommand)]
pub enum TicketsCommand {
    /// List tickets
    #[command(alias = "ls")]
    List {
        /// Filter by status: open, in-progress, resolved, closed
        #[arg(long, short = 's')]
        status: Option<String>,

        /// Filter by priority: low, medium, high, critical
        #[arg(long)]
        priority: Option<String>,

        /// Filter by customer ID
        #[arg(long)]
        customer: Option<String>,
    },

    /// Show ticket details
    #[command(alias = "get")]
    Show {
        /// Ticket ID or ticket number (e.g. INC-1001)
        ticket: String,
    },

    /// Create a new ticket
    Create {
        /// Ticket title
        #[arg(long, required = true)]
        title: String,

        /// Longer description
        #[arg(long)]
        description: Option<String>,

        /// Priority: low, medium, high, critical
        #[arg(long)]
        priority: Option<String>,

        /// Initial status: open, in-progress, resolved, closed
        #[arg(long)]
        status: Option<String>,

        /// Customer ID the ticket belongs to
        #[arg(long)]
        customer: Option<String>,

        /// Assignee ID
        #[arg(long)]
        assignee: Option<String>,

        /// Due date (YYYY-MM-DD or RFC 3339)
        #[arg(long)]
        due: Option<String>,
    },

    /// Update ticket fields
    Update {
        /// Ticket ID or ticket number
        ticket: String,

        /// Ticket title
        #[arg(long)]
        title: Option<String>,

        /// Longer description
        #[arg(long)]
        description: Option<String>,

        /// Status: open, in-progress, resolved, closed
        #[arg(long)]
        status: Option<String>,

        /// Priority: low, medium, high, critical
        #[arg(long)]
        priority: Option<String>,

        /// Customer ID the ticket belongs to
        #[arg(long)]
        customer: Option<String>,

        /// Assignee ID
        #[arg(long)]
        assignee: Option<String>,

        /// Due date (YYYY-MM-DD or RFC 3339)
        #[arg(long)]
        due: Option<String>,
    },

    /// Delete a ticket
    Delete {
        /// Ticket ID or ticket number
        ticket: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CLOUD INTEGRATIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CloudArgs {
    #[command(subcommand)]
    pub command: CloudCommand,
}

#[derive(Debug, Subcommand)]
pub enum CloudCommand {
    /// List cloud integrations
    #[command(alias = "ls")]
    List {
        /// Filter by customer ID
        #[arg(long)]
        customer: Option<String>,

        /// Filter by provider: aws, azure, gcp
        #[arg(long)]
        provider: Option<String>,

        /// Only connected integrations
        #[arg(long)]
        connected: bool,
    },

    /// Show integration details
    #[command(alias = "get")]
    Show {
        /// Integration ID
        id: String,
    },

    /// Connect a cloud provider for a customer
    Connect {
        /// Customer ID
        #[arg(long, required = true)]
        customer: String,

        /// Provider: aws, azure, gcp
        #[arg(long, required = true)]
        provider: String,
    },

    /// Disconnect a cloud provider
    Disconnect {
        /// Integration ID
        id: String,
    },

    /// Re-sync resource counts and spend for an integration
    Sync {
        /// Integration ID
        id: String,
    },

    /// Delete an integration
    Delete {
        /// Integration ID
        id: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current resolved configuration
    Show,

    /// Store an API key in the system keyring
    SetKey {
        /// Profile name (default: active profile)
        #[arg(long)]
        profile: Option<String>,
    },

    /// Print the config file path
    Path,

    /// List configured profiles
    Profiles,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
