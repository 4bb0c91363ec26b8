//! Casedesk Control - CLI front-end for the case tracking core.
//!
//! The store is in-memory and process-scoped, so each invocation seeds the
//! demo cases and then runs one command against them. This stands in for
//! the external decision-making agent: it issues the same tool calls an
//! agent would, just from the command line.

mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use casedesk_common::{fixtures, Catalog, CaseService};

#[derive(Parser)]
#[command(name = "casedeskctl")]
#[command(about = "Casedesk - agent-driven case tracking demo", long_about = None)]
#[command(version)]
struct Cli {
    /// Emit structured JSON instead of human-readable output
    #[arg(long, global = true)]
    json: bool,

    /// Start from an empty store instead of the demo cases
    #[arg(long, global = true)]
    no_seed: bool,

    /// Load assignees and components from a TOML file instead of the
    /// built-in roster
    #[arg(long, global = true)]
    catalog: Option<std::path::PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List cases, optionally filtered by one field
    List {
        #[arg(long)]
        state: Option<String>,
        #[arg(long)]
        priority: Option<String>,
        #[arg(long)]
        assignee: Option<String>,
        #[arg(long)]
        component: Option<String>,
    },

    /// Show the full snapshot of a case, including its audit trail
    Show { case_id: String },

    /// Create a new case
    Create {
        title: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, default_value = "medium")]
        priority: String,
        #[arg(long)]
        component: Option<String>,
        #[arg(long)]
        company: Option<String>,
    },

    /// Assign a case to a catalog assignee
    Assign { case_id: String, assignee_id: String },

    /// Clear a case's assignee
    Unassign { case_id: String },

    /// Change a case's state (new, in_progress, awaiting_customer_info, resolved)
    State { case_id: String, state: String },

    /// Change a case's priority (low, medium, high, very_high)
    Priority { case_id: String, priority: String },

    /// Change a case's component (webapp, applog, api, database, other)
    Component { case_id: String, component_id: String },

    /// Add a comment to a case
    Comment {
        case_id: String,
        content: String,
        #[arg(long)]
        internal: bool,
        #[arg(long, default_value = "support001")]
        author: String,
    },

    /// Rank resolved cases similar to a case or free-text query
    Similar {
        #[arg(long)]
        case_id: Option<String>,
        #[arg(long)]
        query: Option<String>,
    },

    /// Look up design guidance for a case's problem
    Review { case_id: String, query: String },

    /// Invoke a tool by name with a raw JSON argument bag
    Call { name: String, args: String },

    /// Print the tool catalog the decision-maker selects from
    Tools,

    /// Replay the scripted service-desk scenarios
    Demo,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let catalog = match &cli.catalog {
        Some(path) => Catalog::from_toml_file(path)?,
        None => Catalog::seed(),
    };
    let service = CaseService::new(catalog);
    if !cli.no_seed {
        fixtures::load_demo_cases(&service)?;
    }

    match cli.command {
        Commands::List {
            state,
            priority,
            assignee,
            component,
        } => commands::list(&service, state, priority, assignee, component, cli.json),
        Commands::Show { case_id } => commands::show(&service, &case_id, cli.json),
        Commands::Create {
            title,
            description,
            priority,
            component,
            company,
        } => commands::create(&service, title, description, priority, component, company, cli.json),
        Commands::Assign { case_id, assignee_id } => {
            commands::assign(&service, &case_id, &assignee_id, cli.json)
        }
        Commands::Unassign { case_id } => commands::unassign(&service, &case_id, cli.json),
        Commands::State { case_id, state } => {
            commands::change_state(&service, &case_id, &state, cli.json)
        }
        Commands::Priority { case_id, priority } => {
            commands::change_priority(&service, &case_id, &priority, cli.json)
        }
        Commands::Component { case_id, component_id } => {
            commands::change_component(&service, &case_id, &component_id, cli.json)
        }
        Commands::Comment {
            case_id,
            content,
            internal,
            author,
        } => commands::comment(&service, &case_id, &content, internal, &author, cli.json),
        Commands::Similar { case_id, query } => {
            commands::similar(&service, case_id, query, cli.json)
        }
        Commands::Review { case_id, query } => {
            commands::review(&service, &case_id, &query, cli.json)
        }
        Commands::Call { name, args } => commands::call(&service, &name, &args, cli.json),
        Commands::Tools => commands::tools(cli.json),
        Commands::Demo => commands::demo(&service),
    }
}
