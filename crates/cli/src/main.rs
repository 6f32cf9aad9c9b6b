//! Ops Desk CLI - Inventory, HR and marketing records from the command line.
//!
//! # Usage
//!
//! ```bash
//! # List inventory items, optionally filtered
//! opsdesk inventory list --search bolt --status in_stock
//!
//! # Backend stats and a local roll-up
//! opsdesk inventory stats
//! opsdesk inventory summary
//!
//! # Campaign totals as JSON
//! opsdesk --json campaigns totals
//!
//! # Edit an employee
//! opsdesk employees edit 12 -f department=Finance
//! ```
//!
//! # Commands
//!
//! - `inventory` - Items: list, stats, summary, add, edit, delete
//! - `category` - Inventory categories: list, add, delete
//! - `campaigns` - Marketing campaigns: list, totals, add, edit, delete
//! - `employees` - Employee directory: list, summary, add, edit, delete
//! - `payroll` - Payroll entries: list, summary, add, edit, delete
//!
//! Configuration is read from the environment (and `.env`); see
//! [`opsdesk_client::ClientConfig`].

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use opsdesk_client::{
    ApiClient, CampaignService, ClientConfig, CollectionManager, EmployeeService, InventoryDesk,
    InventoryService, PayrollService,
};

mod commands;
mod output;
mod telemetry;

use commands::collection::{self, CollectionAction};
use commands::inventory::{self, CategoryAction, InventoryAction};
use output::Format;

#[derive(Parser)]
#[command(name = "opsdesk")]
#[command(author, version, about = "Ops Desk command line client")]
struct Cli {
    /// Print records and summaries as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage inventory items
    Inventory {
        #[command(subcommand)]
        action: InventoryAction,
    },
    /// Manage inventory categories
    Category {
        #[command(subcommand)]
        action: CategoryAction,
    },
    /// Manage marketing campaigns
    Campaigns {
        #[command(subcommand)]
        action: CollectionAction,
    },
    /// Manage employees
    Employees {
        #[command(subcommand)]
        action: CollectionAction,
    },
    /// Manage payroll entries
    Payroll {
        #[command(subcommand)]
        action: CollectionAction,
    },
}

#[tokio::main]
async fn main() {
    // Load .env before reading SENTRY_DSN and RUST_LOG
    let _ = dotenvy::dotenv();
    let _sentry_guard = telemetry::init_sentry();
    telemetry::init_tracing();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = ClientConfig::from_env()?;
    tracing::debug!(?config, "Loaded configuration");
    let client = ApiClient::new(&config)?;
    let policy = config.numeric_policy;
    let format = if cli.json { Format::Json } else { Format::Table };

    match cli.command {
        Commands::Inventory { action } => {
            let mut desk = InventoryDesk::new(InventoryService::new(client), policy);
            inventory::items(&mut desk, action, format).await?;
        }
        Commands::Category { action } => {
            let mut desk = InventoryDesk::new(InventoryService::new(client), policy);
            inventory::categories(&mut desk, action, format).await?;
        }
        Commands::Campaigns { action } => {
            let mut manager = CollectionManager::new(CampaignService::new(client), policy);
            collection::run(&mut manager, action, format).await?;
        }
        Commands::Employees { action } => {
            let mut manager = CollectionManager::new(EmployeeService::new(client), policy);
            collection::run(&mut manager, action, format).await?;
        }
        Commands::Payroll { action } => {
            let mut manager = CollectionManager::new(PayrollService::new(client), policy);
            collection::run(&mut manager, action, format).await?;
        }
    }
    Ok(())
}
