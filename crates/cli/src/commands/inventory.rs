//! Inventory and category commands.
//!
//! # Usage
//!
//! ```bash
//! # Items low on stock in the Tools category
//! opsdesk inventory list --status low_stock --category Tools
//!
//! # Add an item
//! opsdesk inventory add -f name=Widget -f sku=W1 -f category=Tools -f quantity=10 -f unit_price=2.50
//!
//! # Delete a category and every item filed under it
//! opsdesk category delete 4 --yes
//! ```

use clap::Subcommand;
use opsdesk_client::InventoryDesk;
use opsdesk_client::service::CategoryService;
use opsdesk_core::{CategoryId, InventoryItem, InventorySummary, Summary};
use serde::Serialize;

use super::collection::{self, CollectionAction};
use super::{CommandResult, FieldArgs, FilterArgs, confirmed};
use crate::output::{self, Format};

/// Inventory item actions.
#[derive(Debug, Subcommand)]
pub enum InventoryAction {
    /// List items matching the filters
    List(FilterArgs),
    /// Show figures from the backend stats endpoint
    Stats,
    /// Summarize the loaded items locally
    Summary,
    /// Create an item from form fields
    Add(FieldArgs),
    /// Change fields of an existing item
    Edit {
        /// Item ID
        id: i64,
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Delete an item
    Delete {
        /// Item ID
        id: i64,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

/// Category actions.
#[derive(Debug, Subcommand)]
pub enum CategoryAction {
    /// List categories
    List,
    /// Create a category
    Add {
        /// Category name
        #[arg(short, long)]
        name: String,
        /// Optional description
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Delete a category and every item in it
    Delete {
        /// Category ID
        id: i64,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

/// Run an inventory item action.
pub async fn items<S>(desk: &mut InventoryDesk<S>, action: InventoryAction, format: Format) -> CommandResult
where
    S: CategoryService<Record = InventoryItem>,
    S::Stats: Serialize,
{
    let shared = match action {
        InventoryAction::Summary => {
            super::load(desk.items_mut()).await?;
            let summary = InventorySummary::summarize(desk.items().records().as_slice());
            output::value(&summary)?;
            return Ok(());
        }
        InventoryAction::List(filters) => CollectionAction::List(filters),
        InventoryAction::Stats => CollectionAction::Summary,
        InventoryAction::Add(fields) => CollectionAction::Add(fields),
        InventoryAction::Edit { id, fields } => CollectionAction::Edit { id, fields },
        InventoryAction::Delete { id, yes } => CollectionAction::Delete { id, yes },
    };
    collection::run(desk.items_mut(), shared, format).await
}

/// Run a category action.
///
/// Notifications queued by the desk are forwarded to the log whether the
/// action succeeds or not.
pub async fn categories<S>(desk: &mut InventoryDesk<S>, action: CategoryAction, format: Format) -> CommandResult
where
    S: CategoryService<Record = InventoryItem>,
{
    let loaded = desk.load().await;
    output::notifications(desk.items_mut().drain_notifications());
    loaded?;

    let result = category_action(desk, action, format).await;
    output::notifications(desk.items_mut().drain_notifications());
    result
}

async fn category_action<S>(desk: &mut InventoryDesk<S>, action: CategoryAction, format: Format) -> CommandResult
where
    S: CategoryService<Record = InventoryItem>,
{
    match action {
        CategoryAction::List => {
            let categories: Vec<_> = desk.categories().iter().collect();
            output::rows(format, &categories)?;
            Ok(())
        }
        CategoryAction::Add { name, description } => {
            let form = desk.open_category_form();
            form.set("name", name)?;
            form.set("description", description.unwrap_or_default())?;
            let category = desk.submit_category().await?;
            output::rows(format, &[&category])?;
            Ok(())
        }
        CategoryAction::Delete { id, yes } => {
            let message = desk
                .request_category_delete(CategoryId::new(id))?
                .message
                .clone();
            if let Err(e) = confirmed(&message, yes) {
                desk.dismiss_category_delete();
                return Err(e);
            }
            let removed = desk.confirm_category_delete().await?;
            output::line(&format!("Deleted category {id} and {removed} item(s)"));
            Ok(())
        }
    }
}
