//! Commands shared by every collection: list, summary, add, edit, delete.

use clap::Subcommand;
use opsdesk_client::{CollectionManager, CollectionService, service::IdOf};
use serde::Serialize;

use super::{CommandResult, FieldArgs, FilterArgs, confirmed, fill, load};
use crate::output::{self, Format, Row};

/// Actions on one collection.
#[derive(Debug, Subcommand)]
pub enum CollectionAction {
    /// List records matching the filters
    List(FilterArgs),
    /// Show summary figures
    #[command(visible_alias = "totals")]
    Summary,
    /// Create a record from form fields
    Add(FieldArgs),
    /// Change fields of an existing record
    Edit {
        /// Record ID
        id: i64,
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Delete a record
    Delete {
        /// Record ID
        id: i64,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

/// Run `action` against the collection behind `manager`.
///
/// Notifications queued by the manager are forwarded to the log whether
/// the action succeeds or not.
pub async fn run<S>(
    manager: &mut CollectionManager<S>,
    action: CollectionAction,
    format: Format,
) -> CommandResult
where
    S: CollectionService,
    S::Record: Row + Serialize,
    S::Stats: Serialize,
    IdOf<S>: From<i64>,
{
    load(manager).await?;
    let result = execute(manager, action, format).await;
    output::notifications(manager.drain_notifications());
    result
}

async fn execute<S>(
    manager: &mut CollectionManager<S>,
    action: CollectionAction,
    format: Format,
) -> CommandResult
where
    S: CollectionService,
    S::Record: Row + Serialize,
    S::Stats: Serialize,
    IdOf<S>: From<i64>,
{
    match action {
        CollectionAction::List(filters) => {
            manager.set_filter(filters.filter());
            output::rows(format, &manager.visible())?;
            Ok(())
        }
        CollectionAction::Summary => match manager.stats() {
            Some(stats) => {
                output::value(stats)?;
                Ok(())
            }
            None => Err(format!("no summary available for {}", S::PLURAL).into()),
        },
        CollectionAction::Add(fields) => {
            manager.open_create();
            save(manager, fields.fields, format).await
        }
        CollectionAction::Edit { id, fields } => {
            manager.open_edit(IdOf::<S>::from(id))?;
            save(manager, fields.fields, format).await
        }
        CollectionAction::Delete { id, yes } => {
            let message = manager.request_delete(IdOf::<S>::from(id))?.message.clone();
            if let Err(e) = confirmed(&message, yes) {
                manager.dismiss_delete();
                return Err(e);
            }
            manager.confirm_delete().await?;
            tracing::info!(id, entity = S::ENTITY, "deleted");
            Ok(())
        }
    }
}

async fn save<S>(
    manager: &mut CollectionManager<S>,
    fields: Vec<(String, String)>,
    format: Format,
) -> CommandResult
where
    S: CollectionService,
    S::Record: Row + Serialize,
{
    fill(manager, fields)?;
    let record = manager.submit().await?;
    output::rows(format, &[&record])?;
    Ok(())
}
