//! Subcommand implementations.
//!
//! Every command drives a [`CollectionManager`] the same way a list screen
//! would: load, filter, open a form, submit, confirm deletes. Notifications
//! the manager queues are forwarded to the log after each command.

pub mod collection;
pub mod inventory;

use clap::Args;
use opsdesk_client::{ActionError, CollectionManager, CollectionService};
use opsdesk_core::Filter;

use crate::output;

/// Boxed error returned by every command.
pub type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Search and dropdown filters for `list`.
#[derive(Debug, Clone, Default, Args)]
pub struct FilterArgs {
    /// Case-insensitive text search
    #[arg(short, long, default_value = "")]
    pub search: String,

    /// Status to show (`all` for every status)
    #[arg(long, default_value = "all")]
    pub status: String,

    /// Category, channel or department to show (`all` for every value)
    #[arg(short, long, default_value = "all")]
    pub category: String,
}

impl FilterArgs {
    /// Build the filter predicate from trimmed arguments.
    #[must_use]
    pub fn filter(&self) -> Filter {
        Filter::new(self.search.trim(), self.status.trim(), self.category.trim())
    }
}

/// Form fields given as `name=value`.
#[derive(Debug, Clone, Default, Args)]
pub struct FieldArgs {
    /// Form field, e.g. `-f quantity=12` (repeatable)
    #[arg(short = 'f', long = "field", value_parser = parse_field)]
    pub fields: Vec<(String, String)>,
}

/// Parse one `name=value` pair.
fn parse_field(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got {raw:?}"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing field name in {raw:?}"));
    }
    Ok((name.to_owned(), value.to_owned()))
}

/// Load the collection, forwarding notifications either way.
pub async fn load<S: CollectionService>(manager: &mut CollectionManager<S>) -> Result<usize, ActionError> {
    let result = manager.load().await;
    output::notifications(manager.drain_notifications());
    result
}

/// Copy `fields` into the open form.
///
/// # Errors
///
/// Returns an error if a field is not part of the form.
pub fn fill<S: CollectionService>(
    manager: &mut CollectionManager<S>,
    fields: Vec<(String, String)>,
) -> Result<(), ActionError> {
    for (name, value) in fields {
        manager.set_field(&name, value)?;
    }
    Ok(())
}

/// Refuse to run a destructive command unless `--yes` was given.
pub fn confirmed(message: &str, yes: bool) -> CommandResult {
    if yes {
        return Ok(());
    }
    output::line(message);
    Err("not confirmed; re-run with --yes to proceed".into())
}
