//! Rendering of records, summaries and notifications on stdout.

use opsdesk_core::{Campaign, Category, Employee, InventoryItem, Notification, PayrollEntry};
use serde::Serialize;

/// How command output is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Table,
    Json,
}

/// A record printable as one table row.
pub trait Row {
    /// Column headers.
    const HEADERS: &'static [&'static str];

    /// Cells in header order.
    fn cells(&self) -> Vec<String>;
}

impl Row for InventoryItem {
    const HEADERS: &'static [&'static str] =
        &["ID", "NAME", "SKU", "CATEGORY", "QTY", "UNIT PRICE", "STATUS"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.sku.clone(),
            self.category.clone(),
            format!("{} {}", self.quantity, self.unit),
            self.unit_price.to_string(),
            self.status.label().to_owned(),
        ]
    }
}

impl Row for Category {
    const HEADERS: &'static [&'static str] = &["ID", "NAME", "ITEMS", "DESCRIPTION"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.item_count.to_string(),
            self.description.clone().unwrap_or_default(),
        ]
    }
}

impl Row for Campaign {
    const HEADERS: &'static [&'static str] =
        &["ID", "NAME", "CHANNEL", "STATUS", "BUDGET", "SPENT", "REACH", "CONV"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.channel.label().to_owned(),
            self.status.label().to_owned(),
            self.budget.to_string(),
            self.spent.to_string(),
            self.reach.to_string(),
            self.conversions.to_string(),
        ]
    }
}

impl Row for Employee {
    const HEADERS: &'static [&'static str] =
        &["ID", "NAME", "EMAIL", "DEPARTMENT", "POSITION", "STATUS"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.email.to_string(),
            self.department.clone(),
            self.position.clone(),
            self.status.label().to_owned(),
        ]
    }
}

impl Row for PayrollEntry {
    const HEADERS: &'static [&'static str] =
        &["ID", "EMPLOYEE", "DEPARTMENT", "PERIOD", "GROSS", "DEDUCTIONS", "NET", "STATUS"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.employee_name.clone(),
            self.department.clone(),
            self.period.clone(),
            self.gross_pay().to_string(),
            self.deductions.to_string(),
            self.net_pay.to_string(),
            self.status.label().to_owned(),
        ]
    }
}

/// Lay rows out as left-aligned columns.
pub fn table<R: Row>(rows: &[&R]) -> String {
    let body: Vec<Vec<String>> = rows.iter().map(|r| r.cells()).collect();
    let mut widths: Vec<usize> = R::HEADERS.iter().map(|h| h.len()).collect();
    for cells in &body {
        for (width, cell) in widths.iter_mut().zip(cells) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut lines = vec![render(R::HEADERS.iter().copied(), &widths)];
    lines.extend(body.iter().map(|cells| render(cells.iter().map(String::as_str), &widths)));
    lines.join("\n")
}

fn render<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    cells
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_owned()
}

/// Write rows in the chosen format.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
#[allow(clippy::print_stdout)]
pub fn rows<R: Row + Serialize>(format: Format, rows: &[&R]) -> Result<(), serde_json::Error> {
    match format {
        Format::Table => println!("{}", table(rows)),
        Format::Json => println!("{}", serde_json::to_string_pretty(rows)?),
    }
    Ok(())
}

/// Write one value (a record or a summary).
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
#[allow(clippy::print_stdout)]
pub fn value<T: Serialize>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Write a plain message.
#[allow(clippy::print_stdout)]
pub fn line(message: &str) {
    println!("{message}");
}

/// Forward queued notifications to the log.
pub fn notifications(notes: Vec<Notification>) {
    for note in notes {
        match note.level {
            opsdesk_core::Level::Error => tracing::error!("{}", note.message),
            opsdesk_core::Level::Warning => tracing::warn!("{}", note.message),
            opsdesk_core::Level::Info => tracing::info!("{}", note.message),
        }
    }
}
