//! Roll-up figures computed by reducing a whole collection.
//!
//! Summaries are recomputed from scratch after every change; nothing is
//! maintained incrementally. Sums saturate instead of overflowing, since
//! the figures come straight from backend listings.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::records::{Campaign, Employee, InventoryItem, PayrollEntry};
use crate::types::{EmploymentStatus, PayrollStatus, StockStatus};

/// A figure derived from every record of type `R`.
pub trait Summary<R>: Sized {
    /// Reduce `records` into the summary.
    fn summarize(records: &[R]) -> Self;
}

/// Local inventory roll-up, used when the stats endpoint is not consulted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InventorySummary {
    pub total_items: usize,
    pub total_quantity: i64,
    pub total_value: Decimal,
    pub in_stock: usize,
    pub low_stock: usize,
    pub out_of_stock: usize,
    /// Item count per category name.
    pub by_category: BTreeMap<String, usize>,
}

impl Summary<InventoryItem> for InventorySummary {
    fn summarize(records: &[InventoryItem]) -> Self {
        records.iter().fold(Self::default(), |mut acc, item| {
            acc.total_items += 1;
            acc.total_quantity = acc.total_quantity.saturating_add(item.quantity);
            acc.total_value = acc.total_value.saturating_add(item.stock_value());
            match item.status {
                StockStatus::InStock => acc.in_stock += 1,
                StockStatus::LowStock => acc.low_stock += 1,
                StockStatus::OutOfStock => acc.out_of_stock += 1,
            }
            *acc.by_category.entry(item.category.clone()).or_default() += 1;
            acc
        })
    }
}

/// Campaign totals shown above the campaign list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CampaignTotals {
    pub campaigns: usize,
    pub budget: Decimal,
    pub spent: Decimal,
    pub reach: i64,
    pub conversions: i64,
}

impl CampaignTotals {
    /// Budget not yet spent.
    #[must_use]
    pub fn remaining(&self) -> Decimal {
        self.budget.saturating_sub(self.spent)
    }
}

impl Summary<Campaign> for CampaignTotals {
    fn summarize(records: &[Campaign]) -> Self {
        records.iter().fold(Self::default(), |mut acc, c| {
            acc.campaigns += 1;
            acc.budget = acc.budget.saturating_add(c.budget);
            acc.spent = acc.spent.saturating_add(c.spent);
            acc.reach = acc.reach.saturating_add(c.reach);
            acc.conversions = acc.conversions.saturating_add(c.conversions);
            acc
        })
    }
}

/// Headcount and salary roll-up for the employee list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HeadcountSummary {
    pub total: usize,
    pub active: usize,
    pub on_leave: usize,
    pub terminated: usize,
    /// Sum of annual salaries of employees not terminated.
    pub salary_total: Decimal,
    /// Headcount per department, terminated employees excluded.
    pub by_department: BTreeMap<String, usize>,
}

impl Summary<Employee> for HeadcountSummary {
    fn summarize(records: &[Employee]) -> Self {
        records.iter().fold(Self::default(), |mut acc, e| {
            acc.total += 1;
            match e.status {
                EmploymentStatus::Active => acc.active += 1,
                EmploymentStatus::OnLeave => acc.on_leave += 1,
                EmploymentStatus::Terminated => {
                    acc.terminated += 1;
                    return acc;
                }
            }
            acc.salary_total = acc.salary_total.saturating_add(e.salary);
            *acc.by_department.entry(e.department.clone()).or_default() += 1;
            acc
        })
    }
}

/// Payroll totals for the current listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PayrollTotals {
    pub entries: usize,
    pub gross: Decimal,
    pub deductions: Decimal,
    pub net: Decimal,
    pub pending: usize,
    pub processed: usize,
    pub paid: usize,
}

impl Summary<PayrollEntry> for PayrollTotals {
    fn summarize(records: &[PayrollEntry]) -> Self {
        records.iter().fold(Self::default(), |mut acc, p| {
            acc.entries += 1;
            acc.gross = acc.gross.saturating_add(p.gross_pay());
            acc.deductions = acc.deductions.saturating_add(p.deductions);
            acc.net = acc.net.saturating_add(p.net_pay);
            match p.status {
                PayrollStatus::Pending => acc.pending += 1,
                PayrollStatus::Processed => acc.processed += 1,
                PayrollStatus::Paid => acc.paid += 1,
            }
            acc
        })
    }
}
