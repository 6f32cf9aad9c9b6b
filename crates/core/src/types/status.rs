//! Status enums for the records each desk manages.
//!
//! Statuses are computed by the backend and only displayed or filtered on
//! here. Each enum serializes as its `snake_case` wire value, which is also
//! the value the status filter compares against.

use serde::{Deserialize, Serialize};

/// Error returned when parsing an unknown status value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind}: {value}")]
pub struct UnknownStatus {
    /// Which status type was being parsed.
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

/// Defines `as_str`, `label`, `ALL`, `Display` and case-insensitive `FromStr`
/// for a status enum whose variants map to fixed wire values.
macro_rules! status_values {
    ($name:ident, $kind:literal, { $($variant:ident => ($wire:literal, $label:literal)),+ $(,)? }) => {
        impl $name {
            /// Every variant, in display order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Wire value as sent by the backend.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $wire),+
                }
            }

            /// Human-readable label.
            #[must_use]
            pub const fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = UnknownStatus;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                $(
                    if s.eq_ignore_ascii_case($wire) {
                        return Ok(Self::$variant);
                    }
                )+
                Err(UnknownStatus {
                    kind: $kind,
                    value: s.to_owned(),
                })
            }
        }
    };
}

/// Stock level of an inventory item relative to its thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    #[default]
    InStock,
    LowStock,
    OutOfStock,
}

status_values!(StockStatus, "stock status", {
    InStock => ("in_stock", "In Stock"),
    LowStock => ("low_stock", "Low Stock"),
    OutOfStock => ("out_of_stock", "Out of Stock"),
});

/// Marketing campaign lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CampaignStatus {
    #[default]
    Draft,
    Active,
    Paused,
    Completed,
}

status_values!(CampaignStatus, "campaign status", {
    Draft => ("draft", "Draft"),
    Active => ("active", "Active"),
    Paused => ("paused", "Paused"),
    Completed => ("completed", "Completed"),
});

/// Channel a campaign runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CampaignChannel {
    #[default]
    Email,
    Sms,
    Social,
    Search,
    Display,
}

status_values!(CampaignChannel, "campaign channel", {
    Email => ("email", "Email"),
    Sms => ("sms", "SMS"),
    Social => ("social", "Social"),
    Search => ("search", "Search"),
    Display => ("display", "Display"),
});

/// Employment status of an employee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentStatus {
    #[default]
    Active,
    OnLeave,
    Terminated,
}

status_values!(EmploymentStatus, "employment status", {
    Active => ("active", "Active"),
    OnLeave => ("on_leave", "On Leave"),
    Terminated => ("terminated", "Terminated"),
});

/// Processing status of a payroll entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PayrollStatus {
    #[default]
    Pending,
    Processed,
    Paid,
}

status_values!(PayrollStatus, "payroll status", {
    Pending => ("pending", "Pending"),
    Processed => ("processed", "Processed"),
    Paid => ("paid", "Paid"),
});
