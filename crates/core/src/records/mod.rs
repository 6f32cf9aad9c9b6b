//! Records managed by each desk, with their form payloads.

pub mod campaign;
pub mod employee;
pub mod inventory;
pub mod payroll;

pub use campaign::{Campaign, CampaignInput};
pub use employee::{Employee, EmployeeInput};
pub use inventory::{Category, CategoryInput, InventoryItem, InventoryStats, ItemInput};
pub use payroll::{PayrollEntry, PayrollInput};
