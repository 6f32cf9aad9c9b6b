//! HTTP implementations of [`crate::CollectionService`], one per domain.

mod campaigns;
mod employees;
mod inventory;
mod payroll;

pub use campaigns::CampaignService;
pub use employees::EmployeeService;
pub use inventory::InventoryService;
pub use payroll::PayrollService;
