//! Ops Desk Client - Backend access and collection managers.
//!
//! # Layers
//!
//! - [`ApiClient`] speaks HTTP/JSON to the backend and maps failures to
//!   [`ServiceError`].
//! - [`services`] wraps the client once per domain behind the
//!   [`CollectionService`] trait.
//! - [`CollectionManager`] mirrors one remote collection locally, owns the
//!   open form and reconciles the cache with write results.
//! - [`InventoryDesk`] adds the category sub-resource to the inventory
//!   manager.
//!
//! Managers are exclusively owned (`&mut self`); nothing here spawns tasks.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod desk;
pub mod error;
pub mod http;
pub mod manager;
pub mod service;
pub mod services;

pub use config::{ClientConfig, ConfigError};
pub use desk::InventoryDesk;
pub use error::{ActionError, ServiceError};
pub use http::ApiClient;
pub use manager::{CollectionManager, FormMode, OpenForm, PendingDelete};
pub use service::{CategoryService, CollectionService};
pub use services::{CampaignService, EmployeeService, InventoryService, PayrollService};
