//! Core types for Ops Desk.
//!
//! This module provides type-safe wrappers for ids, statuses and emails.

pub mod email;
pub mod id;
pub mod status;

pub use email::{Email, EmailError};
pub use id::*;
pub use status::*;
