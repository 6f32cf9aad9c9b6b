//! Ops Desk Core - Shared types and collection logic.
//!
//! This crate provides what every Ops Desk list screen has in common:
//! - a local mirror of a remote collection ([`collection`])
//! - the search and dropdown predicate ([`filter`])
//! - string-typed form drafts and their conversion ([`draft`])
//! - roll-up figures over a collection ([`summary`])
//! - response ordering, user feedback and the screen lifecycle
//!   ([`sequence`], [`feedback`], [`screen`])
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O and no HTTP
//! clients. The client crate drives these pieces against the backend.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod collection;
pub mod draft;
pub mod feedback;
pub mod filter;
pub mod record;
pub mod records;
pub mod screen;
pub mod sequence;
pub mod summary;
pub mod types;

pub use collection::Collection;
pub use draft::{
    Draft, DraftError, DraftInput, DraftSchema, Editable, FieldKind, FieldSpec, NumericPolicy,
    ParseError, ValidationError, parse_date, parse_decimal, parse_integer,
};
pub use feedback::{Confirmation, Level, Notification, Notifications};
pub use filter::{Filter, FilterChoice};
pub use record::{Record, Searchable};
pub use records::*;
pub use screen::{Operation, ScreenState, StateError};
pub use sequence::{KeyedSequencer, RequestSequencer, Ticket};
pub use summary::{CampaignTotals, HeadcountSummary, InventorySummary, PayrollTotals, Summary};
pub use types::*;
