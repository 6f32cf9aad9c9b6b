//! Traits shared by every record a desk manages.

use std::borrow::Cow;
use std::fmt;
use std::hash::Hash;

/// One entity in a remote collection.
///
/// The id is assigned by the backend and is the only identity a collection
/// knows about: two records with the same id are the same record.
pub trait Record: Clone {
    /// Id type, usually one of the `define_id!` newtypes.
    type Id: Copy + Eq + Hash + fmt::Debug + fmt::Display;

    /// Server-assigned id.
    fn id(&self) -> Self::Id;

    /// Short name used in confirmations and log lines.
    fn label(&self) -> &str;
}

/// Fields the filter predicate looks at.
///
/// A record exposes which text fields the free-text search covers plus the
/// values the status and category dropdowns compare against.
pub trait Searchable {
    /// Text fields covered by the free-text search.
    fn search_fields(&self) -> Vec<Cow<'_, str>>;

    /// Status value compared (case-insensitively) by the status filter.
    fn status_value(&self) -> Option<&str> {
        None
    }

    /// Category value compared (exactly) by the category filter.
    fn category_value(&self) -> Option<&str> {
        None
    }
}
