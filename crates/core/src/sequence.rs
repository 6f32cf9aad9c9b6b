//! Ordering of responses to requests against one collection.
//!
//! Every request is stamped with a [`Ticket`] when it is issued. When its
//! response arrives, it is applied only if no later-issued request has
//! already been applied, so the most recent user action always wins no
//! matter which response the network delivers first.
//!
//! [`RequestSequencer`] orders requests that replace the same state (list
//! loads, stats refreshes). [`KeyedSequencer`] orders writes per record, so
//! overlapping writes to different records all land.

use std::collections::HashMap;
use std::hash::Hash;

/// Sequence number of an issued request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
    /// The raw sequence number.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for Ticket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Issues tickets and decides which responses are stale.
#[derive(Debug, Clone, Default)]
pub struct RequestSequencer {
    issued: u64,
    applied: Option<u64>,
}

impl RequestSequencer {
    /// Create a sequencer with nothing issued.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            issued: 0,
            applied: None,
        }
    }

    /// Stamp a new request.
    pub fn issue(&mut self) -> Ticket {
        self.issued += 1;
        Ticket(self.issued)
    }

    /// Returns `true` if a later request has already been applied.
    #[must_use]
    pub fn is_stale(&self, ticket: Ticket) -> bool {
        self.applied.is_some_and(|applied| ticket.0 < applied)
    }

    /// Record that the response for `ticket` is being applied.
    ///
    /// Returns `false` (and records nothing) if the response is stale and
    /// must be discarded.
    pub fn accept(&mut self, ticket: Ticket) -> bool {
        if self.is_stale(ticket) {
            return false;
        }
        self.applied = Some(ticket.0);
        true
    }

    /// Highest ticket applied so far.
    #[must_use]
    pub fn last_applied(&self) -> Option<Ticket> {
        self.applied.map(Ticket)
    }
}

/// Issues tickets and decides staleness per key.
#[derive(Debug, Clone)]
pub struct KeyedSequencer<K> {
    issued: u64,
    applied: HashMap<K, u64>,
}

impl<K> Default for KeyedSequencer<K> {
    fn default() -> Self {
        Self {
            issued: 0,
            applied: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash> KeyedSequencer<K> {
    /// Create a sequencer with nothing issued.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp a new request.
    pub fn issue(&mut self) -> Ticket {
        self.issued += 1;
        Ticket(self.issued)
    }

    /// Returns `true` if a later request for `key` has already been applied.
    #[must_use]
    pub fn is_stale(&self, key: &K, ticket: Ticket) -> bool {
        self.applied.get(key).is_some_and(|&applied| ticket.0 < applied)
    }

    /// Record that the response for `ticket` on `key` is being applied.
    ///
    /// Returns `false` (and records nothing) if the response is stale.
    pub fn accept(&mut self, key: K, ticket: Ticket) -> bool {
        if self.is_stale(&key, ticket) {
            return false;
        }
        self.applied.insert(key, ticket.0);
        true
    }

    /// Drop per-key history, e.g. after a full reload.
    pub fn reset_keys(&mut self) {
        self.applied.clear();
    }
}
