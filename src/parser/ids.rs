//! Token identity sources
//!
//! Ids only need to be unique within the source that produced them; they carry
//! no ordering meaning beyond creation order.

use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Stable identity of one token occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenId(pub u64);

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "token-{}", self.0)
    }
}

/// Hands out fresh token ids.
pub trait IdSource {
    fn next_id(&self) -> TokenId;
}

/// Deterministic counter for a single thread, starting at a fixed value.
#[derive(Debug, Default)]
pub struct SequentialIds {
    next: Cell<u64>,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::starting_at(0)
    }

    pub fn starting_at(first: u64) -> Self {
        SequentialIds {
            next: Cell::new(first),
        }
    }
}

impl IdSource for SequentialIds {
    fn next_id(&self) -> TokenId {
        let id = self.next.get();
        self.next.set(id + 1);
        TokenId(id)
    }
}

/// Counter that can be shared between threads tokenizing concurrently.
#[derive(Debug, Default)]
pub struct AtomicIds {
    next: AtomicU64,
}

impl AtomicIds {
    pub fn new() -> Self {
        AtomicIds {
            next: AtomicU64::new(0),
        }
    }
}

impl IdSource for AtomicIds {
    fn next_id(&self) -> TokenId {
        TokenId(self.next.fetch_add(1, Ordering::Relaxed))
    }
}
