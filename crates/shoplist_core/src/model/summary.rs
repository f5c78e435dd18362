//! Summary screen value objects.
//!
//! # Invariants
//! - A snapshot is read once at construction and never synchronized again.
//! - `pending_items` may go negative when counts were captured at different
//!   instants; this is displayed as-is. It saturates at the `i64` bounds.

use serde::{Deserialize, Serialize};

/// Counts carried across the navigation boundary into the summary view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryCounts {
    pub all_items: i64,
    pub important_items: i64,
    pub bought_items: i64,
}

/// Immutable summary displayed by the summary view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummarySnapshot {
    counts: SummaryCounts,
}

impl SummarySnapshot {
    pub fn new(counts: SummaryCounts) -> Self {
        Self { counts }
    }

    pub fn all_items(&self) -> i64 {
        self.counts.all_items
    }

    pub fn important_items(&self) -> i64 {
        self.counts.important_items
    }

    pub fn bought_items(&self) -> i64 {
        self.counts.bought_items
    }

    pub fn pending_items(&self) -> i64 {
        self.counts.all_items.saturating_sub(self.counts.bought_items)
    }
}

impl From<SummaryCounts> for SummarySnapshot {
    fn from(counts: SummaryCounts) -> Self {
        Self::new(counts)
    }
}
