//! Item list filter predicates.
//!
//! # Invariants
//! - An item passes only if every predicate accepts it.
//! - `ItemFilter::default()` accepts every item.
//! - The `"All"` sentinel is matched exactly; a priority label matches the
//!   enum name ignoring case; any other label accepts nothing.

use crate::model::category::ALL_CATEGORIES;
use crate::model::item::{ItemPriority, ShoppingItem};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Label shared by every "no filtering" option.
pub const ALL_LABEL: &str = "All";

/// Label parsing failure for the price sort dropdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterParseError {
    UnknownPriceSort(String),
}

impl Display for FilterParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownPriceSort(value) => write!(
                f,
                "unknown price sort `{value}`; expected None|Low to High|High to Low"
            ),
        }
    }
}

impl Error for FilterParseError {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum CategoryFilter {
    #[default]
    All,
    Exact(String),
}

impl CategoryFilter {
    pub fn from_label(label: &str) -> Self {
        if label == ALL_CATEGORIES {
            Self::All
        } else {
            Self::Exact(label.to_string())
        }
    }

    fn accepts(&self, item: &ShoppingItem) -> bool {
        match self {
            Self::All => true,
            Self::Exact(category) => item.category == *category,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum PriorityFilter {
    #[default]
    All,
    Only(ItemPriority),
    /// Label naming no priority; accepts nothing.
    Unmatched(String),
}

impl PriorityFilter {
    pub fn from_label(label: &str) -> Self {
        if label == ALL_LABEL {
            return Self::All;
        }
        [ItemPriority::Normal, ItemPriority::High]
            .into_iter()
            .find(|priority| priority.as_str().eq_ignore_ascii_case(label))
            .map_or_else(|| Self::Unmatched(label.to_string()), Self::Only)
    }

    fn accepts(&self, item: &ShoppingItem) -> bool {
        match self {
            Self::All => true,
            Self::Only(priority) => item.priority == *priority,
            Self::Unmatched(_) => false,
        }
    }
}

/// Bought-state filter. Labels are `All`, `Pending`, `Bought`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum StatusFilter {
    #[default]
    All,
    Pending,
    Bought,
    /// Any other label; accepts nothing.
    Unmatched(String),
}

impl StatusFilter {
    pub fn from_label(label: &str) -> Self {
        match label {
            ALL_LABEL => Self::All,
            "Pending" => Self::Pending,
            "Bought" => Self::Bought,
            other => Self::Unmatched(other.to_string()),
        }
    }

    fn accepts(&self, item: &ShoppingItem) -> bool {
        match self {
            Self::All => true,
            Self::Pending => !item.is_bought,
            Self::Bought => item.is_bought,
            Self::Unmatched(_) => false,
        }
    }
}

/// Combined filter applied to the live item list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ItemFilter {
    pub category: CategoryFilter,
    pub priority: PriorityFilter,
    pub status: StatusFilter,
    /// Case-insensitive substring of `name`; empty matches all.
    pub search_query: String,
}

impl ItemFilter {
    /// Builds a filter from the dropdown labels shown by the list screen.
    pub fn from_labels(category: &str, priority: &str, status: &str, search_query: &str) -> Self {
        Self {
            category: CategoryFilter::from_label(category),
            priority: PriorityFilter::from_label(priority),
            status: StatusFilter::from_label(status),
            search_query: search_query.to_string(),
        }
    }

    pub fn matches(&self, item: &ShoppingItem) -> bool {
        self.category.accepts(item)
            && self.priority.accepts(item)
            && self.status.accepts(item)
            && name_contains(&item.name, &self.search_query)
    }

    /// Keeps matching items in their original order.
    pub fn apply(&self, items: &[ShoppingItem]) -> Vec<ShoppingItem> {
        items
            .iter()
            .filter(|item| self.matches(item))
            .cloned()
            .collect()
    }
}

fn name_contains(name: &str, query: &str) -> bool {
    query.is_empty() || name.to_lowercase().contains(&query.to_lowercase())
}
