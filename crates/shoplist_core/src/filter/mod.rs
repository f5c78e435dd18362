//! Filtering and sorting of the live item list.
//!
//! # Responsibility
//! - Parse the list screen's filter labels into typed predicates.
//! - Apply predicates and price ordering as pure transforms.

pub mod item_filter;
pub mod price_sort;

pub use item_filter::{
    CategoryFilter, FilterParseError, ItemFilter, PriorityFilter, StatusFilter, ALL_LABEL,
};
pub use price_sort::PriceSort;
