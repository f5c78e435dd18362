//! Category labels offered by the list and editing dialogs.
//!
//! # Invariants
//! - `ALL_CATEGORIES` is always the first entry of a category listing.
//! - De-duplication beyond the built-in set is exact-string, not case-folded.

use crate::model::item::ShoppingItem;
use std::collections::HashSet;

/// Pseudo-category that disables category filtering.
pub const ALL_CATEGORIES: &str = "All";

const BUILT_IN_CATEGORIES: [&str; 14] = [
    "Electronics",
    "Dairy",
    "Food",
    "Vegetables",
    "Fruits",
    "Beverages",
    "Books",
    "Clothing",
    "Household",
    "Beauty & Personal Care",
    "Health & Wellness",
    "Toys & Games",
    "Sports & Outdoors",
    "Pet Supplies",
];

/// Built-in categories sorted case-insensitively.
pub fn default_categories() -> Vec<String> {
    let mut categories: Vec<String> = BUILT_IN_CATEGORIES
        .iter()
        .map(|name| (*name).to_string())
        .collect();
    categories.sort_by_key(|name| name.to_lowercase());
    categories
}

/// Builds the category picker list for the given items.
///
/// Result is `["All"]` followed by the sorted built-ins, then any item
/// category not seen yet, in item order.
pub fn merge_categories(items: &[ShoppingItem]) -> Vec<String> {
    let defaults = default_categories();
    let mut seen: HashSet<String> = HashSet::with_capacity(defaults.len() + items.len());
    let mut merged = Vec::with_capacity(defaults.len() + 1);
    merged.push(ALL_CATEGORIES.to_string());

    let candidates = defaults
        .into_iter()
        .chain(items.iter().map(|item| item.category.clone()));
    for category in candidates {
        if seen.insert(category.clone()) {
            merged.push(category);
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::{default_categories, merge_categories, ALL_CATEGORIES};
    use crate::model::item::{ItemDraft, ItemPriority, ShoppingItem};

    fn item(id: i64, category: &str) -> ShoppingItem {
        ShoppingItem::from_draft(
            id,
            ItemDraft::new(category, "name", "desc", 1, ItemPriority::Normal),
        )
    }

    #[test]
    fn defaults_are_sorted_ignoring_case() {
        let defaults = default_categories();
        assert_eq!(defaults.len(), 14);
        assert_eq!(defaults.first().map(String::as_str), Some("Beauty & Personal Care"));
        assert_eq!(defaults.last().map(String::as_str), Some("Vegetables"));
        let lowered: Vec<String> = defaults.iter().map(|name| name.to_lowercase()).collect();
        let mut sorted = lowered.clone();
        sorted.sort();
        assert_eq!(lowered, sorted);
    }

    #[test]
    fn merge_puts_all_first_and_appends_custom_categories_once() {
        let items = vec![item(1, "Garden"), item(2, "Dairy"), item(3, "Garden"), item(4, "dairy")];
        let merged = merge_categories(&items);

        assert_eq!(merged[0], ALL_CATEGORIES);
        assert_eq!(merged.len(), 1 + 14 + 2);
        assert_eq!(&merged[15..], ["Garden".to_string(), "dairy".to_string()]);
        assert_eq!(merged.iter().filter(|name| *name == "Dairy").count(), 1);
    }
}
