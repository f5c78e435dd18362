//! Core data and logic for the shopping list app.
//! This crate owns item persistence, live views and list/summary rules.

pub mod config;
pub mod db;
pub mod filter;
pub mod live;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;

pub use config::{StoreConfig, StoreLocation};
pub use filter::{
    CategoryFilter, FilterParseError, ItemFilter, PriceSort, PriorityFilter, StatusFilter,
};
pub use live::{LiveView, SharingPolicy, Subscription};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::category::{default_categories, merge_categories, ALL_CATEGORIES};
pub use model::form::{parse_price, FormErrors, ItemForm};
pub use model::item::{ItemDraft, ItemId, ItemPriority, ItemValidationError, ShoppingItem};
pub use model::summary::{SummaryCounts, SummarySnapshot};
pub use repo::item_repo::{
    ItemOrder, ItemRepository, RepoError, RepoResult, SqliteItemRepository,
};
pub use service::shopping_list_service::{PendingCommand, ShoppingListService};
pub use store::item_store::{ItemStore, StoreError, StoreResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
