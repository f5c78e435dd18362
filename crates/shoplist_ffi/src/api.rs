//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level shopping list functions to Dart via FRB.
//! - Own the process-wide store, coordinator and worker runtime.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Every shopping call returns an envelope with `ok` and `message`.
//! - Bootstrap happens once per process; a failed bootstrap is reported by
//!   every later call instead of being retried.

use log::{error, info};
use shoplist_core::config::DEFAULT_DB_FILE_NAME;
use shoplist_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    FormErrors, ItemFilter, ItemForm, ItemId, ItemPriority, ItemStore, PriceSort, SharingPolicy,
    ShoppingItem, ShoppingListService, StoreError, SummarySnapshot,
};
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};
use tokio::runtime::{Builder, Runtime};

const WORKER_THREADS: usize = 2;
static SHOPPING_APP: OnceLock<Result<ShoppingApp, String>> = OnceLock::new();

struct ShoppingApp {
    runtime: Runtime,
    store: Arc<ItemStore>,
    service: ShoppingListService,
}

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Sync call; may perform small file-system setup work.
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Shopping item as shown by list rows and the edit dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShoppingItemView {
    pub id: i64,
    pub category: String,
    pub name: String,
    pub description: String,
    pub estimated_price: i64,
    pub is_bought: bool,
    /// `NORMAL` or `HIGH`.
    pub priority: String,
}

/// List response for the main screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShoppingListResponse {
    pub ok: bool,
    pub message: String,
    pub items: Vec<ShoppingItemView>,
}

/// Category picker response; `All` is always first on success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShoppingCategoriesResponse {
    pub ok: bool,
    pub message: String,
    pub categories: Vec<String>,
}

/// Response of the edit dialog save action.
///
/// The `*_invalid` flags mirror the dialog's inline field errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShoppingSaveResponse {
    pub ok: bool,
    pub message: String,
    pub name_invalid: bool,
    pub description_invalid: bool,
    pub price_invalid: bool,
    pub category_invalid: bool,
}

impl ShoppingSaveResponse {
    fn saved(message: impl Into<String>) -> Self {
        Self::with_errors(true, message, FormErrors::default())
    }

    fn failure(message: impl Into<String>) -> Self {
        Self::with_errors(false, message, FormErrors::default())
    }

    fn with_errors(ok: bool, message: impl Into<String>, errors: FormErrors) -> Self {
        Self {
            ok,
            message: message.into(),
            name_invalid: errors.name,
            description_invalid: errors.description,
            price_invalid: errors.price,
            category_invalid: errors.category,
        }
    }
}

/// Generic action response for toggle/delete flows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShoppingActionResponse {
    pub ok: bool,
    pub message: String,
    /// Number of removed or updated rows.
    pub affected: u64,
}

impl ShoppingActionResponse {
    fn success(message: impl Into<String>, affected: usize) -> Self {
        Self {
            ok: true,
            message: message.into(),
            affected: u64::try_from(affected).unwrap_or(u64::MAX),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
            affected: 0,
        }
    }
}

/// Summary screen counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShoppingSummaryResponse {
    pub ok: bool,
    pub message: String,
    pub all_items: i64,
    pub important_items: i64,
    pub bought_items: i64,
    pub pending_items: i64,
}

/// Lists items matching the dropdown labels of the main screen.
///
/// Input semantics:
/// - `category`: exact category or `All`.
/// - `priority`: `All`, or a priority name compared ignoring case.
/// - `status`: `All|Pending|Bought`.
/// - `price_sort`: `None|Low to High|High to Low`.
/// - Unknown priority or status labels select no items; an unknown
///   `price_sort` label fails the call.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
/// - Items keep bought/priority order unless a price sort is chosen.
#[flutter_rust_bridge::frb(sync)]
pub fn shopping_list_items(
    category: String,
    priority: String,
    status: String,
    search_query: String,
    price_sort: String,
) -> ShoppingListResponse {
    let sort = match price_sort.parse::<PriceSort>() {
        Ok(sort) => sort,
        Err(err) => return list_failure(format!("shopping_list_items failed: {err}")),
    };
    let filter = ItemFilter::from_labels(&category, &priority, &status, search_query.trim());

    match shopping_app() {
        Ok(app) => {
            let items = sort
                .apply(&app.service.filter(filter).current())
                .into_iter()
                .map(to_item_view)
                .collect::<Vec<_>>();
            let message = if items.is_empty() {
                "No items.".to_string()
            } else {
                format!("Found {} item(s).", items.len())
            };
            ShoppingListResponse {
                ok: true,
                message,
                items,
            }
        }
        Err(err) => list_failure(format!("shopping_list_items failed: {err}")),
    }
}

/// Lists category picker entries.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn shopping_categories() -> ShoppingCategoriesResponse {
    match shopping_app() {
        Ok(app) => ShoppingCategoriesResponse {
            ok: true,
            message: "Categories loaded.".to_string(),
            categories: app.service.categories().current(),
        },
        Err(err) => ShoppingCategoriesResponse {
            ok: false,
            message: format!("shopping_categories failed: {err}"),
            categories: Vec::new(),
        },
    }
}

/// Saves the edit dialog: inserts when `item_id` is `None`, otherwise
/// replaces the stored item with that id.
///
/// # FFI contract
/// - Sync call; blocks until the write is applied.
/// - Never panics.
/// - Invalid fields are flagged and nothing is written.
#[flutter_rust_bridge::frb(sync)]
pub fn shopping_save_item(
    item_id: Option<i64>,
    name: String,
    description: String,
    price_text: String,
    category: Option<String>,
    priority: String,
) -> ShoppingSaveResponse {
    let priority = match priority.parse::<ItemPriority>() {
        Ok(priority) => priority,
        Err(err) => return ShoppingSaveResponse::failure(format!("shopping_save_item failed: {err}")),
    };
    let form = ItemForm {
        name,
        description,
        price_text,
        category,
        priority,
    };

    let app = match shopping_app() {
        Ok(app) => app,
        Err(err) => return ShoppingSaveResponse::failure(format!("shopping_save_item failed: {err}")),
    };
    let editing = match item_id {
        Some(id) => match load_item(app, id) {
            Ok(item) => Some(item),
            Err(err) => {
                return ShoppingSaveResponse::failure(format!("shopping_save_item failed: {err}"))
            }
        },
        None => None,
    };

    match app.service.save_form(&form, editing.as_ref()) {
        Ok(pending) => match app.runtime.block_on(pending.wait()) {
            Ok(()) if editing.is_some() => ShoppingSaveResponse::saved("Item updated."),
            Ok(()) => ShoppingSaveResponse::saved("Item added."),
            Err(err) => ShoppingSaveResponse::failure(format!("shopping_save_item failed: {err}")),
        },
        Err(errors) => {
            ShoppingSaveResponse::with_errors(false, format!("Invalid item: {errors}"), errors)
        }
    }
}

/// Marks an item bought or pending.
///
/// # FFI contract
/// - Sync call; blocks until the write is applied.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn shopping_set_bought(item_id: i64, is_bought: bool) -> ShoppingActionResponse {
    let result = shopping_app().and_then(|app| {
        let item = load_item(app, item_id)?;
        app.runtime
            .block_on(app.service.toggle_bought(&item, is_bought).wait())
            .map_err(|err| err.to_string())
    });
    match result {
        Ok(()) => ShoppingActionResponse::success("Item updated.", 1),
        Err(err) => ShoppingActionResponse::failure(format!("shopping_set_bought failed: {err}")),
    }
}

/// Deletes one item.
///
/// # FFI contract
/// - Sync call; blocks until the write is applied.
/// - Never panics; an unknown id is reported as failure.
#[flutter_rust_bridge::frb(sync)]
pub fn shopping_delete_item(item_id: i64) -> ShoppingActionResponse {
    let result = shopping_app().and_then(|app| {
        let item = load_item(app, item_id)?;
        app.runtime
            .block_on(app.service.delete_item(&item).wait())
            .map_err(|err| err.to_string())
    });
    match result {
        Ok(()) => ShoppingActionResponse::success("Item deleted.", 1),
        Err(err) => ShoppingActionResponse::failure(format!("shopping_delete_item failed: {err}")),
    }
}

/// Deletes every item.
///
/// # FFI contract
/// - Sync call; blocks until the write is applied.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn shopping_delete_all() -> ShoppingActionResponse {
    let result = shopping_app().and_then(|app| {
        app.runtime
            .block_on(app.service.delete_all_items().wait())
            .map_err(|err| err.to_string())
    });
    match result {
        Ok(removed) => ShoppingActionResponse::success(format!("Deleted {removed} item(s)."), removed),
        Err(err) => ShoppingActionResponse::failure(format!("shopping_delete_all failed: {err}")),
    }
}

/// Deletes every bought item.
///
/// # FFI contract
/// - Sync call; blocks until the write is applied.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn shopping_delete_bought() -> ShoppingActionResponse {
    let result = shopping_app().and_then(|app| {
        app.runtime
            .block_on(app.service.delete_bought_items().wait())
            .map_err(|err| err.to_string())
    });
    match result {
        Ok(removed) => ShoppingActionResponse::success(format!("Deleted {removed} item(s)."), removed),
        Err(err) => ShoppingActionResponse::failure(format!("shopping_delete_bought failed: {err}")),
    }
}

/// Returns the counts shown by the summary screen.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn shopping_summary() -> ShoppingSummaryResponse {
    let result = shopping_app().and_then(|app| {
        app.runtime
            .block_on(app.service.summary_counts())
            .map_err(|err| err.to_string())
    });
    match result {
        Ok(counts) => ShoppingSummaryResponse {
            ok: true,
            message: "Summary loaded.".to_string(),
            all_items: counts.all_items,
            important_items: counts.important_items,
            bought_items: counts.bought_items,
            pending_items: SummarySnapshot::from(counts).pending_items(),
        },
        Err(err) => ShoppingSummaryResponse {
            ok: false,
            message: format!("shopping_summary failed: {err}"),
            all_items: 0,
            important_items: 0,
            bought_items: 0,
            pending_items: 0,
        },
    }
}

fn shopping_app() -> Result<&'static ShoppingApp, String> {
    SHOPPING_APP
        .get_or_init(start_shopping_app)
        .as_ref()
        .map_err(Clone::clone)
}

fn start_shopping_app() -> Result<ShoppingApp, String> {
    let db_path = resolve_db_path();
    let runtime = Builder::new_multi_thread()
        .worker_threads(WORKER_THREADS)
        .thread_name("shoplist-worker")
        .build()
        .map_err(|err| format!("worker runtime start failed: {err}"))?;
    let store = ItemStore::open(&db_path, SharingPolicy::default()).map_err(|err| {
        error!("event=ffi_init module=ffi status=error error={err}");
        format!("shopping DB open failed: {err}")
    })?;
    let store = Arc::new(store);
    let service = ShoppingListService::new(Arc::clone(&store), runtime.handle());
    info!("event=ffi_init module=ffi status=ok");

    Ok(ShoppingApp {
        runtime,
        store,
        service,
    })
}

fn resolve_db_path() -> PathBuf {
    if let Ok(raw) = std::env::var("SHOPLIST_DB_PATH") {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }
    std::env::temp_dir().join(DEFAULT_DB_FILE_NAME)
}

fn load_item(app: &ShoppingApp, item_id: ItemId) -> Result<ShoppingItem, String> {
    match app.store.get(item_id) {
        Ok(Some(item)) => Ok(item),
        Ok(None) => Err(StoreError::NotFound(item_id).to_string()),
        Err(err) => Err(err.to_string()),
    }
}

fn list_failure(message: String) -> ShoppingListResponse {
    ShoppingListResponse {
        ok: false,
        message,
        items: Vec::new(),
    }
}

fn to_item_view(item: ShoppingItem) -> ShoppingItemView {
    ShoppingItemView {
        id: item.id,
        category: item.category,
        name: item.name,
        description: item.description,
        estimated_price: item.estimated_price,
        is_bought: item.is_bought,
        priority: item.priority.as_str().to_string(),
    }
}
