//! Durable item store with live item sequences.
//!
//! # Responsibility
//! - Own the single SQLite connection holding the canonical item table.
//! - Serve write operations and point-in-time counts.
//! - Publish ordered live sequences that refresh after every write.
//!
//! # Invariants
//! - All writes are serialized through one connection mutex.
//! - The connection lock is released before live sequences refresh.
//! - A failed write publishes nothing; each write is one SQL statement.
//! - The schema is checked once when the connection is adopted.

use crate::config::{StoreConfig, StoreLocation};
use crate::db::{open_db, open_db_in_memory, DbError};
use crate::live::{LiveView, SharingPolicy};
use crate::model::item::{ItemDraft, ItemId, ItemValidationError, ShoppingItem};
use crate::repo::item_repo::{ItemOrder, ItemRepository, RepoError, SqliteItemRepository};
use log::{error, info};
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::sync::{Arc, Mutex};

pub type StoreResult<T> = Result<T, StoreError>;

/// Error surfaced by store operations and coordinator commands.
#[derive(Debug)]
pub enum StoreError {
    /// The write was rejected before reaching SQL.
    Validation(ItemValidationError),
    /// Update/delete referenced an id that is not stored.
    NotFound(ItemId),
    /// Storage could not be opened, bootstrapped or locked.
    Unavailable(String),
    /// Query-level persistence failure.
    Repo(RepoError),
    /// The background command worker stopped before replying.
    TaskAborted(&'static str),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "shopping item not found: {id}"),
            Self::Unavailable(details) => write!(f, "item storage unavailable: {details}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::TaskAborted(command) => {
                write!(f, "command `{command}` aborted before completion")
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            RepoError::NotFound(id) => Self::NotFound(id),
            other => Self::Repo(other),
        }
    }
}

impl From<ItemValidationError> for StoreError {
    fn from(value: ItemValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Unavailable(value.to_string())
    }
}

type SharedConnection = Arc<Mutex<Connection>>;

/// Process-wide owner of the item table.
pub struct ItemStore {
    conn: SharedConnection,
    by_priority: LiveView<Vec<ShoppingItem>>,
    by_price: LiveView<Vec<ShoppingItem>>,
    by_name: LiveView<Vec<ShoppingItem>>,
}

impl ItemStore {
    /// Opens the store described by `config`.
    pub fn open_with(config: &StoreConfig) -> StoreResult<Self> {
        match &config.location {
            StoreLocation::File(path) => Self::open(path, config.sharing),
            StoreLocation::Memory => Self::open_in_memory(config.sharing),
        }
    }

    /// Opens (or creates) the item database at `path`.
    pub fn open(path: impl AsRef<Path>, sharing: SharingPolicy) -> StoreResult<Self> {
        let conn = open_db(path)?;
        Self::from_connection(conn, sharing)
    }

    /// Opens a private in-memory store.
    pub fn open_in_memory(sharing: SharingPolicy) -> StoreResult<Self> {
        let conn = open_db_in_memory()?;
        Self::from_connection(conn, sharing)
    }

    /// Adopts an already migrated connection.
    ///
    /// # Errors
    /// - `Unavailable` when the connection is not migrated or lacks the
    ///   item table.
    pub fn from_connection(conn: Connection, sharing: SharingPolicy) -> StoreResult<Self> {
        if let Err(err) = SqliteItemRepository::try_new(&conn) {
            error!(
                "event=store_open module=store status=error error_code=connection_not_ready error={err}"
            );
            return Err(StoreError::Unavailable(err.to_string()));
        }

        let conn = Arc::new(Mutex::new(conn));
        let store = Self {
            by_priority: ordered_view(&conn, ItemOrder::PriorityTier, sharing),
            by_price: ordered_view(&conn, ItemOrder::Price, sharing),
            by_name: ordered_view(&conn, ItemOrder::Name, sharing),
            conn,
        };
        info!(
            "event=store_open module=store status=ok grace_ms={}",
            sharing.grace_window.as_millis()
        );
        Ok(store)
    }

    /// Live items in four-tier bought/priority order.
    pub fn observe_all(&self) -> LiveView<Vec<ShoppingItem>> {
        self.by_priority.clone()
    }

    /// Live items ordered by ascending estimated price.
    pub fn observe_by_price(&self) -> LiveView<Vec<ShoppingItem>> {
        self.by_price.clone()
    }

    /// Live items ordered by name.
    pub fn observe_by_name(&self) -> LiveView<Vec<ShoppingItem>> {
        self.by_name.clone()
    }

    pub fn count_all(&self) -> StoreResult<i64> {
        self.read(|repo| repo.count_items())
    }

    pub fn count_high_priority(&self) -> StoreResult<i64> {
        self.read(|repo| repo.count_high_priority())
    }

    pub fn get(&self, id: ItemId) -> StoreResult<Option<ShoppingItem>> {
        self.read(|repo| repo.get_item(id))
    }

    /// Inserts a new item and returns it with its assigned id.
    pub fn insert(&self, draft: &ItemDraft) -> StoreResult<ShoppingItem> {
        draft.validate()?;
        let id = self.write("insert", |repo| repo.insert_item(draft))?;
        Ok(ShoppingItem::from_draft(id, draft.clone()))
    }

    /// Replaces the stored record with the same id.
    pub fn update(&self, item: &ShoppingItem) -> StoreResult<()> {
        item.validate()?;
        self.write("update", |repo| repo.update_item(item))
    }

    /// Removes one item. Missing ids return `NotFound`.
    pub fn delete(&self, id: ItemId) -> StoreResult<()> {
        self.write("delete", |repo| repo.delete_item(id))
    }

    /// Clears the table and returns the removed row count.
    pub fn delete_all(&self) -> StoreResult<usize> {
        self.write("delete_all", |repo| repo.delete_all_items())
    }

    /// Removes every bought item and returns the removed row count.
    pub fn delete_bought(&self) -> StoreResult<usize> {
        self.write("delete_bought", |repo| repo.delete_bought_items())
    }

    fn read<T>(
        &self,
        op: impl FnOnce(&SqliteItemRepository<'_>) -> Result<T, RepoError>,
    ) -> StoreResult<T> {
        with_repo(&self.conn, op)
    }

    fn write<T>(
        &self,
        operation: &'static str,
        op: impl FnOnce(&SqliteItemRepository<'_>) -> Result<T, RepoError>,
    ) -> StoreResult<T> {
        let value = with_repo(&self.conn, op)?;
        info!("event=item_write module=store status=ok op={operation}");
        self.publish();
        Ok(value)
    }

    fn publish(&self) {
        self.by_priority.invalidate();
        self.by_price.invalidate();
        self.by_name.invalidate();
    }
}

fn with_repo<T>(
    conn: &SharedConnection,
    op: impl FnOnce(&SqliteItemRepository<'_>) -> Result<T, RepoError>,
) -> StoreResult<T> {
    let guard = conn
        .lock()
        .map_err(|_| StoreError::Unavailable("connection lock poisoned".to_string()))?;
    let repo = SqliteItemRepository::verified(&guard);
    Ok(op(&repo)?)
}

fn ordered_view(
    conn: &SharedConnection,
    order: ItemOrder,
    sharing: SharingPolicy,
) -> LiveView<Vec<ShoppingItem>> {
    let conn = Arc::clone(conn);
    let name = match order {
        ItemOrder::Name => "items_by_name",
        ItemOrder::PriorityTier => "items_by_priority",
        ItemOrder::Price => "items_by_price",
    };
    LiveView::new(name, Vec::new(), sharing, move || {
        with_repo(&conn, |repo| repo.list_items(order)).map_err(Into::into)
    })
}

#[cfg(test)]
mod tests {
    use super::{ItemStore, StoreError};
    use crate::live::SharingPolicy;
    use crate::model::item::{ItemDraft, ItemPriority};
    use rusqlite::Connection;

    #[test]
    fn write_refreshes_observed_sequence() {
        let store = ItemStore::open_in_memory(SharingPolicy::default()).unwrap();
        let mut items = store.observe_all().subscribe();
        assert!(items.current().is_empty());

        store
            .insert(&ItemDraft::new("Food", "Eggs", "dozen", 4, ItemPriority::High))
            .unwrap();
        assert!(items.has_changed());
        assert_eq!(items.current().len(), 1);
    }

    #[test]
    fn rejected_write_does_not_publish() {
        let store = ItemStore::open_in_memory(SharingPolicy::default()).unwrap();
        let mut items = store.observe_all().subscribe();
        items.current();

        let err = store
            .insert(&ItemDraft::new("Food", " ", "dozen", 4, ItemPriority::High))
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
        assert!(!items.has_changed());
    }

    #[test]
    fn adopted_connection_is_not_probed_again() {
        let store = ItemStore::open_in_memory(SharingPolicy::default()).unwrap();
        store
            .conn
            .lock()
            .unwrap()
            .execute_batch("PRAGMA user_version = 999;")
            .unwrap();

        store
            .insert(&ItemDraft::new("Food", "Eggs", "dozen", 4, ItemPriority::High))
            .unwrap();
        assert_eq!(store.count_all().unwrap(), 1);
        assert_eq!(store.observe_all().current().len(), 1);
    }

    #[test]
    fn unmigrated_connection_is_unavailable() {
        let conn = Connection::open_in_memory().unwrap();
        let result = ItemStore::from_connection(conn, SharingPolicy::default());
        assert!(matches!(result, Err(StoreError::Unavailable(_))));
    }
}
