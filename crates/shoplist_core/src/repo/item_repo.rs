//! Shopping item repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD and list/count queries over the `shopping_items` table.
//! - Keep SQL text inside the persistence boundary.
//!
//! # Invariants
//! - Write paths validate the record before any SQL mutation.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Every list query has a total order (`id ASC` as final key).

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::item::{ItemDraft, ItemId, ItemPriority, ItemValidationError, ShoppingItem};
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const ITEMS_TABLE: &str = "shopping_items";

const ITEM_SELECT_SQL: &str = "SELECT
    id,
    category,
    name,
    description,
    estimated_price,
    isBought,
    priority
FROM shopping_items";

const PRIORITY_TIER_ORDER_SQL: &str = "ORDER BY
    CASE
        WHEN isBought = 0 AND priority = 'HIGH' THEN 1
        WHEN isBought = 0 AND priority = 'NORMAL' THEN 2
        WHEN isBought = 1 AND priority = 'HIGH' THEN 3
        WHEN isBought = 1 AND priority = 'NORMAL' THEN 4
    END,
    id ASC";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for item persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(ItemValidationError),
    Db(DbError),
    NotFound(ItemId),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "shopping item not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted item data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ItemValidationError> for RepoError {
    fn from(value: ItemValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Ordering of a full item listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemOrder {
    /// `name ASC`.
    Name,
    /// Four-tier bought/priority buckets.
    PriorityTier,
    /// `estimated_price ASC`.
    Price,
}

impl ItemOrder {
    fn order_by_sql(self) -> &'static str {
        match self {
            Self::Name => "ORDER BY name ASC, id ASC",
            Self::PriorityTier => PRIORITY_TIER_ORDER_SQL,
            Self::Price => "ORDER BY estimated_price ASC, id ASC",
        }
    }
}

/// Repository interface for shopping item persistence.
pub trait ItemRepository {
    fn insert_item(&self, draft: &ItemDraft) -> RepoResult<ItemId>;
    fn update_item(&self, item: &ShoppingItem) -> RepoResult<()>;
    fn get_item(&self, id: ItemId) -> RepoResult<Option<ShoppingItem>>;
    fn list_items(&self, order: ItemOrder) -> RepoResult<Vec<ShoppingItem>>;
    fn count_items(&self) -> RepoResult<i64>;
    fn count_high_priority(&self) -> RepoResult<i64>;
    fn delete_item(&self, id: ItemId) -> RepoResult<()>;
    fn delete_all_items(&self) -> RepoResult<usize>;
    fn delete_bought_items(&self) -> RepoResult<usize>;
}

/// SQLite-backed item repository.
pub struct SqliteItemRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteItemRepository<'conn> {
    /// Wraps a connection that is migrated to the latest schema.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations were not applied.
    /// - `MissingRequiredTable` when `shopping_items` does not exist.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let actual_version = current_user_version(conn)?;
        let expected_version = latest_version();
        if actual_version != expected_version {
            return Err(RepoError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }

        let table_exists: bool = conn.query_row(
            "SELECT EXISTS(
                SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1
            );",
            [ITEMS_TABLE],
            |row| row.get(0),
        )?;
        if !table_exists {
            return Err(RepoError::MissingRequiredTable(ITEMS_TABLE));
        }

        Ok(Self { conn })
    }

    /// Wraps a connection that already passed `try_new` without probing
    /// the schema again.
    pub(crate) fn verified(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ItemRepository for SqliteItemRepository<'_> {
    fn insert_item(&self, draft: &ItemDraft) -> RepoResult<ItemId> {
        draft.validate()?;

        self.conn.execute(
            "INSERT OR REPLACE INTO shopping_items (
                id,
                category,
                name,
                description,
                estimated_price,
                isBought,
                priority
            ) VALUES (NULL, ?1, ?2, ?3, ?4, 0, ?5);",
            params![
                draft.category.as_str(),
                draft.name.as_str(),
                draft.description.as_str(),
                draft.estimated_price,
                draft.priority.as_str(),
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn update_item(&self, item: &ShoppingItem) -> RepoResult<()> {
        item.validate()?;

        let changed = self.conn.execute(
            "UPDATE shopping_items
             SET
                category = ?1,
                name = ?2,
                description = ?3,
                estimated_price = ?4,
                isBought = ?5,
                priority = ?6
             WHERE id = ?7;",
            params![
                item.category.as_str(),
                item.name.as_str(),
                item.description.as_str(),
                item.estimated_price,
                item.is_bought,
                item.priority.as_str(),
                item.id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(item.id));
        }
        Ok(())
    }

    fn get_item(&self, id: ItemId) -> RepoResult<Option<ShoppingItem>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ITEM_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_item_row(row)?)),
            None => Ok(None),
        }
    }

    fn list_items(&self, order: ItemOrder) -> RepoResult<Vec<ShoppingItem>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ITEM_SELECT_SQL} {};", order.order_by_sql()))?;
        let mut rows = stmt.query([])?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(parse_item_row(row)?);
        }
        Ok(items)
    }

    fn count_items(&self) -> RepoResult<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM shopping_items;", [], |row| row.get(0))?;
        Ok(count)
    }

    fn count_high_priority(&self) -> RepoResult<i64> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM shopping_items WHERE priority = 'HIGH';",
            [],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    fn delete_item(&self, id: ItemId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM shopping_items WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }

    fn delete_all_items(&self) -> RepoResult<usize> {
        let removed = self.conn.execute("DELETE FROM shopping_items;", [])?;
        Ok(removed)
    }

    fn delete_bought_items(&self) -> RepoResult<usize> {
        let removed = self
            .conn
            .execute("DELETE FROM shopping_items WHERE isBought = 1;", [])?;
        Ok(removed)
    }
}

fn parse_item_row(row: &Row<'_>) -> RepoResult<ShoppingItem> {
    let id: ItemId = row.get("id")?;

    let priority_text: String = row.get("priority")?;
    let priority = parse_priority(&priority_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid priority `{priority_text}` in shopping_items.priority (id={id})"
        ))
    })?;

    let is_bought = match row.get::<_, i64>("isBought")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid isBought value `{other}` in shopping_items.isBought (id={id})"
            )));
        }
    };

    let item = ShoppingItem {
        id,
        category: row.get("category")?,
        name: row.get("name")?,
        description: row.get("description")?,
        estimated_price: row.get("estimated_price")?,
        is_bought,
        priority,
    };
    item.validate()?;
    Ok(item)
}

fn parse_priority(value: &str) -> Option<ItemPriority> {
    match value {
        "NORMAL" => Some(ItemPriority::Normal),
        "HIGH" => Some(ItemPriority::High),
        _ => None,
    }
}
