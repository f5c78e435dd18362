//! Shopping item domain model.
//!
//! # Responsibility
//! - Define the canonical shopping item record and its insert payload.
//! - Own the write-time validation rules shared by store and coordinator.
//!
//! # Invariants
//! - `id` is assigned by the store and never reused for another item.
//! - `name` and `description` are non-blank on every persisted record.
//! - `estimated_price` is never negative.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Store-assigned item identifier (SQLite rowid).
pub type ItemId = i64;

/// Item importance. Persisted as the upper-case variant name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemPriority {
    #[default]
    Normal,
    High,
}

impl ItemPriority {
    /// Returns the persisted enum name (`NORMAL` / `HIGH`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::High => "HIGH",
        }
    }

    /// Case-insensitive match against the enum name.
    pub fn matches_label(self, label: &str) -> bool {
        self.as_str().eq_ignore_ascii_case(label.trim())
    }
}

impl Display for ItemPriority {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemPriority {
    type Err = ItemValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        [Self::Normal, Self::High]
            .into_iter()
            .find(|priority| priority.matches_label(value))
            .ok_or_else(|| ItemValidationError::UnknownPriority(value.to_string()))
    }
}

/// Validation failure for item writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemValidationError {
    BlankName,
    BlankDescription,
    NegativePrice(i64),
    UnknownPriority(String),
}

impl Display for ItemValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankName => write!(f, "item name must not be blank"),
            Self::BlankDescription => write!(f, "item description must not be blank"),
            Self::NegativePrice(value) => {
                write!(f, "estimated price must be non-negative, got {value}")
            }
            Self::UnknownPriority(value) => {
                write!(f, "unknown priority `{value}`; expected NORMAL|HIGH")
            }
        }
    }
}

impl Error for ItemValidationError {}

/// Insert payload: every item field except the store-assigned id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDraft {
    pub category: String,
    pub name: String,
    pub description: String,
    pub estimated_price: i64,
    pub priority: ItemPriority,
}

impl ItemDraft {
    pub fn new(
        category: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        estimated_price: i64,
        priority: ItemPriority,
    ) -> Self {
        Self {
            category: category.into(),
            name: name.into(),
            description: description.into(),
            estimated_price,
            priority,
        }
    }

    /// Checks the fields every stored record must satisfy.
    pub fn validate(&self) -> Result<(), ItemValidationError> {
        validate_fields(&self.name, &self.description, self.estimated_price)
    }
}

/// Canonical persisted shopping item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShoppingItem {
    pub id: ItemId,
    pub category: String,
    pub name: String,
    pub description: String,
    pub estimated_price: i64,
    pub is_bought: bool,
    pub priority: ItemPriority,
}

impl ShoppingItem {
    /// Materializes a freshly inserted draft. New items start not bought.
    pub fn from_draft(id: ItemId, draft: ItemDraft) -> Self {
        Self {
            id,
            category: draft.category,
            name: draft.name,
            description: draft.description,
            estimated_price: draft.estimated_price,
            is_bought: false,
            priority: draft.priority,
        }
    }

    pub fn validate(&self) -> Result<(), ItemValidationError> {
        validate_fields(&self.name, &self.description, self.estimated_price)
    }

    /// Copy with a replaced category; every other field is kept.
    pub fn with_category(&self, category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            ..self.clone()
        }
    }

    /// Copy with a replaced bought flag.
    pub fn with_bought(&self, is_bought: bool) -> Self {
        Self {
            is_bought,
            ..self.clone()
        }
    }

    /// Position in the default list ordering, 1 (first) to 4 (last).
    ///
    /// Unbought items come before bought ones; inside each half `HIGH`
    /// precedes `NORMAL`.
    pub fn priority_tier(&self) -> u8 {
        match (self.is_bought, self.priority) {
            (false, ItemPriority::High) => 1,
            (false, ItemPriority::Normal) => 2,
            (true, ItemPriority::High) => 3,
            (true, ItemPriority::Normal) => 4,
        }
    }
}

fn validate_fields(
    name: &str,
    description: &str,
    estimated_price: i64,
) -> Result<(), ItemValidationError> {
    if name.trim().is_empty() {
        return Err(ItemValidationError::BlankName);
    }
    if description.trim().is_empty() {
        return Err(ItemValidationError::BlankDescription);
    }
    if estimated_price < 0 {
        return Err(ItemValidationError::NegativePrice(estimated_price));
    }
    Ok(())
}
