//! Editing-form input and its validation.
//!
//! # Responsibility
//! - Turn raw dialog text into a validated `ItemDraft` or edited item.
//! - Report every failing field at once so the UI can flag each input.
//!
//! # Invariants
//! - A form with any error flag set never yields a draft.
//! - Price text must parse to a non-negative integer after trimming.

use crate::model::item::{ItemDraft, ItemPriority, ShoppingItem};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Raw text captured by the add/edit item dialog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemForm {
    pub name: String,
    pub description: String,
    pub price_text: String,
    /// `None` until the user picks a category.
    pub category: Option<String>,
    pub priority: ItemPriority,
}

/// Per-field validation flags. `true` marks a rejected field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormErrors {
    pub name: bool,
    pub description: bool,
    pub price: bool,
    pub category: bool,
}

impl FormErrors {
    pub fn any(&self) -> bool {
        self.name || self.description || self.price || self.category
    }
}

impl Display for FormErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let fields: Vec<&str> = [
            (self.name, "name"),
            (self.description, "description"),
            (self.price, "price"),
            (self.category, "category"),
        ]
        .into_iter()
        .filter_map(|(failed, field)| failed.then_some(field))
        .collect();
        write!(f, "invalid item form fields: {}", fields.join(", "))
    }
}

impl Error for FormErrors {}

impl ItemForm {
    /// Pre-fills the dialog from an existing item.
    pub fn from_item(item: &ShoppingItem) -> Self {
        Self {
            name: item.name.clone(),
            description: item.description.clone(),
            price_text: item.estimated_price.to_string(),
            category: Some(item.category.clone()),
            priority: item.priority,
        }
    }

    /// Validates all fields and builds an insert payload.
    pub fn to_draft(&self) -> Result<ItemDraft, FormErrors> {
        let price = parse_price(&self.price_text);
        let category = self
            .category
            .as_deref()
            .filter(|value| !value.trim().is_empty());

        let errors = FormErrors {
            name: self.name.trim().is_empty(),
            description: self.description.trim().is_empty(),
            price: price.is_none(),
            category: category.is_none(),
        };

        match (price, category) {
            (Some(price), Some(category)) if !errors.any() => Ok(ItemDraft::new(
                category,
                self.name.as_str(),
                self.description.as_str(),
                price,
                self.priority,
            )),
            _ => Err(errors),
        }
    }

    /// Validates and applies the form on top of `item`, keeping id and
    /// bought state.
    pub fn apply_to(&self, item: &ShoppingItem) -> Result<ShoppingItem, FormErrors> {
        let draft = self.to_draft()?;
        Ok(ShoppingItem {
            id: item.id,
            category: draft.category,
            name: draft.name,
            description: draft.description,
            estimated_price: draft.estimated_price,
            is_bought: item.is_bought,
            priority: draft.priority,
        })
    }
}

/// Parses user price text. Accepts only non-negative integers.
pub fn parse_price(text: &str) -> Option<i64> {
    text.trim().parse::<i64>().ok().filter(|value| *value >= 0)
}

#[cfg(test)]
mod tests {
    use super::{parse_price, FormErrors, ItemForm};
    use crate::model::item::{ItemDraft, ItemPriority, ShoppingItem};

    fn filled() -> ItemForm {
        ItemForm {
            name: "Milk".to_string(),
            description: "2L".to_string(),
            price_text: "3".to_string(),
            category: Some("Dairy".to_string()),
            priority: ItemPriority::Normal,
        }
    }

    #[test]
    fn parse_price_rejects_negative_and_non_numeric_text() {
        assert_eq!(parse_price("3"), Some(3));
        assert_eq!(parse_price(" 42 "), Some(42));
        assert_eq!(parse_price("0"), Some(0));
        assert_eq!(parse_price("-5"), None);
        assert_eq!(parse_price("abc"), None);
        assert_eq!(parse_price("3.5"), None);
        assert_eq!(parse_price(""), None);
    }

    #[test]
    fn valid_form_yields_draft() {
        let draft = filled().to_draft().unwrap();
        assert_eq!(
            draft,
            ItemDraft::new("Dairy", "Milk", "2L", 3, ItemPriority::Normal)
        );
    }

    #[test]
    fn empty_form_flags_every_field() {
        let errors = ItemForm::default().to_draft().unwrap_err();
        assert_eq!(
            errors,
            FormErrors {
                name: true,
                description: true,
                price: true,
                category: true,
            }
        );
        assert!(errors.to_string().contains("category"));
    }

    #[test]
    fn only_failing_fields_are_flagged() {
        let mut form = filled();
        form.price_text = "abc".to_string();
        form.category = Some("  ".to_string());
        let errors = form.to_draft().unwrap_err();
        assert!(errors.price);
        assert!(errors.category);
        assert!(!errors.name);
        assert!(!errors.description);
    }

    #[test]
    fn apply_to_keeps_identity_and_bought_state() {
        let original = ShoppingItem::from_draft(
            9,
            ItemDraft::new("Food", "Bread", "rye", 2, ItemPriority::High),
        )
        .with_bought(true);

        let mut form = ItemForm::from_item(&original);
        assert_eq!(form.price_text, "2");
        form.name = "Bagels".to_string();

        let edited = form.apply_to(&original).unwrap();
        assert_eq!(edited.id, 9);
        assert!(edited.is_bought);
        assert_eq!(edited.name, "Bagels");
        assert_eq!(edited.priority, ItemPriority::High);
    }
}
