//! Client-side price ordering of a filtered list.

use super::item_filter::FilterParseError;
use crate::model::item::ShoppingItem;
use std::str::FromStr;

/// Optional price ordering applied on top of a filtered snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PriceSort {
    #[default]
    None,
    LowToHigh,
    HighToLow,
}

impl PriceSort {
    /// Returns a sorted copy; equal prices keep their incoming order.
    pub fn apply(self, items: &[ShoppingItem]) -> Vec<ShoppingItem> {
        let mut sorted = items.to_vec();
        match self {
            Self::None => {}
            Self::LowToHigh => sorted.sort_by_key(|item| item.estimated_price),
            Self::HighToLow => {
                sorted.sort_by(|a, b| b.estimated_price.cmp(&a.estimated_price))
            }
        }
        sorted
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::LowToHigh => "Low to High",
            Self::HighToLow => "High to Low",
        }
    }
}

impl FromStr for PriceSort {
    type Err = FilterParseError;

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        [Self::None, Self::LowToHigh, Self::HighToLow]
            .into_iter()
            .find(|sort| sort.label() == label)
            .ok_or_else(|| FilterParseError::UnknownPriceSort(label.to_string()))
    }
}
