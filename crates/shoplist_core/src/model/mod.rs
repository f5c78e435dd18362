//! Domain model for the shopping list.
//!
//! # Responsibility
//! - Define the single persisted entity (`ShoppingItem`) and its payloads.
//! - Hold pure value types consumed by the UI: form input, summary counts,
//!   category listings.
//!
//! # Invariants
//! - Every persisted item is identified by a store-assigned `ItemId`.
//! - Validation lives with the model so store and coordinator share it.

pub mod category;
pub mod form;
pub mod item;
pub mod summary;
