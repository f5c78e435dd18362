//! Item store: the single write authority over shopping items.
//!
//! # Invariants
//! - One store instance per database, shared by reference (`Arc`).
//! - Live sequences are the only completion signal of a write.

pub mod item_store;
