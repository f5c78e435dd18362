//! Repository layer over the item table.
//!
//! # Responsibility
//! - Define the item data access contract.
//! - Isolate SQLite query details from the store and coordinator.
//!
//! # Invariants
//! - Repository writes validate items before persistence.
//! - Missing ids surface as `RepoError::NotFound`, not as silent no-ops.

pub mod item_repo;
