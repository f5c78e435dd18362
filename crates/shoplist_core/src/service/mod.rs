//! Use-case services sitting between the UI and the item store.
//!
//! # Responsibility
//! - Orchestrate store calls into screen-level operations.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod shopping_list_service;
