//! Observable views with replay and shared refresh semantics.
//!
//! # Responsibility
//! - Provide the publish/subscribe primitive behind every live item list.
//!
//! # See also
//! - `store::item_store` for the SQL-backed root views.

mod view;

pub use view::{ComputeError, LiveView, SharingPolicy, Subscription, DEFAULT_GRACE_WINDOW};
