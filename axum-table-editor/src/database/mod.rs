//! Database abstraction layer
//!
//! This module provides a database-agnostic interface for schema discovery,
//! paginated reads and single-row updates.

pub mod traits;

#[cfg(feature = "sqlite")]
pub mod sqlite;

// Re-export the main trait
pub use traits::{DatabaseError, DatabaseProvider};
