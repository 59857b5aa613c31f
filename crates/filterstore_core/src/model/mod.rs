//! Domain model for saved task filters.
//!
//! # Responsibility
//! - Define the `Filter` record persisted in the `filters` table.
//!
//! # Invariants
//! - Every persisted filter is identified by an engine-assigned `FilterId`.
//! - Deletion is a hard delete; there are no tombstones.

pub mod filter;
