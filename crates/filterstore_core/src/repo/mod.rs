//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the data access contract for saved filters.
//! - Isolate SQLite statement details from service orchestration.
//!
//! # Invariants
//! - Repository APIs report absence as `None`, not as an error.
//! - Storage failures propagate with the original engine error as source.

pub mod filter_repo;
