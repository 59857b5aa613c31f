//! Core persistence for saved task filters.
//! This crate owns the `filters` table and its access rules.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::filter::{Filter, FilterId, NO_ID, NO_ORDER};
pub use repo::filter_repo::{FilterRepository, RepoError, RepoResult, SqliteFilterRepository};
pub use service::filter_service::FilterService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
