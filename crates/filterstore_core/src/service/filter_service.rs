//! Filter use-case service.
//!
//! # Responsibility
//! - Provide stable entry points for filter persistence callers.
//! - Delegate persistence to repository implementations.
//!
//! # Invariants
//! - Service APIs never bypass repository contracts.
//! - Service layer remains storage-agnostic.

use crate::model::filter::{Filter, FilterId};
use crate::repo::filter_repo::{FilterRepository, RepoResult};

/// Use-case service wrapper for filter operations.
pub struct FilterService<R: FilterRepository> {
    repo: R,
}

impl<R: FilterRepository> FilterService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Inserts an unsaved filter or updates a saved one.
    ///
    /// # Contract
    /// - Unsaved (`NO_ID`) filters receive the storage-assigned id in place.
    /// - Saved filters overwrite their row; a missing row stays missing.
    /// - Returns the filter id after the write.
    pub fn save(&self, filter: &mut Filter) -> RepoResult<FilterId> {
        if filter.is_saved() {
            self.repo.update(filter)?;
        } else {
            filter.id = self.repo.insert(filter)?;
        }
        Ok(filter.id)
    }

    pub fn insert(&self, filter: &Filter) -> RepoResult<FilterId> {
        self.repo.insert(filter)
    }

    pub fn update(&self, filter: &Filter) -> RepoResult<()> {
        self.repo.update(filter)
    }

    pub fn delete(&self, id: FilterId) -> RepoResult<()> {
        self.repo.delete(id)
    }

    pub fn get(&self, id: FilterId) -> RepoResult<Option<Filter>> {
        self.repo.get_by_id(id)
    }

    /// Finds a filter by title, ignoring ASCII case.
    pub fn find_by_title(&self, title: &str) -> RepoResult<Option<Filter>> {
        self.repo.get_by_name(title)
    }

    /// Lists every saved filter.
    pub fn list(&self) -> RepoResult<Vec<Filter>> {
        self.repo.get_filters()
    }
}
