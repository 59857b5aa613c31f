//! Saved filter ("smart list") entity.
//!
//! # Invariants
//! - `id` is assigned by storage on insert and never changes afterwards.
//! - `title` is a case-insensitive lookup key but is not unique.

use serde::{Deserialize, Serialize};

/// Row identity of a filter (`filters._id`).
pub type FilterId = i64;

/// Identity of a filter that has not been inserted yet.
pub const NO_ID: FilterId = 0;

/// `order` value for filters without an explicit position.
pub const NO_ORDER: i32 = -1;

/// A saved search over tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    /// Storage-assigned identity. `NO_ID` until inserted.
    pub id: FilterId,
    /// User-facing name.
    pub title: Option<String>,
    /// Stored WHERE-clause fragment evaluated against tasks.
    pub sql: Option<String>,
    /// JSON object of values applied to tasks created from this filter.
    pub values: Option<String>,
    /// Serialized criteria builder state.
    pub criterion: Option<String>,
    /// ARGB display color, stored in `f_color`.
    pub color: Option<i32>,
    /// Icon resource index, stored in `f_icon`.
    pub icon: Option<i32>,
    /// Manual sort position, stored in `f_order`; `NO_ORDER` when unset.
    pub order: i32,
}

impl Filter {
    /// Creates an unsaved filter with only a title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: NO_ID,
            title: Some(title.into()),
            sql: None,
            values: None,
            criterion: None,
            color: None,
            icon: None,
            order: NO_ORDER,
        }
    }

    /// Sets the stored query fragment.
    pub fn with_sql(mut self, sql: impl Into<String>) -> Self {
        self.sql = Some(sql.into());
        self
    }

    /// Returns whether this filter has been assigned a storage identity.
    pub fn is_saved(&self) -> bool {
        self.id != NO_ID
    }
}

impl Default for Filter {
    fn default() -> Self {
        Self {
            id: NO_ID,
            title: None,
            sql: None,
            values: None,
            criterion: None,
            color: None,
            icon: None,
            order: NO_ORDER,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Filter, NO_ID, NO_ORDER};

    #[test]
    fn new_filter_is_unsaved_with_default_order() {
        let filter = Filter::new("Today").with_sql("WHERE dueDate <= now()");
        assert_eq!(filter.id, NO_ID);
        assert!(!filter.is_saved());
        assert_eq!(filter.title.as_deref(), Some("Today"));
        assert_eq!(filter.sql.as_deref(), Some("WHERE dueDate <= now()"));
        assert_eq!(filter.order, NO_ORDER);
    }

    #[test]
    fn default_filter_has_no_title() {
        let filter = Filter::default();
        assert!(filter.title.is_none());
        assert_eq!(filter.order, NO_ORDER);
        assert!(filter.color.is_none());
        assert!(filter.icon.is_none());
    }
}
