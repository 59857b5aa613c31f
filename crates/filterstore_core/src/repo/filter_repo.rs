//! Filter repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD APIs over the `filters` table.
//! - Keep statement text inside the persistence boundary.
//!
//! # Invariants
//! - Every operation is exactly one statement; no cross-call state.
//! - Missing rows are reported as `None` (reads) or silently ignored
//!   (update/delete), never as errors.
//! - `get_by_name` matches case-insensitively and returns at most one row.
//!   With duplicate titles the row is whichever the engine yields first.

use crate::db::migrations::latest_version;
use crate::db::{failure_kind, DbError, FailureKind};
use crate::model::filter::{Filter, FilterId, NO_ID};
use log::debug;
use rusqlite::{named_params, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub(crate) const FILTER_COLUMNS: &[&str] = &[
    "_id",
    "title",
    "sql",
    "values",
    "criterion",
    "f_color",
    "f_icon",
    "f_order",
];

pub const INSERT_FILTER_SQL: &str = r#"INSERT INTO filters (
    _id,
    title,
    sql,
    "values",
    criterion,
    f_color,
    f_icon,
    f_order
) VALUES (:id, :title, :sql, :values, :criterion, :color, :icon, :order);"#;

pub const UPDATE_FILTER_SQL: &str = r#"UPDATE filters
SET
    title = :title,
    sql = :sql,
    "values" = :values,
    criterion = :criterion,
    f_color = :color,
    f_icon = :icon,
    f_order = :order
WHERE _id = :id;"#;

pub const DELETE_FILTER_SQL: &str = "DELETE FROM filters WHERE _id = :id;";

pub const SELECT_FILTERS_SQL: &str = "SELECT * FROM filters;";

pub const SELECT_FILTER_BY_ID_SQL: &str = "SELECT * FROM filters WHERE _id = :id LIMIT 1;";

pub const SELECT_FILTER_BY_NAME_SQL: &str =
    "SELECT * FROM filters WHERE title = :title COLLATE NOCASE LIMIT 1;";

pub type RepoResult<T> = Result<T, RepoError>;

/// Errors from filter persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    /// The engine rejected the row because a schema constraint failed.
    StorageConstraint(rusqlite::Error),
    /// The engine could not be reached or is busy/locked.
    StorageUnavailable(rusqlite::Error),
    /// Any other engine or bootstrap error.
    Db(DbError),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Required column is missing from expected table.
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    /// Persisted row cannot be converted to a `Filter`.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StorageConstraint(err) => write!(f, "filter rejected by storage: {err}"),
            Self::StorageUnavailable(err) => write!(f, "filter storage unavailable: {err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "filter repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "filter repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "filter repository requires column `{column}` in table `{table}`"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted filter data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::StorageConstraint(err) | Self::StorageUnavailable(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::UninitializedConnection { .. }
            | Self::MissingRequiredTable(_)
            | Self::MissingRequiredColumn { .. }
            | Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        match value {
            DbError::Sqlite(err) => Self::from(err),
            other => Self::Db(other),
        }
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        match failure_kind(&value) {
            FailureKind::Constraint => Self::StorageConstraint(value),
            FailureKind::Unavailable => Self::StorageUnavailable(value),
            FailureKind::Other => Self::Db(DbError::Sqlite(value)),
        }
    }
}

/// Repository interface for filter CRUD operations.
pub trait FilterRepository {
    /// Inserts one filter and returns the storage-assigned id.
    ///
    /// `NO_ID` lets storage pick the id; any other id is inserted verbatim.
    fn insert(&self, filter: &Filter) -> RepoResult<FilterId>;
    /// Overwrites the row matching `filter.id`. No-op when absent.
    fn update(&self, filter: &Filter) -> RepoResult<()>;
    /// Removes the row with `id`. No-op when absent.
    fn delete(&self, id: FilterId) -> RepoResult<()>;
    fn get_by_id(&self, id: FilterId) -> RepoResult<Option<Filter>>;
    /// Case-insensitive title lookup returning at most one row.
    fn get_by_name(&self, title: &str) -> RepoResult<Option<Filter>>;
    /// Returns every filter in storage order.
    fn get_filters(&self) -> RepoResult<Vec<Filter>>;

    /// Alias of [`FilterRepository::get_filters`].
    fn get_all(&self) -> RepoResult<Vec<Filter>> {
        self.get_filters()
    }
}

/// SQLite-backed filter repository.
pub struct SqliteFilterRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteFilterRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_filter_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl FilterRepository for SqliteFilterRepository<'_> {
    fn insert(&self, filter: &Filter) -> RepoResult<FilterId> {
        let requested_id = (filter.id != NO_ID).then_some(filter.id);
        self.conn.execute(
            INSERT_FILTER_SQL,
            named_params! {
                ":id": requested_id,
                ":title": filter.title.as_deref(),
                ":sql": filter.sql.as_deref(),
                ":values": filter.values.as_deref(),
                ":criterion": filter.criterion.as_deref(),
                ":color": filter.color,
                ":icon": filter.icon,
                ":order": filter.order,
            },
        )?;

        let id = self.conn.last_insert_rowid();
        debug!("event=filter_insert module=repo status=ok filter_id={id}");
        Ok(id)
    }

    fn update(&self, filter: &Filter) -> RepoResult<()> {
        let changed = self.conn.execute(
            UPDATE_FILTER_SQL,
            named_params! {
                ":id": filter.id,
                ":title": filter.title.as_deref(),
                ":sql": filter.sql.as_deref(),
                ":values": filter.values.as_deref(),
                ":criterion": filter.criterion.as_deref(),
                ":color": filter.color,
                ":icon": filter.icon,
                ":order": filter.order,
            },
        )?;

        debug!(
            "event=filter_update module=repo status=ok filter_id={} rows={changed}",
            filter.id
        );
        Ok(())
    }

    fn delete(&self, id: FilterId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute(DELETE_FILTER_SQL, named_params! { ":id": id })?;

        debug!("event=filter_delete module=repo status=ok filter_id={id} rows={changed}");
        Ok(())
    }

    fn get_by_id(&self, id: FilterId) -> RepoResult<Option<Filter>> {
        let mut stmt = self.conn.prepare(SELECT_FILTER_BY_ID_SQL)?;
        let row = stmt
            .query_row(named_params! { ":id": id }, read_filter_row)
            .optional()?;
        row.map(Filter::try_from).transpose()
    }

    fn get_by_name(&self, title: &str) -> RepoResult<Option<Filter>> {
        let mut stmt = self.conn.prepare(SELECT_FILTER_BY_NAME_SQL)?;
        let row = stmt
            .query_row(named_params! { ":title": title }, read_filter_row)
            .optional()?;
        row.map(Filter::try_from).transpose()
    }

    fn get_filters(&self) -> RepoResult<Vec<Filter>> {
        let mut stmt = self.conn.prepare(SELECT_FILTERS_SQL)?;
        let mut rows = stmt.query([])?;
        let mut filters = Vec::new();

        while let Some(row) = rows.next()? {
            filters.push(Filter::try_from(read_filter_row(row)?)?);
        }

        Ok(filters)
    }
}

/// Raw column values of one `filters` row before domain checks.
struct FilterRow {
    id: FilterId,
    title: Option<String>,
    sql: Option<String>,
    values: Option<String>,
    criterion: Option<String>,
    color: Option<i32>,
    icon: Option<i32>,
    order: Option<i32>,
}

fn read_filter_row(row: &Row<'_>) -> rusqlite::Result<FilterRow> {
    Ok(FilterRow {
        id: row.get("_id")?,
        title: row.get("title")?,
        sql: row.get("sql")?,
        values: row.get("values")?,
        criterion: row.get("criterion")?,
        color: row.get("f_color")?,
        icon: row.get("f_icon")?,
        order: row.get("f_order")?,
    })
}

impl TryFrom<FilterRow> for Filter {
    type Error = RepoError;

    fn try_from(row: FilterRow) -> RepoResult<Self> {
        let order = row.order.ok_or_else(|| {
            RepoError::InvalidData(format!("null f_order for filter {} in filters.f_order", row.id))
        })?;

        Ok(Filter {
            id: row.id,
            title: row.title,
            sql: row.sql,
            values: row.values,
            criterion: row.criterion,
            color: row.color,
            icon: row.icon,
            order,
        })
    }
}

fn ensure_filter_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, "filters")? {
        return Err(RepoError::MissingRequiredTable("filters"));
    }

    let present = table_columns(conn, "filters")?;
    for &column in FILTER_COLUMNS {
        if !present.iter().any(|name| name == column) {
            return Err(RepoError::MissingRequiredColumn {
                table: "filters",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_columns(conn: &Connection, table: &str) -> RepoResult<Vec<String>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::{
        DELETE_FILTER_SQL, FILTER_COLUMNS, INSERT_FILTER_SQL, SELECT_FILTERS_SQL,
        SELECT_FILTER_BY_ID_SQL, SELECT_FILTER_BY_NAME_SQL, UPDATE_FILTER_SQL,
    };
    use crate::db::open_db_in_memory;

    #[test]
    fn name_lookup_is_case_insensitive_and_single_row() {
        assert!(SELECT_FILTER_BY_NAME_SQL.contains("COLLATE NOCASE"));
        assert!(SELECT_FILTER_BY_NAME_SQL.ends_with("LIMIT 1;"));
        assert!(SELECT_FILTER_BY_ID_SQL.ends_with("LIMIT 1;"));
    }

    #[test]
    fn full_listing_has_no_implicit_ordering() {
        assert!(!SELECT_FILTERS_SQL.contains("ORDER BY"));
        assert!(!SELECT_FILTERS_SQL.contains("WHERE"));
    }

    #[test]
    fn writes_are_keyed_by_identity() {
        assert!(UPDATE_FILTER_SQL.ends_with("WHERE _id = :id;"));
        assert!(DELETE_FILTER_SQL.ends_with("WHERE _id = :id;"));
    }

    #[test]
    fn every_statement_prepares_against_migrated_schema() {
        let conn = open_db_in_memory().unwrap();
        for sql in [
            INSERT_FILTER_SQL,
            UPDATE_FILTER_SQL,
            DELETE_FILTER_SQL,
            SELECT_FILTERS_SQL,
            SELECT_FILTER_BY_ID_SQL,
            SELECT_FILTER_BY_NAME_SQL,
        ] {
            conn.prepare(sql)
                .unwrap_or_else(|err| panic!("statement failed to prepare: {err}\n{sql}"));
        }
    }

    #[test]
    fn insert_and_update_bind_every_column() {
        for column in FILTER_COLUMNS {
            assert!(
                INSERT_FILTER_SQL.contains(column),
                "insert misses column {column}"
            );
            if *column != "_id" {
                assert!(
                    UPDATE_FILTER_SQL.contains(column),
                    "update misses column {column}"
                );
            }
        }
    }
}
