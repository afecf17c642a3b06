//! Contact repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Translate contact CRUD operations into single SQL statements.
//! - Keep SQL details inside core persistence boundary.
//!
//! # Invariants
//! - Every operation acquires its own handle and releases it before returning.
//! - Query results are fully materialized before the handle is released.
//! - Write paths must call `ContactDraft::validate()` before SQL mutations.
//! - List order is pinned to ascending id (insertion order).

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::{DbError, SchemaProvider};
use crate::model::contact::{
    Contact, ContactDraft, ContactId, ContactSummary, ContactValidationError,
};
use log::{debug, warn};
use rusqlite::{params, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const CONTACTS_TABLE: &str = "contacts";
const REQUIRED_CONTACT_COLUMNS: &[&str] = &["_id", "name", "email", "latitude", "longitude"];

const CONTACT_SELECT_SQL: &str = "SELECT
    _id,
    name,
    email,
    latitude,
    longitude
FROM contacts";

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for contact persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(ContactValidationError),
    Db(DbError),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    InvalidData(String),
}

impl RepoError {
    /// Returns whether the write was refused without touching storage state:
    /// input validation failed or SQLite rejected the row on a constraint.
    pub fn is_rejection(&self) -> bool {
        match self {
            Self::Validation(_) => true,
            Self::Db(err) => err.is_constraint_violation(),
            _ => false,
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "database schema version {actual_version} does not match expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted contact data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ContactValidationError> for RepoError {
    fn from(value: ContactValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for contact CRUD operations.
pub trait ContactRepository {
    /// Inserts one contact and returns its storage-assigned id.
    fn insert(&self, draft: &ContactDraft) -> RepoResult<ContactId>;
    /// Deletes the row with `id`. Returns affected rows (0 or 1).
    fn delete(&self, id: ContactId) -> RepoResult<usize>;
    /// Replaces all non-id fields of the row with `id`. Returns affected rows (0 or 1).
    fn update(&self, id: ContactId, draft: &ContactDraft) -> RepoResult<usize>;
    fn find_by_id(&self, id: ContactId) -> RepoResult<Option<Contact>>;
    /// Returns every contact without ids, in ascending id order.
    fn load_all(&self) -> RepoResult<Vec<ContactSummary>>;
    /// Returns every contact with ids, in ascending id order.
    fn list_contacts(&self) -> RepoResult<Vec<Contact>>;
    fn count(&self) -> RepoResult<u64>;
}

/// SQLite-backed contact repository.
///
/// Holds only the provider; no connection outlives a single call.
pub struct SqliteContactRepository<P: SchemaProvider> {
    provider: P,
}

impl<P: SchemaProvider> SqliteContactRepository<P> {
    /// Creates a repository after verifying the provider's schema.
    ///
    /// # Errors
    /// - `UninitializedConnection` when `PRAGMA user_version` is not the
    ///   latest migration version.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the
    ///   `contacts` table shape is incomplete.
    pub fn try_new(provider: P) -> RepoResult<Self> {
        {
            let handle = provider.readable_handle()?;
            ensure_schema(&handle)?;
        }
        Ok(Self { provider })
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }
}

impl<P: SchemaProvider> ContactRepository for SqliteContactRepository<P> {
    fn insert(&self, draft: &ContactDraft) -> RepoResult<ContactId> {
        draft.validate()?;

        let handle = self.provider.writable_handle()?;
        handle.execute(
            "INSERT INTO contacts (name, email, latitude, longitude)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                draft.name.as_str(),
                draft.email.as_str(),
                draft.latitude,
                draft.longitude,
            ],
        )?;
        let id = handle.last_insert_rowid();

        debug!("event=contact_insert module=repo status=ok contact_id={id}");
        Ok(id)
    }

    fn delete(&self, id: ContactId) -> RepoResult<usize> {
        let handle = self.provider.writable_handle()?;
        let changed = handle.execute("DELETE FROM contacts WHERE _id = ?1;", [id])?;

        debug!("event=contact_delete module=repo status=ok contact_id={id} changed={changed}");
        Ok(changed)
    }

    fn update(&self, id: ContactId, draft: &ContactDraft) -> RepoResult<usize> {
        draft.validate()?;

        let handle = self.provider.writable_handle()?;
        let changed = handle.execute(
            "UPDATE contacts
             SET
                name = ?1,
                email = ?2,
                latitude = ?3,
                longitude = ?4
             WHERE _id = ?5;",
            params![
                draft.name.as_str(),
                draft.email.as_str(),
                draft.latitude,
                draft.longitude,
                id,
            ],
        )?;

        debug!("event=contact_update module=repo status=ok contact_id={id} changed={changed}");
        Ok(changed)
    }

    fn find_by_id(&self, id: ContactId) -> RepoResult<Option<Contact>> {
        let handle = self.provider.readable_handle()?;
        let contact = handle
            .query_row(
                &format!("{CONTACT_SELECT_SQL} WHERE _id = ?1;"),
                [id],
                parse_contact_row,
            )
            .optional()?;
        Ok(contact)
    }

    fn load_all(&self) -> RepoResult<Vec<ContactSummary>> {
        let handle = self.provider.readable_handle()?;
        let mut stmt = handle.prepare(
            "SELECT name, email, latitude, longitude
             FROM contacts
             ORDER BY _id ASC;",
        )?;
        let summaries = stmt
            .query_map([], |row| {
                Ok(ContactSummary {
                    name: row.get("name")?,
                    email: row.get("email")?,
                    latitude: row.get("latitude")?,
                    longitude: row.get("longitude")?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(summaries)
    }

    fn list_contacts(&self) -> RepoResult<Vec<Contact>> {
        let handle = self.provider.readable_handle()?;
        let mut stmt = handle.prepare(&format!("{CONTACT_SELECT_SQL} ORDER BY _id ASC;"))?;
        let contacts = stmt
            .query_map([], parse_contact_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(contacts)
    }

    fn count(&self) -> RepoResult<u64> {
        let handle = self.provider.readable_handle()?;
        let total: i64 = handle.query_row("SELECT COUNT(*) FROM contacts;", [], |row| row.get(0))?;
        u64::try_from(total)
            .map_err(|_| RepoError::InvalidData(format!("negative contact count `{total}`")))
    }
}

fn parse_contact_row(row: &Row<'_>) -> rusqlite::Result<Contact> {
    Ok(Contact {
        id: row.get("_id")?,
        name: row.get("name")?,
        email: row.get("email")?,
        latitude: row.get("latitude")?,
        longitude: row.get("longitude")?,
    })
}

fn ensure_schema(conn: &rusqlite::Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version != expected_version {
        warn!(
            "event=schema_check module=repo status=error expected_version={expected_version} actual_version={actual_version}"
        );
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1);")?;
    let columns = stmt
        .query_map([CONTACTS_TABLE], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;

    if columns.is_empty() {
        return Err(RepoError::MissingRequiredTable(CONTACTS_TABLE));
    }
    for &column in REQUIRED_CONTACT_COLUMNS {
        if !columns.iter().any(|existing| existing.as_str() == column) {
            return Err(RepoError::MissingRequiredColumn {
                table: CONTACTS_TABLE,
                column,
            });
        }
    }

    Ok(())
}
