//! Schema provider: the collaborator that owns the database file.
//!
//! # Responsibility
//! - Create or upgrade the schema before any handle is handed out.
//! - Hand out fresh read-only / read-write handles on demand.
//!
//! # Invariants
//! - The provider never caches a connection; each call opens a new one.
//! - A `DbHandle` closes its connection when dropped, on every exit path.

use super::open::{open_db_read_only, open_db_with_timeout};
use super::DbResult;
use crate::config::StoreConfig;
use log::{debug, info};
use rusqlite::Connection;
use std::ops::Deref;

/// Access mode of an open handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleAccess {
    ReadOnly,
    ReadWrite,
}

impl HandleAccess {
    fn as_str(self) -> &'static str {
        match self {
            Self::ReadOnly => "read_only",
            Self::ReadWrite => "read_write",
        }
    }
}

/// Scoped database handle.
///
/// Derefs to [`Connection`]. The connection is closed when the handle goes
/// out of scope, so callers cannot leak it on early return or panic.
#[derive(Debug)]
pub struct DbHandle {
    conn: Connection,
    access: HandleAccess,
}

impl DbHandle {
    pub fn new(conn: Connection, access: HandleAccess) -> Self {
        Self { conn, access }
    }

    pub fn access(&self) -> HandleAccess {
        self.access
    }
}

impl Deref for DbHandle {
    type Target = Connection;

    fn deref(&self) -> &Connection {
        &self.conn
    }
}

impl Drop for DbHandle {
    fn drop(&mut self) {
        debug!(
            "event=db_close module=db access={}",
            self.access.as_str()
        );
    }
}

/// Source of database handles for repositories.
///
/// Implementations guarantee the `contacts` table exists (schema created or
/// upgraded) before returning any handle.
pub trait SchemaProvider {
    fn writable_handle(&self) -> DbResult<DbHandle>;
    fn readable_handle(&self) -> DbResult<DbHandle>;
}

impl<P: SchemaProvider + ?Sized> SchemaProvider for &P {
    fn writable_handle(&self) -> DbResult<DbHandle> {
        (**self).writable_handle()
    }

    fn readable_handle(&self) -> DbResult<DbHandle> {
        (**self).readable_handle()
    }
}

/// File-backed SQLite schema provider.
#[derive(Debug, Clone)]
pub struct SqliteSchemaProvider {
    config: StoreConfig,
}

impl SqliteSchemaProvider {
    /// Bootstraps the database file (create + migrate) and returns a provider.
    ///
    /// The bootstrap connection is closed before this returns, so read-only
    /// handles can be opened afterwards.
    ///
    /// # Errors
    /// - `DbError::Sqlite` when the file cannot be opened or migrated.
    /// - `DbError::UnsupportedSchemaVersion` when the file is stamped with a
    ///   newer schema than this binary supports.
    pub fn open(config: StoreConfig) -> DbResult<Self> {
        let conn = open_db_with_timeout(config.db_path(), config.busy_timeout())?;
        drop(conn);
        info!(
            "event=schema_provider_open module=db status=ok busy_timeout_ms={}",
            config.busy_timeout().as_millis()
        );
        Ok(Self { config })
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }
}

impl SchemaProvider for SqliteSchemaProvider {
    fn writable_handle(&self) -> DbResult<DbHandle> {
        let conn = open_db_with_timeout(self.config.db_path(), self.config.busy_timeout())?;
        Ok(DbHandle::new(conn, HandleAccess::ReadWrite))
    }

    fn readable_handle(&self) -> DbResult<DbHandle> {
        let conn = open_db_read_only(self.config.db_path(), self.config.busy_timeout())?;
        Ok(DbHandle::new(conn, HandleAccess::ReadOnly))
    }
}
