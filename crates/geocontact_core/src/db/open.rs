//! Connection bootstrap utilities for SQLite.
//!
//! # Responsibility
//! - Open file (read-write or read-only) and in-memory SQLite connections.
//! - Configure connection pragmas required by core behavior.
//! - Trigger schema migrations before returning a writable connection.
//!
//! # Invariants
//! - Writable connections have `foreign_keys=ON` and migrations fully applied.
//! - Read-only connections never issue DDL or migrations.
//! - Every connection carries a busy timeout.

use super::migrations::apply_migrations;
use super::DbResult;
use crate::config::DEFAULT_BUSY_TIMEOUT;
use log::{debug, error};
use rusqlite::{Connection, OpenFlags};
use std::path::Path;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy)]
enum OpenMode {
    File,
    ReadOnly,
    Memory,
}

impl OpenMode {
    fn label(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::ReadOnly => "read_only",
            Self::Memory => "memory",
        }
    }
}

/// Opens a SQLite database file read-write and applies all pending migrations.
///
/// The file is created when missing. Uses the default busy timeout.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    open_db_with_timeout(path.as_ref(), DEFAULT_BUSY_TIMEOUT)
}

/// Opens an existing SQLite database file in read-only mode.
///
/// No migrations run here; callers are expected to have provisioned the
/// schema through a writable open first.
pub fn open_db_read_only(path: impl AsRef<Path>, busy_timeout: Duration) -> DbResult<Connection> {
    let path = path.as_ref();
    open_logged(
        OpenMode::ReadOnly,
        || {
            Connection::open_with_flags(
                path,
                OpenFlags::SQLITE_OPEN_READ_ONLY
                    | OpenFlags::SQLITE_OPEN_URI
                    | OpenFlags::SQLITE_OPEN_NO_MUTEX,
            )
        },
        |conn| {
            conn.busy_timeout(busy_timeout)?;
            Ok(())
        },
    )
}

/// Opens an in-memory SQLite database and applies all pending migrations.
///
/// Every call yields an independent database; used for schema checks.
pub fn open_db_in_memory() -> DbResult<Connection> {
    open_logged(OpenMode::Memory, Connection::open_in_memory, |conn| {
        bootstrap_writable(conn, DEFAULT_BUSY_TIMEOUT)
    })
}

pub(crate) fn open_db_with_timeout(path: &Path, busy_timeout: Duration) -> DbResult<Connection> {
    open_logged(
        OpenMode::File,
        || Connection::open(path),
        |conn| bootstrap_writable(conn, busy_timeout),
    )
}

fn open_logged(
    mode: OpenMode,
    open: impl FnOnce() -> rusqlite::Result<Connection>,
    bootstrap: impl FnOnce(&mut Connection) -> DbResult<()>,
) -> DbResult<Connection> {
    let started_at = Instant::now();
    debug!(
        "event=db_open module=db status=start mode={}",
        mode.label()
    );

    let mut conn = open().map_err(|err| {
        error!(
            "event=db_open module=db status=error mode={} duration_ms={} error_code=db_open_failed error={}",
            mode.label(),
            started_at.elapsed().as_millis(),
            err
        );
        err
    })?;

    match bootstrap(&mut conn) {
        Ok(()) => {
            debug!(
                "event=db_open module=db status=ok mode={} duration_ms={}",
                mode.label(),
                started_at.elapsed().as_millis()
            );
            Ok(conn)
        }
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={} duration_ms={} error_code=db_bootstrap_failed error={}",
                mode.label(),
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

fn bootstrap_writable(conn: &mut Connection, busy_timeout: Duration) -> DbResult<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(busy_timeout)?;
    apply_migrations(conn)?;
    Ok(())
}
