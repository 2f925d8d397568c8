//! Connection bootstrap.
//!
//! Returned connections have `foreign_keys=ON`, a busy timeout and every
//! known migration applied.

use super::migrations::apply_migrations;
use super::DbResult;
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens (or creates) the database file at `path` and migrates it.
///
/// Parent directories are not created here; the caller owns the layout of
/// its data directory.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    open_with("file", || Connection::open(path.as_ref()))
}

/// Opens a private in-memory database and migrates it.
///
/// Every call yields an independent, empty storage area.
pub fn open_db_in_memory() -> DbResult<Connection> {
    open_with("memory", Connection::open_in_memory)
}

fn open_with<F>(mode: &'static str, connect: F) -> DbResult<Connection>
where
    F: FnOnce() -> rusqlite::Result<Connection>,
{
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode={mode}");

    let mut conn = connect().map_err(|err| {
        error!(
            "event=db_open module=db status=error mode={mode} duration_ms={} error_code=db_open_failed error={err}",
            started_at.elapsed().as_millis()
        );
        err
    })?;

    if let Err(err) = bootstrap_connection(&mut conn) {
        error!(
            "event=db_open module=db status=error mode={mode} duration_ms={} error_code=db_bootstrap_failed error={err}",
            started_at.elapsed().as_millis()
        );
        return Err(err);
    }

    info!(
        "event=db_open module=db status=ok mode={mode} duration_ms={}",
        started_at.elapsed().as_millis()
    );
    Ok(conn)
}

fn bootstrap_connection(conn: &mut Connection) -> DbResult<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    apply_migrations(conn)
}
