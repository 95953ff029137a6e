//! Goal schema versions.
//!
//! The applied version is mirrored into `PRAGMA user_version`. All pending
//! steps run inside one transaction, so a failed step leaves the file at
//! its previous version.

use crate::db::{DbError, DbResult};
use log::{debug, info};
use rusqlite::Connection;

#[derive(Debug, Clone, Copy)]
struct SchemaStep {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

/// Ordered by strictly increasing `version`.
const SCHEMA_STEPS: &[SchemaStep] = &[SchemaStep {
    version: 1,
    name: "kv_entries",
    sql: include_str!("0001_init.sql"),
}];

/// Schema version this build writes.
pub fn latest_version() -> u32 {
    SCHEMA_STEPS.last().map_or(0, |step| step.version)
}

/// Schema version of a connection compared with this build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaStatus {
    pub version: u32,
    pub latest: u32,
}

impl SchemaStatus {
    pub fn is_current(&self) -> bool {
        self.version == self.latest
    }

    /// Written by a newer build; this binary must not touch it.
    pub fn is_ahead(&self) -> bool {
        self.version > self.latest
    }

    /// Number of steps `apply_migrations` would run.
    pub fn pending(&self) -> usize {
        SCHEMA_STEPS
            .iter()
            .filter(|step| step.version > self.version)
            .count()
    }
}

/// Reads `PRAGMA user_version` of `conn`.
pub fn schema_status(conn: &Connection) -> DbResult<SchemaStatus> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(SchemaStatus {
        version,
        latest: latest_version(),
    })
}

/// Brings `conn` up to [`latest_version`].
///
/// # Errors
/// - `UnsupportedSchemaVersion` for files from a newer build.
/// - `Migration` naming the step that failed; nothing is committed.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let status = schema_status(conn)?;
    if status.is_ahead() {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: status.version,
            latest_supported: status.latest,
        });
    }
    if status.is_current() {
        debug!(
            "event=db_migrate module=db status=noop version={}",
            status.version
        );
        return Ok(());
    }

    let tx = conn.transaction()?;
    for step in SCHEMA_STEPS.iter().filter(|step| step.version > status.version) {
        tx.execute_batch(step.sql)
            .and_then(|()| tx.execute_batch(&format!("PRAGMA user_version = {};", step.version)))
            .map_err(|source| DbError::Migration {
                version: step.version,
                name: step.name,
                source,
            })?;
        debug!(
            "event=db_migrate module=db status=step version={} name={}",
            step.version, step.name
        );
    }
    tx.commit()?;

    info!(
        "event=db_migrate module=db status=ok from_version={} to_version={} steps={}",
        status.version,
        status.latest,
        status.pending()
    );
    Ok(())
}
