//! Database connection. Opens the SQLite file at the resolved path and applies
//! connection settings; schema and queries live with their owners.

use std::path::Path;
use std::time::Duration;

use rusqlite::Connection;
use tracing::debug;

use crate::config::RuntimeConfig;

pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_millis(1000);

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("open database {path}: {source}")]
    Open { path: String, #[source] source: rusqlite::Error },
    #[error("configure database: {0}")]
    Configure(#[from] rusqlite::Error),
}

pub fn connect(config: &RuntimeConfig) -> Result<Connection, DbError> {
    connect_path(&config.database_path, DEFAULT_BUSY_TIMEOUT)
}

pub fn connect_path(path: &Path, busy_timeout: Duration) -> Result<Connection, DbError> {
    let conn = Connection::open(path).map_err(|source| DbError::Open {
        path: path.display().to_string(),
        source,
    })?;
    conn.execute_batch("PRAGMA count_changes = OFF")?;
    conn.busy_timeout(busy_timeout)?;
    debug!(path = %path.display(), "database opened");
    Ok(conn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigFile, ConfigOverrides};
    use tempfile::TempDir;

    #[test]
    fn connect_creates_versioned_file() {
        let dir = TempDir::new().unwrap();
        let config = RuntimeConfig::resolve_with(
            &ConfigOverrides::new().with_data_dir(dir.path()),
            &ConfigFile::empty(),
        )
        .unwrap();
        let conn = connect(&config).unwrap();
        conn.execute_batch("CREATE TABLE t (x INTEGER); INSERT INTO t VALUES (1);").unwrap();
        assert!(dir.path().join("darkpoold.1.db").exists());
    }

    #[test]
    fn open_fails_under_missing_directory() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("x.db");
        assert!(matches!(connect_path(&path, DEFAULT_BUSY_TIMEOUT), Err(DbError::Open { .. })));
    }
}
