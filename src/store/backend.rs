#[cfg(test)]
use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use std::path::Path;
use std::time::Duration;

use rusqlite::{params, Connection, DatabaseName, OptionalExtension};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tracing::debug;

pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// Durable key/value slots the store serializes its state into.
pub trait StorageBackend {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

#[derive(Debug)]
pub enum StorageError {
    Io(std::io::Error),
    Db(rusqlite::Error),
    Unavailable(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Io(err) => write!(f, "I/O error: {}", err),
            StorageError::Db(err) => write!(f, "database error: {}", err),
            StorageError::Unavailable(message) => write!(f, "storage unavailable: {}", message),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            StorageError::Io(err) => Some(err),
            StorageError::Db(err) => Some(err),
            StorageError::Unavailable(_) => None,
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(value: std::io::Error) -> Self {
        StorageError::Io(value)
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        StorageError::Db(value)
    }
}

#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    entries: HashMap<String, String>,
    fail_writes: bool,
}

#[cfg(test)]
impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, key: &str, value: &str) -> Self {
        self.entries.insert(key.to_string(), value.to_string());
        self
    }

    /// Makes every subsequent write fail, like a browser over its storage quota.
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

#[cfg(test)]
impl StorageBackend for MemoryBackend {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError::Unavailable("quota exceeded".to_string()));
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

struct Migration {
    version: i64,
    name: &'static str,
    sql: &'static str,
}

const MIGRATIONS: [Migration; 1] = [Migration {
    version: 1,
    name: "kv_store_v1",
    sql: r#"
CREATE TABLE IF NOT EXISTS kv (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
"#,
}];

pub struct SqliteBackend {
    conn: Connection,
}

impl SqliteBackend {
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let mut conn = Connection::open(path)?;
        configure(&conn)?;
        apply_migrations(&mut conn)?;
        let backend = Self { conn };
        let version = backend.schema_version()?;
        if version != CURRENT_SCHEMA_VERSION {
            return Err(StorageError::Unavailable(format!(
                "unsupported schema version {version} (expected {CURRENT_SCHEMA_VERSION})"
            )));
        }
        debug!(path = %path.display(), schema = version, "opened sqlite store");
        Ok(backend)
    }

    pub fn schema_version(&self) -> Result<i64, StorageError> {
        let version: Option<i64> = self
            .conn
            .query_row("SELECT MAX(version) FROM schema_migrations", [], |row| {
                row.get(0)
            })?;
        Ok(version.unwrap_or(0))
    }
}

impl StorageBackend for SqliteBackend {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.conn.execute(
            r#"
INSERT INTO kv (key, value, updated_at)
VALUES (?1, ?2, ?3)
ON CONFLICT(key) DO UPDATE SET
    value = excluded.value,
    updated_at = excluded.updated_at
"#,
            params![key, value, now_utc_rfc3339()],
        )?;
        Ok(())
    }
}

fn configure(conn: &Connection) -> rusqlite::Result<()> {
    conn.pragma_update(None::<DatabaseName>, "journal_mode", "WAL")?;
    conn.pragma_update(None::<DatabaseName>, "synchronous", "NORMAL")?;
    conn.pragma_update(None::<DatabaseName>, "temp_store", "MEMORY")?;
    conn.busy_timeout(Duration::from_millis(5000))?;
    Ok(())
}

fn apply_migrations(conn: &mut Connection) -> rusqlite::Result<()> {
    let tx = conn.transaction()?;
    tx.execute_batch(
        r#"
CREATE TABLE IF NOT EXISTS schema_migrations (
    version INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    applied_at TEXT NOT NULL
);
"#,
    )?;

    for migration in MIGRATIONS {
        let already_applied: Option<i64> = tx
            .query_row(
                "SELECT version FROM schema_migrations WHERE version = ?1",
                params![migration.version],
                |row| row.get(0),
            )
            .optional()?;

        if already_applied.is_some() {
            continue;
        }

        tx.execute_batch(migration.sql)?;
        tx.execute(
            "INSERT INTO schema_migrations (version, name, applied_at) VALUES (?1, ?2, ?3)",
            params![migration.version, migration.name, now_utc_rfc3339()],
        )?;
    }

    tx.commit()
}

fn now_utc_rfc3339() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| OffsetDateTime::now_utc().unix_timestamp().to_string())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use uuid::Uuid;

    use super::{MemoryBackend, SqliteBackend, StorageBackend, CURRENT_SCHEMA_VERSION};

    fn unique_db_path() -> PathBuf {
        std::env::temp_dir()
            .join(format!("craftlist-backend-{}", Uuid::now_v7()))
            .join("state.sqlite")
    }

    #[test]
    fn memory_backend_round_trips_and_can_fail() {
        let mut backend = MemoryBackend::new();
        backend.write("k", "v").expect("write should succeed");
        assert_eq!(backend.read("k").unwrap().as_deref(), Some("v"));
        assert_eq!(backend.read("missing").unwrap(), None);

        backend.set_fail_writes(true);
        assert!(backend.write("k", "other").is_err());
        assert_eq!(backend.get("k"), Some("v"));
    }

    #[test]
    fn sqlite_backend_upserts_and_survives_reopen() {
        let path = unique_db_path();
        {
            let mut backend = SqliteBackend::open(&path).expect("backend should open");
            assert_eq!(backend.schema_version().unwrap(), CURRENT_SCHEMA_VERSION);
            backend.write("worlds", "[]").expect("first write");
            backend.write("worlds", "[1]").expect("second write");
        }

        let backend = SqliteBackend::open(&path).expect("backend should reopen");
        assert_eq!(backend.read("worlds").unwrap().as_deref(), Some("[1]"));
        assert_eq!(backend.read("absent").unwrap(), None);
        assert_eq!(backend.schema_version().unwrap(), CURRENT_SCHEMA_VERSION);

        if let Some(dir) = path.parent() {
            let _ = std::fs::remove_dir_all(dir);
        }
    }

    #[test]
    fn sqlite_backend_rejects_newer_schema() {
        let path = unique_db_path();
        {
            let backend = SqliteBackend::open(&path).expect("backend should open");
            backend
                .conn
                .execute(
                    "INSERT INTO schema_migrations (version, name, applied_at) VALUES (?1, ?2, ?3)",
                    rusqlite::params![CURRENT_SCHEMA_VERSION + 1, "future", "2030-01-01T00:00:00Z"],
                )
                .expect("insert future migration");
        }

        let err = match SqliteBackend::open(&path) {
            Ok(_) => panic!("newer schema should be rejected"),
            Err(err) => err,
        };
        assert!(err.to_string().contains("unsupported schema version"));

        if let Some(dir) = path.parent() {
            let _ = std::fs::remove_dir_all(dir);
        }
    }
}
