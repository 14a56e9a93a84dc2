//! Database Connection and Setup
//!
//! Manages SQLite database connection and migrations.

use rusqlite::Connection;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::DomainError;

/// Connection shared by every repository; `None` once closed
pub type SharedConn = Arc<Mutex<Option<Connection>>>;

/// Database state wrapper
#[derive(Clone)]
pub struct DbState {
    pub conn: SharedConn,
}

impl DbState {
    pub fn new() -> Self {
        Self {
            conn: Arc::new(Mutex::new(None)),
        }
    }

    pub fn connection(&self) -> SharedConn {
        self.conn.clone()
    }

    pub async fn is_open(&self) -> bool {
        self.conn.lock().await.is_some()
    }

    /// Drop the connection; repositories report "not initialized" afterwards
    pub async fn close(&self) {
        let mut guard = self.conn.lock().await;
        *guard = None;
    }
}

impl Default for DbState {
    fn default() -> Self {
        Self::new()
    }
}

/// Initialize database with path (`:memory:` for an in-memory database)
pub async fn init_db(db_path: &Path) -> Result<DbState, String> {
    let conn = if db_path.as_os_str() == ":memory:" {
        Connection::open_in_memory()
    } else {
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| format!("Failed to create data dir: {}", e))?;
            }
        }
        Connection::open(db_path)
    }
    .map_err(|e| format!("Failed to open db: {}", e))?;

    run_migrations(&conn)?;
    log::debug!("Database ready at {}", db_path.display());

    let state = DbState::new();
    *state.conn.lock().await = Some(conn);
    Ok(state)
}

/// Check if a column exists in a table
fn column_exists(conn: &Connection, table: &str, column: &str) -> bool {
    let query = format!("PRAGMA table_info({})", table);
    let Ok(mut stmt) = conn.prepare(&query) else {
        return false;
    };
    let Ok(mut rows) = stmt.query([]) else {
        return false;
    };
    while let Ok(Some(row)) = rows.next() {
        if let Ok(name) = row.get::<_, String>(1) {
            if name == column {
                return true;
            }
        }
    }
    false
}

/// Run database migrations
fn run_migrations(conn: &Connection) -> Result<(), String> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS lists (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            kind TEXT NOT NULL DEFAULT 'task'
        );
        CREATE TABLE IF NOT EXISTS tags (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL
        );
        CREATE TABLE IF NOT EXISTS tasks (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            description TEXT,
            is_completed INTEGER NOT NULL DEFAULT 0,
            priority INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            due_date TEXT,
            list_id TEXT,
            tags TEXT NOT NULL DEFAULT '[]',
            subtasks TEXT NOT NULL DEFAULT '[]'
        );
        CREATE TABLE IF NOT EXISTS filters (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'all',
            priority TEXT NOT NULL DEFAULT 'all',
            list_id TEXT NOT NULL DEFAULT 'all',
            tag TEXT NOT NULL DEFAULT 'all'
        );
        CREATE TABLE IF NOT EXISTS notes (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            content TEXT NOT NULL DEFAULT '',
            list_id TEXT,
            updated_at TEXT NOT NULL
        );
        CREATE TABLE IF NOT EXISTS trash (
            id TEXT PRIMARY KEY,
            kind TEXT NOT NULL,
            payload TEXT NOT NULL,
            deleted_at TEXT NOT NULL
        );",
    )
    .map_err(|e| e.to_string())?;

    // Calendar drops record an explicit all-day flag
    if !column_exists(conn, "tasks", "is_all_day") {
        conn.execute("ALTER TABLE tasks ADD COLUMN is_all_day INTEGER", [])
            .map_err(|e| format!("Failed to add is_all_day: {}", e))?;
    }

    conn.execute_batch(
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_tags_name ON tags(name);
        CREATE INDEX IF NOT EXISTS idx_tasks_list ON tasks(list_id);
        CREATE INDEX IF NOT EXISTS idx_notes_list ON notes(list_id);
        CREATE INDEX IF NOT EXISTS idx_trash_deleted ON trash(deleted_at);",
    )
    .map_err(|e| e.to_string())?;

    Ok(())
}

pub(crate) fn db_err(e: rusqlite::Error) -> DomainError {
    match e {
        rusqlite::Error::SqliteFailure(err, msg) if err.code == rusqlite::ErrorCode::ConstraintViolation => {
            DomainError::Conflict(msg.unwrap_or_else(|| err.to_string()))
        }
        other => DomainError::Internal(other.to_string()),
    }
}

pub(crate) fn not_initialized() -> DomainError {
    DomainError::Internal("Database not initialized".to_string())
}

/// Serialize a list-valued column
pub(crate) fn to_json_column<T: serde::Serialize>(value: &T) -> Result<String, DomainError> {
    serde_json::to_string(value).map_err(|e| DomainError::Internal(e.to_string()))
}

/// Read a list-valued column, tolerating NULL
pub(crate) fn from_json_column<T>(row: &rusqlite::Row, idx: usize) -> Result<T, DomainError>
where
    T: serde::de::DeserializeOwned + Default,
{
    let raw: Option<String> = row.get(idx).map_err(db_err)?;
    match raw {
        Some(text) if !text.is_empty() => {
            serde_json::from_str(&text).map_err(|e| DomainError::Internal(e.to_string()))
        }
        _ => Ok(T::default()),
    }
}
