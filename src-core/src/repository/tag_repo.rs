//! Tag Repository Implementation
//!
//! SQLite-backed implementation for Tag CRUD. Names are unique, enforced by
//! the `idx_tags_name` index.

use async_trait::async_trait;
use rusqlite::{params, OptionalExtension};

use crate::domain::{DomainError, DomainResult, Tag};
use super::db::{db_err, not_initialized, SharedConn};
use super::traits::{Repository, SearchableRepository};

/// SQLite implementation of Tag repository
pub struct TagRepository {
    conn: SharedConn,
}

impl TagRepository {
    pub fn new(conn: SharedConn) -> Self {
        Self { conn }
    }

    /// Look a tag up by its (unique) name
    pub async fn find_by_name(&self, name: &str) -> DomainResult<Option<Tag>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        conn.query_row("SELECT id, name FROM tags WHERE name = ?", params![name], row_to_tag)
            .optional()
            .map_err(db_err)
    }
}

#[async_trait]
impl Repository<Tag> for TagRepository {
    async fn create(&self, entity: &Tag) -> DomainResult<Tag> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        conn.execute(
            "INSERT INTO tags (id, name) VALUES (?, ?)",
            params![entity.id, entity.name],
        )
        .map_err(|e| match db_err(e) {
            DomainError::Conflict(_) => DomainError::Conflict(format!("Tag '{}' already exists", entity.name)),
            other => other,
        })?;

        Ok(entity.clone())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Tag>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        conn.query_row("SELECT id, name FROM tags WHERE id = ?", params![id], row_to_tag)
            .optional()
            .map_err(db_err)
    }

    async fn list(&self) -> DomainResult<Vec<Tag>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let mut stmt = conn
            .prepare("SELECT id, name FROM tags ORDER BY rowid")
            .map_err(db_err)?;
        let tags = stmt
            .query_map([], row_to_tag)
            .map_err(db_err)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(db_err)?;
        Ok(tags)
    }

    async fn update(&self, entity: &Tag) -> DomainResult<Tag> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let changed = conn
            .execute("UPDATE tags SET name = ? WHERE id = ?", params![entity.name, entity.id])
            .map_err(db_err)?;

        if changed == 0 {
            return Err(DomainError::NotFound(format!("Tag {}", entity.id)));
        }
        Ok(entity.clone())
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        conn.execute("DELETE FROM tags WHERE id = ?", params![id])
            .map_err(db_err)?;
        Ok(())
    }
}

#[async_trait]
impl SearchableRepository<Tag> for TagRepository {
    async fn search(&self, query: &str) -> DomainResult<Vec<Tag>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let mut stmt = conn
            .prepare("SELECT id, name FROM tags WHERE instr(lower(name), lower(?)) > 0 ORDER BY rowid")
            .map_err(db_err)?;
        let tags = stmt
            .query_map(params![query], row_to_tag)
            .map_err(db_err)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(db_err)?;
        Ok(tags)
    }
}

/// Convert a database row to Tag
fn row_to_tag(row: &rusqlite::Row) -> rusqlite::Result<Tag> {
    Ok(Tag {
        id: row.get(0)?,
        name: row.get(1)?,
    })
}
