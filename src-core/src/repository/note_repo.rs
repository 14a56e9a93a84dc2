//! Note Repository Implementation

use async_trait::async_trait;
use rusqlite::{params, OptionalExtension};

use crate::domain::{DomainError, DomainResult, Note};
use super::db::{db_err, not_initialized, SharedConn};
use super::traits::{Repository, SearchableRepository};

const NOTE_COLUMNS: &str = "id, title, content, list_id, updated_at";

/// SQLite implementation of Note repository
pub struct NoteRepository {
    conn: SharedConn,
}

impl NoteRepository {
    pub fn new(conn: SharedConn) -> Self {
        Self { conn }
    }

    /// Notes of a folder, most recently edited first
    pub async fn list_by_list(&self, list_id: &str) -> DomainResult<Vec<Note>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let mut stmt = conn
            .prepare(&format!("SELECT {} FROM notes WHERE list_id = ? ORDER BY updated_at DESC", NOTE_COLUMNS))
            .map_err(db_err)?;
        let notes = stmt
            .query_map(params![list_id], row_to_note)
            .map_err(db_err)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(db_err)?;
        Ok(notes)
    }

    pub async fn delete_by_list(&self, list_id: &str) -> DomainResult<usize> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;
        conn.execute("DELETE FROM notes WHERE list_id = ?", params![list_id])
            .map_err(db_err)
    }
}

#[async_trait]
impl Repository<Note> for NoteRepository {
    async fn create(&self, entity: &Note) -> DomainResult<Note> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        conn.execute(
            &format!("INSERT INTO notes ({}) VALUES (?, ?, ?, ?, ?)", NOTE_COLUMNS),
            params![entity.id, entity.title, entity.content, entity.list_id, entity.updated_at],
        )
        .map_err(db_err)?;

        Ok(entity.clone())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Note>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        conn.query_row(
            &format!("SELECT {} FROM notes WHERE id = ?", NOTE_COLUMNS),
            params![id],
            row_to_note,
        )
        .optional()
        .map_err(db_err)
    }

    async fn list(&self) -> DomainResult<Vec<Note>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let mut stmt = conn
            .prepare(&format!("SELECT {} FROM notes ORDER BY updated_at DESC", NOTE_COLUMNS))
            .map_err(db_err)?;
        let notes = stmt
            .query_map([], row_to_note)
            .map_err(db_err)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(db_err)?;
        Ok(notes)
    }

    async fn update(&self, entity: &Note) -> DomainResult<Note> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let changed = conn
            .execute(
                "UPDATE notes SET title = ?, content = ?, list_id = ?, updated_at = ? WHERE id = ?",
                params![entity.title, entity.content, entity.list_id, entity.updated_at, entity.id],
            )
            .map_err(db_err)?;

        if changed == 0 {
            return Err(DomainError::NotFound(format!("Note {}", entity.id)));
        }
        Ok(entity.clone())
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        conn.execute("DELETE FROM notes WHERE id = ?", params![id])
            .map_err(db_err)?;
        Ok(())
    }
}

#[async_trait]
impl SearchableRepository<Note> for NoteRepository {
    async fn search(&self, query: &str) -> DomainResult<Vec<Note>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let mut stmt = conn
            .prepare(&format!(
                "SELECT {} FROM notes
                 WHERE instr(lower(title), lower(?1)) > 0 OR instr(lower(content), lower(?1)) > 0
                 ORDER BY updated_at DESC",
                NOTE_COLUMNS
            ))
            .map_err(db_err)?;
        let notes = stmt
            .query_map(params![query], row_to_note)
            .map_err(db_err)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(db_err)?;
        Ok(notes)
    }
}

fn row_to_note(row: &rusqlite::Row) -> rusqlite::Result<Note> {
    Ok(Note {
        id: row.get(0)?,
        title: row.get(1)?,
        content: row.get(2)?,
        list_id: row.get(3)?,
        updated_at: row.get(4)?,
    })
}
