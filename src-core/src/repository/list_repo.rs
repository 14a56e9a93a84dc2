//! List Repository Implementation

use async_trait::async_trait;
use rusqlite::{params, OptionalExtension};

use crate::domain::{DomainError, DomainResult, List, ListKind};
use super::db::{db_err, not_initialized, SharedConn};
use super::traits::{Repository, SearchableRepository};

/// SQLite implementation of List repository
pub struct ListRepository {
    conn: SharedConn,
}

impl ListRepository {
    pub fn new(conn: SharedConn) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl Repository<List> for ListRepository {
    async fn create(&self, entity: &List) -> DomainResult<List> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        conn.execute(
            "INSERT INTO lists (id, name, kind) VALUES (?, ?, ?)",
            params![entity.id, entity.name, entity.kind.as_str()],
        )
        .map_err(db_err)?;

        Ok(entity.clone())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<List>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let row = conn
            .query_row("SELECT id, name, kind FROM lists WHERE id = ?", params![id], |row| Ok(row_to_list(row)))
            .optional()
            .map_err(db_err)?;
        row.transpose()
    }

    async fn list(&self) -> DomainResult<Vec<List>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let mut stmt = conn
            .prepare("SELECT id, name, kind FROM lists ORDER BY rowid")
            .map_err(db_err)?;
        let mut rows = stmt.query([]).map_err(db_err)?;

        let mut lists = Vec::new();
        while let Some(row) = rows.next().map_err(db_err)? {
            lists.push(row_to_list(row)?);
        }
        Ok(lists)
    }

    async fn update(&self, entity: &List) -> DomainResult<List> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let changed = conn
            .execute(
                "UPDATE lists SET name = ?, kind = ? WHERE id = ?",
                params![entity.name, entity.kind.as_str(), entity.id],
            )
            .map_err(db_err)?;

        if changed == 0 {
            return Err(DomainError::NotFound(format!("List {}", entity.id)));
        }
        Ok(entity.clone())
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        conn.execute("DELETE FROM lists WHERE id = ?", params![id])
            .map_err(db_err)?;
        Ok(())
    }
}

#[async_trait]
impl SearchableRepository<List> for ListRepository {
    async fn search(&self, query: &str) -> DomainResult<Vec<List>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let mut stmt = conn
            .prepare("SELECT id, name, kind FROM lists WHERE instr(lower(name), lower(?)) > 0 ORDER BY rowid")
            .map_err(db_err)?;
        let mut rows = stmt.query(params![query]).map_err(db_err)?;

        let mut lists = Vec::new();
        while let Some(row) = rows.next().map_err(db_err)? {
            lists.push(row_to_list(row)?);
        }
        Ok(lists)
    }
}

fn row_to_list(row: &rusqlite::Row) -> DomainResult<List> {
    let kind: String = row.get(2).map_err(db_err)?;
    Ok(List {
        id: row.get(0).map_err(db_err)?,
        name: row.get(1).map_err(db_err)?,
        kind: kind.parse::<ListKind>()?,
    })
}
