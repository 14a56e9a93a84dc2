//! Trash Repository Implementation
//!
//! Soft-deleted records with their original JSON payload.

use async_trait::async_trait;
use rusqlite::{params, OptionalExtension};

use crate::domain::{DomainError, DomainResult, TrashItem, TrashKind, TrashRow};
use super::db::{db_err, not_initialized, SharedConn};
use super::traits::Repository;

pub struct TrashRepository {
    conn: SharedConn,
}

impl TrashRepository {
    pub fn new(conn: SharedConn) -> Self {
        Self { conn }
    }

    /// Remove every trash entry, returns how many were dropped
    pub async fn clear(&self) -> DomainResult<usize> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;
        conn.execute("DELETE FROM trash", []).map_err(db_err)
    }
}

fn kind_column(kind: TrashKind) -> String {
    kind.to_string()
}

fn payload_column(item: &TrashItem) -> DomainResult<String> {
    let row = TrashRow::from(item.clone());
    serde_json::to_string(&row.payload).map_err(|e| DomainError::Internal(e.to_string()))
}

#[async_trait]
impl Repository<TrashItem> for TrashRepository {
    async fn create(&self, entity: &TrashItem) -> DomainResult<TrashItem> {
        let payload = payload_column(entity)?;
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        conn.execute(
            "INSERT INTO trash (id, kind, payload, deleted_at) VALUES (?, ?, ?, ?)",
            params![entity.id, kind_column(entity.kind()), payload, entity.deleted_at],
        )
        .map_err(db_err)?;

        Ok(entity.clone())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<TrashItem>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let row = conn
            .query_row(
                "SELECT id, kind, payload, deleted_at FROM trash WHERE id = ?",
                params![id],
                |row| Ok(row_to_trash(row)),
            )
            .optional()
            .map_err(db_err)?;
        row.transpose()
    }

    async fn list(&self) -> DomainResult<Vec<TrashItem>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let mut stmt = conn
            .prepare("SELECT id, kind, payload, deleted_at FROM trash ORDER BY deleted_at DESC")
            .map_err(db_err)?;
        let mut rows = stmt.query([]).map_err(db_err)?;

        let mut items = Vec::new();
        while let Some(row) = rows.next().map_err(db_err)? {
            match row_to_trash(row) {
                Ok(item) => items.push(item),
                // Unreadable payloads are skipped
                Err(e) => log::warn!("Skipping trash row: {}", e),
            }
        }
        Ok(items)
    }

    async fn update(&self, entity: &TrashItem) -> DomainResult<TrashItem> {
        let payload = payload_column(entity)?;
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let changed = conn
            .execute(
                "UPDATE trash SET kind = ?, payload = ?, deleted_at = ? WHERE id = ?",
                params![kind_column(entity.kind()), payload, entity.deleted_at, entity.id],
            )
            .map_err(db_err)?;

        if changed == 0 {
            return Err(DomainError::NotFound(format!("Trash item {}", entity.id)));
        }
        Ok(entity.clone())
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        conn.execute("DELETE FROM trash WHERE id = ?", params![id])
            .map_err(db_err)?;
        Ok(())
    }
}

fn row_to_trash(row: &rusqlite::Row) -> DomainResult<TrashItem> {
    let kind: String = row.get(1).map_err(db_err)?;
    let payload: String = row.get(2).map_err(db_err)?;

    let kind: TrashKind = serde_json::from_value(serde_json::Value::String(kind))
        .map_err(|e| DomainError::Internal(e.to_string()))?;
    let payload = serde_json::from_str(&payload).map_err(|e| DomainError::Internal(e.to_string()))?;

    TrashItem::try_from(TrashRow {
        id: row.get(0).map_err(db_err)?,
        kind,
        payload,
        deleted_at: row.get(3).map_err(db_err)?,
    })
}
