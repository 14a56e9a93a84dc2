//! Saved Filter Repository Implementation
//!
//! Criteria columns keep the `"all"` sentinel for "any".

use async_trait::async_trait;
use rusqlite::{params, OptionalExtension};

use crate::domain::{DomainError, DomainResult, FilterCriteria, Priority, SavedFilter, StatusFilter};
use crate::domain::wire::ALL;
use super::db::{db_err, not_initialized, SharedConn};
use super::traits::Repository;

pub struct FilterRepository {
    conn: SharedConn,
}

impl FilterRepository {
    pub fn new(conn: SharedConn) -> Self {
        Self { conn }
    }
}

fn sentinel(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or(ALL)
}

fn priority_column(value: Option<Priority>) -> String {
    value.map(|p| p.as_u8().to_string()).unwrap_or_else(|| ALL.to_string())
}

#[async_trait]
impl Repository<SavedFilter> for FilterRepository {
    async fn create(&self, entity: &SavedFilter) -> DomainResult<SavedFilter> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let c = &entity.criteria;
        conn.execute(
            "INSERT INTO filters (id, name, status, priority, list_id, tag) VALUES (?, ?, ?, ?, ?, ?)",
            params![
                entity.id,
                entity.name,
                c.status.to_string(),
                priority_column(c.priority),
                sentinel(&c.list_id),
                sentinel(&c.tag),
            ],
        )
        .map_err(db_err)?;

        Ok(entity.clone())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<SavedFilter>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let row = conn
            .query_row(
                "SELECT id, name, status, priority, list_id, tag FROM filters WHERE id = ?",
                params![id],
                |row| Ok(row_to_filter(row)),
            )
            .optional()
            .map_err(db_err)?;
        row.transpose()
    }

    async fn list(&self) -> DomainResult<Vec<SavedFilter>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let mut stmt = conn
            .prepare("SELECT id, name, status, priority, list_id, tag FROM filters ORDER BY rowid")
            .map_err(db_err)?;
        let mut rows = stmt.query([]).map_err(db_err)?;

        let mut filters = Vec::new();
        while let Some(row) = rows.next().map_err(db_err)? {
            filters.push(row_to_filter(row)?);
        }
        Ok(filters)
    }

    async fn update(&self, entity: &SavedFilter) -> DomainResult<SavedFilter> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let c = &entity.criteria;
        let changed = conn
            .execute(
                "UPDATE filters SET name = ?, status = ?, priority = ?, list_id = ?, tag = ? WHERE id = ?",
                params![
                    entity.name,
                    c.status.to_string(),
                    priority_column(c.priority),
                    sentinel(&c.list_id),
                    sentinel(&c.tag),
                    entity.id,
                ],
            )
            .map_err(db_err)?;

        if changed == 0 {
            return Err(DomainError::NotFound(format!("Filter {}", entity.id)));
        }
        Ok(entity.clone())
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        conn.execute("DELETE FROM filters WHERE id = ?", params![id])
            .map_err(db_err)?;
        Ok(())
    }
}

fn row_to_filter(row: &rusqlite::Row) -> DomainResult<SavedFilter> {
    let status: String = row.get(2).map_err(db_err)?;
    let priority: String = row.get(3).map_err(db_err)?;
    let list_id: String = row.get(4).map_err(db_err)?;
    let tag: String = row.get(5).map_err(db_err)?;

    let or_all = |v: String| if v == ALL { None } else { Some(v) };

    Ok(SavedFilter {
        id: row.get(0).map_err(db_err)?,
        name: row.get(1).map_err(db_err)?,
        criteria: FilterCriteria {
            status: status.parse::<StatusFilter>()?,
            priority: or_all(priority).map(|p| p.parse::<Priority>()).transpose()?,
            list_id: or_all(list_id),
            tag: or_all(tag),
        },
    })
}
