//! Task Repository Implementation
//!
//! SQLite-backed implementation of Repository<Task>. Tag names and subtasks
//! are stored as JSON arrays on the task row.

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};

use crate::domain::{DomainError, DomainResult, Priority, Task};
use super::db::{db_err, from_json_column, not_initialized, to_json_column, SharedConn};
use super::traits::{Repository, SearchableRepository};

const TASK_COLUMNS: &str =
    "id, title, description, is_completed, priority, created_at, due_date, list_id, tags, subtasks, is_all_day";

/// SQLite implementation of Task repository
pub struct TaskRepository {
    conn: SharedConn,
}

impl TaskRepository {
    pub fn new(conn: SharedConn) -> Self {
        Self { conn }
    }

    /// Tasks filed under a list
    pub async fn list_by_list(&self, list_id: &str) -> DomainResult<Vec<Task>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;
        query_tasks(
            conn,
            &format!("SELECT {} FROM tasks WHERE list_id = ? ORDER BY created_at DESC", TASK_COLUMNS),
            params![list_id],
        )
    }

    /// Tasks carrying a tag name
    pub async fn list_with_tag(&self, name: &str) -> DomainResult<Vec<Task>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;
        query_tasks(
            conn,
            &format!(
                "SELECT {} FROM tasks WHERE EXISTS (SELECT 1 FROM json_each(tasks.tags) WHERE value = ?) ORDER BY created_at DESC",
                TASK_COLUMNS
            ),
            params![name],
        )
    }

    /// Remove every task of a list, returns the number of rows deleted
    pub async fn delete_by_list(&self, list_id: &str) -> DomainResult<usize> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;
        conn.execute("DELETE FROM tasks WHERE list_id = ?", params![list_id])
            .map_err(db_err)
    }
}

fn query_tasks(conn: &Connection, sql: &str, args: impl rusqlite::Params) -> DomainResult<Vec<Task>> {
    let mut stmt = conn.prepare(sql).map_err(db_err)?;
    let mut rows = stmt.query(args).map_err(db_err)?;

    let mut tasks = Vec::new();
    while let Some(row) = rows.next().map_err(db_err)? {
        tasks.push(row_to_task(row)?);
    }
    Ok(tasks)
}

#[async_trait]
impl Repository<Task> for TaskRepository {
    async fn create(&self, entity: &Task) -> DomainResult<Task> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        conn.execute(
            &format!("INSERT INTO tasks ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)", TASK_COLUMNS),
            params![
                entity.id,
                entity.title,
                entity.description,
                entity.is_completed,
                entity.priority.as_u8(),
                entity.created_at,
                entity.due_date,
                entity.list_id,
                to_json_column(&entity.tags)?,
                to_json_column(&entity.subtasks)?,
                entity.is_all_day,
            ],
        )
        .map_err(db_err)?;

        Ok(entity.clone())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Task>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let mut stmt = conn
            .prepare(&format!("SELECT {} FROM tasks WHERE id = ?", TASK_COLUMNS))
            .map_err(db_err)?;
        let row = stmt
            .query_row(params![id], |row| Ok(row_to_task(row)))
            .optional()
            .map_err(db_err)?;
        row.transpose()
    }

    async fn list(&self) -> DomainResult<Vec<Task>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;
        query_tasks(conn, &format!("SELECT {} FROM tasks ORDER BY created_at DESC", TASK_COLUMNS), [])
    }

    async fn update(&self, entity: &Task) -> DomainResult<Task> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let changed = conn
            .execute(
                "UPDATE tasks SET title = ?, description = ?, is_completed = ?, priority = ?, created_at = ?,
                 due_date = ?, list_id = ?, tags = ?, subtasks = ?, is_all_day = ? WHERE id = ?",
                params![
                    entity.title,
                    entity.description,
                    entity.is_completed,
                    entity.priority.as_u8(),
                    entity.created_at,
                    entity.due_date,
                    entity.list_id,
                    to_json_column(&entity.tags)?,
                    to_json_column(&entity.subtasks)?,
                    entity.is_all_day,
                    entity.id,
                ],
            )
            .map_err(db_err)?;

        if changed == 0 {
            return Err(DomainError::NotFound(format!("Task {}", entity.id)));
        }
        Ok(entity.clone())
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        conn.execute("DELETE FROM tasks WHERE id = ?", params![id])
            .map_err(db_err)?;
        Ok(())
    }
}

#[async_trait]
impl SearchableRepository<Task> for TaskRepository {
    async fn search(&self, query: &str) -> DomainResult<Vec<Task>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;
        query_tasks(
            conn,
            &format!(
                "SELECT {} FROM tasks
                 WHERE instr(lower(title), lower(?1)) > 0 OR instr(lower(coalesce(description, '')), lower(?1)) > 0
                 ORDER BY created_at DESC",
                TASK_COLUMNS
            ),
            params![query],
        )
    }
}

/// Convert a database row to Task
fn row_to_task(row: &rusqlite::Row) -> DomainResult<Task> {
    let priority: u8 = row.get(4).map_err(db_err)?;
    Ok(Task {
        id: row.get(0).map_err(db_err)?,
        title: row.get(1).map_err(db_err)?,
        description: row.get(2).map_err(db_err)?,
        is_completed: row.get(3).map_err(db_err)?,
        priority: Priority::try_from(priority)?,
        created_at: row.get(5).map_err(db_err)?,
        due_date: row.get(6).map_err(db_err)?,
        list_id: row.get(7).map_err(db_err)?,
        tags: from_json_column(row, 8)?,
        subtasks: from_json_column(row, 9)?,
        is_all_day: row.get(10).map_err(db_err)?,
    })
}
