//! Task commands
//!
//! Create, edit, complete and delete tasks, their subtasks and tag names.

use chrono::{DateTime, Utc};

use crate::domain::{Priority, Subtask, Task, TaskPatch};
use crate::store::DropTarget;
use crate::views::{self, View, ViewContext};
use crate::AppState;

/// Create a task
pub async fn create_task(
    state: &AppState,
    title: String,
    due_date: Option<DateTime<Utc>>,
    list_id: Option<String>,
    tags: Vec<String>,
) -> Result<Task, String> {
    state
        .store
        .add_task(&title, due_date, list_id, tags)
        .await
        .map_err(|e| e.to_string())
}

/// Create a task from a quick-add line such as `Pay rent tomorrow #home`,
/// taking defaults from the active view
pub async fn quick_add_task(state: &AppState, input: String, view: View) -> Result<Task, String> {
    let snapshot = state.store.snapshot().await;
    let parsed = views::quick_add(&input, &view, &snapshot, &ViewContext::local()).map_err(|e| e.to_string())?;
    log::debug!("Quick add '{}' parsed as {:?}", input, parsed);

    state
        .store
        .add_task(&parsed.title, parsed.due_date, parsed.list_id, parsed.tags)
        .await
        .map_err(|e| e.to_string())
}

/// Get task by ID
pub async fn get_task(state: &AppState, id: String) -> Result<Task, String> {
    state.store.task(&id).await.map_err(|e| e.to_string())
}

/// Update task
pub async fn update_task(state: &AppState, id: String, patch: TaskPatch) -> Result<Task, String> {
    state.store.update_task(&id, patch).await.map_err(|e| e.to_string())
}

/// Toggle completion
pub async fn toggle_task(state: &AppState, id: String) -> Result<Task, String> {
    state.store.toggle_task(&id).await.map_err(|e| e.to_string())
}

pub async fn set_task_priority(state: &AppState, id: String, priority: Priority) -> Result<Task, String> {
    update_task(state, id, TaskPatch::priority(priority)).await
}

/// Move task to the trash; `false` when the user declined
pub async fn delete_task(state: &AppState, id: String) -> Result<bool, String> {
    state.store.delete_task(&id).await.map_err(|e| e.to_string())
}

/// Move a task onto a list, a tag or a matrix quadrant
pub async fn move_task(state: &AppState, id: String, target: DropTarget) -> Result<Task, String> {
    state.store.apply_drop(&id, target).await.map_err(|e| e.to_string())
}

// ========================
// Task tags
// ========================

pub async fn add_task_tag(state: &AppState, task_id: String, name: String) -> Result<Task, String> {
    state
        .store
        .assign_tag_to_task(&task_id, &name)
        .await
        .map_err(|e| e.to_string())
}

pub async fn remove_task_tag(state: &AppState, task_id: String, name: String) -> Result<Task, String> {
    state
        .store
        .remove_tag_from_task(&task_id, &name)
        .await
        .map_err(|e| e.to_string())
}

// ========================
// Subtasks
// ========================

pub async fn add_subtask(state: &AppState, task_id: String, title: String) -> Result<Subtask, String> {
    state.store.add_subtask(&task_id, &title).await.map_err(|e| e.to_string())
}

pub async fn toggle_subtask(state: &AppState, task_id: String, subtask_id: String) -> Result<Task, String> {
    state
        .store
        .toggle_subtask(&task_id, &subtask_id)
        .await
        .map_err(|e| e.to_string())
}

/// Remove a subtask; `false` when the user declined
pub async fn delete_subtask(state: &AppState, task_id: String, subtask_id: String) -> Result<bool, String> {
    state
        .store
        .delete_subtask(&task_id, &subtask_id)
        .await
        .map_err(|e| e.to_string())
}
