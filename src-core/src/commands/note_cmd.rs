//! Note commands

use crate::domain::{Note, NotePatch};
use crate::views::{self, DescriptionSegment};
use crate::AppState;

pub async fn create_note(state: &AppState, title: String, list_id: Option<String>) -> Result<Note, String> {
    state.store.add_note(&title, list_id).await.map_err(|e| e.to_string())
}

/// Notes of a folder (or loose notes), most recently updated first
pub async fn list_notes(state: &AppState, list_id: Option<String>) -> Result<Vec<Note>, String> {
    let snapshot = state.store.snapshot().await;
    Ok(views::notes_in_folder(&snapshot, list_id.as_deref()))
}

pub async fn get_note(state: &AppState, id: String) -> Result<Note, String> {
    state
        .store
        .snapshot()
        .await
        .note(&id)
        .cloned()
        .ok_or_else(|| format!("Note {} not found", id))
}

pub async fn update_note(state: &AppState, id: String, patch: NotePatch) -> Result<Note, String> {
    state.store.update_note(&id, patch).await.map_err(|e| e.to_string())
}

/// Move a note to the trash; `false` when the user declined
pub async fn delete_note(state: &AppState, id: String) -> Result<bool, String> {
    state.store.delete_note(&id).await.map_err(|e| e.to_string())
}

/// A task description split into text and links to notes it mentions
pub async fn get_task_note_links(state: &AppState, task_id: String) -> Result<Vec<DescriptionSegment>, String> {
    let snapshot = state.store.snapshot().await;
    let task = snapshot
        .task(&task_id)
        .ok_or_else(|| format!("Task {} not found", task_id))?;
    Ok(views::link_notes(task.description.as_deref().unwrap_or_default(), &snapshot.notes))
}
