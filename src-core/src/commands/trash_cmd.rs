//! Trash bin commands

use crate::domain::TrashItem;
use crate::views::{self, TrashEntry};
use crate::AppState;

/// Trash contents, newest deletion first
pub async fn list_trash(state: &AppState) -> Result<Vec<TrashEntry>, String> {
    let snapshot = state.store.snapshot().await;
    Ok(views::trash_listing(&snapshot))
}

pub async fn restore_trash_item(state: &AppState, id: String) -> Result<TrashItem, String> {
    state.store.restore_trash_item(&id).await.map_err(|e| e.to_string())
}

/// `false` when the user declined
pub async fn purge_trash_item(state: &AppState, id: String) -> Result<bool, String> {
    state
        .store
        .permanently_delete_trash_item(&id)
        .await
        .map_err(|e| e.to_string())
}

/// Number of items removed, `None` when the user declined
pub async fn empty_trash(state: &AppState) -> Result<Option<usize>, String> {
    state.store.empty_trash().await.map_err(|e| e.to_string())
}
