//! List (folder) commands

use crate::domain::{List, ListKind};
use crate::AppState;

/// Create a task or note folder
pub async fn create_list(state: &AppState, name: String, kind: ListKind) -> Result<List, String> {
    state.store.add_list(&name, kind).await.map_err(|e| e.to_string())
}

/// List folders, optionally only those of one kind
pub async fn list_lists(state: &AppState, kind: Option<ListKind>) -> Result<Vec<List>, String> {
    let lists = state.store.lists().await;
    Ok(match kind {
        Some(kind) => lists.into_iter().filter(|l| l.kind == kind).collect(),
        None => lists,
    })
}

/// Delete a folder with its tasks and notes; `false` when the user declined
pub async fn delete_list(state: &AppState, id: String) -> Result<bool, String> {
    state.store.delete_list(&id).await.map_err(|e| e.to_string())
}
