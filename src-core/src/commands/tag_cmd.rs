//! Tag commands

use crate::domain::Tag;
use crate::AppState;

/// Create a tag, or return the one that already has this name
pub async fn create_tag(state: &AppState, name: String) -> Result<Tag, String> {
    state.store.add_tag(&name).await.map_err(|e| e.to_string())
}

pub async fn list_tags(state: &AppState) -> Result<Vec<Tag>, String> {
    Ok(state.store.tags().await)
}

/// Delete by id or by name; `false` when the user declined
pub async fn delete_tag(state: &AppState, id_or_name: String) -> Result<bool, String> {
    let snapshot = state.store.snapshot().await;
    let id = match snapshot.tags.iter().find(|t| t.id == id_or_name) {
        Some(tag) => tag.id.clone(),
        None => {
            let name = Tag::normalize_name(&id_or_name).map_err(|e| e.to_string())?;
            snapshot
                .tag_by_name(&name)
                .map(|t| t.id.clone())
                .ok_or_else(|| format!("Tag {} not found", id_or_name))?
        }
    };
    state.store.delete_tag(&id).await.map_err(|e| e.to_string())
}
