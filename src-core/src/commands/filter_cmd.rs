//! Saved filter commands

use crate::domain::{FilterCriteria, SavedFilter};
use crate::AppState;

pub async fn save_filter(state: &AppState, name: String, criteria: FilterCriteria) -> Result<SavedFilter, String> {
    state.store.save_filter(&name, criteria).await.map_err(|e| e.to_string())
}

pub async fn list_filters(state: &AppState) -> Result<Vec<SavedFilter>, String> {
    Ok(state.store.filters().await)
}

/// `false` when the user declined
pub async fn delete_filter(state: &AppState, id: String) -> Result<bool, String> {
    state.store.delete_saved_filter(&id).await.map_err(|e| e.to_string())
}
