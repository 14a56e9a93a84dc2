//! View commands: smart lists, matrix, calendar and search

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::Task;
use crate::views::{self, CalendarEvent, Quadrant, SearchHit, View, ViewContext};
use crate::AppState;

/// A titled task list as shown in the main pane
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskListing {
    pub title: String,
    pub tasks: Vec<Task>,
}

pub async fn get_view(state: &AppState, view: View, sort_by_priority: bool) -> Result<TaskListing, String> {
    let snapshot = state.store.snapshot().await;
    let tasks = views::task_view(&snapshot, &view, &ViewContext::local(), sort_by_priority);
    Ok(TaskListing { title: views::view_title(&view, &snapshot), tasks })
}

pub async fn get_matrix(state: &AppState) -> Result<Vec<Quadrant>, String> {
    Ok(views::matrix(&state.store.snapshot().await))
}

/// Calendar events, optionally limited to `[from, to)`
pub async fn get_calendar_events(
    state: &AppState,
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
) -> Result<Vec<CalendarEvent>, String> {
    let events = views::calendar_events(&state.store.snapshot().await);
    Ok(events
        .into_iter()
        .filter(|e| from.map_or(true, |from| e.start >= from))
        .filter(|e| to.map_or(true, |to| e.start < to))
        .collect())
}

/// Apply a calendar drop or resize
pub async fn reschedule_task(
    state: &AppState,
    id: String,
    start: DateTime<Utc>,
    all_day: bool,
) -> Result<Task, String> {
    state
        .store
        .update_task(&id, views::reschedule(start, all_day))
        .await
        .map_err(|e| e.to_string())
}

pub async fn search(state: &AppState, query: String) -> Result<Vec<SearchHit>, String> {
    Ok(views::search(&state.store.snapshot().await, &query))
}
