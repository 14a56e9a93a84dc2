//! Views Layer
//!
//! Pure functions over a [`Snapshot`](crate::domain::Snapshot): smart lists,
//! saved filters, the priority matrix, calendar events, search, note links
//! and quick-add parsing. Nothing here touches a datastore.

mod calendar;
mod links;
mod matrix;
mod notes;
mod quick_add;
mod search;
mod tasks;

pub use calendar::{calendar_events, reschedule, CalendarEvent};
pub use links::{link_notes, DescriptionSegment};
pub use matrix::{matrix, Quadrant, QUADRANT_PRIORITIES};
pub use notes::{notes_in_folder, trash_listing, TrashEntry};
pub use quick_add::{quick_add, QuickAdd};
pub use search::{search, SearchHit, SearchKind, SEARCH_LIMIT};
pub use tasks::{filter_tasks, sort_tasks, task_view, view_title, View, ViewContext};
