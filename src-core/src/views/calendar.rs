//! Calendar events

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::{Snapshot, Task, TaskPatch};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    pub start: DateTime<Utc>,
    pub all_day: bool,
    pub completed: bool,
}

impl From<&Task> for CalendarEvent {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id.clone(),
            title: task.title.clone(),
            start: task.due_date.unwrap_or(task.created_at),
            // An explicit flag wins; undated tasks default to all-day
            all_day: task.is_all_day.unwrap_or(task.due_date.is_none()),
            completed: task.is_completed,
        }
    }
}

/// One event per task, ordered by start
pub fn calendar_events(snapshot: &Snapshot) -> Vec<CalendarEvent> {
    let mut events: Vec<CalendarEvent> = snapshot.tasks.iter().map(CalendarEvent::from).collect();
    events.sort_by(|a, b| a.start.cmp(&b.start));
    events
}

/// The patch for an event dropped or resized onto `start`
pub fn reschedule(start: DateTime<Utc>, all_day: bool) -> TaskPatch {
    TaskPatch::schedule(Some(start), Some(all_day))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_event_start_and_all_day() {
        let created = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        let due = Utc.with_ymd_and_hms(2024, 5, 3, 14, 0, 0).unwrap();

        let mut undated = Task::new("undated".to_string());
        undated.created_at = created;
        let mut timed = Task::new("timed".to_string());
        timed.created_at = created;
        timed.due_date = Some(due);
        let mut pinned = timed.clone();
        pinned.id = "pinned".to_string();
        pinned.is_all_day = Some(true);
        pinned.is_completed = true;

        let snapshot = Snapshot { tasks: vec![timed, undated, pinned], ..Default::default() };
        let events = calendar_events(&snapshot);

        assert_eq!(events[0].title, "undated");
        assert_eq!(events[0].start, created);
        assert!(events[0].all_day);

        let timed = events.iter().find(|e| e.title == "timed" && e.id != "pinned").unwrap();
        assert_eq!(timed.start, due);
        assert!(!timed.all_day);

        let pinned = events.iter().find(|e| e.id == "pinned").unwrap();
        assert!(pinned.all_day);
        assert!(pinned.completed);
    }

    #[test]
    fn test_reschedule_patch() {
        let start = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let mut task = Task::new("move me".to_string());
        task.apply(&reschedule(start, true));
        assert_eq!(task.due_date, Some(start));
        assert_eq!(task.is_all_day, Some(true));
    }
}
