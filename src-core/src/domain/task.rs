//! Task Entity
//!
//! A to-do item with priority, optional due date, list/tag associations
//! and a flat list of subtasks.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity::{new_id, DomainError, Entity};
use super::wire::null_default;

/// Task priority, stored as 0-3
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Priority {
    #[default]
    None = 0,
    Low = 1,
    Medium = 2,
    High = 3,
}

impl Priority {
    pub const ALL: [Priority; 4] = [Priority::High, Priority::Medium, Priority::Low, Priority::None];

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Short label used in listings ("P3", or "" for none)
    pub fn badge(self) -> String {
        match self {
            Priority::None => String::new(),
            p => format!("P{}", p.as_u8()),
        }
    }
}

impl TryFrom<u8> for Priority {
    type Error = DomainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Priority::None),
            1 => Ok(Priority::Low),
            2 => Ok(Priority::Medium),
            3 => Ok(Priority::High),
            other => Err(DomainError::InvalidInput(format!("priority must be 0-3, got {}", other))),
        }
    }
}

impl From<Priority> for u8 {
    fn from(p: Priority) -> u8 {
        p.as_u8()
    }
}

impl FromStr for Priority {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        match lowered.as_str() {
            "none" => Ok(Priority::None),
            "low" => Ok(Priority::Low),
            "medium" | "med" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => {
                let digits = other.strip_prefix('p').unwrap_or(other);
                let value: u8 = digits
                    .parse()
                    .map_err(|_| DomainError::InvalidInput(format!("unknown priority '{}'", s)))?;
                Priority::try_from(value)
            }
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::None => write!(f, "none"),
            Priority::Low => write!(f, "low"),
            Priority::Medium => write!(f, "medium"),
            Priority::High => write!(f, "high"),
        }
    }
}

/// Checklist entry inside a task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subtask {
    pub id: String,
    pub title: String,
    #[serde(default, deserialize_with = "null_default")]
    pub is_completed: bool,
}

impl Subtask {
    pub fn new(title: String) -> Self {
        Self {
            id: new_id(),
            title,
            is_completed: false,
        }
    }
}

/// A to-do item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub is_completed: bool,
    #[serde(default, deserialize_with = "null_default")]
    pub priority: Priority,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub list_id: Option<String>,
    /// Tag names (not ids)
    #[serde(default, deserialize_with = "null_default")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub subtasks: Vec<Subtask>,
    /// Explicit all-day flag set by the calendar; `None` means "derive from due date"
    #[serde(default)]
    pub is_all_day: Option<bool>,
}

impl Task {
    /// Create a new open task with default priority
    pub fn new(title: String) -> Self {
        Self {
            id: new_id(),
            title,
            description: None,
            is_completed: false,
            priority: Priority::None,
            created_at: Utc::now(),
            due_date: None,
            list_id: None,
            tags: Vec::new(),
            subtasks: Vec::new(),
            is_all_day: None,
        }
    }

    pub fn has_tag(&self, name: &str) -> bool {
        self.tags.iter().any(|t| t == name)
    }

    /// Append a tag name, returns false if the task already carried it
    pub fn add_tag(&mut self, name: &str) -> bool {
        if self.has_tag(name) {
            return false;
        }
        self.tags.push(name.to_string());
        true
    }

    /// Remove a tag name, returns false if it was not present
    pub fn remove_tag(&mut self, name: &str) -> bool {
        let before = self.tags.len();
        self.tags.retain(|t| t != name);
        self.tags.len() != before
    }

    /// Apply a partial update in place
    pub fn apply(&mut self, patch: &TaskPatch) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(done) = patch.is_completed {
            self.is_completed = done;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(due) = patch.due_date {
            self.due_date = due;
        }
        if let Some(list_id) = &patch.list_id {
            self.list_id = list_id.clone();
        }
        if let Some(tags) = &patch.tags {
            self.tags.clear();
            for tag in tags {
                self.add_tag(tag);
            }
        }
        if let Some(subtasks) = &patch.subtasks {
            self.subtasks = subtasks.clone();
        }
        if let Some(all_day) = patch.is_all_day {
            self.is_all_day = all_day;
        }
    }

    /// (done, total) subtask counts
    pub fn subtask_progress(&self) -> (usize, usize) {
        let done = self.subtasks.iter().filter(|s| s.is_completed).count();
        (done, self.subtasks.len())
    }
}

impl Entity for Task {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Partial update of a task. `Some(None)` clears an optional field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub is_completed: Option<bool>,
    pub priority: Option<Priority>,
    pub due_date: Option<Option<DateTime<Utc>>>,
    pub list_id: Option<Option<String>>,
    pub tags: Option<Vec<String>>,
    pub subtasks: Option<Vec<Subtask>>,
    pub is_all_day: Option<Option<bool>>,
}

impl TaskPatch {
    pub fn priority(priority: Priority) -> Self {
        Self { priority: Some(priority), ..Default::default() }
    }

    pub fn move_to_list(list_id: Option<String>) -> Self {
        Self { list_id: Some(list_id), ..Default::default() }
    }

    pub fn schedule(due: Option<DateTime<Utc>>, all_day: Option<bool>) -> Self {
        Self {
            due_date: Some(due),
            is_all_day: Some(all_day),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == TaskPatch::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_creation() {
        let task = Task::new("Write report".to_string());
        assert_eq!(task.id().len(), 36);
        assert_eq!(task.title, "Write report");
        assert!(!task.is_completed);
        assert_eq!(task.priority, Priority::None);
        assert!(task.tags.is_empty());
    }

    #[test]
    fn test_tags_are_unique_per_task() {
        let mut task = Task::new("t".to_string());
        assert!(task.add_tag("work"));
        assert!(!task.add_tag("work"));
        assert_eq!(task.tags, vec!["work"]);
        assert!(task.remove_tag("work"));
        assert!(!task.remove_tag("work"));
    }

    #[test]
    fn test_apply_patch_clears_optional_fields() {
        let mut task = Task::new("t".to_string());
        task.list_id = Some("inbox".to_string());
        task.due_date = Some(Utc::now());

        task.apply(&TaskPatch {
            title: Some("renamed".to_string()),
            list_id: Some(None),
            due_date: Some(None),
            tags: Some(vec!["a".to_string(), "a".to_string(), "b".to_string()]),
            ..Default::default()
        });

        assert_eq!(task.title, "renamed");
        assert!(task.list_id.is_none());
        assert!(task.due_date.is_none());
        assert_eq!(task.tags, vec!["a", "b"]);
    }

    #[test]
    fn test_priority_parsing() {
        assert_eq!("3".parse::<Priority>().unwrap(), Priority::High);
        assert_eq!("P2".parse::<Priority>().unwrap(), Priority::Medium);
        assert_eq!("low".parse::<Priority>().unwrap(), Priority::Low);
        assert!("7".parse::<Priority>().is_err());
        assert!(Priority::try_from(4).is_err());
        assert_eq!(Priority::High.badge(), "P3");
    }

    #[test]
    fn test_task_wire_format() {
        let mut task = Task::new("Ship it".to_string());
        task.priority = Priority::Medium;
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["isCompleted"], false);
        assert_eq!(json["priority"], 2);
        assert!(json.get("createdAt").is_some());

        // Rows from the hosted backend may carry nulls for list columns
        let row = serde_json::json!({
            "id": "abc",
            "title": "From cloud",
            "isCompleted": true,
            "priority": 3,
            "createdAt": "2024-05-01T10:00:00Z",
            "dueDate": null,
            "listId": null,
            "tags": null,
            "subtasks": null
        });
        let parsed: Task = serde_json::from_value(row).unwrap();
        assert!(parsed.tags.is_empty());
        assert!(parsed.subtasks.is_empty());
        assert_eq!(parsed.priority, Priority::High);

        let sparse = serde_json::json!({
            "id": "def",
            "title": "Half filled",
            "isCompleted": null,
            "priority": null,
            "createdAt": "2024-05-01T10:00:00Z",
            "subtasks": [{ "id": "s1", "title": "step", "isCompleted": null }]
        });
        let parsed: Task = serde_json::from_value(sparse).unwrap();
        assert!(!parsed.is_completed);
        assert_eq!(parsed.priority, Priority::None);
        assert!(!parsed.subtasks[0].is_completed);
    }

    #[test]
    fn test_subtask_progress() {
        let mut task = Task::new("t".to_string());
        task.subtasks.push(Subtask::new("a".to_string()));
        let mut done = Subtask::new("b".to_string());
        done.is_completed = true;
        task.subtasks.push(done);
        assert_eq!(task.subtask_progress(), (1, 2));
    }
}
