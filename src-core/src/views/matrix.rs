//! Eisenhower matrix: open tasks grouped by priority

use serde::Serialize;

use crate::domain::{Priority, Snapshot, Task};

/// Quadrant order on the board
pub const QUADRANT_PRIORITIES: [Priority; 4] = [Priority::High, Priority::Medium, Priority::Low, Priority::None];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Quadrant {
    pub priority: Priority,
    pub title: &'static str,
    pub description: &'static str,
    pub tasks: Vec<Task>,
}

impl Quadrant {
    fn labels(priority: Priority) -> (&'static str, &'static str) {
        match priority {
            Priority::High => ("Do First", "Urgent & Important (P3)"),
            Priority::Medium => ("Schedule", "Important, Not Urgent (P2)"),
            Priority::Low => ("Delegate", "Urgent, Not Important (P1)"),
            Priority::None => ("Eliminate", "Not Urgent, Not Important (None)"),
        }
    }
}

/// Incomplete tasks split into the four quadrants, in board order.
/// Moving a task between quadrants is `TaskPatch::priority`.
pub fn matrix(snapshot: &Snapshot) -> Vec<Quadrant> {
    QUADRANT_PRIORITIES
        .iter()
        .map(|&priority| {
            let (title, description) = Quadrant::labels(priority);
            Quadrant {
                priority,
                title,
                description,
                tasks: snapshot
                    .tasks
                    .iter()
                    .filter(|t| !t.is_completed && t.priority == priority)
                    .cloned()
                    .collect(),
            }
        })
        .collect()
}
