//! Task, subtask and task-tag actions

use chrono::{DateTime, Utc};

use crate::domain::{
    require_text, DomainError, DomainResult, Priority, Record, Snapshot, Subtask, Table, Tag, Task, TaskPatch,
    TrashItem, TrashPayload,
};
use super::confirm::{DELETE_SUBTASK, DELETE_TASK};
use super::{TaskStore, Write};

/// Where a dragged task was dropped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropTarget {
    /// A task folder in the sidebar
    List(String),
    /// A tag in the sidebar, by name
    Tag(String),
    /// A quadrant of the priority matrix
    Matrix(Priority),
}

/// Normalize and dedupe tag names, keeping first-seen order
pub(crate) fn normalize_tags(names: &[String]) -> DomainResult<Vec<String>> {
    let mut out: Vec<String> = Vec::with_capacity(names.len());
    for raw in names {
        let name = Tag::normalize_name(raw)?;
        if !out.contains(&name) {
            out.push(name);
        }
    }
    Ok(out)
}

/// Create the tags that do not exist yet, returning the new ones
pub(crate) fn ensure_tags(snapshot: &mut Snapshot, names: &[String]) -> Vec<Tag> {
    let mut created = Vec::new();
    for name in names {
        if snapshot.tag_by_name(name).is_none() {
            let tag = Tag::new(name.clone());
            snapshot.tags.push(tag.clone());
            created.push(tag);
        }
    }
    created
}

pub(crate) fn require_list(snapshot: &Snapshot, list_id: &str) -> DomainResult<()> {
    match snapshot.list(list_id) {
        Some(_) => Ok(()),
        None => Err(DomainError::NotFound(format!("List {}", list_id))),
    }
}

fn tag_writes(tags: Vec<Tag>) -> impl Iterator<Item = Write> {
    tags.into_iter().map(|t| Write::Upsert(Record::Tag(t)))
}

impl TaskStore {
    /// Create an open task with priority 0; unknown tags are created
    pub async fn add_task(
        &self,
        title: &str,
        due_date: Option<DateTime<Utc>>,
        list_id: Option<String>,
        tags: Vec<String>,
    ) -> DomainResult<Task> {
        let title = require_text("title", title)?;
        let tags = normalize_tags(&tags)?;

        let (task, writes) = {
            let mut state = self.state.lock().await;
            let snapshot = &mut state.snapshot;
            if let Some(list_id) = &list_id {
                require_list(snapshot, list_id)?;
            }

            let mut task = Task::new(title);
            task.due_date = due_date;
            task.list_id = list_id;
            task.tags = tags;

            let new_tags = ensure_tags(snapshot, &task.tags);
            snapshot.tasks.push(task.clone());

            let mut writes: Vec<Write> = tag_writes(new_tags).collect();
            writes.push(Write::Upsert(Record::Task(task.clone())));
            (task, writes)
        };

        log::info!("Added task {} '{}'", task.id, task.title);
        self.persist("add task", writes).await;
        Ok(task)
    }

    /// Change a task through `f`, which reports whether anything changed.
    /// With `create_tags`, names on the task that are not tags yet are created.
    async fn mutate_task<F>(&self, action: &str, id: &str, create_tags: bool, f: F) -> DomainResult<Task>
    where
        F: FnOnce(&Snapshot, &mut Task) -> DomainResult<bool>,
    {
        let (task, writes) = {
            let mut state = self.state.lock().await;
            let snapshot = &mut state.snapshot;
            let idx = snapshot
                .tasks
                .iter()
                .position(|t| t.id == id)
                .ok_or_else(|| DomainError::NotFound(format!("Task {}", id)))?;

            let mut task = snapshot.tasks[idx].clone();
            if !f(snapshot, &mut task)? {
                return Ok(task);
            }

            let new_tags = if create_tags { ensure_tags(snapshot, &task.tags) } else { Vec::new() };
            snapshot.tasks[idx] = task.clone();

            let mut writes: Vec<Write> = tag_writes(new_tags).collect();
            writes.push(Write::Upsert(Record::Task(task.clone())));
            (task, writes)
        };

        self.persist(action, writes).await;
        Ok(task)
    }

    /// Apply a partial update
    pub async fn update_task(&self, id: &str, patch: TaskPatch) -> DomainResult<Task> {
        let mut patch = patch;
        if let Some(title) = &patch.title {
            patch.title = Some(require_text("title", title)?);
        }
        if let Some(tags) = &patch.tags {
            patch.tags = Some(normalize_tags(tags)?);
        }

        self.mutate_task("update task", id, true, |snapshot, task| {
            if let Some(Some(list_id)) = &patch.list_id {
                require_list(snapshot, list_id)?;
            }
            task.apply(&patch);
            Ok(!patch.is_empty())
        })
        .await
    }

    /// Flip the completion flag
    pub async fn toggle_task(&self, id: &str) -> DomainResult<Task> {
        self.mutate_task("toggle task", id, false, |_, task| {
            task.is_completed = !task.is_completed;
            Ok(true)
        })
        .await
    }

    /// Move a task to the trash. Returns `false` when the user declined.
    pub async fn delete_task(&self, id: &str) -> DomainResult<bool> {
        self.task(id).await?;
        if !self.confirmed(DELETE_TASK) {
            return Ok(false);
        }

        let writes = {
            let mut state = self.state.lock().await;
            let snapshot = &mut state.snapshot;
            let Some(idx) = snapshot.tasks.iter().position(|t| t.id == id) else {
                return Err(DomainError::NotFound(format!("Task {}", id)));
            };
            let task = snapshot.tasks.remove(idx);
            let item = TrashItem::new(TrashPayload::Task(task), Utc::now());
            snapshot.trash.push(item.clone());

            vec![
                Write::Upsert(Record::Trash(item)),
                Write::Delete(Table::Tasks, vec![id.to_string()]),
            ]
        };

        log::info!("Moved task {} to trash", id);
        self.persist("delete task", writes).await;
        Ok(true)
    }

    /// Add a tag name to a task, creating the tag if needed; no-op when present
    pub async fn assign_tag_to_task(&self, task_id: &str, name: &str) -> DomainResult<Task> {
        let name = Tag::normalize_name(name)?;
        self.mutate_task("assign tag", task_id, true, |_, task| Ok(task.add_tag(&name)))
            .await
    }

    pub async fn remove_tag_from_task(&self, task_id: &str, name: &str) -> DomainResult<Task> {
        let name = Tag::normalize_name(name)?;
        self.mutate_task("remove tag", task_id, false, |_, task| Ok(task.remove_tag(&name)))
            .await
    }

    pub async fn add_subtask(&self, task_id: &str, title: &str) -> DomainResult<Subtask> {
        let subtask = Subtask::new(require_text("subtask title", title)?);
        let added = subtask.clone();
        self.mutate_task("add subtask", task_id, false, move |_, task| {
            task.subtasks.push(added);
            Ok(true)
        })
        .await?;
        Ok(subtask)
    }

    pub async fn toggle_subtask(&self, task_id: &str, subtask_id: &str) -> DomainResult<Task> {
        self.mutate_task("toggle subtask", task_id, false, |_, task| {
            let subtask = task
                .subtasks
                .iter_mut()
                .find(|s| s.id == subtask_id)
                .ok_or_else(|| DomainError::NotFound(format!("Subtask {}", subtask_id)))?;
            subtask.is_completed = !subtask.is_completed;
            Ok(true)
        })
        .await
    }

    /// Remove a subtask. Returns `false` when the user declined.
    pub async fn delete_subtask(&self, task_id: &str, subtask_id: &str) -> DomainResult<bool> {
        let task = self.task(task_id).await?;
        if !task.subtasks.iter().any(|s| s.id == subtask_id) {
            return Err(DomainError::NotFound(format!("Subtask {}", subtask_id)));
        }
        if !self.confirmed(DELETE_SUBTASK) {
            return Ok(false);
        }

        self.mutate_task("delete subtask", task_id, false, |_, task| {
            let before = task.subtasks.len();
            task.subtasks.retain(|s| s.id != subtask_id);
            Ok(task.subtasks.len() != before)
        })
        .await?;
        Ok(true)
    }

    /// Drag-and-drop: move to a list, tag it, or set its priority
    pub async fn apply_drop(&self, task_id: &str, target: DropTarget) -> DomainResult<Task> {
        match target {
            DropTarget::List(list_id) => self.update_task(task_id, TaskPatch::move_to_list(Some(list_id))).await,
            DropTarget::Tag(name) => self.assign_tag_to_task(task_id, &name).await,
            DropTarget::Matrix(priority) => self.update_task(task_id, TaskPatch::priority(priority)).await,
        }
    }
}
