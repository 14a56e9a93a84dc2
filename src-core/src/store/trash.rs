//! Trash actions: restore, purge, empty

use crate::domain::{DomainError, DomainResult, Record, Snapshot, Table, TrashItem, TrashPayload};
use super::confirm::{EMPTY_TRASH, PURGE_ITEM};
use super::{TaskStore, Write};

/// Put a payload back into its collection, returning the record to write
fn reinsert(snapshot: &mut Snapshot, payload: TrashPayload) -> DomainResult<Record> {
    let taken = |exists: bool, what: &str, id: &str| {
        if exists {
            Err(DomainError::Conflict(format!("{} {} already exists", what, id)))
        } else {
            Ok(())
        }
    };

    match payload {
        TrashPayload::Task(mut task) => {
            taken(snapshot.task(&task.id).is_some(), "Task", &task.id)?;
            if let Some(list_id) = &task.list_id {
                if snapshot.list(list_id).is_none() {
                    log::info!("Restored task {} detached from missing list {}", task.id, list_id);
                    task.list_id = None;
                }
            }
            snapshot.tasks.push(task.clone());
            Ok(Record::Task(task))
        }
        TrashPayload::List(list) => {
            taken(snapshot.list(&list.id).is_some(), "List", &list.id)?;
            snapshot.lists.push(list.clone());
            Ok(Record::List(list))
        }
        TrashPayload::Tag(tag) => {
            if snapshot.tag_by_name(&tag.name).is_some() {
                return Err(DomainError::Conflict(format!("Tag '{}' already exists", tag.name)));
            }
            taken(snapshot.tags.iter().any(|t| t.id == tag.id), "Tag", &tag.id)?;
            snapshot.tags.push(tag.clone());
            Ok(Record::Tag(tag))
        }
        TrashPayload::Note(mut note) => {
            taken(snapshot.note(&note.id).is_some(), "Note", &note.id)?;
            if let Some(list_id) = &note.list_id {
                if snapshot.list(list_id).is_none() {
                    log::info!("Restored note {} detached from missing list {}", note.id, list_id);
                    note.list_id = None;
                }
            }
            snapshot.notes.push(note.clone());
            Ok(Record::Note(note))
        }
    }
}

impl TaskStore {
    /// Re-insert the payload into its table and drop the trash entry.
    /// On conflict the item stays in the trash.
    pub async fn restore_trash_item(&self, id: &str) -> DomainResult<TrashItem> {
        let (item, writes) = {
            let mut state = self.state.lock().await;
            let snapshot = &mut state.snapshot;
            let idx = snapshot
                .trash
                .iter()
                .position(|t| t.id == id)
                .ok_or_else(|| DomainError::NotFound(format!("Trash item {}", id)))?;

            let payload = snapshot.trash[idx].payload.clone();
            let record = reinsert(snapshot, payload)?;
            let item = snapshot.trash.remove(idx);
            (
                item,
                vec![
                    Write::Upsert(record),
                    Write::Delete(Table::Trash, vec![id.to_string()]),
                ],
            )
        };

        log::info!("Restored {} '{}' from trash", item.kind(), item.title());
        self.persist("restore", writes).await;
        Ok(item)
    }

    /// Drop one trash entry for good. Returns `false` when the user declined.
    pub async fn permanently_delete_trash_item(&self, id: &str) -> DomainResult<bool> {
        if self.state.lock().await.snapshot.trash_item(id).is_none() {
            return Err(DomainError::NotFound(format!("Trash item {}", id)));
        }
        if !self.confirmed(PURGE_ITEM) {
            return Ok(false);
        }

        {
            let mut state = self.state.lock().await;
            state.snapshot.trash.retain(|t| t.id != id);
        }

        self.persist("purge", vec![Write::Delete(Table::Trash, vec![id.to_string()])]).await;
        Ok(true)
    }

    /// Drop every trash entry. Returns the number removed, or `None` when declined.
    pub async fn empty_trash(&self) -> DomainResult<Option<usize>> {
        if !self.confirmed(EMPTY_TRASH) {
            return Ok(None);
        }

        let ids: Vec<String> = {
            let mut state = self.state.lock().await;
            std::mem::take(&mut state.snapshot.trash).into_iter().map(|t| t.id).collect()
        };
        let count = ids.len();
        if count > 0 {
            log::info!("Emptying trash ({} items)", count);
            self.persist("empty trash", vec![Write::Delete(Table::Trash, ids)]).await;
        }
        Ok(Some(count))
    }
}
