//! List, tag and saved-filter actions

use chrono::Utc;

use crate::domain::{
    require_text, DomainError, DomainResult, FilterCriteria, List, ListKind, Record, SavedFilter, Table, Tag,
    TrashItem, TrashPayload,
};
use super::confirm::{delete_tag_prompt, DELETE_FILTER, DELETE_LIST};
use super::{TaskStore, Write};

impl TaskStore {
    pub async fn add_list(&self, name: &str, kind: ListKind) -> DomainResult<List> {
        let list = List::new(require_text("list name", name)?, kind);
        {
            let mut state = self.state.lock().await;
            state.snapshot.lists.push(list.clone());
        }

        log::info!("Added {} list {} '{}'", list.kind, list.id, list.name);
        self.persist("add list", vec![Write::Upsert(Record::List(list.clone()))]).await;
        Ok(list)
    }

    /// Move a list, its tasks and its notes to the trash as separate items.
    /// Returns `false` when the user declined.
    pub async fn delete_list(&self, id: &str) -> DomainResult<bool> {
        if self.state.lock().await.snapshot.list(id).is_none() {
            return Err(DomainError::NotFound(format!("List {}", id)));
        }
        if !self.confirmed(DELETE_LIST) {
            return Ok(false);
        }

        let writes = {
            let mut state = self.state.lock().await;
            let snapshot = &mut state.snapshot;
            let Some(idx) = snapshot.lists.iter().position(|l| l.id == id) else {
                return Err(DomainError::NotFound(format!("List {}", id)));
            };
            let now = Utc::now();
            let list = snapshot.lists.remove(idx);

            let in_list = |list_id: &Option<String>| list_id.as_deref() == Some(id);
            let (tasks, kept_tasks): (Vec<_>, Vec<_>) =
                std::mem::take(&mut snapshot.tasks).into_iter().partition(|t| in_list(&t.list_id));
            let (notes, kept_notes): (Vec<_>, Vec<_>) =
                std::mem::take(&mut snapshot.notes).into_iter().partition(|n| in_list(&n.list_id));
            snapshot.tasks = kept_tasks;
            snapshot.notes = kept_notes;

            log::info!("Moving list {} to trash with {} tasks and {} notes", id, tasks.len(), notes.len());
            let had_tasks = !tasks.is_empty();
            let had_notes = !notes.is_empty();

            let mut items = vec![TrashItem::new(TrashPayload::List(list), now)];
            items.extend(tasks.into_iter().map(|t| TrashItem::new(TrashPayload::Task(t), now)));
            items.extend(notes.into_iter().map(|n| TrashItem::new(TrashPayload::Note(n), now)));
            snapshot.trash.extend(items.iter().cloned());

            let mut writes: Vec<Write> = items.into_iter().map(|i| Write::Upsert(Record::Trash(i))).collect();
            writes.push(Write::Delete(Table::Lists, vec![id.to_string()]));
            if had_tasks {
                writes.push(Write::DeleteByList(Table::Tasks, id.to_string()));
            }
            if had_notes {
                writes.push(Write::DeleteByList(Table::Notes, id.to_string()));
            }
            writes
        };

        self.persist("delete list", writes).await;
        Ok(true)
    }

    /// Create a tag, or return the existing one with that name
    pub async fn add_tag(&self, name: &str) -> DomainResult<Tag> {
        let name = Tag::normalize_name(name)?;
        let tag = {
            let mut state = self.state.lock().await;
            if let Some(existing) = state.snapshot.tag_by_name(&name) {
                return Ok(existing.clone());
            }
            let tag = Tag::new(name);
            state.snapshot.tags.push(tag.clone());
            tag
        };

        log::info!("Added tag #{}", tag.name);
        self.persist("add tag", vec![Write::Upsert(Record::Tag(tag.clone()))]).await;
        Ok(tag)
    }

    /// Move a tag to the trash and strip its name from every task.
    /// Returns `false` when the user declined.
    pub async fn delete_tag(&self, id: &str) -> DomainResult<bool> {
        let name = {
            let state = self.state.lock().await;
            let tag = state
                .snapshot
                .tags
                .iter()
                .find(|t| t.id == id)
                .ok_or_else(|| DomainError::NotFound(format!("Tag {}", id)))?;
            tag.name.clone()
        };
        if !self.confirmed(&delete_tag_prompt(&name)) {
            return Ok(false);
        }

        let writes = {
            let mut state = self.state.lock().await;
            let snapshot = &mut state.snapshot;
            let Some(idx) = snapshot.tags.iter().position(|t| t.id == id) else {
                return Err(DomainError::NotFound(format!("Tag {}", id)));
            };
            let tag = snapshot.tags.remove(idx);
            let item = TrashItem::new(TrashPayload::Tag(tag), Utc::now());
            snapshot.trash.push(item.clone());

            let mut writes = vec![
                Write::Upsert(Record::Trash(item)),
                Write::Delete(Table::Tags, vec![id.to_string()]),
            ];
            for task in snapshot.tasks.iter_mut() {
                if task.remove_tag(&name) {
                    writes.push(Write::Upsert(Record::Task(task.clone())));
                }
            }
            log::info!("Moved tag #{} to trash, untagged {} tasks", name, writes.len() - 2);
            writes
        };

        self.persist("delete tag", writes).await;
        Ok(true)
    }

    pub async fn save_filter(&self, name: &str, criteria: FilterCriteria) -> DomainResult<SavedFilter> {
        let filter = SavedFilter::new(require_text("filter name", name)?, criteria);
        {
            let mut state = self.state.lock().await;
            state.snapshot.filters.push(filter.clone());
        }

        log::info!("Saved filter {} '{}'", filter.id, filter.name);
        self.persist("save filter", vec![Write::Upsert(Record::Filter(filter.clone()))]).await;
        Ok(filter)
    }

    /// Delete a saved filter outright (filters do not go to the trash).
    /// Returns `false` when the user declined.
    pub async fn delete_saved_filter(&self, id: &str) -> DomainResult<bool> {
        if self.state.lock().await.snapshot.filter(id).is_none() {
            return Err(DomainError::NotFound(format!("Filter {}", id)));
        }
        if !self.confirmed(DELETE_FILTER) {
            return Ok(false);
        }

        {
            let mut state = self.state.lock().await;
            state.snapshot.filters.retain(|f| f.id != id);
        }

        self.persist("delete filter", vec![Write::Delete(Table::Filters, vec![id.to_string()])]).await;
        Ok(true)
    }
}
