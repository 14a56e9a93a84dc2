//! Note actions

use chrono::Utc;

use crate::domain::{
    require_text, DomainError, DomainResult, Note, NotePatch, Record, Table, TrashItem, TrashPayload,
};
use super::confirm::DELETE_NOTE;
use super::tasks::require_list;
use super::{TaskStore, Write};

impl TaskStore {
    /// Create an empty note in a folder
    pub async fn add_note(&self, title: &str, list_id: Option<String>) -> DomainResult<Note> {
        let title = require_text("note title", title)?;
        let note = {
            let mut state = self.state.lock().await;
            if let Some(list_id) = &list_id {
                require_list(&state.snapshot, list_id)?;
            }
            let note = Note::new(title, list_id);
            state.snapshot.notes.push(note.clone());
            note
        };

        log::info!("Added note {} '{}'", note.id, note.title);
        self.persist("add note", vec![Write::Upsert(Record::Note(note.clone()))]).await;
        Ok(note)
    }

    /// Apply a partial update; `updatedAt` is always bumped
    pub async fn update_note(&self, id: &str, patch: NotePatch) -> DomainResult<Note> {
        let mut patch = patch;
        if let Some(title) = &patch.title {
            patch.title = Some(require_text("note title", title)?);
        }

        let note = {
            let mut state = self.state.lock().await;
            if let Some(Some(list_id)) = &patch.list_id {
                require_list(&state.snapshot, list_id)?;
            }
            let note = state
                .snapshot
                .notes
                .iter_mut()
                .find(|n| n.id == id)
                .ok_or_else(|| DomainError::NotFound(format!("Note {}", id)))?;
            note.apply(&patch, Utc::now());
            note.clone()
        };

        self.persist("update note", vec![Write::Upsert(Record::Note(note.clone()))]).await;
        Ok(note)
    }

    /// Move a note to the trash. Returns `false` when the user declined.
    pub async fn delete_note(&self, id: &str) -> DomainResult<bool> {
        if self.state.lock().await.snapshot.note(id).is_none() {
            return Err(DomainError::NotFound(format!("Note {}", id)));
        }
        if !self.confirmed(DELETE_NOTE) {
            return Ok(false);
        }

        let writes = {
            let mut state = self.state.lock().await;
            let snapshot = &mut state.snapshot;
            let Some(idx) = snapshot.notes.iter().position(|n| n.id == id) else {
                return Err(DomainError::NotFound(format!("Note {}", id)));
            };
            let note = snapshot.notes.remove(idx);
            let item = TrashItem::new(TrashPayload::Note(note), Utc::now());
            snapshot.trash.push(item.clone());
            vec![
                Write::Upsert(Record::Trash(item)),
                Write::Delete(Table::Notes, vec![id.to_string()]),
            ]
        };

        log::info!("Moved note {} to trash", id);
        self.persist("delete note", writes).await;
        Ok(true)
    }
}
