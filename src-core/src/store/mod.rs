//! Client-side store
//!
//! Holds the full [`Snapshot`] in memory. Every action mutates the snapshot
//! first, releases the lock, then writes through to the [`Datastore`].
//! Write failures are logged and counted, never returned: the in-memory
//! state is what the caller sees.

mod confirm;
mod lists;
mod notes;
mod tasks;
mod trash;

#[cfg(test)]
mod tests;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};

use crate::domain::{
    DomainError, DomainResult, List, Note, Record, SavedFilter, Snapshot, Table, Tag, Task, TrashItem,
};
use crate::remote::Datastore;

pub use confirm::{AlwaysConfirm, Confirm, NeverConfirm};
pub use tasks::DropTarget;

/// One pending datastore write
#[derive(Debug, Clone)]
pub(crate) enum Write {
    Upsert(Record),
    Delete(Table, Vec<String>),
    DeleteByList(Table, String),
}

#[derive(Default)]
struct StoreState {
    snapshot: Snapshot,
    initialized: bool,
}

pub struct TaskStore {
    state: Mutex<StoreState>,
    datastore: RwLock<Arc<dyn Datastore>>,
    confirm: Arc<dyn Confirm>,
    failed_writes: AtomicUsize,
}

impl TaskStore {
    pub fn new(datastore: Arc<dyn Datastore>, confirm: Arc<dyn Confirm>) -> Self {
        Self {
            state: Mutex::new(StoreState::default()),
            datastore: RwLock::new(datastore),
            confirm,
            failed_writes: AtomicUsize::new(0),
        }
    }

    pub async fn datastore(&self) -> Arc<dyn Datastore> {
        self.datastore.read().await.clone()
    }

    /// Point the store at another datastore; the snapshot is kept until the next fetch
    pub async fn set_datastore(&self, datastore: Arc<dyn Datastore>) {
        log::info!("Store now writes to the {} datastore", datastore.name());
        *self.datastore.write().await = datastore;
    }

    /// Load every table from the datastore and mark the store initialized
    pub async fn fetch_all(&self) -> DomainResult<()> {
        let datastore = self.datastore().await;
        let snapshot = datastore.load().await.map_err(|e| {
            log::error!("Loading from the {} datastore failed: {}", datastore.name(), e);
            e
        })?;

        log::debug!("Loaded {} records from the {} datastore", snapshot.record_count(), datastore.name());
        let mut state = self.state.lock().await;
        state.snapshot = snapshot;
        state.initialized = true;
        Ok(())
    }

    pub async fn is_initialized(&self) -> bool {
        self.state.lock().await.initialized
    }

    /// Number of datastore writes that failed since the store was created
    pub fn failed_writes(&self) -> usize {
        self.failed_writes.load(Ordering::Relaxed)
    }

    pub async fn snapshot(&self) -> Snapshot {
        self.state.lock().await.snapshot.clone()
    }

    pub async fn tasks(&self) -> Vec<Task> {
        self.state.lock().await.snapshot.tasks.clone()
    }

    pub async fn lists(&self) -> Vec<List> {
        self.state.lock().await.snapshot.lists.clone()
    }

    pub async fn tags(&self) -> Vec<Tag> {
        self.state.lock().await.snapshot.tags.clone()
    }

    pub async fn filters(&self) -> Vec<SavedFilter> {
        self.state.lock().await.snapshot.filters.clone()
    }

    pub async fn notes(&self) -> Vec<Note> {
        self.state.lock().await.snapshot.notes.clone()
    }

    pub async fn trash(&self) -> Vec<TrashItem> {
        self.state.lock().await.snapshot.trash.clone()
    }

    pub async fn task(&self, id: &str) -> DomainResult<Task> {
        self.state
            .lock()
            .await
            .snapshot
            .task(id)
            .cloned()
            .ok_or_else(|| DomainError::NotFound(format!("Task {}", id)))
    }

    fn confirmed(&self, prompt: &str) -> bool {
        let ok = self.confirm.confirm(prompt);
        if !ok {
            log::info!("Cancelled: {}", prompt);
        }
        ok
    }

    /// Run the writes in order; each failure is logged and the rest still run
    pub(crate) async fn persist(&self, action: &str, writes: Vec<Write>) {
        let datastore = self.datastore().await;
        for write in writes {
            let result = match &write {
                Write::Upsert(record) => datastore.upsert(record).await,
                Write::Delete(table, ids) => datastore.delete(*table, ids).await,
                Write::DeleteByList(table, list_id) => datastore.delete_by_list(*table, list_id).await,
            };
            if let Err(e) = result {
                self.failed_writes.fetch_add(1, Ordering::Relaxed);
                log::error!("{}: {} {} failed: {}", action, datastore.name(), write_label(&write), e);
            }
        }
    }
}

fn write_label(write: &Write) -> String {
    match write {
        Write::Upsert(record) => format!("upsert {} {}", record.table(), record.id()),
        Write::Delete(table, ids) => format!("delete {} {}", table, ids.join(",")),
        Write::DeleteByList(table, list_id) => format!("delete {} of list {}", table, list_id),
    }
}
